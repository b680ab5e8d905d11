//! Phone concierge entry point
//!
//! Startup is strictly sequenced: settings, tracing, credentials check,
//! knowledge record, completion client, then the listener. The knowledge
//! record and derived instruction are in place before the first request
//! is accepted.

use std::net::SocketAddr;
use std::sync::Arc;

use phone_concierge_config::{load_settings, ConfigError, KnowledgeRecord, Settings};
use phone_concierge_llm::OpenAiClient;
use phone_concierge_server::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing is not up yet, so early failures go to stderr
    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e @ ConfigError::MissingField(_)) => {
            eprintln!("Fatal: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            let settings = Settings::default();
            if let Err(e) = settings.validate() {
                eprintln!("Fatal: {}", e);
                std::process::exit(1);
            }
            settings
        }
    };

    init_tracing();

    tracing::info!("Starting phone concierge v{}", env!("CARGO_PKG_VERSION"));

    // Read synchronously before the server binds; degrades to a minimal
    // record on failure rather than refusing to start
    let knowledge = KnowledgeRecord::load(&settings.knowledge_path);
    tracing::info!(business = %knowledge.name, "Serving as concierge");

    let llm = match OpenAiClient::new(settings.llm.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create completion client");
            std::process::exit(1);
        }
    };

    let port = settings.server.port;
    let state = AppState::new(settings, knowledge, llm);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing with an env-filter default
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phone_concierge=info,tower_http=info".into()),
        )
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
