//! Webhook endpoints
//!
//! Three routes: a health check, the call-start webhook, and the
//! speech-turn webhook. Twilio POSTs each transcribed utterance to
//! `/gather` and speaks whatever TwiML comes back, so every branch here
//! must return a well-formed document with status 200.
//!
//! Turns are independent: nothing is kept per CallSid, so reservation
//! details in progress are not remembered between turns. The instruction
//! steers the model to re-ask for whatever is missing. A CallSid-keyed
//! store would be the first follow-up if that proves too lossy.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::twiml::VoiceResponse;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/voice", post(call_start))
        .route("/gather", post(speech_turn))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A 200 response carrying a TwiML document
pub struct VoiceXml(pub String);

impl IntoResponse for VoiceXml {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            self.0,
        )
            .into_response()
    }
}

/// Form payload Twilio sends to the speech-turn webhook
#[derive(Debug, Deserialize)]
pub struct GatherRequest {
    /// Transcribed caller speech; absent or empty when nothing was heard
    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,
    /// Twilio call identifier, logged for diagnosis only
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
}

/// GET / - fixed plaintext confirmation
async fn health() -> &'static str {
    "Phone concierge is running"
}

/// POST /voice - call start
///
/// Always succeeds: greets the caller by business name, opens a speech
/// gather targeting `/gather`, and falls back to re-prompting a silent
/// caller via a redirect to this same endpoint.
async fn call_start(State(state): State<AppState>) -> VoiceXml {
    tracing::info!(business = %state.knowledge.name, "Incoming call");

    let xml = VoiceResponse::new()
        .say(format!("Thanks for calling {}!", state.knowledge.name))
        .gather_speech("/gather", Some(state.settings.voice.opening_prompt.as_str()))
        .redirect("/voice")
        .build();

    VoiceXml(xml)
}

/// POST /gather - speech turn
///
/// Branches:
/// 1. Empty/absent transcript: apology + redirect to `/voice`, no
///    completion call.
/// 2. Transcript present, completion succeeds: speak the reply, gather
///    again, fall back to `/voice`.
/// 3. Transcript present, completion fails: speak a fixed apology with
///    no further gather; error detail stays in the logs.
async fn speech_turn(
    State(state): State<AppState>,
    Form(request): Form<GatherRequest>,
) -> VoiceXml {
    let call_sid = request.call_sid.as_deref().unwrap_or("unknown");
    let voice = &state.settings.voice;

    let transcript = match request.speech_result.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => {
            tracing::info!(call_sid, "No speech detected, re-prompting");
            let xml = VoiceResponse::new()
                .say(&voice.no_speech_apology)
                .redirect("/voice")
                .build();
            return VoiceXml(xml);
        }
    };

    tracing::info!(call_sid, transcript, "Caller utterance");

    match state.llm.complete(&state.instruction, transcript).await {
        Ok(reply) => {
            tracing::info!(call_sid, reply = %reply, "Completion reply");
            let xml = VoiceResponse::new()
                .say(reply)
                .gather_speech("/gather", Some(voice.continuation_prompt.as_str()))
                .redirect("/voice")
                .build();
            VoiceXml(xml)
        }
        Err(e) => {
            tracing::error!(call_sid, error = %e, "Completion failed");
            let xml = VoiceResponse::new().say(&voice.trouble_apology).build();
            VoiceXml(xml)
        }
    }
}
