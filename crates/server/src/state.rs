//! Application state
//!
//! Everything handlers touch is built once at startup and immutable
//! afterwards, so concurrent requests share it without locks. The system
//! instruction is fully formed before the first request is served.

use std::sync::Arc;

use phone_concierge_config::{build_system_instruction, KnowledgeRecord, Settings};
use phone_concierge_llm::CompletionClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded settings
    pub settings: Arc<Settings>,
    /// Business knowledge, loaded once at startup
    pub knowledge: Arc<KnowledgeRecord>,
    /// System instruction derived from the knowledge record
    pub instruction: Arc<str>,
    /// Completion backend
    pub llm: Arc<dyn CompletionClient>,
}

impl AppState {
    /// Build state from loaded configuration and a completion client
    ///
    /// Derives the system instruction here so no code path can serve a
    /// request before it exists.
    pub fn new(
        settings: Settings,
        knowledge: KnowledgeRecord,
        llm: Arc<dyn CompletionClient>,
    ) -> Self {
        let instruction: Arc<str> = build_system_instruction(&knowledge).into();
        Self {
            settings: Arc::new(settings),
            knowledge: Arc::new(knowledge),
            instruction,
            llm,
        }
    }
}
