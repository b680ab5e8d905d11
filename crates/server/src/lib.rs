//! Phone concierge webhook server
//!
//! Receives Twilio call-progress webhooks, answers caller questions via a
//! hosted chat-completion model, and responds with TwiML telling Twilio
//! what to speak and what to listen for next.

pub mod http;
pub mod state;
pub mod twiml;

pub use http::create_router;
pub use state::AppState;
pub use twiml::VoiceResponse;
