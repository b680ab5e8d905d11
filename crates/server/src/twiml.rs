//! TwiML document builder
//!
//! Assembles `Say` / `Gather` / `Redirect` verbs and serializes them to
//! Twilio's voice markup. Every handler branch must end in a well-formed
//! document; a malformed response would leave the caller connected with
//! silence.

use std::fmt::Write;

/// A single TwiML verb
#[derive(Debug, Clone)]
enum Verb {
    /// Speak text to the caller
    Say(String),
    /// Collect caller speech and POST the transcript to `action`
    Gather {
        action: String,
        /// Prompt spoken inside the gather, while listening starts
        prompt: Option<String>,
    },
    /// Hand the call to another endpoint
    Redirect(String),
}

/// Builder for a TwiML voice response
#[derive(Debug, Clone, Default)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speak text to the caller
    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    /// Collect speech with Twilio's own end-of-speech detection
    ///
    /// The transcript is POSTed to `action`. An optional prompt is spoken
    /// inside the gather so the caller can barge in over it.
    pub fn gather_speech(mut self, action: impl Into<String>, prompt: Option<&str>) -> Self {
        self.verbs.push(Verb::Gather {
            action: action.into(),
            prompt: prompt.map(str::to_string),
        });
        self
    }

    /// Redirect the call to another endpoint (POST)
    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect(url.into()));
        self
    }

    /// Serialize to a TwiML document
    pub fn build(self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Say(text) => {
                    let _ = write!(xml, "<Say>{}</Say>", escape(text));
                }
                Verb::Gather { action, prompt } => {
                    let _ = write!(
                        xml,
                        "<Gather input=\"speech\" action=\"{}\" method=\"POST\" speechTimeout=\"auto\">",
                        escape(action)
                    );
                    if let Some(prompt) = prompt {
                        let _ = write!(xml, "<Say>{}</Say>", escape(prompt));
                    }
                    xml.push_str("</Gather>");
                }
                Verb::Redirect(url) => {
                    let _ = write!(xml, "<Redirect method=\"POST\">{}</Redirect>", escape(url));
                }
            }
        }
        xml.push_str("</Response>");
        xml
    }
}

/// Escape text for XML content and attribute values
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_say_and_redirect() {
        let xml = VoiceResponse::new()
            .say("Thanks for calling!")
            .redirect("/voice")
            .build();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<Say>Thanks for calling!</Say>"));
        assert!(xml.contains("<Redirect method=\"POST\">/voice</Redirect>"));
        assert!(xml.ends_with("</Response>"));
    }

    #[test]
    fn test_gather_carries_speech_attributes() {
        let xml = VoiceResponse::new()
            .gather_speech("/gather", Some("How can I help?"))
            .build();
        assert!(xml.contains(
            "<Gather input=\"speech\" action=\"/gather\" method=\"POST\" speechTimeout=\"auto\">"
        ));
        assert!(xml.contains("<Say>How can I help?</Say></Gather>"));
    }

    #[test]
    fn test_gather_without_prompt() {
        let xml = VoiceResponse::new().gather_speech("/gather", None).build();
        assert!(xml.contains("speechTimeout=\"auto\"></Gather>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = VoiceResponse::new().say("Fish & chips <£10>").build();
        assert!(xml.contains("<Say>Fish &amp; chips &lt;£10&gt;</Say>"));
    }

    #[test]
    fn test_empty_response_is_well_formed() {
        let xml = VoiceResponse::new().build();
        assert!(xml.contains("<Response></Response>"));
    }
}
