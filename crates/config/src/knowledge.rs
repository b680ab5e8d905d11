//! Business knowledge record
//!
//! One JSON document describing the business (name, hours, menu, policies).
//! Read synchronously at startup, before the server accepts traffic, and
//! never rewritten. A missing or unparsable file degrades to a minimal
//! record so the service stays answerable without personalization.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display name used when no knowledge file is available
pub const DEFAULT_BUSINESS_NAME: &str = "our restaurant";

/// The business knowledge record
///
/// Everything except `name` is free-form: whatever keys the file carries
/// (hours, location, menu, policies, specials) are kept verbatim and fed
/// to the model as-is. No schema is enforced beyond valid JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// Business display name, spoken in the greeting
    #[serde(default = "default_name")]
    pub name: String,

    /// Remaining descriptive fields, passed through to the prompt
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

fn default_name() -> String {
    DEFAULT_BUSINESS_NAME.to_string()
}

impl Default for KnowledgeRecord {
    fn default() -> Self {
        Self {
            name: default_name(),
            details: serde_json::Map::new(),
        }
    }
}

impl KnowledgeRecord {
    /// Load the knowledge record from a JSON file
    ///
    /// Runs once at startup. On read or parse failure the failure is
    /// logged and the minimal default record is returned, so startup
    /// always succeeds. No retries.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Knowledge file unreadable, using default record"
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&raw) {
            Ok(record) if !record.name.trim().is_empty() => {
                tracing::info!(
                    path = %path.display(),
                    business = %record.name,
                    fields = record.details.len(),
                    "Loaded knowledge record"
                );
                record
            }
            Ok(_) => {
                tracing::warn!(
                    path = %path.display(),
                    "Knowledge file has a blank business name, using default record"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Knowledge file unparsable, using default record"
                );
                Self::default()
            }
        }
    }

    /// Serialize the record for prompt injection
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{{\"name\": \"{}\"}}", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_default() {
        let record = KnowledgeRecord::load("/nonexistent/business.json");
        assert_eq!(record.name, DEFAULT_BUSINESS_NAME);
        assert!(record.details.is_empty());
    }

    #[test]
    fn test_corrupt_file_yields_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let record = KnowledgeRecord::load(file.path());
        assert_eq!(record.name, DEFAULT_BUSINESS_NAME);
    }

    #[test]
    fn test_valid_file_is_loaded_with_extra_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "name": "Luna Bistro", "hours": "5pm-10pm", "menu": ["pasta", "risotto"] }}"#
        )
        .unwrap();
        let record = KnowledgeRecord::load(file.path());
        assert_eq!(record.name, "Luna Bistro");
        assert_eq!(record.details["hours"], "5pm-10pm");
        assert_eq!(record.details["menu"][1], "risotto");
    }

    #[test]
    fn test_blank_name_yields_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "  " }}"#).unwrap();
        let record = KnowledgeRecord::load(file.path());
        assert_eq!(record.name, DEFAULT_BUSINESS_NAME);
    }

    #[test]
    fn test_prompt_json_round_trips_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "Luna Bistro", "hours": "5pm-10pm" }}"#).unwrap();
        let record = KnowledgeRecord::load(file.path());
        let json = record.to_prompt_json();
        assert!(json.contains("Luna Bistro"));
        assert!(json.contains("5pm-10pm"));
    }
}
