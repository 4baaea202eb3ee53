//! Shared response types for the fax relay

use serde::{Deserialize, Serialize};

/// Status reported when the provider does not return one
pub const DEFAULT_FAX_STATUS: &str = "queued";

/// Successful submission as returned to the web client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaxResult {
    /// Provider storage paths, cover letter first
    pub upload_paths: Vec<String>,
    /// Provider-assigned fax identifiers, passed through as-is
    #[serde(default = "empty_ids")]
    pub fax_ids: serde_json::Value,
    #[serde(default = "default_status")]
    pub status: String,
}

impl FaxResult {
    /// Build a result, filling the provider's optional fields with their defaults
    pub fn new(upload_paths: Vec<String>, fax_ids: Option<serde_json::Value>, status: Option<String>) -> Self {
        Self {
            upload_paths,
            fax_ids: fax_ids.filter(|ids| !ids.is_null()).unwrap_or_else(empty_ids),
            status: status.unwrap_or_else(default_status),
        }
    }
}

/// Failed submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Outcome of a fax submission, serialized without a tag so the client sees
/// either the result fields or a single `error` field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FaxOutcome {
    Sent(FaxResult),
    Failed(ErrorResult),
}

impl FaxOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, FaxOutcome::Sent(_))
    }

    /// Error message, if the submission failed
    pub fn error(&self) -> Option<&str> {
        match self {
            FaxOutcome::Failed(e) => Some(&e.error),
            FaxOutcome::Sent(_) => None,
        }
    }
}

impl From<FaxResult> for FaxOutcome {
    fn from(result: FaxResult) -> Self {
        FaxOutcome::Sent(result)
    }
}

impl From<ErrorResult> for FaxOutcome {
    fn from(error: ErrorResult) -> Self {
        FaxOutcome::Failed(error)
    }
}

fn empty_ids() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn default_status() -> String {
    DEFAULT_FAX_STATUS.to_string()
}
