//! Error types for the fax relay

use thiserror::Error;

/// Main error type for all fax relay operations
#[derive(Error, Debug)]
pub enum FaxError {
    #[error("Missing FAXPLUS_ACCESS_TOKEN in environment")]
    MissingAccessToken,

    #[error("No documents to send")]
    NoDocuments,

    /// Non-success response from Fax.Plus; `body` is the provider's text verbatim
    #[error("Fax.Plus API error: {body}")]
    ProviderApi { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for FaxError {
    fn from(e: config::ConfigError) -> Self {
        FaxError::Config(e.to_string())
    }
}

/// Result type for fax relay operations
pub type Result<T> = std::result::Result<T, FaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_surfaces_body_verbatim() {
        let err = FaxError::ProviderApi {
            status: 400,
            body: r#"{"error":"invalid_number"}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"Fax.Plus API error: {"error":"invalid_number"}"#);
    }

    #[test]
    fn test_gate_messages() {
        assert_eq!(
            FaxError::MissingAccessToken.to_string(),
            "Missing FAXPLUS_ACCESS_TOKEN in environment"
        );
        assert_eq!(FaxError::NoDocuments.to_string(), "No documents to send");
    }
}
