//! Common types used throughout the fax relay

use mime_guess::mime::{self, Mime};
use serde::{Deserialize, Serialize};

/// How cover letter text reaches the recipient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoverLetterMode {
    /// Rendered to a PDF and uploaded as the first document
    #[default]
    Document,
    /// Sent as the payload's comment text, nothing rendered
    Comment,
}

/// Incoming fax request, as parsed from the web form
#[derive(Debug, Clone)]
pub struct FaxRequest {
    pub to_number: String,
    pub from_number: String,
    /// May be empty
    pub cover_letter: String,
    pub attachment: Option<Attachment>,
}

impl FaxRequest {
    /// Cover letter text if it has any non-whitespace content
    pub fn cover_letter_text(&self) -> Option<&str> {
        if self.cover_letter.trim().is_empty() {
            None
        } else {
            Some(&self.cover_letter)
        }
    }
}

/// Uploaded file from the web form
#[derive(Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    /// Extension of the original file name, used to keep the staged copy recognisable
    pub fn extension(&self) -> Option<&str> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
    }

    /// Declared content type, unless it is unparsable or plain octet-stream,
    /// otherwise a guess from the file name
    pub fn mime(&self) -> Mime {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.parse::<Mime>().ok())
            .filter(|declared| *declared != mime::APPLICATION_OCTET_STREAM)
            .unwrap_or_else(|| mime_guess::from_path(&self.file_name).first_or_octet_stream())
    }
}

/// Bearer token for the Fax.Plus API. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Returns `None` for a missing or blank token
    pub fn from_config(token: Option<&str>) -> Option<Self> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| AccessToken(t.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Remote reference returned by the file upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedDocumentRef {
    pub path: String,
}

/// Structured comment attached to an outgoing fax
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaxComment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Request body for the send-fax endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaxPayload {
    #[serde(rename = "from")]
    pub from_number: String,
    /// Recipients; always exactly one number
    pub to: Vec<String>,
    /// Uploaded document paths in print order
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<FaxComment>,
    pub return_ids: bool,
}

/// Response from the send-fax endpoint
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SendFaxResponse {
    #[serde(default)]
    pub ids: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
}
