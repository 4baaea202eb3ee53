//! Fax Relay Core Library
//!
//! Business logic for relaying web form submissions to Fax.Plus: cover
//! letter rendering, the provider client and the submission workflow.

pub mod config;
pub mod constants;
pub mod clients;
pub mod services;
pub mod workflow;
pub mod types;
pub mod error;

// Re-export main types for easy access
pub use config::{FaxConfig, FaxPlusConfig, ServerConfig};
pub use error::{FaxError, Result};

pub use clients::FaxPlusClient;
pub use services::DocumentRenderer;

pub use workflow::{FaxProvider, FaxSubmissionWorkflow, SubmissionSettings};

pub use types::{
    AccessToken,
    Attachment,
    CoverLetterMode,
    FaxComment,
    FaxPayload,
    FaxRequest,
    SendFaxResponse,
    UploadedDocumentRef,
};
