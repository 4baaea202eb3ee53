//! Fax submission workflow module

pub mod traits;
pub mod orchestrator;

pub use traits::FaxProvider;
#[cfg(any(test, feature = "test-export-mocks"))]
pub use traits::MockFaxProvider;
pub use orchestrator::{FaxSubmissionWorkflow, SubmissionSettings};
