//! Provider trait for the fax submission workflow

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{AccessToken, FaxPayload, SendFaxResponse, UploadedDocumentRef};
use mime_guess::Mime;
use std::path::Path;

/// Remote operations the workflow needs from a fax provider
///
/// The credential is passed on every call so that the workflow's
/// authentication step decides whether any request is made at all.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait FaxProvider: Send + Sync {
    /// Upload a local file to the provider's storage under `owner_id`
    async fn upload_file(
        &self,
        token: &AccessToken,
        owner_id: &str,
        local_path: &Path,
        mime: &Mime,
    ) -> Result<UploadedDocumentRef>;

    /// Submit a composed fax for delivery
    async fn send_fax(
        &self,
        token: &AccessToken,
        owner_id: &str,
        payload: &FaxPayload,
    ) -> Result<SendFaxResponse>;
}
