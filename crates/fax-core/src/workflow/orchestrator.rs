//! Fax submission workflow
//!
//! Steps run strictly in order and any failure ends the request:
//! authenticate, render and upload the cover letter, stage and upload the
//! attachment, check there is something to send, compose the payload, send.
//! Temporary files live in the request's scope and are removed on every exit.

use super::traits::FaxProvider;
use crate::config::FaxPlusConfig;
use crate::error::{FaxError, Result};
use crate::services::DocumentRenderer;
use crate::types::{
    AccessToken, Attachment, CoverLetterMode, FaxComment, FaxPayload, FaxRequest, UploadedDocumentRef,
};
use fax_types::{ErrorResult, FaxOutcome, FaxResult};
use mime_guess::mime::{self, Mime};
use std::io::Write;
use tempfile::NamedTempFile;

/// Per-process settings the workflow reads on every request
#[derive(Debug, Clone)]
pub struct SubmissionSettings {
    pub access_token: Option<AccessToken>,
    pub owner_id: String,
    pub cover_letter_mode: CoverLetterMode,
}

impl From<&FaxPlusConfig> for SubmissionSettings {
    fn from(config: &FaxPlusConfig) -> Self {
        Self {
            access_token: AccessToken::from_config(config.access_token.as_deref()),
            owner_id: config.owner_id.clone(),
            cover_letter_mode: config.cover_letter_mode,
        }
    }
}

pub struct FaxSubmissionWorkflow<P: FaxProvider> {
    provider: P,
    renderer: DocumentRenderer,
    settings: SubmissionSettings,
}

impl<P: FaxProvider> FaxSubmissionWorkflow<P> {
    pub fn new(provider: P, settings: SubmissionSettings) -> Self {
        Self {
            provider,
            renderer: DocumentRenderer::new(),
            settings,
        }
    }

    /// Run the workflow and normalize the result for the web client
    pub async fn submit(&self, request: FaxRequest) -> FaxOutcome {
        match self.run(request).await {
            Ok(result) => {
                log::info!(
                    "Fax submitted with {} document(s), status '{}'",
                    result.upload_paths.len(),
                    result.status
                );
                result.into()
            }
            Err(e) => {
                match &e {
                    FaxError::MissingAccessToken | FaxError::NoDocuments => {
                        log::warn!("Fax request rejected: {}", e)
                    }
                    FaxError::ProviderApi { status, .. } => {
                        log::error!("Fax submission failed with provider status {}: {}", status, e)
                    }
                    _ => log::error!("Fax submission failed: {}", e),
                }
                ErrorResult::new(e.to_string()).into()
            }
        }
    }

    /// The workflow itself; errors are left for [`submit`](Self::submit) to normalize
    pub async fn run(&self, request: FaxRequest) -> Result<FaxResult> {
        // Step 1: Authenticate - no provider call is made without a token
        let token = self
            .settings
            .access_token
            .as_ref()
            .ok_or(FaxError::MissingAccessToken)?;

        // Staged files are dropped (and deleted) when this function returns
        let mut staged: Vec<NamedTempFile> = Vec::new();
        let mut uploaded: Vec<UploadedDocumentRef> = Vec::new();

        // Step 2: Render and upload the cover letter; it must print first
        let cover_text = request.cover_letter_text();
        if let (CoverLetterMode::Document, Some(text)) = (self.settings.cover_letter_mode, cover_text) {
            staged.push(self.renderer.render(text)?);
            let cover = &staged[staged.len() - 1];
            let reference = self.upload(token, cover, &mime::APPLICATION_PDF).await?;
            log::info!("Step 2: Uploaded cover letter as {}", reference.path);
            uploaded.push(reference);
        }

        // Step 3: Stage and upload the attachment
        if let Some(attachment) = &request.attachment {
            staged.push(stage_attachment(attachment)?);
            let file = &staged[staged.len() - 1];
            let reference = self.upload(token, file, &attachment.mime()).await?;
            log::info!("Step 3: Uploaded attachment '{}' as {}", attachment.file_name, reference.path);
            uploaded.push(reference);
        }

        // Step 4: Nothing to send is a request error, not a provider error
        if uploaded.is_empty() {
            return Err(FaxError::NoDocuments);
        }

        // Step 5: Compose
        let upload_paths: Vec<String> = uploaded.into_iter().map(|r| r.path).collect();
        let comment = match (self.settings.cover_letter_mode, cover_text) {
            (CoverLetterMode::Comment, Some(text)) => Some(FaxComment {
                text: text.to_string(),
                tags: Vec::new(),
            }),
            _ => None,
        };
        let payload = FaxPayload {
            from_number: request.from_number,
            to: vec![request.to_number],
            files: upload_paths.clone(),
            comment,
            return_ids: true,
        };
        log::info!("Fax request payload: {:?}", payload);

        // Step 6: Send
        let response = self
            .provider
            .send_fax(token, &self.settings.owner_id, &payload)
            .await?;
        log::info!("Fax response: {:?}", response);

        Ok(FaxResult::new(upload_paths, response.ids, response.status))
    }

    async fn upload(
        &self,
        token: &AccessToken,
        file: &NamedTempFile,
        mime: &Mime,
    ) -> Result<UploadedDocumentRef> {
        self.provider
            .upload_file(token, &self.settings.owner_id, file.path(), mime)
            .await
    }
}

/// Copy the attachment bytes to a temp file keeping the original extension
fn stage_attachment(attachment: &Attachment) -> Result<NamedTempFile> {
    let suffix = attachment
        .extension()
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix("attachment-")
        .suffix(&suffix)
        .tempfile()?;
    file.write_all(&attachment.bytes)?;
    file.flush()?;
    Ok(file)
}
