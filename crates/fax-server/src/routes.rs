//! HTTP routes for the fax relay

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fax_core::{Attachment, FaxError, FaxPlusClient, FaxRequest, FaxSubmissionWorkflow};
use fax_types::{ErrorResult, FaxOutcome};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<FaxSubmissionWorkflow<FaxPlusClient>>,
}

/// Form-level failure, reported before the workflow runs
#[derive(Debug)]
pub struct FormError {
    status: StatusCode,
    message: String,
}

impl FormError {
    fn missing(field: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: FaxError::Validation(format!("field required: {}", field)).to_string(),
        }
    }

    /// Keeps the extractor's status, so an oversize body stays 413
    fn unreadable(status: StatusCode, detail: impl std::fmt::Display) -> Self {
        Self {
            status,
            message: FaxError::Validation(format!("invalid multipart payload: {}", detail)).to_string(),
        }
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResult::new(self.message))).into_response()
    }
}

/// `POST /send-fax/`; workflow outcomes are always 200
pub async fn send_fax(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FaxOutcome>, FormError> {
    let request_id = Uuid::new_v4();
    let multipart = multipart.map_err(|e| {
        log::warn!("[{}] Rejected send-fax request: {}", request_id, e);
        FormError::unreadable(e.status(), e.body_text())
    })?;

    let request = read_fax_form(multipart).await.map_err(|e| {
        log::warn!("[{}] Invalid send-fax form: {}", request_id, e.message);
        e
    })?;

    log::info!(
        "[{}] Request received: to={} from={} cover_letter={} file={}",
        request_id,
        request.to_number,
        request.from_number,
        request.cover_letter_text().is_some(),
        request
            .attachment
            .as_ref()
            .map(|a| a.file_name.as_str())
            .unwrap_or("-")
    );

    let outcome = state.workflow.submit(request).await;
    match outcome.error() {
        Some(error) => log::info!("[{}] Responding with error: {}", request_id, error),
        None => log::info!("[{}] Responding with sent fax", request_id),
    }
    Ok(Json(outcome))
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Collect the form fields into a [`FaxRequest`]
pub async fn read_fax_form(mut multipart: Multipart) -> Result<FaxRequest, FormError> {
    let mut to_number: Option<String> = None;
    let mut from_number: Option<String> = None;
    let mut cover_letter = String::new();
    let mut attachment: Option<Attachment> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FormError::unreadable(e.status(), e.body_text()))?
    {
        match field.name() {
            Some("to_number") => to_number = Some(read_text(field).await?),
            Some("from_number") => from_number = Some(read_text(field).await?),
            Some("cover_letter") => cover_letter = read_text(field).await?,
            Some("file") => attachment = read_attachment(field).await?,
            _ => continue,
        }
    }

    Ok(FaxRequest {
        to_number: to_number.ok_or_else(|| FormError::missing("to_number"))?,
        from_number: from_number.ok_or_else(|| FormError::missing("from_number"))?,
        cover_letter,
        attachment,
    })
}

async fn read_text(field: Field<'_>) -> Result<String, FormError> {
    field.text().await.map_err(|e| FormError::unreadable(e.status(), e.body_text()))
}

// Browsers send an empty, unnamed part for an untouched file input
async fn read_attachment(field: Field<'_>) -> Result<Option<Attachment>, FormError> {
    let file_name = field
        .file_name()
        .map(|name| name.to_string())
        .filter(|name| !name.trim().is_empty());
    let content_type = field.content_type().map(|mime| mime.to_string());
    let bytes = field
        .bytes()
        .await
        .map_err(|e| FormError::unreadable(e.status(), e.body_text()))?;

    if file_name.is_none() && bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(Attachment {
        file_name: file_name.unwrap_or_else(|| "upload.bin".to_string()),
        content_type,
        bytes: bytes.to_vec(),
    }))
}
