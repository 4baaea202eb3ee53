//! Fax.Plus REST API v3 client

use crate::config::FaxPlusConfig;
use crate::constants::UPLOAD_FIELD_NAME;
use crate::error::{FaxError, Result};
use crate::types::{AccessToken, FaxPayload, SendFaxResponse, UploadedDocumentRef};
use crate::workflow::FaxProvider;
use async_trait::async_trait;
use log::{debug, error, info};
use mime_guess::Mime;
use reqwest::{multipart, Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!("fax-core/", env!("CARGO_PKG_VERSION"));

pub struct FaxPlusClient {
    base_url: String,
    http_client: HttpClient,
}

impl FaxPlusClient {
    /// Build a client for the configured host
    pub fn configure(config: &FaxPlusConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn files_url(&self, owner_id: &str) -> String {
        format!("{}/accounts/{}/files", self.base_url, owner_id)
    }

    fn outbox_url(&self, owner_id: &str) -> String {
        format!("{}/accounts/{}/outbox", self.base_url, owner_id)
    }

    /// Turn a provider reply into `T`, keeping error bodies verbatim
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Fax.Plus API error ({}): {}", status, body);
            return Err(FaxError::ProviderApi {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Fax.Plus response body: {}", body);
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl FaxProvider for FaxPlusClient {
    async fn upload_file(
        &self,
        token: &AccessToken,
        owner_id: &str,
        local_path: &Path,
        mime: &Mime,
    ) -> Result<UploadedDocumentRef> {
        let url = self.files_url(owner_id);

        let bytes = tokio::fs::read(local_path).await?;
        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();

        debug!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), url);

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime.essence_str())?;
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.as_str())
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadedDocumentRef = Self::read_json(response).await?;
        info!("Uploaded {} to Fax.Plus storage as {}", file_name, uploaded.path);
        Ok(uploaded)
    }

    async fn send_fax(
        &self,
        token: &AccessToken,
        owner_id: &str,
        payload: &FaxPayload,
    ) -> Result<SendFaxResponse> {
        let url = self.outbox_url(owner_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.as_str())
            .json(payload)
            .send()
            .await?;

        Self::read_json(response).await
    }
}
