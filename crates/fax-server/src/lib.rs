//! axum application for the fax relay

pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use fax_core::{FaxConfig, FaxError, FaxPlusClient, FaxSubmissionWorkflow, Result, ServerConfig, SubmissionSettings};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub use routes::AppState;

/// Build the client and workflow once for the whole process
pub fn build_state(config: &FaxConfig) -> Result<AppState> {
    let client = FaxPlusClient::configure(&config.faxplus)?;
    let settings = SubmissionSettings::from(&config.faxplus);

    if settings.access_token.is_none() {
        log::warn!("No Fax.Plus access token configured; fax requests will be rejected");
    }
    log::info!(
        "Fax.Plus client configured for {} (owner '{}', cover letters as {:?})",
        client.base_url(),
        settings.owner_id,
        settings.cover_letter_mode
    );

    Ok(AppState {
        workflow: Arc::new(FaxSubmissionWorkflow::new(client, settings)),
    })
}

/// Only the configured origin may call the API, with credentials;
/// other origins get no `Access-Control-Allow-Origin` header
pub fn cors_layer(server: &ServerConfig) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(server.allowed_origin.trim()).map_err(|e| {
        FaxError::Config(format!("Invalid allowed_origin '{}': {}", server.allowed_origin, e))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn app(state: AppState, server: &ServerConfig) -> Result<Router> {
    Ok(Router::new()
        .route("/send-fax/", post(routes::send_fax))
        .route("/send-fax", post(routes::send_fax))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors_layer(server)?)
        .with_state(state))
}
