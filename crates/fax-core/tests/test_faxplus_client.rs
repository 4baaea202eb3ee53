//! Wire-level tests for the Fax.Plus client against a local mock server

use fax_core::config::FaxPlusConfig;
use fax_core::types::{AccessToken, FaxComment, FaxPayload};
use fax_core::{FaxError, FaxPlusClient, FaxProvider};
use httpmock::MockServer;
use mime_guess::mime;
use serde_json::json;
use std::io::Write;

fn client(server: &MockServer) -> FaxPlusClient {
    let config = FaxPlusConfig {
        base_url: server.base_url(),
        timeout_secs: 5,
        ..FaxPlusConfig::default()
    };
    FaxPlusClient::configure(&config).expect("client")
}

fn token() -> AccessToken {
    AccessToken::from_config(Some("test-token")).unwrap()
}

fn pdf_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"%PDF-1.4 test").unwrap();
    file
}

fn payload() -> FaxPayload {
    FaxPayload {
        from_number: "+41800000000".into(),
        to: vec!["+41790000000".into()],
        files: vec!["/storage/cover.pdf".into(), "/storage/doc.pdf".into()],
        comment: None,
        return_ids: true,
    }
}

#[tokio::test]
async fn test_upload_returns_remote_path() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/accounts/self/files")
            .header("authorization", "Bearer test-token")
            .body_includes("name=\"fax_file\"")
            .body_includes("Content-Type: application/pdf")
            .body_includes("%PDF-1.4 test");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"path":"/storage/doc.pdf"}"#);
    });

    let file = pdf_file();
    let uploaded = client(&server)
        .upload_file(&token(), "self", file.path(), &mime::APPLICATION_PDF)
        .await
        .expect("upload");

    mock.assert();
    assert_eq!(uploaded.path, "/storage/doc.pdf");
}

#[tokio::test]
async fn test_upload_sends_given_mime_type() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/accounts/self/files")
            .body_includes("Content-Type: image/png");
        then.status(200).body(r#"{"path":"/storage/scan.bin"}"#);
    });

    let file = pdf_file();
    client(&server)
        .upload_file(&token(), "self", file.path(), &mime::IMAGE_PNG)
        .await
        .expect("upload");
    mock.assert();
}

#[tokio::test]
async fn test_upload_error_keeps_provider_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST").path("/accounts/self/files");
        then.status(401).body(r#"{"error":"invalid_token","description":"expired"}"#);
    });

    let file = pdf_file();
    let err = client(&server)
        .upload_file(&token(), "self", file.path(), &mime::APPLICATION_PDF)
        .await
        .unwrap_err();

    mock.assert();
    match err {
        FaxError::ProviderApi { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"error":"invalid_token","description":"expired"}"#);
        }
        other => panic!("Expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upload_of_missing_file_makes_no_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST");
        then.status(200).body(r#"{"path":"/storage/x"}"#);
    });

    let err = client(&server)
        .upload_file(&token(), "self", std::path::Path::new("/nonexistent/doc.pdf"), &mime::APPLICATION_PDF)
        .await
        .unwrap_err();

    assert!(matches!(err, FaxError::Io(_)));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_send_fax_posts_payload_to_outbox() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/accounts/self/outbox")
            .header("authorization", "Bearer test-token")
            .json_body(json!({
                "from": "+41800000000",
                "to": ["+41790000000"],
                "files": ["/storage/cover.pdf", "/storage/doc.pdf"],
                "return_ids": true
            }));
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"ids":{"+41790000000":"a1b2c3"}}"#);
    });

    let response = client(&server)
        .send_fax(&token(), "self", &payload())
        .await
        .expect("send");

    mock.assert();
    assert_eq!(response.ids, Some(json!({"+41790000000": "a1b2c3"})));
    assert_eq!(response.status, None);
}

#[tokio::test]
async fn test_send_fax_includes_comment() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/accounts/self/outbox")
            .json_body_includes(r#"{"comment":{"text":"Dear Sir"}}"#);
        then.status(200).body("{}");
    });

    let mut with_comment = payload();
    with_comment.comment = Some(FaxComment { text: "Dear Sir".into(), tags: vec![] });

    client(&server)
        .send_fax(&token(), "self", &with_comment)
        .await
        .expect("send");
    mock.assert();
}

#[tokio::test]
async fn test_send_fax_error_keeps_provider_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/accounts/self/outbox");
        then.status(400).body("X");
    });

    let err = client(&server)
        .send_fax(&token(), "self", &payload())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Fax.Plus API error: X");
}

#[tokio::test]
async fn test_unparsable_success_body_is_a_json_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/accounts/self/files");
        then.status(200).body("not json");
    });

    let file = pdf_file();
    let err = client(&server)
        .upload_file(&token(), "self", file.path(), &mime::APPLICATION_PDF)
        .await
        .unwrap_err();

    assert!(matches!(err, FaxError::Json(_)));
}
