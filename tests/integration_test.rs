// Integration tests for Strava Token
//
// These tests drive the full load -> check -> refresh -> save flow against
// a real token file and a mock token endpoint.

use mockito::{Matcher, ServerGuard};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use strava_token::auth::{RefreshClient, TokenManager, TokenStore};
use strava_token::error::AuthError;

// ==================================================================================================
// Test Helpers
// ==================================================================================================

/// Token file as written by hand after the initial authorization grant
const TOKEN_FILE: &str = r#"{
    "token_type": "Bearer",
    "expires_at": 100,
    "expires_in": 21600,
    "refresh_token": "R1",
    "access_token": "A1",
    "athlete": {"id": 134815, "username": "marianne_t"},
    "client_id": 12345,
    "client_secret": "s3cr3t"
}
"#;

fn write_token_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("strava_tokens.json");
    std::fs::write(&path, TOKEN_FILE).unwrap();
    path
}

fn manager_for(path: &Path, server: &ServerGuard) -> TokenManager {
    let client = RefreshClient::new(format!("{}/api/v3/oauth/token", server.url()), None).unwrap();
    TokenManager::new(TokenStore::new(path), client)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ==================================================================================================
// Scenarios
// ==================================================================================================

#[tokio::test]
async fn test_valid_token_returned_without_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v3/oauth/token")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_token_file(&dir);
    let manager = manager_for(&path, &server);

    let token = manager.get_access_token_at(50).await.unwrap();

    assert_eq!(token, "A1");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), TOKEN_FILE);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_expired_token_refreshed_and_persisted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v3/oauth/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("client_id".into(), "12345".into()),
            Matcher::UrlEncoded("client_secret".into(), "s3cr3t".into()),
            Matcher::UrlEncoded("refresh_token".into(), "R1".into()),
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "token_type": "Bearer",
                "access_token": "A2",
                "expires_at": 9999,
                "expires_in": 21600,
                "refresh_token": "R2"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_token_file(&dir);
    let manager = manager_for(&path, &server);

    let token = manager.get_access_token_at(200).await.unwrap();
    assert_eq!(token, "A2");
    mock.assert_async().await;

    let stored = read_json(&path);
    assert_eq!(stored["access_token"], json!("A2"));
    assert_eq!(stored["refresh_token"], json!("R2"));
    assert_eq!(stored["expires_at"], json!(9999));
    assert_eq!(stored["client_id"], json!(12345));
    assert_eq!(stored["client_secret"], json!("s3cr3t"));

    // Keys outside the record survive the rewrite
    assert_eq!(stored["athlete"]["id"], json!(134815));
    assert_eq!(stored["token_type"], json!("Bearer"));
}

#[tokio::test]
async fn test_refreshed_token_used_on_next_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v3/oauth/token")
        .with_status(200)
        .with_body(r#"{"access_token":"A2","refresh_token":"R2","expires_at":9999}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_token_file(&dir);
    let manager = manager_for(&path, &server);

    assert_eq!(manager.get_access_token_at(200).await.unwrap(), "A2");
    assert_eq!(manager.get_access_token_at(300).await.unwrap(), "A2");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_leaves_file_untouched() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v3/oauth/token")
        .with_status(401)
        .with_body(r#"{"message":"Authorization Error","errors":[{"resource":"Application","field":"","code":"invalid"}]}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_token_file(&dir);
    let before = std::fs::read(&path).unwrap();
    let manager = manager_for(&path, &server);

    let err = manager.get_access_token_at(200).await.unwrap_err();

    match &err {
        AuthError::AuthServer { status, body } => {
            assert_eq!(*status, 401);
            assert!(body.contains("Authorization Error"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn test_malformed_response_leaves_file_untouched() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v3/oauth/token")
        .with_status(200)
        .with_body(r#"{"access_token":"A2"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_token_file(&dir);
    let before = std::fs::read(&path).unwrap();
    let manager = manager_for(&path, &server);

    let err = manager.get_access_token_at(200).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidResponse(_)));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn test_malformed_store_is_storage_error() {
    let server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strava_tokens.json");
    std::fs::write(&path, r#"{"client_id": 12345, "client_secret": "s3cr3t"}"#).unwrap();

    let err = manager_for(&path, &server)
        .get_access_token_at(0)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Storage { .. }));
}
