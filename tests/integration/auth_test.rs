//! Integration tests for caller identity resolution.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, mint, token_for};

fn ready_for(user_id: &str) -> serde_json::Value {
    json!({ "userId": user_id, "event": "project.file.ready", "originalName": "a.pdf" })
}

#[tokio::test]
async fn test_missing_identity_is_unauthenticated() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/notifications", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_trusted_header_identifies_caller() {
    let app = TestApp::new().await;
    app.deliver(ready_for("7")).await;

    let response = app
        .request_with_headers("GET", "/api/notifications", None, None, &[("x-user-id", "7")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 1);
}

#[tokio::test]
async fn test_trusted_header_wins_over_token() {
    let app = TestApp::new().await;
    app.deliver(ready_for("7")).await;

    let response = app
        .request_with_headers(
            "GET",
            "/api/notifications",
            None,
            Some(&token_for("8")),
            &[("x-user-id", "7")],
        )
        .await;
    assert_eq!(response.body["data"]["total"], 1);
}

#[tokio::test]
async fn test_blank_trusted_header_falls_back_to_token() {
    let app = TestApp::new().await;
    app.deliver(ready_for("7")).await;

    let response = app
        .request_with_headers(
            "GET",
            "/api/notifications",
            None,
            Some(&token_for("7")),
            &[("x-user-id", "  ")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 1);
}

#[tokio::test]
async fn test_expired_or_foreign_tokens_are_rejected() {
    let app = TestApp::new().await;

    let expired = mint(json!({
        "userId": "7",
        "exp": chrono::Utc::now().timestamp() - 3600,
    }));
    let response = app
        .request("GET", "/api/notifications", None, Some(&expired))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let foreign = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "userId": "7", "exp": chrono::Utc::now().timestamp() + 3600 }),
        &jsonwebtoken::EncodingKey::from_secret(b"some-other-secret"),
    )
    .expect("Failed to mint token");
    let response = app
        .request("GET", "/api/notifications", None, Some(&foreign))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/notifications", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_alternate_subject_claims() {
    let app = TestApp::new().await;
    app.deliver(ready_for("7")).await;
    let exp = chrono::Utc::now().timestamp() + 3600;

    for claims in [
        json!({ "id": 7, "exp": exp }),
        json!({ "sub": "7", "exp": exp }),
    ] {
        let response = app
            .request("GET", "/api/notifications", None, Some(&mint(claims)))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["total"], 1);
    }
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = TestApp::new().await;
    let token = token_for("7");
    let header = format!("bearer {token}");

    let response = app
        .request_with_headers(
            "GET",
            "/api/notifications",
            None,
            None,
            &[("Authorization", header.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_needs_a_credential_to_forward() {
    let app = TestApp::new().await;
    app.files_accept("f1").await;

    let response = app
        .request_with_headers(
            "POST",
            "/api/catalog",
            Some(json!({ "title": "T", "fileId": "f1" })),
            None,
            &[("x-user-id", "7")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.catalog.is_empty());
    assert_eq!(app.attach_calls().await, 0);
}
