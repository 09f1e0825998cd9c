//! Integration tests for the catalog write saga over HTTP.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, closed_port_url, token_for};

#[tokio::test]
async fn test_create_attaches_file_and_commits() {
    let app = TestApp::new().await;
    app.files_accept("f1").await;
    let token = token_for("7");

    let response = app
        .request(
            "POST",
            "/api/catalog",
            Some(json!({
                "title": "T",
                "fileId": "f1",
                "courseUnitIds": ["3"],
                "tags": ["web", "rust", " rust "],
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["entry"]["fileId"], "f1");
    assert_eq!(data["entry"]["courseUnitId"], 3);
    assert_eq!(data["entry"]["creatorId"], "7");
    assert_eq!(data["entry"]["tags"], json!(["rust", "web"]));

    let states: Vec<&str> = data["transitions"]
        .as_array()
        .expect("transitions array")
        .iter()
        .filter_map(|t| t["to"].as_str())
        .collect();
    assert_eq!(states, vec!["persisted", "attached", "committed"]);

    let id = data["entry"]["id"].as_i64().expect("entry id");
    let fetched = app
        .request("GET", &format!("/api/catalog/{id}"), None, Some(&token))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["fileId"], "f1");
}

#[tokio::test]
async fn test_create_forwards_bearer_credential() {
    let app = TestApp::new().await;
    let token = token_for("7");
    let id = app.create_entry(&token, "f9").await;

    let requests = app
        .files
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1);

    let auth = requests[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .expect("authorization forwarded");
    assert_eq!(auth, format!("Bearer {token}"));

    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("attach body is JSON");
    assert_eq!(body["projectId"], id.to_string());
}

#[tokio::test]
async fn test_create_rolls_back_when_attach_fails() {
    let app = TestApp::new().await;
    app.files_respond(500, json!({ "detail": "File must be READY to attach" }))
        .await;

    let response = app
        .request(
            "POST",
            "/api/catalog",
            Some(json!({ "title": "T", "fileId": "f1", "courseUnitIds": ["3"] })),
            Some(&token_for("7")),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "UPSTREAM_FAILURE");
    assert_eq!(response.body["message"], "File must be READY to attach");
    assert!(app.catalog.is_empty(), "compensation should remove the row");

    let fetched = app
        .request("GET", "/api/catalog/1", None, Some(&token_for("7")))
        .await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rolls_back_when_attach_times_out() {
    let app = TestApp::new().await;
    let bound = app.config.services.attach_timeout_ms;
    app.files_stall(Duration::from_millis(bound * 4)).await;

    let response = app
        .request(
            "POST",
            "/api/catalog",
            Some(json!({ "title": "T", "fileId": "f1", "tags": ["slow"] })),
            Some(&token_for("7")),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY, "{:?}", response.body);
    assert_eq!(response.body["error"], "UPSTREAM_FAILURE");
    assert!(app.catalog.is_empty(), "timed-out attach must leave no row");
}

#[tokio::test]
async fn test_create_rolls_back_when_files_service_is_unreachable() {
    let app = TestApp::with_files_url(closed_port_url()).await;

    let response = app
        .request(
            "POST",
            "/api/catalog",
            Some(json!({ "title": "T", "fileId": "f1", "courseUnitIds": ["3"] })),
            Some(&token_for("7")),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY, "{:?}", response.body);
    assert_eq!(response.body["error"], "UPSTREAM_FAILURE");
    assert!(app.catalog.is_empty(), "unreachable files service must leave no row");
}

#[tokio::test]
async fn test_create_rejects_bad_input_before_any_side_effect() {
    let app = TestApp::new().await;
    let token = token_for("7");

    let missing_file = app
        .request("POST", "/api/catalog", Some(json!({ "title": "T" })), Some(&token))
        .await;
    assert_eq!(missing_file.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_file.body["error"], "VALIDATION_ERROR");

    let blank_title = app
        .request(
            "POST",
            "/api/catalog",
            Some(json!({ "title": "   ", "fileId": "f1" })),
            Some(&token),
        )
        .await;
    assert_eq!(blank_title.status, StatusCode::BAD_REQUEST);

    let bad_unit = app
        .request(
            "POST",
            "/api/catalog",
            Some(json!({ "title": "T", "fileId": "f1", "courseUnitIds": ["abc"] })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_unit.status, StatusCode::BAD_REQUEST);

    let two_units = app
        .request(
            "POST",
            "/api/catalog",
            Some(json!({ "title": "T", "fileId": "f1", "courseUnitIds": ["1", "2"] })),
            Some(&token),
        )
        .await;
    assert_eq!(two_units.status, StatusCode::BAD_REQUEST);

    assert!(app.catalog.is_empty());
    assert_eq!(app.attach_calls().await, 0);
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/catalog",
            Some(json!({ "title": 42, "fileId": "f1" })),
            Some(&token_for("7")),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_by_non_owner_is_forbidden() {
    let app = TestApp::new().await;
    let owner = token_for("7");
    let id = app.create_entry(&owner, "f1").await;
    let uri = format!("/api/catalog/{id}");

    let before = app.request("GET", &uri, None, Some(&owner)).await;

    let response = app
        .request(
            "PATCH",
            &uri,
            Some(json!({ "title": "Hijacked" })),
            Some(&token_for("8")),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let after = app.request("GET", &uri, None, Some(&owner)).await;
    assert_eq!(before.body, after.body);
}

#[tokio::test]
async fn test_non_owner_without_credential_is_forbidden_not_unauthenticated() {
    let app = TestApp::new().await;
    let owner = token_for("7");
    let id = app.create_entry(&owner, "f1").await;
    let uri = format!("/api/catalog/{id}");
    let calls_before = app.attach_calls().await;

    let response = app
        .request_with_headers(
            "PATCH",
            &uri,
            Some(json!({ "fileId": "f9" })),
            None,
            &[("x-user-id", "8")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN, "{:?}", response.body);

    let missing = app
        .request_with_headers(
            "PATCH",
            "/api/catalog/999",
            Some(json!({ "fileId": "f9" })),
            None,
            &[("x-user-id", "8")],
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(app.attach_calls().await, calls_before);
}

#[tokio::test]
async fn test_update_leaves_entry_unchanged_when_attach_fails() {
    let app = TestApp::new().await;
    let owner = token_for("7");
    let id = app.create_entry(&owner, "f1").await;
    let uri = format!("/api/catalog/{id}");
    let before = app.request("GET", &uri, None, Some(&owner)).await;

    app.files_respond(409, json!({ "error": "File already attached" }))
        .await;

    let response = app
        .request(
            "PATCH",
            &uri,
            Some(json!({ "title": "New title", "fileId": "f2", "tags": ["x"] })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["message"], "File already attached");

    let after = app.request("GET", &uri, None, Some(&owner)).await;
    assert_eq!(after.body["data"]["fileId"], "f1");
    assert_eq!(before.body, after.body);
}

#[tokio::test]
async fn test_update_attaches_new_file_then_commits() {
    let app = TestApp::new().await;
    let owner = token_for("7");
    let id = app.create_entry(&owner, "f1").await;
    app.files_accept("f2").await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/catalog/{id}"),
            Some(json!({ "fileId": "f2", "courseUnitIds": [] })),
            Some(&owner),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["entry"]["fileId"], "f2");
    assert_eq!(data["entry"]["title"], "Seed");
    assert!(data["entry"]["courseUnitId"].is_null());

    let states: Vec<&str> = data["transitions"]
        .as_array()
        .expect("transitions array")
        .iter()
        .filter_map(|t| t["to"].as_str())
        .collect();
    assert_eq!(states, vec!["attached", "committed"]);
}

#[tokio::test]
async fn test_update_without_file_skips_attach() {
    let app = TestApp::new().await;
    let owner = token_for("7");
    let id = app.create_entry(&owner, "f1").await;
    let calls_after_create = app.attach_calls().await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/catalog/{id}"),
            Some(json!({ "title": "Renamed", "visibility": "PRIVATE" })),
            Some(&owner),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["entry"]["title"], "Renamed");
    assert_eq!(response.body["data"]["entry"]["visibility"], "PRIVATE");
    assert_eq!(app.attach_calls().await, calls_after_create);
}

#[tokio::test]
async fn test_delete_requires_owner() {
    let app = TestApp::new().await;
    let owner = token_for("7");
    let id = app.create_entry(&owner, "f1").await;
    let uri = format!("/api/catalog/{id}");

    let denied = app.request("DELETE", &uri, None, Some(&token_for("8"))).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(app.catalog.len(), 1);

    let deleted = app.request("DELETE", &uri, None, Some(&owner)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"]["deleted"], true);

    let gone = app.request("GET", &uri, None, Some(&owner)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", "/api/catalog/abc", None, Some(&token_for("7")))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
