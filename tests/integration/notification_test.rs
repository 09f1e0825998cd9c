//! Integration tests for event ingestion and the notification read API.

use axum::http::StatusCode;
use serde_json::{Value, json};

use projecthub_worker::Disposition;

use crate::helpers::{TestApp, token_for};

fn file_ready(user_id: &str, name: &str, entry_id: &str) -> Value {
    json!({
        "subjectUserId": user_id,
        "event": "project.file.ready",
        "originalName": name,
        "entryId": entry_id,
    })
}

#[tokio::test]
async fn test_file_ready_event_becomes_notification() {
    let app = TestApp::new().await;

    let disposition = app.deliver(file_ready("7", "a.pdf", "5")).await;
    assert_eq!(disposition, Disposition::Ack);

    let response = app
        .request("GET", "/api/notifications", None, Some(&token_for("7")))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let page = &response.body["data"];
    assert_eq!(page["total"], 1);
    let item = &page["items"][0];
    assert_eq!(item["userId"], "7");
    assert_eq!(item["isRead"], false);
    let message = item["message"].as_str().expect("message");
    assert!(message.contains("a.pdf"));
    assert!(message.contains('5'));

    let other = app
        .request("GET", "/api/notifications", None, Some(&token_for("8")))
        .await;
    assert_eq!(other.body["data"]["total"], 0);
}

#[tokio::test]
async fn test_unrelated_event_is_acked_without_effect() {
    let app = TestApp::new().await;

    assert_eq!(app.deliver(json!({ "event": "unrelated" })).await, Disposition::Ack);
    assert_eq!(
        app.deliver(json!({ "userId": "7", "event": "file.deleted" })).await,
        Disposition::Ack
    );

    assert!(app.notifications.all().is_empty());
}

#[tokio::test]
async fn test_redelivery_creates_duplicate_rows() {
    let app = TestApp::new().await;
    let event = json!({
        "userId": "7",
        "event": "project.file.ready",
        "originalName": "a.pdf",
        "projectId": "5",
        "eventId": "evt-1",
    });

    app.deliver(event.clone()).await;
    app.deliver(event).await;

    assert_eq!(app.notifications.all().len(), 2);
}

#[tokio::test]
async fn test_mark_read_twice_is_a_no_op() {
    let app = TestApp::new().await;
    let token = token_for("7");
    app.deliver(file_ready("7", "a.pdf", "5")).await;
    let id = app.notifications.all()[0].id;
    let uri = format!("/api/notifications/{id}/read");

    let first = app.request("POST", &uri, None, Some(&token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["isRead"], true);

    let second = app.request("POST", &uri, None, Some(&token)).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);

    let rows = app.notifications.all();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_read);
}

#[tokio::test]
async fn test_mark_read_of_foreign_notification_is_not_found() {
    let app = TestApp::new().await;
    app.deliver(file_ready("7", "a.pdf", "5")).await;
    let id = app.notifications.all()[0].id;

    let response = app
        .request(
            "POST",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(&token_for("8")),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!app.notifications.all()[0].is_read);
}

#[tokio::test]
async fn test_list_paginates_and_filters_unread() {
    let app = TestApp::new().await;
    let token = token_for("7");
    for name in ["a.pdf", "b.pdf", "c.pdf"] {
        app.deliver(file_ready("7", name, "5")).await;
    }

    let first_page = app
        .request("GET", "/api/notifications?limit=2", None, Some(&token))
        .await;
    let page = &first_page.body["data"];
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["total"], 3);
    assert_eq!(page["hasMore"], true);

    let id = app.notifications.all()[0].id;
    app.request(
        "POST",
        &format!("/api/notifications/{id}/read"),
        None,
        Some(&token),
    )
    .await;

    let unread = app
        .request(
            "GET",
            "/api/notifications?unread=true&limit=10&offset=0",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(unread.body["data"]["total"], 2);
    assert_eq!(unread.body["data"]["hasMore"], false);
}
