//! Integration tests for file operations.

mod helpers;

use axum::http::{StatusCode, header};
use serde_json::json;

#[tokio::test]
async fn test_health_reports_memory_backend() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["backend"], "memory");
    assert_eq!(response.body["database"], "connected");
}

#[tokio::test]
async fn test_upload_requires_authentication() {
    let app = helpers::TestApp::new().await;

    let response = app.upload("a.txt", "text/plain", b"hello", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");

    let response = app
        .upload("a.txt", "text/plain", b"hello", Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_returns_file_without_secrets() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice");

    let file = app.upload_text(&alice, "notes.txt").await;

    assert_eq!(file["name"], "notes.txt");
    assert_eq!(file["size_bytes"], 5);
    assert_eq!(file["mime_type"], "text/plain");
    assert_eq!(file["status"], "open");
    assert_eq!(file["owner_id"], alice.id.to_string());
    assert!(file.get("download_token").is_none());
    assert!(file.get("download_count").is_none());
    assert!(file.get("data").is_none());

    let url = file["download_url"].as_str().unwrap();
    assert!(url.starts_with("http://files.test/api/v1/files/download/"));
    let token = url.rsplit('/').next().unwrap();
    assert_eq!(token.len(), 24);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice");

    let response = app
        .request("POST", "/api/v1/files/upload", None, Some(&alice.token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_file_not_found() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/v1/files/00000000-0000-0000-0000-999999999999",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_files_with_and_without_owner_filter() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice");
    let bob = app.user("bob");
    app.upload_text(&alice, "a1.txt").await;
    app.upload_text(&alice, "a2.txt").await;
    app.upload_text(&bob, "b1.txt").await;

    let response = app.request("GET", "/api/v1/files", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_count"], 3);
    assert_eq!(response.body["page"], 1);
    assert_eq!(response.body["limit"], 30);
    let data = response.body["data"].as_array().unwrap();
    assert!(data.iter().all(|f| f["owner"]["email"].is_string()));

    let response = app
        .request(
            "GET",
            &format!("/api/v1/files?owner_id={}", alice.id),
            None,
            None,
        )
        .await;
    assert_eq!(response.body["total_count"], 2);
    let data = response.body["data"].as_array().unwrap();
    assert!(data.iter().all(|f| f["owner_id"] == alice.id.to_string()));
    assert!(data.iter().all(|f| f.get("owner").is_none()));

    let response = app
        .request(
            "GET",
            "/api/v1/files?owner_id=00000000-0000-0000-0000-000000000000&page=2&limit=2",
            None,
            None,
        )
        .await;
    assert_eq!(response.body["total_count"], 3);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_download_by_token_streams_payload() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice");
    let file = app.upload_text(&alice, "hello \"world\".txt").await;

    let response = app
        .request("GET", &app.download_path(&file), None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, b"hello");
    assert_eq!(response.header(header::CONTENT_TYPE), Some("text/plain"));
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        Some("inline; filename=\"hello _world_.txt\"")
    );
}

#[tokio::test]
async fn test_download_with_unknown_token_is_not_found() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/v1/files/download/nope", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_owner_can_update_or_delete() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice");
    let mallory = app.user("mallory");
    let file = app.upload_text(&alice, "a.txt").await;
    let path = format!("/api/v1/files/{}", file["id"].as_str().unwrap());

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "status": "blocked" })),
            Some(&mallory.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app
        .request("DELETE", &path, None, Some(&mallory.token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.body["status"], "open");

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "status": "blocked" })),
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "blocked");

    let response = app.request("DELETE", &path, None, Some(&alice.token)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_are_provisioned_from_tokens() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice");

    let response = app
        .request("GET", &format!("/api/v1/users/{}", alice.email), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    app.upload_text(&alice, "a.txt").await;

    let response = app
        .request("GET", &format!("/api/v1/users/{}", alice.email), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], alice.id.to_string());
    assert_eq!(response.body["name"], "alice");

    let response = app.request("GET", "/api/v1/users", None, None).await;
    assert_eq!(response.body["total_count"], 1);
}

#[tokio::test]
async fn test_list_files_with_huge_page_is_empty() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice");
    app.upload_text(&alice, "a.txt").await;

    let response = app
        .request(
            "GET",
            &format!("/api/v1/files?page={}", u64::MAX),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_count"], 1);
    assert!(response.body["data"].as_array().unwrap().is_empty());
}
