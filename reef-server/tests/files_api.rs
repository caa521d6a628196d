//! Signed file uploads: two-step handshake, signature checks, serving

mod common;

use http::StatusCode;
use serde_json::{Value, json};

use common::{Session, TestApp, spawn_app};

/// Base URL the signer embeds in upload URLs (test config default)
const BASE_URL: &str = "http://localhost:3000";

/// Ask for an upload ticket; returns (file id, content path with query)
async fn request_ticket(
    app: &TestApp,
    session: &Session,
    name: &str,
    size: i64,
) -> (i64, String, Value) {
    let res = app
        .post(
            "/api/files",
            Some(session),
            json!({ "file_name": name, "content_type": "image/png", "size": size }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    let id = res.body["file"]["id"].as_i64().expect("file id");
    let url = res.body["upload"]["url"].as_str().expect("upload url");
    let path = url
        .strip_prefix(BASE_URL)
        .expect("upload url not under base")
        .to_string();
    (id, path, res.body.clone())
}

#[tokio::test]
async fn test_signed_upload_roundtrip() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let (id, path, ticket) = request_ticket(&app, &admin, "logo.png", 8).await;
    assert_eq!(ticket["file"]["status"], "PENDING");
    // storage location is server-internal
    assert!(ticket["file"].get("storage_key").is_none());
    assert!(ticket["upload"]["expires_at"].as_i64().is_some());

    let uploaded = app.put_bytes(&path, b"12345678".to_vec()).await;
    assert_eq!(uploaded.status, StatusCode::OK, "{}", uploaded.body);
    assert_eq!(uploaded.body["status"], "UPLOADED");
    assert_eq!(uploaded.body["size"], 8);
    assert!(uploaded.body["uploaded_at"].as_i64().is_some());

    let (status, headers, bytes) = app.get_raw(&format!("/api/files/{id}/content")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"12345678");
    assert_eq!(
        headers.get("content-type").and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    assert_eq!(
        headers.get("cache-control").and_then(|v| v.to_str().ok()),
        Some("public, max-age=3600")
    );

    let listing = app.get("/api/files", Some(&admin)).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body.as_array().expect("files").len(), 1);

    let deleted = app.delete(&format!("/api/files/{id}"), Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let (status, _, _) = app.get_raw(&format!("/api/files/{id}/content")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejects_tampered_signature() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let (_, path, _) = request_ticket(&app, &admin, "doc.pdf", 4).await;

    // forged signature
    let (base, _) = path.split_once("sig=").expect("sig param");
    let forged = format!("{base}sig=deadbeef");
    let res = app.put_bytes(&forged, b"data".to_vec()).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 7003);

    // shifted expiry invalidates the signature too
    let shifted = shift_expires(&path, 60_000);
    let res = app.put_bytes(&shifted, b"data".to_vec()).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 7003);

    // the untouched ticket still works after the rejected attempts
    let res = app.put_bytes(&path, b"data".to_vec()).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
}

/// Move the expires query value by `delta_ms`, keeping the original sig
fn shift_expires(path: &str, delta_ms: i64) -> String {
    let (prefix, rest) = path.split_once("expires=").expect("expires param");
    let (value, suffix) = rest.split_once('&').expect("more params");
    let shifted: i64 = value.parse::<i64>().expect("expires number") + delta_ms;
    format!("{prefix}expires={shifted}&{suffix}")
}

#[tokio::test]
async fn test_pending_file_does_not_serve() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let (id, _, _) = request_ticket(&app, &admin, "pending.png", 4).await;

    let (status, _, _) = app.get_raw(&format!("/api/files/{id}/content")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_upload_body_must_fit_declared_size() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let (id, path, _) = request_ticket(&app, &admin, "small.bin", 4).await;

    let res = app.put_bytes(&path, b"way too many bytes".to_vec()).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), 7002);

    // nothing was stored
    let record = app.get(&format!("/api/files/{id}"), Some(&admin)).await;
    assert_eq!(record.body["status"], "PENDING");
}

#[tokio::test]
async fn test_declared_size_bounds() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    for size in [0i64, -1, 21 * 1024 * 1024] {
        let res = app
            .post(
                "/api/files",
                Some(&admin),
                json!({ "file_name": "odd.bin", "content_type": "application/octet-stream", "size": size }),
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "size {size}");
        assert_eq!(res.code(), 7002);
    }
}

#[tokio::test]
async fn test_upload_retry_overwrites() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let (id, path, _) = request_ticket(&app, &admin, "retry.bin", 8).await;

    let first = app.put_bytes(&path, b"12345678".to_vec()).await;
    assert_eq!(first.status, StatusCode::OK);

    // a retry within the signature window replaces the bytes
    let second = app.put_bytes(&path, b"abcd".to_vec()).await;
    assert_eq!(second.status, StatusCode::OK, "{}", second.body);
    assert_eq!(second.body["size"], 4);

    let (_, _, bytes) = app.get_raw(&format!("/api/files/{id}/content")).await;
    assert_eq!(bytes, b"abcd");
}

#[tokio::test]
async fn test_file_records_are_guarded() {
    let app = spawn_app().await;

    let res = app
        .post(
            "/api/files",
            None,
            json!({ "file_name": "a.png", "content_type": "image/png", "size": 1 }),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.get("/api/files", None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.delete("/api/files/1", None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}
