//! Integration tests for uploads, downloads, and file metadata.

mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_upload_list_download() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;

    let uploaded = app
        .upload(7, "correspondence", "letter.pdf", "application/pdf", b"%PDF-1.7 hello")
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED);
    assert_eq!(uploaded.data()["original_filename"], "letter.pdf");
    assert_eq!(uploaded.data()["size_bytes"], 14);
    assert_eq!(uploaded.data()["uploaded_by"], helpers::ADVISOR);
    assert!(uploaded.data().get("stored_object_key").is_none());
    let id = uploaded.data()["id"].as_str().unwrap().to_string();

    let listed = app
        .request("GET", "/api/cases/7/files?folder=correspondence", None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.data().as_array().unwrap().len(), 1);

    let (status, bytes) = app
        .get_bytes(&format!("/api/cases/7/files/{id}/content"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..], b"%PDF-1.7 hello");

    let stats = app.request("GET", "/api/cases/7/stats", None).await;
    assert_eq!(stats.data()["total_files"], 1);
    assert_eq!(stats.data()["total_size_bytes"], 14);
    assert_eq!(stats.data()["folder_count"], 7);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;

    let response = app
        .upload(7, "correspondence", "big.pdf", "application/pdf", vec![b'x'; 2048])
        .await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error(), "PAYLOAD_TOO_LARGE");

    let stats = app.request("GET", "/api/cases/7/stats", None).await;
    assert_eq!(stats.data()["total_files"], 0);
}

#[tokio::test]
async fn test_upload_validation() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;

    let bad_mime = app
        .upload(7, "correspondence", "run.exe", "application/x-msdownload", b"MZ")
        .await;
    assert_eq!(bad_mime.status, StatusCode::BAD_REQUEST);

    let empty = app
        .upload(7, "correspondence", "empty.pdf", "application/pdf", b"")
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let no_folder = app
        .upload(7, "missing", "a.pdf", "application/pdf", b"abc")
        .await;
    assert_eq!(no_folder.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_requires_advisor() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/cases/7/files?folder=correspondence&filename=a.pdf")
        .header("Content-Type", "application/pdf")
        .header("Content-Length", 3)
        .body(axum::body::Body::from("abc"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), req)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blob_failure_is_service_unavailable() {
    let app = helpers::TestApp::with_blobs(Arc::new(helpers::FailingBlobStore));
    app.initialize(7).await;

    let response = app
        .upload(7, "correspondence", "a.pdf", "application/pdf", b"abc")
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);

    let listed = app
        .request("GET", "/api/cases/7/files?folder=correspondence", None)
        .await;
    assert!(listed.data().as_array().unwrap().is_empty());

    let sweep = app.request("POST", "/api/maintenance/sweep", None).await;
    assert_eq!(sweep.status, StatusCode::OK);
    assert_eq!(sweep.data()["reclaimed"], 1);

    let health = app.request("GET", "/api/health", None).await;
    assert_eq!(health.data()["status"], "degraded");
}

#[tokio::test]
async fn test_tags_and_category() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;
    let uploaded = app
        .upload_with_query(
            7,
            "folder=financial-statements&filename=jan.pdf&tags=bank,January&category=Statements&generated=true",
            "application/pdf",
            b"abc",
        )
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED);
    assert_eq!(uploaded.data()["tags"], json!(["bank", "January"]));
    assert_eq!(uploaded.data()["is_generated"], true);
    let id = uploaded.data()["id"].as_str().unwrap().to_string();

    let tagged = app
        .request(
            "PUT",
            &format!("/api/cases/7/files/{id}/tags"),
            Some(json!({ "tags": [" urgent ", "URGENT", "court"] })),
        )
        .await;
    assert_eq!(tagged.status, StatusCode::OK);
    assert_eq!(tagged.data()["tags"], json!(["urgent", "court"]));

    let cleared = app
        .request(
            "PUT",
            &format!("/api/cases/7/files/{id}/category"),
            Some(json!({ "category": "  " })),
        )
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert!(cleared.data()["document_category"].is_null());

    let stats = app.request("GET", "/api/cases/7/stats", None).await;
    assert_eq!(stats.data()["generated_files"], 1);
}

#[tokio::test]
async fn test_unknown_file() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;

    let missing = app
        .request(
            "GET",
            "/api/cases/7/files/00000000-0000-4000-8000-000000000000",
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app.request("GET", "/api/cases/7/files/not-a-uuid", None).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_file_of_other_case_is_not_found() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;
    app.initialize(8).await;
    let uploaded = app
        .upload(7, "correspondence", "letter.pdf", "application/pdf", b"abc")
        .await;
    let id = uploaded.data()["id"].as_str().unwrap().to_string();

    let other = app
        .request("GET", &format!("/api/cases/8/files/{id}"), None)
        .await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_folder_listing_is_newest_first() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;
    for name in ["first.pdf", "second.pdf", "third.pdf", "fourth.pdf"] {
        let uploaded = app
            .upload(7, "correspondence", name, "application/pdf", b"abc")
            .await;
        assert_eq!(uploaded.status, StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/cases/7/files?folder=correspondence&filename=short.pdf")
        .header("Content-Type", "application/pdf")
        .header("Content-Length", 10)
        .header("X-Advisor-Id", helpers::ADVISOR)
        .body(axum::body::Body::from("abc"))
        .unwrap();
    let short = tower::ServiceExt::oneshot(app.router.clone(), req)
        .await
        .unwrap();
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);

    let listed = app
        .request("GET", "/api/cases/7/files?folder=correspondence", None)
        .await;
    let names: Vec<&str> = listed
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["original_filename"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["fourth.pdf", "third.pdf", "second.pdf", "first.pdf"]);
}
