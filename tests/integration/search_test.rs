//! Integration tests for case search.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

fn filenames(response: &helpers::TestResponse) -> Vec<String> {
    let mut names: Vec<String> = response.data()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["original_filename"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_blank_query_returns_nothing() {
    let app = helpers::TestApp::new();
    app.initialize(4).await;
    app.upload(4, "correspondence", "letter.pdf", "application/pdf", b"abc")
        .await;

    for uri in ["/api/cases/4/search", "/api/cases/4/search?q=%20%20"] {
        let response = app.request("GET", uri, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.data()["total"], 0);
    }
}

#[tokio::test]
async fn test_matches_filename_tag_and_category() {
    let app = helpers::TestApp::new();
    app.initialize(4).await;

    app.upload(4, "financial-statements", "Bank-Statement-Jan.pdf", "application/pdf", b"jan")
        .await;
    app.upload_with_query(
        4,
        "folder=financial-statements&filename=scan-001.png&tags=BANK",
        "image/png",
        b"png",
    )
    .await;
    app.upload_with_query(
        4,
        "folder=correspondence&filename=notes.txt&tags=banking",
        "text/plain",
        b"notes",
    )
    .await;
    app.upload_with_query(
        4,
        "folder=correspondence&filename=summary.txt&category=Banking%20Records",
        "text/plain",
        b"summary",
    )
    .await;

    let response = app.request("GET", "/api/cases/4/search?q=Bank", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["query"], "Bank");
    assert_eq!(response.data()["total"], 3);
    assert_eq!(
        filenames(&response),
        vec!["Bank-Statement-Jan.pdf", "scan-001.png", "summary.txt"]
    );
}

#[tokio::test]
async fn test_uncommitted_uploads_are_invisible() {
    let app = helpers::TestApp::new();
    app.initialize(4).await;
    app.upload(4, "correspondence", "bank-letter.pdf", "application/pdf", b"abc")
        .await;

    // Declares more bytes than it sends.
    let req = Request::builder()
        .method("POST")
        .uri("/api/cases/4/files?folder=correspondence&filename=bank-short.pdf")
        .header("Content-Type", "application/pdf")
        .header("Content-Length", 10)
        .header("X-Advisor-Id", helpers::ADVISOR)
        .body(Body::from("abc"))
        .unwrap();
    let short = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);

    let response = app.request("GET", "/api/cases/4/search?q=bank", None).await;
    assert_eq!(filenames(&response), vec!["bank-letter.pdf"]);
}

#[tokio::test]
async fn test_search_is_scoped_to_case() {
    let app = helpers::TestApp::new();
    app.initialize(4).await;
    app.initialize(5).await;
    app.upload(4, "correspondence", "bank-letter.pdf", "application/pdf", b"abc")
        .await;

    let other = app.request("GET", "/api/cases/5/search?q=bank", None).await;
    assert_eq!(other.status, StatusCode::OK);
    assert_eq!(other.data()["total"], 0);

    let own = app.request("GET", "/api/cases/4/search?q=bank", None).await;
    assert_eq!(own.data()["total"], 1);
}
