//! Integration tests for case initialization and folder operations.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let app = helpers::TestApp::new();

    let first = app.initialize(42).await;
    assert_eq!(first.status, StatusCode::OK);
    let roots = first.data().as_array().expect("roots").clone();
    assert_eq!(roots.len(), 7);
    assert_eq!(roots[0]["name"], "Correspondence");

    let second = app.initialize(42).await;
    assert_eq!(second.status, StatusCode::OK);
    let ids = |v: &[serde_json::Value]| -> Vec<String> {
        v.iter().map(|r| r["id"].as_str().unwrap().to_string()).collect()
    };
    assert_eq!(ids(&roots), ids(second.data().as_array().unwrap()));
}

#[tokio::test]
async fn test_duplicate_sibling_conflicts() {
    let app = helpers::TestApp::new();

    let created = app
        .request(
            "POST",
            "/api/cases/42/folders",
            Some(json!({ "parent": null, "name": "Correspondence" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["path"], "correspondence");

    let duplicate = app
        .request(
            "POST",
            "/api/cases/42/folders",
            Some(json!({ "parent": null, "name": "correspondence" })),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.error(), "CONFLICT");
}

#[tokio::test]
async fn test_nested_folders_and_breadcrumbs() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;

    let statements = app
        .request(
            "POST",
            "/api/cases/7/folders",
            Some(json!({ "parent": "financial-statements", "name": "Bank Statements" })),
        )
        .await;
    assert_eq!(statements.status, StatusCode::CREATED);
    assert_eq!(statements.data()["path"], "financial-statements/bank-statements");
    assert_eq!(statements.data()["depth"], 1);

    let year = app
        .request(
            "POST",
            "/api/cases/7/folders",
            Some(json!({ "parent": "/Financial Statements/bank statements/", "name": "2023" })),
        )
        .await;
    assert_eq!(year.status, StatusCode::CREATED);

    let crumbs = app
        .request(
            "GET",
            "/api/cases/7/breadcrumbs?path=financial-statements/bank-statements/2023",
            None,
        )
        .await;
    assert_eq!(crumbs.status, StatusCode::OK);
    assert_eq!(
        crumbs.data(),
        &json!([
            { "name": "Financial Statements", "path": "financial-statements" },
            { "name": "Bank Statements", "path": "financial-statements/bank-statements" },
            { "name": "2023", "path": "financial-statements/bank-statements/2023" },
        ])
    );

    let missing = app
        .request(
            "GET",
            "/api/cases/7/breadcrumbs?path=financial-statements/bank-statements/2024",
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_children_sorted() {
    let app = helpers::TestApp::new();
    app.initialize(7).await;
    for name in ["zeta", "Alpha", "beta"] {
        app.request(
            "POST",
            "/api/cases/7/folders",
            Some(json!({ "parent": "correspondence", "name": name })),
        )
        .await;
    }

    let children = app
        .request("GET", "/api/cases/7/folders?parent=correspondence", None)
        .await;
    assert_eq!(children.status, StatusCode::OK);
    let names: Vec<&str> = children
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
}

#[tokio::test]
async fn test_invalid_names_rejected() {
    let app = helpers::TestApp::new();
    for name in ["", "   ", "a/b", "..", "what?"] {
        let response = app
            .request("POST", "/api/cases/7/folders", Some(json!({ "name": name })))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "name {name:?}");
    }
}

#[tokio::test]
async fn test_depth_limit() {
    let app = helpers::TestApp::new();
    let mut parent: Option<String> = None;
    for level in 0..=5 {
        let response = app
            .request(
                "POST",
                "/api/cases/9/folders",
                Some(json!({ "parent": parent, "name": format!("level{level}") })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        parent = response.data()["path"].as_str().map(str::to_string);
    }

    let too_deep = app
        .request(
            "POST",
            "/api/cases/9/folders",
            Some(json!({ "parent": parent, "name": "level6" })),
        )
        .await;
    assert_eq!(too_deep.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cross_case_paths_are_not_found() {
    let app = helpers::TestApp::new();
    app.initialize(1).await;

    let other = app
        .request("GET", "/api/cases/2/folders/resolve?path=correspondence", None)
        .await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);

    let own = app
        .request("GET", "/api/cases/1/folders/resolve?path=Correspondence", None)
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.data()["path"], "correspondence");
}

#[tokio::test]
async fn test_delete_folder_requires_force_when_not_empty() {
    let app = helpers::TestApp::new();
    app.initialize(3).await;
    app.request(
        "POST",
        "/api/cases/3/folders",
        Some(json!({ "parent": "court-documents", "name": "Hearings" })),
    )
    .await;

    let refused = app
        .request("DELETE", "/api/cases/3/folders?path=court-documents", None)
        .await;
    assert_eq!(refused.status, StatusCode::CONFLICT);

    let forced = app
        .request(
            "DELETE",
            "/api/cases/3/folders?path=court-documents&force=true",
            None,
        )
        .await;
    assert_eq!(forced.status, StatusCode::OK);
    assert_eq!(forced.data()["removed_folders"], 2);

    let stats = app.request("GET", "/api/cases/3/stats", None).await;
    assert_eq!(stats.data()["folder_count"], 6);
}

#[tokio::test]
async fn test_tree_nests_children() {
    let app = helpers::TestApp::new();
    let empty = app.request("GET", "/api/cases/5/tree", None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.data()["total_folders"], 0);

    app.initialize(5).await;
    app.request(
        "POST",
        "/api/cases/5/folders",
        Some(json!({ "parent": "identification", "name": "Passport" })),
    )
    .await;

    let tree = app.request("GET", "/api/cases/5/tree", None).await;
    assert_eq!(tree.data()["total_folders"], 8);
    let identification = tree.data()["roots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["path"] == "identification")
        .expect("identification root");
    assert_eq!(identification["children"][0]["name"], "Passport");
}

#[tokio::test]
async fn test_invalid_case_id() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/cases/abc/stats", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let unknown = app.request("GET", "/api/cases/77/stats", None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}
