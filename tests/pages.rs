//! Human-facing HTML views.

use axum::http::StatusCode;

mod common;
use common::*;

#[tokio::test]
async fn test_home_lists_newest_first() {
    let app = app();
    seed(&app, "Older", "older", "2024-03-01T10:00:00Z", &[]);
    seed(&app, "Newer", "newer", "2024-03-02T10:00:00Z", &[]);

    let res = get(&app.router, "/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.header("content-type").unwrap().starts_with("text/html"));
    assert!(res.body.contains("<title>Test Blog</title>"));

    let newer = res.body.find("Newer").unwrap();
    let older = res.body.find("Older").unwrap();
    assert!(newer < older);
}

#[tokio::test]
async fn test_empty_blog_home_still_renders() {
    let app = app();
    let res = get(&app.router, "/").await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_paging() {
    let app = app();
    seed(&app, "One", "one", "2024-03-01T10:00:00Z", &[]);
    seed(&app, "Two", "two", "2024-03-02T10:00:00Z", &[]);
    seed(&app, "Three", "three", "2024-03-03T10:00:00Z", &[]);

    let res = get(&app.router, "/page/2").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("One"));
    assert!(!res.body.contains("Three"));
    assert!(res.body.contains(r#"href="http://blog.test/page/1""#));

    assert_eq!(get(&app.router, "/page/3").await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app.router, "/page/0").await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app.router, "/page/two").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_huge_page_number_is_not_found() {
    let app = app();
    seed(&app, "One", "one", "2024-03-01T10:00:00Z", &[]);

    let res = get(&app.router, "/page/18446744073709551615").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tag_archive() {
    let app = app();
    seed(&app, "Tagged", "tagged", "2024-03-01T10:00:00Z", &["rust"]);
    seed(&app, "Plain", "plain", "2024-03-02T10:00:00Z", &[]);

    let res = get(&app.router, "/tag/rust").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("<title>rust | Test Blog</title>"));
    assert!(res.body.contains("Tagged"));
    assert!(!res.body.contains("Plain"));

    let res = get(&app.router, "/tag/go").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.body.contains("/tag/go"));
}

#[tokio::test]
async fn test_date_archives() {
    let app = app();
    seed(&app, "March", "march", "2024-03-05T10:00:00Z", &[]);
    seed(&app, "April", "april", "2024-04-01T10:00:00Z", &[]);

    let res = get(&app.router, "/2024/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("<title>2024 | Test Blog</title>"));
    assert!(res.body.contains("March") && res.body.contains("April"));

    let res = get(&app.router, "/2024/03/").await;
    assert!(res.body.contains("<title>2024 March | Test Blog</title>"));
    assert!(!res.body.contains("April"));

    let res = get(&app.router, "/2024/03/05/").await;
    assert!(res.body.contains("<title>2024 March 5 | Test Blog</title>"));

    assert_eq!(get(&app.router, "/2023/").await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app.router, "/2024/13/").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_entry_page() {
    let app = app();
    seed(&app, "Fish & Chips", "fish", "2024-03-05T10:00:00Z", &[]);

    let res = get(&app.router, "/2024/03/05/fish").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("<title>Fish &amp; Chips | Test Blog</title>"));
    assert!(res.body.contains("<p>Fish & Chips</p>"));

    let res = get(&app.router, "/2024/03/06/fish").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_path_escaped_in_404() {
    let app = app();

    let res = get(&app.router, "/no/such/a&b?x=1").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.body.contains("/no/such/a&amp;b?x=1"));
}

#[tokio::test]
async fn test_head_served_by_get_routes() {
    let app = app();
    let request = axum::http::Request::head("/service")
        .body(axum::body::Body::empty())
        .unwrap();
    assert_eq!(send(&app.router, request).await.status, StatusCode::OK);
}
