//! AtomPub collection and member behavior, driven in-process.

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use chrono::{TimeDelta, Utc};

use atomos::atom::{ENTRY_CONTENT_TYPE, FEED_CONTENT_TYPE, SERVICE_CONTENT_TYPE};
use atomos::blog::{DateScope, EntryRepository};
use atomos::security::Credential;

mod common;
use common::*;

const PUBLISHED: &str = "2024-03-05T14:05:00Z";

#[tokio::test]
async fn test_post_without_wsse_is_rejected_before_repository() {
    let app = app();
    let request = Request::post("/atom/")
        .body(Body::from(entry_xml("Hello", "<p>hi</p>", None, &[])))
        .unwrap();

    let res = send(&app.router, request).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, "Authorization Required");
    assert_eq!(app.repository.calls(), 0);
}

#[tokio::test]
async fn test_post_with_stale_token_is_rejected() {
    let app = app();
    let stale = Credential::issue(USERNAME, PASSWORD, b"nonce", Utc::now() - TimeDelta::seconds(120));
    let request = Request::post("/atom/")
        .header("X-WSSE", stale.to_header())
        .body(Body::from(entry_xml("Hello", "<p>hi</p>", None, &[])))
        .unwrap();

    let res = send(&app.router, request).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.repository.calls(), 0);
}

#[tokio::test]
async fn test_post_with_wrong_password_is_rejected() {
    let app = app();
    let forged = Credential::issue_now(USERNAME, "guess");
    let request = Request::post("/atom/")
        .header("X-WSSE", forged.to_header())
        .body(Body::from(entry_xml("Hello", "<p>hi</p>", None, &[])))
        .unwrap();

    let res = send(&app.router, request).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.repository.calls(), 0);
}

#[tokio::test]
async fn test_post_creates_entry() {
    let app = app();
    let body = entry_xml("Hello, World!", "&lt;p&gt;hi&lt;/p&gt;", Some(PUBLISHED), &["rust", "web"]);

    let res = authorized(&app.router, "POST", "/atom/", Some(body)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(
        res.header("location"),
        Some("http://blog.test/2024/03/05/hello-world")
    );
    assert_eq!(res.header("content-type"), Some(ENTRY_CONTENT_TYPE));
    assert!(res.body.contains("<title>Hello, World!</title>"));
    assert!(res.body.contains(r#"href="http://blog.test/atom/2024/03/05/hello-world""#));

    let stored = app
        .repository
        .inner
        .find_by_slug(DateScope::day(2024, 3, 5), "hello-world")
        .unwrap();
    assert_eq!(stored.content, "<p>hi</p>");
    assert_eq!(stored.tags, vec!["rust", "web"]);
}

#[tokio::test]
async fn test_post_prefers_slug_header() {
    let app = app();
    let request = Request::post("/atom/")
        .header("X-WSSE", wsse())
        .header("Slug", "  custom-slug  ")
        .body(Body::from(entry_xml("Hello", "hi", Some(PUBLISHED), &[])))
        .unwrap();

    let res = send(&app.router, request).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(
        res.header("location"),
        Some("http://blog.test/2024/03/05/custom-slug")
    );
}

#[tokio::test]
async fn test_post_untitled_entry_slugged_by_time() {
    let app = app();
    let body = entry_xml("", "hi", Some(PUBLISHED), &[]);

    let res = authorized(&app.router, "POST", "/atom/", Some(body)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.header("location"), Some("http://blog.test/2024/03/05/1405"));
}

#[tokio::test]
async fn test_post_malformed_body() {
    let app = app();

    let res = authorized(&app.router, "POST", "/atom/", Some("<entry><title>".into())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Bad Request");
    assert_eq!(app.repository.calls(), 0);

    let res = authorized(&app.router, "POST", "/atom/", Some(String::new())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_duplicate_slug_same_day() {
    let app = app();
    seed(&app, "Hello", "hello", "2024-03-05T08:00:00Z", &[]);

    let body = entry_xml("Hello", "again", Some(PUBLISHED), &[]);
    let res = authorized(&app.router, "POST", "/atom/", Some(body)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.repository.inner.count(), 1);

    let body = entry_xml("Hello", "next day", Some("2024-03-06T08:00:00Z"), &[]);
    let res = authorized(&app.router, "POST", "/atom/", Some(body)).await;
    assert_eq!(res.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_get_member_with_etag() {
    let app = app();
    seed(&app, "Hello", "hello", PUBLISHED, &["rust"]);

    let res = authorized(&app.router, "GET", "/atom/2024/03/05/hello", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("<title>Hello</title>"));
    assert!(res.body.contains(r#"<category term="rust"/>"#));
    let etag = res.header("etag").unwrap().to_string();

    let request = Request::get("/atom/2024/03/05/hello")
        .header("X-WSSE", wsse())
        .header("If-None-Match", etag.as_str())
        .body(Body::empty())
        .unwrap();
    let res = send(&app.router, request).await;
    assert_eq!(res.status, StatusCode::NOT_MODIFIED);
    assert!(res.body.is_empty());
}

#[tokio::test]
async fn test_get_member_requires_wsse() {
    let app = app();
    seed(&app, "Hello", "hello", PUBLISHED, &[]);

    let res = get(&app.router, "/atom/2024/03/05/hello").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_missing_member_names_path() {
    let app = app();

    let res = authorized(&app.router, "GET", "/atom/2024/03/05/nope", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.header("content-type").unwrap().starts_with("text/html"));
    assert!(res.body.contains("/atom/2024/03/05/nope"));
}

#[tokio::test]
async fn test_put_updates_given_fields_only() {
    let app = app();
    let original = seed(&app, "Hello", "hello", PUBLISHED, &["rust"]);

    let body = r#"<entry xmlns="http://www.w3.org/2005/Atom"><title>Changed</title><published>2030-01-01T00:00:00Z</published></entry>"#;
    let res = authorized(&app.router, "PUT", "/atom/2024/03/05/hello", Some(body.into())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("<title>Changed</title>"));

    let stored = app
        .repository
        .inner
        .find_by_slug(DateScope::day(2024, 3, 5), "hello")
        .unwrap();
    assert_eq!(stored.title, "Changed");
    assert_eq!(stored.content, original.content);
    assert_eq!(stored.tags, original.tags);
    assert_eq!(stored.published, original.published);
    assert!(stored.updated > original.updated);
}

#[tokio::test]
async fn test_put_malformed_body_leaves_entry() {
    let app = app();
    let original = seed(&app, "Hello", "hello", PUBLISHED, &[]);

    let res = authorized(
        &app.router,
        "PUT",
        "/atom/2024/03/05/hello",
        Some("<entry><title>Changed</entry>".into()),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let stored = app
        .repository
        .inner
        .find_by_slug(DateScope::day(2024, 3, 5), "hello")
        .unwrap();
    assert_eq!(stored, original);
}

#[tokio::test]
async fn test_put_missing_member() {
    let app = app();
    let body = entry_xml("Changed", "x", None, &[]);

    let res = authorized(&app.router, "PUT", "/atom/2024/03/05/nope", Some(body)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_member() {
    let app = app();
    seed(&app, "Hello", "hello", PUBLISHED, &[]);

    let res = get(&app.router, "/2024/03/05/hello").await;
    assert_eq!(res.status, StatusCode::OK);

    let request = Request::delete("/atom/2024/03/05/hello")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app.router, request).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.repository.inner.count(), 1);

    let res = authorized(&app.router, "DELETE", "/atom/2024/03/05/hello", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.repository.inner.count(), 0);

    let res = get(&app.router, "/2024/03/05/hello").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feed_lists_latest_updates() {
    let app = app();
    seed(&app, "First", "first", "2024-03-01T10:00:00Z", &[]);
    seed(&app, "Second", "second", "2024-03-02T10:00:00Z", &[]);

    let res = get(&app.router, "/atom/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.header("content-type"), Some(FEED_CONTENT_TYPE));

    let second = res.body.find("<title>Second</title>").unwrap();
    let first = res.body.find("<title>First</title>").unwrap();
    assert!(second < first);
    assert!(res.body.contains("<updated>2024-03-02T10:00:00Z</updated>"));
}

#[tokio::test]
async fn test_feed_caps_at_ten_most_recently_updated() {
    let app = app();
    for day in 1..=12 {
        seed(
            &app,
            &format!("Post {:02}", day),
            &format!("post-{:02}", day),
            &format!("2024-03-{:02}T10:00:00Z", day),
            &[],
        );
    }

    let res = get(&app.router, "/atom/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.matches("<entry>").count(), 10);
    for day in 3..=12 {
        assert!(res.body.contains(&format!("<title>Post {:02}</title>", day)));
    }
    assert!(!res.body.contains("<title>Post 01</title>"));
    assert!(!res.body.contains("<title>Post 02</title>"));

    let newest = res.body.find("<title>Post 12</title>").unwrap();
    let oldest = res.body.find("<title>Post 03</title>").unwrap();
    assert!(newest < oldest);
}

#[tokio::test]
async fn test_feed_etag_revalidation() {
    let app = app();
    seed(&app, "First", "first", "2024-03-01T10:00:00Z", &[]);

    let res = get(&app.router, "/atom/").await;
    let etag = res.header("etag").unwrap().to_string();

    let request = Request::get("/atom/")
        .header("If-None-Match", etag.as_str())
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app.router, request).await.status, StatusCode::NOT_MODIFIED);

    seed(&app, "Second", "second", "2024-03-02T10:00:00Z", &[]);
    let request = Request::get("/atom/")
        .header("If-None-Match", etag.as_str())
        .body(Body::empty())
        .unwrap();
    let res = send(&app.router, request).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_ne!(res.header("etag"), Some(etag.as_str()));
}

#[tokio::test]
async fn test_service_document() {
    let app = app();

    let res = get(&app.router, "/service").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.header("content-type"), Some(SERVICE_CONTENT_TYPE));
    assert!(res.body.contains(r#"<collection href="http://blog.test/atom/">"#));
}

#[tokio::test]
async fn test_unrouted_method_is_not_found() {
    let app = app();

    let res = authorized(&app.router, "PUT", "/atom/", Some(entry_xml("a", "b", None, &[]))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(app.repository.calls(), 0);
}

#[tokio::test]
async fn test_middleware_headers_present() {
    let app = app();

    let res = get(&app.router, "/service").await;
    assert!(res.header("x-request-id").is_some());
    assert_eq!(res.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(res.header("x-frame-options"), Some("DENY"));
}

fn streamed(chunks: usize, size: usize) -> Body {
    let parts: Vec<Result<Bytes, std::io::Error>> = (0..chunks)
        .map(|_| Ok(Bytes::from(vec![b'x'; size])))
        .collect();
    Body::from_stream(futures_util::stream::iter(parts))
}

#[tokio::test]
async fn test_unauthenticated_stream_refused_before_body_read() {
    let mut config = test_config();
    config.security.max_body_size = 64;
    let app = app_with(config);

    let request = Request::post("/atom/").body(streamed(4, 50)).unwrap();
    let res = send(&app.router, request).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, "Authorization Required");
    assert_eq!(app.repository.calls(), 0);
}

#[tokio::test]
async fn test_authenticated_oversized_stream_rejected() {
    let mut config = test_config();
    config.security.max_body_size = 64;
    let app = app_with(config);

    let request = Request::post("/atom/")
        .header("X-WSSE", wsse())
        .body(streamed(4, 50))
        .unwrap();
    let res = send(&app.router, request).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.repository.calls(), 0);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = test_config();
    config.security.max_body_size = 64;
    let app = app_with(config);

    let body = entry_xml("Hello", &"x".repeat(256), Some(PUBLISHED), &[]);
    let res = authorized(&app.router, "POST", "/atom/", Some(body)).await;
    assert!(res.status.is_client_error());
    assert_eq!(app.repository.inner.count(), 0);
}
