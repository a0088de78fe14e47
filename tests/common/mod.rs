//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use chrono::DateTime;
use tower::ServiceExt;

use atomos::blog::{
    DateScope, Entry, EntryFields, EntryRepository, ListQuery, MemoryRepository, NewEntry,
    RepositoryError,
};
use atomos::security::Credential;
use atomos::{BlogConfig, HttpServer};

pub const BASE_URL: &str = "http://blog.test";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

/// Delegates to a [`MemoryRepository`] and counts every call made through it.
#[derive(Default)]
pub struct RecordingRepository {
    pub inner: MemoryRepository,
    calls: AtomicUsize,
}

impl RecordingRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl EntryRepository for RecordingRepository {
    fn count(&self) -> usize {
        self.record();
        self.inner.count()
    }

    fn all(&self, query: ListQuery) -> Vec<Entry> {
        self.record();
        self.inner.all(query)
    }

    fn circa(&self, scope: DateScope) -> Vec<Entry> {
        self.record();
        self.inner.circa(scope)
    }

    fn tagged(&self, tag: &str) -> Vec<Entry> {
        self.record();
        self.inner.tagged(tag)
    }

    fn find_by_slug(&self, scope: DateScope, slug: &str) -> Option<Entry> {
        self.record();
        self.inner.find_by_slug(scope, slug)
    }

    fn save(&self, draft: NewEntry) -> Result<Entry, RepositoryError> {
        self.record();
        self.inner.save(draft)
    }

    fn update(&self, entry: &Entry, fields: EntryFields) -> Result<Entry, RepositoryError> {
        self.record();
        self.inner.update(entry, fields)
    }

    fn destroy(&self, entry: &Entry) -> Result<(), RepositoryError> {
        self.record();
        self.inner.destroy(entry)
    }
}

pub fn test_config() -> BlogConfig {
    let mut config = BlogConfig::default();
    config.blog.url = BASE_URL.to_string();
    config.blog.title = "Test Blog".to_string();
    config.blog.per_page = 2;
    config.auth.username = USERNAME.to_string();
    config.auth.password = PASSWORD.to_string();
    config
}

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<RecordingRepository>,
}

pub fn app() -> TestApp {
    app_with(test_config())
}

pub fn app_with(config: BlogConfig) -> TestApp {
    let repository = Arc::new(RecordingRepository::default());
    let server = HttpServer::new(config, repository.clone()).unwrap();
    TestApp {
        router: server.router(),
        repository,
    }
}

/// Store an entry directly, bypassing HTTP and the call counter.
pub fn seed(app: &TestApp, title: &str, slug: &str, published: &str, tags: &[&str]) -> Entry {
    let at = DateTime::parse_from_rfc3339(published).unwrap();
    app.repository
        .inner
        .save(NewEntry {
            title: title.to_string(),
            content: format!("<p>{}</p>", title),
            slug: slug.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published: at,
            updated: at,
        })
        .unwrap()
}

pub fn wsse() -> String {
    Credential::issue_now(USERNAME, PASSWORD).to_header()
}

pub fn entry_xml(title: &str, content: &str, published: Option<&str>, tags: &[&str]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="utf-8"?><entry xmlns="http://www.w3.org/2005/Atom"><title>{}</title><content type="html">{}</content>"#,
        title, content
    );
    if let Some(published) = published {
        xml.push_str(&format!("<published>{}</published>", published));
    }
    for tag in tags {
        xml.push_str(&format!(r#"<category term="{}"/>"#, tag));
    }
    xml.push_str("</entry>");
    xml
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn authorized(router: &Router, method: &str, uri: &str, body: Option<String>) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-WSSE", wsse())
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();
    send(router, request).await
}
