//! Per-request state threaded through handlers.

use axum::body::Bytes;
use axum::http::{request::Parts, HeaderMap, Method};
use chrono::{DateTime, Utc};

use crate::blog::DateScope;
use crate::http::response::AppError;
use crate::observability::metrics;
use crate::routing::Params;
use crate::security::{WsseAuthenticator, WSSE_HEADER};

/// Path and query exactly as received.
pub fn request_uri(parts: &Parts) -> String {
    parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string())
}

/// Everything a handler knows about the request it is serving.
///
/// Lives exactly as long as one request; nothing here is shared.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    /// Percent-decoded path used for matching.
    pub path: String,
    /// Path and query exactly as received.
    pub request_uri: String,
    pub headers: HeaderMap,
    pub params: Params,
    pub body: Bytes,
    /// Page title, starts as the site title; views prefix it.
    pub title: String,
    pub now: DateTime<Utc>,
    authorized: Option<bool>,
}

impl RequestContext {
    pub fn new(parts: &Parts, path: String, params: Params, body: Bytes, site_title: &str) -> Self {
        Self {
            method: parts.method.clone(),
            path,
            request_uri: request_uri(parts),
            headers: parts.headers.clone(),
            params,
            body,
            title: site_title.to_string(),
            now: Utc::now(),
            authorized: None,
        }
    }

    /// Abort with 401 unless the request carries a valid WSSE token.
    ///
    /// The token is checked at most once per request; the outcome is reused.
    pub fn require_authorization(&mut self, auth: &WsseAuthenticator) -> Result<(), AppError> {
        let authorized = match self.authorized {
            Some(known) => known,
            None => {
                let header = self
                    .headers
                    .get(WSSE_HEADER)
                    .and_then(|v| v.to_str().ok());
                let verified = auth.verify(header, self.now);
                self.authorized = Some(verified);
                verified
            }
        };

        if authorized {
            Ok(())
        } else {
            metrics::record_auth_failure();
            Err(AppError::AuthenticationFailed)
        }
    }

    pub fn is_authorized(&self) -> Option<bool> {
        self.authorized
    }

    /// A route parameter. Absence means the route table and handler disagree.
    pub fn param(&self, name: &str) -> Result<&str, AppError> {
        self.params
            .get(name)
            .ok_or_else(|| AppError::Internal(format!("route has no :{} parameter", name)))
    }

    /// The `:year/:month/:day` partition named by the path.
    pub fn day_scope(&self) -> Result<DateScope, AppError> {
        DateScope::parse(
            self.param("year")?,
            Some(self.param("month")?),
            Some(self.param("day")?),
        )
        .ok_or(AppError::NotFound)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body as UTF-8 text.
    pub fn body_text(&self) -> Result<&str, AppError> {
        std::str::from_utf8(&self.body)
            .map_err(|e| AppError::MalformedRequestBody(e.to_string()))
    }

    /// `"<prefix><site title>"`.
    pub fn prefix_title(&mut self, prefix: &str) {
        self.title.insert_str(0, prefix);
    }
}
