//! Security response headers.
//!
//! # Responsibilities
//! - Add `X-Content-Type-Options: nosniff`
//! - Add `X-Frame-Options: DENY`
//!
//! # Design Decisions
//! - Only set when the handler did not set the header itself
//! - Toggled by `security.enable_headers`

use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

/// Wrap a router with the static security headers.
pub fn apply_security_headers(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}
