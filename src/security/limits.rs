//! Request limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size
//! - Bound the number of requests handled at once
//!
//! # Design Decisions
//! - Body limit enforced by tower-http before the body is buffered (413)
//! - Concurrency limit queues excess requests instead of rejecting them

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::BlogConfig;

pub fn apply_limits(router: Router, config: &BlogConfig) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
}
