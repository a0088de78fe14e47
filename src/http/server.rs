//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the shared application state from config and repository
//! - Wire up middleware (tracing, request ID, limits, timeout, security headers)
//! - Dispatch every request through the blog route table
//! - Convert handler failures into responses at a single boundary
//! - Serve over plain TCP or TLS with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::atom::AtomCodec;
use crate::blog::EntryRepository;
use crate::config::BlogConfig;
use crate::http::context::{request_uri, RequestContext};
use crate::http::handlers;
use crate::http::request::apply_request_id;
use crate::http::response::AppError;
use crate::http::routes::{blog_routes, Endpoint};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::{self, RoutingError};
use crate::security::headers::apply_security_headers;
use crate::security::limits::apply_limits;
use crate::security::WsseAuthenticator;

/// How long in-flight TLS connections get to finish after shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BlogConfig>,
    pub routes: Arc<routing::Router<Endpoint>>,
    pub repository: Arc<dyn EntryRepository>,
    pub auth: Arc<WsseAuthenticator>,
    pub codec: Arc<AtomCodec>,
}

impl AppState {
    /// Compile the route table and build the authenticator and codec.
    pub fn new(
        config: BlogConfig,
        repository: Arc<dyn EntryRepository>,
    ) -> Result<Self, RoutingError> {
        Ok(Self {
            routes: Arc::new(blog_routes()?),
            auth: Arc::new(WsseAuthenticator::from_config(&config.auth)),
            codec: Arc::new(AtomCodec::new(&config.blog)),
            config: Arc::new(config),
            repository,
        })
    }
}

/// HTTP server for the blog.
pub struct HttpServer {
    router: Router,
    config: Arc<BlogConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and store.
    pub fn new(
        config: BlogConfig,
        repository: Arc<dyn EntryRepository>,
    ) -> Result<Self, RoutingError> {
        let state = AppState::new(config, repository)?;
        let config = state.config.clone();
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let router = Router::new().fallback(dispatch).with_state(state);
        let router = if config.security.enable_headers {
            apply_security_headers(router)
        } else {
            router
        };
        let router = apply_limits(router, &config)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http());
        apply_request_id(router)
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on a bound listener until `shutdown` triggers.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS until `shutdown` triggers.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        let stop = shutdown.wait();
        tokio::spawn(async move {
            stop.await;
            drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BlogConfig {
        &self.config
    }
}

/// Single entry point for every request.
///
/// `Received → PathMatched → (Authorized) → (BodyParsed) → RepositoryCalled → Serialized`.
/// Any stage may end the request with an error response; nothing is retried.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method.clone();
    let path = percent_decode_str(parts.uri.path())
        .decode_utf8_lossy()
        .into_owned();

    tracing::debug!(method = %method, path = %path, "Dispatching request");

    let site_title = state.config.blog.title.clone();
    let matched = state
        .routes
        .match_request(&method, &path)
        .map(|m| (*m.target, m.params));

    let response = match matched {
        None => {
            tracing::debug!(method = %method, path = %path, "No route matched");
            AppError::NotFound.respond(&request_uri(&parts), &site_title)
        }
        Some((endpoint, params)) => {
            let mut ctx = RequestContext::new(&parts, path, params, Bytes::new(), &site_title);
            match serve(&state, endpoint, &mut ctx, body).await {
                Ok(response) => response,
                Err(error) => {
                    if error.status().is_server_error() {
                        tracing::error!(endpoint = ?endpoint, path = %ctx.path, %error, "Request failed");
                    } else {
                        tracing::debug!(endpoint = ?endpoint, path = %ctx.path, %error, "Request refused");
                    }
                    error.respond(&ctx.request_uri, &site_title)
                }
            }
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

/// Guard, then read the body, then run the handler.
async fn serve(
    state: &AppState,
    endpoint: Endpoint,
    ctx: &mut RequestContext,
    body: Body,
) -> Result<Response, AppError> {
    if endpoint.requires_auth() {
        ctx.require_authorization(&state.auth)?;
    }

    if endpoint.takes_body() {
        ctx.body = axum::body::to_bytes(body, state.config.security.max_body_size)
            .await
            .map_err(|e| AppError::MalformedRequestBody(format!("failed to read body: {}", e)))?;
    }

    handlers::handle(endpoint, state, ctx)
}
