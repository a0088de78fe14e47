//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID)
//!     → routes.rs (path pattern match → Endpoint)
//!     → context.rs (per-request state, WSSE check)
//!     → handlers/ (repository call, Atom or HTML rendering)
//!     → response.rs (errors to status codes)
//!     → Send to client
//! ```

pub mod context;
pub mod handlers;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;
pub mod views;

pub use context::RequestContext;
pub use request::X_REQUEST_ID;
pub use response::AppError;
pub use routes::Endpoint;
pub use server::{AppState, HttpServer};
