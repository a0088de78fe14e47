//! Minimal blog server with an AtomPub interface.

pub mod atom;
pub mod blog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::BlogConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
