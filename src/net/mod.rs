//! Network layer subsystem.
//!
//! Plain TCP listeners are bound directly with tokio; this module only
//! covers the optional TLS setup handed to `axum-server`.

pub mod tls;

pub use tls::load_tls_config;
