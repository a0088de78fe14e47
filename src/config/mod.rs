//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BlogConfig (validated, immutable)
//!     → handed explicitly to the authenticator, codec and dispatcher
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AuthConfig;
pub use schema::BlogConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::SiteConfig;
