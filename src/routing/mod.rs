//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     (verb, template, target)[]
//!     → pattern.rs (template → anchored regex + capture names)
//!     → router.rs (ordered route table, immutable)
//!
//! Incoming Request (verb, decoded path)
//!     → router.rs (first route in registration order whose verb and pattern match)
//!     → Return: target + named params, or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: first registered match wins
//! - Captures bound positionally; a repeated name keeps the later value

pub mod pattern;
pub mod router;

pub use pattern::{PathPattern, PatternSource, SPLAT};
pub use router::{Params, RouteMatch, Router};

/// Errors raised while building the route table.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The pattern source cannot be turned into a usable matcher.
    #[error("invalid route pattern: {0}")]
    InvalidPatternType(String),
}
