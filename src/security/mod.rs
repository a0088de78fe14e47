//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (body size, concurrency)
//!     → routing
//!     → wsse.rs (write endpoints and member reads only)
//! Outgoing response:
//!     → headers.rs (nosniff, frame options)
//! ```
//!
//! # Design Decisions
//! - Fail closed: any WSSE parsing problem is a failed check
//! - Failure responses never say which check failed

pub mod headers;
pub mod limits;
pub mod wsse;

pub use wsse::{Credential, WsseAuthenticator, WsseError, WSSE_HEADER};
