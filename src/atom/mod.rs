//! Atom syndication and publishing documents.
//!
//! # Data Flow
//! ```text
//! Entry / [Entry]
//!     → codec.rs (entry, feed, service document; RFC 3339 timestamps)
//!     → response body
//!
//! Request body (Atom entry XML)
//!     → codec.rs (first-level children only, unknown elements skipped)
//!     → EntryFields
//! ```
//!
//! # Design Decisions
//! - Event-based reading of whole, already-buffered bodies
//! - Any syntax or date error is a client error, never a fault
//! - Codec is built from the site config once and shared

pub mod codec;

pub use codec::{encode_draft, AtomCodec, CodecError, APP_NS, ATOM_NS};

pub const FEED_CONTENT_TYPE: &str = "application/atom+xml; charset=utf-8";
pub const ENTRY_CONTENT_TYPE: &str = "application/atom+xml;type=entry; charset=utf-8";
pub const SERVICE_CONTENT_TYPE: &str = "application/atomsvc+xml; charset=utf-8";
