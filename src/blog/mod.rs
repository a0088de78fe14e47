//! Blog domain: entries, date partitions, slugs and the storage contract.
//!
//! # Data Flow
//! ```text
//! Decoded Atom document (EntryFields)
//!     → slug.rs (Slug header, title, or HHMM of published)
//!     → types.rs (NewEntry / Entry::apply)
//!     → repository.rs (EntryRepository contract)
//!     → memory.rs (in-process store, optional JSON snapshot)
//! ```
//!
//! # Design Decisions
//! - The repository owns identity and `(published date, slug)` uniqueness
//! - Entries are never cached across requests
//! - `published` is fixed at creation; `updated` moves on every write

pub mod memory;
pub mod repository;
pub mod slug;
pub mod types;

pub use memory::MemoryRepository;
pub use repository::{EntryRepository, ListQuery, Order, RepositoryError};
pub use slug::derive_slug;
pub use types::{DateScope, Entry, EntryFields, NewEntry};
