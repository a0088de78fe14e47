//! Storage contract consumed by the HTTP handlers.

use crate::blog::types::{DateScope, Entry, EntryFields, NewEntry};

/// Sort order for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Newest publication first (human views).
    #[default]
    PublishedDesc,
    /// Most recently updated first (Atom feed).
    UpdatedDesc,
}

/// Paging and ordering for [`EntryRepository::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: usize,
    pub offset: usize,
    pub order: Order,
}

impl ListQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            offset: 0,
            order: Order::default(),
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }
}

/// Errors reported by a repository write.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Validation or uniqueness failure.
    #[error("entry rejected: {0}")]
    Rejected(String),
    /// The entry disappeared between lookup and write.
    #[error("entry not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Entry persistence.
///
/// Implementations are shared across concurrent requests and are solely
/// responsible for the consistency of concurrent writes to the same
/// `(published date, slug)` key.
pub trait EntryRepository: Send + Sync {
    fn count(&self) -> usize;

    fn all(&self, query: ListQuery) -> Vec<Entry>;

    /// Entries published inside the partition, in no particular order.
    fn circa(&self, scope: DateScope) -> Vec<Entry>;

    fn tagged(&self, tag: &str) -> Vec<Entry>;

    fn find_by_slug(&self, scope: DateScope, slug: &str) -> Option<Entry>;

    /// Store a new entry, assigning its identity.
    fn save(&self, entry: NewEntry) -> Result<Entry, RepositoryError>;

    /// Apply decoded fields to a stored entry.
    fn update(&self, entry: &Entry, fields: EntryFields) -> Result<Entry, RepositoryError>;

    fn destroy(&self, entry: &Entry) -> Result<(), RepositoryError>;
}
