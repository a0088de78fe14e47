//! In-process entry store with optional JSON snapshots.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use uuid::Uuid;

use crate::blog::repository::{EntryRepository, ListQuery, Order, RepositoryError};
use crate::blog::types::{DateScope, Entry, EntryFields, NewEntry};
use crate::observability::metrics;

/// A thread-safe entry store.
///
/// Reads go straight to the concurrent map. Writes are serialized so that the
/// `(published date, slug)` check and the insert happen as one step.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<DashMap<Uuid, Entry>>,
    write_lock: Arc<Mutex<()>>,
    persistence_path: Option<PathBuf>,
}

impl MemoryRepository {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            write_lock: Arc::new(Mutex::new(())),
            persistence_path,
        }
    }

    /// Load from a snapshot file if it exists; later writes go back to it.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let repo = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let entries: Vec<Entry> = serde_json::from_reader(reader)?;
            for entry in entries {
                repo.inner.insert(entry.id, entry);
            }
            tracing::info!(path = ?path, entries = repo.inner.len(), "Loaded entry snapshot");
        }
        Ok(repo)
    }

    /// Write the snapshot file, if one is configured.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let mut entries: Vec<Entry> = self.inner.iter().map(|r| r.value().clone()).collect();
            entries.sort_by(|a, b| a.published.cmp(&b.published).then(a.slug.cmp(&b.slug)));

            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &entries)?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), RepositoryError> {
        self.save_to_file().map_err(|e| {
            tracing::error!(error = %e, "Failed to write entry snapshot");
            RepositoryError::Storage(e.to_string())
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, RepositoryError> {
        self.write_lock
            .lock()
            .map_err(|_| RepositoryError::Storage("write lock poisoned".into()))
    }

    fn collect<F>(&self, keep: F) -> Vec<Entry>
    where
        F: Fn(&Entry) -> bool,
    {
        self.inner
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect()
    }

    fn slug_taken(&self, entry: &Entry) -> bool {
        self.inner.iter().any(|r| {
            let other = r.value();
            other.id != entry.id
                && other.slug == entry.slug
                && other.partition() == entry.partition()
        })
    }
}

fn validate(entry: &Entry) -> Result<(), RepositoryError> {
    if entry.slug.is_empty() {
        return Err(RepositoryError::Rejected("slug is empty".into()));
    }
    if entry
        .slug
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '&'))
    {
        return Err(RepositoryError::Rejected(format!(
            "slug {:?} is not URL-safe",
            entry.slug
        )));
    }
    if entry.tags.iter().any(|t| t.is_empty()) {
        return Err(RepositoryError::Rejected("empty tag".into()));
    }
    Ok(())
}

impl EntryRepository for MemoryRepository {
    fn count(&self) -> usize {
        self.inner.len()
    }

    fn all(&self, query: ListQuery) -> Vec<Entry> {
        let mut entries = self.collect(|_| true);
        match query.order {
            Order::PublishedDesc => entries.sort_by(|a, b| b.published.cmp(&a.published)),
            Order::UpdatedDesc => entries.sort_by(|a, b| b.updated.cmp(&a.updated)),
        }
        entries
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect()
    }

    fn circa(&self, scope: DateScope) -> Vec<Entry> {
        self.collect(|e| scope.contains(e.partition()))
    }

    fn tagged(&self, tag: &str) -> Vec<Entry> {
        let mut entries = self.collect(|e| e.has_tag(tag));
        entries.sort_by(|a, b| b.published.cmp(&a.published));
        entries
    }

    fn find_by_slug(&self, scope: DateScope, slug: &str) -> Option<Entry> {
        self.inner
            .iter()
            .find(|r| r.value().slug == slug && scope.contains(r.value().partition()))
            .map(|r| r.value().clone())
    }

    fn save(&self, draft: NewEntry) -> Result<Entry, RepositoryError> {
        let entry = draft.into_entry(Uuid::new_v4());
        validate(&entry)?;

        let _guard = self.lock()?;
        if self.slug_taken(&entry) {
            return Err(RepositoryError::Rejected(format!(
                "slug {:?} already used on {}",
                entry.slug,
                entry.partition()
            )));
        }
        self.inner.insert(entry.id, entry.clone());
        if let Err(e) = self.persist() {
            self.inner.remove(&entry.id);
            return Err(e);
        }

        metrics::record_entry_write("create");
        tracing::debug!(id = %entry.id, path = %entry.path(), "Entry saved");
        Ok(entry)
    }

    fn update(&self, entry: &Entry, fields: EntryFields) -> Result<Entry, RepositoryError> {
        let _guard = self.lock()?;
        let previous = self
            .inner
            .get(&entry.id)
            .map(|r| r.value().clone())
            .ok_or(RepositoryError::NotFound)?;
        let mut updated = previous.clone();
        updated.apply(fields);
        validate(&updated)?;

        self.inner.insert(updated.id, updated.clone());
        if let Err(e) = self.persist() {
            self.inner.insert(previous.id, previous);
            return Err(e);
        }

        metrics::record_entry_write("update");
        tracing::debug!(id = %updated.id, path = %updated.path(), "Entry updated");
        Ok(updated)
    }

    fn destroy(&self, entry: &Entry) -> Result<(), RepositoryError> {
        let _guard = self.lock()?;
        let (id, removed) = self
            .inner
            .remove(&entry.id)
            .ok_or(RepositoryError::NotFound)?;
        if let Err(e) = self.persist() {
            self.inner.insert(id, removed);
            return Err(e);
        }

        metrics::record_entry_write("delete");
        tracing::debug!(id = %entry.id, path = %entry.path(), "Entry destroyed");
        Ok(())
    }
}
