//! Entry model and date partitions.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blog::repository::RepositoryError;

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Assigned by the repository on creation.
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Unique within the publication date.
    pub slug: String,
    /// Display order is insertion order.
    pub tags: Vec<String>,
    pub published: DateTime<FixedOffset>,
    pub updated: DateTime<FixedOffset>,
}

impl Entry {
    /// The date partition this entry is filed under.
    pub fn partition(&self) -> NaiveDate {
        self.published.date_naive()
    }

    /// `YYYY/MM/DD/slug`, relative to the blog or Atom collection root.
    pub fn path(&self) -> String {
        format!("{}/{}", self.published.format("%Y/%m/%d"), self.slug)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Overwrite the fields present in a decoded document.
    ///
    /// `published` is immutable after creation and is never taken from `fields`.
    /// Tags are replaced only when the document carried at least one category.
    pub fn apply(&mut self, fields: EntryFields) {
        if let Some(title) = fields.title {
            self.title = title;
        }
        if let Some(content) = fields.content {
            self.content = content;
        }
        if let Some(tags) = fields.tags {
            self.tags = tags;
        }
        self.updated = fields.updated;
    }
}

/// Fields decoded from an Atom entry document.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFields {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Defaults to the decode time when the document has no `updated`.
    pub updated: DateTime<FixedOffset>,
    pub published: Option<DateTime<FixedOffset>>,
    /// `None` when the document has no `category` element.
    pub tags: Option<Vec<String>>,
}

impl EntryFields {
    pub fn new(updated: DateTime<FixedOffset>) -> Self {
        Self {
            title: None,
            content: None,
            updated,
            published: None,
            tags: None,
        }
    }
}

/// An entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub tags: Vec<String>,
    pub published: DateTime<FixedOffset>,
    pub updated: DateTime<FixedOffset>,
}

impl NewEntry {
    /// Build a draft from a decoded document. `published` falls back to `now`.
    pub fn from_fields(
        fields: EntryFields,
        slug: String,
        now: DateTime<FixedOffset>,
    ) -> Result<Self, RepositoryError> {
        let title = fields
            .title
            .ok_or_else(|| RepositoryError::Rejected("title is required".into()))?;
        let content = fields
            .content
            .ok_or_else(|| RepositoryError::Rejected("content is required".into()))?;

        Ok(Self {
            title,
            content,
            slug,
            tags: fields.tags.unwrap_or_default(),
            published: fields.published.unwrap_or(now),
            updated: fields.updated,
        })
    }

    pub fn into_entry(self, id: Uuid) -> Entry {
        Entry {
            id,
            title: self.title,
            content: self.content,
            slug: self.slug,
            tags: self.tags,
            published: self.published,
            updated: self.updated,
        }
    }
}

/// A year, year-month or year-month-day partition of published dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateScope {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DateScope {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: None,
        }
    }

    pub fn day(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
        }
    }

    /// Parse route parameters. Returns `None` for non-numeric parts.
    pub fn parse(year: &str, month: Option<&str>, day: Option<&str>) -> Option<Self> {
        let year = year.parse().ok()?;
        let month = match month {
            Some(m) => Some(m.parse().ok()?),
            None => None,
        };
        let day = match day {
            Some(d) => Some(d.parse().ok()?),
            None => None,
        };
        Some(Self { year, month, day })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year
            && self.month.map_or(true, |m| date.month() == m)
            && self.day.map_or(true, |d| date.day() == d)
    }
}
