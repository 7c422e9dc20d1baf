//! Journal entry snapshot model.
//!
//! # Responsibility
//! - Define the immutable entry snapshot consumed by parsing and views.
//! - Convert raw storage rows into validated snapshots.
//!
//! # Invariants
//! - `id` is stable for the entry lifetime.
//! - `date` is a plain calendar day; it is never shifted by time zone.
//! - `tags` iterate in alphabetical order.
//!
//! # See also
//! - `model::attachment` for the attachment payload contract.

use crate::content::checklist::decode_completed;
use crate::model::attachment::{decode_attachment_payload, Attachment, AttachmentPayloadError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable identifier of one journal entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = Uuid;

/// Snapshot of one journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Calendar day the entry belongs to.
    pub date: NaiveDate,
    /// Instant the entry was first stored.
    pub created_at: DateTime<Utc>,
    /// Raw entry text as typed by the user.
    pub raw_text: String,
    pub tags: BTreeSet<String>,
    /// Pinned entries show up in the reminder list.
    pub is_pinned: bool,
    /// Free-form wall-clock label such as `09:30`.
    pub reminder_time: Option<String>,
    pub attachments: Vec<Attachment>,
    /// Positions in the flattened checklist that are marked done.
    pub completed_indices: BTreeSet<usize>,
}

impl Entry {
    /// Creates an entry with a generated stable ID.
    pub fn new(date: NaiveDate, created_at: DateTime<Utc>, raw_text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), date, created_at, raw_text)
    }

    /// Creates an entry with a caller-provided stable ID.
    pub fn with_id(
        id: EntryId,
        date: NaiveDate,
        created_at: DateTime<Utc>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            created_at,
            raw_text: raw_text.into(),
            tags: BTreeSet::new(),
            is_pinned: false,
            reminder_time: None,
            attachments: Vec::new(),
            completed_indices: BTreeSet::new(),
        }
    }

    /// Validates and converts a storage row.
    ///
    /// # Errors
    /// - Returns an error when the attachment payload is not a valid
    ///   attachment list.
    pub fn from_row(row: EntryRow) -> Result<Self, AttachmentPayloadError> {
        let attachments = decode_attachment_payload(row.description.as_deref())?;
        Ok(Self::assemble(row, attachments))
    }

    /// Converts a storage row, dropping an undecodable attachment payload.
    ///
    /// The payload error, if any, is returned alongside the entry so the
    /// caller can report it.
    pub fn from_row_lossy(row: EntryRow) -> (Self, Option<AttachmentPayloadError>) {
        match decode_attachment_payload(row.description.as_deref()) {
            Ok(attachments) => (Self::assemble(row, attachments), None),
            Err(err) => (Self::assemble(row, Vec::new()), Some(err)),
        }
    }

    fn assemble(row: EntryRow, attachments: Vec<Attachment>) -> Self {
        Self {
            id: row.id,
            date: row.date,
            created_at: row.created_at,
            raw_text: row.title.unwrap_or_default(),
            tags: row
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            is_pinned: row.is_reminder,
            reminder_time: row
                .reminder_time
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            attachments,
            completed_indices: decode_completed(row.completed_todos.as_deref()),
        }
    }

    /// Tags in display (alphabetical) order.
    pub fn display_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Raw entry row as returned by record storage.
///
/// Field names follow the storage schema; `description` carries the JSON
/// attachment payload and `completed_todos` the JSON completion array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_reminder: bool,
    #[serde(default)]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub completed_todos: Option<String>,
}
