//! Entry feed projections.
//!
//! # Responsibility
//! - Filter entries by free-text query and selected tags.
//! - Group entries by day for the month feed.
//! - Collect the distinct tag vocabulary and the reminder list.
//!
//! # Invariants
//! - Query matching is case-insensitive; tag selection is exact.
//! - Within one day entries are ordered newest first.
//!
//! # See also
//! - `feed::view` for the per-entry render model.

pub mod view;

use crate::content::preview::{preview_text, PREVIEW_MAX_CHARS};
use crate::model::entry::{Entry, EntryId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Search box plus selected tag chips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl EntryFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.tags.is_empty()
    }

    /// Query must hit the text or any tag; every selected tag must be set.
    pub fn matches(&self, entry: &Entry) -> bool {
        let query = self.query.trim().to_lowercase();
        let query_hit = query.is_empty()
            || entry.raw_text.to_lowercase().contains(&query)
            || entry
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query));
        query_hit && self.tags.iter().all(|tag| entry.has_tag(tag))
    }

    pub fn apply(&self, entries: Vec<Entry>) -> Vec<Entry> {
        entries
            .into_iter()
            .filter(|entry| self.matches(entry))
            .collect()
    }
}

/// Entries of one day, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub entries: Vec<Entry>,
}

/// Sorts newest first; ties fall back to id for a stable order.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|left, right| {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| left.id.cmp(&right.id))
    });
}

/// Groups entries by day, days descending.
pub fn group_by_date(entries: Vec<Entry>) -> Vec<DateGroup> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date).or_default().push(entry);
    }
    by_date
        .into_iter()
        .rev()
        .map(|(date, mut entries)| {
            sort_newest_first(&mut entries);
            DateGroup { date, entries }
        })
        .collect()
}

/// Distinct tags across `entries`, sorted.
pub fn collect_tags<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Vec<String> {
    entries
        .into_iter()
        .flat_map(|entry| entry.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One row of the reminder list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderItem {
    pub entry_id: EntryId,
    pub date: NaiveDate,
    /// One-line preview of the entry text; empty for attachment-only entries.
    pub title: String,
    pub reminder_time: Option<String>,
}

impl ReminderItem {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            entry_id: entry.id,
            date: entry.date,
            title: preview_text(&entry.raw_text, PREVIEW_MAX_CHARS).unwrap_or_default(),
            reminder_time: entry.reminder_time.clone(),
        }
    }
}

/// Groups reminder entries by day, days ascending.
///
/// Within one day items without a time come first, then by time label.
pub fn reminder_items(entries: &[Entry]) -> BTreeMap<NaiveDate, Vec<ReminderItem>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Entry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date).or_default().push(entry);
    }
    by_date
        .into_iter()
        .map(|(date, mut entries)| {
            entries.sort_by(|left, right| {
                left.reminder_time
                    .cmp(&right.reminder_time)
                    .then_with(|| left.created_at.cmp(&right.created_at))
            });
            (date, entries.into_iter().map(ReminderItem::from_entry).collect())
        })
        .collect()
}
