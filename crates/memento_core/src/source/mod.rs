//! Entry source abstractions.
//!
//! # Responsibility
//! - Define the read contract the journal service needs from storage.
//! - Provide an in-memory snapshot implementation for tests and tooling.
//!
//! # Invariants
//! - Sources return snapshots; callers never mutate stored entries through
//!   them.
//! - Failures are reported as [`SourceError`] and never swallowed.
//!
//! # See also
//! - `service::journal_service` for the orchestration on top.

use crate::calendar::activity::ActivityCounts;
use crate::calendar::range::DateRange;
use crate::feed::collect_tags;
use crate::model::entry::{Entry, EntryRow};
use chrono::NaiveDate;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SourceResult<T> = Result<T, SourceError>;

/// Error reported by an entry source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Backing store could not be reached.
    Unavailable(String),
    /// Stored record could not be turned into an entry snapshot.
    InvalidRecord(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "entry source unavailable: {message}"),
            Self::InvalidRecord(message) => write!(f, "invalid entry record: {message}"),
        }
    }
}

impl Error for SourceError {}

/// Read access to stored journal entries.
pub trait EntrySource {
    /// Entries stored for one calendar day, in any order.
    fn entries_on(&self, date: NaiveDate) -> SourceResult<Vec<Entry>>;
    /// Entries whose date falls inside `range`, in any order.
    fn entries_in(&self, range: DateRange) -> SourceResult<Vec<Entry>>;
    /// Per-date entry counts inside `range`; absent dates count as zero.
    fn entry_counts(&self, range: DateRange) -> SourceResult<ActivityCounts>;
    /// Entries flagged as reminders.
    fn pinned_entries(&self) -> SourceResult<Vec<Entry>>;
    /// Every tag used by any entry; order and duplicates unspecified.
    fn distinct_tags(&self) -> SourceResult<Vec<String>>;
}

/// In-memory source over a fixed list of entry snapshots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    entries: Vec<Entry>,
}

impl SnapshotSource {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Builds a source from storage rows.
    ///
    /// Rows with an undecodable attachment payload are kept without
    /// attachments; the failure is logged without entry content.
    pub fn from_rows(rows: Vec<EntryRow>) -> Self {
        let entries = rows
            .into_iter()
            .map(|row| {
                let entry_id = row.id;
                let (entry, err) = Entry::from_row_lossy(row);
                if let Some(err) = err {
                    warn!(
                        "event=entry_decode module=source status=degraded entry_id={} error={}",
                        entry_id, err
                    );
                }
                entry
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn filtered(&self, predicate: impl Fn(&Entry) -> bool) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|entry| predicate(entry))
            .cloned()
            .collect()
    }
}

impl EntrySource for SnapshotSource {
    fn entries_on(&self, date: NaiveDate) -> SourceResult<Vec<Entry>> {
        Ok(self.filtered(|entry| entry.date == date))
    }

    fn entries_in(&self, range: DateRange) -> SourceResult<Vec<Entry>> {
        Ok(self.filtered(|entry| range.contains(entry.date)))
    }

    fn entry_counts(&self, range: DateRange) -> SourceResult<ActivityCounts> {
        Ok(ActivityCounts::from_dates_in(
            &range,
            self.entries.iter().map(|entry| entry.date),
        ))
    }

    fn pinned_entries(&self) -> SourceResult<Vec<Entry>> {
        Ok(self.filtered(|entry| entry.is_pinned))
    }

    fn distinct_tags(&self) -> SourceResult<Vec<String>> {
        Ok(collect_tags(&self.entries))
    }
}

impl<S: EntrySource + ?Sized> EntrySource for &S {
    fn entries_on(&self, date: NaiveDate) -> SourceResult<Vec<Entry>> {
        (**self).entries_on(date)
    }

    fn entries_in(&self, range: DateRange) -> SourceResult<Vec<Entry>> {
        (**self).entries_in(range)
    }

    fn entry_counts(&self, range: DateRange) -> SourceResult<ActivityCounts> {
        (**self).entry_counts(range)
    }

    fn pinned_entries(&self) -> SourceResult<Vec<Entry>> {
        (**self).pinned_entries()
    }

    fn distinct_tags(&self) -> SourceResult<Vec<String>> {
        (**self).distinct_tags()
    }
}

#[cfg(test)]
mod tests {
    use super::{EntrySource, SnapshotSource};
    use crate::calendar::range::DateRange;
    use crate::model::entry::EntryRow;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn feb(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).expect("fixture date should be valid")
    }

    fn row(day: u32, description: Option<&str>, pinned: bool) -> EntryRow {
        EntryRow {
            id: Uuid::new_v4(),
            date: feb(day),
            created_at: Utc
                .with_ymd_and_hms(2024, 2, day, 8, 0, 0)
                .single()
                .expect("fixture timestamp should be valid"),
            title: Some(format!("day {day}")),
            description: description.map(str::to_string),
            tags: Some(vec!["b".to_string(), "a".to_string()]),
            is_reminder: pinned,
            reminder_time: None,
            completed_todos: None,
        }
    }

    #[test]
    fn from_rows_keeps_rows_with_bad_payloads() {
        let source = SnapshotSource::from_rows(vec![
            row(1, Some("free text"), false),
            row(2, None, true),
        ]);
        assert_eq!(source.len(), 2);
        assert!(source.entries()[0].attachments.is_empty());
    }

    #[test]
    fn queries_are_scoped() {
        let source = SnapshotSource::from_rows(vec![
            row(1, None, false),
            row(1, None, false),
            row(29, None, true),
        ]);
        let month = DateRange::month(2024, 2).expect("fixture month should be valid");
        let first_week = DateRange::new(feb(1), feb(7)).expect("range should be ordered");

        let in_month = source.entries_in(month).expect("snapshot should list the month");
        assert_eq!(in_month.len(), 3);
        let counts = source
            .entry_counts(first_week)
            .expect("snapshot should count the week");
        assert_eq!(counts.count(feb(1)), 2);
        assert_eq!(counts.count(feb(29)), 0);
        let leap_day = source.entries_on(feb(29)).expect("snapshot should list the day");
        assert_eq!(leap_day.len(), 1);
        let pinned = source.pinned_entries().expect("snapshot should list pinned");
        assert_eq!(pinned.len(), 1);
        let tags = source.distinct_tags().expect("snapshot should list tags");
        assert_eq!(tags, vec!["a", "b"]);
    }
}
