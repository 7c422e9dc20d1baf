//! Journal use-case service.
//!
//! # Responsibility
//! - Combine calendar geometry with per-day activity levels.
//! - Build the selected-day feed and the rest-of-month feed.
//! - Expose the reminder list and the tag vocabulary.
//!
//! # Invariants
//! - Source failures propagate unchanged.
//! - Counts are fetched once per view, scoped to the range the view shows.
//! - The month feed never repeats entries of the selected day.

use crate::calendar::activity::{ActivityCounts, ActivityLevel, ActivityStrip};
use crate::calendar::grid::{build_recent_window, CalendarDay, CalendarGridBuilder, CalendarMonth};
use crate::calendar::range::DateRange;
use crate::feed::{
    group_by_date, reminder_items, sort_newest_first, DateGroup, EntryFilter, ReminderItem,
};
use crate::model::entry::Entry;
use crate::source::{EntrySource, SourceResult};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// One calendar cell with its activity annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayView {
    #[serde(flatten)]
    pub day: CalendarDay,
    pub entry_count: u32,
    /// Always [`ActivityLevel::Blank`] for adjacent-month cells.
    pub level: ActivityLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub iso_week_number: u32,
    pub days: [DayView; 7],
}

/// Month grid annotated with activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub weeks: Vec<WeekView>,
    /// Entries dated inside this month.
    pub post_count: u64,
}

impl MonthView {
    fn annotate(month: CalendarMonth, counts: &ActivityCounts) -> Self {
        let post_count = DateRange::month(month.year, month.month)
            .map(|range| counts.total_in(&range))
            .unwrap_or(0);
        let weeks = month
            .weeks
            .into_iter()
            .map(|week| WeekView {
                iso_week_number: week.iso_week_number,
                days: week.days.map(|day| annotate_day(day, counts)),
            })
            .collect();
        Self {
            year: month.year,
            month: month.month,
            label: month.label,
            weeks,
            post_count,
        }
    }
}

fn annotate_day(day: CalendarDay, counts: &ActivityCounts) -> DayView {
    if !day.is_in_displayed_month {
        return DayView {
            day,
            entry_count: 0,
            level: ActivityLevel::Blank,
        };
    }
    DayView {
        day,
        entry_count: counts.count(day.date),
        level: counts.level(day.date),
    }
}

/// Entries for the selected day plus the rest of its month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayFeed {
    pub date: NaiveDate,
    /// Newest first.
    pub day_entries: Vec<Entry>,
    /// Other days of the month, newest day first.
    pub month_groups: Vec<DateGroup>,
    /// Number of filtered entries in `month_groups`.
    pub month_post_count: usize,
    pub filter_active: bool,
}

/// Journal service facade over an entry source.
pub struct JournalService<S: EntrySource> {
    source: S,
}

impl<S: EntrySource> JournalService<S> {
    /// Creates a service using the provided entry source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Builds all months of `year` with per-day activity levels.
    ///
    /// Returns an empty list for an unrepresentable year without touching
    /// the source.
    pub fn year_calendar(
        &self,
        year: i32,
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> SourceResult<Vec<MonthView>> {
        let started_at = Instant::now();
        let Some(range) = DateRange::year(year) else {
            debug!("event=calendar_build module=service status=skip year={year}");
            return Ok(Vec::new());
        };

        let counts = self.source.entry_counts(range)?;
        let mut builder = CalendarGridBuilder::new(today);
        if let Some(selected) = selected {
            builder = builder.with_selected(selected);
        }
        let months = builder
            .build_year(year)
            .into_iter()
            .map(|month| MonthView::annotate(month, &counts))
            .collect::<Vec<_>>();

        info!(
            "event=calendar_build module=service status=ok year={} months={} duration_ms={}",
            year,
            months.len(),
            started_at.elapsed().as_millis()
        );
        Ok(months)
    }

    /// Builds the compact activity strip ending in today's week.
    pub fn recent_activity(
        &self,
        today: NaiveDate,
        week_count: u32,
    ) -> SourceResult<ActivityStrip> {
        let window = build_recent_window(today, week_count);
        let counts = match window.query_range() {
            Some(range) => self.source.entry_counts(range)?,
            None => ActivityCounts::new(),
        };
        debug!(
            "event=activity_strip module=service status=ok weeks={}",
            window.weeks.len()
        );
        Ok(ActivityStrip::from_window(&window, &counts))
    }

    /// Builds the feed for `date` with `filter` applied to both sections.
    pub fn day_feed(&self, date: NaiveDate, filter: &EntryFilter) -> SourceResult<DayFeed> {
        let mut day_entries = filter.apply(self.source.entries_on(date)?);
        sort_newest_first(&mut day_entries);

        let month_entries = match DateRange::month_of(date) {
            Some(range) => self.source.entries_in(range)?,
            None => Vec::new(),
        };
        let month_entries = filter.apply(
            month_entries
                .into_iter()
                .filter(|entry| entry.date != date)
                .collect(),
        );
        let month_post_count = month_entries.len();

        debug!(
            "event=day_feed module=service status=ok day_entries={} month_entries={} filtered={}",
            day_entries.len(),
            month_post_count,
            !filter.is_empty()
        );
        Ok(DayFeed {
            date,
            day_entries,
            month_groups: group_by_date(month_entries),
            month_post_count,
            filter_active: !filter.is_empty(),
        })
    }

    /// Pinned entries grouped by date for the reminder list.
    pub fn reminders(&self) -> SourceResult<BTreeMap<NaiveDate, Vec<ReminderItem>>> {
        let pinned = self.source.pinned_entries()?;
        Ok(reminder_items(&pinned))
    }

    /// Distinct tags across all entries, sorted.
    pub fn known_tags(&self) -> SourceResult<Vec<String>> {
        let tags = self.source.distinct_tags()?;
        Ok(tags.into_iter().collect::<BTreeSet<_>>().into_iter().collect())
    }
}
