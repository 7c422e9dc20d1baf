//! Activity intensity classification.
//!
//! # Responsibility
//! - Map a per-day entry count to a discrete intensity level.
//! - Hold pre-aggregated per-day counts and combine them with grids.
//!
//! # Invariants
//! - `classify` is monotonic non-decreasing and total.
//! - `ActivityLevel::Blank` is only produced for absent (future) days.

use crate::calendar::grid::RecentWindow;
use crate::calendar::range::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Discrete activity bucket, serialized as its integer value (-1..=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum ActivityLevel {
    /// No date in this cell (future day in a rolling window).
    Blank,
    /// Zero entries.
    Quiet,
    /// 1-2 entries.
    Low,
    /// 3-4 entries.
    Medium,
    /// 5-6 entries.
    High,
    /// 7 or more entries.
    Peak,
}

impl ActivityLevel {
    pub fn value(self) -> i8 {
        match self {
            Self::Blank => -1,
            Self::Quiet => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Peak => 4,
        }
    }
}

impl From<ActivityLevel> for i8 {
    fn from(value: ActivityLevel) -> Self {
        value.value()
    }
}

/// Raised when decoding an out-of-range level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidActivityLevel(pub i8);

impl Display for InvalidActivityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "activity level must be within -1..=4, got {}", self.0)
    }
}

impl std::error::Error for InvalidActivityLevel {}

impl TryFrom<i8> for ActivityLevel {
    type Error = InvalidActivityLevel;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Blank),
            0 => Ok(Self::Quiet),
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            4 => Ok(Self::Peak),
            other => Err(InvalidActivityLevel(other)),
        }
    }
}

/// Maps an entry count to its intensity level.
///
/// `0 -> 0`, `1..=2 -> 1`, `3..=4 -> 2`, `5..=6 -> 3`, `7+ -> 4`.
pub fn classify(count: u32) -> ActivityLevel {
    match count {
        0 => ActivityLevel::Quiet,
        1..=2 => ActivityLevel::Low,
        3..=4 => ActivityLevel::Medium,
        5..=6 => ActivityLevel::High,
        _ => ActivityLevel::Peak,
    }
}

/// Pre-aggregated entry counts keyed by calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityCounts {
    counts: BTreeMap<NaiveDate, u32>,
}

impl ActivityCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates one count per occurrence of each date.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut counts = Self::new();
        for date in dates {
            counts.record(date);
        }
        counts
    }

    /// Same as [`Self::from_dates`], dropping dates outside `range`.
    pub fn from_dates_in(range: &DateRange, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self::from_dates(dates.into_iter().filter(|date| range.contains(*date)))
    }

    /// Adds one entry to `date`.
    pub fn record(&mut self, date: NaiveDate) {
        let slot = self.counts.entry(date).or_insert(0);
        *slot = slot.saturating_add(1);
    }

    pub fn count(&self, date: NaiveDate) -> u32 {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    pub fn level(&self, date: NaiveDate) -> ActivityLevel {
        classify(self.count(date))
    }

    /// Level for an optional cell; absent days are [`ActivityLevel::Blank`].
    pub fn level_for(&self, date: Option<NaiveDate>) -> ActivityLevel {
        match date {
            Some(date) => self.level(date),
            None => ActivityLevel::Blank,
        }
    }

    /// Sum of all counts inside `range`.
    pub fn total_in(&self, range: &DateRange) -> u64 {
        self.counts
            .range(range.start..=range.end)
            .map(|(_, count)| u64::from(*count))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(NaiveDate, u32)> for ActivityCounts {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, u32)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// One cell of the compact activity strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StripCell {
    pub date: Option<NaiveDate>,
    pub level: ActivityLevel,
}

/// Rolling window annotated with per-day levels, one column per week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityStrip {
    pub weeks: Vec<[StripCell; 7]>,
}

impl ActivityStrip {
    pub fn from_window(window: &RecentWindow, counts: &ActivityCounts) -> Self {
        let weeks = window
            .weeks
            .iter()
            .map(|week| {
                week.days.map(|date| StripCell {
                    date,
                    level: counts.level_for(date),
                })
            })
            .collect();
        Self { weeks }
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, ActivityCounts, ActivityLevel, ActivityStrip};
    use crate::calendar::grid::build_recent_window;
    use crate::calendar::range::DateRange;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("fixture date should be valid")
    }

    #[test]
    fn classify_matches_bucket_table() {
        assert_eq!(classify(0).value(), 0);
        assert_eq!(classify(1).value(), 1);
        assert_eq!(classify(2).value(), 1);
        assert_eq!(classify(3).value(), 2);
        assert_eq!(classify(4).value(), 2);
        assert_eq!(classify(5).value(), 3);
        assert_eq!(classify(6).value(), 3);
        assert_eq!(classify(7).value(), 4);
        assert_eq!(classify(100).value(), 4);
        assert_eq!(classify(u32::MAX), ActivityLevel::Peak);
    }

    #[test]
    fn classify_is_monotonic() {
        let mut previous = classify(0);
        for count in 1..50 {
            let current = classify(count);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn counts_aggregate_per_day_and_respect_range() {
        let range = DateRange::month(2024, 3).expect("fixture month should be valid");
        let counts = ActivityCounts::from_dates_in(
            &range,
            [
                date(2024, 3, 1),
                date(2024, 3, 1),
                date(2024, 3, 2),
                date(2024, 4, 1),
            ],
        );
        assert_eq!(counts.count(date(2024, 3, 1)), 2);
        assert_eq!(counts.count(date(2024, 3, 2)), 1);
        assert_eq!(counts.count(date(2024, 4, 1)), 0);
        assert_eq!(counts.total_in(&range), 3);
    }

    #[test]
    fn missing_cell_is_blank() {
        let counts = ActivityCounts::new();
        assert_eq!(counts.level_for(None), ActivityLevel::Blank);
        assert_eq!(counts.level_for(Some(date(2024, 1, 1))), ActivityLevel::Quiet);
    }

    #[test]
    fn strip_marks_future_cells_blank() {
        let today = date(2024, 5, 15);
        let counts: ActivityCounts = [(today, 7), (date(2024, 5, 13), 3)].into_iter().collect();
        let strip = ActivityStrip::from_window(&build_recent_window(today, 1), &counts);
        let levels: Vec<i8> = strip.weeks[0].iter().map(|c| c.level.value()).collect();
        assert_eq!(levels, vec![2, 0, 4, -1, -1, -1, -1]);
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert!(ActivityLevel::try_from(5).is_err());
        assert_eq!(ActivityLevel::try_from(-1), Ok(ActivityLevel::Blank));
    }
}
