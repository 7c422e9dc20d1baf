//! Inclusive calendar date ranges used to scope collaborator queries.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if end < start {
            return None;
        }
        Some(Self { start, end })
    }

    /// January 1st through December 31st of `year`.
    pub fn year(year: i32) -> Option<Self> {
        Self::new(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )
    }

    /// First through last day of one month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = last_day_of_month(start)?;
        Self::new(start, end)
    }

    /// Month containing `date`.
    pub fn month_of(date: NaiveDate) -> Option<Self> {
        Self::month(date.year(), date.month())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, both ends included.
    pub fn len_days(&self) -> u64 {
        // end >= start is guaranteed by construction
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Iterates every day in the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset))
}

/// Sunday on or after `date`.
pub fn week_end(date: NaiveDate) -> Option<NaiveDate> {
    let offset = 6 - u64::from(date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new(offset))
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year().checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    next_first.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::{week_end, week_start, DateRange};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("fixture date should be valid")
    }

    #[test]
    fn month_range_handles_leap_february() {
        let feb = DateRange::month(2024, 2).expect("fixture month should be valid");
        assert_eq!(feb.end, date(2024, 2, 29));
        assert_eq!(feb.len_days(), 29);

        let feb = DateRange::month(2023, 2).expect("fixture month should be valid");
        assert_eq!(feb.end, date(2023, 2, 28));
    }

    #[test]
    fn december_range_rolls_into_next_year() {
        let dec = DateRange::month(2025, 12).expect("fixture month should be valid");
        assert_eq!(dec.end, date(2025, 12, 31));
    }

    #[test]
    fn new_rejects_reversed_bounds() {
        assert!(DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).is_none());
    }

    #[test]
    fn days_iterates_inclusive_range() {
        let range =
            DateRange::new(date(2024, 2, 27), date(2024, 3, 1)).expect("range should be ordered");
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1)
            ]
        );
    }

    #[test]
    fn week_bounds_are_monday_and_sunday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(week_start(date(2024, 5, 15)), Some(date(2024, 5, 13)));
        assert_eq!(week_end(date(2024, 5, 15)), Some(date(2024, 5, 19)));
        assert_eq!(week_start(date(2024, 5, 13)), Some(date(2024, 5, 13)));
        assert_eq!(week_end(date(2024, 5, 19)), Some(date(2024, 5, 19)));
    }

    #[test]
    fn invalid_month_yields_none() {
        assert!(DateRange::month(2024, 13).is_none());
        assert!(DateRange::month(2024, 0).is_none());
    }
}
