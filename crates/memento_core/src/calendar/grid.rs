//! Month/week grid geometry.
//!
//! # Responsibility
//! - Build Monday-first month grids for a whole year.
//! - Attach ISO-8601 week numbers per week row.
//! - Build the Monday-aligned rolling window behind the activity strip.
//!
//! # Invariants
//! - A month's rows span the Monday on/before the 1st to the Sunday
//!   on/after the last day, inclusive.
//! - Rows with no day inside the displayed month are omitted.
//! - Rolling windows never expose dates after `today`.

use crate::calendar::range::{week_end, week_start, DateRange};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// Default number of weeks in the compact activity strip.
pub const DEFAULT_RECENT_WEEKS: u32 = 17;
/// Widest rolling window: one full year of columns.
pub const MAX_RECENT_WEEKS: u32 = 53;

/// One cell in a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// `false` for leading/trailing days borrowed from adjacent months.
    pub is_in_displayed_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

impl CalendarDay {
    /// Adjacent-month cells render empty and accept no interaction.
    pub fn is_interactive(&self) -> bool {
        self.is_in_displayed_month
    }
}

/// One Monday-first row of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarWeek {
    pub iso_week_number: u32,
    pub days: [CalendarDay; 7],
}

/// One month section of the year calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
    /// Full English month name, e.g. `January`.
    pub label: String,
    pub weeks: Vec<CalendarWeek>,
}

impl CalendarMonth {
    /// In-month days only, in calendar order.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks
            .iter()
            .flat_map(|week| week.days.iter())
            .filter(|day| day.is_in_displayed_month)
    }
}

/// Builds month grids relative to a fixed "today" and optional selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarGridBuilder {
    today: NaiveDate,
    selected: Option<NaiveDate>,
}

impl CalendarGridBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            selected: None,
        }
    }

    pub fn with_selected(mut self, selected: NaiveDate) -> Self {
        self.selected = Some(selected);
        self
    }

    /// Builds all twelve months of `year`.
    ///
    /// Returns an empty list when `year` is outside the representable range.
    pub fn build_year(&self, year: i32) -> Vec<CalendarMonth> {
        (1..=12)
            .filter_map(|month| self.build_month(year, month))
            .collect()
    }

    /// Builds one month grid; `None` for an invalid `(year, month)`.
    pub fn build_month(&self, year: i32, month: u32) -> Option<CalendarMonth> {
        let bounds = DateRange::month(year, month)?;
        let grid_start = week_start(bounds.start)?;
        let grid_end = week_end(bounds.end)?;
        let row_count = ((grid_end - grid_start).num_days() + 1) / 7;

        let mut weeks = Vec::with_capacity(row_count as usize);
        for row in 0..row_count {
            let Some(monday) = grid_start.checked_add_days(Days::new(row as u64 * 7)) else {
                break;
            };
            let Some(week) = self.build_week(monday, &bounds) else {
                break;
            };
            if week.days.iter().any(|day| day.is_in_displayed_month) {
                weeks.push(week);
            }
        }

        Some(CalendarMonth {
            year,
            month,
            label: bounds.start.format("%B").to_string(),
            weeks,
        })
    }

    fn build_week(&self, monday: NaiveDate, bounds: &DateRange) -> Option<CalendarWeek> {
        let days = monday
            .iter_days()
            .take(7)
            .map(|date| CalendarDay {
                date,
                is_in_displayed_month: bounds.contains(date),
                is_today: date == self.today,
                is_selected: self.selected == Some(date),
            })
            .collect::<Vec<_>>();
        let days: [CalendarDay; 7] = days.try_into().ok()?;

        Some(CalendarWeek {
            iso_week_number: monday.iso_week().week(),
            days,
        })
    }
}

/// One Monday-first column of the rolling activity window.
///
/// `None` marks a day after `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecentWeek {
    pub days: [Option<NaiveDate>; 7],
}

/// Monday-aligned rolling window ending in the week containing `today`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentWindow {
    pub today: NaiveDate,
    pub weeks: Vec<RecentWeek>,
}

impl RecentWindow {
    /// Range the activity counts must be fetched for: first visible day
    /// through `today`.
    pub fn query_range(&self) -> Option<DateRange> {
        let first = self
            .weeks
            .first()
            .and_then(|week| week.days.iter().flatten().next().copied())?;
        DateRange::new(first, self.today)
    }

    /// Visible (non-future) days in order.
    pub fn visible_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks
            .iter()
            .flat_map(|week| week.days.iter().flatten().copied())
    }
}

/// Builds the rolling window behind the compact activity strip.
///
/// The window starts on the Monday of the week `week_count - 1` weeks before
/// `today` and ends on the Sunday of today's week. `week_count` is capped at
/// [`MAX_RECENT_WEEKS`].
pub fn build_recent_window(today: NaiveDate, week_count: u32) -> RecentWindow {
    let week_count = week_count.min(MAX_RECENT_WEEKS);
    let mut weeks = Vec::with_capacity(week_count as usize);
    let first_monday = week_count
        .checked_sub(1)
        .and_then(|back| today.checked_sub_days(Days::new(u64::from(back) * 7)))
        .and_then(week_start);

    if let Some(first_monday) = first_monday {
        for column in 0..u64::from(week_count) {
            let Some(monday) = first_monday.checked_add_days(Days::new(column * 7)) else {
                break;
            };
            let mut days = [None; 7];
            for (offset, slot) in days.iter_mut().enumerate() {
                *slot = monday
                    .checked_add_days(Days::new(offset as u64))
                    .filter(|day| *day <= today);
            }
            weeks.push(RecentWeek { days });
        }
    }

    RecentWindow { today, weeks }
}

#[cfg(test)]
mod tests {
    use super::{build_recent_window, CalendarGridBuilder, DEFAULT_RECENT_WEEKS, MAX_RECENT_WEEKS};
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("fixture date should be valid")
    }

    #[test]
    fn january_2024_starts_on_iso_week_one() {
        let months = CalendarGridBuilder::new(date(2024, 6, 1)).build_year(2024);
        let january = &months[0];
        assert_eq!(january.label, "January");
        assert_eq!(january.weeks[0].iso_week_number, 1);
        assert_eq!(january.weeks[0].days[0].date, date(2024, 1, 1));
        assert!(january.weeks[0].days[0].is_in_displayed_month);
    }

    #[test]
    fn january_2021_first_row_belongs_to_week_53() {
        // 2021-01-01 is a Friday; its week is ISO 2020-W53.
        let month = CalendarGridBuilder::new(date(2021, 1, 1))
            .build_month(2021, 1)
            .expect("january should build");
        let first = &month.weeks[0];
        assert_eq!(first.iso_week_number, 53);
        assert_eq!(first.days[0].date, date(2020, 12, 28));
        assert!(!first.days[0].is_in_displayed_month);
        assert!(first.days[4].is_in_displayed_month);
        assert_eq!(month.weeks[1].iso_week_number, 1);
    }

    #[test]
    fn every_week_has_seven_days_and_one_in_month_day() {
        for year in [2023, 2024, 2025, 2026] {
            let months = CalendarGridBuilder::new(date(year, 1, 1)).build_year(year);
            assert_eq!(months.len(), 12);
            for month in &months {
                for week in &month.weeks {
                    assert_eq!(week.days.len(), 7);
                    assert_eq!(week.days[0].date.weekday(), Weekday::Mon);
                    assert!(week.days.iter().any(|d| d.is_in_displayed_month));
                }
            }
        }
    }

    #[test]
    fn month_covers_every_day_exactly_once() {
        let month = CalendarGridBuilder::new(date(2024, 2, 1))
            .build_month(2024, 2)
            .expect("february should build");
        let days: Vec<_> = month.days().map(|d| d.date.day()).collect();
        assert_eq!(days, (1..=29).collect::<Vec<_>>());
    }

    #[test]
    fn today_and_selected_flags_are_set() {
        let months = CalendarGridBuilder::new(date(2024, 3, 5))
            .with_selected(date(2024, 3, 9))
            .build_year(2024);
        let march = &months[2];
        let today: Vec<_> = march.days().filter(|d| d.is_today).collect();
        let selected: Vec<_> = march.days().filter(|d| d.is_selected).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, date(2024, 3, 5));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].date, date(2024, 3, 9));
    }

    #[test]
    fn unrepresentable_year_builds_nothing() {
        let builder = CalendarGridBuilder::new(date(2024, 1, 1));
        assert!(builder.build_year(i32::MAX).is_empty());
    }

    #[test]
    fn recent_window_is_monday_aligned_and_blanks_future() {
        // 2024-05-15 is a Wednesday
        let today = date(2024, 5, 15);
        let window = build_recent_window(today, DEFAULT_RECENT_WEEKS);
        assert_eq!(window.weeks.len(), 17);

        let first = window.weeks[0].days[0].expect("first cell should be in the past");
        assert_eq!(first.weekday(), Weekday::Mon);
        assert_eq!(first, date(2024, 1, 22));

        let last = window.weeks.last().expect("window should not be empty");
        assert_eq!(last.days[2], Some(today));
        assert!(last.days[3..].iter().all(Option::is_none));
        assert!(window.visible_days().all(|d| d <= today));
    }

    #[test]
    fn recent_window_query_range_ends_today() {
        let today = date(2024, 5, 19);
        let window = build_recent_window(today, 2);
        let range = window.query_range().expect("window should have a range");
        assert_eq!(range.start, date(2024, 5, 6));
        assert_eq!(range.end, today);
        assert_eq!(window.visible_days().count(), 14);
    }

    #[test]
    fn zero_week_window_is_empty() {
        let window = build_recent_window(date(2024, 5, 19), 0);
        assert!(window.weeks.is_empty());
        assert!(window.query_range().is_none());
    }

    #[test]
    fn oversized_week_count_is_capped() {
        let today = date(2024, 5, 15);
        let window = build_recent_window(today, u32::MAX);
        assert_eq!(window.weeks.len(), MAX_RECENT_WEEKS as usize);
        let last = window.weeks.last().expect("capped window should not be empty");
        assert_eq!(last.days[2], Some(today));
    }

    #[test]
    fn window_near_the_date_floor_stops_early() {
        let window = build_recent_window(NaiveDate::MIN, MAX_RECENT_WEEKS);
        assert!(window.weeks.is_empty());
    }
}
