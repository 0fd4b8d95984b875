//! Slot resolvers for the daily, weekly, and monthly views
//!
//! A slot is a `(date)` or `(date, hour)` coordinate. Each view owns a
//! navigable cursor over its slot space and resolves which tasks belong to
//! a slot by matching the slot key against task titles (see the `tag`
//! module for the key grammar and matching rules).

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Error, Result};
use crate::model::Task;
use crate::tag;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Inclusive display range of wall-clock hours for the daily and weekly
/// grids. The web client defaulted to 8AM-8PM with a show-all-24 toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    start: u32,
    end: u32,
}

impl HourRange {
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start > 23 || end > 23 {
            return Err(Error::InvalidArgument(format!(
                "hours must be 0-23, got {start}..={end}"
            )));
        }
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "start hour {start} is after end hour {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The full 24-hour day.
    pub fn all() -> Self {
        Self { start: 0, end: 23 }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self { start: 8, end: 20 }
    }
}

/// Navigable date for the daily view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCursor {
    date: NaiveDate,
}

impl DayCursor {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn previous_day(&mut self) {
        if let Some(date) = self.date.pred_opt() {
            self.date = date;
        }
    }

    pub fn next_day(&mut self) {
        if let Some(date) = self.date.succ_opt() {
            self.date = date;
        }
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Combined key for one hour slot of this day.
    pub fn slot_key(&self, hour: u32) -> Result<String> {
        tag::encode_slot_key(self.date, Some(hour))
    }
}

/// Navigable week for the weekly view. The start is always the Sunday of
/// whatever date the cursor was set from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCursor {
    week_start: NaiveDate,
}

impl WeekCursor {
    /// Cursor for the week containing `date`, normalized back to Sunday.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_sunday();
        let week_start = date
            .checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(date);
        Self { week_start }
    }

    pub fn this_week() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn week_end(&self) -> NaiveDate {
        self.week_start
            .checked_add_days(Days::new(6))
            .unwrap_or(self.week_start)
    }

    pub fn previous_week(&mut self) {
        if let Some(date) = self.week_start.checked_sub_days(Days::new(7)) {
            self.week_start = date;
        }
    }

    pub fn next_week(&mut self) {
        if let Some(date) = self.week_start.checked_add_days(Days::new(7)) {
            self.week_start = date;
        }
    }

    /// The seven days of this week, Sunday through Saturday.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..7)
            .filter_map(|i| self.week_start.checked_add_days(Days::new(i)))
            .collect()
    }

    /// Combined key for one `(day, hour)` cell of the grid.
    pub fn slot_key(&self, date: NaiveDate, hour: u32) -> Result<String> {
        tag::encode_slot_key(date, Some(hour))
    }
}

/// Navigable month for the monthly view. Navigation wraps year boundaries:
/// January back goes to December of the prior year and December forward to
/// January of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    /// First day of the month; keeps year/month always valid.
    first: NaiveDate,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            Error::InvalidArgument(format!("invalid month {year}-{month:02}"))
        })?;
        Ok(Self { first })
    }

    /// Cursor for the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let first = date
            .checked_sub_days(Days::new(u64::from(date.day() - 1)))
            .unwrap_or(date);
        Self { first }
    }

    pub fn this_month() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn previous_month(&mut self) {
        let (year, month) = if self.first.month() == 1 {
            (self.first.year() - 1, 12)
        } else {
            (self.first.year(), self.first.month() - 1)
        };
        if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
            self.first = first;
        }
    }

    pub fn next_month(&mut self) {
        let (year, month) = if self.first.month() == 12 {
            (self.first.year() + 1, 1)
        } else {
            (self.first.year(), self.first.month() + 1)
        };
        if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
            self.first = first;
        }
    }

    pub fn days_in_month(&self) -> u32 {
        match self.first.month() {
            4 | 6 | 9 | 11 => 30,
            2 => {
                if self.first.leap_year() {
                    29
                } else {
                    28
                }
            }
            _ => 31,
        }
    }

    /// Number of blank cells before day 1 when the grid starts on Sunday.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Header label, e.g. "June 2024".
    pub fn label(&self) -> String {
        let name = MONTH_NAMES
            .get(self.first.month0() as usize)
            .copied()
            .unwrap_or("?");
        format!("{} {}", name, self.first.year())
    }

    pub fn date_of(&self, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.first.year(), self.first.month(), day).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "day {day} is out of range for {}",
                self.label()
            ))
        })
    }

    /// Date-tag key for one day cell.
    pub fn slot_key(&self, day: u32) -> Result<String> {
        Ok(tag::encode_date_tag(self.date_of(day)?))
    }

    /// Legacy `[DayN]` key still honored on read.
    pub fn legacy_slot_key(&self, day: u32) -> Result<String> {
        tag::encode_day_tag(day)
    }
}

/// All tasks whose titles match a daily/weekly slot (containment match;
/// multiple tasks may share a slot).
pub fn tasks_for_slot<'a>(tasks: &'a [Task], slot_key: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| tag::matches_slot(&task.title, slot_key))
        .collect()
}

/// The single note for a monthly day cell, if any. The title's extracted
/// slot key must equal the day's key exactly, so an hourly task on the same
/// date (`[2024-06-05][2PM] ...`) is never mistaken for the day note. The
/// date-tag form wins over a legacy `[DayN]` note.
pub fn note_for_day<'a>(
    tasks: &'a [Task],
    date_key: &str,
    legacy_key: &str,
) -> Option<&'a Task> {
    tasks
        .iter()
        .find(|task| tag::extract_slot_key(&task.title) == Some(date_key))
        .or_else(|| {
            tasks
                .iter()
                .find(|task| tag::extract_slot_key(&task.title) == Some(legacy_key))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn task(id: i64, title: &str) -> Task {
        Task {
            id,
            planner_id: 1,
            title: title.to_string(),
            status: TaskStatus::Pending,
            created_at: None,
        }
    }

    #[test]
    fn hour_range_defaults_to_working_day() {
        let range = HourRange::default();
        assert_eq!(range.start(), 8);
        assert_eq!(range.end(), 20);
        assert!(range.contains(8));
        assert!(range.contains(20));
        assert!(!range.contains(7));
        assert!(!range.contains(21));
    }

    #[test]
    fn hour_range_rejects_bad_bounds() {
        assert!(HourRange::new(9, 8).is_err());
        assert!(HourRange::new(0, 24).is_err());
        assert_eq!(HourRange::all().hours().count(), 24);
    }

    #[test]
    fn day_cursor_navigates() {
        let mut cursor = DayCursor::new(date(2024, 6, 1));
        cursor.next_day();
        assert_eq!(cursor.date(), date(2024, 6, 2));
        cursor.previous_day();
        cursor.previous_day();
        assert_eq!(cursor.date(), date(2024, 5, 31));
        assert_eq!(
            cursor.slot_key(14).expect("key"),
            "[2024-05-31][2PM]"
        );
    }

    #[test]
    fn week_start_normalizes_to_sunday() {
        // 2024-06-05 is a Wednesday; the preceding Sunday is 2024-06-02.
        let cursor = WeekCursor::containing(date(2024, 6, 5));
        assert_eq!(cursor.week_start(), date(2024, 6, 2));

        // A Sunday stays itself.
        let sunday = WeekCursor::containing(date(2024, 6, 2));
        assert_eq!(sunday.week_start(), date(2024, 6, 2));

        // A Saturday snaps back six days.
        let saturday = WeekCursor::containing(date(2024, 6, 8));
        assert_eq!(saturday.week_start(), date(2024, 6, 2));
    }

    #[test]
    fn week_cursor_spans_seven_days() {
        let mut cursor = WeekCursor::containing(date(2024, 6, 5));
        let days = cursor.days();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2024, 6, 2));
        assert_eq!(days[6], date(2024, 6, 8));
        assert_eq!(cursor.week_end(), date(2024, 6, 8));

        cursor.next_week();
        assert_eq!(cursor.week_start(), date(2024, 6, 9));
        cursor.previous_week();
        cursor.previous_week();
        assert_eq!(cursor.week_start(), date(2024, 5, 26));
    }

    #[test]
    fn month_navigation_wraps_year_boundaries() {
        let mut cursor = MonthCursor::new(2024, 1).expect("cursor");
        cursor.previous_month();
        assert_eq!((cursor.year(), cursor.month()), (2023, 12));

        let mut cursor = MonthCursor::new(2024, 12).expect("cursor");
        cursor.next_month();
        assert_eq!((cursor.year(), cursor.month()), (2025, 1));

        let mut cursor = MonthCursor::new(2024, 6).expect("cursor");
        cursor.next_month();
        assert_eq!((cursor.year(), cursor.month()), (2024, 7));
    }

    #[test]
    fn month_lengths_respect_leap_years() {
        assert_eq!(MonthCursor::new(2024, 2).expect("cursor").days_in_month(), 29);
        assert_eq!(MonthCursor::new(2023, 2).expect("cursor").days_in_month(), 28);
        assert_eq!(MonthCursor::new(2024, 4).expect("cursor").days_in_month(), 30);
        assert_eq!(MonthCursor::new(2024, 1).expect("cursor").days_in_month(), 31);
    }

    #[test]
    fn leading_blanks_offset_day_one() {
        // June 2024 starts on a Saturday.
        let june = MonthCursor::new(2024, 6).expect("cursor");
        assert_eq!(june.leading_blanks(), 6);
        assert_eq!(june.label(), "June 2024");

        // September 2024 starts on a Sunday.
        let september = MonthCursor::new(2024, 9).expect("cursor");
        assert_eq!(september.leading_blanks(), 0);
    }

    #[test]
    fn month_slot_keys_use_date_tags() {
        let cursor = MonthCursor::new(2024, 6).expect("cursor");
        assert_eq!(cursor.slot_key(1).expect("key"), "[2024-06-01]");
        assert_eq!(cursor.legacy_slot_key(1).expect("key"), "[Day1]");
        assert!(cursor.slot_key(31).is_err());
        assert!(cursor.date_of(0).is_err());
    }

    #[test]
    fn month_cursor_rejects_invalid_months() {
        assert!(MonthCursor::new(2024, 0).is_err());
        assert!(MonthCursor::new(2024, 13).is_err());
    }

    #[test]
    fn slot_resolution_buckets_by_containment() {
        let tasks = vec![
            task(1, "[2024-06-01][2PM] Buy milk"),
            task(2, "[2024-06-01][2PM] Call dentist"),
            task(3, "[2024-06-01][3PM] Gym"),
            task(4, "untagged chore"),
        ];

        let two_pm = tasks_for_slot(&tasks, "[2024-06-01][2PM]");
        assert_eq!(
            two_pm.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(tasks_for_slot(&tasks, "[2024-06-01][4PM]").is_empty());
    }

    #[test]
    fn monthly_note_prefers_date_tag_over_legacy() {
        let tasks = vec![
            task(1, "[Day5] legacy note"),
            task(2, "[2024-06-05] current note"),
            task(3, "[2024-06-06] other day"),
        ];

        let note = note_for_day(&tasks, "[2024-06-05]", "[Day5]").expect("note");
        assert_eq!(note.id, 2);

        // Legacy-only notes still resolve.
        let legacy_only = vec![task(4, "[Day9] rent due")];
        let note = note_for_day(&legacy_only, "[2024-06-09]", "[Day9]").expect("note");
        assert_eq!(note.id, 4);

        assert!(note_for_day(&tasks, "[2024-06-10]", "[Day10]").is_none());
    }

    #[test]
    fn hourly_task_is_never_the_day_note() {
        // A date-only key is a prefix of the hourly key, so the hourly task
        // must not resolve as the monthly note regardless of list order.
        let hourly_only = vec![task(1, "[2024-06-05][2PM] dentist call")];
        assert!(note_for_day(&hourly_only, "[2024-06-05]", "[Day5]").is_none());

        let hourly_first = vec![
            task(1, "[2024-06-05][2PM] dentist call"),
            task(2, "[2024-06-05] pay rent"),
        ];
        let note = note_for_day(&hourly_first, "[2024-06-05]", "[Day5]").expect("note");
        assert_eq!(note.id, 2);

        // Same for the legacy form: [Day5] must not swallow hourly tasks
        // sharing the day number in their note text.
        let legacy_mixed = vec![
            task(3, "[2024-06-05][9AM] standup"),
            task(4, "[Day5] legacy note"),
        ];
        let note = note_for_day(&legacy_mixed, "[2024-06-05]", "[Day5]").expect("note");
        assert_eq!(note.id, 4);
    }
}
