//! Calendar view commands: day, week, month.
//!
//! Each handler resolves slots through the cursors in the `slot` module and
//! buckets tasks with the tag codec. Hour-range preferences for the daily
//! and weekly grids persist across runs through the `prefs` store.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Task;
use crate::output::{emit_success, HumanOutput};
use crate::prefs::{FilePrefStore, PrefStore};
use crate::slot::{self, DayCursor, HourRange, MonthCursor, WeekCursor};
use crate::tag;

use super::{parse_date_arg, resolve_planner, Context};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Args, Debug)]
pub struct DayArgs {
    /// Planner name or id
    pub planner: String,

    /// Date to show (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Step back one day from the selected date
    #[arg(long, conflicts_with = "next")]
    pub prev: bool,

    /// Step forward one day from the selected date
    #[arg(long)]
    pub next: bool,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args, Debug)]
pub struct WeekArgs {
    /// Planner name or id
    pub planner: String,

    /// Any date inside the week to show (normalized back to Sunday)
    #[arg(long)]
    pub date: Option<String>,

    /// Step back one week
    #[arg(long, conflicts_with = "next")]
    pub prev: bool,

    /// Step forward one week
    #[arg(long)]
    pub next: bool,

    #[command(flatten)]
    pub range: RangeArgs,
}

/// Hour-range flags shared by the daily and weekly grids. When given, the
/// new values are persisted per view for subsequent runs.
#[derive(Args, Debug)]
pub struct RangeArgs {
    /// First hour to show (0-23)
    #[arg(long, value_name = "HOUR")]
    pub from: Option<u32>,

    /// Last hour to show (0-23, inclusive)
    #[arg(long, value_name = "HOUR")]
    pub to: Option<u32>,

    /// Show all 24 hours
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub all: bool,

    /// Show the custom hour range again after a previous --all
    #[arg(long, conflicts_with = "all")]
    pub custom: bool,
}

/// Monthly view subcommands
#[derive(Subcommand, Debug)]
pub enum MonthCommands {
    /// Show the month grid
    Show {
        /// Planner name or id
        planner: String,

        #[command(flatten)]
        nav: MonthNav,
    },

    /// Set (or replace) the note for a day
    Note {
        /// Planner name or id
        planner: String,

        /// Day of month (1-31)
        day: u32,

        /// Note text
        text: String,

        #[command(flatten)]
        nav: MonthNav,
    },

    /// Remove the note for a day
    Clear {
        /// Planner name or id
        planner: String,

        /// Day of month (1-31)
        day: u32,

        #[command(flatten)]
        nav: MonthNav,
    },
}

#[derive(Args, Debug)]
pub struct MonthNav {
    /// Year (defaults to the current month's)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month 1-12 (defaults to the current month)
    #[arg(long)]
    pub month: Option<u32>,

    /// Step back one month
    #[arg(long, conflicts_with = "next")]
    pub prev: bool,

    /// Step forward one month
    #[arg(long)]
    pub next: bool,
}

#[derive(Serialize)]
struct HourSlot {
    hour: u32,
    slot_key: String,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct DayOutput {
    planner_id: i64,
    date: chrono::NaiveDate,
    hours: Vec<HourSlot>,
}

#[derive(Serialize)]
struct WeekDayOutput {
    date: chrono::NaiveDate,
    slots: Vec<HourSlot>,
}

#[derive(Serialize)]
struct WeekOutput {
    planner_id: i64,
    week_start: chrono::NaiveDate,
    week_end: chrono::NaiveDate,
    days: Vec<WeekDayOutput>,
}

#[derive(Serialize)]
struct MonthDayOutput {
    day: u32,
    slot_key: String,
    note: Option<Task>,
}

#[derive(Serialize)]
struct MonthOutput {
    planner_id: i64,
    year: i32,
    month: u32,
    leading_blanks: u32,
    days: Vec<MonthDayOutput>,
}

/// Display form of an hour, e.g. "2:00 PM".
fn format_hour(hour: u32) -> String {
    let period = if hour < 12 { "AM" } else { "PM" };
    let display = if hour % 12 == 0 { 12 } else { hour % 12 };
    format!("{display}:00 {period}")
}

/// Resolve the hour range for a view, applying and persisting any flag
/// overrides. The toggle and bounds are remembered per view.
pub fn resolve_range(
    store: &dyn PrefStore,
    view: &str,
    args: &RangeArgs,
) -> Result<HourRange> {
    let mut prefs = store.load(view)?;
    let mut changed = false;

    if args.all {
        prefs.show_all_hours = true;
        changed = true;
    }
    if args.custom {
        prefs.show_all_hours = false;
        changed = true;
    }
    if let Some(from) = args.from {
        prefs.start_hour = from;
        prefs.show_all_hours = false;
        changed = true;
    }
    if let Some(to) = args.to {
        prefs.end_hour = to;
        prefs.show_all_hours = false;
        changed = true;
    }

    // Validate before persisting so a bad flag cannot wedge the saved state.
    let range = prefs.hour_range()?;
    if changed {
        store.save(view, prefs)?;
    }
    Ok(range)
}

pub async fn day(ctx: &Context, args: &DayArgs) -> Result<()> {
    let store = FilePrefStore::default_location()?;
    let range = resolve_range(&store, "daily", &args.range)?;

    let mut cursor = DayCursor::new(parse_date_arg(args.date.as_deref())?);
    if args.prev {
        cursor.previous_day();
    }
    if args.next {
        cursor.next_day();
    }

    let client = ctx.client()?;
    let planner = resolve_planner(&client, &args.planner).await?;
    let tasks = client.tasks(planner.id).await?;

    let mut hours = Vec::new();
    for hour in range.hours() {
        let slot_key = cursor.slot_key(hour)?;
        let slot_tasks = slot::tasks_for_slot(&tasks, &slot_key)
            .into_iter()
            .cloned()
            .collect();
        hours.push(HourSlot {
            hour,
            slot_key,
            tasks: slot_tasks,
        });
    }

    let mut human = HumanOutput::new(format!(
        "{} - {}",
        planner.name,
        cursor.date().format("%A, %B %-d, %Y")
    ));
    for slot in &hours {
        if slot.tasks.is_empty() {
            human.push_detail(format!("{:>8}  -", format_hour(slot.hour)));
        } else {
            for task in &slot.tasks {
                human.push_detail(format!(
                    "{:>8}  #{} {}",
                    format_hour(slot.hour),
                    task.id,
                    tag::strip_tags(&task.title)
                ));
            }
        }
    }

    emit_success(
        ctx.options,
        "day",
        &DayOutput {
            planner_id: planner.id,
            date: cursor.date(),
            hours,
        },
        Some(&human),
    )
}

pub async fn week(ctx: &Context, args: &WeekArgs) -> Result<()> {
    let store = FilePrefStore::default_location()?;
    let range = resolve_range(&store, "weekly", &args.range)?;

    let mut cursor = WeekCursor::containing(parse_date_arg(args.date.as_deref())?);
    if args.prev {
        cursor.previous_week();
    }
    if args.next {
        cursor.next_week();
    }

    let client = ctx.client()?;
    let planner = resolve_planner(&client, &args.planner).await?;
    let tasks = client.tasks(planner.id).await?;

    let mut days = Vec::new();
    for date in cursor.days() {
        let mut slots = Vec::new();
        for hour in range.hours() {
            let slot_key = cursor.slot_key(date, hour)?;
            let slot_tasks: Vec<Task> = slot::tasks_for_slot(&tasks, &slot_key)
                .into_iter()
                .cloned()
                .collect();
            if !slot_tasks.is_empty() {
                slots.push(HourSlot {
                    hour,
                    slot_key,
                    tasks: slot_tasks,
                });
            }
        }
        days.push(WeekDayOutput { date, slots });
    }

    let mut human = HumanOutput::new(format!(
        "{} - week of {} to {}",
        planner.name,
        cursor.week_start().format("%b %-d"),
        cursor.week_end().format("%b %-d, %Y")
    ));
    for (index, day) in days.iter().enumerate() {
        let name = DAY_NAMES.get(index).copied().unwrap_or("?");
        if day.slots.is_empty() {
            human.push_detail(format!("{name} {} -", day.date.format("%m-%d")));
            continue;
        }
        for slot in &day.slots {
            for task in &slot.tasks {
                human.push_detail(format!(
                    "{name} {} {:>8}  #{} {}",
                    day.date.format("%m-%d"),
                    format_hour(slot.hour),
                    task.id,
                    tag::strip_tags(&task.title)
                ));
            }
        }
    }

    emit_success(
        ctx.options,
        "week",
        &WeekOutput {
            planner_id: planner.id,
            week_start: cursor.week_start(),
            week_end: cursor.week_end(),
            days,
        },
        Some(&human),
    )
}

fn month_cursor(nav: &MonthNav) -> Result<MonthCursor> {
    let mut cursor = match (nav.year, nav.month) {
        (Some(year), Some(month)) => MonthCursor::new(year, month)?,
        (None, None) => MonthCursor::this_month(),
        (year, month) => {
            let current = MonthCursor::this_month();
            MonthCursor::new(
                year.unwrap_or_else(|| current.year()),
                month.unwrap_or_else(|| current.month()),
            )?
        }
    };
    if nav.prev {
        cursor.previous_month();
    }
    if nav.next {
        cursor.next_month();
    }
    Ok(cursor)
}

pub async fn month(ctx: &Context, cmd: &MonthCommands) -> Result<()> {
    match cmd {
        MonthCommands::Show { planner, nav } => month_show(ctx, planner, nav).await,
        MonthCommands::Note {
            planner,
            day,
            text,
            nav,
        } => month_note(ctx, planner, *day, text, nav).await,
        MonthCommands::Clear { planner, day, nav } => month_clear(ctx, planner, *day, nav).await,
    }
}

async fn month_show(ctx: &Context, planner: &str, nav: &MonthNav) -> Result<()> {
    let cursor = month_cursor(nav)?;
    let client = ctx.client()?;
    let planner = resolve_planner(&client, planner).await?;
    let tasks = client.tasks(planner.id).await?;

    let mut days = Vec::new();
    for day in 1..=cursor.days_in_month() {
        let slot_key = cursor.slot_key(day)?;
        let legacy_key = cursor.legacy_slot_key(day)?;
        let note = slot::note_for_day(&tasks, &slot_key, &legacy_key).cloned();
        days.push(MonthDayOutput {
            day,
            slot_key,
            note,
        });
    }

    let mut human = HumanOutput::new(format!("{} - {}", planner.name, cursor.label()));
    let weekday = DAY_NAMES
        .get(cursor.leading_blanks() as usize)
        .copied()
        .unwrap_or("?");
    human.push_summary("starts on", weekday);
    for day in &days {
        if let Some(note) = &day.note {
            human.push_detail(format!(
                "{:>2}: #{} {}",
                day.day,
                note.id,
                tag::strip_tags(&note.title)
            ));
        }
    }
    if days.iter().all(|day| day.note.is_none()) {
        human.push_detail("no notes this month".to_string());
    }

    emit_success(
        ctx.options,
        "month show",
        &MonthOutput {
            planner_id: planner.id,
            year: cursor.year(),
            month: cursor.month(),
            leading_blanks: cursor.leading_blanks(),
            days,
        },
        Some(&human),
    )
}

/// Save a day note. The monthly view keeps at most one note per day by
/// convention, so an existing note (date-tag or legacy `[DayN]`) is deleted
/// before the replacement is created; the backend has no update endpoint.
async fn month_note(
    ctx: &Context,
    planner: &str,
    day: u32,
    text: &str,
    nav: &MonthNav,
) -> Result<()> {
    let cursor = month_cursor(nav)?;
    let slot_key = cursor.slot_key(day)?;
    let legacy_key = cursor.legacy_slot_key(day)?;
    let title = tag::build_title(&slot_key, text)?;

    let client = ctx.client()?;
    let planner = resolve_planner(&client, planner).await?;
    let tasks = client.tasks(planner.id).await?;

    let replaced = slot::note_for_day(&tasks, &slot_key, &legacy_key).map(|note| note.id);
    if let Some(old_id) = replaced {
        client.delete_task(old_id).await?;
    }

    let created = match client.create_task(planner.id, &title).await {
        Ok(task) => task,
        Err(err) if replaced.is_some() => {
            return Err(Error::OperationFailed(format!(
                "old note was deleted but saving the new one failed ({err}); re-add it manually"
            )));
        }
        Err(err) => return Err(err),
    };

    let tasks = client.tasks(planner.id).await?;

    let mut human = HumanOutput::new(format!(
        "Saved note for {} {}",
        cursor.label(),
        day
    ));
    human.push_summary("task", format!("#{}", created.id));
    if let Some(old_id) = replaced {
        human.push_summary("replaced", format!("#{old_id}"));
    }
    human.push_summary("tasks in planner", tasks.len().to_string());

    emit_success(ctx.options, "month note", &created, Some(&human))
}

async fn month_clear(ctx: &Context, planner: &str, day: u32, nav: &MonthNav) -> Result<()> {
    let cursor = month_cursor(nav)?;
    let slot_key = cursor.slot_key(day)?;
    let legacy_key = cursor.legacy_slot_key(day)?;

    let client = ctx.client()?;
    let planner = resolve_planner(&client, planner).await?;
    let tasks = client.tasks(planner.id).await?;

    let note = slot::note_for_day(&tasks, &slot_key, &legacy_key)
        .ok_or_else(|| Error::InvalidArgument(format!("no note on {} {day}", cursor.label())))?;
    client.delete_task(note.id).await?;

    let human = HumanOutput::new(format!("Cleared note for {} {day}", cursor.label()));
    emit_success(
        ctx.options,
        "month clear",
        &serde_json::json!({ "deleted": note.id, "slot_key": slot_key }),
        Some(&human),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefStore;

    fn range_args(from: Option<u32>, to: Option<u32>, all: bool, custom: bool) -> RangeArgs {
        RangeArgs {
            from,
            to,
            all,
            custom,
        }
    }

    #[test]
    fn hour_formatting_matches_planner_labels() {
        assert_eq!(format_hour(0), "12:00 AM");
        assert_eq!(format_hour(9), "9:00 AM");
        assert_eq!(format_hour(12), "12:00 PM");
        assert_eq!(format_hour(14), "2:00 PM");
        assert_eq!(format_hour(23), "11:00 PM");
    }

    #[test]
    fn range_defaults_without_flags() {
        let store = MemoryPrefStore::default();
        let range =
            resolve_range(&store, "daily", &range_args(None, None, false, false)).expect("range");
        assert_eq!((range.start(), range.end()), (8, 20));
    }

    #[test]
    fn range_flags_persist_per_view() {
        let store = MemoryPrefStore::default();

        let range = resolve_range(&store, "daily", &range_args(Some(6), Some(22), false, false))
            .expect("range");
        assert_eq!((range.start(), range.end()), (6, 22));

        // Subsequent runs without flags keep the saved bounds.
        let range =
            resolve_range(&store, "daily", &range_args(None, None, false, false)).expect("range");
        assert_eq!((range.start(), range.end()), (6, 22));

        // The weekly view is untouched.
        let range =
            resolve_range(&store, "weekly", &range_args(None, None, false, false)).expect("range");
        assert_eq!((range.start(), range.end()), (8, 20));
    }

    #[test]
    fn show_all_toggle_round_trips() {
        let store = MemoryPrefStore::default();

        let range =
            resolve_range(&store, "weekly", &range_args(None, None, true, false)).expect("range");
        assert_eq!((range.start(), range.end()), (0, 23));

        // Persisted across runs.
        let range =
            resolve_range(&store, "weekly", &range_args(None, None, false, false)).expect("range");
        assert_eq!((range.start(), range.end()), (0, 23));

        // --custom flips back to the remembered bounds.
        let range =
            resolve_range(&store, "weekly", &range_args(None, None, false, true)).expect("range");
        assert_eq!((range.start(), range.end()), (8, 20));
    }

    #[test]
    fn invalid_range_is_not_persisted() {
        let store = MemoryPrefStore::default();
        let err = resolve_range(&store, "daily", &range_args(Some(22), Some(6), false, false))
            .expect_err("inverted range");
        assert!(matches!(err, Error::InvalidArgument(_)));

        // The bad bounds did not stick.
        let range =
            resolve_range(&store, "daily", &range_args(None, None, false, false)).expect("range");
        assert_eq!((range.start(), range.end()), (8, 20));
    }

    #[test]
    fn month_nav_resolves_relative_steps() {
        let nav = MonthNav {
            year: Some(2024),
            month: Some(1),
            prev: true,
            next: false,
        };
        let cursor = month_cursor(&nav).expect("cursor");
        assert_eq!((cursor.year(), cursor.month()), (2023, 12));

        let nav = MonthNav {
            year: Some(2024),
            month: Some(12),
            prev: false,
            next: true,
        };
        let cursor = month_cursor(&nav).expect("cursor");
        assert_eq!((cursor.year(), cursor.month()), (2025, 1));
    }
}
