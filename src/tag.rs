//! Slot tag codec
//!
//! Task titles on the daisy backend are plain strings; the planner views
//! overload them to carry a slot coordinate as a bracketed prefix:
//!
//! - date tag: `[2024-06-01]` (zero-padded `[YYYY-MM-DD]`)
//! - hour tag: `[2PM]` (display hour 1-12, no leading zero, no minutes)
//! - legacy day-of-month tag: `[Day5]` (monthly view, read-back only)
//!
//! A weekly/daily slot key is the date tag immediately followed by the hour
//! tag (`[2024-06-01][2PM]`); a monthly slot key is the date tag alone. The
//! key is followed by a single space and the human-authored note.
//!
//! The codec never fails on read: malformed titles pass through `strip_tags`
//! untouched and simply never match a slot. Only the write path
//! (`build_title`, `encode_hour_tag`) validates.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static DATE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d{4})-(\d{2})-(\d{2})\]$").expect("date tag pattern")
});

static HOUR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d{1,2})(AM|PM)\]$").expect("hour tag pattern"));

/// Any single tag shape at the start of a title, with trailing whitespace.
static LEADING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\[\d{4}-\d{2}-\d{2}\]|\[Day\d+\]|\[\d{1,2}(?:AM|PM)\])\s*")
        .expect("leading tag pattern")
});

/// A full slot key at the start of a title: date tag with optional hour tag,
/// or a legacy day tag.
static SLOT_KEY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\[\d{4}-\d{2}-\d{2}\](?:\[\d{1,2}(?:AM|PM)\])?|\[Day\d+\])")
        .expect("slot key pattern")
});

/// Encode a calendar date as a date tag, e.g. `[2024-06-01]`.
pub fn encode_date_tag(date: NaiveDate) -> String {
    format!(
        "[{:04}-{:02}-{:02}]",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Decode a date tag back into a date. Returns `None` for anything that is
/// not exactly one well-formed date tag.
pub fn decode_date_tag(tag: &str) -> Option<NaiveDate> {
    let caps = DATE_TAG.captures(tag)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Encode a 24-hour wall-clock hour as an hour tag, e.g. `[2PM]`.
///
/// Hours 0 and 12 both render with display hour 12 and differ only in the
/// AM/PM suffix, so callers must always compare the full tag.
pub fn encode_hour_tag(hour: u32) -> Result<String> {
    if hour > 23 {
        return Err(Error::InvalidArgument(format!(
            "hour must be 0-23, got {hour}"
        )));
    }
    let period = if hour < 12 { "AM" } else { "PM" };
    let display = if hour % 12 == 0 { 12 } else { hour % 12 };
    Ok(format!("[{display}{period}]"))
}

/// Decode an hour tag back into a 24-hour wall-clock hour.
pub fn decode_hour_tag(tag: &str) -> Option<u32> {
    let caps = HOUR_TAG.captures(tag)?;
    let display: u32 = caps[1].parse().ok()?;
    if !(1..=12).contains(&display) {
        return None;
    }
    let hour = match (&caps[2], display) {
        ("AM", 12) => 0,
        ("AM", h) => h,
        ("PM", 12) => 12,
        (_, h) => h + 12,
    };
    Some(hour)
}

/// Encode the legacy monthly day tag, e.g. `[Day5]`. New notes are written
/// with the date-tag form; this exists so monthly read-back can still match
/// notes saved by older clients.
pub fn encode_day_tag(day: u32) -> Result<String> {
    if !(1..=31).contains(&day) {
        return Err(Error::InvalidArgument(format!(
            "day must be 1-31, got {day}"
        )));
    }
    Ok(format!("[Day{day}]"))
}

/// Canonical key for a slot: date tag plus optional hour tag, no separator.
pub fn encode_slot_key(date: NaiveDate, hour: Option<u32>) -> Result<String> {
    let mut key = encode_date_tag(date);
    if let Some(hour) = hour {
        key.push_str(&encode_hour_tag(hour)?);
    }
    Ok(key)
}

/// Build a persistable title from a slot key and note text.
///
/// The note is trimmed; an empty note is rejected so blank tasks never reach
/// the backend.
pub fn build_title(slot_key: &str, note: &str) -> Result<String> {
    let note = note.trim();
    if note.is_empty() {
        return Err(Error::EmptyNote);
    }
    Ok(format!("{slot_key} {note}"))
}

/// Strip leading slot tags from a title, returning the trimmed note text.
///
/// Strips repeatedly until no tag-shaped bracket remains at the front, which
/// makes the operation idempotent for arbitrary input (a single pass would
/// not be: removing one hour tag can expose another). For well-formed titles
/// this removes exactly the date/day tag and optional hour tag.
pub fn strip_tags(title: &str) -> String {
    let mut rest = title;
    while let Some(m) = LEADING_TAG.find(rest) {
        rest = &rest[m.end()..];
    }
    rest.trim().to_string()
}

/// Whether a title belongs to the slot addressed by `slot_key`, using the
/// substring containment the daily and weekly views match with.
///
/// Containment is not anchored, so note text that happens to embed a
/// tag-shaped string can false-positive into another slot. This mirrors the
/// deployed behavior; `matches_slot_anchored` is the strict form.
pub fn matches_slot(title: &str, slot_key: &str) -> bool {
    title.contains(slot_key)
}

/// Whether a title starts with `slot_key`. Stricter than `matches_slot`,
/// but still prefix-based: a date-only key matches a date+hour title. Slot
/// resolution that must tell those apart compares `extract_slot_key` output
/// instead.
pub fn matches_slot_anchored(title: &str, slot_key: &str) -> bool {
    title.starts_with(slot_key)
}

/// Extract the slot key prefix from a title, if present.
///
/// Used by delete-and-recreate edits to carry the original slot over to the
/// freshly built title.
pub fn extract_slot_key(title: &str) -> Option<&str> {
    SLOT_KEY_PREFIX.find(title).map(|m| m.as_str())
}
