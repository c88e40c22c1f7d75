//! Human-readable text for dates and contribution counts.

use chrono::{Datelike, NaiveDate};

/// English ordinal suffix for a day of the month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Full English month name, e.g. `January`.
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// Three letter month name, e.g. `Jan`.
pub fn short_month_name(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

/// Tooltip sentence attached to a calendar cell.
pub fn format_tooltip(count: u32, date: NaiveDate) -> String {
    let prefix = match count {
        0 => "No contributions".to_string(),
        1 => "1 contribution".to_string(),
        n => format!("{n} contributions"),
    };
    let day = date.day();
    format!(
        "{prefix} on {} {day}{}, {}",
        month_name(date),
        ordinal_suffix(day),
        date.year()
    )
}

/// Same as [`format_tooltip`] for an ISO 8601 (`YYYY-MM-DD`) date string.
pub fn format_tooltip_iso(count: u32, date: &str) -> Result<String, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")?;
    Ok(format_tooltip(count, date))
}
