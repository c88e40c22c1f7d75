use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a calendar cannot be drawn. Rendering is all-or-nothing: any of
/// these aborts before a document is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("contribution calendar has no weeks")]
    EmptyCalendar,
    #[error("week {week} has {days} days, at most 7 are allowed")]
    TooManyDays { week: usize, days: usize },
    #[error("day {date} in week {week} has weekday {weekday}, expected 0-6")]
    InvalidWeekday {
        week: usize,
        date: NaiveDate,
        weekday: u8,
    },
    #[error("day {date} in week {week} does not come after weekday {previous}")]
    UnorderedWeekday {
        week: usize,
        date: NaiveDate,
        previous: u8,
    },
}

/// Failures of the calendar data source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Missing GITHUB_TOKEN environment variable")]
    MissingToken,
    #[error("User not found or contributions unavailable")]
    UserNotFound,
    #[error("GitHub GraphQL error: {0}")]
    GraphQl(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("upstream returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed calendar data: {0}")]
    Decode(#[from] serde_json::Error),
}
