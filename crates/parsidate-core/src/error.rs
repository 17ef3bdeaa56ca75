//! Error types for parsidate-core operations.

use thiserror::Error;

/// Failures surfaced by the conversion core.
///
/// Every failure in this crate is a value of this type returned to the
/// caller; nothing here panics or aborts. [`ConvertError::NoPatternMatch`]
/// and [`ConvertError::InvalidCalendarDate`] are ordinary user-facing
/// validation outcomes, not exceptional conditions.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("No date/time pattern matched: {0}")]
    NoPatternMatch(String),

    #[error("Invalid calendar date: {0}")]
    InvalidCalendarDate(String),

    #[error("Unknown timezone: {0}")]
    UnknownZone(String),

    #[error("Unsupported calendar: {0}")]
    UnsupportedCalendar(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
