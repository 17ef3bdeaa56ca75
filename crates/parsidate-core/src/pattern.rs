//! Tolerant date/time literal grammar.
//!
//! Matches the canonical form produced by
//! [`normalize_for_date`](crate::normalize::normalize_for_date): a 2–4
//! digit year, month, and day joined by `'/'`, `'-'`, `'.'`, or space,
//! optionally followed by `HH:MM` or `HH:MM:SS`. The whole string must
//! match; there are no partial matches. Extraction is purely syntactic —
//! month 13 is fine here and is rejected later by the calendar converter.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// The six integer fields extracted from a date/time literal.
///
/// `has_time` distinguishes date-only input (time defaulted to 00:00:00)
/// from input that carried an explicit clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParsedDateTimeFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub has_time: bool,
}

fn date_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^ ?(\d{2,4})[-/. ](\d{1,2})[-/. ](\d{1,2})(?: +(\d{1,2}):(\d{1,2})(?::(\d{1,2}))?)? ?$",
        )
        .unwrap()
    })
}

/// Match a normalized string against the date/time grammar.
///
/// Returns `None` when the grammar does not cover the entire string or a
/// captured group does not parse as an integer. "No match" is an ordinary
/// outcome — callers treat it as "try the next strategy", never as an
/// error.
pub fn match_date_time(normalized: &str) -> Option<ParsedDateTimeFields> {
    let caps = date_time_pattern().captures(normalized)?;

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;

    let (hour, minute, second, has_time) = match (caps.get(4), caps.get(5)) {
        (Some(h), Some(m)) => {
            let second = match caps.get(6) {
                Some(s) => s.as_str().parse().ok()?,
                None => 0,
            };
            (h.as_str().parse().ok()?, m.as_str().parse().ok()?, second, true)
        }
        _ => (0, 0, 0, false),
    };

    Some(ParsedDateTimeFields {
        year,
        month,
        day,
        hour,
        minute,
        second,
        has_time,
    })
}
