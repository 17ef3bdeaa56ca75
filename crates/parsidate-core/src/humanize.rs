//! Coarse relative-time rendering.
//!
//! Produces the "3 hours ago" / "in 2 days" strings a front-end shows next
//! to a timestamp. Deliberately coarse: a seconds band, then minutes,
//! hours, days — no weeks, months, or localization. The caller supplies
//! the reference instant; nothing here reads a clock.

use chrono::{DateTime, Utc};

/// Render the distance between a target instant and a reference instant.
///
/// The elapsed time is `reference - target`, so a target in the past reads
/// "ago" and a target in the future reads "in ...". Magnitudes under a
/// minute collapse to `"just now"` / `"in a few seconds"`. Band boundaries
/// are inclusive on the larger unit: exactly 60 seconds is `"1 minute
/// ago"`, exactly 24 hours is `"1 day ago"`. Within a band the count
/// rounds to the nearest unit, with halfway values rounding up.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use parsidate_core::humanize_relative;
///
/// let now = Utc.with_ymd_and_hms(2023, 8, 2, 12, 0, 0).unwrap();
/// let earlier = Utc.with_ymd_and_hms(2023, 8, 2, 9, 0, 0).unwrap();
/// assert_eq!(humanize_relative(earlier, now), "3 hours ago");
/// ```
pub fn humanize_relative(target: DateTime<Utc>, reference: DateTime<Utc>) -> String {
    let elapsed = (reference - target).num_seconds();
    let magnitude = elapsed.unsigned_abs();

    if magnitude < 60 {
        return if elapsed >= 0 {
            "just now".to_string()
        } else {
            "in a few seconds".to_string()
        };
    }

    let (count, unit) = if magnitude < 3_600 {
        (round_div(magnitude, 60), "minute")
    } else if magnitude < 86_400 {
        (round_div(magnitude, 3_600), "hour")
    } else {
        (round_div(magnitude, 86_400), "day")
    };

    let plural = if count == 1 { "" } else { "s" };
    if elapsed >= 0 {
        format!("{count} {unit}{plural} ago")
    } else {
        format!("in {count} {unit}{plural}")
    }
}

fn round_div(value: u64, unit: u64) -> u64 {
    (value + unit / 2) / unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 8, 2, 12, 0, 0).unwrap()
    }

    fn past(seconds: i64) -> String {
        humanize_relative(reference() - Duration::seconds(seconds), reference())
    }

    fn future(seconds: i64) -> String {
        humanize_relative(reference() + Duration::seconds(seconds), reference())
    }

    #[test]
    fn test_zero_elapsed_is_just_now() {
        assert_eq!(past(0), "just now");
    }

    #[test]
    fn test_59_seconds_is_still_the_seconds_band() {
        assert_eq!(past(59), "just now");
        assert_eq!(future(59), "in a few seconds");
    }

    #[test]
    fn test_60_seconds_is_one_minute() {
        assert_eq!(past(60), "1 minute ago");
        assert_eq!(future(60), "in 1 minute");
    }

    #[test]
    fn test_minutes_round_to_nearest() {
        assert_eq!(past(89), "1 minute ago");
        // Halfway points round up: 90s = 1.5 min, 150s = 2.5 min.
        assert_eq!(past(90), "2 minutes ago");
        assert_eq!(past(150), "3 minutes ago");
        assert_eq!(past(149), "2 minutes ago");
    }

    #[test]
    fn test_one_hour_boundary() {
        assert_eq!(past(3_600), "1 hour ago");
        assert_eq!(past(3_599), "60 minutes ago");
    }

    #[test]
    fn test_hours_plural() {
        assert_eq!(past(2 * 3_600), "2 hours ago");
        assert_eq!(future(5 * 3_600), "in 5 hours");
    }

    #[test]
    fn test_one_day_boundary() {
        assert_eq!(past(86_400), "1 day ago");
        assert_eq!(past(86_400 - 1), "24 hours ago");
    }

    #[test]
    fn test_days_round_to_nearest() {
        assert_eq!(past(3 * 86_400), "3 days ago");
        assert_eq!(past(86_400 + 86_400 / 2), "2 days ago");
        assert_eq!(future(10 * 86_400), "in 10 days");
    }
}
