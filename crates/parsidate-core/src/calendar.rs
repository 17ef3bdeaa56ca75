//! Persian, Hijri, and Gregorian calendar converters.
//!
//! All three calendars convert through a shared substrate: the proleptic
//! Gregorian day number ("fixed day", day 1 = 0001-01-01), which is exactly
//! chrono's `num_days_from_ce`. The Persian converter uses the 33-year
//! arithmetic leap rule; the Hijri converter uses the tabular civil
//! (Friday-epoch) lunar rule. Both are exact integer arithmetic — no
//! floating point, no clamping.
//!
//! A date the target calendar cannot represent (month 13, Esfand 30 in a
//! non-leap year, a year outside chrono's range) is a typed
//! [`InvalidCalendarDate`](crate::error::ConvertError::InvalidCalendarDate)
//! failure, never a panic and never a silently adjusted value.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Fixed day of 1 Farvardin 1 AP (622-03-19 Julian).
const PERSIAN_EPOCH: i64 = 226_896;

/// Fixed day of 1 Muharram 1 AH in the tabular civil reckoning
/// (622-07-16 Julian, a Friday).
const HIJRI_EPOCH: i64 = 227_015;

/// The calendar systems this core understands.
///
/// `Other` is accepted as an input tag but never produces a conversion —
/// it tells callers "treat this value as opaque".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    Gregorian,
    Persian,
    Hijri,
    Other,
}

impl CalendarKind {
    /// Map a host-supplied calendar tag to a kind.
    ///
    /// Unrecognized tags map to [`CalendarKind::Other`] rather than
    /// failing; the tag is an input channel, not a validation surface.
    /// Also available through [`std::str::FromStr`] (infallible) for
    /// callers that prefer `str::parse`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "gregorian" | "miladi" => CalendarKind::Gregorian,
            "persian" | "jalali" | "shamsi" => CalendarKind::Persian,
            "hijri" | "islamic" | "ghamari" => CalendarKind::Hijri,
            _ => CalendarKind::Other,
        }
    }

    /// Build a calendar-agnostic civil instant from calendar-specific
    /// fields.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidCalendarDate`] when the fields are not a
    /// representable date/time in this calendar;
    /// [`ConvertError::UnsupportedCalendar`] for [`CalendarKind::Other`].
    pub fn to_civil_instant(
        self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<NaiveDateTime> {
        let date = match self {
            CalendarKind::Gregorian => gregorian_date(year, month, day)?,
            CalendarKind::Persian => persian_date(year, month, day)?,
            CalendarKind::Hijri => hijri_date(year, month, day)?,
            CalendarKind::Other => {
                return Err(ConvertError::UnsupportedCalendar(
                    "cannot convert fields tagged as an opaque calendar".to_string(),
                ));
            }
        };
        date.and_hms_opt(hour, minute, second).ok_or_else(|| {
            ConvertError::InvalidCalendarDate(format!(
                "invalid time of day {hour:02}:{minute:02}:{second:02}"
            ))
        })
    }

    /// Split a civil instant's date into this calendar's (year, month, day).
    ///
    /// # Errors
    ///
    /// [`ConvertError::UnsupportedCalendar`] for [`CalendarKind::Other`];
    /// the concrete calendars are total over chrono's date range.
    pub fn from_civil_instant(self, civil: NaiveDateTime) -> Result<(i32, u32, u32)> {
        let date = civil.date();
        match self {
            CalendarKind::Gregorian => Ok((date.year(), date.month(), date.day())),
            CalendarKind::Persian => Ok(persian_from_fixed(fixed_day(date))),
            CalendarKind::Hijri => Ok(hijri_from_fixed(fixed_day(date))),
            CalendarKind::Other => Err(ConvertError::UnsupportedCalendar(
                "an opaque calendar has no field representation".to_string(),
            )),
        }
    }
}

impl std::str::FromStr for CalendarKind {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_tag(tag))
    }
}

// ── Shared day-number substrate ─────────────────────────────────────────────

fn fixed_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

fn date_from_fixed(fixed: i64, year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    i32::try_from(fixed)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| {
            ConvertError::InvalidCalendarDate(format!(
                "{year:04}/{month:02}/{day:02} is outside the representable date range"
            ))
        })
}

// ── Gregorian ───────────────────────────────────────────────────────────────

fn gregorian_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ConvertError::InvalidCalendarDate(format!(
            "{year:04}-{month:02}-{day:02} is not a valid Gregorian date"
        ))
    })
}

// ── Persian (solar Hijri) ───────────────────────────────────────────────────

/// Whether a Persian year is leap under the 33-year arithmetic rule.
pub fn is_persian_leap_year(year: i32) -> bool {
    (25 * i64::from(year) + 11).rem_euclid(33) < 8
}

/// Days in a Persian month, or `None` for a month outside 1–12.
pub fn persian_month_days(year: i32, month: u32) -> Option<u32> {
    match month {
        1..=6 => Some(31),
        7..=11 => Some(30),
        12 => Some(if is_persian_leap_year(year) { 30 } else { 29 }),
        _ => None,
    }
}

fn persian_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let invalid = || {
        ConvertError::InvalidCalendarDate(format!(
            "{year:04}/{month:02}/{day:02} is not a valid Persian date"
        ))
    };
    if year < 1 {
        return Err(invalid());
    }
    let month_days = persian_month_days(year, month).ok_or_else(invalid)?;
    if day < 1 || day > month_days {
        return Err(invalid());
    }
    date_from_fixed(fixed_from_persian(year, month, day), year, month, day)
}

fn persian_new_year(year: i32) -> i64 {
    let y = i64::from(year);
    PERSIAN_EPOCH - 1 + 365 * (y - 1) + (8 * y + 21).div_euclid(33)
}

fn fixed_from_persian(year: i32, month: u32, day: u32) -> i64 {
    let m = i64::from(month);
    let days_before_month = if m <= 7 { 31 * (m - 1) } else { 30 * (m - 1) + 6 };
    persian_new_year(year) - 1 + days_before_month + i64::from(day)
}

fn persian_from_fixed(fixed: i64) -> (i32, u32, u32) {
    let days_since_epoch = fixed - PERSIAN_EPOCH + 1;
    let year = (1 + (33 * days_since_epoch + 3).div_euclid(12_053)) as i32;
    let mut day = fixed - fixed_from_persian(year, 1, 1) + 1;
    let mut month = 1u32;
    while month < 12 {
        let len = if month <= 6 { 31 } else { 30 };
        if day <= len {
            break;
        }
        day -= len;
        month += 1;
    }
    (year, month, day as u32)
}

// ── Hijri (tabular lunar) ───────────────────────────────────────────────────

/// Whether a Hijri year is leap in the tabular 30-year cycle.
pub fn is_hijri_leap_year(year: i32) -> bool {
    (11 * i64::from(year) + 14).rem_euclid(30) < 11
}

/// Days in a Hijri month, or `None` for a month outside 1–12.
pub fn hijri_month_days(year: i32, month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 9 | 11 => Some(30),
        2 | 4 | 6 | 8 | 10 => Some(29),
        12 => Some(if is_hijri_leap_year(year) { 30 } else { 29 }),
        _ => None,
    }
}

fn hijri_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let invalid = || {
        ConvertError::InvalidCalendarDate(format!(
            "{year:04}/{month:02}/{day:02} is not a valid Hijri date"
        ))
    };
    if year < 1 {
        return Err(invalid());
    }
    let month_days = hijri_month_days(year, month).ok_or_else(invalid)?;
    if day < 1 || day > month_days {
        return Err(invalid());
    }
    date_from_fixed(fixed_from_hijri(year, month, day), year, month, day)
}

fn fixed_from_hijri(year: i32, month: u32, day: u32) -> i64 {
    let y = i64::from(year);
    let m = i64::from(month);
    HIJRI_EPOCH - 1
        + (y - 1) * 354
        + (3 + 11 * y).div_euclid(30)
        + 29 * (m - 1)
        + m.div_euclid(2)
        + i64::from(day)
}

fn hijri_from_fixed(fixed: i64) -> (i32, u32, u32) {
    let year = ((fixed - HIJRI_EPOCH) * 30 + 10_646).div_euclid(10_631) as i32;
    let mut day = fixed - fixed_from_hijri(year, 1, 1) + 1;
    let mut month = 1u32;
    while month < 12 {
        let len = if month % 2 == 1 { 30 } else { 29 };
        if day <= len {
            break;
        }
        day -= len;
        month += 1;
    }
    (year, month, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn civil(kind: CalendarKind, y: i32, m: u32, d: u32) -> Result<NaiveDateTime> {
        kind.to_civil_instant(y, m, d, 0, 0, 0)
    }

    // ── Persian ─────────────────────────────────────────────────────────

    #[test]
    fn test_persian_known_anchor() {
        // 11 Mordad 1402 is 2 August 2023.
        let instant = civil(CalendarKind::Persian, 1402, 5, 11).unwrap();
        assert_eq!(instant.date(), NaiveDate::from_ymd_opt(2023, 8, 2).unwrap());
    }

    #[test]
    fn test_nowruz_1402() {
        let instant = civil(CalendarKind::Persian, 1402, 1, 1).unwrap();
        assert_eq!(instant.date(), NaiveDate::from_ymd_opt(2023, 3, 21).unwrap());
    }

    #[test]
    fn test_persian_leap_years() {
        assert!(is_persian_leap_year(1403));
        assert!(!is_persian_leap_year(1402));
        assert!(!is_persian_leap_year(1404));
    }

    #[test]
    fn test_persian_esfand_length_tracks_leap() {
        assert_eq!(persian_month_days(1403, 12), Some(30));
        assert_eq!(persian_month_days(1402, 12), Some(29));
        assert!(civil(CalendarKind::Persian, 1403, 12, 30).is_ok());
        assert!(matches!(
            civil(CalendarKind::Persian, 1402, 12, 30),
            Err(ConvertError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_persian_month_13_rejected() {
        assert!(matches!(
            civil(CalendarKind::Persian, 1402, 13, 1),
            Err(ConvertError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_persian_day_32_rejected() {
        assert!(matches!(
            civil(CalendarKind::Persian, 1402, 1, 32),
            Err(ConvertError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_persian_round_trip_through_civil() {
        let instant = civil(CalendarKind::Persian, 1402, 5, 11).unwrap();
        let fields = CalendarKind::Persian.from_civil_instant(instant).unwrap();
        assert_eq!(fields, (1402, 5, 11));
    }

    #[test]
    fn test_persian_last_day_of_leap_year() {
        let instant = civil(CalendarKind::Persian, 1403, 12, 30).unwrap();
        let fields = CalendarKind::Persian.from_civil_instant(instant).unwrap();
        assert_eq!(fields, (1403, 12, 30));
        // The next day is Nowruz 1404.
        let next = instant.date().succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(
            CalendarKind::Persian.from_civil_instant(next).unwrap(),
            (1404, 1, 1)
        );
    }

    // ── Hijri ───────────────────────────────────────────────────────────

    #[test]
    fn test_hijri_known_anchor() {
        // 1 Muharram 1446 is 8 July 2024 in the tabular civil reckoning.
        let instant = civil(CalendarKind::Hijri, 1446, 1, 1).unwrap();
        assert_eq!(instant.date(), NaiveDate::from_ymd_opt(2024, 7, 8).unwrap());
    }

    #[test]
    fn test_ramadan_1445() {
        let instant = civil(CalendarKind::Hijri, 1445, 9, 1).unwrap();
        assert_eq!(instant.date(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }

    #[test]
    fn test_hijri_leap_cycle() {
        // Leap years of the 30-year tabular cycle.
        let leaps: Vec<i32> = (1..=30).filter(|&y| is_hijri_leap_year(y)).collect();
        assert_eq!(leaps, vec![2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29]);
    }

    #[test]
    fn test_hijri_month_lengths() {
        assert_eq!(hijri_month_days(1446, 1), Some(30));
        assert_eq!(hijri_month_days(1446, 2), Some(29));
        assert_eq!(hijri_month_days(1445, 12), Some(29));
        assert_eq!(hijri_month_days(1447, 12), Some(30));
        assert_eq!(hijri_month_days(1446, 13), None);
    }

    #[test]
    fn test_hijri_invalid_day_rejected() {
        assert!(matches!(
            civil(CalendarKind::Hijri, 1446, 2, 30),
            Err(ConvertError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_hijri_round_trip_through_civil() {
        let instant = civil(CalendarKind::Hijri, 1445, 9, 15).unwrap();
        let fields = CalendarKind::Hijri.from_civil_instant(instant).unwrap();
        assert_eq!(fields, (1445, 9, 15));
    }

    // ── Gregorian ───────────────────────────────────────────────────────

    #[test]
    fn test_gregorian_identity() {
        let instant = civil(CalendarKind::Gregorian, 2024, 2, 29).unwrap();
        assert_eq!(
            CalendarKind::Gregorian.from_civil_instant(instant).unwrap(),
            (2024, 2, 29)
        );
    }

    #[test]
    fn test_gregorian_feb_29_non_leap_rejected() {
        assert!(matches!(
            civil(CalendarKind::Gregorian, 2023, 2, 29),
            Err(ConvertError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_invalid_time_rejected() {
        let err = CalendarKind::Gregorian.to_civil_instant(2023, 8, 2, 24, 0, 0);
        assert!(matches!(err, Err(ConvertError::InvalidCalendarDate(_))));
    }

    // ── Other ───────────────────────────────────────────────────────────

    #[test]
    fn test_other_never_converts() {
        assert!(matches!(
            civil(CalendarKind::Other, 2023, 8, 2),
            Err(ConvertError::UnsupportedCalendar(_))
        ));
        let instant = civil(CalendarKind::Gregorian, 2023, 8, 2).unwrap();
        assert!(matches!(
            CalendarKind::Other.from_civil_instant(instant),
            Err(ConvertError::UnsupportedCalendar(_))
        ));
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(CalendarKind::from_tag("Persian"), CalendarKind::Persian);
        assert_eq!(CalendarKind::from_tag("jalali"), CalendarKind::Persian);
        assert_eq!(CalendarKind::from_tag("hijri"), CalendarKind::Hijri);
        assert_eq!(CalendarKind::from_tag(" gregorian "), CalendarKind::Gregorian);
        assert_eq!(CalendarKind::from_tag("buddhist"), CalendarKind::Other);
    }

    #[test]
    fn test_from_str_is_infallible() {
        assert_eq!("jalali".parse::<CalendarKind>(), Ok(CalendarKind::Persian));
        assert_eq!("hijri".parse::<CalendarKind>(), Ok(CalendarKind::Hijri));
        assert_eq!("buddhist".parse::<CalendarKind>(), Ok(CalendarKind::Other));
    }

    // ── Round-trip properties ───────────────────────────────────────────

    proptest! {
        #[test]
        fn persian_fixed_round_trips(fixed in 500_000i64..1_500_000) {
            let (y, m, d) = persian_from_fixed(fixed);
            prop_assert!(m >= 1 && m <= 12);
            prop_assert!(d >= 1 && d <= persian_month_days(y, m).unwrap());
            prop_assert_eq!(fixed_from_persian(y, m, d), fixed);
        }

        #[test]
        fn hijri_fixed_round_trips(fixed in 500_000i64..1_500_000) {
            let (y, m, d) = hijri_from_fixed(fixed);
            prop_assert!(m >= 1 && m <= 12);
            prop_assert!(d >= 1 && d <= hijri_month_days(y, m).unwrap());
            prop_assert_eq!(fixed_from_hijri(y, m, d), fixed);
        }
    }
}
