//! String → UTC and UTC → rendered-string conversion pipelines.
//!
//! [`DateTimeEngine`] wires the normalizer, the pattern matcher, the
//! calendar converters, and the zone cache into the two directions of the
//! data flow:
//!
//! - parse: raw string → canonical ASCII → six fields → calendar
//!   conversion → naive civil instant → zone offset → UTC instant
//! - format: UTC instant → zone offset → naive civil instant → calendar
//!   fields → rendered string
//!
//! All operations are synchronous and safe to call from any number of
//! threads; the only shared state is the append-only zone cache the
//! engine holds. The engine never reads the system clock.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::calendar::CalendarKind;
use crate::error::{ConvertError, Result};
use crate::normalize::{normalize, normalize_for_date};
use crate::pattern::{match_date_time, ParsedDateTimeFields};
use crate::zone::{TimeZoneHandle, ZoneCache, ZoneProvider};

/// The conversion engine.
///
/// Construct once and share; the zone cache inside it is the only state
/// and is append-only for the engine's lifetime.
pub struct DateTimeEngine {
    zones: ZoneCache,
}

impl DateTimeEngine {
    /// An engine over the bundled IANA timezone database.
    pub fn new() -> Self {
        Self {
            zones: ZoneCache::with_tzdb(),
        }
    }

    /// An engine over an injected zone-rule provider.
    pub fn with_provider(provider: Arc<dyn ZoneProvider>) -> Self {
        Self {
            zones: ZoneCache::new(provider),
        }
    }

    /// Strict zone resolution, for callers that need to distinguish
    /// "explicitly UTC" from "unrecognized identifier".
    ///
    /// # Errors
    ///
    /// [`ConvertError::UnknownZone`] for an identifier the provider does
    /// not recognize.
    pub fn try_resolve_zone(&self, identifier: &str) -> Result<TimeZoneHandle> {
        self.zones.try_resolve(identifier)
    }

    /// Parse a loosely-formatted Persian date (and optional time) string
    /// into a UTC instant.
    ///
    /// The input is canonicalized and stripped to the date grammar's
    /// alphabet first, so Persian/Arabic-Indic digits, separator
    /// variants, and embedded words are all tolerated. The wall-clock
    /// value is interpreted in `zone` (fail-soft to UTC).
    ///
    /// # Errors
    ///
    /// [`ConvertError::NoPatternMatch`] when no date/time literal is
    /// found; [`ConvertError::InvalidCalendarDate`] when the fields are
    /// not a real Persian date.
    ///
    /// # Examples
    ///
    /// ```
    /// use parsidate_core::DateTimeEngine;
    ///
    /// let engine = DateTimeEngine::new();
    /// let utc = engine.parse_persian("۱۴۰۲/۰۵/۱۱", "UTC").unwrap();
    /// assert_eq!(utc.to_rfc3339(), "2023-08-02T00:00:00+00:00");
    /// ```
    pub fn parse_persian(&self, input: &str, zone: &str) -> Result<DateTime<Utc>> {
        let stripped = normalize_for_date(input);
        let fields = match_date_time(&stripped)
            .ok_or_else(|| ConvertError::NoPatternMatch(format!("'{}'", input.trim())))?;
        let civil = fields_to_civil(CalendarKind::Persian, fields)?;
        Ok(self.to_utc(civil, zone))
    }

    /// Parse a date/time string of unknown calendar into a UTC instant.
    ///
    /// Tries, in order:
    ///
    /// 1. the Persian parser ([`DateTimeEngine::parse_persian`]);
    /// 2. an absolute instant literal (RFC 3339, or a `T`-separated ISO
    ///    form assumed UTC when no offset is present);
    /// 3. a calendar-agnostic local literal (`YYYY-MM-DD[ HH:MM[:SS]]`)
    ///    interpreted as Gregorian in `zone`;
    /// 4. the stripped numeric grammar interpreted as Gregorian fields.
    ///
    /// The first strategy that succeeds wins. Persian-first is a product
    /// decision favoring the primary target locale: `"2025/03/01"` is a
    /// valid Persian date and parses as one. Callers needing strict
    /// single-calendar behavior should call the specific parser instead.
    ///
    /// # Errors
    ///
    /// [`ConvertError::NoPatternMatch`] when every strategy fails.
    pub fn parse_any(&self, input: &str, zone: &str) -> Result<DateTime<Utc>> {
        if let Ok(utc) = self.parse_persian(input, zone) {
            return Ok(utc);
        }

        let loose = normalize(input);
        if let Some(utc) = try_absolute_literal(&loose) {
            return Ok(utc);
        }
        if let Some(civil) = try_local_literal(&loose) {
            return Ok(self.to_utc(civil, zone));
        }

        let stripped = normalize_for_date(input);
        if let Some(fields) = match_date_time(&stripped) {
            if let Ok(civil) = fields_to_civil(CalendarKind::Gregorian, fields) {
                return Ok(self.to_utc(civil, zone));
            }
        }

        Err(ConvertError::NoPatternMatch(format!("'{}'", input.trim())))
    }

    /// Interpret a naive civil instant as wall-clock time in `zone` and
    /// return the corresponding UTC instant.
    ///
    /// Total: an unrecognized zone behaves exactly like `"UTC"`.
    pub fn to_utc(&self, civil: NaiveDateTime, zone: &str) -> DateTime<Utc> {
        let handle = self.zones.resolve(zone);
        let offset = handle.offset_at(civil);
        civil
            .checked_sub_signed(offset)
            .unwrap_or(civil)
            .and_utc()
    }

    /// The wall-clock reading of a UTC instant in `zone`.
    ///
    /// The offset rule is keyed by wall-clock time, so the offset is
    /// evaluated once against the UTC reading and once against the
    /// shifted value; instants near a transition land on the rule in
    /// force at the local time they display as.
    pub fn civil_in_zone(&self, utc: DateTime<Utc>, zone: &str) -> NaiveDateTime {
        let handle = self.zones.resolve(zone);
        let naive = utc.naive_utc();
        let first = handle.offset_at(naive);
        let shifted = naive.checked_add_signed(first).unwrap_or(naive);
        let refined = handle.offset_at(shifted);
        naive.checked_add_signed(refined).unwrap_or(naive)
    }

    /// Render a UTC instant in the given zone and calendar.
    ///
    /// Persian and Hijri render as `YYYY/MM/DD HH:MM:SS`; Gregorian as
    /// `YYYY-MM-DD HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// [`ConvertError::UnsupportedCalendar`] for [`CalendarKind::Other`]
    /// — callers must resolve to a concrete calendar before formatting.
    pub fn format_for_user(
        &self,
        utc: DateTime<Utc>,
        zone: &str,
        calendar: CalendarKind,
    ) -> Result<String> {
        let civil = self.civil_in_zone(utc, zone);
        let (year, month, day) = calendar.from_civil_instant(civil)?;
        let sep = match calendar {
            CalendarKind::Gregorian => '-',
            _ => '/',
        };
        Ok(format!(
            "{year:04}{sep}{month:02}{sep}{day:02} {:02}:{:02}:{:02}",
            civil.hour(),
            civil.minute(),
            civil.second()
        ))
    }
}

impl Default for DateTimeEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn fields_to_civil(kind: CalendarKind, fields: ParsedDateTimeFields) -> Result<NaiveDateTime> {
    kind.to_civil_instant(
        fields.year,
        fields.month,
        fields.day,
        fields.hour,
        fields.minute,
        fields.second,
    )
}

/// An offset-bearing instant literal, or a `T`-separated ISO local
/// date-time assumed to be UTC.
fn try_absolute_literal(normalized: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(normalized) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// A calendar-agnostic local date-time literal on the Gregorian calendar.
fn try_local_literal(normalized: &str) -> Option<NaiveDateTime> {
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, format) {
            return Some(naive);
        }
    }
    NaiveDate::parse_from_str(normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
