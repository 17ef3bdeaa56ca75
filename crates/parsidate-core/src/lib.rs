//! # parsidate-core
//!
//! Calendar-aware date/time normalization and conversion.
//!
//! Accepts loosely-formatted date (and optional time) strings written in
//! Persian, Arabic-Indic, or ASCII digits; parses them on the Persian,
//! Hijri, or Gregorian calendar; converts between local wall-clock values
//! and absolute UTC instants through named timezone offset rules; and
//! renders instants back into a chosen calendar/timezone, including coarse
//! relative-time strings.
//!
//! Every operation is a synchronous pure function of its inputs plus an
//! append-only zone cache — no system clock, no I/O beyond first-time
//! zone-rule resolution, no internal locking outside the cache. Failures
//! are typed results, never panics.
//!
//! ## Modules
//!
//! - [`normalize`] — digit/separator canonicalization for loose input
//! - [`pattern`] — the tolerant date/time literal grammar
//! - [`calendar`] — Persian, Hijri, and Gregorian converters
//! - [`zone`] — named-zone offset resolution and the handle cache
//! - [`engine`] — string → UTC and UTC → rendered-string pipelines
//! - [`humanize`] — coarse relative-time strings
//! - [`error`] — error types

pub mod calendar;
pub mod engine;
pub mod error;
pub mod humanize;
pub mod normalize;
pub mod pattern;
pub mod zone;

pub use calendar::{
    hijri_month_days, is_hijri_leap_year, is_persian_leap_year, persian_month_days, CalendarKind,
};
pub use engine::DateTimeEngine;
pub use error::ConvertError;
pub use humanize::humanize_relative;
pub use normalize::{normalize, normalize_for_date};
pub use pattern::{match_date_time, ParsedDateTimeFields};
pub use zone::{OffsetFn, TimeZoneHandle, TzdbProvider, ZoneCache, ZoneProvider};
