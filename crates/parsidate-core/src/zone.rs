//! Named-zone offset resolution and the process-wide handle cache.
//!
//! The core never reads timezone rules itself. A [`ZoneProvider`] turns a
//! zone identifier into an offset function of naive wall-clock time;
//! [`TzdbProvider`] is the default implementation over the IANA database
//! shipped with `chrono-tz`. Resolved handles are cached per identifier for
//! the life of the [`ZoneCache`]; entries are immutable once inserted.
//!
//! Resolution is fail-soft by default: an unrecognized identifier yields
//! the fixed zero-offset (UTC) handle instead of an error, so higher-level
//! conversions never fail solely because of a bad zone string. Callers
//! that must distinguish "explicitly UTC" from "fell back to UTC" use
//! [`ZoneCache::try_resolve`] or inspect [`TimeZoneHandle::is_fallback`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{Duration, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::error::{ConvertError, Result};

/// A resolved offset rule: naive wall-clock time to signed offset from UTC.
pub type OffsetFn = Arc<dyn Fn(NaiveDateTime) -> Duration + Send + Sync>;

/// The zone-rule database this core consumes.
///
/// Implementations are expected to be deterministic per identifier; the
/// cache relies on that when racing resolutions converge on one entry.
pub trait ZoneProvider: Send + Sync {
    /// Resolve an identifier to an offset function.
    ///
    /// # Errors
    ///
    /// [`ConvertError::UnknownZone`] when the identifier is not in the
    /// database.
    fn resolve_zone(&self, identifier: &str) -> Result<OffsetFn>;
}

/// An identifier paired with its resolved offset rule.
///
/// Cheap to clone; the offset rule is shared. `is_fallback` marks handles
/// produced by the fail-soft path, where resolution failed and the
/// zero-offset rule was substituted.
#[derive(Clone)]
pub struct TimeZoneHandle {
    key: Arc<str>,
    offset_fn: OffsetFn,
    fallback: bool,
}

impl TimeZoneHandle {
    /// The fixed zero-offset handle.
    pub fn utc() -> Self {
        Self {
            key: Arc::from("UTC"),
            offset_fn: Arc::new(|_| Duration::zero()),
            fallback: false,
        }
    }

    fn resolved(key: &str, offset_fn: OffsetFn) -> Self {
        Self {
            key: Arc::from(key),
            offset_fn,
            fallback: false,
        }
    }

    fn fallback_utc(key: &str) -> Self {
        Self {
            key: Arc::from(key),
            offset_fn: Arc::new(|_| Duration::zero()),
            fallback: true,
        }
    }

    /// The identifier this handle was resolved from.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The offset from UTC in force at the given wall-clock time.
    pub fn offset_at(&self, civil: NaiveDateTime) -> Duration {
        (self.offset_fn)(civil)
    }

    /// Whether this handle is a zero-offset substitute for an identifier
    /// the provider did not recognize.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl fmt::Debug for TimeZoneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeZoneHandle")
            .field("key", &self.key)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// IANA zone-rule provider backed by `chrono-tz`.
pub struct TzdbProvider;

impl ZoneProvider for TzdbProvider {
    fn resolve_zone(&self, identifier: &str) -> Result<OffsetFn> {
        let tz: Tz = identifier
            .parse()
            .map_err(|_| ConvertError::UnknownZone(format!("'{identifier}'")))?;
        Ok(Arc::new(move |civil| offset_in_zone(tz, civil)))
    }
}

/// Offset of a naive wall-clock time in a zone.
///
/// Ambiguous wall-clock times (a fall-back transition) take the earlier
/// offset; wall-clock times inside a spring-forward gap take the offset
/// obtained by reading the value as UTC. Both choices are deterministic,
/// keeping the offset rule total.
fn offset_in_zone(tz: Tz, civil: NaiveDateTime) -> Duration {
    let offset = match tz.offset_from_local_datetime(&civil) {
        LocalResult::Single(offset) | LocalResult::Ambiguous(offset, _) => offset,
        LocalResult::None => tz.offset_from_utc_datetime(&civil),
    };
    Duration::seconds(i64::from(offset.fix().local_minus_utc()))
}

/// Append-only cache of resolved [`TimeZoneHandle`]s, keyed by identifier.
///
/// Shared by all callers of a conversion engine; safe for concurrent use.
/// Reads of cached entries never block on an in-flight provider
/// resolution — resolution happens outside the lock, and racing writers
/// may each resolve the identifier, with all readers converging on one
/// stored value.
pub struct ZoneCache {
    provider: Arc<dyn ZoneProvider>,
    entries: RwLock<HashMap<String, TimeZoneHandle>>,
}

impl ZoneCache {
    pub fn new(provider: Arc<dyn ZoneProvider>) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A cache over the bundled IANA database.
    pub fn with_tzdb() -> Self {
        Self::new(Arc::new(TzdbProvider))
    }

    /// Resolve an identifier, fail-soft.
    ///
    /// An empty or all-whitespace identifier is the fixed UTC handle and
    /// never touches the provider or the cache. An identifier the
    /// provider rejects resolves to (and caches) the zero-offset fallback
    /// handle.
    pub fn resolve(&self, identifier: &str) -> TimeZoneHandle {
        let key = identifier.trim();
        if key.is_empty() {
            return TimeZoneHandle::utc();
        }
        if let Some(handle) = self.lookup(key) {
            return handle;
        }
        let handle = match self.provider.resolve_zone(key) {
            Ok(offset_fn) => TimeZoneHandle::resolved(key, offset_fn),
            Err(_) => TimeZoneHandle::fallback_utc(key),
        };
        self.store(key, handle.clone());
        handle
    }

    /// Resolve an identifier, surfacing resolution failure.
    ///
    /// The strict companion to [`ZoneCache::resolve`] for callers that
    /// need to distinguish "explicitly UTC" from "unrecognized
    /// identifier". Uses and feeds the same cache.
    ///
    /// # Errors
    ///
    /// [`ConvertError::UnknownZone`] when the identifier is not
    /// recognized, including when an earlier fail-soft resolution already
    /// cached the fallback handle.
    pub fn try_resolve(&self, identifier: &str) -> Result<TimeZoneHandle> {
        let key = identifier.trim();
        if key.is_empty() {
            return Ok(TimeZoneHandle::utc());
        }
        let handle = match self.lookup(key) {
            Some(handle) => handle,
            None => {
                let handle = match self.provider.resolve_zone(key) {
                    Ok(offset_fn) => TimeZoneHandle::resolved(key, offset_fn),
                    Err(_) => TimeZoneHandle::fallback_utc(key),
                };
                self.store(key, handle.clone());
                handle
            }
        };
        if handle.is_fallback() {
            Err(ConvertError::UnknownZone(format!("'{key}'")))
        } else {
            Ok(handle)
        }
    }

    fn lookup(&self, key: &str) -> Option<TimeZoneHandle> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn store(&self, key: &str, handle: TimeZoneHandle) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), handle);
        }
    }
}
