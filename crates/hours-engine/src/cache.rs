//! Time-boxed caching of provider responses.
//!
//! [`CachedProvider`] wraps any [`ScheduleDataProvider`] and keeps hours,
//! overrides and the booking length for a fixed TTL. Bookings always go to
//! the inner provider: they change with every reservation.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::Result;
use crate::planner::Booking;
use crate::provider::ScheduleDataProvider;
use crate::schedule::{DateOverrideMap, HoursKind, WeeklyHours};

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// A small keyed store whose entries expire after `ttl`.
struct TtlCache<K, V> {
    ttl: Duration,
    entries: DashMap<K, Entry<V>>,
}

impl<K: Eq + Hash + Copy, V: Clone> TtlCache<K, V> {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Return the live entry for `key`, or run `fetch` and store its value.
    ///
    /// No shard lock is held while `fetch` runs. A failed fetch stores nothing.
    fn get_or_fetch(&self, key: K, fetch: impl FnOnce() -> Result<V>) -> Result<V> {
        let live = self
            .entries
            .get(&key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone());
        if let Some(value) = live {
            return Ok(value);
        }

        let value = fetch()?;
        self.entries.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                value: value.clone(),
            },
        );
        Ok(value)
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

/// Caching decorator around a schedule data provider.
pub struct CachedProvider<P> {
    inner: P,
    hours: TtlCache<HoursKind, WeeklyHours>,
    overrides: TtlCache<HoursKind, DateOverrideMap>,
    slot_length: TtlCache<(), i64>,
}

impl<P: ScheduleDataProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            hours: TtlCache::new(ttl),
            overrides: TtlCache::new(ttl),
            slot_length: TtlCache::new(ttl),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drop every cached entry.
    pub fn invalidate(&self) {
        self.hours.clear();
        self.overrides.clear();
        self.slot_length.clear();
    }
}

impl<P: ScheduleDataProvider> ScheduleDataProvider for CachedProvider<P> {
    fn fetch_waitlist_hours(&self, kind: HoursKind) -> Result<WeeklyHours> {
        self.hours.get_or_fetch(kind, || {
            tracing::debug!(%kind, "hours cache miss");
            self.inner.fetch_waitlist_hours(kind)
        })
    }

    fn fetch_hour_overrides(&self, kind: HoursKind) -> Result<DateOverrideMap> {
        self.overrides.get_or_fetch(kind, || {
            tracing::debug!(%kind, "overrides cache miss");
            self.inner.fetch_hour_overrides(kind)
        })
    }

    fn fetch_bookings_from(&self, epoch_ms: i64) -> Result<Vec<Booking>> {
        self.inner.fetch_bookings_from(epoch_ms)
    }

    fn fetch_booking_slot_length_minutes(&self) -> Result<i64> {
        self.slot_length
            .get_or_fetch((), || self.inner.fetch_booking_slot_length_minutes())
    }
}
