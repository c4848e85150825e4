//! The seam between schedule computation and wherever the waitlist data comes
//! from.
//!
//! [`ScheduleDataProvider`] is what the service consumes. [`DocumentProvider`]
//! serves already-fetched Waitwhile JSON documents held in memory; HTTP
//! clients and caches wrap or replace it behind the same trait.

use serde::{Deserialize, Serialize};

use crate::error::{HoursError, Result};
use crate::planner::Booking;
use crate::schedule::{DateOverrideMap, HoursKind, WeeklyHours};

/// Source of hours, overrides, bookings and the booking length.
pub trait ScheduleDataProvider {
    fn fetch_waitlist_hours(&self, kind: HoursKind) -> Result<WeeklyHours>;

    fn fetch_hour_overrides(&self, kind: HoursKind) -> Result<DateOverrideMap>;

    /// Bookings starting at or after `epoch_ms`.
    fn fetch_bookings_from(&self, epoch_ms: i64) -> Result<Vec<Booking>>;

    fn fetch_booking_slot_length_minutes(&self) -> Result<i64>;
}

impl<P: ScheduleDataProvider + ?Sized> ScheduleDataProvider for &P {
    fn fetch_waitlist_hours(&self, kind: HoursKind) -> Result<WeeklyHours> {
        (**self).fetch_waitlist_hours(kind)
    }

    fn fetch_hour_overrides(&self, kind: HoursKind) -> Result<DateOverrideMap> {
        (**self).fetch_hour_overrides(kind)
    }

    fn fetch_bookings_from(&self, epoch_ms: i64) -> Result<Vec<Booking>> {
        (**self).fetch_bookings_from(epoch_ms)
    }

    fn fetch_booking_slot_length_minutes(&self) -> Result<i64> {
        (**self).fetch_booking_slot_length_minutes()
    }
}

/// The waitlist resource as returned by the Waitwhile API.
///
/// Only the hours fields are modelled; everything else (id, name, ...) lands
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistDocument {
    #[serde(default)]
    pub business_hours: WeeklyHours,
    #[serde(default)]
    pub business_hours_by_date: DateOverrideMap,
    #[serde(default)]
    pub waitlist_hours: WeeklyHours,
    #[serde(default)]
    pub waitlist_hours_by_date: DateOverrideMap,
    #[serde(default)]
    pub booking_hours: WeeklyHours,
    #[serde(default)]
    pub booking_hours_by_date: DateOverrideMap,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WaitlistDocument {
    pub fn hours(&self, kind: HoursKind) -> &WeeklyHours {
        match kind {
            HoursKind::Business => &self.business_hours,
            HoursKind::Waitlist => &self.waitlist_hours,
            HoursKind::Booking => &self.booking_hours,
        }
    }

    pub fn overrides(&self, kind: HoursKind) -> &DateOverrideMap {
        match kind {
            HoursKind::Business => &self.business_hours_by_date,
            HoursKind::Waitlist => &self.waitlist_hours_by_date,
            HoursKind::Booking => &self.booking_hours_by_date,
        }
    }
}

/// Provider over in-memory documents.
#[derive(Debug, Clone)]
pub struct DocumentProvider {
    waitlist: WaitlistDocument,
    bookings: Vec<Booking>,
    booking_length_minutes: i64,
}

impl DocumentProvider {
    pub fn new(
        waitlist: WaitlistDocument,
        bookings: Vec<Booking>,
        booking_length_minutes: i64,
    ) -> Self {
        Self {
            waitlist,
            bookings,
            booking_length_minutes,
        }
    }

    /// Build a provider from raw JSON: the waitlist object and, optionally, an
    /// array of bookings.
    ///
    /// # Errors
    /// Returns `HoursError::MalformedPayload` if either document does not
    /// parse into the schedule model.
    pub fn from_json(
        waitlist_json: &str,
        bookings_json: Option<&str>,
        booking_length_minutes: i64,
    ) -> Result<Self> {
        let waitlist: WaitlistDocument = serde_json::from_str(waitlist_json)?;
        let bookings: Vec<Booking> = match bookings_json {
            Some(json) => serde_json::from_str(json)?,
            None => Vec::new(),
        };
        tracing::debug!(bookings = bookings.len(), "loaded waitlist documents");
        Ok(Self::new(waitlist, bookings, booking_length_minutes))
    }

    pub fn waitlist(&self) -> &WaitlistDocument {
        &self.waitlist
    }
}

impl ScheduleDataProvider for DocumentProvider {
    fn fetch_waitlist_hours(&self, kind: HoursKind) -> Result<WeeklyHours> {
        Ok(self.waitlist.hours(kind).clone())
    }

    fn fetch_hour_overrides(&self, kind: HoursKind) -> Result<DateOverrideMap> {
        Ok(self.waitlist.overrides(kind).clone())
    }

    fn fetch_bookings_from(&self, epoch_ms: i64) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|booking| booking.time >= epoch_ms)
            .cloned()
            .collect())
    }

    fn fetch_booking_slot_length_minutes(&self) -> Result<i64> {
        if self.booking_length_minutes <= 0 {
            return Err(HoursError::InvalidConfiguration(format!(
                "booking length must be positive, got {} minutes",
                self.booking_length_minutes
            )));
        }
        Ok(self.booking_length_minutes)
    }
}
