//! Presentation-facing facade: absolute hours, weekly display and the booking
//! slots of a date, computed from whatever a [`ScheduleDataProvider`] returns.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{HoursError, Result};
use crate::planner::{self, DayPlan};
use crate::provider::ScheduleDataProvider;
use crate::resolver::{self, DisplayDay};
use crate::schedule::{AbsoluteWeek, DayCode, HoursKind};
use crate::settings::Settings;

pub struct HoursService<P> {
    provider: P,
    tz: Tz,
}

impl<P: ScheduleDataProvider> HoursService<P> {
    /// `tz` is the timezone the waitlist's hours are expressed in.
    pub fn new(provider: P, tz: Tz) -> Self {
        Self { provider, tz }
    }

    /// # Errors
    /// Returns `HoursError::InvalidConfiguration` if `settings` do not validate.
    pub fn from_settings(provider: P, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(provider, settings.tz()?))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The current date in the waitlist's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// Hours of `kind` for the week containing `today`, keyed by date.
    pub fn get_absolute_hours(&self, kind: HoursKind, today: NaiveDate) -> Result<AbsoluteWeek> {
        let weekly = self.provider.fetch_waitlist_hours(kind)?;
        let overrides = self.provider.fetch_hour_overrides(kind)?;
        resolver::resolve_week(&weekly, &overrides, today)
    }

    pub fn get_absolute_business_hours(&self, today: NaiveDate) -> Result<AbsoluteWeek> {
        self.get_absolute_hours(HoursKind::Business, today)
    }

    pub fn get_absolute_waitlist_hours(&self, today: NaiveDate) -> Result<AbsoluteWeek> {
        self.get_absolute_hours(HoursKind::Waitlist, today)
    }

    pub fn get_absolute_booking_hours(&self, today: NaiveDate) -> Result<AbsoluteWeek> {
        self.get_absolute_hours(HoursKind::Booking, today)
    }

    /// Weekly hours of `kind` as `HH:MM` display rows, Monday first.
    pub fn get_weekly_display(&self, kind: HoursKind) -> Result<Vec<DisplayDay>> {
        let weekly = self.provider.fetch_waitlist_hours(kind)?;
        Ok(resolver::format_weekly_display(&weekly))
    }

    pub fn get_business_hours(&self) -> Result<Vec<DisplayDay>> {
        self.get_weekly_display(HoursKind::Business)
    }

    pub fn get_waitlist_hours(&self) -> Result<Vec<DisplayDay>> {
        self.get_weekly_display(HoursKind::Waitlist)
    }

    /// Booking slots for `date`, as of the current wall-clock time.
    pub fn get_booking_slots_for_date(&self, date: NaiveDate) -> Result<DayPlan> {
        self.get_booking_slots_for_date_at(date, Utc::now())
    }

    /// Booking slots for `date` as seen at `now`.
    ///
    /// Slots come from the waitlist hours. A date inside the current week uses
    /// its resolved (possibly overridden) schedule; any other date falls back
    /// to the weekly schedule of its weekday.
    ///
    /// # Errors
    /// - `HoursError::InvalidConfiguration` for a booking length that is not
    ///   positive or does not fit in milliseconds.
    /// - `HoursError::MissingScheduleDay` if a needed weekday is absent.
    /// - Any error the provider returns.
    pub fn get_booking_slots_for_date_at(
        &self,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<DayPlan> {
        let day_start = self.local_midnight(date)?;
        let day_start_ms = day_start.timestamp_millis();
        let now_ms = now.timestamp_millis();

        let bookings = self.provider.fetch_bookings_from(day_start_ms)?;

        let kind = HoursKind::Waitlist;
        let weekly = self.provider.fetch_waitlist_hours(kind)?;
        let overrides = self.provider.fetch_hour_overrides(kind)?;
        let this_week =
            resolver::resolve_week(&weekly, &overrides, now.with_timezone(&self.tz).date_naive())?;

        let day = match this_week.get_date(date) {
            Some(day) => day.clone(),
            None => weekly.day(DayCode::of(date))?.clone(),
        };

        let length_minutes = self.provider.fetch_booking_slot_length_minutes()?;
        let length_ms = length_minutes.checked_mul(60_000).ok_or_else(|| {
            HoursError::InvalidConfiguration(format!(
                "booking length of {} minutes is out of range",
                length_minutes
            ))
        })?;
        let slots = planner::plan_day(
            &day,
            length_ms,
            day_start_ms,
            now_ms,
            &bookings,
        )?;

        tracing::debug!(%date, is_open = day.is_open, slots = slots.len(), "booking slots");
        Ok(DayPlan {
            is_open: day.is_open,
            slots,
        })
    }

    /// Start of `date` in the waitlist's timezone.
    ///
    /// When midnight falls in a DST gap the day starts at the first instant
    /// after the gap, which is midnight read with the offset in force before it.
    fn local_midnight(&self, date: NaiveDate) -> Result<DateTime<Tz>> {
        let midnight = date.and_time(NaiveTime::MIN);
        if let Some(start) = self.tz.from_local_datetime(&midnight).earliest() {
            return Ok(start);
        }

        let no_midnight = || {
            HoursError::InvalidConfiguration(format!(
                "{} has no local midnight in {}",
                date, self.tz
            ))
        };
        let before_gap = self
            .tz
            .from_local_datetime(&(midnight - Duration::hours(3)))
            .earliest()
            .ok_or_else(no_midnight)?;
        let start = before_gap
            .offset()
            .fix()
            .from_local_datetime(&midnight)
            .single()
            .ok_or_else(no_midnight)?
            .with_timezone(&self.tz);

        tracing::debug!(%date, %start, "local midnight skipped by DST; day starts after the gap");
        Ok(start)
    }
}
