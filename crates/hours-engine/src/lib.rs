//! # hours-engine
//!
//! Business hours and booking slots for a Waitwhile waitlist.
//!
//! Waitwhile describes opening hours as a weekly pattern keyed by weekday
//! (`mon`…`sun`) plus a sparse map of date overrides, with every period given
//! in milliseconds since local midnight. This crate turns that into:
//!
//! - an absolute schedule for the current Monday–Sunday week, keyed by
//!   `YYYYMMDD` date, with overrides applied;
//! - a weekly display with `HH:MM` ranges, Monday first;
//! - the bookable slots of a date, tiled from its open periods, with slots
//!   already started left out and slots holding a booking marked taken.
//!
//! ## Quick start
//!
//! ```rust
//! use hours_engine::{plan_day, Booking, DaySchedule, Period};
//!
//! // 09:00-11:00 in 30 minute slots, now 08:00, one booking at 09:30.
//! let day = DaySchedule::open(vec![Period::new(32_400_000, 39_600_000)]);
//! let slots = plan_day(&day, 1_800_000, 0, 28_800_000, &[Booking::at(34_200_000)]).unwrap();
//!
//! let starts: Vec<&str> = slots.iter().map(|s| s.start.as_str()).collect();
//! assert_eq!(starts, ["09:00", "09:30", "10:00", "10:30"]);
//! assert!(!slots[1].available);
//! ```
//!
//! ## Modules
//!
//! - [`schedule`] — Weekday codes, periods, weekly hours, overrides, absolute week
//! - [`resolver`] — Weekly pattern + overrides → absolute week; `HH:MM` display
//! - [`planner`] — Open periods + bookings → booking slots
//! - [`provider`] — Data source trait and the in-memory document provider
//! - [`cache`] — TTL caching decorator for providers
//! - [`service`] — Facade used by presentation layers
//! - [`settings`] — Booking length, timezone, cache TTL
//! - [`error`] — Error types

pub mod cache;
pub mod error;
pub mod planner;
pub mod provider;
pub mod resolver;
pub mod schedule;
pub mod service;
pub mod settings;

pub use cache::CachedProvider;
pub use error::HoursError;
pub use planner::{plan_day, Booking, DayPlan, Slot};
pub use provider::{DocumentProvider, ScheduleDataProvider, WaitlistDocument};
pub use resolver::{format_weekly_display, ms_to_human, resolve_week, DisplayDay, DisplayPeriod};
pub use schedule::{
    AbsoluteWeek, DateKey, DateOverrideMap, DayCode, DaySchedule, HoursKind, Period, WeeklyHours,
};
pub use service::HoursService;
pub use settings::Settings;
