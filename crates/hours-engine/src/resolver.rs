//! Resolve recurring weekly hours into concrete dates and human-readable
//! display rows.
//!
//! The weekly pattern is laid over the Monday–Sunday week containing a given
//! day; date overrides (holidays, special hours) replace the pattern for the
//! dates they name.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schedule::{
    AbsoluteWeek, DateKey, DateOverrideMap, DayCode, DaySchedule, WeeklyHours, DAY_MS,
};

/// A period rendered as `HH:MM` start and end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPeriod {
    pub from: String,
    pub to: String,
}

/// One weekday of the weekly display, Monday = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayDay {
    pub index: u8,
    pub is_open: bool,
    pub periods: Vec<DisplayPeriod>,
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Build the absolute schedule for the week containing `today`.
///
/// Each of the seven dates takes its override entry if there is one, otherwise
/// the weekly schedule of its weekday. Override entries for dates outside the
/// week are carried into the result unchanged.
///
/// # Errors
/// Returns `HoursError::MissingScheduleDay` if a weekday without an override
/// has no entry in `weekly`.
pub fn resolve_week(
    weekly: &WeeklyHours,
    overrides: &DateOverrideMap,
    today: NaiveDate,
) -> Result<AbsoluteWeek> {
    let monday = week_start(today);
    let mut dates: BTreeMap<DateKey, DaySchedule> = BTreeMap::new();

    for (offset, day) in DayCode::ALL.into_iter().enumerate() {
        let date = monday + Duration::days(offset as i64);
        let key = DateKey::from_date(date);

        let schedule = match overrides.get(key) {
            Some(special) => special.clone(),
            None => weekly
                .day(day)
                .inspect_err(|_| {
                    tracing::warn!(%day, %key, "weekly hours have no entry for weekday");
                })?
                .clone(),
        };
        dates.insert(key, schedule);
    }

    // Out-of-week overrides pass through; in-week ones are already placed.
    let mut passthrough = 0usize;
    for (key, schedule) in overrides.iter() {
        dates.entry(key).or_insert_with(|| {
            passthrough += 1;
            schedule.clone()
        });
    }

    tracing::debug!(week_of = %monday, passthrough, "resolved absolute week");
    Ok(AbsoluteWeek::from_map(dates))
}

/// Reformat weekly hours into display rows ordered Monday first.
///
/// Only the weekdays present in `weekly` are listed.
pub fn format_weekly_display(weekly: &WeeklyHours) -> Vec<DisplayDay> {
    let mut days: Vec<DisplayDay> = weekly
        .iter()
        .map(|(day, schedule)| DisplayDay {
            index: day.index(),
            is_open: schedule.is_open,
            periods: schedule
                .periods
                .iter()
                .map(|period| DisplayPeriod {
                    from: ms_to_human(period.from),
                    to: ms_to_human(period.to),
                })
                .collect(),
        })
        .collect();

    days.sort_by_key(|day| day.index);
    days
}

/// Format milliseconds since midnight as a 24-hour `HH:MM` string.
///
/// Seconds are truncated and the value wraps at 24 hours, so `86_400_000`
/// renders as `"00:00"`.
pub fn ms_to_human(ms: i64) -> String {
    let minutes = ms.rem_euclid(DAY_MS) / 60_000;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
