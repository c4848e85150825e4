//! Property-based tests for slot planning and week resolution using proptest.
//!
//! These check invariants that hold for any well-formed hours, not just the
//! hand-picked cases in `planner_tests.rs` and `resolver_tests.rs`.

use chrono::{Duration, NaiveDate};
use hours_engine::planner::{plan_day, Booking};
use hours_engine::resolver::{resolve_week, week_start};
use hours_engine::schedule::{
    DateKey, DateOverrideMap, DayCode, DaySchedule, Period, WeeklyHours, DAY_MS,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

const DAY_START: i64 = 1_791_936_000_000;

/// A single period on a whole-minute grid within one day.
fn arb_period() -> impl Strategy<Value = Period> {
    (0i64..1439, 1i64..=1440).prop_map(|(from_min, len_min)| {
        let from = from_min * 60_000;
        let to = (from + len_min * 60_000).min(DAY_MS);
        Period::new(from, to)
    })
}

/// Slot length between 5 minutes and 2 hours.
fn arb_duration() -> impl Strategy<Value = i64> {
    (5i64..=120).prop_map(|m| m * 60_000)
}

fn arb_bookings() -> impl Strategy<Value = Vec<Booking>> {
    prop::collection::vec(0i64..DAY_MS, 0..12)
        .prop_map(|offsets| offsets.into_iter().map(|o| Booking::at(DAY_START + o)).collect())
}

fn arb_schedule() -> impl Strategy<Value = DaySchedule> {
    (any::<bool>(), prop::collection::vec(arb_period(), 0..3))
        .prop_map(|(is_open, periods)| DaySchedule { is_open, periods })
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2025i32..=2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn full_week(schedule: &DaySchedule) -> WeeklyHours {
    DayCode::ALL.into_iter().map(|d| (d, schedule.clone())).collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn slot_count_is_ceil_of_period_over_duration(period in arb_period(), duration in arb_duration()) {
        let day = DaySchedule::open(vec![period]);
        let now = DAY_START - 1;
        let slots = plan_day(&day, duration, DAY_START, now, &[]).unwrap();

        let span = period.to - period.from;
        let expected = (span + duration - 1) / duration;
        prop_assert_eq!(slots.len() as i64, expected);

        // Consecutive starts step by exactly one duration from the period start.
        for (i, slot) in slots.iter().enumerate() {
            prop_assert_eq!(slot.start_of_day_offset_ms, period.from + i as i64 * duration);
            prop_assert!(slot.start_of_day_offset_ms < period.to);
        }
    }

    #[test]
    fn unavailable_iff_a_booking_starts_inside(
        period in arb_period(),
        duration in arb_duration(),
        bookings in arb_bookings(),
    ) {
        let day = DaySchedule::open(vec![period]);
        let slots = plan_day(&day, duration, DAY_START, DAY_START - 1, &bookings).unwrap();

        for slot in &slots {
            let start = slot.start_epoch_ms;
            let end = start + slot.duration_ms;
            let hit = bookings.iter().any(|b| b.time >= start && b.time < end);
            prop_assert_eq!(slot.available, !hit);
        }
    }

    #[test]
    fn no_slot_starts_at_or_before_now(
        day in arb_schedule(),
        duration in arb_duration(),
        now_offset in -DAY_MS..2 * DAY_MS,
    ) {
        let slots = plan_day(&day, duration, DAY_START, DAY_START + now_offset, &[]).unwrap();
        for slot in &slots {
            prop_assert!(slot.start_of_day_offset_ms > now_offset);
        }
    }

    #[test]
    fn closed_day_is_always_empty(
        periods in prop::collection::vec(arb_period(), 0..4),
        duration in arb_duration(),
        bookings in arb_bookings(),
    ) {
        let day = DaySchedule { is_open: false, periods };
        let slots = plan_day(&day, duration, DAY_START, DAY_START - 1, &bookings).unwrap();
        prop_assert!(slots.is_empty());
    }

    #[test]
    fn week_has_seven_days_plus_passthrough(
        today in arb_date(),
        weekday_schedule in arb_schedule(),
        override_dates in prop::collection::vec(arb_date(), 0..6),
    ) {
        let weekly = full_week(&weekday_schedule);
        let special = DaySchedule::open(vec![Period::new(0, 60_000)]);
        let overrides: DateOverrideMap = override_dates
            .iter()
            .map(|d| (DateKey::from_date(*d), special.clone()))
            .collect();

        let week = resolve_week(&weekly, &overrides, today).unwrap();

        let monday = week_start(today);
        let in_week: Vec<DateKey> = (0..7)
            .map(|i| DateKey::from_date(monday + Duration::days(i)))
            .collect();
        let outside = overrides.iter().filter(|(k, _)| !in_week.contains(k)).count();
        prop_assert_eq!(week.len(), 7 + outside);

        for key in &in_week {
            let value = week.get(*key).unwrap();
            match overrides.get(*key) {
                Some(o) => {
                    prop_assert_eq!(value, o);
                }
                None => {
                    prop_assert_eq!(value, &weekday_schedule);
                }
            }
        }
    }
}
