//! Slice a day's open periods into fixed-length booking slots.
//!
//! Periods are tiled from their start in steps of the slot length. Slots that
//! already started (relative to `now`) are dropped, and each remaining slot is
//! flagged unavailable when an existing booking starts inside it.

use serde::{Deserialize, Serialize};

use crate::error::{HoursError, Result};
use crate::resolver::ms_to_human;
use crate::schedule::DaySchedule;

/// An existing booking. Only `time` takes part in slot planning; any other
/// fields the provider sent are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking start, milliseconds since the Unix epoch.
    pub time: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Booking {
    pub fn at(time: i64) -> Self {
        Self {
            time,
            extra: serde_json::Map::new(),
        }
    }
}

/// A bookable window on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Start as `HH:MM`.
    pub start: String,
    pub start_of_day_offset_ms: i64,
    pub start_epoch_ms: i64,
    pub duration_ms: i64,
    pub available: bool,
}

/// Slots for one date, together with whether the date is open at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub is_open: bool,
    pub slots: Vec<Slot>,
}

/// Plan the booking slots of one day.
///
/// # Arguments
/// - `day` -- Opening state and periods (ms since midnight) of the day
/// - `duration_ms` -- Slot length
/// - `day_start_epoch_ms` -- Epoch time of the day's local midnight
/// - `now_epoch_ms` -- Current time; slots starting at or before it are skipped
/// - `bookings` -- Existing bookings, matched by their start `time`
///
/// A closed day yields no slots. The last slot of a period starts before the
/// period's end but may run past it. Two slots with the same `HH:MM` start
/// collapse into one, the later one winning at the earlier one's position.
/// A slot length longer than the period yields a single slot at its start.
///
/// # Errors
/// Returns `HoursError::InvalidConfiguration` if `duration_ms` is not positive.
pub fn plan_day(
    day: &DaySchedule,
    duration_ms: i64,
    day_start_epoch_ms: i64,
    now_epoch_ms: i64,
    bookings: &[Booking],
) -> Result<Vec<Slot>> {
    if duration_ms <= 0 {
        tracing::warn!(duration_ms, "refusing to plan slots with non-positive length");
        return Err(HoursError::InvalidConfiguration(format!(
            "slot duration must be positive, got {} ms",
            duration_ms
        )));
    }

    if !day.is_open {
        return Ok(Vec::new());
    }

    let now_offset = now_epoch_ms.saturating_sub(day_start_epoch_ms);
    let mut slots: Vec<Slot> = Vec::new();

    for period in &day.periods {
        let mut cursor = period.from;

        while cursor < period.to {
            // Saturates for lengths beyond the day; the loop still ends.
            let slot_end = cursor.saturating_add(duration_ms);

            if now_offset < cursor {
                let start_epoch = day_start_epoch_ms.saturating_add(cursor);
                let end_epoch = day_start_epoch_ms.saturating_add(slot_end);

                // A booking blocks the slot it starts in.
                let available = !bookings
                    .iter()
                    .any(|booking| booking.time >= start_epoch && booking.time < end_epoch);

                push_keyed(
                    &mut slots,
                    Slot {
                        start: ms_to_human(cursor),
                        start_of_day_offset_ms: cursor,
                        start_epoch_ms: start_epoch,
                        duration_ms,
                        available,
                    },
                );
            }

            cursor = slot_end;
        }
    }

    tracing::debug!(
        slots = slots.len(),
        taken = slots.iter().filter(|s| !s.available).count(),
        "planned day"
    );
    Ok(slots)
}

/// Append `slot`, or replace the slot already holding its `HH:MM` label.
fn push_keyed(slots: &mut Vec<Slot>, slot: Slot) {
    match slots.iter_mut().find(|existing| existing.start == slot.start) {
        Some(existing) => *existing = slot,
        None => slots.push(slot),
    }
}
