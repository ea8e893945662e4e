//! Partition operating hours into display slots and mark the occupied ones.
//!
//! Slots are generated from `operating_start` in steps of `slot_granularity`.
//! A trailing remainder shorter than one slot is dropped, never shortened.

use serde::{Deserialize, Serialize};

use crate::conflict::{blocking_on, conflicts};
use crate::error::Result;
use crate::model::{AvailabilityQuery, FacilitySchedule, Reservation};
use crate::time::{TimeInterval, TimeOfDay};

/// One slot of the availability grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub interval: TimeInterval,
    pub occupied: bool,
    /// First reservation (in input order) occupying the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
}

/// Generate the schedule's slots without occupancy.
fn slot_intervals(schedule: &FacilitySchedule) -> Result<Vec<TimeInterval>> {
    schedule.validate()?;

    let step = schedule.slot_granularity;
    let close = schedule.operating_end.minutes();
    let mut cursor = schedule.operating_start.minutes();
    let mut slots = Vec::new();

    while let Some(next) = cursor.checked_add(step).filter(|&next| next <= close) {
        let start = TimeOfDay::from_minutes(cursor)?;
        let end = TimeOfDay::from_minutes(next)?;
        slots.push(TimeInterval::new(start, end)?);
        cursor = next;
    }

    Ok(slots)
}

/// Enumerate the slots of one day, marking those overlapped by a reservation.
///
/// `reservations` are the bookings of a single date; cancelled ones are ignored.
/// The result is chronological and identical for identical inputs.
///
/// # Errors
/// Returns `EngineError::InvalidSchedule` if the schedule is malformed.
pub fn enumerate_slots(
    schedule: &FacilitySchedule,
    reservations: &[Reservation],
) -> Result<Vec<SlotAvailability>> {
    let active: Vec<&Reservation> = reservations.iter().filter(|r| r.is_active()).collect();
    Ok(mark_occupied(slot_intervals(schedule)?, &active))
}

/// Like [`enumerate_slots`], ignoring reservations dated other than the query date.
pub fn enumerate_for_query(
    schedule: &FacilitySchedule,
    query: &AvailabilityQuery,
) -> Result<Vec<SlotAvailability>> {
    let active: Vec<&Reservation> = blocking_on(query.date, &query.reservations).collect();
    Ok(mark_occupied(slot_intervals(schedule)?, &active))
}

/// The unoccupied slot intervals, in chronological order.
pub fn free_slots(
    schedule: &FacilitySchedule,
    reservations: &[Reservation],
) -> Result<Vec<TimeInterval>> {
    Ok(enumerate_slots(schedule, reservations)?
        .into_iter()
        .filter(|slot| !slot.occupied)
        .map(|slot| slot.interval)
        .collect())
}

fn mark_occupied(slots: Vec<TimeInterval>, active: &[&Reservation]) -> Vec<SlotAvailability> {
    slots
        .into_iter()
        .map(|interval| {
            let holder = active.iter().find(|r| conflicts(&interval, &r.interval));
            SlotAvailability {
                interval,
                occupied: holder.is_some(),
                reservation_id: holder.map(|r| r.id.clone()),
            }
        })
        .collect()
}
