//! Validate booking requests and price them.
//!
//! [`validate_booking`] is what a booking workflow calls before persisting a
//! reservation. Its checks run in a fixed order and stop at the first failure:
//!
//! 1. the duration is one the facility offers,
//! 2. the candidate fits inside operating hours,
//! 3. the candidate overlaps no confirmed reservation.

use chrono::NaiveDate;

use crate::conflict::find_conflicts;
use crate::error::{BookingError, EngineError, Result};
use crate::model::{FacilitySchedule, Reservation, Terrain};
use crate::time::{compute_end_time, TimeInterval, TimeOfDay};

/// Validate a candidate booking against a schedule and the day's reservations.
///
/// Returns the candidate interval `[start, start + duration)` when it can be
/// accepted. Reservations on other dates and cancelled reservations are ignored.
///
/// # Errors
/// - `BookingError::InvalidSchedule` if the schedule itself is malformed.
/// - `BookingError::DurationNotAllowed` if the duration is not offered.
/// - `BookingError::OutsideOperatingHours` if the candidate starts before
///   opening, ends after closing, or would run past midnight.
/// - `BookingError::SlotConflict` with the first overlapping reservation.
pub fn validate_booking(
    schedule: &FacilitySchedule,
    date: NaiveDate,
    start: TimeOfDay,
    duration_minutes: u32,
    reservations: &[Reservation],
) -> std::result::Result<TimeInterval, BookingError> {
    if let Err(e) = schedule.validate() {
        return Err(BookingError::InvalidSchedule {
            message: schedule_message(e),
        });
    }

    if !schedule.allows_duration(duration_minutes) {
        return Err(BookingError::DurationNotAllowed {
            duration: duration_minutes,
        });
    }

    let outside = || BookingError::OutsideOperatingHours {
        opens: schedule.operating_start,
        closes: schedule.operating_end,
    };
    let candidate = TimeInterval::starting_at(start, duration_minutes).map_err(|_| outside())?;
    if candidate.start() < schedule.operating_start || candidate.end() > schedule.operating_end {
        return Err(outside());
    }

    if let Some(conflict) = find_conflicts(date, &candidate, reservations).into_iter().next() {
        return Err(BookingError::SlotConflict {
            reservation_id: conflict.reservation.id,
        });
    }

    Ok(candidate)
}

/// Compute a booking's end time, also requiring the duration to be offered.
///
/// # Errors
/// Returns `EngineError::InvalidDuration` if the duration is not in
/// `schedule.allowed_durations` or the booking would cross midnight.
pub fn compute_end_time_for(
    schedule: &FacilitySchedule,
    start: TimeOfDay,
    duration_minutes: u32,
) -> Result<TimeOfDay> {
    if !schedule.allows_duration(duration_minutes) {
        return Err(EngineError::InvalidDuration(format!(
            "{} minutes is not an allowed duration",
            duration_minutes
        )));
    }
    compute_end_time(start, duration_minutes)
}

/// Price of booking `terrain` for `duration_minutes`, rounded to cents.
///
/// # Errors
/// Returns `EngineError::InvalidDuration` for a duration the terrain does not
/// offer, and `EngineError::InvalidPrice` for a negative or non-finite rate.
pub fn quote(terrain: &Terrain, duration_minutes: u32) -> Result<f64> {
    if !terrain.price_per_hour.is_finite() || terrain.price_per_hour < 0.0 {
        return Err(EngineError::InvalidPrice(format!(
            "{} per hour for terrain '{}'",
            terrain.price_per_hour, terrain.id
        )));
    }
    if !terrain.schedule.allows_duration(duration_minutes) {
        return Err(EngineError::InvalidDuration(format!(
            "{} minutes is not offered on terrain '{}'",
            duration_minutes, terrain.id
        )));
    }
    let raw = terrain.price_per_hour * f64::from(duration_minutes) / 60.0;
    Ok((raw * 100.0).round() / 100.0)
}

fn schedule_message(error: EngineError) -> String {
    match error {
        EngineError::InvalidSchedule(message) => message,
        other => other.to_string(),
    }
}
