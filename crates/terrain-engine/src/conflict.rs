//! Detect overlaps between a candidate interval and existing reservations.
//!
//! Overlap is the half-open test `a.start < b.end && b.start < a.end`.
//! Adjacent intervals (one ends exactly when another starts) are NOT conflicts.
//! Cancelled reservations never take part in a check.

use chrono::NaiveDate;

use crate::model::Reservation;
use crate::time::TimeInterval;

/// An existing reservation that overlaps a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub reservation: Reservation,
    pub overlap_minutes: u32,
}

/// Whether two intervals overlap. Symmetric in its arguments.
pub fn conflicts(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.overlaps(b)
}

/// Reservations that can block a slot on `date`: confirmed and on that date.
pub(crate) fn blocking_on<'a>(
    date: NaiveDate,
    reservations: &'a [Reservation],
) -> impl Iterator<Item = &'a Reservation> + 'a {
    reservations
        .iter()
        .filter(move |r| r.is_active() && r.date == date)
}

/// Find every confirmed reservation on `date` that overlaps `candidate`.
///
/// Results keep the order of `reservations`.
pub fn find_conflicts(
    date: NaiveDate,
    candidate: &TimeInterval,
    reservations: &[Reservation],
) -> Vec<Conflict> {
    blocking_on(date, reservations)
        .filter(|r| conflicts(candidate, &r.interval))
        .map(|r| Conflict {
            reservation: r.clone(),
            overlap_minutes: candidate.overlap_minutes(&r.interval),
        })
        .collect()
}

/// Whether `candidate` is free on `date`, i.e. overlaps no confirmed reservation.
///
/// Any overlap, however small, makes the candidate unavailable.
pub fn is_available(
    date: NaiveDate,
    candidate: &TimeInterval,
    reservations: &[Reservation],
) -> bool {
    !blocking_on(date, reservations).any(|r| conflicts(candidate, &r.interval))
}
