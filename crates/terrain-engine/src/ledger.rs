//! The reservation store as seen by a booking workflow.
//!
//! The engine never fetches or stores reservations itself. A booking workflow
//! reads the day's reservations from a [`ReservationLedger`], validates the
//! request with [`validate_booking`], then writes through
//! [`ReservationLedger::insert_if_free`], which re-checks for conflicts at
//! write time so two requests validated against the same snapshot cannot both
//! succeed.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::{quote, validate_booking};
use crate::conflict::find_conflicts;
use crate::error::LedgerError;
use crate::model::{Reservation, ReservationStatus, Terrain};
use crate::time::TimeOfDay;

/// A request to book a terrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub duration_minutes: u32,
    pub subject_id: String,
}

/// Storage collaborator for reservations.
///
/// Reservations are scoped by terrain: a booking on one terrain never blocks
/// another.
pub trait ReservationLedger {
    /// Confirmed reservations of `terrain_id` on `date`.
    fn reservations_on(&self, terrain_id: &str, date: NaiveDate) -> Vec<Reservation>;

    /// Every reservation held by `subject_id`, cancelled ones included.
    fn reservations_of(&self, subject_id: &str) -> Vec<Reservation>;

    /// Reserve a fresh identifier for a new reservation.
    fn allocate_id(&mut self) -> String;

    /// Store `reservation` unless its id is taken or a confirmed reservation
    /// of the same terrain and date overlaps it. The check and the write must
    /// be atomic.
    fn insert_if_free(&mut self, reservation: Reservation) -> Result<(), LedgerError>;

    /// Mark a reservation cancelled and return its new state.
    fn cancel(&mut self, id: &str) -> Result<Reservation, LedgerError>;
}

/// Validate `request` against `terrain` and the ledger's reservations, then store it.
///
/// The stored reservation carries the price quoted for the requested duration.
///
/// Nothing is written unless every step succeeds.
///
/// # Errors
/// - `LedgerError::Rejected` when validation fails.
/// - `LedgerError::Pricing` when the terrain's hourly price is unusable.
/// - `LedgerError::Conflict` when the conditional write finds an overlap.
pub fn book<L: ReservationLedger>(
    ledger: &mut L,
    terrain: &Terrain,
    request: &BookingRequest,
) -> Result<Reservation, LedgerError> {
    let existing = ledger.reservations_on(&terrain.id, request.date);
    let interval = validate_booking(
        &terrain.schedule,
        request.date,
        request.start,
        request.duration_minutes,
        &existing,
    )?;

    let total_price = quote(terrain, request.duration_minutes)?;

    let reservation = Reservation {
        id: ledger.allocate_id(),
        terrain_id: terrain.id.clone(),
        date: request.date,
        interval,
        subject_id: request.subject_id.clone(),
        status: ReservationStatus::Confirmed,
        total_price: Some(total_price),
    };
    ledger.insert_if_free(reservation.clone())?;
    Ok(reservation)
}

/// In-process ledger. Exclusive `&mut self` access makes check-and-insert atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    reservations: Vec<Reservation>,
    next_id: u64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger with existing reservations, stored as given.
    ///
    /// # Errors
    /// Returns `LedgerError::DuplicateId` if two reservations share an id.
    pub fn with_reservations(reservations: Vec<Reservation>) -> Result<Self, LedgerError> {
        if let Some(id) = first_duplicate_id(&reservations) {
            return Err(LedgerError::DuplicateId(id.to_string()));
        }
        Ok(MemoryLedger {
            next_id: reservations.len() as u64,
            reservations,
        })
    }

    pub fn all(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn get(&self, id: &str) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }
}

impl ReservationLedger for MemoryLedger {
    fn reservations_on(&self, terrain_id: &str, date: NaiveDate) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.terrain_id == terrain_id && r.date == date && r.is_active())
            .cloned()
            .collect()
    }

    fn reservations_of(&self, subject_id: &str) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.subject_id == subject_id)
            .cloned()
            .collect()
    }

    fn allocate_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("r-{}", self.next_id);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn insert_if_free(&mut self, reservation: Reservation) -> Result<(), LedgerError> {
        if self.get(&reservation.id).is_some() {
            return Err(LedgerError::DuplicateId(reservation.id));
        }
        if reservation.is_active() {
            let same_terrain = self.reservations_on(&reservation.terrain_id, reservation.date);
            let clash = find_conflicts(reservation.date, &reservation.interval, &same_terrain);
            if let Some(conflict) = clash.into_iter().next() {
                return Err(LedgerError::Conflict(conflict.reservation.id));
            }
        }
        self.reservations.push(reservation);
        Ok(())
    }

    fn cancel(&mut self, id: &str) -> Result<Reservation, LedgerError> {
        let reservation = self
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        reservation.cancel();
        Ok(reservation.clone())
    }
}

fn first_duplicate_id(reservations: &[Reservation]) -> Option<&str> {
    let mut seen = HashSet::new();
    reservations
        .iter()
        .map(|r| r.id.as_str())
        .find(|id| !seen.insert(*id))
}
