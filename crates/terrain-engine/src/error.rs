//! Error types for terrain-engine operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::TimeOfDay;

/// Precondition violations in engine inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid interval: {start} is not before {end}")]
    InvalidInterval { start: TimeOfDay, end: TimeOfDay },

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

/// Why a booking request was rejected.
///
/// Exactly one reason is reported per request. The variants are serialized with
/// a `reason` tag so front ends can map them to user-facing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BookingError {
    /// The requested duration is not one the facility offers.
    #[error("Duration of {duration} minutes is not offered")]
    DurationNotAllowed { duration: u32 },

    /// The candidate does not fit inside the operating hours.
    #[error("Requested time is outside operating hours {opens}-{closes}")]
    OutsideOperatingHours { opens: TimeOfDay, closes: TimeOfDay },

    /// The candidate overlaps an existing confirmed reservation.
    #[error("Slot conflicts with reservation '{reservation_id}'")]
    SlotConflict { reservation_id: String },

    /// The facility schedule itself is malformed.
    #[error("Invalid schedule: {message}")]
    InvalidSchedule { message: String },
}

/// Errors from a reservation ledger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Booking rejected: {0}")]
    Rejected(#[from] BookingError),

    /// A conditional write found a reservation that was not there at validation time.
    #[error("Write conflict with reservation '{0}'")]
    Conflict(String),

    #[error("Reservation not found: {0}")]
    NotFound(String),

    /// Reservation ids must be unique within a ledger.
    #[error("Duplicate reservation id: {0}")]
    DuplicateId(String),

    #[error("Pricing failed: {0}")]
    Pricing(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
