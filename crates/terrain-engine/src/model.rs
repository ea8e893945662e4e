//! Domain values passed into the engine: schedules, reservations, terrains.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::time::{TimeInterval, TimeOfDay};

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    /// Cancelled reservations are kept for history but never block a slot.
    Cancelled,
}

/// A party's claim on an interval of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Opaque identifier assigned by the ledger.
    pub id: String,
    /// Terrain the reservation is for. Empty when the record predates
    /// per-terrain ledgers.
    #[serde(default)]
    pub terrain_id: String,
    /// Naive local date, serialized as `yyyy-MM-dd`.
    pub date: NaiveDate,
    pub interval: TimeInterval,
    /// Opaque identifier of the reserving party.
    pub subject_id: String,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

impl Reservation {
    /// A new confirmed reservation without a price or terrain.
    pub fn confirmed(
        id: impl Into<String>,
        date: NaiveDate,
        interval: TimeInterval,
        subject_id: impl Into<String>,
    ) -> Self {
        Reservation {
            id: id.into(),
            terrain_id: String::new(),
            date,
            interval,
            subject_id: subject_id.into(),
            status: ReservationStatus::Confirmed,
            total_price: None,
        }
    }

    /// Attach the reservation to a terrain.
    pub fn on_terrain(mut self, terrain_id: impl Into<String>) -> Self {
        self.terrain_id = terrain_id.into();
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    /// Transition to `Cancelled`. Cancelling twice is a no-op.
    pub fn cancel(&mut self) {
        self.status = ReservationStatus::Cancelled;
    }
}

/// Operating hours and booking rules of one facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySchedule {
    pub operating_start: TimeOfDay,
    pub operating_end: TimeOfDay,
    /// Length of a display slot, in minutes.
    pub slot_granularity: u32,
    /// Durations (minutes) a booking may request.
    pub allowed_durations: BTreeSet<u32>,
}

impl Default for FacilitySchedule {
    /// 08:00-22:00 in one-hour slots, bookable from 30 minutes to 3 hours.
    fn default() -> Self {
        FacilitySchedule {
            operating_start: TimeOfDay::at_hour(8),
            operating_end: TimeOfDay::at_hour(22),
            slot_granularity: 60,
            allowed_durations: [30, 60, 90, 120, 150, 180].into_iter().collect(),
        }
    }
}

impl FacilitySchedule {
    /// Check the schedule's invariants.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidSchedule` if the opening time is not before
    /// the closing time, the granularity is zero, or an allowed duration is zero.
    pub fn validate(&self) -> Result<()> {
        if self.operating_start >= self.operating_end {
            return Err(EngineError::InvalidSchedule(format!(
                "operating start {} is not before operating end {}",
                self.operating_start, self.operating_end
            )));
        }
        if self.slot_granularity == 0 {
            return Err(EngineError::InvalidSchedule(
                "slot granularity must be positive".to_string(),
            ));
        }
        if self.allowed_durations.contains(&0) {
            return Err(EngineError::InvalidSchedule(
                "allowed durations must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The full operating window `[operating_start, operating_end)`.
    pub fn operating_hours(&self) -> Result<TimeInterval> {
        TimeInterval::new(self.operating_start, self.operating_end)
            .map_err(|_| EngineError::InvalidSchedule("empty operating hours".to_string()))
    }

    pub fn allows_duration(&self, duration_minutes: u32) -> bool {
        self.allowed_durations.contains(&duration_minutes)
    }
}

/// A date and the reservations already booked on it at one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

/// Descriptive metadata of a reservable facility, as edited on the admin screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub surface: String,
    #[serde(default)]
    pub coating: String,
    #[serde(default)]
    pub lighting: bool,
    pub price_per_hour: f64,
    #[serde(default)]
    pub schedule: FacilitySchedule,
}
