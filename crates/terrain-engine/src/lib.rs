//! # terrain-engine
//!
//! Slot availability and booking validation for reservable sports terrains.
//!
//! Every operation is a pure function of its inputs: the caller supplies the
//! facility schedule and the reservations already booked, and the engine answers
//! which slots are free and whether a candidate booking may be accepted. Storage
//! stays outside, behind the [`ledger::ReservationLedger`] seam.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use terrain_engine::{enumerate_slots, validate_booking, FacilitySchedule, TimeOfDay};
//!
//! let schedule = FacilitySchedule::default();
//! let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! let start: TimeOfDay = "14:00".parse().unwrap();
//!
//! let interval = validate_booking(&schedule, date, start, 90, &[]).unwrap();
//! assert_eq!(interval.to_string(), "14:00-15:30");
//!
//! let slots = enumerate_slots(&schedule, &[]).unwrap();
//! assert_eq!(slots.len(), 14);
//! ```
//!
//! ## Modules
//!
//! - [`time`]: `TimeOfDay`, half-open `TimeInterval`, end-time arithmetic
//! - [`model`]: Schedules, reservations, terrains
//! - [`slots`]: Partition operating hours into slots and mark occupancy
//! - [`conflict`]: Overlap detection against existing reservations
//! - [`booking`]: Booking validation and pricing
//! - [`ledger`]: Reservation store seam and the booking workflow
//! - [`error`]: Error types

pub mod booking;
pub mod conflict;
pub mod error;
pub mod ledger;
pub mod model;
pub mod slots;
pub mod time;

pub use booking::{compute_end_time_for, quote, validate_booking};
pub use conflict::{conflicts, find_conflicts, is_available, Conflict};
pub use error::{BookingError, EngineError, LedgerError};
pub use ledger::{book, BookingRequest, MemoryLedger, ReservationLedger};
pub use model::{
    AvailabilityQuery, FacilitySchedule, Reservation, ReservationStatus, Terrain,
};
pub use slots::{enumerate_for_query, enumerate_slots, free_slots, SlotAvailability};
pub use time::{compute_end_time, format_duration, TimeInterval, TimeOfDay};
