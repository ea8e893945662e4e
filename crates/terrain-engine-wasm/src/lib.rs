//! WASM bindings for terrain-engine.
//!
//! Exposes slot enumeration, booking validation and end-time arithmetic to a
//! JavaScript front end via `wasm-bindgen`. All complex types cross the boundary
//! as JSON strings in the same shape the engine serializes them.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p terrain-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/terrain_engine_wasm.wasm
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use terrain_engine::{BookingError, FacilitySchedule, Reservation, TimeInterval, TimeOfDay};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Outcome of `validateBooking`: either the accepted interval or the rejection.
#[derive(Serialize)]
#[serde(untagged)]
enum BookingOutcomeDto {
    Accepted {
        accepted: bool,
        interval: TimeInterval,
    },
    Rejected {
        accepted: bool,
        rejection: BookingError,
    },
}

// ---------------------------------------------------------------------------
// Helpers: parse JSON and scalar inputs
// ---------------------------------------------------------------------------

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

/// Parse a schedule; an empty string means the default schedule.
fn parse_schedule(json: &str) -> Result<FacilitySchedule, JsValue> {
    if json.trim().is_empty() {
        return Ok(FacilitySchedule::default());
    }
    serde_json::from_str(json).map_err(|e| js_error("Invalid schedule JSON", e))
}

fn parse_reservations(json: &str) -> Result<Vec<Reservation>, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error("Invalid reservations JSON", e))
}

fn parse_time(s: &str) -> Result<TimeOfDay, JsValue> {
    s.parse().map_err(|e| js_error("Invalid start time", e))
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| js_error(&format!("Invalid date '{}'", s), e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Enumerate the slot grid of one day.
///
/// `schedule_json` is a `FacilitySchedule` object (empty string for the default
/// schedule) and `reservations_json` an array of reservations for that day.
/// Returns a JSON array of `{interval, occupied, reservation_id?}` objects.
#[wasm_bindgen(js_name = "enumerateSlots")]
pub fn enumerate_slots(schedule_json: &str, reservations_json: &str) -> Result<String, JsValue> {
    let schedule = parse_schedule(schedule_json)?;
    let reservations = parse_reservations(reservations_json)?;

    let slots = terrain_engine::enumerate_slots(&schedule, &reservations)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&slots)
}

/// Validate a candidate booking.
///
/// Rejections are not errors here: the result is a JSON object with
/// `accepted: true` and the `interval`, or `accepted: false` and a `rejection`
/// tagged by `reason`. Only malformed inputs produce a thrown error.
#[wasm_bindgen(js_name = "validateBooking")]
pub fn validate_booking(
    schedule_json: &str,
    date: &str,
    start: &str,
    duration_minutes: u32,
    reservations_json: &str,
) -> Result<String, JsValue> {
    let schedule = parse_schedule(schedule_json)?;
    let date = parse_date(date)?;
    let start = parse_time(start)?;
    let reservations = parse_reservations(reservations_json)?;

    let result =
        terrain_engine::validate_booking(&schedule, date, start, duration_minutes, &reservations);
    let outcome = match result {
        Ok(interval) => BookingOutcomeDto::Accepted {
            accepted: true,
            interval,
        },
        Err(rejection) => BookingOutcomeDto::Rejected {
            accepted: false,
            rejection,
        },
    };
    to_json(&outcome)
}

/// Compute the `HH:MM` end time of a booking. Throws if it would cross midnight.
#[wasm_bindgen(js_name = "computeEndTime")]
pub fn compute_end_time(start: &str, duration_minutes: u32) -> Result<String, JsValue> {
    let start = parse_time(start)?;
    terrain_engine::compute_end_time(start, duration_minutes)
        .map(|end| end.to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Label a duration the way the booking screens show it (`1h30`).
#[wasm_bindgen(js_name = "formatDuration")]
pub fn format_duration(minutes: u32) -> String {
    terrain_engine::format_duration(minutes)
}
