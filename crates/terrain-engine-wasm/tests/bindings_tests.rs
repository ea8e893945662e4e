//! Native tests for the JSON contract of the WASM exports.
//!
//! Only success paths run here: building a `JsValue` error needs a wasm32 host.

use terrain_engine_wasm::{compute_end_time, enumerate_slots, format_duration, validate_booking};

const RESERVATIONS: &str = r#"[
    {"id":"r-1","date":"2026-03-16","interval":{"start":"14:00","end":"15:00"},"subject_id":"alice"}
]"#;

#[test]
fn enumerate_slots_with_default_schedule() {
    let json = enumerate_slots("", RESERVATIONS).unwrap();
    let slots: serde_json::Value = serde_json::from_str(&json).unwrap();
    let slots = slots.as_array().unwrap();

    assert_eq!(slots.len(), 14);
    assert_eq!(slots[6]["interval"]["start"], "14:00");
    assert_eq!(slots[6]["occupied"], true);
    assert_eq!(slots[6]["reservation_id"], "r-1");
    assert!(slots[7].get("reservation_id").is_none());
}

#[test]
fn validate_booking_accepts_free_slot() {
    let json = validate_booking("", "2026-03-16", "13:00", 60, RESERVATIONS).unwrap();
    let outcome: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(outcome["accepted"], true);
    assert_eq!(outcome["interval"]["start"], "13:00");
    assert_eq!(outcome["interval"]["end"], "14:00");
}

#[test]
fn validate_booking_reports_rejection_as_data() {
    let json = validate_booking("", "2026-03-16", "14:30", 60, RESERVATIONS).unwrap();
    let outcome: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(outcome["accepted"], false);
    assert_eq!(outcome["rejection"]["reason"], "slot_conflict");
    assert_eq!(outcome["rejection"]["reservation_id"], "r-1");
}

#[test]
fn end_time_and_duration_labels() {
    assert_eq!(compute_end_time("10:30", 90).unwrap(), "12:00");
    assert_eq!(format_duration(90), "1h30");
}
