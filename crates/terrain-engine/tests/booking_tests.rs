//! Tests for booking validation, end-time computation and pricing.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use terrain_engine::{
    compute_end_time_for, enumerate_slots, quote, validate_booking, BookingError, EngineError,
    FacilitySchedule, Reservation, Terrain, TimeInterval, TimeOfDay,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn at(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn interval(start: &str, end: &str) -> TimeInterval {
    TimeInterval::new(at(start), at(end)).unwrap()
}

fn reservation(id: &str, start: &str, end: &str) -> Reservation {
    Reservation::confirmed(id, day(), interval(start, end), "player-1")
}

fn schedule(durations: &[u32]) -> FacilitySchedule {
    FacilitySchedule {
        operating_start: at("08:00"),
        operating_end: at("22:00"),
        slot_granularity: 60,
        allowed_durations: durations.iter().copied().collect(),
    }
}

fn terrain(price_per_hour: f64) -> Terrain {
    Terrain {
        id: "terrain-1".to_string(),
        name: "Terrain Polyvalent".to_string(),
        description: String::new(),
        surface: "Synthétique".to_string(),
        coating: String::new(),
        lighting: true,
        price_per_hour,
        schedule: FacilitySchedule::default(),
    }
}

// ── End-to-end scenario ─────────────────────────────────────────────────────

#[test]
fn end_to_end_scenario() {
    let s = schedule(&[60, 90, 120]);
    let existing = vec![reservation("r-1", "14:00", "15:00")];

    assert_eq!(
        validate_booking(&s, day(), at("14:00"), 60, &existing),
        Err(BookingError::SlotConflict {
            reservation_id: "r-1".to_string()
        })
    );

    assert_eq!(
        validate_booking(&s, day(), at("13:00"), 60, &existing),
        Ok(interval("13:00", "14:00"))
    );

    let slots = enumerate_slots(&s, &existing).unwrap();
    assert_eq!(slots.len(), 14);
    assert_eq!(slots[0].interval.start(), at("08:00"));
    assert_eq!(slots[13].interval.end(), at("22:00"));
    for slot in &slots {
        let expected = slot.interval == interval("14:00", "15:00");
        assert_eq!(slot.occupied, expected, "slot {}", slot.interval);
    }
}

// ── Check ordering ──────────────────────────────────────────────────────────

#[test]
fn duration_not_offered_is_rejected_first() {
    // 45 minutes is not offered; the candidate also conflicts, but duration wins
    let s = schedule(&[30, 60, 90]);
    let existing = vec![reservation("r-1", "10:00", "11:00")];

    assert_eq!(
        validate_booking(&s, day(), at("10:00"), 45, &existing),
        Err(BookingError::DurationNotAllowed { duration: 45 })
    );
}

#[test]
fn start_before_opening_is_outside_hours() {
    let s = schedule(&[60]);
    assert_eq!(
        validate_booking(&s, day(), at("07:00"), 60, &[]),
        Err(BookingError::OutsideOperatingHours {
            opens: at("08:00"),
            closes: at("22:00"),
        })
    );
}

#[test]
fn outside_hours_wins_over_conflict() {
    let s = schedule(&[120]);
    let existing = vec![reservation("r-1", "21:00", "22:00")];

    let err = validate_booking(&s, day(), at("21:00"), 120, &existing).unwrap_err();
    assert!(
        matches!(err, BookingError::OutsideOperatingHours { .. }),
        "got {:?}",
        err
    );
}

#[test]
fn booking_may_end_exactly_at_closing() {
    let s = schedule(&[120]);
    assert_eq!(
        validate_booking(&s, day(), at("20:00"), 120, &[]),
        Ok(interval("20:00", "22:00"))
    );
}

#[test]
fn booking_across_midnight_is_outside_hours() {
    let s = FacilitySchedule {
        operating_start: at("18:00"),
        operating_end: at("23:59"),
        slot_granularity: 60,
        allowed_durations: BTreeSet::from([60]),
    };
    let err = validate_booking(&s, day(), at("23:30"), 60, &[]).unwrap_err();
    assert!(matches!(err, BookingError::OutsideOperatingHours { .. }));
}

#[test]
fn contained_candidate_is_a_slot_conflict() {
    let s = schedule(&[60]);
    let existing = vec![reservation("r-1", "09:30", "11:30")];
    assert_eq!(
        validate_booking(&s, day(), at("10:00"), 60, &existing),
        Err(BookingError::SlotConflict {
            reservation_id: "r-1".to_string()
        })
    );
}

#[test]
fn adjacent_bookings_are_accepted() {
    let s = schedule(&[60]);
    let existing = vec![
        reservation("r-1", "09:00", "10:00"),
        reservation("r-2", "11:00", "12:00"),
    ];
    assert_eq!(
        validate_booking(&s, day(), at("10:00"), 60, &existing),
        Ok(interval("10:00", "11:00"))
    );
}

#[test]
fn cancelled_reservation_does_not_block_booking() {
    let s = schedule(&[60]);
    let mut cancelled = reservation("r-1", "10:00", "11:00");
    cancelled.cancel();

    assert!(validate_booking(&s, day(), at("10:00"), 60, &[cancelled]).is_ok());
}

#[test]
fn malformed_schedule_is_reported() {
    let mut s = schedule(&[60]);
    s.slot_granularity = 0;

    let err = validate_booking(&s, day(), at("10:00"), 60, &[]).unwrap_err();
    assert!(matches!(err, BookingError::InvalidSchedule { .. }), "got {:?}", err);
}

#[test]
fn rejection_reasons_serialize_with_a_tag() {
    let err = BookingError::SlotConflict {
        reservation_id: "r-1".to_string(),
    };
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["reason"], "slot_conflict");
    assert_eq!(json["reservation_id"], "r-1");

    let hours = BookingError::OutsideOperatingHours {
        opens: at("08:00"),
        closes: at("22:00"),
    };
    let json = serde_json::to_value(&hours).unwrap();
    assert_eq!(json["reason"], "outside_operating_hours");
    assert_eq!(json["opens"], "08:00");
}

// ── End time with schedule ──────────────────────────────────────────────────

#[test]
fn end_time_for_allowed_duration() {
    let s = schedule(&[60, 90]);
    assert_eq!(compute_end_time_for(&s, at("10:00"), 90).unwrap(), at("11:30"));
}

#[test]
fn end_time_for_unlisted_duration_fails() {
    let s = schedule(&[60, 90]);
    let err = compute_end_time_for(&s, at("10:00"), 45).unwrap_err();
    assert!(matches!(err, EngineError::InvalidDuration(_)), "got {:?}", err);
}

// ── Pricing ─────────────────────────────────────────────────────────────────

#[test]
fn quote_is_prorated_by_duration() {
    assert_eq!(quote(&terrain(40.0), 60).unwrap(), 40.0);
    assert_eq!(quote(&terrain(40.0), 90).unwrap(), 60.0);
    assert_eq!(quote(&terrain(25.0), 30).unwrap(), 12.5);
}

#[test]
fn quote_keeps_cents() {
    assert_eq!(quote(&terrain(35.5), 90).unwrap(), 53.25);
    assert_eq!(quote(&terrain(10.0), 150).unwrap(), 25.0);
}

#[test]
fn quote_rejects_unoffered_duration() {
    let err = quote(&terrain(40.0), 45).unwrap_err();
    assert!(matches!(err, EngineError::InvalidDuration(_)));
}

#[test]
fn quote_rejects_negative_rate() {
    let err = quote(&terrain(-1.0), 60).unwrap_err();
    assert!(matches!(err, EngineError::InvalidPrice(_)));
}
