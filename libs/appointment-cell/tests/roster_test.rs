use std::time::Duration;

use assert_matches::assert_matches;
use uuid::Uuid;

use appointment_cell::{AppointmentError, BookingRoster, SlotAllocator};
use shared_utils::test_utils::TestBooking;

#[test]
fn test_append_removes_slot_from_availability() {
    let mut roster = BookingRoster::new();
    let session = Uuid::new_v4();

    roster
        .append(session, TestBooking::record("Dr. Ben Adams", "2025-01-10", "10:00 AM"))
        .unwrap();

    let slots = roster.available_slots(Some("Dr. Ben Adams"), Some(TestBooking::date("2025-01-10")));
    assert_eq!(slots.len(), 31);
    assert!(!slots.contains(&TestBooking::slot("10:00 AM")));
    assert_eq!(roster.len(), 1);
}

#[test]
fn test_hold_blocks_other_sessions() {
    let mut roster = BookingRoster::new();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let appointment = TestBooking::appointment("Dr. Emily Carter", "2025-03-01", "11:30 AM");

    roster.hold(first, appointment.clone()).unwrap();

    assert_matches!(
        roster.hold(second, appointment.clone()),
        Err(AppointmentError::SlotNotAvailable { .. })
    );
    assert!(!roster
        .available_slots(Some("Dr. Emily Carter"), Some(TestBooking::date("2025-03-01")))
        .contains(&TestBooking::slot("11:30 AM")));
    // The holder itself may re-hold the same slot.
    assert!(roster.hold(first, appointment).is_ok());
}

#[test]
fn test_release_frees_slot() {
    let mut roster = BookingRoster::new();
    let session = Uuid::new_v4();
    let appointment = TestBooking::appointment("Dr. Emily Carter", "2025-03-01", "11:30 AM");

    roster.hold(session, appointment.clone()).unwrap();
    assert_eq!(roster.release(session), Some(appointment));
    assert_eq!(roster.release(session), None);

    assert_eq!(
        roster
            .available_slots(Some("Dr. Emily Carter"), Some(TestBooking::date("2025-03-01")))
            .len(),
        32
    );
}

#[test]
fn test_append_converts_own_hold() {
    let mut roster = BookingRoster::new();
    let session = Uuid::new_v4();
    let record = TestBooking::record("Dr. Chloe Davis", "2025-04-02", "03:00 PM");

    roster.hold(session, record.appointment.clone()).unwrap();
    roster.append(session, record).unwrap();

    assert!(roster.hold_for(session).is_none());
    assert_eq!(roster.len(), 1);
}

#[test]
fn test_append_rejects_slot_held_by_another_session() {
    let mut roster = BookingRoster::new();
    let record = TestBooking::record("Dr. Chloe Davis", "2025-04-02", "03:00 PM");

    roster.hold(Uuid::new_v4(), record.appointment.clone()).unwrap();

    assert_matches!(
        roster.append(Uuid::new_v4(), record),
        Err(AppointmentError::SlotNotAvailable { .. })
    );
    assert!(roster.is_empty());
}

#[test]
fn test_no_two_records_share_a_triple() {
    let mut roster = BookingRoster::new();

    roster
        .append(Uuid::new_v4(), TestBooking::record("Dr. Ben Adams", "2025-01-10", "10:00 AM"))
        .unwrap();

    assert_matches!(
        roster.append(Uuid::new_v4(), TestBooking::record("Dr. Ben Adams", "2025-01-10", "10:00 AM")),
        Err(AppointmentError::SlotNotAvailable { .. })
    );
    assert!(roster
        .append(Uuid::new_v4(), TestBooking::record("Dr. Ben Adams", "2025-01-10", "10:15 AM"))
        .is_ok());
}

#[test]
fn test_duplicate_booking_id_rejected() {
    let mut roster = BookingRoster::new();
    let record = TestBooking::record("Dr. Ben Adams", "2025-01-10", "10:00 AM");
    let mut copy = TestBooking::record("Dr. Ben Adams", "2025-01-10", "11:00 AM");
    copy.id = record.id;

    roster.append(Uuid::new_v4(), record).unwrap();

    assert_matches!(roster.append(Uuid::new_v4(), copy), Err(AppointmentError::DuplicateBooking(_)));
}

#[test]
fn test_follow_up_recorded_once_without_touching_record() {
    let mut roster = BookingRoster::new();
    let record = TestBooking::record("Dr. Ben Adams", "2025-01-10", "10:00 AM");
    let id = record.id;
    let original = record.clone();
    roster.append(Uuid::new_v4(), record).unwrap();

    roster.record_follow_up(id, "Should I fast beforehand?".to_string()).unwrap();

    assert_eq!(roster.follow_up(id), Some("Should I fast beforehand?"));
    assert_eq!(roster.get(id), Some(&original));
    assert_matches!(
        roster.record_follow_up(id, "Another".to_string()),
        Err(AppointmentError::FollowUpAlreadyRecorded(_))
    );
    assert_matches!(
        roster.record_follow_up(Uuid::new_v4(), "Lost".to_string()),
        Err(AppointmentError::BookingNotFound(_))
    );
}

#[test]
fn test_dashboard_filters_by_doctor_in_booking_order() {
    let mut roster = BookingRoster::new();
    let first = TestBooking::record("Dr. Ben Adams", "2025-01-10", "10:00 AM");
    let other = TestBooking::record("Dr. Emily Carter", "2025-01-10", "10:00 AM");
    let second = TestBooking::record("Dr. Ben Adams", "2025-01-09", "09:00 AM");
    let (first_id, second_id, other_id) = (first.id, second.id, other.id);

    roster.append(Uuid::new_v4(), first).unwrap();
    roster.append(Uuid::new_v4(), other).unwrap();
    roster.append(Uuid::new_v4(), second).unwrap();
    roster.record_follow_up(second_id, "Parking?".to_string()).unwrap();

    let entries = roster.for_doctor("Dr. Ben Adams");
    let ids: Vec<Uuid> = entries.iter().map(|e| e.record.id).collect();
    assert_eq!(ids, vec![first_id, second_id]);
    assert_eq!(entries[0].follow_up_question, None);
    assert_eq!(entries[1].follow_up_question.as_deref(), Some("Parking?"));

    assert!(roster.entry_for_doctor("Dr. Ben Adams", other_id).is_none());
    assert!(roster.entry_for_doctor("Dr. Emily Carter", other_id).is_some());
    assert!(roster.for_doctor("Dr. Chloe Davis").is_empty());
}

// ==============================================================================
// HOLD EXPIRY
// ==============================================================================

const TTL: Duration = Duration::from_secs(30 * 60);

#[tokio::test(start_paused = true)]
async fn test_abandoned_holds_free_the_day_after_ttl() {
    let mut roster = BookingRoster::with_hold_ttl(TTL);
    let date = TestBooking::date("2026-11-02");

    // One abandoned session per grid slot.
    for slot in SlotAllocator::daily_grid() {
        let appointment = TestBooking::appointment("Dr. Ben Adams", "2026-11-02", &slot.to_string());
        roster.hold(Uuid::new_v4(), appointment).unwrap();
    }
    assert!(roster.available_slots(Some("Dr. Ben Adams"), Some(date)).is_empty());

    tokio::time::advance(TTL + Duration::from_secs(1)).await;

    assert_eq!(roster.available_slots(Some("Dr. Ben Adams"), Some(date)).len(), 32);
    assert!(roster.is_empty());
    assert_eq!(roster.prune_expired_holds(), 32);
}

#[tokio::test(start_paused = true)]
async fn test_hold_is_live_until_ttl() {
    let mut roster = BookingRoster::with_hold_ttl(TTL);
    let session = Uuid::new_v4();
    let other = Uuid::new_v4();
    let appointment = TestBooking::appointment("Dr. Chloe Davis", "2026-11-02", "02:00 PM");
    roster.hold(session, appointment.clone()).unwrap();

    tokio::time::advance(TTL - Duration::from_secs(1)).await;

    assert_eq!(roster.hold_for(session), Some(&appointment));
    assert!(!roster.is_available(&appointment, other));
    assert_matches!(
        roster.hold(other, appointment.clone()),
        Err(AppointmentError::SlotNotAvailable { .. })
    );

    tokio::time::advance(Duration::from_secs(2)).await;

    assert!(roster.hold_for(session).is_none());
    assert!(roster.is_available(&appointment, other));
}

#[tokio::test(start_paused = true)]
async fn test_lapsed_hold_taken_by_another_session_blocks_append() {
    let mut roster = BookingRoster::with_hold_ttl(TTL);
    let slow = Uuid::new_v4();
    let fast = Uuid::new_v4();
    let appointment = TestBooking::appointment("Dr. Chloe Davis", "2026-11-02", "02:00 PM");
    roster.hold(slow, appointment.clone()).unwrap();

    tokio::time::advance(TTL + Duration::from_secs(1)).await;
    roster.hold(fast, appointment).unwrap();

    let result = roster.append(slow, TestBooking::record("Dr. Chloe Davis", "2026-11-02", "02:00 PM"));

    assert_matches!(result, Err(AppointmentError::SlotNotAvailable { .. }));
    assert!(roster.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lapsed_hold_still_appends_when_slot_is_free() {
    let mut roster = BookingRoster::with_hold_ttl(TTL);
    let session = Uuid::new_v4();
    roster
        .hold(session, TestBooking::appointment("Dr. Chloe Davis", "2026-11-02", "02:00 PM"))
        .unwrap();

    tokio::time::advance(TTL * 2).await;

    assert!(roster
        .append(session, TestBooking::record("Dr. Chloe Davis", "2026-11-02", "02:00 PM"))
        .is_ok());
    assert_eq!(roster.len(), 1);
}
