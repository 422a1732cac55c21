//! Integration tests for reservation creation, validation, and the
//! status transition machine, driven through the in-memory store.

mod common;

use std::sync::Arc;

use common::*;
use innkeeper_backend::error::AppError;
use innkeeper_backend::models::{ActorKind, ReservationStatus};
use innkeeper_backend::services::{AvailabilityChecker, NewReservation, ReservationLifecycle, ReservationPatch};
use innkeeper_backend::store::{MemoryStore, ReservationStore};

fn new_reservation_request(
    room_id: uuid::Uuid,
    guest_id: uuid::Uuid,
    check_in_days: i64,
    check_out_days: Option<i64>,
) -> NewReservation {
    NewReservation {
        room_id,
        guest_id,
        check_in_date: days_ahead(check_in_days),
        check_out_date: check_out_days.map(days_ahead),
        number_of_guests: 2,
        special_requests: None,
    }
}

async fn setup() -> (Arc<MemoryStore>, ReservationLifecycle, uuid::Uuid, uuid::Uuid) {
    let store = new_store();
    let hotel = create_hotel(&store, "Seaside Court").await;
    let room = create_room(&store, hotel.id, 101).await;
    let guest = create_actor(&store, ActorKind::Guest).await;
    let lifecycle = ReservationLifecycle::new(store.clone() as Arc<dyn ReservationStore>);
    (store, lifecycle, room.id, guest.id)
}

#[tokio::test]
async fn create_forces_pending_and_blocks_the_range() {
    let (store, lifecycle, room_id, guest_id) = setup().await;

    let reservation = lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .expect("creation should succeed on a free room");

    assert_eq!(reservation.reservation_status, ReservationStatus::Pending);
    assert!(reservation.is_active);

    // the committed range is no longer free
    let checker = AvailabilityChecker::new(store as Arc<dyn ReservationStore>);
    assert!(!checker
        .is_range_free(room_id, days_ahead(10), Some(days_ahead(14)))
        .await
        .unwrap());
}

#[tokio::test]
async fn overlapping_range_is_rejected_and_adjacent_range_accepted() {
    // Room with an existing confirmed reservation [d, d+4]:
    // [d+3, d+7] overlaps and must fail, [d+5, d+9] must succeed.
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    let first = lifecycle
        .create(new_reservation_request(room_id, guest_id, 0, Some(4)))
        .await
        .unwrap();
    lifecycle
        .transition(first.id, ReservationStatus::Confirmed)
        .await
        .unwrap();

    let overlapping = lifecycle
        .create(new_reservation_request(room_id, guest_id, 3, Some(7)))
        .await;
    assert!(matches!(overlapping, Err(AppError::RoomUnavailable)));

    let adjacent = lifecycle
        .create(new_reservation_request(room_id, guest_id, 5, Some(9)))
        .await
        .expect("non-overlapping range should be accepted");
    assert_eq!(adjacent.reservation_status, ReservationStatus::Pending);
}

#[tokio::test]
async fn guest_count_out_of_bounds_is_a_validation_error() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    for bad_count in [0, 11] {
        let mut request = new_reservation_request(room_id, guest_id, 10, Some(12));
        request.number_of_guests = bad_count;
        match lifecycle.create(request).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "number_of_guests"),
            other => panic!("expected validation error for count {bad_count}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn past_and_inverted_date_ranges_are_rejected() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    match lifecycle
        .create(new_reservation_request(room_id, guest_id, -2, Some(3)))
        .await
    {
        Err(AppError::Validation { field, .. }) => assert_eq!(field, "check_in_date"),
        other => panic!("expected validation error, got {other:?}"),
    }

    // check-out before check-in
    match lifecycle
        .create(new_reservation_request(room_id, guest_id, 8, Some(5)))
        .await
    {
        Err(AppError::Validation { field, .. }) => assert_eq!(field, "check_out_date"),
        other => panic!("expected validation error, got {other:?}"),
    }

    // same-day check-out is not a stay
    match lifecycle
        .create(new_reservation_request(room_id, guest_id, 8, Some(8)))
        .await
    {
        Err(AppError::Validation { field, .. }) => assert_eq!(field, "check_out_date"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn out_of_service_room_cannot_be_booked() {
    let store = new_store();
    let hotel = create_hotel(&store, "Hilltop Inn").await;
    let room = create_out_of_service_room(&store, hotel.id, 301).await;
    let guest = create_actor(&store, ActorKind::Guest).await;
    let lifecycle = ReservationLifecycle::new(store as Arc<dyn ReservationStore>);

    let result = lifecycle
        .create(new_reservation_request(room.id, guest.id, 10, Some(12)))
        .await;
    assert!(matches!(result, Err(AppError::RoomUnavailable)));
}

#[tokio::test]
async fn open_ended_reservation_blocks_all_later_ranges() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    lifecycle
        .create(new_reservation_request(room_id, guest_id, 5, None))
        .await
        .unwrap();

    let far_future = lifecycle
        .create(new_reservation_request(room_id, guest_id, 400, Some(404)))
        .await;
    assert!(matches!(far_future, Err(AppError::RoomUnavailable)));
}

#[tokio::test]
async fn full_lifecycle_pending_confirmed_completed() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    let reservation = lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .unwrap();

    let confirmed = lifecycle
        .transition(reservation.id, ReservationStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed.reservation_status, ReservationStatus::Confirmed);

    let completed = lifecycle
        .transition(reservation.id, ReservationStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.reservation_status, ReservationStatus::Completed);
}

#[tokio::test]
async fn pending_cannot_jump_to_completed() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    let reservation = lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .unwrap();

    match lifecycle
        .transition(reservation.id, ReservationStatus::Completed)
        .await
    {
        Err(AppError::InvalidTransition { from, to }) => {
            assert_eq!(from, ReservationStatus::Pending);
            assert_eq!(to, ReservationStatus::Completed);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[tokio::test]
async fn canceled_is_terminal() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    let reservation = lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .unwrap();
    lifecycle
        .transition(reservation.id, ReservationStatus::Canceled)
        .await
        .unwrap();

    for target in [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Canceled,
        ReservationStatus::Completed,
    ] {
        let result = lifecycle.transition(reservation.id, target).await;
        assert!(
            matches!(result, Err(AppError::InvalidTransition { .. })),
            "canceled -> {target} should be rejected"
        );
    }
}

#[tokio::test]
async fn canceling_frees_the_room() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    let reservation = lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .unwrap();
    lifecycle
        .transition(reservation.id, ReservationStatus::Canceled)
        .await
        .unwrap();

    // cancellation is a status change, not a removal; the range is free
    lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .expect("range should be free after cancellation");
}

#[tokio::test]
async fn failing_field_rejects_the_whole_patch() {
    let (store, lifecycle, room_id, guest_id) = setup().await;

    let reservation = lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .unwrap();

    // legal status change combined with an illegal guest count
    let result = lifecycle
        .update(
            reservation.id,
            ReservationPatch {
                reservation_status: Some(ReservationStatus::Confirmed),
                number_of_guests: Some(11),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));

    // nothing was applied
    let stored = store.reservation(reservation.id).await.unwrap().unwrap();
    assert_eq!(stored.reservation_status, ReservationStatus::Pending);
    assert_eq!(stored.number_of_guests, 2);
}

#[tokio::test]
async fn moving_dates_onto_an_occupied_range_is_rejected() {
    let (store, lifecycle, room_id, guest_id) = setup().await;

    lifecycle
        .create(new_reservation_request(room_id, guest_id, 0, Some(4)))
        .await
        .unwrap();
    let second = lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .unwrap();

    let result = lifecycle
        .update(
            second.id,
            ReservationPatch {
                check_in_date: Some(days_ahead(2)),
                check_out_date: Some(days_ahead(6)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::RoomUnavailable)));

    let stored = store.reservation(second.id).await.unwrap().unwrap();
    assert_eq!(stored.check_in_date, days_ahead(10));
}

#[tokio::test]
async fn shifting_own_dates_does_not_conflict_with_itself() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;

    let reservation = lifecycle
        .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
        .await
        .unwrap();

    // overlaps the old range, which must not count against the update
    let updated = lifecycle
        .update(
            reservation.id,
            ReservationPatch {
                check_in_date: Some(days_ahead(12)),
                check_out_date: Some(days_ahead(16)),
                ..Default::default()
            },
        )
        .await
        .expect("shifting a reservation within its own range should succeed");
    assert_eq!(updated.check_in_date, days_ahead(12));
}

#[tokio::test]
async fn racing_cancel_and_confirm_cannot_overwrite_a_terminal_state() {
    // Both transitions are legal from pending, so the loser must be
    // judged against the winner's committed status, never against a
    // stale pending snapshot. Whatever the interleaving, cancellation
    // sticks: canceled accepts no further transitions.
    for _ in 0..16 {
        let (store, lifecycle, room_id, guest_id) = setup().await;
        let lifecycle = Arc::new(lifecycle);
        let reservation_id = lifecycle
            .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
            .await
            .unwrap()
            .id;

        let cancel = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move {
                lifecycle
                    .transition(reservation_id, ReservationStatus::Canceled)
                    .await
            })
        };
        let confirm = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move {
                lifecycle
                    .transition(reservation_id, ReservationStatus::Confirmed)
                    .await
            })
        };

        let cancel = cancel.await.unwrap();
        let confirm = confirm.await.unwrap();

        // cancel always lands: either first from pending, or second
        // from confirmed
        assert!(cancel.is_ok(), "cancel failed: {cancel:?}");
        if let Err(error) = confirm {
            assert!(
                matches!(
                    error,
                    AppError::InvalidTransition {
                        from: ReservationStatus::Canceled,
                        to: ReservationStatus::Confirmed,
                    }
                ),
                "unexpected confirm error: {error:?}"
            );
        }

        let stored = store.reservation(reservation_id).await.unwrap().unwrap();
        assert_eq!(stored.reservation_status, ReservationStatus::Canceled);
    }
}

#[tokio::test]
async fn moving_to_another_room_revalidates_the_dates() {
    let store = new_store();
    let hotel = create_hotel(&store, "Seaside Court").await;
    let room_a = create_room(&store, hotel.id, 101).await;
    let room_b = create_room(&store, hotel.id, 102).await;
    let guest = create_actor(&store, ActorKind::Guest).await;
    let lifecycle = ReservationLifecycle::new(store.clone() as Arc<dyn ReservationStore>);

    // a stay whose check-in has already passed, seeded directly
    let stale = store
        .insert_reservation(raw_reservation(
            room_a.id,
            guest.id,
            days_ahead(-3),
            Some(days_ahead(2)),
            ReservationStatus::Confirmed,
        ))
        .await
        .unwrap();

    // a room-only patch must clear the same date checks as a fresh
    // booking on the target room
    let result = lifecycle
        .update(
            stale.id,
            ReservationPatch {
                room_id: Some(room_b.id),
                ..Default::default()
            },
        )
        .await;
    match result {
        Err(AppError::Validation { field, .. }) => assert_eq!(field, "check_in_date"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let stored = store.reservation(stale.id).await.unwrap().unwrap();
    assert_eq!(stored.room_id, room_a.id);
}

#[tokio::test]
async fn update_of_missing_reservation_is_not_found() {
    let (_store, lifecycle, _room_id, _guest_id) = setup().await;

    let result = lifecycle
        .transition(uuid::Uuid::new_v4(), ReservationStatus::Confirmed)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn store_constraint_rejects_direct_overlapping_insert() {
    let (store, _lifecycle, room_id, guest_id) = setup().await;

    store
        .insert_reservation(raw_reservation(
            room_id,
            guest_id,
            days_ahead(10),
            Some(days_ahead(14)),
            ReservationStatus::Confirmed,
        ))
        .await
        .unwrap();

    // bypassing the lifecycle service entirely still cannot double-book
    let result = store
        .insert_reservation(raw_reservation(
            room_id,
            guest_id,
            days_ahead(12),
            Some(days_ahead(16)),
            ReservationStatus::Pending,
        ))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn concurrent_creates_on_one_room_yield_a_single_booking() {
    let (_store, lifecycle, room_id, guest_id) = setup().await;
    let lifecycle = Arc::new(lifecycle);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let lifecycle = lifecycle.clone();
        handles.push(tokio::spawn(async move {
            lifecycle
                .create(new_reservation_request(room_id, guest_id, 10, Some(14)))
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::RoomUnavailable) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(successes, 1);
}
