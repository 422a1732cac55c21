//! Reservation lifecycle service.
//!
//! Owns creation, status transitions, and partial updates. Every write
//! runs validation first and touches the store exactly once, so a
//! rejected write leaves the store unchanged. Writes on the same room
//! are serialized through a per-room lock; the store's exclusion
//! constraint remains the final backstop and its violation is reported
//! as `RoomUnavailable`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::reservation::{MAX_GUESTS, MIN_GUESTS};
use crate::models::{Reservation, ReservationStatus, Room};
use crate::services::availability::AvailabilityChecker;
use crate::store::ReservationStore;

/// Input for creating a reservation. There is deliberately no status
/// field: every reservation starts `pending`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewReservation {
    pub room_id: Uuid,
    pub guest_id: Uuid,
    pub check_in_date: NaiveDate,
    pub check_out_date: Option<NaiveDate>,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

/// Partial update. Absent fields are left untouched; a supplied
/// `reservation_status` is routed through the transition table before
/// anything is applied.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReservationPatch {
    pub room_id: Option<Uuid>,
    pub guest_id: Option<Uuid>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub number_of_guests: Option<i32>,
    pub reservation_status: Option<ReservationStatus>,
    pub special_requests: Option<String>,
    pub is_active: Option<bool>,
}

/// Registry of per-room write locks. Lock-free reads are unaffected;
/// create/update on the same room serialize here so two requests cannot
/// both pass the overlap check before either commits.
#[derive(Default)]
struct RoomLocks {
    locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl RoomLocks {
    fn for_room(&self, room_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Entries whose only holder is the map itself are idle; drop
        // them so the registry does not grow with every room ever seen.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(room_id).or_default().clone()
    }
}

pub struct ReservationLifecycle {
    store: Arc<dyn ReservationStore>,
    availability: AvailabilityChecker,
    room_locks: RoomLocks,
}

impl ReservationLifecycle {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self {
            availability: AvailabilityChecker::new(store.clone()),
            store,
            room_locks: RoomLocks::default(),
        }
    }

    /// Create a reservation. Initial status is forced to `pending`
    /// regardless of caller input; fails with a validation error on a
    /// bad guest count or date range, and with `RoomUnavailable` when
    /// the room is out of service or the range collides with an
    /// existing active reservation.
    pub async fn create(&self, new: NewReservation) -> Result<Reservation> {
        let room = self.require_room(new.room_id).await?;
        if !room.is_available {
            return Err(AppError::RoomUnavailable);
        }

        validate_guest_count(new.number_of_guests)?;
        validate_dates(new.check_in_date, new.check_out_date)?;

        let lock = self.room_locks.for_room(room.id);
        let _guard = lock.lock().await;

        if !self
            .availability
            .is_range_free(room.id, new.check_in_date, new.check_out_date)
            .await?
        {
            return Err(AppError::RoomUnavailable);
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            room_id: new.room_id,
            guest_id: new.guest_id,
            check_in_date: new.check_in_date,
            check_out_date: new.check_out_date,
            number_of_guests: new.number_of_guests,
            reservation_status: ReservationStatus::INITIAL,
            special_requests: new.special_requests,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let committed = self
            .store
            .insert_reservation(reservation)
            .await
            .map_err(constraint_to_unavailable)?;

        tracing::info!(
            reservation_id = %committed.id,
            room_id = %committed.room_id,
            check_in = %committed.check_in_date,
            "Reservation created"
        );
        Ok(committed)
    }

    /// Apply a pure status transition.
    pub async fn transition(&self, id: Uuid, status: ReservationStatus) -> Result<Reservation> {
        self.update(
            id,
            ReservationPatch {
                reservation_status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Apply a partial update atomically: the whole patch is validated
    /// against the resulting reservation before the single store write,
    /// so a failing field rejects everything. The room lock is held
    /// across check and write, and the checks run against a read taken
    /// under that lock, so two racing updates cannot both validate
    /// against the same stale snapshot.
    pub async fn update(&self, id: Uuid, patch: ReservationPatch) -> Result<Reservation> {
        loop {
            let snapshot = self.require_reservation(id).await?;
            let lock_room = patch.room_id.unwrap_or(snapshot.room_id);
            let lock = self.room_locks.for_room(lock_room);
            let _guard = lock.lock().await;

            // A racing update may have committed between the snapshot
            // and the lock; re-read now that the lock is held.
            let current = self.require_reservation(id).await?;
            if patch.room_id.unwrap_or(current.room_id) != lock_room {
                // the reservation moved rooms while we waited
                continue;
            }
            return self.apply_patch(current, patch.clone()).await;
        }
    }

    /// Check-and-write body of [`update`]; the caller holds the room
    /// lock for `current.room_id` (or the patch's target room).
    async fn apply_patch(
        &self,
        current: Reservation,
        patch: ReservationPatch,
    ) -> Result<Reservation> {
        // Status first: an illegal transition rejects the patch before
        // any other field is considered.
        if let Some(requested) = patch.reservation_status {
            if !current.reservation_status.can_transition_to(requested) {
                return Err(AppError::InvalidTransition {
                    from: current.reservation_status,
                    to: requested,
                });
            }
        }

        let mut updated = current.clone();
        if let Some(status) = patch.reservation_status {
            updated.reservation_status = status;
        }
        if let Some(room_id) = patch.room_id {
            updated.room_id = room_id;
        }
        if let Some(guest_id) = patch.guest_id {
            updated.guest_id = guest_id;
        }
        if let Some(check_in) = patch.check_in_date {
            updated.check_in_date = check_in;
        }
        if let Some(check_out) = patch.check_out_date {
            updated.check_out_date = Some(check_out);
        }
        if let Some(count) = patch.number_of_guests {
            updated.number_of_guests = count;
        }
        if let Some(requests) = patch.special_requests {
            updated.special_requests = Some(requests);
        }
        if let Some(active) = patch.is_active {
            updated.is_active = active;
        }
        updated.updated_at = Utc::now();

        if updated.number_of_guests != current.number_of_guests {
            validate_guest_count(updated.number_of_guests)?;
        }

        let dates_changed = updated.check_in_date != current.check_in_date
            || updated.check_out_date != current.check_out_date;
        let room_changed = updated.room_id != current.room_id;
        // A room move re-validates the dates too: the stay must still
        // be one that could be booked fresh on the target room.
        if dates_changed || room_changed {
            validate_dates(updated.check_in_date, updated.check_out_date)?;
        }
        if room_changed {
            let room = self.require_room(updated.room_id).await?;
            if !room.is_available {
                return Err(AppError::RoomUnavailable);
            }
        }

        // Reapply the overlap check whenever the occupied range could
        // have changed or the reservation newly blocks availability.
        let reactivated = updated.blocks_availability() && !current.blocks_availability();
        let needs_availability_check =
            updated.blocks_availability() && (dates_changed || room_changed || reactivated);

        if needs_availability_check
            && !self
                .availability
                .is_range_free_excluding(
                    updated.room_id,
                    updated.check_in_date,
                    updated.check_out_date,
                    Some(updated.id),
                )
                .await?
        {
            return Err(AppError::RoomUnavailable);
        }

        let committed = self
            .store
            .update_reservation(updated)
            .await
            .map_err(constraint_to_unavailable)?;

        tracing::info!(
            reservation_id = %committed.id,
            status = %committed.reservation_status,
            "Reservation updated"
        );
        Ok(committed)
    }

    async fn require_room(&self, room_id: Uuid) -> Result<Room> {
        self.store
            .room(room_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))
    }

    async fn require_reservation(&self, id: Uuid) -> Result<Reservation> {
        self.store
            .reservation(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))
    }
}

/// The store's exclusion constraint is the backstop against races that
/// slip past the in-process lock; its violation is a booking conflict,
/// not an internal error.
fn constraint_to_unavailable(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::RoomUnavailable,
        other => other,
    }
}

fn validate_guest_count(count: i32) -> Result<()> {
    if !(MIN_GUESTS..=MAX_GUESTS).contains(&count) {
        return Err(AppError::validation(
            "number_of_guests",
            format!("must be between {MIN_GUESTS} and {MAX_GUESTS}"),
        ));
    }
    Ok(())
}

fn validate_dates(check_in: NaiveDate, check_out: Option<NaiveDate>) -> Result<()> {
    let today = Utc::now().date_naive();
    if check_in < today {
        return Err(AppError::validation(
            "check_in_date",
            "check-in date cannot be in the past",
        ));
    }
    if let Some(check_out) = check_out {
        if check_out < today {
            return Err(AppError::validation(
                "check_out_date",
                "check-out date cannot be in the past",
            ));
        }
        if check_out <= check_in {
            return Err(AppError::validation(
                "check_out_date",
                "check-out date must be after check-in date",
            ));
        }
    }
    Ok(())
}
