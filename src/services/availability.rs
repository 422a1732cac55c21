//! Room availability checker.
//!
//! Read-only: decides whether a date range on a room is free of
//! conflicting active reservations. Reads current store state on every
//! call; nothing is cached across calls.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::store::ReservationStore;

pub struct AvailabilityChecker {
    store: Arc<dyn ReservationStore>,
}

impl AvailabilityChecker {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Whether `[start, end]` on the room is free of conflicting
    /// reservations. `end = None` stands for an open-ended stay
    /// occupying `[start, +inf)`. Callers validate `start <= end`
    /// before invoking.
    ///
    /// Only active, non-canceled reservations are considered; a range
    /// conflicts when `r_start <= end && r_end >= start`.
    pub async fn is_range_free(
        &self,
        room_id: Uuid,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<bool> {
        self.is_range_free_excluding(room_id, start, end, None).await
    }

    /// Same test, ignoring one reservation id. Used when revalidating
    /// an update so a reservation does not conflict with itself.
    pub async fn is_range_free_excluding(
        &self,
        room_id: Uuid,
        start: NaiveDate,
        end: Option<NaiveDate>,
        exclude: Option<Uuid>,
    ) -> Result<bool> {
        let existing = self.store.active_reservations_for_room(room_id).await?;
        Ok(!existing
            .iter()
            .any(|r| Some(r.id) != exclude && r.overlaps(start, end)))
    }
}
