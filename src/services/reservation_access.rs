//! Actor-facing reservation access service.
//!
//! Composes the authorization gate and the lifecycle service into the
//! two operations the outside world needs: list the reservations
//! visible to an actor, and apply a partial update on an actor's
//! behalf. The actor is always an explicit parameter; there is no
//! ambient "current user".

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Actor, Reservation};
use crate::services::authorization::{Action, AuthorizationGate};
use crate::services::lifecycle::{ReservationLifecycle, ReservationPatch};
use crate::store::ReservationStore;

pub struct ReservationAccessService {
    store: Arc<dyn ReservationStore>,
    gate: AuthorizationGate,
    lifecycle: ReservationLifecycle,
}

impl ReservationAccessService {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self {
            gate: AuthorizationGate::new(store.clone()),
            lifecycle: ReservationLifecycle::new(store.clone()),
            store,
        }
    }

    /// All reservations in the actor's hotel scope, ordered by check-in
    /// date descending then check-out date descending. An empty scope
    /// yields an empty list, never an unscoped one.
    pub async fn list_for_actor(&self, actor: &Actor) -> Result<Vec<Reservation>> {
        let scope = self.gate.managed_hotels(actor).await?;
        if scope.is_empty() {
            return Ok(Vec::new());
        }
        self.store.reservations_for_hotels(&scope).await
    }

    /// Load, authorize WRITE, then delegate to the lifecycle update,
    /// surfacing its errors unchanged. A denial reveals nothing about
    /// the reservation.
    pub async fn update_as_actor(
        &self,
        actor: &Actor,
        reservation_id: Uuid,
        patch: ReservationPatch,
    ) -> Result<Reservation> {
        let reservation = self
            .store
            .reservation(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        self.gate
            .authorize_reservation(actor, Action::Write, &reservation)
            .await?;

        self.lifecycle.update(reservation_id, patch).await
    }

    /// The lifecycle service behind this surface, for callers that
    /// create reservations directly (seeding, guest-facing flows).
    pub fn lifecycle(&self) -> &ReservationLifecycle {
        &self.lifecycle
    }
}
