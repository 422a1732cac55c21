//! Authorization gate.
//!
//! Decides, for an actor and an action on a reservation, whether the
//! action is permitted. Two modes compose: a direct permission-code
//! check against the actor's active permission grants, and hotel
//! scoping through manager assignments. Read-only; mutates nothing.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::permission::RESERVATIONS_PERMISSION_CODE;
use crate::models::{Actor, ActorKind, Permission, Reservation};
use crate::store::ReservationStore;

/// Denial message. Deliberately fixed so a response never reveals
/// whether the resource exists.
const DENIED: &str = "You do not have permission to perform this action.";

/// The three actions an actor can request on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
    Delete,
}

impl Action {
    /// Map the action onto the permission's capability flag. A plain
    /// match, so an unknown action name cannot slip through a lookup
    /// at runtime.
    pub fn is_granted_by(self, permission: &Permission) -> bool {
        match self {
            Action::Read => permission.can_view,
            Action::Write => permission.can_edit,
            Action::Delete => permission.can_delete,
        }
    }
}

pub struct AuthorizationGate {
    store: Arc<dyn ReservationStore>,
}

impl AuthorizationGate {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Allow the action when either mode grants it; otherwise deny.
    pub async fn authorize_reservation(
        &self,
        actor: &Actor,
        action: Action,
        reservation: &Reservation,
    ) -> Result<()> {
        if self.has_direct_permission(actor, action).await? {
            return Ok(());
        }

        if actor.kind == ActorKind::Manager {
            let scope = self.managed_hotels(actor).await?;
            if !scope.is_empty() {
                if let Some(room) = self.store.room(reservation.room_id).await? {
                    if scope.contains(&room.hotel_id) {
                        return Ok(());
                    }
                }
            }
        }

        Err(AppError::Forbidden(DENIED.to_string()))
    }

    /// The set of hotel ids the actor is authorized over. Empty for
    /// anyone who is not a manager, and empty for a manager with zero
    /// assignments: absence of scope denies, it never grants broad
    /// access.
    pub async fn managed_hotels(&self, actor: &Actor) -> Result<Vec<Uuid>> {
        if actor.kind != ActorKind::Manager {
            return Ok(Vec::new());
        }
        self.store.hotels_managed_by(actor.id).await
    }

    /// Direct mode: an active permission carrying the reservations code
    /// whose flag for this action is set.
    async fn has_direct_permission(&self, actor: &Actor, action: Action) -> Result<bool> {
        let permissions = self.store.active_permissions_for_actor(actor.id).await?;
        if let Some(permission) = permissions
            .iter()
            .find(|p| p.code == RESERVATIONS_PERMISSION_CODE && action.is_granted_by(p))
        {
            tracing::debug!(
                actor_id = %actor.id,
                code = %permission.code,
                flags = %permission.flags_to_str(),
                "Direct permission grant"
            );
            return Ok(true);
        }
        Ok(false)
    }
}
