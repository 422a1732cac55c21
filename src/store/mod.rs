//! Persistent store abstraction.
//!
//! The engine treats storage as an external collaborator behind this
//! trait. Every method returns a materialized result with its filter
//! predicate spelled out in the doc comment, so behavior never depends
//! on query laziness. Two backends exist: [`postgres::PgStore`] for
//! production and [`memory::MemoryStore`] for tests and standalone use.
//!
//! Both backends enforce the reservation exclusion constraint at commit
//! time: no two active, non-canceled reservations on the same room may
//! have overlapping date ranges. A violating write fails with
//! [`AppError::Conflict`](crate::error::AppError::Conflict) and leaves
//! the store unchanged; the lifecycle service translates that into
//! `RoomUnavailable`. The in-process per-room lock held by the lifecycle
//! service is an optimization, this constraint is the guarantee of
//! record.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Actor, Hotel, HotelManagerAssignment, Permission, Reservation, Room};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// CRUD and query surface over hotels, rooms, actors, reservations,
/// permissions, and manager assignments.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn insert_hotel(&self, hotel: Hotel) -> Result<Hotel>;

    /// Fails with `Conflict` when `room_number` is already taken.
    async fn insert_room(&self, room: Room) -> Result<Room>;

    async fn insert_actor(&self, actor: Actor) -> Result<Actor>;

    /// Fails with `Conflict` when the permission `code` already exists.
    async fn insert_permission(&self, permission: Permission) -> Result<Permission>;

    /// Grant a permission to an actor.
    async fn grant_permission(&self, actor_id: Uuid, permission_id: Uuid) -> Result<()>;

    /// Fails with `Conflict` on a duplicate (manager, hotel) pair.
    async fn assign_manager(
        &self,
        assignment: HotelManagerAssignment,
    ) -> Result<HotelManagerAssignment>;

    async fn room(&self, id: Uuid) -> Result<Option<Room>>;

    async fn actor(&self, id: Uuid) -> Result<Option<Actor>>;

    async fn reservation(&self, id: Uuid) -> Result<Option<Reservation>>;

    /// All reservations on `room_id` with `is_active = true` and status
    /// not `canceled`, i.e. the ones that block availability.
    async fn active_reservations_for_room(&self, room_id: Uuid) -> Result<Vec<Reservation>>;

    /// All reservations whose room belongs to one of `hotel_ids`,
    /// ordered by check-in date descending, then check-out date
    /// descending (open-ended stays first).
    async fn reservations_for_hotels(&self, hotel_ids: &[Uuid]) -> Result<Vec<Reservation>>;

    /// Ids of the hotels the given manager is assigned to.
    async fn hotels_managed_by(&self, manager_id: Uuid) -> Result<Vec<Uuid>>;

    /// Permissions granted to the actor with `is_active = true`;
    /// inactive grants are never returned.
    async fn active_permissions_for_actor(&self, actor_id: Uuid) -> Result<Vec<Permission>>;

    /// Commit a new reservation. Fails with `Conflict` when it would
    /// overlap an existing active, non-canceled reservation on the
    /// same room.
    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation>;

    /// Replace a reservation atomically, re-checking the exclusion
    /// constraint against every other reservation on the target room.
    /// Fails with `NotFound` when the id is absent.
    async fn update_reservation(&self, reservation: Reservation) -> Result<Reservation>;
}
