//! In-memory store backend.
//!
//! All tables live behind a single `RwLock`, so every write commits
//! atomically and constraint checks see a consistent snapshot. Enforces
//! the same constraints as the Postgres schema: unique room numbers,
//! unique permission codes, unique (manager, hotel) pairs, and the
//! reservation exclusion rule.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Actor, Hotel, HotelManagerAssignment, Permission, Reservation, Room};
use crate::store::ReservationStore;

#[derive(Default)]
struct Tables {
    hotels: HashMap<Uuid, Hotel>,
    rooms: HashMap<Uuid, Room>,
    actors: HashMap<Uuid, Actor>,
    reservations: HashMap<Uuid, Reservation>,
    permissions: HashMap<Uuid, Permission>,
    grants: Vec<(Uuid, Uuid)>,
    assignments: Vec<HotelManagerAssignment>,
}

impl Tables {
    /// Exclusion check shared by insert and update paths. `exclude` is
    /// the id of the reservation being replaced, if any.
    fn violates_exclusion(&self, candidate: &Reservation, exclude: Option<Uuid>) -> bool {
        if !candidate.blocks_availability() {
            return false;
        }
        self.reservations.values().any(|existing| {
            existing.room_id == candidate.room_id
                && Some(existing.id) != exclude
                && existing.blocks_availability()
                && existing.overlaps(candidate.check_in_date, candidate.check_out_date)
        })
    }
}

/// In-memory [`ReservationStore`] backend.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn insert_hotel(&self, hotel: Hotel) -> Result<Hotel> {
        let mut tables = self.tables.write().await;
        if tables.hotels.values().any(|h| h.name == hotel.name) {
            return Err(AppError::Conflict(format!(
                "Hotel name '{}' already exists",
                hotel.name
            )));
        }
        tables.hotels.insert(hotel.id, hotel.clone());
        Ok(hotel)
    }

    async fn insert_room(&self, room: Room) -> Result<Room> {
        let mut tables = self.tables.write().await;
        if !tables.hotels.contains_key(&room.hotel_id) {
            return Err(AppError::NotFound("Hotel not found".to_string()));
        }
        if tables
            .rooms
            .values()
            .any(|r| r.room_number == room.room_number)
        {
            return Err(AppError::Conflict(format!(
                "Room number {} already exists",
                room.room_number
            )));
        }
        tables.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn insert_actor(&self, actor: Actor) -> Result<Actor> {
        let mut tables = self.tables.write().await;
        tables.actors.insert(actor.id, actor.clone());
        Ok(actor)
    }

    async fn insert_permission(&self, permission: Permission) -> Result<Permission> {
        let mut tables = self.tables.write().await;
        if tables
            .permissions
            .values()
            .any(|p| p.code == permission.code)
        {
            return Err(AppError::Conflict(format!(
                "Permission code '{}' already exists",
                permission.code
            )));
        }
        tables.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn grant_permission(&self, actor_id: Uuid, permission_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.permissions.contains_key(&permission_id) {
            return Err(AppError::NotFound("Permission not found".to_string()));
        }
        if !tables.grants.contains(&(actor_id, permission_id)) {
            tables.grants.push((actor_id, permission_id));
        }
        Ok(())
    }

    async fn assign_manager(
        &self,
        assignment: HotelManagerAssignment,
    ) -> Result<HotelManagerAssignment> {
        let mut tables = self.tables.write().await;
        if tables.assignments.iter().any(|a| {
            a.manager_id == assignment.manager_id && a.hotel_id == assignment.hotel_id
        }) {
            return Err(AppError::Conflict(
                "Manager is already assigned to this hotel".to_string(),
            ));
        }
        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn room(&self, id: Uuid) -> Result<Option<Room>> {
        Ok(self.tables.read().await.rooms.get(&id).cloned())
    }

    async fn actor(&self, id: Uuid) -> Result<Option<Actor>> {
        Ok(self.tables.read().await.actors.get(&id).cloned())
    }

    async fn reservation(&self, id: Uuid) -> Result<Option<Reservation>> {
        Ok(self.tables.read().await.reservations.get(&id).cloned())
    }

    async fn active_reservations_for_room(&self, room_id: Uuid) -> Result<Vec<Reservation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reservations
            .values()
            .filter(|r| r.room_id == room_id && r.blocks_availability())
            .cloned()
            .collect())
    }

    async fn reservations_for_hotels(&self, hotel_ids: &[Uuid]) -> Result<Vec<Reservation>> {
        let tables = self.tables.read().await;
        let mut reservations: Vec<Reservation> = tables
            .reservations
            .values()
            .filter(|r| {
                tables
                    .rooms
                    .get(&r.room_id)
                    .is_some_and(|room| hotel_ids.contains(&room.hotel_id))
            })
            .cloned()
            .collect();
        // check_in desc, then check_out desc with open-ended stays first,
        // matching the Postgres DESC NULLS FIRST ordering
        reservations.sort_by(|a, b| {
            b.check_in_date
                .cmp(&a.check_in_date)
                .then_with(|| match (b.check_out_date, a.check_out_date) {
                    (None, None) => std::cmp::Ordering::Equal,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (Some(b_out), Some(a_out)) => b_out.cmp(&a_out),
                })
        });
        Ok(reservations)
    }

    async fn hotels_managed_by(&self, manager_id: Uuid) -> Result<Vec<Uuid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .filter(|a| a.manager_id == manager_id)
            .map(|a| a.hotel_id)
            .collect())
    }

    async fn active_permissions_for_actor(&self, actor_id: Uuid) -> Result<Vec<Permission>> {
        let tables = self.tables.read().await;
        Ok(tables
            .grants
            .iter()
            .filter(|(granted_to, _)| *granted_to == actor_id)
            .filter_map(|(_, permission_id)| tables.permissions.get(permission_id))
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&reservation.room_id) {
            return Err(AppError::NotFound("Room not found".to_string()));
        }
        if tables.violates_exclusion(&reservation, None) {
            return Err(AppError::Conflict(
                "Overlapping active reservation exists for this room".to_string(),
            ));
        }
        tables.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update_reservation(&self, reservation: Reservation) -> Result<Reservation> {
        let mut tables = self.tables.write().await;
        if !tables.reservations.contains_key(&reservation.id) {
            return Err(AppError::NotFound("Reservation not found".to_string()));
        }
        if !tables.rooms.contains_key(&reservation.room_id) {
            return Err(AppError::NotFound("Room not found".to_string()));
        }
        if tables.violates_exclusion(&reservation, Some(reservation.id)) {
            return Err(AppError::Conflict(
                "Overlapping active reservation exists for this room".to_string(),
            ));
        }
        tables.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }
}
