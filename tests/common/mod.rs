//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use innkeeper_backend::models::{
    Actor, ActorKind, Hotel, HotelManagerAssignment, Permission, Reservation, ReservationStatus,
    Room, RoomType,
};
use innkeeper_backend::store::{MemoryStore, ReservationStore};

/// A date `n` days from today; validation rejects past dates, so all
/// test ranges are expressed relative to the current date.
pub fn days_ahead(n: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(n)
}

pub fn new_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub async fn create_hotel(store: &Arc<MemoryStore>, name: &str) -> Hotel {
    let now = Utc::now();
    store
        .insert_hotel(Hotel {
            id: Uuid::new_v4(),
            name: name.to_string(),
            rating: 4,
            address: "12 Harbor St".to_string(),
            city: "Gdansk".to_string(),
            state: "Pomerania".to_string(),
            country: "PL".to_string(),
            phone: format!("+48{}", &Uuid::new_v4().simple().to_string()[..9]),
            email: format!("front@{}.example", name.to_lowercase().replace(' ', "-")),
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("failed to create test hotel")
}

pub async fn create_room(store: &Arc<MemoryStore>, hotel_id: Uuid, room_number: i32) -> Room {
    let now = Utc::now();
    store
        .insert_room(Room {
            id: Uuid::new_v4(),
            hotel_id,
            room_number,
            room_type: RoomType::Double,
            bed_count: 2,
            capacity: 3,
            price_per_night: 110.0,
            is_available: true,
            amenities: Some("wifi, balcony".to_string()),
            description: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("failed to create test room")
}

pub async fn create_out_of_service_room(
    store: &Arc<MemoryStore>,
    hotel_id: Uuid,
    room_number: i32,
) -> Room {
    let now = Utc::now();
    store
        .insert_room(Room {
            id: Uuid::new_v4(),
            hotel_id,
            room_number,
            room_type: RoomType::Single,
            bed_count: 1,
            capacity: 1,
            price_per_night: 60.0,
            is_available: false,
            amenities: None,
            description: Some("under renovation".to_string()),
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("failed to create test room")
}

pub async fn create_actor(store: &Arc<MemoryStore>, kind: ActorKind) -> Actor {
    let now = Utc::now();
    let id = Uuid::new_v4();
    store
        .insert_actor(Actor {
            id,
            kind,
            username: format!("actor-{}", id.simple()),
            email: format!("{}@guests.example", id.simple()),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("failed to create test actor")
}

pub async fn assign_manager(store: &Arc<MemoryStore>, manager_id: Uuid, hotel_id: Uuid) {
    store
        .assign_manager(HotelManagerAssignment::new(manager_id, hotel_id))
        .await
        .expect("failed to assign manager");
}

/// Create a permission with the reservations code and grant it to the
/// actor.
pub async fn grant_reservation_permission(
    store: &Arc<MemoryStore>,
    actor_id: Uuid,
    can_view: bool,
    can_edit: bool,
    is_active: bool,
) {
    let permission = store
        .insert_permission(Permission {
            id: Uuid::new_v4(),
            code: "HMAN_RES".to_string(),
            can_view,
            can_edit,
            can_delete: false,
            is_active,
            created_at: Utc::now(),
        })
        .await
        .expect("failed to create permission");
    store
        .grant_permission(actor_id, permission.id)
        .await
        .expect("failed to grant permission");
}

/// Insert a reservation directly through the store, bypassing the
/// lifecycle service. For seeding scenarios and constraint tests.
pub fn raw_reservation(
    room_id: Uuid,
    guest_id: Uuid,
    check_in: NaiveDate,
    check_out: Option<NaiveDate>,
    status: ReservationStatus,
) -> Reservation {
    let now = Utc::now();
    Reservation {
        id: Uuid::new_v4(),
        room_id,
        guest_id,
        check_in_date: check_in,
        check_out_date: check_out,
        number_of_guests: 2,
        reservation_status: status,
        special_requests: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
