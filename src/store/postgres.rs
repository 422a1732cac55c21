//! Postgres store backend.
//!
//! Queries use the runtime API with explicit binds. The schema in
//! `migrations/` carries the exclusion constraint over
//! `daterange(check_in_date, check_out_date + 1)` per room; a violation
//! surfaces here as a unique/exclusion error and is mapped to
//! `Conflict`. Transient connection failures are retried once with a
//! short backoff, then reported as `StoreUnavailable`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Actor, Hotel, HotelManagerAssignment, Permission, Reservation, Room};
use crate::store::ReservationStore;

const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Postgres [`ReservationStore`] backend.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

fn map_store_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        // 23505 unique_violation, 23P01 exclusion_violation
        if matches!(db_err.code().as_deref(), Some("23505") | Some("23P01")) {
            return AppError::Conflict(db_err.message().to_string());
        }
    }
    AppError::Database(err.to_string())
}

/// Run `op`, retrying once after a backoff on a transient failure.
async fn retry_once<T, F, Fut>(op: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(err) if is_transient(&err) => {
            tracing::warn!(error = %err, "Transient store error, retrying once");
            tokio::time::sleep(RETRY_BACKOFF).await;
            match op().await {
                Ok(value) => Ok(value),
                Err(err) if is_transient(&err) => {
                    tracing::error!(error = %err, "Store still unreachable after retry");
                    Err(AppError::StoreUnavailable)
                }
                Err(err) => Err(map_store_error(err)),
            }
        }
        Err(err) => Err(map_store_error(err)),
    }
}

const RESERVATION_COLUMNS: &str = "id, room_id, guest_id, check_in_date, check_out_date, \
     number_of_guests, reservation_status, special_requests, is_active, created_at, updated_at";

#[async_trait]
impl ReservationStore for PgStore {
    async fn insert_hotel(&self, hotel: Hotel) -> Result<Hotel> {
        let hotel = &hotel;
        retry_once(|| async move {
            sqlx::query_as::<_, Hotel>(
                r#"
                INSERT INTO hotels (id, name, rating, address, city, state, country, phone, email, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING id, name, rating, address, city, state, country, phone, email, created_at, updated_at
                "#,
            )
            .bind(hotel.id)
            .bind(&hotel.name)
            .bind(hotel.rating)
            .bind(&hotel.address)
            .bind(&hotel.city)
            .bind(&hotel.state)
            .bind(&hotel.country)
            .bind(&hotel.phone)
            .bind(&hotel.email)
            .bind(hotel.created_at)
            .bind(hotel.updated_at)
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    async fn insert_room(&self, room: Room) -> Result<Room> {
        let room = &room;
        retry_once(|| async move {
            sqlx::query_as::<_, Room>(
                r#"
                INSERT INTO rooms (id, hotel_id, room_number, room_type, bed_count, capacity,
                                   price_per_night, is_available, amenities, description,
                                   created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING id, hotel_id, room_number, room_type, bed_count, capacity,
                          price_per_night, is_available, amenities, description,
                          created_at, updated_at
                "#,
            )
            .bind(room.id)
            .bind(room.hotel_id)
            .bind(room.room_number)
            .bind(room.room_type)
            .bind(room.bed_count)
            .bind(room.capacity)
            .bind(room.price_per_night)
            .bind(room.is_available)
            .bind(&room.amenities)
            .bind(&room.description)
            .bind(room.created_at)
            .bind(room.updated_at)
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    async fn insert_actor(&self, actor: Actor) -> Result<Actor> {
        let actor = &actor;
        retry_once(|| async move {
            sqlx::query_as::<_, Actor>(
                r#"
                INSERT INTO actors (id, kind, username, email, is_active, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, kind, username, email, is_active, created_at, updated_at
                "#,
            )
            .bind(actor.id)
            .bind(actor.kind)
            .bind(&actor.username)
            .bind(&actor.email)
            .bind(actor.is_active)
            .bind(actor.created_at)
            .bind(actor.updated_at)
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    async fn insert_permission(&self, permission: Permission) -> Result<Permission> {
        let permission = &permission;
        retry_once(|| async move {
            sqlx::query_as::<_, Permission>(
                r#"
                INSERT INTO permissions (id, code, can_view, can_edit, can_delete, is_active, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, code, can_view, can_edit, can_delete, is_active, created_at
                "#,
            )
            .bind(permission.id)
            .bind(&permission.code)
            .bind(permission.can_view)
            .bind(permission.can_edit)
            .bind(permission.can_delete)
            .bind(permission.is_active)
            .bind(permission.created_at)
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    async fn grant_permission(&self, actor_id: Uuid, permission_id: Uuid) -> Result<()> {
        retry_once(|| async move {
            sqlx::query(
                r#"
                INSERT INTO permission_grants (actor_id, permission_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(actor_id)
            .bind(permission_id)
            .execute(&self.pool)
            .await
            .map(|_| ())
        })
        .await
    }

    async fn assign_manager(
        &self,
        assignment: HotelManagerAssignment,
    ) -> Result<HotelManagerAssignment> {
        let assignment = &assignment;
        retry_once(|| async move {
            sqlx::query_as::<_, HotelManagerAssignment>(
                r#"
                INSERT INTO hotel_to_manager (id, manager_id, hotel_id, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id, manager_id, hotel_id, created_at
                "#,
            )
            .bind(assignment.id)
            .bind(assignment.manager_id)
            .bind(assignment.hotel_id)
            .bind(assignment.created_at)
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    async fn room(&self, id: Uuid) -> Result<Option<Room>> {
        retry_once(|| async move {
            sqlx::query_as::<_, Room>(
                r#"
                SELECT id, hotel_id, room_number, room_type, bed_count, capacity,
                       price_per_night, is_available, amenities, description,
                       created_at, updated_at
                FROM rooms
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
        })
        .await
    }

    async fn actor(&self, id: Uuid) -> Result<Option<Actor>> {
        retry_once(|| async move {
            sqlx::query_as::<_, Actor>(
                "SELECT id, kind, username, email, is_active, created_at, updated_at \
                 FROM actors WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
        })
        .await
    }

    async fn reservation(&self, id: Uuid) -> Result<Option<Reservation>> {
        retry_once(|| async move {
            sqlx::query_as::<_, Reservation>(&format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
        })
        .await
    }

    async fn active_reservations_for_room(&self, room_id: Uuid) -> Result<Vec<Reservation>> {
        retry_once(|| async move {
            sqlx::query_as::<_, Reservation>(&format!(
                r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE room_id = $1
                  AND is_active = true
                  AND reservation_status <> 'canceled'
                "#
            ))
            .bind(room_id)
            .fetch_all(&self.pool)
            .await
        })
        .await
    }

    async fn reservations_for_hotels(&self, hotel_ids: &[Uuid]) -> Result<Vec<Reservation>> {
        retry_once(|| async move {
            sqlx::query_as::<_, Reservation>(
                r#"
                SELECT r.id, r.room_id, r.guest_id, r.check_in_date, r.check_out_date,
                       r.number_of_guests, r.reservation_status, r.special_requests,
                       r.is_active, r.created_at, r.updated_at
                FROM reservations r
                JOIN rooms ON rooms.id = r.room_id
                WHERE rooms.hotel_id = ANY($1)
                ORDER BY r.check_in_date DESC, r.check_out_date DESC
                "#,
            )
            .bind(hotel_ids)
            .fetch_all(&self.pool)
            .await
        })
        .await
    }

    async fn hotels_managed_by(&self, manager_id: Uuid) -> Result<Vec<Uuid>> {
        retry_once(|| async move {
            sqlx::query_scalar::<_, Uuid>(
                "SELECT hotel_id FROM hotel_to_manager WHERE manager_id = $1",
            )
            .bind(manager_id)
            .fetch_all(&self.pool)
            .await
        })
        .await
    }

    async fn active_permissions_for_actor(&self, actor_id: Uuid) -> Result<Vec<Permission>> {
        retry_once(|| async move {
            sqlx::query_as::<_, Permission>(
                r#"
                SELECT p.id, p.code, p.can_view, p.can_edit, p.can_delete, p.is_active, p.created_at
                FROM permissions p
                JOIN permission_grants g ON g.permission_id = p.id
                WHERE g.actor_id = $1 AND p.is_active = true
                "#,
            )
            .bind(actor_id)
            .fetch_all(&self.pool)
            .await
        })
        .await
    }

    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation> {
        let reservation = &reservation;
        retry_once(|| async move {
            sqlx::query_as::<_, Reservation>(&format!(
                r#"
                INSERT INTO reservations (id, room_id, guest_id, check_in_date, check_out_date,
                                          number_of_guests, reservation_status, special_requests,
                                          is_active, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING {RESERVATION_COLUMNS}
                "#
            ))
            .bind(reservation.id)
            .bind(reservation.room_id)
            .bind(reservation.guest_id)
            .bind(reservation.check_in_date)
            .bind(reservation.check_out_date)
            .bind(reservation.number_of_guests)
            .bind(reservation.reservation_status)
            .bind(&reservation.special_requests)
            .bind(reservation.is_active)
            .bind(reservation.created_at)
            .bind(reservation.updated_at)
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    async fn update_reservation(&self, reservation: Reservation) -> Result<Reservation> {
        let reservation = &reservation;
        let updated = retry_once(|| async move {
            sqlx::query_as::<_, Reservation>(&format!(
                r#"
                UPDATE reservations
                SET room_id = $2, guest_id = $3, check_in_date = $4, check_out_date = $5,
                    number_of_guests = $6, reservation_status = $7, special_requests = $8,
                    is_active = $9, updated_at = $10
                WHERE id = $1
                RETURNING {RESERVATION_COLUMNS}
                "#
            ))
            .bind(reservation.id)
            .bind(reservation.room_id)
            .bind(reservation.guest_id)
            .bind(reservation.check_in_date)
            .bind(reservation.check_out_date)
            .bind(reservation.number_of_guests)
            .bind(reservation.reservation_status)
            .bind(&reservation.special_requests)
            .bind(reservation.is_active)
            .bind(reservation.updated_at)
            .fetch_optional(&self.pool)
            .await
        })
        .await?;

        updated.ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))
    }
}
