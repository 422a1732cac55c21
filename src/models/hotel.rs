//! Hotel model and manager assignment join entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Hotel entity
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Hotel {
    pub id: Uuid,
    /// Unique hotel name
    pub name: String,
    /// Star rating, 1 to 5
    pub rating: i16,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join entity relating a manager actor to a hotel they administer.
/// Unique per (manager, hotel) pair; consulted only by the authorization
/// gate when computing a manager's hotel scope.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct HotelManagerAssignment {
    pub id: Uuid,
    pub manager_id: Uuid,
    pub hotel_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl HotelManagerAssignment {
    pub fn new(manager_id: Uuid, hotel_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            manager_id,
            hotel_id,
            created_at: Utc::now(),
        }
    }
}
