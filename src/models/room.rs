//! Room model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Room type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "room_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Suite,
    Deluxe,
    Family,
}

/// Room entity
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub id: Uuid,
    pub hotel_id: Uuid,
    /// Unique system-wide
    pub room_number: i32,
    pub room_type: RoomType,
    /// Number of beds, 1 to 10
    pub bed_count: i32,
    /// Maximum occupancy, 1 to 5
    pub capacity: i32,
    pub price_per_night: f64,
    /// Administrative out-of-service switch, distinct from
    /// date-based availability
    pub is_available: bool,
    pub amenities: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
