//! Actor model.
//!
//! Actors arrive from the external identity provider already
//! authenticated; this crate only resolves them by id and inspects
//! their kind and permission grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Actor kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "actor_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Guest,
    Manager,
    Admin,
}

/// Actor entity
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Actor {
    pub id: Uuid,
    pub kind: ActorKind,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
