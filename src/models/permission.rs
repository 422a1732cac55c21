//! Permission model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Permission code guarding manager access to reservations.
pub const RESERVATIONS_PERMISSION_CODE: &str = "HMAN_RES";

/// A named permission with three independent capability flags.
/// Actors hold zero or more of these through grant rows; only
/// `is_active = true` permissions are considered during authorization,
/// inactive ones are retained for audit but inert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    /// Unique permission code, e.g. `HMAN_RES`
    pub code: String,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Permission {
    /// Compact `RWD` rendering of the capability flags, used in logs.
    pub fn flags_to_str(&self) -> String {
        let mut s = String::new();
        if self.can_view {
            s.push('R');
        }
        if self.can_edit {
            s.push('W');
        }
        if self.can_delete {
            s.push('D');
        }
        s
    }
}
