//! Reservation model and the status transition table.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lower bound for `number_of_guests` on a reservation.
pub const MIN_GUESTS: i32 = 1;
/// Upper bound for `number_of_guests` on a reservation.
pub const MAX_GUESTS: i32 = 10;

/// Reservation status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Canceled,
    Completed,
}

impl ReservationStatus {
    /// The status every reservation is created with, regardless of
    /// caller input.
    pub const INITIAL: ReservationStatus = ReservationStatus::Pending;

    /// The full transition table. Consulted by
    /// [`ReservationStatus::can_transition_to`]; terminal states map to
    /// an empty slice.
    pub fn allowed_transitions(self) -> &'static [ReservationStatus] {
        match self {
            ReservationStatus::Pending => {
                &[ReservationStatus::Confirmed, ReservationStatus::Canceled]
            }
            ReservationStatus::Confirmed => {
                &[ReservationStatus::Completed, ReservationStatus::Canceled]
            }
            ReservationStatus::Canceled | ReservationStatus::Completed => &[],
        }
    }

    /// Whether the table permits moving from `self` to `next`.
    /// Self-loops are not listed and therefore rejected.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Canceled and completed reservations accept no further transitions.
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Canceled => "canceled",
            ReservationStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation entity
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub room_id: Uuid,
    pub guest_id: Uuid,
    pub check_in_date: NaiveDate,
    /// Open-ended stay when absent; occupies `[check_in_date, +inf)`
    /// for overlap purposes
    pub check_out_date: Option<NaiveDate>,
    /// 1 to 10
    pub number_of_guests: i32,
    pub reservation_status: ReservationStatus,
    pub special_requests: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether this reservation counts against room availability:
    /// active flag set and not canceled.
    pub fn blocks_availability(&self) -> bool {
        self.is_active && self.reservation_status != ReservationStatus::Canceled
    }

    /// Interval-overlap test against `[start, end]`, where a missing
    /// bound on either side stands for positive infinity. Two ranges
    /// overlap when they share at least one day:
    /// `r_start <= end && r_end >= start`.
    pub fn overlaps(&self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        let starts_before_end = match end {
            Some(end) => self.check_in_date <= end,
            None => true,
        };
        let ends_after_start = match self.check_out_date {
            Some(r_end) => r_end >= start,
            None => true,
        };
        starts_before_end && ends_after_start
    }
}
