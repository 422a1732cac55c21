//! Core services: availability checking, reservation lifecycle,
//! authorization, and the actor-facing access surface.

pub mod authorization;
pub mod availability;
pub mod lifecycle;
pub mod reservation_access;

pub use authorization::{Action, AuthorizationGate};
pub use availability::AvailabilityChecker;
pub use lifecycle::{NewReservation, ReservationLifecycle, ReservationPatch};
pub use reservation_access::ReservationAccessService;
