//! Domain entities persisted by the reservation store.

pub mod actor;
pub mod hotel;
pub mod permission;
pub mod reservation;
pub mod room;

pub use actor::{Actor, ActorKind};
pub use hotel::{Hotel, HotelManagerAssignment};
pub use permission::Permission;
pub use reservation::{Reservation, ReservationStatus};
pub use room::{Room, RoomType};
