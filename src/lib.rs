//! Innkeeper - Backend Library
//!
//! Hotel reservation backend: room availability, reservation status
//! lifecycle, and permission/hotel-scoped authorization.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
