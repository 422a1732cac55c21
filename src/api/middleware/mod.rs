//! API middleware.

pub mod actor;
