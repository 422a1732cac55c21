//! API module - HTTP handlers and middleware.

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

use std::sync::Arc;

use crate::config::Config;
use crate::services::ReservationAccessService;
use crate::store::ReservationStore;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ReservationStore>,
    pub access: ReservationAccessService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ReservationStore>) -> Self {
        Self {
            config,
            access: ReservationAccessService::new(store.clone()),
            store,
        }
    }
}
