pub mod api;
pub mod auth;
pub mod error;
pub mod state;

use application::PackingService;
use domain::SystemClock;
use infrastructure::SeaOrmPackingStore;
use sea_orm::DatabaseConnection;
use state::{AppState, BroadcastPublisher};
use std::sync::Arc;

/// Wires the store, the live publisher and the service over one connection
pub fn setup_app_state(db: DatabaseConnection, event_buffer: usize) -> Arc<AppState> {
    let events = BroadcastPublisher::new(event_buffer);
    let service = PackingService::new(
        Arc::new(SeaOrmPackingStore::new(db)),
        Arc::new(events.clone()),
        Arc::new(SystemClock),
    );
    AppState::new(service, events)
}
