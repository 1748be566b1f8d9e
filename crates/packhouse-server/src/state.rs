use application::PackingService;
use async_trait::async_trait;
use domain::event::PublishError;
use domain::{EventPublisher, PackingEvent};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Fans committed packing events out to live SSE listeners
#[derive(Clone)]
pub struct BroadcastPublisher {
    tx: broadcast::Sender<PackingEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PackingEvent> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, event: PackingEvent) -> Result<(), PublishError> {
        // No open screens is not an error
        if self.tx.send(event).is_err() {
            trace!("No event listeners");
        }
        Ok(())
    }
}

pub struct AppState {
    pub service: PackingService,
    pub events: BroadcastPublisher,
}

impl AppState {
    pub fn new(service: PackingService, events: BroadcastPublisher) -> Arc<Self> {
        Arc::new(Self { service, events })
    }
}
