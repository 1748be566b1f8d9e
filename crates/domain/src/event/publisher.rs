use super::PackingEvent;
use async_trait::async_trait;

pub type PublishError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: PackingEvent) -> Result<(), PublishError>;
}

/// Publisher that drops every event, for callers without listeners
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: PackingEvent) -> Result<(), PublishError> {
        Ok(())
    }
}
