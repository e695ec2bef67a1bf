use async_trait::async_trait;
use skyport_shared::models::events::FlightEvent;
use tracing::info;

use crate::repository::{EventPublisher, StoreResult};

/// Writes events to the log. Used when no broker is configured.
#[derive(Debug, Default, Clone)]
pub struct LoggingEventPublisher;

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: &FlightEvent) -> StoreResult<()> {
        let payload = serde_json::to_string(event).map_err(crate::StoreError::backend)?;
        info!(topic = event.topic(), key = event.flight_number(), "{}", payload);
        Ok(())
    }
}
