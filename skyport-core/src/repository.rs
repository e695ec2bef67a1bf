use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyport_domain::Flight;
use skyport_shared::models::events::FlightEvent;
use std::error::Error;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Flight number already exists: {0}")]
    DuplicateFlightNumber(String),

    #[error("Flight {flight_number} was modified concurrently (expected version {expected})")]
    VersionConflict {
        flight_number: String,
        expected: i64,
    },

    #[error("Store backend failure: {0}")]
    Backend(#[source] Box<dyn Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        StoreError::Backend(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for flight aggregates, keyed by flight number.
///
/// `save` is an upsert guarded by the flight's version: a never-saved flight
/// (version 0) must not collide with an existing number, and a loaded flight
/// must still carry the stored version. The returned flight has its audit
/// fields and version refreshed.
#[async_trait]
pub trait FlightStore: Send + Sync {
    async fn find_by_flight_number(&self, flight_number: &str) -> StoreResult<Option<Flight>>;

    /// All flights ordered by scheduled departure.
    async fn find_all(&self) -> StoreResult<Vec<Flight>>;

    async fn save(&self, flight: &Flight) -> StoreResult<Flight>;

    /// Removes the flight together with its passengers. `false` if absent.
    async fn delete_by_flight_number(&self, flight_number: &str) -> StoreResult<bool>;

    async fn find_by_route(&self, origin: &str, destination: &str) -> StoreResult<Vec<Flight>>;

    /// Inclusive on both ends.
    async fn find_by_departure_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Flight>>;

    async fn count(&self) -> StoreResult<u64>;
}

/// Outbound channel for flight events
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &FlightEvent) -> StoreResult<()>;
}
