use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyport_domain::Flight;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::repository::{FlightStore, StoreError, StoreResult};

/// Process-local flight store with the same version and audit semantics as
/// the database-backed one.
#[derive(Default)]
pub struct InMemoryFlightStore {
    flights: RwLock<HashMap<String, Flight>>,
}

impl InMemoryFlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<P>(&self, predicate: P) -> Vec<Flight>
    where
        P: Fn(&Flight) -> bool,
    {
        let flights = self.flights.read().await;
        let mut matched: Vec<Flight> = flights.values().filter(|f| predicate(f)).cloned().collect();
        matched.sort_by(|a, b| {
            a.scheduled_departure()
                .cmp(&b.scheduled_departure())
                .then_with(|| a.flight_number().cmp(b.flight_number()))
        });
        matched
    }
}

#[async_trait]
impl FlightStore for InMemoryFlightStore {
    async fn find_by_flight_number(&self, flight_number: &str) -> StoreResult<Option<Flight>> {
        Ok(self.flights.read().await.get(flight_number).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Flight>> {
        Ok(self.select(|_| true).await)
    }

    async fn save(&self, flight: &Flight) -> StoreResult<Flight> {
        let mut flights = self.flights.write().await;

        match flights.get(flight.flight_number()) {
            Some(_) if flight.version() == 0 => {
                return Err(StoreError::DuplicateFlightNumber(flight.flight_number().to_string()));
            }
            Some(stored) if stored.version() != flight.version() => {
                return Err(StoreError::VersionConflict {
                    flight_number: flight.flight_number().to_string(),
                    expected: flight.version(),
                });
            }
            // Deleted since it was loaded
            None if flight.version() != 0 => {
                return Err(StoreError::VersionConflict {
                    flight_number: flight.flight_number().to_string(),
                    expected: flight.version(),
                });
            }
            _ => {}
        }

        let mut saved = flight.clone();
        saved.record_save(Utc::now());
        flights.insert(saved.flight_number().to_string(), saved.clone());
        Ok(saved)
    }

    async fn delete_by_flight_number(&self, flight_number: &str) -> StoreResult<bool> {
        Ok(self.flights.write().await.remove(flight_number).is_some())
    }

    async fn find_by_route(&self, origin: &str, destination: &str) -> StoreResult<Vec<Flight>> {
        Ok(self
            .select(|f| f.origin() == origin && f.destination() == destination)
            .await)
    }

    async fn find_by_departure_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Flight>> {
        Ok(self
            .select(|f| f.scheduled_departure() >= start && f.scheduled_departure() <= end)
            .await)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.flights.read().await.len() as u64)
    }
}
