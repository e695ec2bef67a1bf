use chrono::{DateTime, Utc};
use skyport_domain::{Flight, FlightFactory, Passenger};
use skyport_shared::models::events::FlightEvent;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::repository::{EventPublisher, FlightStore, StoreError};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone)]
pub struct ServiceRules {
    /// Load-mutate-save cycles attempted before a version conflict is surfaced.
    pub max_save_attempts: u32,
}

impl Default for ServiceRules {
    fn default() -> Self {
        Self { max_save_attempts: 3 }
    }
}

/// Raw input for a new flight. Omitting both times selects the default
/// schedule (departure in two hours, arrival two hours later).
#[derive(Debug, Clone)]
pub struct NewFlight {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
}

/// Use cases over flight aggregates.
///
/// Every mutation is a load-mutate-save cycle. Saves are guarded by the
/// flight's version, and a conflicting concurrent write restarts the cycle
/// on fresh state instead of overwriting it. Events produced by the
/// aggregate are published only after the save succeeded.
pub struct FlightService {
    store: Arc<dyn FlightStore>,
    publisher: Arc<dyn EventPublisher>,
    factory: FlightFactory,
    rules: ServiceRules,
}

impl FlightService {
    pub fn new(store: Arc<dyn FlightStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            publisher,
            factory: FlightFactory::new(),
            rules: ServiceRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: ServiceRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_factory(mut self, factory: FlightFactory) -> Self {
        self.factory = factory;
        self
    }

    pub async fn create_flight(&self, new_flight: NewFlight) -> CoreResult<Flight> {
        require(&new_flight.flight_number, "Flight number is required")?;
        require(&new_flight.origin, "Origin is required")?;
        require(&new_flight.destination, "Destination is required")?;

        let flight = match (new_flight.scheduled_departure, new_flight.scheduled_arrival) {
            (Some(departure), Some(arrival)) => self.factory.create_flight(
                new_flight.flight_number,
                new_flight.origin,
                new_flight.destination,
                departure,
                arrival,
            )?,
            (None, None) => self.factory.create_flight_default_schedule(
                new_flight.flight_number,
                new_flight.origin,
                new_flight.destination,
            )?,
            (None, Some(_)) => {
                return Err(CoreError::InvalidArgument(
                    "Scheduled departure is required".to_string(),
                ));
            }
            (Some(_), None) => {
                return Err(CoreError::InvalidArgument(
                    "Scheduled arrival is required".to_string(),
                ));
            }
        };

        let saved = self.store.save(&flight).await?;
        info!(
            "Created flight {} ({} -> {})",
            saved.flight_number(),
            saved.origin(),
            saved.destination()
        );
        self.dispatch(&saved.created_event()).await;
        Ok(saved)
    }

    pub async fn list_flights(&self) -> CoreResult<Vec<Flight>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn add_passenger_to_flight(
        &self,
        flight_number: &str,
        passenger: Passenger,
    ) -> CoreResult<Flight> {
        require(flight_number, "Flight number is required")?;
        debug!("Adding passenger {} to flight {}", passenger.name(), flight_number);

        let saved = self
            .update_flight(flight_number, |flight| {
                let event = flight.add_passenger(passenger.clone()).map_err(|e| {
                    warn!(
                        "Rejected passenger {} on flight {}: {}",
                        passenger.id(),
                        flight_number,
                        e
                    );
                    e
                })?;
                Ok(Some(event))
            })
            .await?
            .ok_or_else(|| {
                CoreError::InvalidState(format!("Flight {} was not updated", flight_number))
            })?;

        info!("Successfully added passenger {} to flight {}", passenger.name(), flight_number);
        Ok(saved)
    }

    /// `false` when the passenger is not on the flight; nothing is written then.
    pub async fn remove_passenger_from_flight(
        &self,
        flight_number: &str,
        passenger_id: &str,
    ) -> CoreResult<bool> {
        require(flight_number, "Flight number is required")?;
        require(passenger_id, "Passenger ID is required")?;
        debug!("Removing passenger {} from flight {}", passenger_id, flight_number);

        let updated = self
            .update_flight(flight_number, |flight| Ok(flight.remove_passenger(passenger_id)?))
            .await?;

        match updated {
            Some(_) => {
                info!(
                    "Successfully removed passenger {} from flight {}",
                    passenger_id, flight_number
                );
                Ok(true)
            }
            None => {
                warn!("Passenger {} not found on flight {}", passenger_id, flight_number);
                Ok(false)
            }
        }
    }

    pub async fn get_flight_with_passengers(&self, flight_number: &str) -> CoreResult<Flight> {
        require(flight_number, "Flight number is required")?;
        self.load(flight_number).await
    }

    pub async fn find_flights_by_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> CoreResult<Vec<Flight>> {
        require(origin, "Origin is required")?;
        require(destination, "Destination is required")?;
        debug!("Finding flights from {} to {}", origin, destination);

        Ok(self.store.find_by_route(origin, destination).await?)
    }

    pub async fn find_flights_by_departure_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<Flight>> {
        if start > end {
            return Err(CoreError::InvalidArgument(
                "Start time must be before or equal to end time".to_string(),
            ));
        }
        debug!("Finding flights departing between {} and {}", start, end);

        Ok(self.store.find_by_departure_range(start, end).await?)
    }

    pub async fn flight_exists(&self, flight_number: &str) -> CoreResult<bool> {
        require(flight_number, "Flight number is required")?;
        Ok(self.store.find_by_flight_number(flight_number).await?.is_some())
    }

    /// Deletes the flight and its passengers. `false` if it did not exist.
    pub async fn delete_flight(&self, flight_number: &str) -> CoreResult<bool> {
        require(flight_number, "Flight number is required")?;

        let Some(flight) = self.store.find_by_flight_number(flight_number).await? else {
            return Ok(false);
        };
        if !self.store.delete_by_flight_number(flight_number).await? {
            return Ok(false);
        }

        info!("Deleted flight {}", flight_number);
        self.dispatch(&flight.deleted_event()).await;
        Ok(true)
    }

    async fn load(&self, flight_number: &str) -> CoreResult<Flight> {
        self.store
            .find_by_flight_number(flight_number)
            .await?
            .ok_or_else(|| CoreError::FlightNotFound(flight_number.to_string()))
    }

    /// Runs `apply` against freshly loaded state and saves the result.
    /// `apply` returning `None` means nothing changed and the save is skipped.
    async fn update_flight<F>(
        &self,
        flight_number: &str,
        mut apply: F,
    ) -> CoreResult<Option<Flight>>
    where
        F: FnMut(&mut Flight) -> CoreResult<Option<FlightEvent>> + Send,
    {
        let max_attempts = self.rules.max_save_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let mut flight = self.load(flight_number).await?;

            let Some(event) = apply(&mut flight)? else {
                return Ok(None);
            };
            flight.validate_flight_times()?;

            match self.store.save(&flight).await {
                Ok(saved) => {
                    self.dispatch(&event).await;
                    return Ok(Some(saved));
                }
                Err(StoreError::VersionConflict { .. }) if attempt < max_attempts => {
                    warn!(
                        "Concurrent update on flight {} (attempt {}/{}), retrying",
                        flight_number, attempt, max_attempts
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn dispatch(&self, event: &FlightEvent) {
        if let Err(e) = self.publisher.publish(event).await {
            error!(
                "Failed to publish {} for flight {}: {}",
                event.topic(),
                event.flight_number(),
                e
            );
        }
    }
}

fn require(value: &str, message: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidArgument(message.to_string()));
    }
    Ok(())
}
