use chrono::{DateTime, Duration, Utc};

use crate::{DomainError, DomainResult, Flight};

/// Builds validated, passenger-less flights from raw scheduling input.
#[derive(Debug, Clone, Copy)]
pub struct FlightFactory {
    clock: fn() -> DateTime<Utc>,
}

impl FlightFactory {
    pub fn new() -> Self {
        Self { clock: Utc::now }
    }

    /// Use a custom time source for the "no past departures" rule.
    pub fn with_clock(clock: fn() -> DateTime<Utc>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Rejects arrivals not strictly after departure and departures before now.
    /// Audit timestamps stay empty for the store to fill in.
    pub fn create_flight(
        &self,
        flight_number: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        scheduled_departure: DateTime<Utc>,
        scheduled_arrival: DateTime<Utc>,
    ) -> DomainResult<Flight> {
        if scheduled_departure >= scheduled_arrival {
            return Err(DomainError::InvalidArgument(
                "Departure time cannot be after arrival time".to_string(),
            ));
        }

        if scheduled_departure < self.now() {
            return Err(DomainError::InvalidArgument(
                "Cannot schedule flight in the past".to_string(),
            ));
        }

        Flight::builder()
            .flight_number(flight_number)
            .origin(origin)
            .destination(destination)
            .scheduled_departure(scheduled_departure)
            .scheduled_arrival(scheduled_arrival)
            .build()
    }

    /// Departs two hours from now and lands two hours later.
    pub fn create_flight_default_schedule(
        &self,
        flight_number: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> DomainResult<Flight> {
        let now = self.now();
        self.create_flight(
            flight_number,
            origin,
            destination,
            now + Duration::hours(2),
            now + Duration::hours(4),
        )
    }
}

impl Default for FlightFactory {
    fn default() -> Self {
        Self::new()
    }
}
