use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyport_shared::models::events::FlightEvent;

use crate::{DomainError, DomainResult, Passenger, SeatAssignment};

/// Flight aggregate root.
///
/// # Invariants
///
/// - no two passengers hold equal seat assignments (unseated passengers never conflict)
/// - `scheduled_arrival` is strictly after `scheduled_departure`
/// - `flight_number` never changes after creation
///
/// Uniqueness of the flight number across flights is enforced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    flight_number: String,
    origin: String,
    destination: String,
    scheduled_departure: DateTime<Utc>,
    scheduled_arrival: DateTime<Utc>,
    #[serde(default)]
    passengers: Vec<Passenger>,
    /// Optimistic concurrency token. 0 until the first save.
    #[serde(default)]
    version: i64,
    created_at: Option<DateTime<Utc>>,
    last_modified_at: Option<DateTime<Utc>>,
}

impl Flight {
    pub fn builder() -> FlightBuilder {
        FlightBuilder::default()
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn scheduled_departure(&self) -> DateTime<Utc> {
        self.scheduled_departure
    }

    pub fn scheduled_arrival(&self) -> DateTime<Utc> {
        self.scheduled_arrival
    }

    /// Passengers in the order they were added.
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn passenger(&self, passenger_id: &str) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id() == passenger_id)
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified_at
    }

    /// Linear scan; rosters are bounded by aircraft capacity.
    pub fn is_seat_taken(&self, seat: &SeatAssignment) -> bool {
        self.passengers
            .iter()
            .any(|p| p.seat_assignment() == Some(seat))
    }

    /// Appends a passenger, rejecting a seat that is already held on this flight.
    /// The roster is left untouched on failure.
    pub fn add_passenger(&mut self, passenger: Passenger) -> DomainResult<FlightEvent> {
        if let Some(seat) = passenger.seat_assignment() {
            if self.is_seat_taken(seat) {
                return Err(DomainError::InvalidArgument(format!(
                    "Seat {} is already assigned",
                    seat.seat_number()
                )));
            }
        }

        let event = FlightEvent::PassengerAdded {
            flight_number: self.flight_number.clone(),
            passenger_id: passenger.id().to_string(),
            seat_number: passenger.seat_assignment().map(|s| s.seat_number().to_string()),
            occurred_at: Utc::now(),
        };
        self.passengers.push(passenger);
        Ok(event)
    }

    /// Removes the passenger with the given id. `None` means nobody matched,
    /// which is a normal outcome rather than an error.
    pub fn remove_passenger(&mut self, passenger_id: &str) -> DomainResult<Option<FlightEvent>> {
        if passenger_id.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "Passenger ID cannot be null or empty".to_string(),
            ));
        }

        let Some(index) = self.passengers.iter().position(|p| p.id() == passenger_id) else {
            return Ok(None);
        };
        self.passengers.remove(index);

        Ok(Some(FlightEvent::PassengerRemoved {
            flight_number: self.flight_number.clone(),
            passenger_id: passenger_id.to_string(),
            occurred_at: Utc::now(),
        }))
    }

    pub fn validate_flight_times(&self) -> DomainResult<()> {
        if self.scheduled_arrival <= self.scheduled_departure {
            return Err(DomainError::InvalidState(
                "Scheduled arrival must be after scheduled departure".to_string(),
            ));
        }
        Ok(())
    }

    pub fn created_event(&self) -> FlightEvent {
        FlightEvent::FlightCreated {
            flight_number: self.flight_number.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            scheduled_departure: self.scheduled_departure,
            scheduled_arrival: self.scheduled_arrival,
            occurred_at: Utc::now(),
        }
    }

    pub fn deleted_event(&self) -> FlightEvent {
        FlightEvent::FlightDeleted {
            flight_number: self.flight_number.clone(),
            occurred_at: Utc::now(),
        }
    }

    /// Audit bookkeeping for stores: stamps `created_at` on the first save,
    /// `last_modified_at` on every save, and bumps the version.
    pub fn record_save(&mut self, saved_at: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(saved_at);
        }
        self.last_modified_at = Some(saved_at);
        self.version += 1;
    }
}

/// Assembles a flight without schedule checks. New flights go through
/// [`crate::FlightFactory`]; this is for stores rebuilding persisted state.
#[derive(Debug, Default)]
pub struct FlightBuilder {
    flight_number: Option<String>,
    origin: Option<String>,
    destination: Option<String>,
    scheduled_departure: Option<DateTime<Utc>>,
    scheduled_arrival: Option<DateTime<Utc>>,
    passengers: Vec<Passenger>,
    version: i64,
    created_at: Option<DateTime<Utc>>,
    last_modified_at: Option<DateTime<Utc>>,
}

impl FlightBuilder {
    pub fn flight_number(mut self, flight_number: impl Into<String>) -> Self {
        self.flight_number = Some(flight_number.into());
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn scheduled_departure(mut self, departure: DateTime<Utc>) -> Self {
        self.scheduled_departure = Some(departure);
        self
    }

    pub fn scheduled_arrival(mut self, arrival: DateTime<Utc>) -> Self {
        self.scheduled_arrival = Some(arrival);
        self
    }

    pub fn passengers(mut self, passengers: Vec<Passenger>) -> Self {
        self.passengers = passengers;
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn created_at(mut self, created_at: Option<DateTime<Utc>>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn last_modified_at(mut self, last_modified_at: Option<DateTime<Utc>>) -> Self {
        self.last_modified_at = last_modified_at;
        self
    }

    pub fn build(self) -> DomainResult<Flight> {
        Ok(Flight {
            flight_number: required(self.flight_number, "Flight number is required")?,
            origin: required(self.origin, "Origin is required")?,
            destination: required(self.destination, "Destination is required")?,
            scheduled_departure: required(
                self.scheduled_departure,
                "Scheduled departure is required",
            )?,
            scheduled_arrival: required(
                self.scheduled_arrival,
                "Scheduled arrival is required",
            )?,
            passengers: self.passengers,
            version: self.version,
            created_at: self.created_at,
            last_modified_at: self.last_modified_at,
        })
    }
}

fn required<T>(value: Option<T>, message: &str) -> DomainResult<T> {
    value.ok_or_else(|| DomainError::InvalidArgument(message.to_string()))
}
