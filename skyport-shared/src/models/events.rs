use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notifications produced by flight mutations. Dispatched only after the
/// owning flight has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightEvent {
    #[serde(rename_all = "camelCase")]
    FlightCreated {
        flight_number: String,
        origin: String,
        destination: String,
        scheduled_departure: DateTime<Utc>,
        scheduled_arrival: DateTime<Utc>,
        occurred_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    PassengerAdded {
        flight_number: String,
        passenger_id: String,
        seat_number: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    PassengerRemoved {
        flight_number: String,
        passenger_id: String,
        occurred_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    FlightDeleted {
        flight_number: String,
        occurred_at: DateTime<Utc>,
    },
}

impl FlightEvent {
    pub fn flight_number(&self) -> &str {
        match self {
            FlightEvent::FlightCreated { flight_number, .. }
            | FlightEvent::PassengerAdded { flight_number, .. }
            | FlightEvent::PassengerRemoved { flight_number, .. }
            | FlightEvent::FlightDeleted { flight_number, .. } => flight_number,
        }
    }

    pub fn topic(&self) -> &'static str {
        match self {
            FlightEvent::FlightCreated { .. } => "flights.created",
            FlightEvent::PassengerAdded { .. } => "flights.passenger_added",
            FlightEvent::PassengerRemoved { .. } => "flights.passenger_removed",
            FlightEvent::FlightDeleted { .. } => "flights.deleted",
        }
    }
}
