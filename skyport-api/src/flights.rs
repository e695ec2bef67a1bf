use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use skyport_core::NewFlight;
use skyport_domain::seat::is_valid_seat_number;
use skyport_domain::{Flight, Passenger, SeatAssignment, SeatClass};

use crate::error::{ApiJson, ApiQuery, AppError};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Both schedule times may be omitted together to get the default schedule.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlightRequest {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PassengerRequest {
    pub name: String,
    pub seat_number: String,
    pub seat_class: String,
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct DepartureRangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Collects field errors so one response reports all of them.
#[derive(Default)]
struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.0.push((field, message.to_string()));
        }
    }

    fn sized(&mut self, value: &str, field: &'static str, label: &str, min: usize, max: usize) {
        if value.trim().is_empty() {
            self.0.push((field, format!("{} is required", label)));
            return;
        }
        let len = value.chars().count();
        self.check(
            (min..=max).contains(&len),
            field,
            &format!("{} must be between {} and {} characters", label, min, max),
        );
    }

    fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            return Ok(());
        }
        let details = self
            .0
            .iter()
            .map(|(field, message)| format!("{}={}", field, message))
            .collect::<Vec<_>>()
            .join(", ");
        Err(AppError::Validation(format!("Invalid input data: {{{}}}", details)))
    }
}

impl FlightRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        errors.sized(&self.flight_number, "flightNumber", "Flight number", 2, 10);
        errors.sized(&self.origin, "origin", "Origin", 3, 50);
        errors.sized(&self.destination, "destination", "Destination", 3, 50);
        errors.check(
            self.scheduled_departure.is_some() || self.scheduled_arrival.is_none(),
            "scheduledDeparture",
            "Scheduled departure is required",
        );
        errors.check(
            self.scheduled_arrival.is_some() || self.scheduled_departure.is_none(),
            "scheduledArrival",
            "Scheduled arrival is required",
        );
        errors.into_result()
    }

    fn into_new_flight(self) -> NewFlight {
        NewFlight {
            flight_number: self.flight_number,
            origin: self.origin,
            destination: self.destination,
            scheduled_departure: self.scheduled_departure,
            scheduled_arrival: self.scheduled_arrival,
        }
    }
}

impl PassengerRequest {
    fn into_passenger(self) -> Result<Passenger, AppError> {
        let mut errors = FieldErrors::default();
        errors.sized(&self.name, "name", "Passenger name", 2, 100);

        if self.seat_number.trim().is_empty() {
            errors.check(false, "seatNumber", "Seat number is required");
        } else {
            errors.check(
                is_valid_seat_number(&self.seat_number),
                "seatNumber",
                "Seat number must be in format like '12A' or '5B'",
            );
        }

        let seat_class = if self.seat_class.trim().is_empty() {
            errors.check(false, "seatClass", "Seat class is required");
            None
        } else {
            match self.seat_class.parse::<SeatClass>() {
                Ok(class) => Some(class),
                Err(e) => {
                    errors.check(false, "seatClass", &e.to_string());
                    None
                }
            }
        };

        errors.into_result()?;
        let seat_class = seat_class
            .ok_or_else(|| AppError::Validation("Seat class is required".to_string()))?;

        Ok(Passenger::builder()
            .name(self.name)
            .seat_assignment(SeatAssignment::new(self.seat_number, seat_class))
            .build())
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights", post(create_flight).get(list_flights))
        .route("/api/flights/route", get(flights_by_route))
        .route("/api/flights/departures", get(flights_by_departure_range))
        .route("/api/flights/{flight_number}", get(get_flight).delete(delete_flight))
        .route("/api/flights/{flight_number}/passengers", post(add_passenger))
        .route(
            "/api/flights/{flight_number}/passengers/{passenger_id}",
            delete(remove_passenger),
        )
}

/// POST /api/flights
pub async fn create_flight(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FlightRequest>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    req.validate()?;
    let flight = state.flights.create_flight(req.into_new_flight()).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

/// GET /api/flights
pub async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(state.flights.list_flights().await?))
}

/// GET /api/flights/:flight_number
pub async fn get_flight(
    State(state): State<AppState>,
    Path(flight_number): Path<String>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(state.flights.get_flight_with_passengers(&flight_number).await?))
}

/// POST /api/flights/:flight_number/passengers
pub async fn add_passenger(
    State(state): State<AppState>,
    Path(flight_number): Path<String>,
    ApiJson(req): ApiJson<PassengerRequest>,
) -> Result<&'static str, AppError> {
    let passenger = req.into_passenger()?;
    state.flights.add_passenger_to_flight(&flight_number, passenger).await?;
    Ok("Passenger added successfully")
}

/// DELETE /api/flights/:flight_number/passengers/:passenger_id
pub async fn remove_passenger(
    State(state): State<AppState>,
    Path((flight_number, passenger_id)): Path<(String, String)>,
) -> Result<&'static str, AppError> {
    if state.flights.remove_passenger_from_flight(&flight_number, &passenger_id).await? {
        Ok("Passenger removed successfully")
    } else {
        Err(AppError::NotFound(format!(
            "Passenger {} not found on flight {}",
            passenger_id, flight_number
        )))
    }
}

/// GET /api/flights/route?origin=&destination=
pub async fn flights_by_route(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RouteQuery>,
) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(
        state.flights.find_flights_by_route(&query.origin, &query.destination).await?,
    ))
}

/// GET /api/flights/departures?start=&end=
pub async fn flights_by_departure_range(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DepartureRangeQuery>,
) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(
        state.flights.find_flights_by_departure_range(query.start, query.end).await?,
    ))
}

/// DELETE /api/flights/:flight_number
pub async fn delete_flight(
    State(state): State<AppState>,
    Path(flight_number): Path<String>,
) -> Result<&'static str, AppError> {
    if state.flights.delete_flight(&flight_number).await? {
        Ok("Flight deleted successfully")
    } else {
        Err(AppError::NotFound(format!("Flight not found: {}", flight_number)))
    }
}
