use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use skyport_api::{app, AppState};
use skyport_core::{FlightService, InMemoryFlightStore, LoggingEventPublisher};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let service = FlightService::new(
        Arc::new(InMemoryFlightStore::new()),
        Arc::new(LoggingEventPublisher),
    );
    app(AppState::new(service))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

fn as_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn rfc3339(hours_from_now: i64) -> String {
    (Utc::now() + Duration::hours(hours_from_now)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

async fn create_ua101(app: &Router) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/flights",
        Some(json!({
            "flightNumber": "UA101",
            "origin": "JFK",
            "destination": "LAX",
            "scheduledDeparture": rfc3339(2),
            "scheduledArrival": rfc3339(6),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    as_json(&body)
}

fn passenger(name: &str, seat: &str) -> Value {
    json!({ "name": name, "seatNumber": seat, "seatClass": "Economy" })
}

#[tokio::test]
async fn test_create_and_fetch_flight() {
    let app = test_app();
    let created = create_ua101(&app).await;
    assert_eq!(created["flightNumber"], "UA101");
    assert_eq!(created["passengers"], json!([]));
    assert!(created["createdAt"].is_string());
    assert!(created["lastModifiedAt"].is_string());

    let (status, body) = send(&app, "GET", "/api/flights/UA101", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["origin"], "JFK");

    let (status, body) = send(&app, "GET", "/api/flights", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body).as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_seat_conflict_scenario() {
    let app = test_app();
    create_ua101(&app).await;

    let uri = "/api/flights/UA101/passengers";
    let (status, body) = send(&app, "POST", uri, Some(passenger("John Doe", "12A"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_text(&body), "Passenger added successfully");

    let (status, body) = send(&app, "POST", uri, Some(passenger("Jane Smith", "12A"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = as_json(&body);
    assert_eq!(error["error"], "Business Rule Violation");
    assert_eq!(error["message"], "Seat 12A is already assigned");
    assert_eq!(error["status"], 400);

    let (status, _) = send(&app, "POST", uri, Some(passenger("Jane Smith", "12B"))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/flights/UA101", None).await;
    let flight = as_json(&body);
    let passengers = flight["passengers"].as_array().unwrap();
    assert_eq!(passengers.len(), 2);
    assert_eq!(passengers[0]["name"], "John Doe");
    assert_eq!(passengers[1]["seatAssignment"]["seatNumber"], "12B");
}

#[tokio::test]
async fn test_remove_passenger() {
    let app = test_app();
    create_ua101(&app).await;
    send(&app, "POST", "/api/flights/UA101/passengers", Some(passenger("John Doe", "12A"))).await;

    let (_, body) = send(&app, "GET", "/api/flights/UA101", None).await;
    let id = as_json(&body)["passengers"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/flights/UA101/passengers/{}", id);
    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_text(&body), "Passenger removed successfully");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/api/flights/UA999/passengers/any", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(as_json(&body)["message"], "Flight not found: UA999");
}

#[tokio::test]
async fn test_input_validation() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/flights",
        Some(json!({ "flightNumber": "UA101", "origin": "JF", "destination": "LAX" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = as_json(&body);
    assert_eq!(error["error"], "Validation Error");
    assert!(error["message"]
        .as_str()
        .unwrap()
        .contains("origin=Origin must be between 3 and 50 characters"));

    create_ua101(&app).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/flights/UA101/passengers",
        Some(json!({ "name": "John Doe", "seatNumber": "12Z", "seatClass": "Economy" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(as_json(&body)["error"], "Validation Error");
}

#[tokio::test]
async fn test_malformed_input_uses_error_body() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/flights",
        Some(json!({
            "flightNumber": "UA101",
            "origin": "JFK",
            "destination": "LAX",
            "scheduledDeparture": "tomorrow morning",
            "scheduledArrival": rfc3339(6),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = as_json(&body);
    assert_eq!(error["status"], 400);
    assert_eq!(error["error"], "Validation Error");
    assert!(error["message"].as_str().unwrap().contains("scheduledDeparture"));
    assert!(error["timestamp"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/flights",
        Some(json!({ "flightNumber": null, "origin": "JFK", "destination": "LAX" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(as_json(&body)["error"], "Validation Error");

    create_ua101(&app).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/flights/UA101/passengers",
        Some(json!("John Doe in 12A")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(as_json(&body)["error"], "Validation Error");

    let uri = format!("/api/flights/departures?start=yesterday&end={}", rfc3339(1));
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = as_json(&body);
    assert_eq!(error["error"], "Validation Error");
    assert!(error["message"].as_str().unwrap().contains("start"));

    let (status, body) = send(&app, "GET", "/api/flights/route?origin=JFK", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(as_json(&body)["error"], "Validation Error");
}

#[tokio::test]
async fn test_schedule_rules() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/flights",
        Some(json!({
            "flightNumber": "UA101",
            "origin": "JFK",
            "destination": "LAX",
            "scheduledDeparture": rfc3339(6),
            "scheduledArrival": rfc3339(2),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(as_json(&body)["message"], "Departure time cannot be after arrival time");

    let (status, body) = send(
        &app,
        "POST",
        "/api/flights",
        Some(json!({
            "flightNumber": "UA101",
            "origin": "JFK",
            "destination": "LAX",
            "scheduledDeparture": rfc3339(-1),
            "scheduledArrival": rfc3339(3),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(as_json(&body)["message"], "Cannot schedule flight in the past");
}

#[tokio::test]
async fn test_duplicate_flight_number_conflicts() {
    let app = test_app();
    create_ua101(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/flights",
        Some(json!({ "flightNumber": "UA101", "origin": "ORD", "destination": "MIA" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(as_json(&body)["message"], "Flight number already exists: UA101");
}

#[tokio::test]
async fn test_queries() {
    let app = test_app();
    create_ua101(&app).await;
    send(
        &app,
        "POST",
        "/api/flights",
        Some(json!({ "flightNumber": "UA202", "origin": "LAX", "destination": "JFK" })),
    )
    .await;

    let uri = "/api/flights/route?origin=JFK&destination=LAX";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let flights = as_json(&body);
    assert_eq!(flights.as_array().unwrap().len(), 1);
    assert_eq!(flights[0]["flightNumber"], "UA101");

    let uri = format!("/api/flights/departures?start={}&end={}", rfc3339(0), rfc3339(10));
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body).as_array().unwrap().len(), 2);

    let uri = format!("/api/flights/departures?start={}&end={}", rfc3339(10), rfc3339(1));
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(as_json(&body)["message"], "Start time must be before or equal to end time");
}

#[tokio::test]
async fn test_delete_flight() {
    let app = test_app();
    create_ua101(&app).await;

    let (status, body) = send(&app, "DELETE", "/api/flights/UA101", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_text(&body), "Flight deleted successfully");

    let (status, _) = send(&app, "GET", "/api/flights/UA101", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/flights/UA101", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
