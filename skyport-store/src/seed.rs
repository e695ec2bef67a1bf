use chrono::Duration;
use skyport_core::{CoreResult, FlightStore};
use skyport_domain::{FlightFactory, Passenger, SeatAssignment, SeatClass};
use tracing::info;

struct SampleFlight {
    flight_number: &'static str,
    origin: &'static str,
    destination: &'static str,
    departs_in_hours: i64,
    passengers: [(&'static str, &'static str); 2],
    seat_class: SeatClass,
}

const SAMPLE_FLIGHTS: [SampleFlight; 3] = [
    SampleFlight {
        flight_number: "UA101",
        origin: "JFK",
        destination: "LAX",
        departs_in_hours: 2,
        passengers: [("John Doe", "12A"), ("Jane Smith", "12B")],
        seat_class: SeatClass::Economy,
    },
    SampleFlight {
        flight_number: "UA202",
        origin: "LAX",
        destination: "JFK",
        departs_in_hours: 4,
        passengers: [("Alice Johnson", "15A"), ("Bob Brown", "15B")],
        seat_class: SeatClass::Business,
    },
    SampleFlight {
        flight_number: "AA303",
        origin: "ORD",
        destination: "MIA",
        departs_in_hours: 6,
        passengers: [("Charlie Davis", "18A"), ("Diana White", "18B")],
        seat_class: SeatClass::FirstClass,
    },
];

/// Loads the demo flights into an empty store. Returns how many were created;
/// a store that already holds flights is left alone.
pub async fn seed_sample_flights(store: &dyn FlightStore) -> CoreResult<usize> {
    if store.count().await? > 0 {
        return Ok(0);
    }

    info!("Initializing sample data...");
    let factory = FlightFactory::new();
    let now = factory.now();

    for sample in &SAMPLE_FLIGHTS {
        let departure = now + Duration::hours(sample.departs_in_hours);
        let mut flight = factory.create_flight(
            sample.flight_number,
            sample.origin,
            sample.destination,
            departure,
            departure + Duration::hours(4),
        )?;

        for (name, seat) in sample.passengers {
            flight.add_passenger(
                Passenger::builder()
                    .name(name)
                    .seat_assignment(SeatAssignment::new(seat, sample.seat_class))
                    .build(),
            )?;
        }

        store.save(&flight).await?;
    }

    let total = store.count().await?;
    info!("Created {} sample flights", total);
    Ok(SAMPLE_FLIGHTS.len())
}
