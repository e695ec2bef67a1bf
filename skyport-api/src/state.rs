use skyport_core::FlightService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<FlightService>,
}

impl AppState {
    pub fn new(flights: FlightService) -> Self {
        Self {
            flights: Arc::new(flights),
        }
    }
}
