pub mod seat;
pub mod passenger;
pub mod flight;
pub mod factory;

pub use seat::{SeatAssignment, SeatClass};
pub use passenger::{Passenger, PassengerBuilder};
pub use flight::{Flight, FlightBuilder};
pub use factory::FlightFactory;

/// Failures raised by the flight aggregate and its factory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Malformed or conflicting input: blank fields, taken seats, bad schedules.
    #[error("{0}")]
    InvalidArgument(String),
    /// A consistency check on an already constructed aggregate failed.
    #[error("{0}")]
    InvalidState(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
