pub mod repository;
pub mod memory;
pub mod events;
pub mod service;

pub use repository::{EventPublisher, FlightStore, StoreError, StoreResult};
pub use memory::InMemoryFlightStore;
pub use events::LoggingEventPublisher;
pub use service::{FlightService, NewFlight, ServiceRules};

use skyport_domain::DomainError;

/// Coarse classification the HTTP layer maps to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
    Store,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("Flight not found: {0}")]
    FlightNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// A missing flight is reported to callers as bad input.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidArgument(_) | CoreError::FlightNotFound(_) => {
                ErrorKind::InvalidArgument
            }
            CoreError::InvalidState(_) => ErrorKind::InvalidState,
            CoreError::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidArgument(msg) => CoreError::InvalidArgument(msg),
            DomainError::InvalidState(msg) => CoreError::InvalidState(msg),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
