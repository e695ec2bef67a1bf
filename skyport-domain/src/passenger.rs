use serde::{Deserialize, Serialize};
use skyport_shared::pii::Masked;
use uuid::Uuid;

use crate::{DomainError, DomainResult, SeatAssignment};

/// A traveller on exactly one flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    id: String,
    name: Masked<String>,
    seat_assignment: Option<SeatAssignment>,
}

impl Passenger {
    pub fn builder() -> PassengerBuilder {
        PassengerBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &Masked<String> {
        &self.name
    }

    pub fn seat_assignment(&self) -> Option<&SeatAssignment> {
        self.seat_assignment.as_ref()
    }

    pub fn has_seat_assignment(&self) -> bool {
        self.seat_assignment.is_some()
    }

    /// Replaces the seat. Conflicts with other passengers are the owning
    /// flight's concern, not checked here.
    pub fn update_seat_assignment(
        &mut self,
        seat_assignment: Option<SeatAssignment>,
    ) -> DomainResult<()> {
        let seat_assignment = seat_assignment.ok_or_else(|| {
            DomainError::InvalidArgument("Seat assignment cannot be null".to_string())
        })?;
        self.seat_assignment = Some(seat_assignment);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PassengerBuilder {
    id: Option<String>,
    name: String,
    seat_assignment: Option<SeatAssignment>,
}

impl PassengerBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn seat_assignment(mut self, seat_assignment: SeatAssignment) -> Self {
        self.seat_assignment = Some(seat_assignment);
        self
    }

    /// Generates a UUID v4 id unless one was supplied.
    pub fn build(self) -> Passenger {
        Passenger {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: Masked(self.name),
            seat_assignment: self.seat_assignment,
        }
    }
}
