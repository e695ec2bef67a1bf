use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Cabin class of a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatClass {
    Economy,
    Business,
    #[serde(rename = "First Class")]
    FirstClass,
}

impl SeatClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::Economy => "Economy",
            SeatClass::Business => "Business",
            SeatClass::FirstClass => "First Class",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Economy" => Ok(SeatClass::Economy),
            "Business" => Ok(SeatClass::Business),
            "First Class" => Ok(SeatClass::FirstClass),
            _ => Err(DomainError::InvalidArgument(
                "Seat class must be Economy, Business, or First Class".to_string(),
            )),
        }
    }
}

/// A seat on a flight, e.g. `12A` in Economy.
///
/// Equality is structural: two assignments are the same seat only when both
/// the seat number and the cabin class match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    seat_number: String,
    seat_class: SeatClass,
}

impl SeatAssignment {
    pub fn new(seat_number: impl Into<String>, seat_class: SeatClass) -> Self {
        Self {
            seat_number: seat_number.into(),
            seat_class,
        }
    }

    pub fn seat_number(&self) -> &str {
        &self.seat_number
    }

    pub fn seat_class(&self) -> SeatClass {
        self.seat_class
    }

    pub fn is_economy(&self) -> bool {
        self.seat_class == SeatClass::Economy
    }

    pub fn is_business(&self) -> bool {
        self.seat_class == SeatClass::Business
    }

    pub fn is_first_class(&self) -> bool {
        self.seat_class == SeatClass::FirstClass
    }
}

/// Row 1-99 followed by a cabin letter A-F, no leading zero.
pub fn is_valid_seat_number(seat_number: &str) -> bool {
    let bytes = seat_number.as_bytes();
    let (row, letter) = match bytes.split_last() {
        Some((letter, row)) => (row, *letter),
        None => return false,
    };

    let row_ok = match row {
        [first] => (b'1'..=b'9').contains(first),
        [first, second] => (b'1'..=b'9').contains(first) && second.is_ascii_digit(),
        _ => false,
    };

    row_ok && (b'A'..=b'F').contains(&letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_equality_is_structural() {
        let a = SeatAssignment::new("12A", SeatClass::Economy);
        let b = SeatAssignment::new("12A", SeatClass::Economy);
        let c = SeatAssignment::new("12A", SeatClass::Business);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_class_helpers() {
        assert!(SeatAssignment::new("1A", SeatClass::Economy).is_economy());
        assert!(SeatAssignment::new("1A", SeatClass::Business).is_business());
        assert!(SeatAssignment::new("1A", SeatClass::FirstClass).is_first_class());
        assert!(!SeatAssignment::new("1A", SeatClass::FirstClass).is_economy());
    }

    #[test]
    fn test_seat_class_parsing() {
        assert_eq!("First Class".parse::<SeatClass>().unwrap(), SeatClass::FirstClass);
        assert_eq!("Economy".parse::<SeatClass>().unwrap(), SeatClass::Economy);
        assert!("economy".parse::<SeatClass>().is_err());
        assert!("Premium".parse::<SeatClass>().is_err());
    }

    #[test]
    fn test_seat_number_format() {
        for ok in ["1A", "5B", "12A", "99F", "10C"] {
            assert!(is_valid_seat_number(ok), "{} should be valid", ok);
        }
        for bad in ["", "A", "0A", "01A", "100A", "12G", "12a", "12", "1AA"] {
            assert!(!is_valid_seat_number(bad), "{} should be invalid", bad);
        }
    }

    #[test]
    fn test_wire_format() {
        let seat = SeatAssignment::new("18A", SeatClass::FirstClass);
        let value = serde_json::to_value(&seat).unwrap();
        assert_eq!(value["seatNumber"], "18A");
        assert_eq!(value["seatClass"], "First Class");
    }
}
