use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const MASK: &str = "********";

/// Wraps a passenger-identifying value so that it never shows up in log output.
///
/// `Debug` and `Display` always render a fixed mask. `Serialize` writes the real
/// value because API payloads and stored documents need it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Masked(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_value_in_logs() {
        let name = Masked::from("John Doe");
        assert_eq!(format!("{}", name), MASK);
        assert_eq!(format!("{:?}", name), MASK);
        assert_eq!(name.expose(), "John Doe");
    }

    #[test]
    fn test_masked_serializes_real_value() {
        let name = Masked::from("Jane Smith");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Jane Smith\"");

        let back: Masked<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_inner(), "Jane Smith");
    }
}
