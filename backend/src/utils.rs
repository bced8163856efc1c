//! Small shared types and serde helpers used across handlers and services.

use std::fmt;

use crate::errors::ValidationError;

/// Longest place identifier the schema stores (`VARCHAR(255)` upstream).
pub const MAX_PLACE_ID_LEN: usize = 255;

/// A validated, provider-issued place identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyPlaceId);
        }
        if trimmed.len() > MAX_PLACE_ID_LEN {
            return Err(ValidationError::PlaceIdTooLong {
                max: MAX_PLACE_ID_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes a `bool` as the `0`/`1` integer clients already expect.
pub mod serde_flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Unsigned(u64::from(other)),
                &"0 or 1",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Flagged {
        #[serde(with = "serde_flag")]
        value: bool,
    }

    #[test]
    fn place_id_is_trimmed_and_bounded() {
        assert_eq!(PlaceId::parse("  ChIJ123 ").unwrap().as_str(), "ChIJ123");
        assert!(matches!(
            PlaceId::parse("   "),
            Err(ValidationError::EmptyPlaceId)
        ));
        assert!(matches!(
            PlaceId::parse(&"x".repeat(MAX_PLACE_ID_LEN + 1)),
            Err(ValidationError::PlaceIdTooLong { .. })
        ));
        assert!(PlaceId::parse(&"x".repeat(MAX_PLACE_ID_LEN)).is_ok());
    }

    #[test]
    fn flag_uses_integers_on_the_wire() {
        let json = serde_json::to_string(&Flagged { value: true }).unwrap();
        assert_eq!(json, r#"{"value":1}"#);

        let parsed: Flagged = serde_json::from_str(r#"{"value":0}"#).unwrap();
        assert!(!parsed.value);

        assert!(serde_json::from_str::<Flagged>(r#"{"value":2}"#).is_err());
    }
}
