//! Field presence for nested object fields.
//!
//! The wire format distinguishes three states for a nested object: the field
//! is absent, the field is present as the literal empty object `{}`, or the
//! field carries a value. Collapsing the first two into one loses the
//! "explicitly cleared" signal the differ needs, so presence is a tagged
//! union rather than `Option<T>`.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Presence-aware wrapper for a nested object field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ObjectField<T> {
    /// Field absent from the payload (unspecified).
    #[default]
    Unset,
    /// Field present as the empty object `{}` (explicitly cleared).
    Empty,
    /// Field present with a value.
    Set(T),
}

impl<T> ObjectField<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for ObjectField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        match self {
            // Unset fields are skipped at the struct level via
            // `skip_serializing_if`; if one slips through, emit null.
            Self::Unset => serializer.serialize_none(),
            Self::Empty => serializer.serialize_map(Some(0))?.end(),
            Self::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: serde::de::DeserializeOwned> Deserialize<'de> for ObjectField<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::Null => Ok(Self::Unset),
            serde_json::Value::Object(ref map) if map.is_empty() => Ok(Self::Empty),
            other => serde_json::from_value(other)
                .map(Self::Set)
                .map_err(D::Error::custom),
        }
    }
}
