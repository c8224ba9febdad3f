use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashError;

/// Named parameter a viewer control can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKey {
    Entities,
    Year,
    YearRange,
    ValueRange,
    ChartKind,
    Category,
}

impl ParameterKey {
    pub const ALL: [Self; 6] = [
        Self::Entities,
        Self::Year,
        Self::YearRange,
        Self::ValueRange,
        Self::ChartKind,
        Self::Category,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::Entities => 1 << 0,
            Self::Year => 1 << 1,
            Self::YearRange => 1 << 2,
            Self::ValueRange => 1 << 3,
            Self::ChartKind => 1 << 4,
            Self::Category => 1 << 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::Year => "year",
            Self::YearRange => "year_range",
            Self::ValueRange => "value_range",
            Self::ChartKind => "chart_kind",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKey {
    type Err = DashError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == input.trim())
            .ok_or_else(|| DashError::InvalidParameter {
                key: input.to_owned(),
                reason: "unknown parameter key".to_owned(),
            })
    }
}

/// Bitmask of parameter keys an output depends on.
///
/// Serialized as the list of key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ParameterKey>", into = "Vec<ParameterKey>")]
pub struct ParameterKeys {
    bits: u8,
}

impl ParameterKeys {
    const ALL_BITS: u8 = ParameterKey::Entities.bit()
        | ParameterKey::Year.bit()
        | ParameterKey::YearRange.bit()
        | ParameterKey::ValueRange.bit()
        | ParameterKey::ChartKind.bit()
        | ParameterKey::Category.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_key(key: ParameterKey) -> Self {
        Self { bits: key.bit() }
    }

    #[must_use]
    pub const fn with_key(self, key: ParameterKey) -> Self {
        Self {
            bits: self.bits | key.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    #[must_use]
    pub const fn contains_key(self, key: ParameterKey) -> bool {
        self.intersects(Self::from_key(key))
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ParameterKey> {
        ParameterKey::ALL
            .into_iter()
            .filter(move |key| self.contains_key(*key))
    }
}

impl FromIterator<ParameterKey> for ParameterKeys {
    fn from_iter<I: IntoIterator<Item = ParameterKey>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with_key)
    }
}

impl From<Vec<ParameterKey>> for ParameterKeys {
    fn from(keys: Vec<ParameterKey>) -> Self {
        keys.into_iter().collect()
    }
}

impl From<ParameterKeys> for Vec<ParameterKey> {
    fn from(keys: ParameterKeys) -> Self {
        keys.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ParameterKey, ParameterKeys};

    #[test]
    fn keys_union_and_contains() {
        let keys = ParameterKeys::from_key(ParameterKey::Year).with_key(ParameterKey::Entities);
        assert!(keys.contains_key(ParameterKey::Year));
        assert!(keys.contains_key(ParameterKey::Entities));
        assert!(!keys.contains_key(ParameterKey::Category));

        let merged = keys.union(ParameterKeys::from_key(ParameterKey::Category));
        assert!(merged.contains_key(ParameterKey::Category));
        assert!(ParameterKeys::none().is_none());
        assert!(ParameterKeys::all().contains_key(ParameterKey::ChartKind));
    }

    #[test]
    fn serializes_as_key_names_in_canonical_order() {
        let keys: ParameterKeys = [ParameterKey::Category, ParameterKey::Year]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&keys).expect("serialize");
        assert_eq!(json, r#"["year","category"]"#);
        let back: ParameterKeys = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, keys);
    }

    #[test]
    fn parses_key_names() {
        assert_eq!("year_range".parse::<ParameterKey>().ok(), Some(ParameterKey::YearRange));
        assert!("colour".parse::<ParameterKey>().is_err());
    }
}
