//! Attribute kinds and the per-entity attribute set.

use std::collections::HashMap;

use strum::{Display, EnumString};

/// The numeric attributes a combat entity carries.
///
/// `Energy`/`MaxEnergy` back skill resource costs; the rest feed damage
/// resolution and liveness checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttributeKind {
    Health,
    MaxHealth,
    Attack,
    Defense,
    Energy,
    MaxEnergy,
}

/// Mapping from attribute kind to current value.
///
/// Absent kinds read as zero. Values are plain integers; clamping rules
/// (health floor, max-health ceiling) live with the operations that apply
/// effects, not in the storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    values: HashMap<AttributeKind, i32>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, for spawn-data literals.
    #[must_use]
    pub fn with(mut self, kind: AttributeKind, value: i32) -> Self {
        self.values.insert(kind, value);
        self
    }

    pub fn get(&self, kind: AttributeKind) -> i32 {
        self.values.get(&kind).copied().unwrap_or(0)
    }

    pub fn set(&mut self, kind: AttributeKind, value: i32) {
        self.values.insert(kind, value);
    }

    /// Adds `delta` (possibly negative) to the attribute, saturating.
    pub fn apply(&mut self, kind: AttributeKind, delta: i32) -> i32 {
        let next = self.get(kind).saturating_add(delta);
        self.values.insert(kind, next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_kind_reads_zero() {
        let attrs = Attributes::new();
        assert_eq!(attrs.get(AttributeKind::Defense), 0);
    }

    #[test]
    fn apply_accumulates_and_saturates() {
        let mut attrs = Attributes::new().with(AttributeKind::Health, 10);
        assert_eq!(attrs.apply(AttributeKind::Health, -4), 6);
        assert_eq!(attrs.apply(AttributeKind::Health, i32::MAX), i32::MAX);
    }

    #[test]
    fn kind_round_trips_through_strings() {
        use std::str::FromStr;
        assert_eq!(AttributeKind::MaxHealth.to_string(), "max_health");
        assert_eq!(
            AttributeKind::from_str("max_energy").unwrap(),
            AttributeKind::MaxEnergy
        );
    }
}
