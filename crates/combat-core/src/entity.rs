//! Combat entity records and the spawn data they are created from.

use std::fmt;

use crate::attributes::{AttributeKind, Attributes};

/// Unique entity identifier, supplied by the host with the spawn data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Which side of the engagement an entity fights on.
///
/// Assigned when the participant set is fixed, not at spawn. `Player`-side
/// entities are the controllable ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

/// World-space vector, carried through from the host's transform data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Opaque entity description consumed once at registration.
///
/// `name` doubles as the entity id; `kind` is the free-form type tag used
/// for behavior template selection (e.g. `"ranged_goblin"`).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnData {
    pub name: String,
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Vec3,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: Vec3,
    pub attributes: Attributes,
}

impl SpawnData {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            position: Vec3::default(),
            rotation: Vec3::default(),
            attributes,
        }
    }

    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

/// A live combat participant record, owned by the registry.
#[derive(Clone, Debug)]
pub struct CombatEntity {
    pub id: EntityId,
    /// Free-form type tag from the spawn data.
    pub kind: String,
    /// None until the participant set assigns one.
    pub side: Option<Side>,
    pub position: Vec3,
    pub rotation: Vec3,
    pub attributes: Attributes,
    pub alive: bool,
}

impl CombatEntity {
    pub fn from_spawn(data: SpawnData) -> Self {
        Self {
            id: EntityId::new(data.name),
            kind: data.kind,
            side: None,
            position: data.position,
            rotation: data.rotation,
            attributes: data.attributes,
            alive: true,
        }
    }

    #[inline]
    pub fn health(&self) -> i32 {
        self.attributes.get(AttributeKind::Health)
    }

    #[inline]
    pub fn is_player_controlled(&self) -> bool {
        self.side == Some(Side::Player)
    }

    /// Applies `amount` of already-mitigated damage. Health floors at zero.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let applied = amount.min(self.health()).max(0);
        self.attributes.apply(AttributeKind::Health, -applied);
        applied
    }

    /// Restores health, clamped to `MaxHealth`. Returns the amount applied.
    pub fn restore_health(&mut self, amount: i32) -> i32 {
        let max = self.attributes.get(AttributeKind::MaxHealth);
        let applied = amount.max(0).min(max.saturating_sub(self.health()));
        self.attributes.apply(AttributeKind::Health, applied);
        applied
    }

    /// Deducts `cost` energy if available. False leaves the pool untouched.
    pub fn spend_energy(&mut self, cost: i32) -> bool {
        if self.attributes.get(AttributeKind::Energy) < cost {
            return false;
        }
        self.attributes.apply(AttributeKind::Energy, -cost);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> CombatEntity {
        CombatEntity::from_spawn(SpawnData::new(
            "gob",
            "melee_goblin",
            Attributes::new()
                .with(AttributeKind::Health, 30)
                .with(AttributeKind::MaxHealth, 40)
                .with(AttributeKind::Energy, 10),
        ))
    }

    #[test]
    fn damage_floors_at_zero_health() {
        let mut e = goblin();
        assert_eq!(e.take_damage(50), 30);
        assert_eq!(e.health(), 0);
        assert_eq!(e.take_damage(5), 0);
    }

    #[test]
    fn heal_clamps_to_max_health() {
        let mut e = goblin();
        assert_eq!(e.restore_health(100), 10);
        assert_eq!(e.health(), 40);
    }

    #[test]
    fn energy_is_all_or_nothing() {
        let mut e = goblin();
        assert!(!e.spend_energy(11));
        assert_eq!(e.attributes.get(AttributeKind::Energy), 10);
        assert!(e.spend_energy(10));
        assert_eq!(e.attributes.get(AttributeKind::Energy), 0);
    }
}
