//! Skill definitions and resolution arithmetic.

use std::fmt;

/// Skill identifier, resolved against a [`SkillCatalog`] at invocation time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// What a skill does once resolution succeeds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SkillEffect {
    /// Fixed damage mitigated by the target's defense.
    Damage { amount: i32 },
    /// Weapon strike: caster attack plus `bonus`, mitigated by defense.
    Strike { bonus: i32 },
    /// Restores target health, clamped to max health. Self-targeted when no
    /// explicit target is given.
    Heal { amount: i32 },
}

/// Static skill definition from the read-only catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    /// Energy deducted from the caster on resolution.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: i32,
    /// Seconds before the caster may use this skill again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: f32,
    pub effect: SkillEffect,
}

/// Read-only source of skill definitions.
///
/// Implemented outside the core (content files, test fixtures); combat code
/// only ever looks definitions up by id.
pub trait SkillCatalog: Send + Sync {
    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition>;
}

/// Damage dealt by a fixed-amount skill against `defense`. Floors at zero.
pub fn spell_damage(amount: i32, defense: i32) -> i32 {
    amount.saturating_sub(defense.max(0)).max(0)
}

/// Damage dealt by a weapon strike: attack stat plus the skill's bonus,
/// mitigated by defense. Floors at zero.
pub fn strike_damage(attack: i32, bonus: i32, defense: i32) -> i32 {
    attack
        .saturating_add(bonus)
        .saturating_sub(defense.max(0))
        .max(0)
}
