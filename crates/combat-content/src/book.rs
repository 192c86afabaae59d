//! In-memory skill catalog.

use std::collections::HashMap;

use combat_core::{SkillCatalog, SkillDefinition, SkillEffect, SkillId};

/// Id-keyed skill catalog.
///
/// Insertion is last-write-wins so a loaded file can override builtin
/// entries by reusing an id.
#[derive(Debug, Default)]
pub struct SkillBook {
    skills: HashMap<SkillId, SkillDefinition>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill: SkillDefinition) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// The default catalog: the skills the builtin behavior templates cast,
    /// plus the player-facing basics.
    pub fn builtin() -> Self {
        let mut book = Self::new();
        for skill in [
            SkillDefinition {
                id: SkillId::from("fireball"),
                name: "Fireball".into(),
                cost: 10,
                cooldown: 1.5,
                effect: SkillEffect::Damage { amount: 30 },
            },
            SkillDefinition {
                id: SkillId::from("claw"),
                name: "Claw".into(),
                cost: 5,
                cooldown: 1.0,
                effect: SkillEffect::Strike { bonus: 4 },
            },
            SkillDefinition {
                id: SkillId::from("piercing_bolt"),
                name: "Piercing Bolt".into(),
                cost: 8,
                cooldown: 2.0,
                effect: SkillEffect::Damage { amount: 18 },
            },
            SkillDefinition {
                id: SkillId::from("slam"),
                name: "Slam".into(),
                cost: 15,
                cooldown: 4.0,
                effect: SkillEffect::Strike { bonus: 12 },
            },
            SkillDefinition {
                id: SkillId::from("mend"),
                name: "Mend".into(),
                cost: 12,
                cooldown: 5.0,
                effect: SkillEffect::Heal { amount: 25 },
            },
        ] {
            book.insert(skill);
        }
        book
    }
}

impl SkillCatalog for SkillBook {
    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_template_skills() {
        let book = SkillBook::builtin();
        for id in ["fireball", "claw", "piercing_bolt", "slam", "mend"] {
            assert!(book.skill(&SkillId::from(id)).is_some(), "missing {id}");
        }
    }

    #[test]
    fn insert_overrides_by_id() {
        let mut book = SkillBook::builtin();
        book.insert(SkillDefinition {
            id: SkillId::from("fireball"),
            name: "Greater Fireball".into(),
            cost: 20,
            cooldown: 2.0,
            effect: SkillEffect::Damage { amount: 60 },
        });
        assert_eq!(
            book.skill(&SkillId::from("fireball")).unwrap().name,
            "Greater Fireball"
        );
    }
}
