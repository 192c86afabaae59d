//! Registry owning every combat entity for the duration of an engagement.

use thiserror::Error;
use tracing::debug;

use crate::entity::{CombatEntity, EntityId, Side, SpawnData};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("entity id {0} is already registered")]
    Duplicate(EntityId),

    #[error("participant ids not registered: {}", format_ids(.0))]
    MissingParticipants(Vec<EntityId>),
}

fn format_ids(ids: &[EntityId]) -> String {
    ids.iter()
        .map(EntityId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sole owner of entity lifetime during a combat instance.
///
/// Entities live in registration order; lookups are linear scans, which is
/// the right trade at encounter scale (a handful of participants).
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<CombatEntity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new entity from spawn data. Duplicate ids are rejected.
    pub fn add(&mut self, data: SpawnData) -> Result<EntityId, RegistryError> {
        let entity = CombatEntity::from_spawn(data);
        if self.get(&entity.id).is_some() {
            return Err(RegistryError::Duplicate(entity.id));
        }
        let id = entity.id.clone();
        debug!(target: "combat::registry", entity = %id, kind = %entity.kind, "entity registered");
        self.entities.push(entity);
        Ok(id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&CombatEntity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut CombatEntity> {
        self.entities.iter_mut().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the current participant set.
    ///
    /// Fails fast, listing every id that is not registered, and in that case
    /// leaves the previous assignment untouched. On success all previous
    /// side assignments are dropped before the new ones apply.
    pub fn set_participants(
        &mut self,
        players: &[EntityId],
        enemies: &[EntityId],
    ) -> Result<(), RegistryError> {
        let missing: Vec<EntityId> = players
            .iter()
            .chain(enemies)
            .filter(|id| !self.contains(id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::MissingParticipants(missing));
        }

        for entity in &mut self.entities {
            entity.side = None;
        }
        for id in players {
            if let Some(entity) = self.get_mut(id) {
                entity.side = Some(Side::Player);
            }
        }
        for id in enemies {
            if let Some(entity) = self.get_mut(id) {
                entity.side = Some(Side::Enemy);
            }
        }
        debug!(
            target: "combat::registry",
            players = players.len(),
            enemies = enemies.len(),
            "participant set assigned"
        );
        Ok(())
    }

    /// Enemy-side participants in registration order.
    pub fn ai_entities(&self) -> impl Iterator<Item = &CombatEntity> {
        self.entities
            .iter()
            .filter(|e| e.side == Some(Side::Enemy))
    }

    /// Player-side participants in registration order.
    pub fn player_entities(&self) -> impl Iterator<Item = &CombatEntity> {
        self.entities
            .iter()
            .filter(|e| e.side == Some(Side::Player))
    }

    /// Drops every participant record, ending the registry's ownership of
    /// them. Entities never assigned to a side stay registered.
    pub fn clear_participants(&mut self) {
        let before = self.entities.len();
        self.entities.retain(|e| e.side.is_none());
        debug!(
            target: "combat::registry",
            removed = before - self.entities.len(),
            "participants cleared"
        );
    }

    /// Per-tick bookkeeping: flips the liveness flag off for entities whose
    /// health reached zero. Returns the ids that went down this tick.
    pub fn sync_liveness(&mut self) -> Vec<EntityId> {
        let mut downed = Vec::new();
        for entity in &mut self.entities {
            if entity.alive && entity.health() <= 0 {
                entity.alive = false;
                downed.push(entity.id.clone());
            }
        }
        downed
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeKind, Attributes};

    fn spawn(name: &str, kind: &str) -> SpawnData {
        SpawnData::new(
            name,
            kind,
            Attributes::new()
                .with(AttributeKind::Health, 20)
                .with(AttributeKind::MaxHealth, 20),
        )
    }

    fn ids(raw: &[&str]) -> Vec<EntityId> {
        raw.iter().map(|s| EntityId::from(*s)).collect()
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut reg = EntityRegistry::new();
        reg.add(spawn("a", "melee")).unwrap();
        assert_eq!(
            reg.add(spawn("a", "ranged")),
            Err(RegistryError::Duplicate(EntityId::from("a")))
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn set_participants_lists_every_missing_id() {
        let mut reg = EntityRegistry::new();
        reg.add(spawn("p1", "hero")).unwrap();
        let err = reg
            .set_participants(&ids(&["p1", "ghost"]), &ids(&["phantom"]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::MissingParticipants(ids(&["ghost", "phantom"]))
        );
        // Fail-fast: nothing was assigned.
        assert_eq!(reg.ai_entities().count(), 0);
        assert!(reg.get(&EntityId::from("p1")).unwrap().side.is_none());
    }

    #[test]
    fn ai_entities_follow_registration_order() {
        let mut reg = EntityRegistry::new();
        reg.add(spawn("e2", "ranged")).unwrap();
        reg.add(spawn("p1", "hero")).unwrap();
        reg.add(spawn("e1", "melee")).unwrap();
        reg.set_participants(&ids(&["p1"]), &ids(&["e1", "e2"]))
            .unwrap();

        let order: Vec<&str> = reg.ai_entities().map(|e| e.id.as_str()).collect();
        // Registration order, not participant-list order.
        assert_eq!(order, vec!["e2", "e1"]);
    }

    #[test]
    fn reassignment_replaces_the_previous_set() {
        let mut reg = EntityRegistry::new();
        for name in ["p1", "e1", "e2"] {
            reg.add(spawn(name, "x")).unwrap();
        }
        reg.set_participants(&ids(&["p1"]), &ids(&["e1", "e2"]))
            .unwrap();
        reg.set_participants(&ids(&["p1"]), &ids(&["e2"])).unwrap();

        let order: Vec<&str> = reg.ai_entities().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["e2"]);
        assert!(reg.get(&EntityId::from("e1")).unwrap().side.is_none());
    }

    #[test]
    fn clear_removes_only_participants() {
        let mut reg = EntityRegistry::new();
        for name in ["p1", "e1", "bystander"] {
            reg.add(spawn(name, "x")).unwrap();
        }
        reg.set_participants(&ids(&["p1"]), &ids(&["e1"])).unwrap();
        reg.clear_participants();

        assert_eq!(reg.len(), 1);
        assert!(reg.contains(&EntityId::from("bystander")));
        assert_eq!(reg.ai_entities().count(), 0);
    }

    #[test]
    fn liveness_sync_reports_each_death_once() {
        let mut reg = EntityRegistry::new();
        reg.add(spawn("e1", "melee")).unwrap();
        reg.get_mut(&EntityId::from("e1")).unwrap().take_damage(20);

        assert_eq!(reg.sync_liveness(), ids(&["e1"]));
        assert_eq!(reg.sync_liveness(), Vec::<EntityId>::new());
        assert!(!reg.get(&EntityId::from("e1")).unwrap().alive);
    }
}
