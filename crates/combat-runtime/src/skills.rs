//! Asynchronous skill resolution.
//!
//! A skill invocation is a submission: the engine validates it against the
//! current phase, the registry, and its own bookkeeping (in-flight casts,
//! cooldowns), then asks the injected [`CastConfirmer`] whether the cast may
//! resolve. Instant confirmations apply their effects before `submit`
//! returns; deferred confirmations resolve during a later tick's `update`,
//! so effect application always happens on the tick thread.
//!
//! At most one cast per caster is in flight at a time. A cast that completes
//! after its caster was cleared (combat ended) discards its effect and
//! reports failure without raising an error.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, warn};

use combat_core::{
    AttributeKind, CombatPhase, EntityId, EntityRegistry, SkillCatalog, SkillEffect, SkillId,
    spell_damage, strike_damage,
};

use crate::api::CombatEvent;

/// One caster-to-target skill invocation.
#[derive(Clone, Debug)]
pub struct CastRequest {
    pub caster: EntityId,
    pub skill: SkillId,
    pub target: Option<EntityId>,
}

/// Why a submission was refused. No effect was applied in any of these.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CastRejection {
    #[error("caster {0} is not registered")]
    CasterMissing(EntityId),

    #[error("caster {0} is dead")]
    CasterDead(EntityId),

    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),

    #[error("skills cannot be used in phase {0}")]
    NotInCombat(CombatPhase),

    #[error("caster {0} already has a cast in flight")]
    CasterBusy(EntityId),

    #[error("skill {0} is on cooldown")]
    OnCooldown(SkillId),

    #[error("caster {caster} cannot pay {cost} energy for {skill}")]
    InsufficientEnergy {
        caster: EntityId,
        skill: SkillId,
        cost: i32,
    },
}

/// Whether a cast may resolve, decided by the host.
///
/// `Ready` answers at submission time; `Deferred` hands back a channel the
/// host completes later (remote acknowledgement, animation timing). The
/// engine resolves deferred casts on the tick thread.
pub enum Confirmation {
    Ready(bool),
    Deferred(oneshot::Receiver<bool>),
}

/// Host-injected gate between validation and effect application.
pub trait CastConfirmer: Send + Sync {
    fn confirm(&self, request: &CastRequest) -> Confirmation;
}

/// Default confirmer: every validated cast resolves immediately.
pub struct InstantConfirmer;

impl CastConfirmer for InstantConfirmer {
    fn confirm(&self, _request: &CastRequest) -> Confirmation {
        Confirmation::Ready(true)
    }
}

/// Completion token for a deferred cast.
///
/// Resolves to whether the cast applied its effects. Dropping the ticket is
/// fine; the result is still observable through the event bus.
#[derive(Debug)]
pub struct CastTicket(oneshot::Receiver<bool>);

impl CastTicket {
    pub async fn outcome(self) -> bool {
        self.0.await.unwrap_or(false)
    }
}

/// Result of a validated submission.
#[derive(Debug)]
pub enum Submission {
    /// Confirmation was instant; effects (if any) are already applied.
    Resolved(bool),
    /// Confirmation is pending; resolution happens in a later `update`.
    Pending(CastTicket),
}

struct PendingCast {
    request: CastRequest,
    confirm: oneshot::Receiver<bool>,
    result: oneshot::Sender<bool>,
}

/// Validates and resolves skill invocations against the entity registry.
pub struct SkillEngine {
    catalog: Arc<dyn SkillCatalog>,
    confirmer: Arc<dyn CastConfirmer>,
    events: broadcast::Sender<CombatEvent>,
    pending: Vec<PendingCast>,
    in_flight: HashSet<EntityId>,
    cooldowns: HashMap<(EntityId, SkillId), f32>,
}

impl SkillEngine {
    pub fn new(
        catalog: Arc<dyn SkillCatalog>,
        confirmer: Arc<dyn CastConfirmer>,
        events: broadcast::Sender<CombatEvent>,
    ) -> Self {
        Self {
            catalog,
            confirmer,
            events,
            pending: Vec::new(),
            in_flight: HashSet::new(),
            cooldowns: HashMap::new(),
        }
    }

    /// Validates `request` and either resolves it immediately or queues it
    /// behind its confirmation.
    pub fn submit(
        &mut self,
        request: CastRequest,
        registry: &mut EntityRegistry,
        phase: CombatPhase,
    ) -> Result<Submission, CastRejection> {
        if phase != CombatPhase::InCombat {
            return Err(CastRejection::NotInCombat(phase));
        }
        let Some(caster) = registry.get(&request.caster) else {
            return Err(CastRejection::CasterMissing(request.caster.clone()));
        };
        if !caster.alive {
            return Err(CastRejection::CasterDead(request.caster.clone()));
        }
        let Some(def) = self.catalog.skill(&request.skill) else {
            return Err(CastRejection::UnknownSkill(request.skill.clone()));
        };
        if self.in_flight.contains(&request.caster) {
            return Err(CastRejection::CasterBusy(request.caster.clone()));
        }
        let key = (request.caster.clone(), request.skill.clone());
        if self.cooldowns.get(&key).copied().unwrap_or(0.0) > 0.0 {
            return Err(CastRejection::OnCooldown(request.skill.clone()));
        }
        if caster.attributes.get(AttributeKind::Energy) < def.cost {
            return Err(CastRejection::InsufficientEnergy {
                caster: request.caster.clone(),
                skill: request.skill.clone(),
                cost: def.cost,
            });
        }

        match self.confirmer.confirm(&request) {
            Confirmation::Ready(confirmed) => {
                let success = self.finish(&request, confirmed, registry);
                Ok(Submission::Resolved(success))
            }
            Confirmation::Deferred(confirm) => {
                let (result_tx, result_rx) = oneshot::channel();
                debug!(
                    target: "combat::skills",
                    caster = %request.caster,
                    skill = %request.skill,
                    "cast awaiting confirmation"
                );
                self.in_flight.insert(request.caster.clone());
                self.pending.push(PendingCast {
                    request,
                    confirm,
                    result: result_tx,
                });
                Ok(Submission::Pending(CastTicket(result_rx)))
            }
        }
    }

    /// Per-tick bookkeeping: ticks cooldowns down and resolves every
    /// deferred cast whose confirmation has arrived.
    pub fn update(&mut self, delta_time: f32, registry: &mut EntityRegistry) {
        self.cooldowns.retain(|_, remaining| {
            *remaining -= delta_time;
            *remaining > 0.0
        });

        let mut still_pending = Vec::new();
        for mut cast in std::mem::take(&mut self.pending) {
            match cast.confirm.try_recv() {
                Err(oneshot::error::TryRecvError::Empty) => still_pending.push(cast),
                Ok(confirmed) => {
                    self.in_flight.remove(&cast.request.caster);
                    let success = self.finish(&cast.request, confirmed, registry);
                    if cast.result.send(success).is_err() {
                        debug!(target: "combat::skills", "cast ticket dropped by caller");
                    }
                }
                Err(oneshot::error::TryRecvError::Closed) => {
                    // Confirmer went away without answering: the cast is
                    // denied, not stuck.
                    self.in_flight.remove(&cast.request.caster);
                    let success = self.finish(&cast.request, false, registry);
                    if cast.result.send(success).is_err() {
                        debug!(target: "combat::skills", "cast ticket dropped by caller");
                    }
                }
            }
        }
        self.pending = still_pending;
    }

    /// Drops cooldown state at the end of an engagement. Pending casts stay
    /// queued so they can complete and discard against the cleared registry.
    pub fn clear_cooldowns(&mut self) {
        self.cooldowns.clear();
    }

    /// Final resolution step: applies effects (when confirmed) and publishes
    /// the outcome.
    fn finish(&mut self, request: &CastRequest, confirmed: bool, registry: &mut EntityRegistry) -> bool {
        let success = if confirmed {
            self.apply(request, registry)
        } else {
            warn!(
                target: "combat::skills",
                caster = %request.caster,
                skill = %request.skill,
                "cast confirmation denied"
            );
            false
        };
        let _ = self.events.send(CombatEvent::SkillResolved {
            caster: request.caster.clone(),
            skill: request.skill.clone(),
            target: request.target.clone(),
            success,
        });
        success
    }

    /// Applies a confirmed cast. All registry writes happen here,
    /// synchronously, on the tick thread.
    fn apply(&mut self, request: &CastRequest, registry: &mut EntityRegistry) -> bool {
        let Some(def) = self.catalog.skill(&request.skill) else {
            return false;
        };
        let def = def.clone();

        let Some(caster) = registry.get_mut(&request.caster) else {
            debug!(
                target: "combat::skills",
                caster = %request.caster,
                skill = %request.skill,
                "caster cleared before resolution, discarding cast"
            );
            return false;
        };
        if !caster.alive {
            debug!(
                target: "combat::skills",
                caster = %request.caster,
                "caster died before resolution, discarding cast"
            );
            return false;
        }
        if !caster.spend_energy(def.cost) {
            debug!(
                target: "combat::skills",
                caster = %request.caster,
                skill = %request.skill,
                "energy drained before resolution, discarding cast"
            );
            return false;
        }
        let caster_attack = caster.attributes.get(AttributeKind::Attack);

        if def.cooldown > 0.0 {
            self.cooldowns.insert(
                (request.caster.clone(), request.skill.clone()),
                def.cooldown,
            );
        }

        // A missing or dead target does not abort the cast: the caster-side
        // costs above stand, only the target write is skipped.
        match def.effect {
            SkillEffect::Damage { amount } => {
                self.strike_target(request, registry, |defense| spell_damage(amount, defense));
            }
            SkillEffect::Strike { bonus } => {
                self.strike_target(request, registry, |defense| {
                    strike_damage(caster_attack, bonus, defense)
                });
            }
            SkillEffect::Heal { amount } => {
                let target_id = request.target.clone().unwrap_or(request.caster.clone());
                match registry.get_mut(&target_id) {
                    Some(target) if target.alive => {
                        let applied = target.restore_health(amount);
                        debug!(
                            target: "combat::skills",
                            caster = %request.caster,
                            skill = %request.skill,
                            healed = %target_id,
                            amount = applied,
                            "heal applied"
                        );
                    }
                    _ => {
                        debug!(
                            target: "combat::skills",
                            skill = %request.skill,
                            "heal target unavailable"
                        );
                    }
                }
            }
        }
        true
    }

    fn strike_target(
        &self,
        request: &CastRequest,
        registry: &mut EntityRegistry,
        damage_for: impl Fn(i32) -> i32,
    ) {
        let Some(target_id) = &request.target else {
            debug!(target: "combat::skills", skill = %request.skill, "damage skill cast with no target");
            return;
        };
        match registry.get_mut(target_id) {
            Some(target) if target.alive => {
                let defense = target.attributes.get(AttributeKind::Defense);
                let dealt = target.take_damage(damage_for(defense));
                debug!(
                    target: "combat::skills",
                    caster = %request.caster,
                    skill = %request.skill,
                    hit = %target_id,
                    damage = dealt,
                    "damage applied"
                );
            }
            _ => {
                debug!(
                    target: "combat::skills",
                    skill = %request.skill,
                    "target missing or dead, caster-only effects applied"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Attributes, SpawnData};
    use combat_content::SkillBook;
    use std::sync::Mutex;

    fn registry_with(entries: &[(&str, i32, i32, i32)]) -> EntityRegistry {
        // (name, health, defense, energy)
        let mut reg = EntityRegistry::new();
        for (name, health, defense, energy) in entries {
            reg.add(SpawnData::new(
                *name,
                "melee_dummy",
                Attributes::new()
                    .with(AttributeKind::Health, *health)
                    .with(AttributeKind::MaxHealth, *health)
                    .with(AttributeKind::Attack, 6)
                    .with(AttributeKind::Defense, *defense)
                    .with(AttributeKind::Energy, *energy)
                    .with(AttributeKind::MaxEnergy, *energy),
            ))
            .unwrap();
        }
        reg
    }

    fn engine() -> SkillEngine {
        let (events, _) = broadcast::channel(16);
        SkillEngine::new(
            Arc::new(SkillBook::builtin()),
            Arc::new(InstantConfirmer),
            events,
        )
    }

    fn fireball_at(caster: &str, target: &str) -> CastRequest {
        CastRequest {
            caster: EntityId::from(caster),
            skill: SkillId::from("fireball"),
            target: Some(EntityId::from(target)),
        }
    }

    /// Confirmer that parks every cast until the test releases it.
    struct HeldConfirmer {
        held: Mutex<Vec<oneshot::Sender<bool>>>,
    }

    impl HeldConfirmer {
        fn new() -> Self {
            Self {
                held: Mutex::new(Vec::new()),
            }
        }

        fn release(&self, confirmed: bool) {
            let tx = self.held.lock().unwrap().remove(0);
            let _ = tx.send(confirmed);
        }
    }

    impl CastConfirmer for HeldConfirmer {
        fn confirm(&self, _request: &CastRequest) -> Confirmation {
            let (tx, rx) = oneshot::channel();
            self.held.lock().unwrap().push(tx);
            Confirmation::Deferred(rx)
        }
    }

    #[test]
    fn instant_cast_applies_mitigated_damage() {
        let mut reg = registry_with(&[("p1", 100, 2, 50), ("e1", 50, 5, 0)]);
        let mut eng = engine();

        let sub = eng
            .submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::InCombat)
            .unwrap();
        assert!(matches!(sub, Submission::Resolved(true)));

        // fireball 30 - defense 5
        let e1 = reg.get(&EntityId::from("e1")).unwrap();
        assert_eq!(e1.health(), 25);
        // cost deducted from the caster
        let p1 = reg.get(&EntityId::from("p1")).unwrap();
        assert_eq!(p1.attributes.get(AttributeKind::Energy), 40);
    }

    #[test]
    fn rejects_outside_combat_and_unknown_ids() {
        let mut reg = registry_with(&[("p1", 100, 2, 50)]);
        let mut eng = engine();

        assert_eq!(
            eng.submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::Idle)
                .unwrap_err(),
            CastRejection::NotInCombat(CombatPhase::Idle)
        );
        assert_eq!(
            eng.submit(fireball_at("ghost", "e1"), &mut reg, CombatPhase::InCombat)
                .unwrap_err(),
            CastRejection::CasterMissing(EntityId::from("ghost"))
        );
        let unknown = CastRequest {
            caster: EntityId::from("p1"),
            skill: SkillId::from("meteor_storm"),
            target: None,
        };
        assert_eq!(
            eng.submit(unknown, &mut reg, CombatPhase::InCombat)
                .unwrap_err(),
            CastRejection::UnknownSkill(SkillId::from("meteor_storm"))
        );
    }

    #[test]
    fn missing_target_still_charges_the_caster() {
        let mut reg = registry_with(&[("p1", 100, 2, 50)]);
        let mut eng = engine();

        let sub = eng
            .submit(fireball_at("p1", "nobody"), &mut reg, CombatPhase::InCombat)
            .unwrap();
        assert!(matches!(sub, Submission::Resolved(true)));
        let p1 = reg.get(&EntityId::from("p1")).unwrap();
        assert_eq!(p1.attributes.get(AttributeKind::Energy), 40);
    }

    #[test]
    fn cooldown_blocks_until_it_elapses() {
        let mut reg = registry_with(&[("p1", 100, 2, 50), ("e1", 50, 5, 0)]);
        let mut eng = engine();

        eng.submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::InCombat)
            .unwrap();
        assert_eq!(
            eng.submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::InCombat)
                .unwrap_err(),
            CastRejection::OnCooldown(SkillId::from("fireball"))
        );

        // fireball cooldown is 1.5s
        eng.update(2.0, &mut reg);
        assert!(
            eng.submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::InCombat)
                .is_ok()
        );
    }

    #[test]
    fn energy_shortfall_is_rejected_up_front() {
        let mut reg = registry_with(&[("p1", 100, 2, 9), ("e1", 50, 5, 0)]);
        let mut eng = engine();

        assert_eq!(
            eng.submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::InCombat)
                .unwrap_err(),
            CastRejection::InsufficientEnergy {
                caster: EntityId::from("p1"),
                skill: SkillId::from("fireball"),
                cost: 10,
            }
        );
        // nothing was spent
        let p1 = reg.get(&EntityId::from("p1")).unwrap();
        assert_eq!(p1.attributes.get(AttributeKind::Energy), 9);
    }

    #[tokio::test]
    async fn deferred_cast_resolves_on_a_later_tick() {
        let mut reg = registry_with(&[("p1", 100, 2, 50), ("e1", 50, 5, 0)]);
        let confirmer = Arc::new(HeldConfirmer::new());
        let (events, _) = broadcast::channel(16);
        let mut eng = SkillEngine::new(
            Arc::new(SkillBook::builtin()),
            confirmer.clone(),
            events,
        );

        let Submission::Pending(ticket) = eng
            .submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::InCombat)
            .unwrap()
        else {
            panic!("expected a pending submission");
        };

        // Same caster is serialized while the cast is in flight.
        assert_eq!(
            eng.submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::InCombat)
                .unwrap_err(),
            CastRejection::CasterBusy(EntityId::from("p1"))
        );

        // Nothing resolves before the confirmation lands.
        eng.update(0.1, &mut reg);
        assert_eq!(reg.get(&EntityId::from("e1")).unwrap().health(), 50);

        confirmer.release(true);
        eng.update(0.1, &mut reg);
        assert_eq!(reg.get(&EntityId::from("e1")).unwrap().health(), 25);
        assert!(ticket.outcome().await);
    }

    #[tokio::test]
    async fn cast_pending_across_combat_end_discards_its_effect() {
        let mut reg = registry_with(&[("p1", 100, 2, 50), ("e1", 50, 5, 0)]);
        reg.set_participants(&[EntityId::from("p1")], &[EntityId::from("e1")])
            .unwrap();
        let confirmer = Arc::new(HeldConfirmer::new());
        let (events, _) = broadcast::channel(16);
        let mut eng = SkillEngine::new(
            Arc::new(SkillBook::builtin()),
            confirmer.clone(),
            events,
        );

        let Submission::Pending(ticket) = eng
            .submit(fireball_at("p1", "e1"), &mut reg, CombatPhase::InCombat)
            .unwrap()
        else {
            panic!("expected a pending submission");
        };

        // Combat ends while the cast is still waiting.
        reg.clear_participants();
        eng.clear_cooldowns();

        confirmer.release(true);
        eng.update(0.1, &mut reg);

        // The cast completed but its effect was discarded as a no-op write.
        assert!(!ticket.outcome().await);
        assert!(reg.is_empty());
    }
}
