//! The combat orchestrator facade.
//!
//! Owns every sub-manager, fixes their initialization order, and drives the
//! per-tick pipeline. The host constructs it from explicit [`CombatDeps`],
//! calls `initialize` once, feeds `update(delta_time)` from its frame loop,
//! and tears it down with `shutdown`.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use combat_content::SkillBook;
use combat_core::{
    CombatEntity, CombatOutcome, CombatPhase, CombatStateMachine, EntityId, EntityRegistry,
    SkillCatalog, SkillId, SpawnData,
};

use crate::ai::{AiContext, AiDecision, BehaviorEngine, EntitySnapshot, TreeLibrary, template_for_kind};
use crate::api::{CombatEvent, Result, RuntimeError};
use crate::interaction::{InteractionEvent, InteractionHandler};
use crate::skills::{CastConfirmer, CastRequest, InstantConfirmer, SkillEngine, Submission};

/// Tuning knobs for the orchestrator itself.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Capacity of the event broadcast channel.
    pub event_buffer_size: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 64,
        }
    }
}

/// Everything the orchestrator needs injected at construction.
///
/// The host owns these: definition sources are read-only and shared, the
/// confirmer gates cast resolution, and `player` is the spawn data for the
/// one controllable entity.
pub struct CombatDeps {
    pub catalog: Arc<dyn SkillCatalog>,
    pub trees: Arc<TreeLibrary>,
    pub confirmer: Arc<dyn CastConfirmer>,
    pub player: SpawnData,
}

impl CombatDeps {
    /// Builtin catalog and templates with instant cast confirmation.
    pub fn builtin(player: SpawnData) -> Self {
        Self {
            catalog: Arc::new(SkillBook::builtin()),
            trees: Arc::new(TreeLibrary::with_defaults()),
            confirmer: Arc::new(InstantConfirmer),
            player,
        }
    }
}

/// Facade over the combat sub-managers.
///
/// Sub-managers exist between `initialize` and `shutdown`; every public
/// operation outside that window logs an error and reports failure without
/// touching state.
pub struct CombatOrchestrator {
    deps: CombatDeps,
    events: broadcast::Sender<CombatEvent>,
    registry: Option<EntityRegistry>,
    skills: Option<SkillEngine>,
    ai: Option<BehaviorEngine>,
    fsm: Option<CombatStateMachine>,
    interaction: Option<InteractionHandler>,
    player_id: Option<EntityId>,
    combat_id: Option<String>,
    initialized: bool,
}

impl CombatOrchestrator {
    pub fn new(deps: CombatDeps) -> Self {
        Self::with_config(deps, OrchestratorConfig::default())
    }

    pub fn with_config(deps: CombatDeps, config: OrchestratorConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer_size);
        Self {
            deps,
            events,
            registry: None,
            skills: None,
            ai: None,
            fsm: None,
            interaction: None,
            player_id: None,
            combat_id: None,
            initialized: false,
        }
    }

    /// Builds and wires the sub-managers in dependency order: registry,
    /// skill engine, behavior engine, state machine, interaction handler.
    ///
    /// A second call logs a warning and leaves the running instance alone.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            warn!(
                target: "combat::orchestrator",
                "initialize called on an initialized orchestrator, ignoring"
            );
            return Ok(());
        }

        let mut registry = EntityRegistry::new();
        let player_id = registry.add(self.deps.player.clone())?;

        let skills = SkillEngine::new(
            self.deps.catalog.clone(),
            self.deps.confirmer.clone(),
            self.events.clone(),
        );
        let ai = BehaviorEngine::new(self.deps.trees.clone());
        let fsm = CombatStateMachine::new();

        // The handler needs the controllable entity to exist; losing it is
        // fatal to the handler but not to the orchestrator.
        let interaction = match InteractionHandler::bind(player_id.clone(), &registry) {
            Ok(handler) => Some(handler),
            Err(error) => {
                error!(
                    target: "combat::orchestrator",
                    %error,
                    "interaction handler failed to bind, continuing without one"
                );
                None
            }
        };

        self.registry = Some(registry);
        self.skills = Some(skills);
        self.ai = Some(ai);
        self.fsm = Some(fsm);
        self.interaction = interaction;
        self.player_id = Some(player_id.clone());
        self.initialized = true;
        info!(target: "combat::orchestrator", player = %player_id, "combat orchestrator initialized");
        Ok(())
    }

    /// Registers an entity from host-provided spawn data.
    pub fn add_entity(&mut self, data: SpawnData) -> Result<EntityId> {
        if !self.initialized {
            error!(target: "combat::orchestrator", "add_entity called before initialize");
            return Err(RuntimeError::NotInitialized);
        }
        let registry = self.registry.as_mut().ok_or(RuntimeError::NotInitialized)?;
        Ok(registry.add(data)?)
    }

    /// Begins an engagement: seeds the participant set, assigns behavior
    /// trees to every resolvable enemy, and transitions Preparing to
    /// InCombat with no tick in between.
    ///
    /// Participant ids that do not resolve are skipped with a warning; the
    /// engagement proceeds with the resolved subset.
    pub fn start_combat(
        &mut self,
        combat_id: &str,
        players: &[EntityId],
        enemies: &[EntityId],
    ) -> Result<()> {
        if !self.initialized {
            error!(target: "combat::orchestrator", "start_combat called before initialize");
            return Err(RuntimeError::NotInitialized);
        }
        let (Some(registry), Some(ai), Some(fsm)) =
            (self.registry.as_mut(), self.ai.as_mut(), self.fsm.as_mut())
        else {
            return Err(RuntimeError::NotInitialized);
        };

        // Ending returns to Idle implicitly when the next engagement begins.
        if fsm.phase() == CombatPhase::Ending {
            fsm.enter(CombatPhase::Idle);
        }
        if fsm.phase() != CombatPhase::Idle {
            warn!(
                target: "combat::orchestrator",
                phase = %fsm.phase(),
                "start_combat while an engagement is active"
            );
            return Err(RuntimeError::InvalidPhase {
                expected: CombatPhase::Idle,
                actual: fsm.phase(),
            });
        }

        fsm.enter(CombatPhase::Preparing);

        // A previous engagement's clear may have taken the controllable
        // entity with it; restore it from the retained spawn data.
        if let Some(player_id) = &self.player_id
            && !registry.contains(player_id)
        {
            debug!(target: "combat::orchestrator", player = %player_id, "re-registering controllable entity");
            registry.add(self.deps.player.clone())?;
        }

        let resolved_players = resolve_ids(registry, players);
        let resolved_enemies = resolve_ids(registry, enemies);
        registry.set_participants(&resolved_players, &resolved_enemies)?;

        for id in &resolved_enemies {
            if let Some(entity) = registry.get(id) {
                ai.assign(id.clone(), template_for_kind(&entity.kind));
            }
        }

        fsm.enter(CombatPhase::InCombat);
        self.combat_id = Some(combat_id.to_owned());
        info!(
            target: "combat::orchestrator",
            combat_id,
            players = resolved_players.len(),
            enemies = resolved_enemies.len(),
            "combat started"
        );
        let _ = self.events.send(CombatEvent::CombatStarted {
            combat_id: combat_id.to_owned(),
        });
        Ok(())
    }

    /// Records the outcome, enters Ending, and releases the participants.
    ///
    /// The machine stays in Ending until the next `start_combat`, which is
    /// when the implicit return to Idle happens.
    pub fn end_combat(&mut self, victory: bool) -> Result<()> {
        if !self.initialized {
            error!(target: "combat::orchestrator", "end_combat called before initialize");
            return Err(RuntimeError::NotInitialized);
        }
        let (Some(registry), Some(skills), Some(ai), Some(fsm)) = (
            self.registry.as_mut(),
            self.skills.as_mut(),
            self.ai.as_mut(),
            self.fsm.as_mut(),
        ) else {
            return Err(RuntimeError::NotInitialized);
        };

        if fsm.phase() != CombatPhase::InCombat {
            warn!(
                target: "combat::orchestrator",
                phase = %fsm.phase(),
                "end_combat without an active engagement"
            );
            return Err(RuntimeError::InvalidPhase {
                expected: CombatPhase::InCombat,
                actual: fsm.phase(),
            });
        }

        fsm.set_result(victory);
        fsm.enter(CombatPhase::Ending);
        registry.clear_participants();
        ai.clear();
        skills.clear_cooldowns();
        self.combat_id = None;
        info!(target: "combat::orchestrator", victory, "combat ended");
        let _ = self.events.send(CombatEvent::CombatEnded { victory });
        Ok(())
    }

    /// Thin forward to the skill engine.
    ///
    /// Resolves immediately under an instant confirmer; with a deferred
    /// confirmer the returned future completes once a later tick resolves
    /// the cast. Every rejection surfaces as `false` with a log line.
    pub async fn use_skill(
        &mut self,
        caster: EntityId,
        skill: SkillId,
        target: Option<EntityId>,
    ) -> bool {
        let submission = {
            if !self.initialized {
                error!(target: "combat::orchestrator", "use_skill called before initialize");
                return false;
            }
            let (Some(registry), Some(skills), Some(fsm)) = (
                self.registry.as_mut(),
                self.skills.as_mut(),
                self.fsm.as_ref(),
            ) else {
                return false;
            };
            let request = CastRequest {
                caster,
                skill,
                target,
            };
            match skills.submit(request, registry, fsm.phase()) {
                Ok(submission) => submission,
                Err(rejection) => {
                    warn!(target: "combat::orchestrator", %rejection, "skill use rejected");
                    return false;
                }
            }
        };
        match submission {
            Submission::Resolved(success) => success,
            Submission::Pending(ticket) => ticket.outcome().await,
        }
    }

    /// Per-tick pipeline, driven by the host's frame loop.
    ///
    /// Order: state machine, registry liveness sync, skill engine
    /// bookkeeping, interaction dispatch, then one behavior evaluation per
    /// living AI entity. AI decisions therefore act on entity state already
    /// advanced for this frame.
    pub fn update(&mut self, delta_time: f32) {
        if !self.initialized {
            error!(target: "combat::orchestrator", "update called before initialize");
            return;
        }
        let (Some(registry), Some(skills), Some(ai), Some(fsm)) = (
            self.registry.as_mut(),
            self.skills.as_mut(),
            self.ai.as_ref(),
            self.fsm.as_mut(),
        ) else {
            return;
        };

        fsm.update(delta_time);

        for entity in registry.sync_liveness() {
            debug!(target: "combat::orchestrator", entity = %entity, "entity down");
            let _ = self.events.send(CombatEvent::EntityDown { entity });
        }

        skills.update(delta_time, registry);

        let phase = fsm.phase();
        if let Some(interaction) = self.interaction.as_mut() {
            interaction.dispatch(skills, registry, phase);
        }

        if phase == CombatPhase::InCombat {
            let target = registry
                .player_entities()
                .find(|e| e.alive)
                .map(EntitySnapshot::of);
            let actors: Vec<EntitySnapshot> = registry
                .ai_entities()
                .filter(|e| e.alive)
                .map(EntitySnapshot::of)
                .collect();

            for me in actors {
                let id = me.id.clone();
                let mut ctx = AiContext::new(me, target.clone());
                if let Some(AiDecision::Cast { skill, target }) = ai.evaluate(&id, &mut ctx) {
                    let request = CastRequest {
                        caster: id.clone(),
                        skill,
                        target,
                    };
                    if let Err(rejection) = skills.submit(request, registry, phase) {
                        debug!(
                            target: "combat::orchestrator",
                            entity = %id,
                            %rejection,
                            "ai cast rejected"
                        );
                    }
                }
            }
        }
    }

    /// Releases sub-managers in reverse dependency order. The orchestrator
    /// can be initialized again afterwards.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            warn!(target: "combat::orchestrator", "shutdown called before initialize");
            return;
        }
        self.interaction = None;
        self.fsm = None;
        self.ai = None;
        self.skills = None;
        self.registry = None;
        self.player_id = None;
        self.combat_id = None;
        self.initialized = false;
        info!(target: "combat::orchestrator", "combat orchestrator shut down");
    }

    // ------------------------------------------------------------------
    // Query surface for presentation layers
    // ------------------------------------------------------------------

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn phase(&self) -> CombatPhase {
        self.fsm
            .as_ref()
            .map(CombatStateMachine::phase)
            .unwrap_or_default()
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.fsm.as_ref().and_then(|fsm| fsm.outcome())
    }

    pub fn combat_id(&self) -> Option<&str> {
        self.combat_id.as_deref()
    }

    pub fn entity(&self, id: &EntityId) -> Option<&CombatEntity> {
        self.registry.as_ref().and_then(|r| r.get(id))
    }

    pub fn ai_entity_ids(&self) -> Vec<EntityId> {
        self.registry
            .as_ref()
            .map(|r| r.ai_entities().map(|e| e.id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn behavior_assignment(&self, id: &EntityId) -> Option<&str> {
        self.ai.as_ref().and_then(|ai| ai.assignment(id))
    }

    pub fn player_id(&self) -> Option<&EntityId> {
        self.player_id.as_ref()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CombatEvent> {
        self.events.subscribe()
    }

    /// Host-facing interaction queue, when the handler bound successfully.
    pub fn interaction_sender(&self) -> Option<mpsc::UnboundedSender<InteractionEvent>> {
        self.interaction.as_ref().map(InteractionHandler::sender)
    }
}

/// Filters `ids` down to those present in the registry, warning per skip.
fn resolve_ids(registry: &EntityRegistry, ids: &[EntityId]) -> Vec<EntityId> {
    ids.iter()
        .filter(|id| {
            let found = registry.contains(id);
            if !found {
                warn!(target: "combat::orchestrator", entity = %id, "participant id did not resolve, skipping");
            }
            found
        })
        .cloned()
        .collect()
}
