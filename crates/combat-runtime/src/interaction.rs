//! Bridge from host interaction events to skill submissions.
//!
//! The handler is bound to exactly one controllable entity at construction.
//! Hosts (UI widgets, VR controller bindings) push [`InteractionEvent`]s
//! through the cloneable sender; the orchestrator drains the queue once per
//! tick and forwards each event as a skill submission for the bound entity.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use combat_core::{CombatPhase, EntityId, EntityRegistry, SkillId};

use crate::api::RuntimeError;
use crate::skills::{CastRequest, SkillEngine, Submission};

/// Discrete input consumed by the handler.
#[derive(Clone, Debug)]
pub enum InteractionEvent {
    /// "Use skill X", optionally aimed at a target.
    ActivateSkill {
        skill: SkillId,
        target: Option<EntityId>,
    },
}

/// Queue-draining dispatcher for one controllable entity.
#[derive(Debug)]
pub struct InteractionHandler {
    bound: EntityId,
    tx: mpsc::UnboundedSender<InteractionEvent>,
    rx: mpsc::UnboundedReceiver<InteractionEvent>,
}

impl InteractionHandler {
    /// Binds the handler to `entity`.
    ///
    /// Fails if the entity is not registered: a handler cannot bind to
    /// nothing. The caller decides whether that is fatal (for the
    /// orchestrator it is not).
    pub fn bind(entity: EntityId, registry: &EntityRegistry) -> Result<Self, RuntimeError> {
        if !registry.contains(&entity) {
            return Err(RuntimeError::EntityNotFound(entity));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        debug!(target: "combat::interaction", entity = %entity, "interaction handler bound");
        Ok(Self {
            bound: entity,
            tx,
            rx,
        })
    }

    /// The entity this handler submits skills for.
    pub fn bound_entity(&self) -> &EntityId {
        &self.bound
    }

    /// Cloneable host-facing queue handle.
    pub fn sender(&self) -> mpsc::UnboundedSender<InteractionEvent> {
        self.tx.clone()
    }

    /// Drains every queued event and forwards it to the skill engine.
    /// Never suspends; rejections are logged, not propagated.
    pub fn dispatch(
        &mut self,
        skills: &mut SkillEngine,
        registry: &mut EntityRegistry,
        phase: CombatPhase,
    ) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                InteractionEvent::ActivateSkill { skill, target } => {
                    let request = CastRequest {
                        caster: self.bound.clone(),
                        skill,
                        target,
                    };
                    match skills.submit(request, registry, phase) {
                        Ok(Submission::Resolved(success)) => {
                            debug!(
                                target: "combat::interaction",
                                entity = %self.bound,
                                success,
                                "interaction skill resolved"
                            );
                        }
                        Ok(Submission::Pending(_ticket)) => {
                            // Result reaches observers through the event bus.
                            debug!(
                                target: "combat::interaction",
                                entity = %self.bound,
                                "interaction skill awaiting confirmation"
                            );
                        }
                        Err(rejection) => {
                            warn!(
                                target: "combat::interaction",
                                entity = %self.bound,
                                %rejection,
                                "interaction skill rejected"
                            );
                        }
                    }
                }
            }
        }
    }
}
