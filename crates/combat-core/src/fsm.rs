//! Combat lifecycle state machine.
//!
//! One machine per engagement: Idle until `start`, Preparing while the
//! participant set is seeded, InCombat for the fight itself, Ending once the
//! outcome is recorded, then back to Idle for the next engagement. Every
//! transition is externally driven; `update` only keeps per-phase timers.

use strum::Display;
use tracing::debug;

/// Lifecycle phase of the active combat instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CombatPhase {
    #[default]
    Idle,
    Preparing,
    InCombat,
    Ending,
}

/// How an engagement ended, recorded just before entering `Ending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// Phase holder plus outcome and per-phase elapsed time.
///
/// `enter` does not validate sequencing: callers own the transition order,
/// and an out-of-order call is a caller bug rather than a runtime condition
/// this type recovers from.
#[derive(Debug, Default)]
pub struct CombatStateMachine {
    phase: CombatPhase,
    outcome: Option<CombatOutcome>,
    time_in_phase: f32,
}

impl CombatStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.outcome
    }

    /// Seconds spent in the current phase.
    pub fn time_in_phase(&self) -> f32 {
        self.time_in_phase
    }

    /// Moves to `phase` and resets the phase timer.
    ///
    /// Entering `Preparing` clears the previous engagement's outcome.
    pub fn enter(&mut self, phase: CombatPhase) {
        debug!(target: "combat::fsm", from = %self.phase, to = %phase, "phase transition");
        if phase == CombatPhase::Preparing {
            self.outcome = None;
        }
        self.phase = phase;
        self.time_in_phase = 0.0;
    }

    /// Records the engagement outcome. Must precede entering `Ending`; this
    /// is the only place the outcome is written.
    pub fn set_result(&mut self, victory: bool) {
        let outcome = if victory {
            CombatOutcome::Victory
        } else {
            CombatOutcome::Defeat
        };
        debug!(target: "combat::fsm", ?outcome, "combat result recorded");
        self.outcome = Some(outcome);
    }

    /// Per-tick bookkeeping. Never transitions on its own.
    pub fn update(&mut self, delta_time: f32) {
        self.time_in_phase += delta_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_no_outcome() {
        let fsm = CombatStateMachine::new();
        assert_eq!(fsm.phase(), CombatPhase::Idle);
        assert_eq!(fsm.outcome(), None);
    }

    #[test]
    fn full_lifecycle_keeps_outcome_until_next_prepare() {
        let mut fsm = CombatStateMachine::new();
        fsm.enter(CombatPhase::Preparing);
        fsm.enter(CombatPhase::InCombat);
        fsm.set_result(true);
        fsm.enter(CombatPhase::Ending);
        fsm.enter(CombatPhase::Idle);
        // Outcome of the finished engagement is still queryable from Idle.
        assert_eq!(fsm.outcome(), Some(CombatOutcome::Victory));

        fsm.enter(CombatPhase::Preparing);
        assert_eq!(fsm.outcome(), None);
    }

    #[test]
    fn update_accumulates_and_enter_resets_the_timer() {
        let mut fsm = CombatStateMachine::new();
        fsm.update(0.5);
        fsm.update(0.25);
        assert!((fsm.time_in_phase() - 0.75).abs() < f32::EPSILON);
        fsm.enter(CombatPhase::Preparing);
        assert_eq!(fsm.time_in_phase(), 0.0);
    }
}
