//! The turn engine.
//!
//! A turn is two calls that must alternate:
//!
//! 1. [`SimulationEngine::apply_policies`]: validate the selection, pay for it,
//!    start cooldowns, apply (jittered) effects, maybe fire a random event.
//! 2. [`SimulationEngine::advance_turn`]: budget grant, cooldown decay, natural
//!    drift, history append, end-of-game check.
//!
//! Both evaluate objectives and failure predicates afterwards; victory is
//! checked before failure.

use crate::config::SimConfig;
use crate::event::RandomEvent;
use crate::event_log::GameEvent;
use crate::indicator::Indicator;
use crate::objective::{self, Evaluation, Verdict};
use crate::policy::{PolicyCatalog, PolicyError, PolicyId, PolicyView};
use crate::rng::{RandomSource, SeededRng};
use crate::state::{EndReason, Ending, GameSnapshot, GameState, Outcome, Phase};
use crate::systems::{self, budget};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Out of sequence: expected phase {expected}, engine is in {found}")]
    OutOfSequence {
        expected: &'static str,
        found: &'static str,
    },
    #[error("The game is over")]
    GameOver,
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// One policy as it was actually applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnactedPolicy {
    pub id: PolicyId,
    pub key: String,
    pub cost: u32,
    /// Deltas after jitter, in effect order.
    pub applied: Vec<(Indicator, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub enacted: Vec<EnactedPolicy>,
    pub triggered_event: Option<RandomEvent>,
    pub outcome: Outcome,
    pub ending: Option<Ending>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The new current turn.
    pub turn: u32,
    pub completed_objectives: usize,
    pub outcome: Outcome,
    pub ending: Option<Ending>,
}

/// Owns the game state and the random source; the only way to mutate a game.
pub struct SimulationEngine<R: RandomSource = SeededRng> {
    config: SimConfig,
    state: GameState,
    rng: R,
}

impl SimulationEngine<SeededRng> {
    pub fn with_seed(config: SimConfig, seed: u64) -> Self {
        Self::new(config, SeededRng::new(seed))
    }
}

impl<R: RandomSource> SimulationEngine<R> {
    pub fn new(config: SimConfig, rng: R) -> Self {
        let state = GameState::new(&config);
        log::info!(
            "New '{}' game: {} turns, {} policies",
            config.name,
            config.max_turns,
            config.policies.len()
        );
        Self { config, state, rng }
    }

    /// Resume from an existing state, e.g. one prepared by a test.
    pub fn from_state(config: SimConfig, state: GameState, rng: R) -> Self {
        Self { config, state, rng }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PolicyCatalog {
        &self.config.policies
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, &self.config)
    }

    pub fn list_policies(&self) -> Vec<PolicyView> {
        self.config.policies.views(&self.state)
    }

    /// Start over from the scenario's initial state. The random source is not reseeded.
    pub fn reset(&mut self) -> GameSnapshot {
        self.state = GameState::new(&self.config);
        log::info!("Game '{}' reset", self.config.name);
        self.snapshot()
    }

    fn expect_phase(&self, expected: &Phase) -> Result<(), EngineError> {
        match &self.state.phase {
            Phase::Finished(_) => Err(EngineError::GameOver),
            phase if phase == expected => Ok(()),
            phase => Err(EngineError::OutOfSequence {
                expected: expected.name(),
                found: phase.name(),
            }),
        }
    }

    /// Enact a selection of policies for the current turn.
    ///
    /// On error nothing changes: no budget is spent and no random draw is made.
    #[instrument(skip_all, name = "apply_policies")]
    pub fn apply_policies(&mut self, selection: &[PolicyId]) -> Result<ApplyReport, EngineError> {
        self.expect_phase(&Phase::SelectPolicies)?;

        if let Err(e) =
            self.config
                .policies
                .validate_selection(selection, self.config.selection, &self.state)
        {
            log::warn!("Turn {}: rejected selection {:?}: {}", self.state.turn, selection, e);
            return Err(e.into());
        }

        let turn = self.state.turn;
        let jitter = self.config.effect_jitter;
        let mut enacted = Vec::with_capacity(selection.len());

        for &id in selection {
            let Some(policy) = self.config.policies.get(id) else {
                continue;
            };

            budget::spend(&mut self.state, policy.cost);
            if self.config.cooldowns_enabled && policy.cooldown_turns > 0 {
                self.state.cooldowns.insert(id, policy.cooldown_turns);
            }

            let mut applied = Vec::with_capacity(policy.effects.len());
            for effect in &policy.effects {
                let delta = if jitter > 0.0 {
                    effect.delta * (1.0 + self.rng.uniform(-jitter, jitter))
                } else {
                    effect.delta
                };
                self.state.indicators.apply_delta(effect.indicator, delta);
                applied.push((effect.indicator, delta));
            }

            log::debug!("Turn {}: enacted '{}' for {}", turn, policy.key, policy.cost);
            self.state.enacted.push(id);
            self.state.log.push(GameEvent::PolicyEnacted {
                turn,
                policy: id,
                key: policy.key.clone(),
                cost: policy.cost,
                applied: applied.clone(),
            });
            enacted.push(EnactedPolicy {
                id,
                key: policy.key.clone(),
                cost: policy.cost,
                applied,
            });
        }

        let triggered_event = self.config.events.roll(&mut self.rng).cloned();
        if let Some(event) = &triggered_event {
            event.apply(&mut self.state.indicators);
            log::info!("Turn {}: random event '{}'", turn, event.name);
            self.state.log.push(GameEvent::RandomEvent {
                turn,
                key: event.key.clone(),
                name: event.name.clone(),
            });
        }

        let eval = self.evaluate();
        let ending = self.conclude(eval, Phase::AwaitingNextTurn);

        Ok(ApplyReport {
            enacted,
            triggered_event,
            outcome: ending.as_ref().map_or(Outcome::Continue, |e| e.outcome),
            ending,
        })
    }

    /// Move to the next turn once this turn's policies are in.
    #[instrument(skip_all, name = "advance_turn")]
    pub fn advance_turn(&mut self) -> Result<TurnReport, EngineError> {
        self.expect_phase(&Phase::AwaitingNextTurn)?;

        self.state.turn += 1;
        self.state.enacted.clear();

        if let Some(budget) = &self.config.budget {
            systems::run_budget_tick(&mut self.state, budget);
        }
        systems::run_cooldown_tick(&mut self.state);
        if let Some(drift) = &self.config.drift {
            systems::run_drift_tick(&mut self.state, drift, &mut self.rng);
        }
        self.state.record_history();

        let eval = self.evaluate();
        let completed_objectives = eval.completed_count;
        self.state.log.push(GameEvent::TurnAdvanced {
            turn: self.state.turn,
            budget: self.state.budget.map(|b| b.available),
            completed_objectives,
        });
        log::debug!(
            "Advanced to turn {}/{} ({} objectives met)",
            self.state.turn,
            self.state.max_turns,
            completed_objectives
        );

        let ending = self.conclude(eval, Phase::SelectPolicies);

        Ok(TurnReport {
            turn: self.state.turn,
            completed_objectives,
            outcome: ending.as_ref().map_or(Outcome::Continue, |e| e.outcome),
            ending,
        })
    }

    fn evaluate(&mut self) -> Evaluation {
        let eval = objective::evaluate(
            &self.config.objectives,
            self.config.objectives_to_win,
            &self.config.failures,
            &self.state.indicators,
        );
        self.state.objectives = eval.completed.clone();
        eval
    }

    /// Apply a verdict: finish the game or move on to `next`.
    fn conclude(&mut self, eval: Evaluation, next: Phase) -> Option<Ending> {
        match eval.verdict {
            Verdict::Victory => Some(self.finish(
                Outcome::Victory,
                EndReason::ObjectivesMet {
                    completed: eval.completed_count,
                },
            )),
            Verdict::Defeat { failure } => {
                let label = self
                    .config
                    .failures
                    .iter()
                    .find(|f| f.key == failure)
                    .map(|f| f.label.clone())
                    .unwrap_or_else(|| failure.clone());
                Some(self.finish(Outcome::Defeat, EndReason::Failure { key: failure, label }))
            }
            Verdict::Continue if self.state.turn > self.state.max_turns => {
                Some(self.finish(Outcome::Defeat, EndReason::TurnLimit))
            }
            Verdict::Continue => {
                self.state.phase = next;
                None
            }
        }
    }

    fn finish(&mut self, outcome: Outcome, reason: EndReason) -> Ending {
        let ending = Ending {
            outcome,
            reason,
            turn: self.state.turn,
            score: self.config.score_for(&self.state),
        };
        log::info!(
            "Game over on turn {}: {:?} ({:?}), score {:?}",
            ending.turn,
            ending.outcome,
            ending.reason,
            ending.score
        );
        self.state.log.push(GameEvent::GameEnded {
            turn: ending.turn,
            outcome: ending.outcome,
            reason: ending.reason.clone(),
            score: ending.score,
        });
        self.state.phase = Phase::Finished(ending.clone());
        ending
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
