use crate::config::SimConfig;
use crate::event_log::GameEvent;
use crate::indicator::{Indicator, IndicatorState};
use crate::objective::{self, Rating};
use crate::policy::{PolicyId, SelectionRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Remaining and maximum policy budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub available: u32,
    pub max: u32,
}

/// Where the game is in its turn cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for `apply_policies`.
    SelectPolicies,
    /// Policies applied; waiting for `advance_turn`.
    AwaitingNextTurn,
    Finished(Ending),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::SelectPolicies => "select_policies",
            Phase::AwaitingNextTurn => "awaiting_next_turn",
            Phase::Finished(_) => "finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a call that may end the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Continue,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EndReason {
    ObjectivesMet { completed: usize },
    Failure { key: String, label: String },
    /// The last turn elapsed without the win rule holding.
    TurnLimit,
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub outcome: Outcome,
    pub reason: EndReason,
    /// Turn on which the game ended.
    pub turn: u32,
    /// Final score, when the scenario defines a score rule.
    pub score: Option<u32>,
}

/// Complete mutable state of one game. Owned by [`crate::SimulationEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// 1-based current turn.
    pub turn: u32,
    pub max_turns: u32,
    /// `None` when the scenario has no budget subsystem.
    pub budget: Option<Budget>,
    pub indicators: IndicatorState,
    /// Remaining cooldown turns per policy. Absent means available.
    pub cooldowns: BTreeMap<PolicyId, u32>,
    /// One value per elapsed turn, seeded with the initial value.
    pub history: BTreeMap<Indicator, Vec<f64>>,
    pub budget_history: Vec<u32>,
    /// Objective completion flags from the latest evaluation.
    pub objectives: BTreeMap<String, bool>,
    pub phase: Phase,
    /// Policies enacted during the current turn.
    pub enacted: Vec<PolicyId>,
    pub log: Vec<GameEvent>,
}

impl GameState {
    /// Fresh turn-1 state for a scenario.
    pub fn new(config: &SimConfig) -> Self {
        let indicators = IndicatorState::new(&config.indicators);
        let history = indicators.iter().map(|(id, v)| (id, vec![v])).collect();
        let budget = config.budget.map(|b| Budget {
            available: b.initial.min(b.max),
            max: b.max,
        });
        let objectives = objective::objective_status(&config.objectives, &indicators);

        Self {
            turn: 1,
            max_turns: config.max_turns,
            budget,
            indicators,
            cooldowns: BTreeMap::new(),
            history,
            budget_history: budget.map(|b| vec![b.available]).unwrap_or_default(),
            objectives,
            phase: Phase::SelectPolicies,
            enacted: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Remaining cooldown for a policy (0 when available).
    pub fn cooldown(&self, id: PolicyId) -> u32 {
        self.cooldowns.get(&id).copied().unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn ending(&self) -> Option<&Ending> {
        match &self.phase {
            Phase::Finished(ending) => Some(ending),
            _ => None,
        }
    }

    /// Append the current indicator values (and budget) to the history.
    pub fn record_history(&mut self) {
        for (id, value) in self.indicators.iter() {
            self.history.entry(id).or_default().push(value);
        }
        if let Some(budget) = self.budget {
            self.budget_history.push(budget.available);
        }
    }
}

/// Objective as shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveView {
    pub label: String,
    pub target: String,
    pub completed: bool,
}

/// Read-only copy of everything a presentation layer needs to draw a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub scenario: String,
    pub turn: u32,
    pub max_turns: u32,
    pub budget: Option<u32>,
    pub max_budget: Option<u32>,
    pub indicators: BTreeMap<Indicator, f64>,
    pub ratings: BTreeMap<Indicator, Rating>,
    pub cooldowns: BTreeMap<PolicyId, u32>,
    pub objectives: BTreeMap<String, ObjectiveView>,
    pub history: BTreeMap<Indicator, Vec<f64>>,
    pub budget_history: Vec<u32>,
    pub phase: Phase,
    pub selection: SelectionRule,
    /// Score if the game ended now.
    pub score: Option<u32>,
    pub ending: Option<Ending>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, config: &SimConfig) -> Self {
        let objectives = config
            .objectives
            .iter()
            .map(|o| {
                let view = ObjectiveView {
                    label: o.label.clone(),
                    target: o.target(),
                    completed: state.objectives.get(&o.key).copied().unwrap_or(false),
                };
                (o.key.clone(), view)
            })
            .collect();

        Self {
            scenario: config.name.clone(),
            turn: state.turn,
            max_turns: state.max_turns,
            budget: state.budget.map(|b| b.available),
            max_budget: state.budget.map(|b| b.max),
            indicators: state.indicators.snapshot(),
            ratings: objective::rate_all(&config.ratings, &state.indicators),
            cooldowns: state.cooldowns.clone(),
            objectives,
            history: state.history.clone(),
            budget_history: state.budget_history.clone(),
            phase: state.phase.clone(),
            selection: config.selection,
            score: config.score_for(state),
            ending: state.ending().cloned(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn completed_objectives(&self) -> usize {
        self.objectives.values().filter(|o| o.completed).count()
    }
}
