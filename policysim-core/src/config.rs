use crate::event::EventTable;
use crate::indicator::{Indicator, IndicatorDef};
use crate::objective::{self, FailureCondition, Objective, RatingBand, ScoreRule};
use crate::policy::{PolicyCatalog, SelectionRule};
use crate::scenario;
use crate::state::GameState;
use crate::systems::{BudgetConfig, DriftConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Everything that distinguishes one scenario from another.
///
/// Both built-in games run on the same engine; they differ only in this data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub name: String,
    /// The game ends once the turn counter passes this value.
    pub max_turns: u32,
    pub indicators: Vec<IndicatorDef>,
    pub policies: PolicyCatalog,
    pub selection: SelectionRule,
    /// Half-width of the multiplicative noise applied to policy effects.
    /// `0.0` disables jitter (and its draws).
    pub effect_jitter: f64,
    /// `None` disables costs entirely.
    pub budget: Option<BudgetConfig>,
    pub cooldowns_enabled: bool,
    pub events: EventTable,
    /// `None` disables natural drift.
    pub drift: Option<DriftConfig>,
    pub objectives: Vec<Objective>,
    pub objectives_to_win: usize,
    pub failures: Vec<FailureCondition>,
    pub score: Option<ScoreRule>,
    #[serde(default)]
    pub ratings: Vec<RatingBand>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl SimConfig {
    /// Twelve-turn game with a budget, cooldowns, random events and drift.
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            max_turns: scenario::STANDARD_MAX_TURNS,
            indicators: scenario::standard_indicators(),
            policies: scenario::standard_policies(),
            selection: SelectionRule::AtLeastOne,
            effect_jitter: scenario::STANDARD_EFFECT_JITTER,
            budget: Some(BudgetConfig::default()),
            cooldowns_enabled: true,
            events: scenario::standard_events(),
            drift: Some(DriftConfig::default()),
            objectives: scenario::standard_objectives(),
            objectives_to_win: scenario::STANDARD_OBJECTIVES_TO_WIN,
            failures: scenario::standard_failures(),
            score: Some(scenario::standard_score()),
            ratings: scenario::standard_ratings(),
        }
    }

    /// Ten-turn game: exactly three free policies per turn, deterministic effects.
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            max_turns: scenario::CLASSIC_MAX_TURNS,
            indicators: scenario::classic_indicators(),
            policies: scenario::classic_policies(),
            selection: SelectionRule::Exactly {
                count: scenario::CLASSIC_POLICIES_PER_TURN,
            },
            effect_jitter: 0.0,
            budget: None,
            cooldowns_enabled: false,
            events: EventTable::disabled(),
            drift: None,
            objectives: scenario::classic_objectives(),
            objectives_to_win: 1,
            failures: scenario::classic_failures(),
            score: None,
            ratings: Vec::new(),
        }
    }

    /// Look up a built-in preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            "classic" => Some(Self::classic()),
            _ => None,
        }
    }

    /// Score of `state` under this scenario's rule, if it has one.
    pub fn score_for(&self, state: &GameState) -> Option<u32> {
        self.score.as_ref().map(|rule| {
            let completed = objective::completed_count(&self.objectives, &state.indicators);
            rule.score(completed, &state.indicators)
        })
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        if self.indicators.is_empty() {
            return Err(ConfigError::NoIndicators);
        }

        let mut tracked = BTreeSet::new();
        for def in &self.indicators {
            if !tracked.insert(def.id) {
                return Err(ConfigError::DuplicateIndicator(def.id));
            }
            if !(def.min.is_finite() && def.max.is_finite()) || def.min > def.max {
                return Err(ConfigError::InvalidRange {
                    indicator: def.id,
                    min: def.min,
                    max: def.max,
                });
            }
            if !(def.min..=def.max).contains(&def.initial) {
                return Err(ConfigError::InitialOutOfRange {
                    indicator: def.id,
                    initial: def.initial,
                });
            }
        }

        let check = |indicator: Indicator, context: &str| {
            if tracked.contains(&indicator) {
                Ok(())
            } else {
                Err(ConfigError::UntrackedIndicator {
                    indicator,
                    context: context.to_string(),
                })
            }
        };

        if self.policies.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut keys = BTreeSet::new();
        for policy in self.policies.iter() {
            if !keys.insert(policy.key.as_str()) {
                return Err(ConfigError::DuplicatePolicyKey(policy.key.clone()));
            }
            for effect in &policy.effects {
                check(effect.indicator, &policy.key)?;
            }
            for req in &policy.requirements {
                check(req.indicator, &policy.key)?;
            }
        }

        if let SelectionRule::Exactly { count } = self.selection {
            if count == 0 || count > self.policies.len() {
                return Err(ConfigError::SelectionImpossible {
                    count,
                    available: self.policies.len(),
                });
            }
        }

        if !(0.0..1.0).contains(&self.effect_jitter) {
            return Err(ConfigError::InvalidJitter(self.effect_jitter));
        }
        if !(0.0..=1.0).contains(&self.events.trigger_chance) {
            return Err(ConfigError::InvalidProbability(self.events.trigger_chance));
        }
        for event in &self.events.events {
            for effect in &event.effects {
                check(effect.indicator, &event.key)?;
            }
        }

        if let Some(budget) = &self.budget {
            if budget.initial > budget.max {
                return Err(ConfigError::BudgetAboveMax {
                    initial: budget.initial,
                    max: budget.max,
                });
            }
        }

        for objective in &self.objectives {
            if objective.conditions.is_empty() {
                return Err(ConfigError::EmptyObjective(objective.key.clone()));
            }
            for cond in &objective.conditions {
                check(cond.indicator, &objective.key)?;
            }
        }
        if self.objectives_to_win == 0 || self.objectives_to_win > self.objectives.len() {
            return Err(ConfigError::UnreachableWinRule {
                needed: self.objectives_to_win,
                defined: self.objectives.len(),
            });
        }
        for failure in &self.failures {
            check(failure.condition.indicator, &failure.key)?;
        }

        Ok(())
    }
}

/// Reasons a [`SimConfig`] is rejected by [`SimConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Scenario must last at least one turn")]
    ZeroTurns,
    #[error("Scenario defines no indicators")]
    NoIndicators,
    #[error("Indicator {0} defined more than once")]
    DuplicateIndicator(Indicator),
    #[error("Indicator {indicator} has invalid range [{min}, {max}]")]
    InvalidRange { indicator: Indicator, min: f64, max: f64 },
    #[error("Indicator {indicator} starts at {initial}, outside its range")]
    InitialOutOfRange { indicator: Indicator, initial: f64 },
    #[error("'{context}' refers to untracked indicator {indicator}")]
    UntrackedIndicator { indicator: Indicator, context: String },
    #[error("Scenario defines no policies")]
    EmptyCatalog,
    #[error("Policy key '{0}' used more than once")]
    DuplicatePolicyKey(String),
    #[error("Cannot select exactly {count} of {available} policies")]
    SelectionImpossible { count: usize, available: usize },
    #[error("Effect jitter {0} must be in [0, 1)")]
    InvalidJitter(f64),
    #[error("Event chance {0} must be in [0, 1]")]
    InvalidProbability(f64),
    #[error("Initial budget {initial} exceeds maximum {max}")]
    BudgetAboveMax { initial: u32, max: u32 },
    #[error("Objective '{0}' has no conditions")]
    EmptyObjective(String),
    #[error("Win rule needs {needed} objectives but {defined} are defined")]
    UnreachableWinRule { needed: usize, defined: usize },
}
