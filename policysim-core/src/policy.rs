//! Policy catalog and selection validation.
//!
//! Policies are immutable catalog entries. Each one carries an additive effect
//! template over indicators, a cost charged against the turn budget, a cooldown
//! and optional `indicator <= limit` requirements.

use crate::indicator::Indicator;
use crate::state::GameState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Type-safe policy identifier.
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize, PartialOrd, Ord)]
pub struct PolicyId(pub u16);

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One additive change to an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub indicator: Indicator,
    pub delta: f64,
}

impl Effect {
    pub const fn new(indicator: Indicator, delta: f64) -> Self {
        Self { indicator, delta }
    }
}

/// Precondition `indicator <= max_value` for enacting a policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub indicator: Indicator,
    pub max_value: f64,
}

/// Static policy definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDef {
    pub id: PolicyId,
    /// Stable snake_case key (e.g. `"tax_cut"`).
    pub key: String,
    /// Display name.
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub cooldown_turns: u32,
    /// Applied in order; order determines the sequence of jitter draws.
    pub effects: Vec<Effect>,
    pub requirements: Vec<Requirement>,
}

impl PolicyDef {
    pub fn new(id: u16, key: &str, name: &str, description: &str) -> Self {
        Self {
            id: PolicyId(id),
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            cost: 0,
            cooldown_turns: 0,
            effects: Vec::new(),
            requirements: Vec::new(),
        }
    }

    pub fn cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    pub fn effect(mut self, indicator: Indicator, delta: f64) -> Self {
        self.effects.push(Effect::new(indicator, delta));
        self
    }

    pub fn requires_at_most(mut self, indicator: Indicator, max_value: f64) -> Self {
        self.requirements.push(Requirement {
            indicator,
            max_value,
        });
        self
    }

    /// First requirement the current values violate, if any.
    ///
    /// Requirements on untracked indicators are treated as met.
    pub fn unmet_requirement(&self, state: &GameState) -> Option<(Requirement, f64)> {
        self.requirements.iter().find_map(|req| {
            state
                .indicators
                .get(req.indicator)
                .filter(|&actual| actual > req.max_value)
                .map(|actual| (*req, actual))
        })
    }
}

/// How many policies a player must pick per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SelectionRule {
    /// One or more policies.
    AtLeastOne,
    /// Exactly `count` policies.
    Exactly { count: usize },
}

/// Reasons a policy selection is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("No policy selected")]
    EmptySelection,
    #[error("Expected exactly {expected} policies, got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("Policy {0} selected more than once")]
    DuplicateSelection(PolicyId),
    #[error("Unknown policy {0}")]
    UnknownPolicy(PolicyId),
    #[error("Policy '{policy}' is on cooldown for {turns_left} more turn(s)")]
    Unavailable { policy: String, turns_left: u32 },
    #[error("Selected policies cost {required}, only {available} budget available")]
    BudgetExceeded { required: u32, available: u32 },
    #[error("Policy '{policy}' requires {indicator} <= {limit}, current value is {actual:.2}")]
    RequirementUnmet {
        policy: String,
        indicator: Indicator,
        limit: f64,
        actual: f64,
    },
}

/// Registry of every policy available in a game, in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PolicyDef>", into = "Vec<PolicyDef>")]
pub struct PolicyCatalog {
    policies: Vec<PolicyDef>,
    by_key: BTreeMap<String, usize>,
}

impl From<Vec<PolicyDef>> for PolicyCatalog {
    fn from(defs: Vec<PolicyDef>) -> Self {
        Self::from_defs(defs)
    }
}

impl From<PolicyCatalog> for Vec<PolicyDef> {
    fn from(catalog: PolicyCatalog) -> Self {
        catalog.policies
    }
}

impl PolicyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defs(defs: impl IntoIterator<Item = PolicyDef>) -> Self {
        let mut catalog = Self::new();
        for def in defs {
            catalog.register(def);
        }
        catalog
    }

    /// Adds a policy. A later definition with the same id replaces the earlier one.
    pub fn register(&mut self, policy: PolicyDef) {
        if let Some(pos) = self.policies.iter().position(|p| p.id == policy.id) {
            self.by_key.remove(&self.policies[pos].key);
            self.by_key.insert(policy.key.clone(), pos);
            self.policies[pos] = policy;
        } else {
            self.by_key.insert(policy.key.clone(), self.policies.len());
            self.policies.push(policy);
        }
    }

    pub fn get(&self, id: PolicyId) -> Option<&PolicyDef> {
        self.policies.iter().find(|p| p.id == id)
    }

    pub fn get_by_key(&self, key: &str) -> Option<&PolicyDef> {
        self.by_key.get(key).and_then(|&idx| self.policies.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PolicyDef> {
        self.policies.iter()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Resolve a selection to catalog entries, checking only its shape.
    fn resolve(
        &self,
        selection: &[PolicyId],
        rule: SelectionRule,
    ) -> Result<Vec<&PolicyDef>, PolicyError> {
        match rule {
            SelectionRule::AtLeastOne if selection.is_empty() => {
                return Err(PolicyError::EmptySelection)
            }
            SelectionRule::Exactly { count } if selection.len() != count => {
                return Err(PolicyError::WrongCount {
                    expected: count,
                    actual: selection.len(),
                })
            }
            _ => {}
        }

        let mut seen = BTreeSet::new();
        selection
            .iter()
            .map(|&id| {
                if !seen.insert(id) {
                    return Err(PolicyError::DuplicateSelection(id));
                }
                self.get(id).ok_or(PolicyError::UnknownPolicy(id))
            })
            .collect()
    }

    /// Check a selection against the current state without mutating anything.
    ///
    /// Checks run in a fixed order: shape, cooldowns, budget, requirements.
    pub fn validate_selection(
        &self,
        selection: &[PolicyId],
        rule: SelectionRule,
        state: &GameState,
    ) -> Result<(), PolicyError> {
        let policies = self.resolve(selection, rule)?;

        for policy in &policies {
            let turns_left = state.cooldown(policy.id);
            if turns_left > 0 {
                return Err(PolicyError::Unavailable {
                    policy: policy.key.clone(),
                    turns_left,
                });
            }
        }

        if let Some(budget) = &state.budget {
            let required = policies
                .iter()
                .fold(0u32, |acc, p| acc.saturating_add(p.cost));
            if required > budget.available {
                return Err(PolicyError::BudgetExceeded {
                    required,
                    available: budget.available,
                });
            }
        }

        for policy in &policies {
            if let Some((req, actual)) = policy.unmet_requirement(state) {
                return Err(PolicyError::RequirementUnmet {
                    policy: policy.key.clone(),
                    indicator: req.indicator,
                    limit: req.max_value,
                    actual,
                });
            }
        }

        Ok(())
    }

    /// Presentation rows for every policy, flagged against the current state.
    pub fn views(&self, state: &GameState) -> Vec<PolicyView> {
        self.policies
            .iter()
            .map(|policy| {
                let turns_left = state.cooldown(policy.id);
                PolicyView {
                    id: policy.id,
                    key: policy.key.clone(),
                    name: policy.name.clone(),
                    description: policy.description.clone(),
                    cost: policy.cost,
                    cooldown_turns: policy.cooldown_turns,
                    effects: policy.effects.clone(),
                    requirements: policy.requirements.clone(),
                    available_now: turns_left == 0,
                    affordable_now: state
                        .budget
                        .as_ref()
                        .map_or(true, |b| policy.cost <= b.available),
                    requirements_met: policy.unmet_requirement(state).is_none(),
                    turns_left,
                }
            })
            .collect()
    }
}

/// A policy as the presentation layer sees it on the current turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyView {
    pub id: PolicyId,
    pub key: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub cooldown_turns: u32,
    pub effects: Vec<Effect>,
    pub requirements: Vec<Requirement>,
    /// Not on cooldown.
    pub available_now: bool,
    /// Cost alone fits in the remaining budget.
    pub affordable_now: bool,
    pub requirements_met: bool,
    /// Remaining cooldown turns (0 when available).
    pub turns_left: u32,
}

impl PolicyView {
    /// Could be part of a valid selection on its own this turn.
    pub fn selectable(&self) -> bool {
        self.available_now && self.affordable_now && self.requirements_met
    }
}
