use crate::state::GameState;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Policy budget parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub initial: u32,
    pub max: u32,
    /// Points restored at the start of every turn, capped at `max`.
    pub grant_per_turn: u32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            initial: 100,
            max: 100,
            grant_per_turn: 30,
        }
    }
}

/// Replenishes the policy budget: `available = min(max, available + grant)`.
#[instrument(skip_all, name = "budget")]
pub fn run_budget_tick(state: &mut GameState, config: &BudgetConfig) {
    if let Some(budget) = state.budget.as_mut() {
        let before = budget.available;
        budget.available = budget
            .available
            .saturating_add(config.grant_per_turn)
            .min(budget.max);
        log::debug!("Budget replenished: {} -> {}", before, budget.available);
    }
}

/// Deducts `cost` from the budget. Callers validate affordability first.
pub fn spend(state: &mut GameState, cost: u32) {
    if let Some(budget) = state.budget.as_mut() {
        budget.available = budget.available.saturating_sub(cost);
    }
}
