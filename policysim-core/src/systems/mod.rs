//! Per-turn systems run by [`crate::SimulationEngine::advance_turn`].

pub mod budget;
pub mod cooldowns;
pub mod drift;

pub use budget::{run_budget_tick, BudgetConfig};
pub use cooldowns::run_cooldown_tick;
pub use drift::{run_drift_tick, DriftConfig};
