//! # Policy Simulation Core
//!
//! Deterministic turn-based economic policy simulation.
//!
//! A player picks policies each turn under budget and cooldown constraints.
//! Their effects (with a little noise, plus the occasional random event) move
//! a fixed set of clamped economic indicators, and the game ends on victory,
//! on a failure predicate or when the turns run out. Presentation is someone
//! else's job: the engine takes plain commands and hands back plain snapshots.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────────┐     ┌──────────────────┐
//! │ UI/AiPlayer │────▶│ apply_policies │────▶│ validate, spend, │
//! │  (decide)   │     │ (PolicyId list)│     │ effects, event   │
//! └─────────────┘     └────────────────┘     └────────┬─────────┘
//!        ▲                                            │
//!        │            ┌────────────────┐     ┌────────▼─────────┐
//!        └────────────│  GameSnapshot  │◀────│  advance_turn    │
//!                     │  (read-only)   │     │ budget, cooldown,│
//!                     └────────────────┘     │ drift, history   │
//!                                            └──────────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SimulationEngine`] | Owns the [`GameState`] and random source; the only mutator |
//! | [`SimConfig`] | Scenario data: indicators, policies, rules (`standard`, `classic`) |
//! | [`PolicyCatalog`] | Policy definitions and selection validation |
//! | [`IndicatorState`] | Clamped indicator values |
//! | [`RandomSource`] | Injectable randomness ([`SeededRng`], [`FixedRng`]) |
//! | [`GameSnapshot`] | Serializable view for a presentation layer |
//! | [`AiPlayer`] | Autoplay agents ([`GreedyAi`], [`RandomAi`]) |
//!
//! ## Example
//!
//! ```
//! use policysim_core::{PolicyId, SimConfig, SimulationEngine};
//!
//! let mut engine = SimulationEngine::with_seed(SimConfig::standard(), 42);
//! let report = engine.apply_policies(&[PolicyId(7)]).unwrap();
//! println!("event: {:?}", report.triggered_event.map(|e| e.name));
//! engine.advance_turn().unwrap();
//! assert_eq!(engine.snapshot().turn, 2);
//! ```

pub mod ai;
pub mod config;
pub mod engine;
pub mod event;
pub mod event_log;
pub mod indicator;
pub mod objective;
pub mod policy;
pub mod rng;
pub mod scenario;
pub mod state;
pub mod systems;
pub mod testing;

pub use ai::{run_game, AiPlayer, GreedyAi, RandomAi};
pub use config::{ConfigError, SimConfig};
pub use engine::{ApplyReport, EnactedPolicy, EngineError, SimulationEngine, TurnReport};
pub use event::{EventTable, RandomEvent};
pub use event_log::GameEvent;
pub use indicator::{Bounded, Indicator, IndicatorDef, IndicatorState};
pub use objective::{Condition, FailureCondition, Objective, Rating, ScoreRule};
pub use policy::{
    Effect, PolicyCatalog, PolicyDef, PolicyError, PolicyId, PolicyView, Requirement,
    SelectionRule,
};
pub use rng::{FixedRng, RandomSource, SeededRng};
pub use state::{Budget, EndReason, Ending, GameSnapshot, GameState, Outcome, Phase};
