//! Autoplay agents.
//!
//! An [`AiPlayer`] sees exactly what a presentation layer sees, the
//! [`GameSnapshot`] and the [`PolicyView`] list, and returns a selection of
//! policy ids. [`run_game`] drives an engine to completion with one.
//!
//! # Determinism
//!
//! Implementations must be deterministic given the same seed, so that an
//! autoplayed game replays identically.

mod greedy;

pub use greedy::GreedyAi;

use crate::engine::{EngineError, SimulationEngine};
use crate::policy::{PolicyId, PolicyView, SelectionRule};
use crate::rng::RandomSource;
use crate::state::{Ending, GameSnapshot, Phase};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

/// Policy-picking strategy.
pub trait AiPlayer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Choose this turn's selection.
    ///
    /// Must honour the snapshot's selection rule and remaining budget; only
    /// policies flagged [`PolicyView::selectable`] may be chosen.
    fn decide(&mut self, snapshot: &GameSnapshot, policies: &[PolicyView]) -> Vec<PolicyId>;
}

/// Picks a random affordable subset of the selectable policies.
pub struct RandomAi {
    rng: rand::rngs::StdRng,
}

impl RandomAi {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }
}

impl AiPlayer for RandomAi {
    fn name(&self) -> &'static str {
        "RandomAi"
    }

    fn decide(&mut self, snapshot: &GameSnapshot, policies: &[PolicyView]) -> Vec<PolicyId> {
        let mut candidates: Vec<&PolicyView> = policies.iter().filter(|p| p.selectable()).collect();
        candidates.shuffle(&mut self.rng);

        match snapshot.selection {
            SelectionRule::Exactly { count } => {
                candidates.into_iter().take(count).map(|p| p.id).collect()
            }
            SelectionRule::AtLeastOne => {
                let mut remaining = snapshot.budget;
                let mut chosen = Vec::new();
                for policy in candidates {
                    // The first pick is always taken; later ones on a coin flip.
                    if !chosen.is_empty() && !self.rng.gen::<bool>() {
                        continue;
                    }
                    match remaining {
                        Some(left) if policy.cost > left => continue,
                        Some(left) => remaining = Some(left - policy.cost),
                        None => {}
                    }
                    chosen.push(policy.id);
                }
                chosen
            }
        }
    }
}

/// Play `engine` to the end with `player`, returning how the game ended.
pub fn run_game<R: RandomSource>(
    engine: &mut SimulationEngine<R>,
    player: &mut dyn AiPlayer,
) -> Result<Ending, EngineError> {
    loop {
        if let Some(ending) = engine.state().ending() {
            return Ok(ending.clone());
        }
        if engine.state().phase == Phase::AwaitingNextTurn {
            engine.advance_turn()?;
            continue;
        }

        let snapshot = engine.snapshot();
        let policies = engine.list_policies();
        let selection = player.decide(&snapshot, &policies);
        log::debug!(
            "{} picks {:?} on turn {}",
            player.name(),
            selection,
            snapshot.turn
        );
        engine.apply_policies(&selection)?;
    }
}
