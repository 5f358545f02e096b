//! Helpers for tests: a scripted random source and a game-state builder.

use crate::config::SimConfig;
use crate::indicator::Indicator;
use crate::policy::PolicyId;
use crate::rng::RandomSource;
use crate::state::{Budget, GameState, Phase};

/// Replays a fixed list of samples and counts how many were drawn.
///
/// Panics when the script runs out, which makes an unexpected extra draw
/// fail the test loudly.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    samples: Vec<f64>,
    cursor: usize,
    repeat: bool,
}

impl ScriptedRng {
    pub fn new(samples: &[f64]) -> Self {
        Self {
            samples: samples.to_vec(),
            cursor: 0,
            repeat: false,
        }
    }

    /// Returns `sample` for every draw.
    pub fn repeating(sample: f64) -> Self {
        Self {
            samples: vec![sample],
            cursor: 0,
            repeat: true,
        }
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        let idx = if self.repeat { 0 } else { self.cursor };
        let Some(&sample) = self.samples.get(idx) else {
            panic!(
                "ScriptedRng exhausted after {} draws ({} scripted)",
                self.cursor,
                self.samples.len()
            );
        };
        self.cursor += 1;
        sample
    }
}

pub struct StateBuilder {
    state: GameState,
}

impl StateBuilder {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            state: GameState::new(config),
        }
    }

    pub fn standard() -> Self {
        Self::new(&SimConfig::standard())
    }

    pub fn classic() -> Self {
        Self::new(&SimConfig::classic())
    }

    pub fn turn(mut self, turn: u32) -> Self {
        self.state.turn = turn;
        self
    }

    /// Sets the available budget, enabling the budget if the scenario had none.
    pub fn budget(mut self, available: u32) -> Self {
        let max = self.state.budget.map_or(100, |b| b.max).max(available);
        self.state.budget = Some(Budget { available, max });
        if let Some(last) = self.state.budget_history.last_mut() {
            *last = available;
        } else {
            self.state.budget_history.push(available);
        }
        self
    }

    pub fn without_budget(mut self) -> Self {
        self.state.budget = None;
        self.state.budget_history.clear();
        self
    }

    pub fn cooldown(mut self, id: PolicyId, turns: u32) -> Self {
        if turns == 0 {
            self.state.cooldowns.remove(&id);
        } else {
            self.state.cooldowns.insert(id, turns);
        }
        self
    }

    /// Overrides a tracked indicator (clamped), including its latest history entry.
    pub fn indicator(mut self, id: Indicator, value: f64) -> Self {
        self.state.indicators.set(id, value);
        if let (Some(current), Some(last)) = (
            self.state.indicators.get(id),
            self.state.history.get_mut(&id).and_then(|h| h.last_mut()),
        ) {
            *last = current;
        }
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.state.phase = phase;
        self
    }

    pub fn build(self) -> GameState {
        self.state
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::standard()
    }
}
