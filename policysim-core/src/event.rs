//! Random events rolled once per policy phase.

use crate::indicator::IndicatorState;
use crate::policy::Effect;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// An exogenous shock. Effects are applied exactly, without jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub key: String,
    pub name: String,
    pub description: String,
    pub effects: Vec<Effect>,
}

impl RandomEvent {
    pub fn new(key: &str, name: &str, description: &str, effects: &[Effect]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            effects: effects.to_vec(),
        }
    }

    pub fn apply(&self, indicators: &mut IndicatorState) {
        for effect in &self.effects {
            indicators.apply_delta(effect.indicator, effect.delta);
        }
    }
}

/// Fixed table of events plus the chance that one fires on a given turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventTable {
    /// Probability in `[0, 1]` that an event fires after policies are applied.
    pub trigger_chance: f64,
    pub events: Vec<RandomEvent>,
}

impl EventTable {
    pub fn new(trigger_chance: f64, events: Vec<RandomEvent>) -> Self {
        Self {
            trigger_chance,
            events,
        }
    }

    /// A table that never fires.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.trigger_chance > 0.0 && !self.events.is_empty()
    }

    /// Roll the trigger and, on success, pick one event uniformly.
    ///
    /// Draws nothing when the table is disabled; otherwise one draw for the
    /// trigger and, if it fires, one draw for the pick.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&RandomEvent> {
        if !self.is_enabled() {
            return None;
        }
        if !rng.chance(self.trigger_chance) {
            return None;
        }
        let idx = rng.pick(self.events.len());
        self.events.get(idx)
    }
}
