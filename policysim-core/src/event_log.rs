//! Structured record of everything that happened during a game.
//!
//! The engine appends one [`GameEvent`] per notable transition to
//! [`crate::GameState::log`]. Events serialize with an internal `type` tag,
//! e.g. `{"type":"policy_enacted","turn":1,...}`, so a presentation layer can
//! stream them as JSON lines or render a turn summary.

use crate::indicator::Indicator;
use crate::policy::PolicyId;
use crate::state::{EndReason, Outcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A policy was enacted. `applied` holds the jittered deltas actually applied.
    PolicyEnacted {
        turn: u32,
        policy: PolicyId,
        key: String,
        cost: u32,
        applied: Vec<(Indicator, f64)>,
    },

    /// A random event fired after the policy phase.
    RandomEvent { turn: u32, key: String, name: String },

    /// The game moved to a new turn.
    TurnAdvanced {
        turn: u32,
        budget: Option<u32>,
        completed_objectives: usize,
    },

    GameEnded {
        turn: u32,
        outcome: Outcome,
        reason: EndReason,
        score: Option<u32>,
    },
}

impl GameEvent {
    pub fn turn(&self) -> u32 {
        match self {
            GameEvent::PolicyEnacted { turn, .. }
            | GameEvent::RandomEvent { turn, .. }
            | GameEvent::TurnAdvanced { turn, .. }
            | GameEvent::GameEnded { turn, .. } => *turn,
        }
    }

    /// Stable snake_case name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::PolicyEnacted { .. } => "policy_enacted",
            GameEvent::RandomEvent { .. } => "random_event",
            GameEvent::TurnAdvanced { .. } => "turn_advanced",
            GameEvent::GameEnded { .. } => "game_ended",
        }
    }
}

/// Events that happened on `turn`, in order.
pub fn events_for_turn(log: &[GameEvent], turn: u32) -> impl Iterator<Item = &GameEvent> {
    log.iter().filter(move |e| e.turn() == turn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = GameEvent::RandomEvent {
            turn: 3,
            key: "trade_agreement".to_string(),
            name: "Trade agreement".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with("{\"type\":\"random_event\""));
        assert_eq!(event.kind(), "random_event");
    }

    #[test]
    fn test_game_ended_round_trips() {
        let event = GameEvent::GameEnded {
            turn: 12,
            outcome: Outcome::Defeat,
            reason: EndReason::TurnLimit,
            score: Some(40),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_events_for_turn_filters() {
        let log = vec![
            GameEvent::TurnAdvanced {
                turn: 2,
                budget: Some(100),
                completed_objectives: 0,
            },
            GameEvent::RandomEvent {
                turn: 2,
                key: "a".to_string(),
                name: "A".to_string(),
            },
            GameEvent::TurnAdvanced {
                turn: 3,
                budget: Some(100),
                completed_objectives: 1,
            },
        ];
        assert_eq!(events_for_turn(&log, 2).count(), 2);
        assert_eq!(events_for_turn(&log, 4).count(), 0);
    }
}
