//! Unit tests for engine.rs turn sequencing.
use super::*;
use crate::indicator::Indicator;
use crate::rng::FixedRng;
use crate::testing::{ScriptedRng, StateBuilder};

const TAX_CUT: PolicyId = PolicyId(0);
const EDUCATION: PolicyId = PolicyId(2);
const SOCIAL_SECURITY: PolicyId = PolicyId(4);
const HEALTHCARE: PolicyId = PolicyId(6);
const LABOUR_MARKET: PolicyId = PolicyId(7);
const MONETARY_EASING: PolicyId = PolicyId(9);

fn state_json<R: RandomSource>(engine: &SimulationEngine<R>) -> String {
    serde_json::to_string(engine.state()).unwrap()
}

fn neutral_standard() -> SimulationEngine<FixedRng> {
    SimulationEngine::new(SimConfig::standard(), FixedRng::neutral())
}

fn value<R: RandomSource>(engine: &SimulationEngine<R>, id: Indicator) -> f64 {
    engine.state().indicators.get(id).unwrap()
}

#[test]
fn test_unemployment_policy_without_jitter() {
    let mut engine = neutral_standard();
    assert_eq!(value(&engine, Indicator::Unemployment), 6.0);

    let report = engine.apply_policies(&[LABOUR_MARKET]).unwrap();

    assert!((value(&engine, Indicator::Unemployment) - 5.0).abs() < 1e-9);
    assert_eq!(report.outcome, Outcome::Continue);
    assert!(report.triggered_event.is_none());
    assert_eq!(report.enacted.len(), 1);
    assert_eq!(report.enacted[0].key, "labour_market_reform");
}

#[test]
fn test_jitter_scales_effects() {
    // All-zero samples give the lowest multiplier, 0.9; the fifth draw is the event roll.
    let mut engine = SimulationEngine::new(
        SimConfig::standard(),
        ScriptedRng::new(&[0.0, 0.0, 0.0, 0.0, 0.9]),
    );
    engine.apply_policies(&[LABOUR_MARKET]).unwrap();

    assert!((value(&engine, Indicator::Unemployment) - 5.1).abs() < 1e-9);
    assert_eq!(engine.rng().draws(), 5);
}

#[test]
fn test_budget_exceeded_leaves_state_untouched() {
    let state = StateBuilder::standard().budget(20).build();
    let mut engine =
        SimulationEngine::from_state(SimConfig::standard(), state, ScriptedRng::new(&[]));
    let before = state_json(&engine);

    let err = engine
        .apply_policies(&[TAX_CUT, MONETARY_EASING])
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::Policy(PolicyError::BudgetExceeded {
            required: 25,
            available: 20
        })
    );
    assert_eq!(engine.state().budget.unwrap().available, 20);
    assert_eq!(state_json(&engine), before);
    assert_eq!(engine.rng().draws(), 0);
}

#[test]
fn test_cooldown_rejection_leaves_state_untouched() {
    let state = StateBuilder::standard().cooldown(TAX_CUT, 2).build();
    let mut engine =
        SimulationEngine::from_state(SimConfig::standard(), state, ScriptedRng::new(&[]));
    let before = state_json(&engine);

    let err = engine.apply_policies(&[TAX_CUT]).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Policy(PolicyError::Unavailable { turns_left: 2, .. })
    ));
    assert_eq!(state_json(&engine), before);
}

#[test]
fn test_requirement_rejection_leaves_state_untouched() {
    let state = StateBuilder::standard()
        .indicator(Indicator::Inflation, 6.0)
        .build();
    let mut engine =
        SimulationEngine::from_state(SimConfig::standard(), state, ScriptedRng::new(&[]));
    let before = state_json(&engine);

    let err = engine.apply_policies(&[MONETARY_EASING]).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Policy(PolicyError::RequirementUnmet { .. })
    ));
    assert_eq!(state_json(&engine), before);
}

#[test]
fn test_cooldowns_match_catalog_after_apply() {
    let mut engine = neutral_standard();
    let selection = [EDUCATION, HEALTHCARE, MONETARY_EASING];
    engine.apply_policies(&selection).unwrap();

    for id in selection {
        let expected = engine.catalog().get(id).unwrap().cooldown_turns;
        assert_eq!(engine.state().cooldown(id), expected);
    }
    assert_eq!(engine.state().budget.unwrap().available, 100 - 18 - 20 - 10);

    let views = engine.list_policies();
    assert!(!views[EDUCATION.0 as usize].available_now);
    assert_eq!(views[EDUCATION.0 as usize].turns_left, 3);
}

#[test]
fn test_classic_sets_no_cooldowns() {
    let mut engine = SimulationEngine::new(SimConfig::classic(), ScriptedRng::new(&[]));
    engine
        .apply_policies(&[PolicyId(0), PolicyId(1), PolicyId(2)])
        .unwrap();

    assert!(engine.state().cooldowns.is_empty());
    assert!(engine.state().budget.is_none());
    assert_eq!(engine.rng().draws(), 0);
}

#[test]
fn test_classic_requires_exactly_three() {
    let mut engine = SimulationEngine::new(SimConfig::classic(), FixedRng::neutral());
    let err = engine.apply_policies(&[PolicyId(0)]).unwrap_err();
    assert_eq!(
        err,
        EngineError::Policy(PolicyError::WrongCount {
            expected: 3,
            actual: 1
        })
    );
}

#[test]
fn test_calls_must_alternate() {
    let mut engine = neutral_standard();

    assert_eq!(
        engine.advance_turn().unwrap_err(),
        EngineError::OutOfSequence {
            expected: "awaiting_next_turn",
            found: "select_policies"
        }
    );

    engine.apply_policies(&[LABOUR_MARKET]).unwrap();
    assert_eq!(
        engine.apply_policies(&[TAX_CUT]).unwrap_err(),
        EngineError::OutOfSequence {
            expected: "select_policies",
            found: "awaiting_next_turn"
        }
    );

    engine.advance_turn().unwrap();
    assert!(matches!(
        engine.advance_turn(),
        Err(EngineError::OutOfSequence { .. })
    ));
}

#[test]
fn test_advance_replenishes_budget_and_decays_cooldowns() {
    let mut engine = neutral_standard();
    engine
        .apply_policies(&[SOCIAL_SECURITY, MONETARY_EASING])
        .unwrap();
    assert_eq!(engine.state().budget.unwrap().available, 65);

    let report = engine.advance_turn().unwrap();

    assert_eq!(report.turn, 2);
    assert_eq!(engine.state().budget.unwrap().available, 95);
    assert_eq!(engine.state().budget_history, vec![100, 95]);
    assert_eq!(engine.state().cooldown(SOCIAL_SECURITY), 1);
    assert_eq!(engine.state().cooldown(MONETARY_EASING), 0);
    assert!(engine.state().enacted.is_empty());
}

#[test]
fn test_history_length_tracks_turn() {
    let mut engine = SimulationEngine::with_seed(SimConfig::standard(), 7);

    while !engine.state().is_finished() {
        let pick = engine
            .list_policies()
            .into_iter()
            .filter(|p| p.selectable())
            .min_by_key(|p| p.cost)
            .unwrap();
        let applied = engine.apply_policies(&[pick.id]).unwrap();
        if applied.ending.is_some() {
            break;
        }

        engine.advance_turn().unwrap();
        let turn = engine.state().turn as usize;
        assert!(engine.state().history.values().all(|h| h.len() == turn));
        assert_eq!(engine.state().budget_history.len(), turn);
    }
}

#[test]
fn test_gini_crisis_is_defeat_on_advance() {
    let state = StateBuilder::classic()
        .indicator(Indicator::Gini, 0.65)
        .phase(Phase::AwaitingNextTurn)
        .build();
    let mut engine = SimulationEngine::from_state(SimConfig::classic(), state, FixedRng::neutral());

    let report = engine.advance_turn().unwrap();

    assert_eq!(report.outcome, Outcome::Defeat);
    let ending = report.ending.unwrap();
    assert_eq!(
        ending.reason,
        EndReason::Failure {
            key: "inequality_crisis".to_string(),
            label: "Inequality crisis".to_string()
        }
    );
    assert_eq!(ending.score, None);
    assert!(engine.state().is_finished());
}

#[test]
fn test_three_of_four_objectives_wins() {
    let state = StateBuilder::standard()
        .indicator(Indicator::GdpGrowth, 4.5)
        .indicator(Indicator::Unemployment, 3.5)
        .indicator(Indicator::CarbonIndex, 60.0)
        .phase(Phase::AwaitingNextTurn)
        .build();
    let mut engine =
        SimulationEngine::from_state(SimConfig::standard(), state, FixedRng::neutral());

    let report = engine.advance_turn().unwrap();

    // GDP reverts to 4.3, still above the 4.0 target.
    assert_eq!(report.completed_objectives, 3);
    assert_eq!(report.outcome, Outcome::Victory);
    let ending = engine.state().ending().unwrap();
    assert_eq!(ending.reason, EndReason::ObjectivesMet { completed: 3 });
    assert!(ending.score.unwrap() >= 75);
}

#[test]
fn test_finished_game_rejects_commands() {
    let state = StateBuilder::classic()
        .indicator(Indicator::Gini, 0.65)
        .phase(Phase::AwaitingNextTurn)
        .build();
    let mut engine = SimulationEngine::from_state(SimConfig::classic(), state, FixedRng::neutral());
    engine.advance_turn().unwrap();

    assert_eq!(
        engine
            .apply_policies(&[PolicyId(0), PolicyId(1), PolicyId(2)])
            .unwrap_err(),
        EngineError::GameOver
    );
    assert_eq!(engine.advance_turn().unwrap_err(), EngineError::GameOver);
}

#[test]
fn test_classic_turn_limit() {
    let mut engine = SimulationEngine::new(SimConfig::classic(), FixedRng::neutral());
    let selection = [PolicyId(0), PolicyId(1), PolicyId(2)];

    let mut last = None;
    for _ in 0..10 {
        assert_eq!(
            engine.apply_policies(&selection).unwrap().outcome,
            Outcome::Continue
        );
        last = Some(engine.advance_turn().unwrap());
    }

    let report = last.unwrap();
    assert_eq!(report.turn, 11);
    assert_eq!(report.outcome, Outcome::Defeat);
    assert_eq!(report.ending.unwrap().reason, EndReason::TurnLimit);
    assert_eq!(engine.state().history[&Indicator::Gini].len(), 11);
}

#[test]
fn test_random_event_fires_and_is_logged() {
    // Four jitter draws, then a firing roll and the last event in the table.
    let mut engine = SimulationEngine::new(
        SimConfig::standard(),
        ScriptedRng::new(&[0.5, 0.5, 0.5, 0.5, 0.1, 0.99]),
    );

    let report = engine.apply_policies(&[LABOUR_MARKET]).unwrap();

    let event = report.triggered_event.unwrap();
    assert_eq!(event.key, "trade_agreement");
    // -1.0 from the policy, -0.2 from the event
    assert!((value(&engine, Indicator::Unemployment) - 4.8).abs() < 1e-9);
    assert!(engine
        .state()
        .log
        .iter()
        .any(|e| matches!(e, GameEvent::RandomEvent { key, .. } if key == "trade_agreement")));
}

#[test]
fn test_log_records_turn_sequence() {
    let mut engine = neutral_standard();
    engine.apply_policies(&[LABOUR_MARKET]).unwrap();
    engine.advance_turn().unwrap();

    let kinds: Vec<_> = engine.state().log.iter().map(GameEvent::kind).collect();
    assert_eq!(kinds, vec!["policy_enacted", "turn_advanced"]);
    assert_eq!(engine.state().log[1].turn(), 2);
}

#[test]
fn test_reset_restores_initial_state() {
    let mut engine = SimulationEngine::with_seed(SimConfig::standard(), 3);
    engine.apply_policies(&[LABOUR_MARKET]).unwrap();
    engine.advance_turn().unwrap();

    let snapshot = engine.reset();

    let fresh = SimulationEngine::with_seed(SimConfig::standard(), 3);
    assert_eq!(snapshot, fresh.snapshot());
    assert_eq!(engine.state(), fresh.state());
}

#[test]
fn test_determinism() {
    let play = |seed| {
        let mut engine = SimulationEngine::with_seed(SimConfig::standard(), seed);
        let turns = [
            vec![LABOUR_MARKET, MONETARY_EASING],
            vec![SOCIAL_SECURITY],
            vec![EDUCATION, TAX_CUT],
        ];
        for selection in turns {
            if engine.apply_policies(&selection).is_ok() && !engine.state().is_finished() {
                engine.advance_turn().unwrap();
            }
        }
        serde_json::to_string(engine.state()).unwrap()
    };

    assert_eq!(play(1444), play(1444));
}

#[test]
fn test_victory_beats_simultaneous_failure() {
    // Three objectives met while inflation sits in hyperinflation territory.
    let state = StateBuilder::standard()
        .indicator(Indicator::GdpGrowth, 4.5)
        .indicator(Indicator::Unemployment, 3.5)
        .indicator(Indicator::CarbonIndex, 60.0)
        .indicator(Indicator::Inflation, 12.0)
        .phase(Phase::AwaitingNextTurn)
        .build();
    let mut engine =
        SimulationEngine::from_state(SimConfig::standard(), state, FixedRng::neutral());

    let report = engine.advance_turn().unwrap();

    assert_eq!(report.outcome, Outcome::Victory);
    assert_eq!(
        report.ending.unwrap().reason,
        EndReason::ObjectivesMet { completed: 3 }
    );
    assert!(matches!(
        engine.state().log.last(),
        Some(GameEvent::GameEnded {
            outcome: Outcome::Victory,
            ..
        })
    ));
}

#[test]
fn test_standard_turn_limit() {
    let mut state = StateBuilder::standard()
        .turn(12)
        .phase(Phase::AwaitingNextTurn)
        .build();
    for history in state.history.values_mut() {
        let first = history[0];
        history.resize(12, first);
    }
    state.budget_history.resize(12, 100);
    let mut engine =
        SimulationEngine::from_state(SimConfig::standard(), state, FixedRng::neutral());

    let report = engine.advance_turn().unwrap();

    assert_eq!(report.turn, 13);
    assert_eq!(report.outcome, Outcome::Defeat);
    let ending = report.ending.unwrap();
    assert_eq!(ending.reason, EndReason::TurnLimit);
    assert_eq!(ending.turn, 13);
    // Only the fiscal deficit bonus holds at the starting values.
    assert_eq!(ending.score, Some(10));
    assert!(engine.state().history.values().all(|h| h.len() == 13));
    assert_eq!(engine.state().budget_history.len(), 13);
}
