use crate::ai::AiPlayer;
use crate::config::SimConfig;
use crate::indicator::Indicator;
use crate::objective::{Comparison, Condition, FailureCondition};
use crate::policy::{PolicyId, PolicyView, SelectionRule};
use crate::state::GameSnapshot;
use std::collections::BTreeMap;

/// Reward for closing the whole range-width gap toward an unmet objective.
const OBJECTIVE_WEIGHT: f64 = 10.0;
/// Flat penalty for a policy that would break a currently met objective.
const BREAK_PENALTY: f64 = 2.0;
const FAILURE_WEIGHT: f64 = 1.0;

/// A deterministic, one-turn-lookahead AI.
///
/// Scores every selectable policy by how far its nominal effects push unmet
/// objective conditions toward their thresholds, minus penalties for breaking
/// met objectives or drifting toward a failure predicate.
pub struct GreedyAi {
    objectives: Vec<Vec<Condition>>,
    failures: Vec<FailureCondition>,
    /// Range width per indicator, used to compare deltas across units.
    scale: BTreeMap<Indicator, f64>,
}

impl GreedyAi {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            objectives: config
                .objectives
                .iter()
                .map(|o| o.conditions.clone())
                .collect(),
            failures: config.failures.clone(),
            scale: config
                .indicators
                .iter()
                .map(|d| (d.id, (d.max - d.min).max(f64::EPSILON)))
                .collect(),
        }
    }

    fn score_policy(&self, policy: &PolicyView, snapshot: &GameSnapshot) -> f64 {
        let mut score = 0.0;

        for effect in &policy.effects {
            let Some(&value) = snapshot.indicators.get(&effect.indicator) else {
                continue;
            };
            let scale = self.scale.get(&effect.indicator).copied().unwrap_or(1.0);
            let push = effect.delta / scale;
            let after = value + effect.delta;

            for cond in self.objectives.iter().flatten() {
                if cond.indicator != effect.indicator {
                    continue;
                }
                if !cond.cmp.holds(value, cond.threshold) {
                    score += OBJECTIVE_WEIGHT * toward(cond.cmp, push);
                } else if !cond.cmp.holds(after, cond.threshold) {
                    score -= BREAK_PENALTY;
                }
            }

            for failure in &self.failures {
                let cond = failure.condition;
                if cond.indicator != effect.indicator || toward(cond.cmp, push) <= 0.0 {
                    continue;
                }
                let distance = (cond.threshold - value).abs() / scale;
                score -= FAILURE_WEIGHT * push.abs() / (distance + 0.05);
            }
        }

        score
    }
}

/// Signed progress of `push` in the direction `cmp` wants.
fn toward(cmp: Comparison, push: f64) -> f64 {
    match cmp {
        Comparison::AtLeast | Comparison::Above => push,
        Comparison::AtMost | Comparison::Below => -push,
    }
}

impl AiPlayer for GreedyAi {
    fn name(&self) -> &'static str {
        "GreedyAi"
    }

    fn decide(&mut self, snapshot: &GameSnapshot, policies: &[PolicyView]) -> Vec<PolicyId> {
        let mut ranked: Vec<(&PolicyView, f64)> = policies
            .iter()
            .filter(|p| p.selectable())
            .map(|p| (p, self.score_policy(p, snapshot)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.id.cmp(&b.0.id)));

        match snapshot.selection {
            SelectionRule::Exactly { count } => {
                ranked.into_iter().take(count).map(|(p, _)| p.id).collect()
            }
            SelectionRule::AtLeastOne => {
                let mut remaining = snapshot.budget;
                let mut chosen = Vec::new();
                for (policy, score) in ranked {
                    // Always enact the best option; extras only if they help.
                    if !chosen.is_empty() && score <= 0.0 {
                        break;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::run_game;
    use crate::engine::SimulationEngine;
    use crate::rng::FixedRng;

    #[test]
    fn test_greedy_prefers_objective_progress() {
        let config = SimConfig::standard();
        let engine = SimulationEngine::new(config.clone(), FixedRng::neutral());
        let ai = GreedyAi::new(&config);
        let snapshot = engine.snapshot();
        let views = engine.list_policies();

        let green = views.iter().find(|p| p.key == "green_subsidy").unwrap();
        let tax_cut = views.iter().find(|p| p.key == "tax_cut").unwrap();

        // Cutting carbon works toward an unmet objective; a tax cut widens inequality.
        assert!(ai.score_policy(green, &snapshot) > ai.score_policy(tax_cut, &snapshot));
    }

    #[test]
    fn test_greedy_stays_within_budget() {
        let config = SimConfig::standard();
        let engine = SimulationEngine::new(config.clone(), FixedRng::neutral());
        let mut ai = GreedyAi::new(&config);

        let picks = ai.decide(&engine.snapshot(), &engine.list_policies());

        assert!(!picks.is_empty());
        let cost: u32 = picks
            .iter()
            .map(|id| engine.catalog().get(*id).unwrap().cost)
            .sum();
        assert!(cost <= 100);
    }

    #[test]
    fn test_greedy_plays_classic_to_the_end() {
        let config = SimConfig::classic();
        let mut engine = SimulationEngine::new(config.clone(), FixedRng::neutral());
        let mut ai = GreedyAi::new(&config);

        let ending = run_game(&mut engine, &mut ai).unwrap();
        assert!(ending.turn <= config.max_turns + 1);
    }
}
