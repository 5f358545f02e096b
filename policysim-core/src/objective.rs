//! Win/lose predicates, scoring and indicator ratings.
//!
//! Everything here is a pure function of the current indicator values.

use crate::indicator::{Indicator, IndicatorState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    AtLeast,
    AtMost,
    Above,
    Below,
}

impl Comparison {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::AtLeast => value >= threshold,
            Comparison::AtMost => value <= threshold,
            Comparison::Above => value > threshold,
            Comparison::Below => value < threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::AtLeast => "≥",
            Comparison::AtMost => "≤",
            Comparison::Above => ">",
            Comparison::Below => "<",
        }
    }
}

/// Threshold predicate `indicator <cmp> threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub indicator: Indicator,
    pub cmp: Comparison,
    pub threshold: f64,
}

impl Condition {
    pub const fn at_least(indicator: Indicator, threshold: f64) -> Self {
        Self {
            indicator,
            cmp: Comparison::AtLeast,
            threshold,
        }
    }

    pub const fn at_most(indicator: Indicator, threshold: f64) -> Self {
        Self {
            indicator,
            cmp: Comparison::AtMost,
            threshold,
        }
    }

    pub const fn above(indicator: Indicator, threshold: f64) -> Self {
        Self {
            indicator,
            cmp: Comparison::Above,
            threshold,
        }
    }

    pub const fn below(indicator: Indicator, threshold: f64) -> Self {
        Self {
            indicator,
            cmp: Comparison::Below,
            threshold,
        }
    }

    /// False when the indicator is not tracked.
    pub fn holds(&self, indicators: &IndicatorState) -> bool {
        indicators
            .get(self.indicator)
            .is_some_and(|value| self.cmp.holds(value, self.threshold))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.indicator.label(),
            self.cmp.symbol(),
            self.threshold
        )
    }
}

/// A victory objective: met when every condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub key: String,
    pub label: String,
    pub conditions: Vec<Condition>,
}

impl Objective {
    pub fn new(key: &str, label: &str, conditions: &[Condition]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            conditions: conditions.to_vec(),
        }
    }

    pub fn is_met(&self, indicators: &IndicatorState) -> bool {
        !self.conditions.is_empty() && self.conditions.iter().all(|c| c.holds(indicators))
    }

    /// Human-readable target, e.g. `"GDP growth rate ≥ 4"`.
    pub fn target(&self) -> String {
        self.conditions
            .iter()
            .map(Condition::to_string)
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

/// A hard-failure predicate; any one holding ends the game in defeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureCondition {
    pub key: String,
    pub label: String,
    pub condition: Condition,
}

impl FailureCondition {
    pub fn new(key: &str, label: &str, condition: Condition) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            condition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBonus {
    pub condition: Condition,
    pub points: u32,
}

/// `per_objective × completed + Σ bonuses that hold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRule {
    pub per_objective: u32,
    pub bonuses: Vec<ScoreBonus>,
}

impl ScoreRule {
    pub fn score(&self, completed: usize, indicators: &IndicatorState) -> u32 {
        let base = self.per_objective.saturating_mul(completed as u32);
        self.bonuses
            .iter()
            .filter(|b| b.condition.holds(indicators))
            .fold(base, |acc, b| acc.saturating_add(b.points))
    }
}

/// Result of a win/lose check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Continue,
    Victory,
    /// First failure predicate that holds, by key.
    Defeat { failure: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub completed: BTreeMap<String, bool>,
    pub completed_count: usize,
    pub verdict: Verdict,
}

/// Per-objective completion flags, keyed by objective key.
pub fn objective_status(
    objectives: &[Objective],
    indicators: &IndicatorState,
) -> BTreeMap<String, bool> {
    objectives
        .iter()
        .map(|o| (o.key.clone(), o.is_met(indicators)))
        .collect()
}

pub fn completed_count(objectives: &[Objective], indicators: &IndicatorState) -> usize {
    objectives.iter().filter(|o| o.is_met(indicators)).count()
}

pub fn first_failure<'a>(
    failures: &'a [FailureCondition],
    indicators: &IndicatorState,
) -> Option<&'a FailureCondition> {
    failures.iter().find(|f| f.condition.holds(indicators))
}

/// Evaluate objectives and failure predicates.
///
/// Victory is checked first and wins a tie with a simultaneous failure.
pub fn evaluate(
    objectives: &[Objective],
    objectives_to_win: usize,
    failures: &[FailureCondition],
    indicators: &IndicatorState,
) -> Evaluation {
    let completed = objective_status(objectives, indicators);
    let completed_count = completed.values().filter(|&&met| met).count();

    let verdict = if objectives_to_win > 0 && completed_count >= objectives_to_win {
        Verdict::Victory
    } else if let Some(failure) = first_failure(failures, indicators) {
        Verdict::Defeat {
            failure: failure.key.clone(),
        }
    } else {
        Verdict::Continue
    };

    Evaluation {
        completed,
        completed_count,
        verdict,
    }
}

/// Coarse health of an indicator value, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Good,
    Neutral,
    Bad,
}

/// Good and bad bands for one indicator. Good is checked first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBand {
    pub indicator: Indicator,
    /// Any holding condition marks the value good.
    pub good: Vec<Condition>,
    /// Checked only when not good.
    pub bad: Vec<Condition>,
    /// When true, `good` requires every condition (e.g. a target interval).
    #[serde(default)]
    pub good_requires_all: bool,
}

impl RatingBand {
    pub fn rate(&self, value: f64) -> Rating {
        let hit = |c: &Condition| c.cmp.holds(value, c.threshold);
        let good = if self.good_requires_all {
            !self.good.is_empty() && self.good.iter().all(hit)
        } else {
            self.good.iter().any(hit)
        };
        if good {
            Rating::Good
        } else if self.bad.iter().any(hit) {
            Rating::Bad
        } else {
            Rating::Neutral
        }
    }
}

/// Rate every tracked indicator; indicators without a band are neutral.
pub fn rate_all(bands: &[RatingBand], indicators: &IndicatorState) -> BTreeMap<Indicator, Rating> {
    indicators
        .iter()
        .map(|(id, value)| {
            let rating = bands
                .iter()
                .find(|b| b.indicator == id)
                .map_or(Rating::Neutral, |b| b.rate(value));
            (id, rating)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::IndicatorDef;

    fn indicators(gdp: f64, unemployment: f64, carbon: f64, gini: f64) -> IndicatorState {
        IndicatorState::new(&[
            IndicatorDef::new(Indicator::GdpGrowth, gdp, -5.0, 10.0),
            IndicatorDef::new(Indicator::Unemployment, unemployment, 0.0, 25.0),
            IndicatorDef::new(Indicator::CarbonIndex, carbon, 0.0, 200.0),
            IndicatorDef::new(Indicator::Gini, gini, 0.2, 0.8),
        ])
    }

    fn objectives() -> Vec<Objective> {
        vec![
            Objective::new("growth", "Growth", &[Condition::at_least(Indicator::GdpGrowth, 4.0)]),
            Objective::new(
                "jobs",
                "Jobs",
                &[Condition::at_most(Indicator::Unemployment, 4.0)],
            ),
            Objective::new(
                "green",
                "Green",
                &[Condition::at_most(Indicator::CarbonIndex, 70.0)],
            ),
            Objective::new("fair", "Fair", &[Condition::at_most(Indicator::Gini, 0.35)]),
        ]
    }

    fn failures() -> Vec<FailureCondition> {
        vec![FailureCondition::new(
            "inequality",
            "Inequality crisis",
            Condition::above(Indicator::Gini, 0.6),
        )]
    }

    #[test]
    fn test_three_of_four_objectives_is_victory() {
        let state = indicators(4.5, 3.5, 60.0, 0.45);
        let eval = evaluate(&objectives(), 3, &failures(), &state);

        assert_eq!(eval.completed_count, 3);
        assert!(!eval.completed["fair"]);
        assert_eq!(eval.verdict, Verdict::Victory);
    }

    #[test]
    fn test_two_objectives_continue() {
        let state = indicators(4.5, 3.5, 100.0, 0.45);
        let eval = evaluate(&objectives(), 3, &failures(), &state);
        assert_eq!(eval.completed_count, 2);
        assert_eq!(eval.verdict, Verdict::Continue);
    }

    #[test]
    fn test_failure_predicate_is_defeat() {
        let state = indicators(2.5, 6.0, 100.0, 0.65);
        let eval = evaluate(&objectives(), 3, &failures(), &state);
        assert_eq!(
            eval.verdict,
            Verdict::Defeat {
                failure: "inequality".to_string()
            }
        );
    }

    #[test]
    fn test_victory_takes_precedence_over_failure() {
        let state = indicators(4.5, 3.5, 60.0, 0.65);
        let eval = evaluate(&objectives(), 3, &failures(), &state);
        assert_eq!(eval.verdict, Verdict::Victory);
    }

    #[test]
    fn test_composite_objective_needs_all_conditions() {
        let composite = Objective::new(
            "balanced",
            "Balanced",
            &[
                Condition::at_most(Indicator::Gini, 0.3),
                Condition::at_least(Indicator::GdpGrowth, 4.0),
            ],
        );
        assert!(!composite.is_met(&indicators(5.0, 5.0, 100.0, 0.4)));
        assert!(composite.is_met(&indicators(5.0, 5.0, 100.0, 0.3)));
        assert_eq!(
            composite.target(),
            "Gini coefficient ≤ 0.3 and GDP growth rate ≥ 4"
        );
    }

    #[test]
    fn test_untracked_indicator_condition_is_false() {
        let cond = Condition::at_least(Indicator::Health, 0.0);
        assert!(!cond.holds(&indicators(0.0, 0.0, 0.0, 0.3)));
    }

    #[test]
    fn test_score_rule() {
        let rule = ScoreRule {
            per_objective: 25,
            bonuses: vec![
                ScoreBonus {
                    condition: Condition::at_least(Indicator::GdpGrowth, 3.0),
                    points: 10,
                },
                ScoreBonus {
                    condition: Condition::at_most(Indicator::Unemployment, 5.0),
                    points: 10,
                },
            ],
        };
        let state = indicators(3.0, 6.0, 100.0, 0.45);
        assert_eq!(rule.score(2, &state), 60);
    }

    #[test]
    fn test_rating_band_interval() {
        let band = RatingBand {
            indicator: Indicator::Inflation,
            good: vec![
                Condition::at_least(Indicator::Inflation, 1.0),
                Condition::at_most(Indicator::Inflation, 3.0),
            ],
            bad: vec![
                Condition::at_least(Indicator::Inflation, 5.0),
                Condition::at_most(Indicator::Inflation, -1.0),
            ],
            good_requires_all: true,
        };
        assert_eq!(band.rate(2.0), Rating::Good);
        assert_eq!(band.rate(4.0), Rating::Neutral);
        assert_eq!(band.rate(6.0), Rating::Bad);
        assert_eq!(band.rate(-1.5), Rating::Bad);
    }
}
