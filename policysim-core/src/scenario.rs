//! Built-in scenario data.
//!
//! Two scenarios ship with the crate:
//!
//! | | standard | classic |
//! |---|---|---|
//! | Turns | 12 | 10 |
//! | Selection | one or more | exactly three |
//! | Budget / cooldowns | 100 pts, +30/turn / yes | no / no |
//! | Effect jitter | ±10% | none |
//! | Random events | 30% per turn | none |
//! | Natural drift | yes | no |
//! | Win | 3 of 4 objectives | any 1 of 3 composite objectives |

use crate::event::{EventTable, RandomEvent};
use crate::indicator::{Indicator, IndicatorDef};
use crate::objective::{Condition, FailureCondition, Objective, RatingBand, ScoreBonus, ScoreRule};
use crate::policy::{Effect, PolicyCatalog, PolicyDef};

use Indicator::*;

pub const STANDARD_MAX_TURNS: u32 = 12;
pub const STANDARD_OBJECTIVES_TO_WIN: usize = 3;
pub const STANDARD_EVENT_CHANCE: f64 = 0.3;
pub const STANDARD_EFFECT_JITTER: f64 = 0.1;

pub const CLASSIC_MAX_TURNS: u32 = 10;
pub const CLASSIC_POLICIES_PER_TURN: usize = 3;

pub fn standard_indicators() -> Vec<IndicatorDef> {
    vec![
        IndicatorDef::new(GdpGrowth, 2.5, -5.0, 10.0),
        IndicatorDef::new(Unemployment, 6.0, 0.0, 25.0),
        IndicatorDef::new(Inflation, 2.0, -2.0, 15.0),
        IndicatorDef::new(FiscalDeficit, 3.0, -5.0, 20.0),
        IndicatorDef::new(Gini, 0.45, 0.2, 0.8),
        IndicatorDef::new(CarbonIndex, 100.0, 0.0, 200.0),
        IndicatorDef::new(Welfare, 65.0, 0.0, 100.0),
        IndicatorDef::new(Innovation, 60.0, 0.0, 100.0),
        IndicatorDef::new(Education, 70.0, 0.0, 100.0),
        IndicatorDef::new(Health, 75.0, 0.0, 100.0),
    ]
}

pub fn standard_policies() -> PolicyCatalog {
    PolicyCatalog::from_defs([
        PolicyDef::new(
            0,
            "tax_cut",
            "Tax cut",
            "Lower personal and corporate tax rates to stimulate growth, at the cost of a wider deficit.",
        )
        .cost(15)
        .cooldown(2)
        .effect(GdpGrowth, 0.8)
        .effect(Unemployment, -0.3)
        .effect(FiscalDeficit, 1.2)
        .effect(Gini, 0.02)
        .requires_at_most(FiscalDeficit, 8.0),
        PolicyDef::new(
            1,
            "infrastructure",
            "Infrastructure investment",
            "Large-scale construction that creates jobs and supports long-term growth.",
        )
        .cost(20)
        .cooldown(1)
        .effect(GdpGrowth, 0.6)
        .effect(Unemployment, -0.8)
        .effect(FiscalDeficit, 1.5)
        .effect(Innovation, 2.0)
        .effect(CarbonIndex, 3.0),
        PolicyDef::new(
            2,
            "education_reform",
            "Education reform",
            "Raise education spending to improve human capital.",
        )
        .cost(18)
        .cooldown(3)
        .effect(GdpGrowth, 0.4)
        .effect(Education, 5.0)
        .effect(Innovation, 3.0)
        .effect(Gini, -0.03)
        .effect(FiscalDeficit, 0.8),
        PolicyDef::new(
            3,
            "green_subsidy",
            "Green energy subsidy",
            "Support renewable energy and cut carbon emissions.",
        )
        .cost(22)
        .cooldown(2)
        .effect(CarbonIndex, -8.0)
        .effect(GdpGrowth, 0.3)
        .effect(Unemployment, -0.2)
        .effect(FiscalDeficit, 1.0)
        .effect(Innovation, 2.5),
        PolicyDef::new(
            4,
            "social_security",
            "Social security expansion",
            "Broaden social insurance coverage and raise welfare.",
        )
        .cost(25)
        .cooldown(2)
        .effect(Welfare, 8.0)
        .effect(Gini, -0.05)
        .effect(Unemployment, -0.3)
        .effect(FiscalDeficit, 2.0)
        .effect(GdpGrowth, -0.1),
        PolicyDef::new(
            5,
            "innovation_program",
            "Innovation incentives",
            "Fund research and development to raise technological competitiveness.",
        )
        .cost(16)
        .cooldown(1)
        .effect(Innovation, 6.0)
        .effect(GdpGrowth, 0.5)
        .effect(Education, 2.0)
        .effect(CarbonIndex, -2.0)
        .effect(FiscalDeficit, 0.6),
        PolicyDef::new(
            6,
            "healthcare_reform",
            "Healthcare reform",
            "Improve the health system and public health outcomes.",
        )
        .cost(20)
        .cooldown(3)
        .effect(Health, 8.0)
        .effect(Welfare, 4.0)
        .effect(Gini, -0.02)
        .effect(FiscalDeficit, 1.2),
        PolicyDef::new(
            7,
            "labour_market_reform",
            "Labour market reform",
            "Make the labour market more flexible to boost employment.",
        )
        .cost(12)
        .cooldown(2)
        .effect(Unemployment, -1.0)
        .effect(GdpGrowth, 0.4)
        .effect(Gini, 0.01)
        .effect(Welfare, -1.0),
        PolicyDef::new(
            8,
            "environmental_regulation",
            "Stricter environmental regulation",
            "Tighten environmental protection, possibly at some cost to growth.",
        )
        .cost(14)
        .cooldown(1)
        .effect(CarbonIndex, -5.0)
        .effect(Health, 3.0)
        .effect(GdpGrowth, -0.2)
        .effect(Innovation, 1.0),
        PolicyDef::new(
            9,
            "monetary_easing",
            "Monetary easing",
            "Cut interest rates to stimulate investment and consumption.",
        )
        .cost(10)
        .cooldown(1)
        .effect(GdpGrowth, 0.6)
        .effect(Unemployment, -0.4)
        .effect(Inflation, 0.5)
        .effect(FiscalDeficit, -0.3)
        .requires_at_most(Inflation, 4.0),
    ])
}

pub fn standard_events() -> EventTable {
    EventTable::new(
        STANDARD_EVENT_CHANCE,
        vec![
            RandomEvent::new(
                "global_recession",
                "Global recession",
                "The global economy deteriorates and drags the domestic economy down.",
                &[
                    Effect::new(GdpGrowth, -0.5),
                    Effect::new(Unemployment, 0.3),
                    Effect::new(FiscalDeficit, 0.5),
                ],
            ),
            RandomEvent::new(
                "tech_breakthrough",
                "Technology breakthrough",
                "A major technological breakthrough boosts the economy.",
                &[
                    Effect::new(GdpGrowth, 0.4),
                    Effect::new(Innovation, 3.0),
                    Effect::new(CarbonIndex, -2.0),
                ],
            ),
            RandomEvent::new(
                "natural_disaster",
                "Natural disaster",
                "A natural disaster causes economic losses.",
                &[
                    Effect::new(GdpGrowth, -0.3),
                    Effect::new(FiscalDeficit, 0.8),
                    Effect::new(Health, -2.0),
                ],
            ),
            RandomEvent::new(
                "trade_agreement",
                "Trade agreement",
                "A favourable international trade agreement is signed.",
                &[Effect::new(GdpGrowth, 0.3), Effect::new(Unemployment, -0.2)],
            ),
        ],
    )
}

pub fn standard_objectives() -> Vec<Objective> {
    vec![
        Objective::new(
            "economic_growth",
            "Economic growth",
            &[Condition::at_least(GdpGrowth, 4.0)],
        ),
        Objective::new(
            "social_stability",
            "Social stability",
            &[Condition::at_most(Unemployment, 4.0)],
        ),
        Objective::new(
            "environmental_protection",
            "Environmental protection",
            &[Condition::at_most(CarbonIndex, 70.0)],
        ),
        Objective::new("social_equity", "Social equity", &[Condition::at_most(Gini, 0.35)]),
    ]
}

pub fn standard_failures() -> Vec<FailureCondition> {
    vec![
        FailureCondition::new(
            "economic_collapse",
            "Economic collapse",
            Condition::at_most(GdpGrowth, -3.0),
        ),
        FailureCondition::new(
            "fiscal_crisis",
            "Fiscal crisis",
            Condition::at_least(FiscalDeficit, 15.0),
        ),
        FailureCondition::new(
            "social_unrest",
            "Social unrest",
            Condition::at_least(Unemployment, 20.0),
        ),
        FailureCondition::new(
            "hyperinflation",
            "Hyperinflation",
            Condition::at_least(Inflation, 10.0),
        ),
    ]
}

pub fn standard_score() -> ScoreRule {
    let bonus = |condition, points| ScoreBonus { condition, points };
    ScoreRule {
        per_objective: 25,
        bonuses: vec![
            bonus(Condition::at_least(GdpGrowth, 3.0), 10),
            bonus(Condition::at_most(Unemployment, 5.0), 10),
            bonus(Condition::at_most(FiscalDeficit, 5.0), 10),
            bonus(Condition::at_least(Welfare, 70.0), 5),
            bonus(Condition::at_least(Innovation, 70.0), 5),
        ],
    }
}

fn band(indicator: Indicator, good: Condition, bad: Condition) -> RatingBand {
    RatingBand {
        indicator,
        good: vec![good],
        bad: vec![bad],
        good_requires_all: false,
    }
}

/// Good/bad bands used to colour indicator values in the standard scenario.
pub fn standard_ratings() -> Vec<RatingBand> {
    vec![
        band(
            GdpGrowth,
            Condition::at_least(GdpGrowth, 3.0),
            Condition::at_most(GdpGrowth, 0.0),
        ),
        band(
            Unemployment,
            Condition::at_most(Unemployment, 4.0),
            Condition::at_least(Unemployment, 10.0),
        ),
        RatingBand {
            indicator: Inflation,
            good: vec![
                Condition::at_least(Inflation, 1.0),
                Condition::at_most(Inflation, 3.0),
            ],
            bad: vec![
                Condition::at_least(Inflation, 5.0),
                Condition::at_most(Inflation, -1.0),
            ],
            good_requires_all: true,
        },
        band(
            FiscalDeficit,
            Condition::at_most(FiscalDeficit, 3.0),
            Condition::at_least(FiscalDeficit, 8.0),
        ),
        band(Gini, Condition::at_most(Gini, 0.35), Condition::at_least(Gini, 0.6)),
        band(
            CarbonIndex,
            Condition::at_most(CarbonIndex, 70.0),
            Condition::at_least(CarbonIndex, 150.0),
        ),
        band(
            Welfare,
            Condition::at_least(Welfare, 80.0),
            Condition::at_most(Welfare, 40.0),
        ),
        band(
            Innovation,
            Condition::at_least(Innovation, 80.0),
            Condition::at_most(Innovation, 30.0),
        ),
        band(
            Education,
            Condition::at_least(Education, 85.0),
            Condition::at_most(Education, 40.0),
        ),
        band(
            Health,
            Condition::at_least(Health, 85.0),
            Condition::at_most(Health, 40.0),
        ),
    ]
}

pub fn classic_indicators() -> Vec<IndicatorDef> {
    vec![
        IndicatorDef::new(GdpGrowth, 0.0, 0.0, 100.0),
        IndicatorDef::new(FiscalDeficit, 0.0, 0.0, 100.0),
        IndicatorDef::new(Unemployment, 5.0, 0.0, 100.0),
        IndicatorDef::new(CarbonEmissions, 100.0, 0.0, 100.0),
        IndicatorDef::new(SocialStability, 75.0, 0.0, 100.0),
        IndicatorDef::new(Gini, 0.40, 0.0, 100.0),
        IndicatorDef::new(MiddleClass, 50.0, 0.0, 100.0),
        IndicatorDef::new(TaxRevenue, 0.0, 0.0, 100.0),
        IndicatorDef::new(BusinessInvestment, 50.0, 0.0, 100.0),
        IndicatorDef::new(ConsumerConfidence, 70.0, 0.0, 100.0),
    ]
}

pub fn classic_policies() -> PolicyCatalog {
    PolicyCatalog::from_defs([
        PolicyDef::new(
            0,
            "minimum_wage",
            "Raise the minimum wage",
            "Improve living standards for low earners, at some cost to businesses.",
        )
        .effect(GdpGrowth, 0.2)
        .effect(Unemployment, -0.5)
        .effect(Gini, -0.03)
        .effect(SocialStability, 2.0)
        .effect(BusinessInvestment, -1.0)
        .effect(ConsumerConfidence, 3.0),
        PolicyDef::new(
            1,
            "rnd_subsidy",
            "R&D subsidy",
            "Subsidise corporate research to drive innovation and long-term growth.",
        )
        .effect(GdpGrowth, 0.5)
        .effect(CarbonEmissions, -2.0)
        .effect(BusinessInvestment, 5.0)
        .effect(FiscalDeficit, 0.8),
        PolicyDef::new(
            2,
            "inheritance_tax",
            "Inheritance tax",
            "Tax large estates to reduce wealth inequality and raise revenue.",
        )
        .effect(Gini, -0.05)
        .effect(TaxRevenue, 2.0)
        .effect(SocialStability, 1.5)
        .effect(ConsumerConfidence, -1.0),
        PolicyDef::new(
            3,
            "education_vouchers",
            "Education vouchers",
            "Fund schooling through vouchers to widen access and raise human capital.",
        )
        .effect(GdpGrowth, 0.3)
        .effect(Gini, -0.02)
        .effect(SocialStability, 1.0)
        .effect(MiddleClass, 1.0)
        .effect(FiscalDeficit, 0.5),
        PolicyDef::new(
            4,
            "antitrust",
            "Antitrust enforcement",
            "Strengthen competition law to improve efficiency and innovation.",
        )
        .effect(GdpGrowth, 0.4)
        .effect(Gini, -0.01)
        .effect(BusinessInvestment, 2.0)
        .effect(ConsumerConfidence, 2.0),
        PolicyDef::new(
            5,
            "progressive_income_tax",
            "Progressive income tax",
            "Raise top rates and relieve low earners to reduce inequality.",
        )
        .effect(Gini, -0.04)
        .effect(TaxRevenue, 1.5)
        .effect(SocialStability, 1.5)
        .effect(BusinessInvestment, -1.0)
        .effect(ConsumerConfidence, -0.5),
        PolicyDef::new(
            6,
            "universal_basic_income",
            "Universal basic income",
            "Pay every citizen a basic income, at a heavy fiscal cost.",
        )
        .effect(Unemployment, -0.3)
        .effect(Gini, -0.06)
        .effect(SocialStability, 3.0)
        .effect(ConsumerConfidence, 4.0)
        .effect(FiscalDeficit, 2.0),
        PolicyDef::new(
            7,
            "charity_deduction",
            "Charitable tax deduction",
            "Encourage donations that fund social programmes.",
        )
        .effect(SocialStability, 1.0)
        .effect(TaxRevenue, -0.5)
        .effect(BusinessInvestment, 0.5),
        PolicyDef::new(
            8,
            "infrastructure",
            "Infrastructure investment",
            "Large-scale construction that creates jobs and supports long-term growth.",
        )
        .effect(GdpGrowth, 0.6)
        .effect(Unemployment, -1.0)
        .effect(BusinessInvestment, 3.0)
        .effect(CarbonEmissions, 1.0)
        .effect(FiscalDeficit, 1.5),
        PolicyDef::new(
            9,
            "green_subsidy",
            "Green energy subsidy",
            "Subsidise renewables to cut emissions.",
        )
        .effect(CarbonEmissions, -3.0)
        .effect(GdpGrowth, 0.2)
        .effect(BusinessInvestment, 2.0)
        .effect(FiscalDeficit, 0.7),
        PolicyDef::new(
            10,
            "open_immigration",
            "Relaxed immigration",
            "Attract migrants to expand the labour force.",
        )
        .effect(GdpGrowth, 0.3)
        .effect(Unemployment, 0.2)
        .effect(Gini, 0.01)
        .effect(SocialStability, -1.0)
        .effect(ConsumerConfidence, 0.5),
        PolicyDef::new(
            11,
            "corporate_tax_cut",
            "Corporate tax cut",
            "Lower business taxes to stimulate investment and growth.",
        )
        .effect(GdpGrowth, 0.4)
        .effect(BusinessInvestment, 4.0)
        .effect(TaxRevenue, -1.0)
        .effect(Gini, 0.02),
    ])
}

/// Composite win conditions; meeting any one of them wins the classic game.
pub fn classic_objectives() -> Vec<Objective> {
    vec![
        Objective::new(
            "equal_society",
            "Equal society",
            &[
                Condition::at_most(Gini, 0.3),
                Condition::at_least(MiddleClass, 70.0),
            ],
        ),
        Objective::new(
            "economic_miracle",
            "Economic miracle",
            &[
                Condition::at_least(GdpGrowth, 8.0),
                Condition::at_most(FiscalDeficit, 2.0),
            ],
        ),
        Objective::new(
            "green_harmony",
            "Green harmony",
            &[
                Condition::at_most(CarbonEmissions, 50.0),
                Condition::at_least(SocialStability, 80.0),
            ],
        ),
    ]
}

pub fn classic_failures() -> Vec<FailureCondition> {
    vec![
        FailureCondition::new(
            "inequality_crisis",
            "Inequality crisis",
            Condition::above(Gini, 0.6),
        ),
        FailureCondition::new(
            "debt_crisis",
            "Debt crisis",
            Condition::above(FiscalDeficit, 10.0),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = standard_policies();
        assert_eq!(catalog.len(), 10);

        let tax_cut = catalog.get_by_key("tax_cut").unwrap();
        assert_eq!((tax_cut.cost, tax_cut.cooldown_turns), (15, 2));
        assert_eq!(tax_cut.requirements.len(), 1);

        let cheapest = catalog.iter().map(|p| p.cost).min().unwrap();
        assert_eq!(cheapest, 10);
    }

    #[test]
    fn test_policy_keys_unique() {
        for catalog in [standard_policies(), classic_policies()] {
            let keys: BTreeSet<_> = catalog.iter().map(|p| p.key.clone()).collect();
            assert_eq!(keys.len(), catalog.len());
        }
    }

    #[test]
    fn test_classic_policies_are_free() {
        let catalog = classic_policies();
        assert_eq!(catalog.len(), 12);
        assert!(catalog.iter().all(|p| p.cost == 0 && p.cooldown_turns == 0));
    }

    #[test]
    fn test_every_effect_targets_a_scenario_indicator() {
        let standard: BTreeSet<_> = standard_indicators().iter().map(|d| d.id).collect();
        for policy in standard_policies().iter() {
            assert!(policy.effects.iter().all(|e| standard.contains(&e.indicator)));
        }
        for event in &standard_events().events {
            assert!(event.effects.iter().all(|e| standard.contains(&e.indicator)));
        }

        let classic: BTreeSet<_> = classic_indicators().iter().map(|d| d.id).collect();
        for policy in classic_policies().iter() {
            assert!(policy.effects.iter().all(|e| classic.contains(&e.indicator)));
        }
    }
}
