//! Economic indicators and their clamp ranges.
//!
//! Every indicator value lives inside a [`Bounded`] so the range invariant
//! (`min <= value <= max`) holds after every mutation. Pushing a value past
//! either end saturates at the boundary; it is never an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier for an economic indicator.
///
/// The set is the union of the indicators used by the built-in scenarios.
/// A given [`crate::SimConfig`] tracks only a subset of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    GdpGrowth,
    Unemployment,
    Inflation,
    FiscalDeficit,
    Gini,
    CarbonIndex,
    Welfare,
    Innovation,
    Education,
    Health,
    CarbonEmissions,
    SocialStability,
    MiddleClass,
    TaxRevenue,
    BusinessInvestment,
    ConsumerConfidence,
}

impl Indicator {
    pub const ALL: [Indicator; 16] = [
        Indicator::GdpGrowth,
        Indicator::Unemployment,
        Indicator::Inflation,
        Indicator::FiscalDeficit,
        Indicator::Gini,
        Indicator::CarbonIndex,
        Indicator::Welfare,
        Indicator::Innovation,
        Indicator::Education,
        Indicator::Health,
        Indicator::CarbonEmissions,
        Indicator::SocialStability,
        Indicator::MiddleClass,
        Indicator::TaxRevenue,
        Indicator::BusinessInvestment,
        Indicator::ConsumerConfidence,
    ];

    /// Machine key, matching the serde representation.
    pub fn key(self) -> &'static str {
        match self {
            Indicator::GdpGrowth => "gdp_growth",
            Indicator::Unemployment => "unemployment",
            Indicator::Inflation => "inflation",
            Indicator::FiscalDeficit => "fiscal_deficit",
            Indicator::Gini => "gini",
            Indicator::CarbonIndex => "carbon_index",
            Indicator::Welfare => "welfare",
            Indicator::Innovation => "innovation",
            Indicator::Education => "education",
            Indicator::Health => "health",
            Indicator::CarbonEmissions => "carbon_emissions",
            Indicator::SocialStability => "social_stability",
            Indicator::MiddleClass => "middle_class",
            Indicator::TaxRevenue => "tax_revenue",
            Indicator::BusinessInvestment => "business_investment",
            Indicator::ConsumerConfidence => "consumer_confidence",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ind| ind.key() == key)
    }

    /// Default English display label. Presentation layers may substitute their own.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::GdpGrowth => "GDP growth rate",
            Indicator::Unemployment => "Unemployment rate",
            Indicator::Inflation => "Inflation rate",
            Indicator::FiscalDeficit => "Fiscal deficit ratio",
            Indicator::Gini => "Gini coefficient",
            Indicator::CarbonIndex => "Carbon emission index",
            Indicator::Welfare => "Social welfare index",
            Indicator::Innovation => "Innovation index",
            Indicator::Education => "Education level",
            Indicator::Health => "Health index",
            Indicator::CarbonEmissions => "Carbon emissions",
            Indicator::SocialStability => "Social stability index",
            Indicator::MiddleClass => "Middle class share",
            Indicator::TaxRevenue => "Tax revenue",
            Indicator::BusinessInvestment => "Business investment",
            Indicator::ConsumerConfidence => "Consumer confidence",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A value clamped to a closed `f64` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounded {
    value: f64,
    min: f64,
    max: f64,
}

impl Bounded {
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        Self {
            value: value.max(min).min(max),
            min,
            max,
        }
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Adds `delta` and saturates at the range ends. Non-finite deltas are ignored.
    pub fn add(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.value = (self.value + delta).max(self.min).min(self.max);
    }

    pub fn set(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.value = value.max(self.min).min(self.max);
    }
}

/// Static definition of a tracked indicator: start value and clamp range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDef {
    pub id: Indicator,
    pub initial: f64,
    pub min: f64,
    pub max: f64,
}

impl IndicatorDef {
    pub const fn new(id: Indicator, initial: f64, min: f64, max: f64) -> Self {
        Self {
            id,
            initial,
            min,
            max,
        }
    }
}

/// The live values of every indicator tracked by a game.
///
/// Iteration order is the [`Indicator`] declaration order, which keeps
/// per-indicator random draws reproducible.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorState {
    values: BTreeMap<Indicator, Bounded>,
}

impl IndicatorState {
    pub fn new(defs: &[IndicatorDef]) -> Self {
        let values = defs
            .iter()
            .map(|def| (def.id, Bounded::new(def.initial, def.min, def.max)))
            .collect();
        Self { values }
    }

    pub fn get(&self, id: Indicator) -> Option<f64> {
        self.values.get(&id).map(Bounded::get)
    }

    pub fn bounds(&self, id: Indicator) -> Option<(f64, f64)> {
        self.values.get(&id).map(|b| (b.min(), b.max()))
    }

    pub fn contains(&self, id: Indicator) -> bool {
        self.values.contains_key(&id)
    }

    /// Adds `delta` to an indicator and clamps it.
    ///
    /// Returns `false` (and changes nothing) if the indicator is not tracked.
    pub fn apply_delta(&mut self, id: Indicator, delta: f64) -> bool {
        match self.values.get_mut(&id) {
            Some(bounded) => {
                bounded.add(delta);
                true
            }
            None => {
                log::trace!("ignoring delta {:+.3} for untracked indicator {}", delta, id);
                false
            }
        }
    }

    pub fn set(&mut self, id: Indicator, value: f64) -> bool {
        match self.values.get_mut(&id) {
            Some(bounded) => {
                bounded.set(value);
                true
            }
            None => false,
        }
    }

    /// Tracked indicator ids in iteration order.
    pub fn ids(&self) -> impl Iterator<Item = Indicator> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        self.values.iter().map(|(id, b)| (*id, b.get()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only copy of the current values.
    pub fn snapshot(&self) -> BTreeMap<Indicator, f64> {
        self.iter().collect()
    }
}
