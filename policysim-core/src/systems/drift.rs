use crate::indicator::Indicator;
use crate::rng::RandomSource;
use crate::state::GameState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// Natural economic change applied at the start of every turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Long-run GDP growth the economy reverts toward.
    pub gdp_target: f64,
    /// Fraction of the gap to `gdp_target` closed each turn.
    pub gdp_reversion: f64,
    /// Above this growth rate unemployment falls by `boom_unemployment`.
    pub boom_threshold: f64,
    pub boom_unemployment: f64,
    /// Below this growth rate unemployment rises by `slump_unemployment`.
    pub slump_threshold: f64,
    pub slump_unemployment: f64,
    /// Half-width of the uniform inflation shock.
    pub inflation_noise: f64,
    /// Half-width of the uniform noise added to every indicator.
    pub indicator_noise: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            gdp_target: 2.5,
            gdp_reversion: 0.1,
            boom_threshold: 3.0,
            boom_unemployment: -0.1,
            slump_threshold: 1.0,
            slump_unemployment: 0.2,
            inflation_noise: 0.2,
            indicator_noise: 0.05,
        }
    }
}

/// Applies natural drift to the indicators.
///
/// Order: GDP mean reversion, unemployment response to the new growth rate,
/// inflation shock, then independent noise on every tracked indicator in id
/// order. Contributions are summed per indicator and clamped once at the end.
#[instrument(skip_all, name = "drift")]
pub fn run_drift_tick<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &DriftConfig,
    rng: &mut R,
) {
    let indicators = &mut state.indicators;
    let mut deltas: BTreeMap<Indicator, f64> = BTreeMap::new();

    if let Some(gdp) = indicators.get(Indicator::GdpGrowth) {
        let reversion = (config.gdp_target - gdp) * config.gdp_reversion;
        *deltas.entry(Indicator::GdpGrowth).or_default() += reversion;

        let gdp = gdp + reversion;
        let response = if gdp > config.boom_threshold {
            config.boom_unemployment
        } else if gdp < config.slump_threshold {
            config.slump_unemployment
        } else {
            0.0
        };
        if indicators.contains(Indicator::Unemployment) {
            *deltas.entry(Indicator::Unemployment).or_default() += response;
        }
    }

    if indicators.contains(Indicator::Inflation) && config.inflation_noise > 0.0 {
        let shock = rng.uniform(-config.inflation_noise, config.inflation_noise);
        *deltas.entry(Indicator::Inflation).or_default() += shock;
    }

    if config.indicator_noise > 0.0 {
        for id in indicators.ids() {
            let noise = rng.uniform(-config.indicator_noise, config.indicator_noise);
            *deltas.entry(id).or_default() += noise;
        }
    }

    for (id, delta) in deltas {
        indicators.apply_delta(id, delta);
    }

    log::trace!(
        "Drift applied: gdp={:?} unemployment={:?} inflation={:?}",
        indicators.get(Indicator::GdpGrowth),
        indicators.get(Indicator::Unemployment),
        indicators.get(Indicator::Inflation)
    );
}
