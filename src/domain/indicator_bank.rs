//! Indicator bank: computes every series a snapshot needs from one validated series.

use tracing::debug;

use crate::domain::config::{BollingerParams, SignalConfig};
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::stochastic::calculate_stochastic_k;
use crate::domain::indicator::{IndicatorSeries, IndicatorSet, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::ValidSeries;

/// Compute a single indicator. Band series use the given Bollinger parameters.
pub fn compute_indicator(
    bars: &[OhlcvBar],
    indicator_type: IndicatorType,
    bollinger: &BollingerParams,
) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => calculate_sma(bars, period),
        IndicatorType::Ema(span) => calculate_ema(bars, span),
        IndicatorType::Stddev(period) => calculate_stddev(bars, period),
        IndicatorType::StochasticK(period) => calculate_stochastic_k(bars, period),
        IndicatorType::BollingerTop => {
            calculate_bollinger(bars, bollinger.period, bollinger.multiplier).top
        }
        IndicatorType::BollingerBottom => {
            calculate_bollinger(bars, bollinger.period, bollinger.multiplier).bottom
        }
        IndicatorType::BandWidth => {
            calculate_bollinger(bars, bollinger.period, bollinger.multiplier).width
        }
    }
}

/// Compute every indicator `types` names. The bands are computed once and shared.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    types: &[IndicatorType],
    bollinger: &BollingerParams,
) -> IndicatorSet {
    let mut set = IndicatorSet::default();

    let needs_bands = types.iter().any(|t| {
        matches!(
            t,
            IndicatorType::BollingerTop | IndicatorType::BollingerBottom | IndicatorType::BandWidth
        )
    });
    if needs_bands {
        let bb = calculate_bollinger(bars, bollinger.period, bollinger.multiplier);
        set.insert(bb.middle);
        set.insert(bb.stddev);
        set.insert(bb.top);
        set.insert(bb.bottom);
        set.insert(bb.width);
    }

    for &indicator_type in types {
        if !set.contains(&indicator_type) {
            set.insert(compute_indicator(bars, indicator_type, bollinger));
        }
    }

    set
}

/// Indicator bank entry point: everything `config` requires, for a validated series.
pub fn compute_bank(series: &ValidSeries<'_>, config: &SignalConfig) -> IndicatorSet {
    let types = config.required_indicators();
    let set = compute_indicators(series.bars(), &types, &config.bollinger);
    debug!(bars = series.len(), indicators = set.len(), "indicator bank computed");
    set
}
