//! Snapshot assembly.
//!
//! A [`Snapshot`] is built from exactly one validated series and one
//! [`IndicatorSet`] computed from it, so every field describes the same bar.
//! Validation failure yields [`Unavailable`] and nothing else.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::config::{ConvergencePair, SignalConfig};
use crate::domain::error::{Unavailable, UnavailableReason};
use crate::domain::indicator::{IndicatorSet, IndicatorType};
use crate::domain::indicator_bank::compute_bank;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::{validate, ValidSeries};
use crate::domain::signal::{
    BandPosition, BandTouches, Convergence, CrossEvent, Signal, StochasticDirection,
    VolatilityDirection,
};
use crate::domain::signal_eval;
use crate::domain::timeframe::Timeframe;

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub indicator: IndicatorType,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerState {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub width: Option<f64>,
    pub position: BandPosition,
    pub touches: BandTouches,
    pub volatility: VolatilityDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticState {
    pub k: Option<f64>,
    pub direction: StochasticDirection,
    pub last_cross: Option<CrossEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceEstimate {
    pub pair: ConvergencePair,
    pub estimate: Convergence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub as_of: NaiveDate,
    pub bars: usize,
    pub last_price: f64,
    pub change_pct: Option<f64>,
    /// Bars between the last close and the `change_pct` base.
    pub change_bars: usize,
    pub streak: i64,
    /// Fast EMA followed by each comparison target, as configured.
    pub levels: Vec<Level>,
    pub comparisons: Vec<Signal>,
    pub bollinger: BollingerState,
    pub stochastic: StochasticState,
    pub convergence: Vec<ConvergenceEstimate>,
}

/// Validate `bars`, run the indicator bank and derive every signal.
pub fn build_snapshot(
    symbol: &str,
    timeframe: Timeframe,
    bars: &[OhlcvBar],
    config: &SignalConfig,
) -> Result<Snapshot, Unavailable> {
    let series = validate(bars, config.min_bars).map_err(|rejection| {
        debug!(symbol, %timeframe, %rejection, "series rejected");
        Unavailable {
            symbol: symbol.to_string(),
            timeframe,
            reason: UnavailableReason::Rejected(rejection),
        }
    })?;

    let set = compute_bank(&series, config);
    Ok(assemble(symbol, timeframe, &series, &set, config))
}

/// Pure aggregation over an already computed indicator set.
pub fn assemble(
    symbol: &str,
    timeframe: Timeframe,
    series: &ValidSeries<'_>,
    set: &IndicatorSet,
    config: &SignalConfig,
) -> Snapshot {
    let bars = series.bars();
    let last = series.last();
    let latest = |t: &IndicatorType| set.get(t).and_then(|s| s.latest());

    let mut level_types = vec![config.fast_indicator()];
    level_types.extend(config.targets.iter().copied().filter(|t| *t != config.fast_indicator()));
    let levels = level_types
        .into_iter()
        .map(|indicator| Level {
            indicator,
            value: signal_eval::level(set, &indicator),
        })
        .collect();

    let top = latest(&IndicatorType::BollingerTop);
    let bottom = latest(&IndicatorType::BollingerBottom);
    let bollinger = BollingerState {
        top,
        bottom,
        width: latest(&IndicatorType::BandWidth),
        position: signal_eval::classify_band(last.close, top, bottom, config.proximity_pct),
        touches: match (
            set.get(&IndicatorType::BollingerTop),
            set.get(&IndicatorType::BollingerBottom),
        ) {
            (Some(t), Some(b)) => signal_eval::band_touches(bars, t, b),
            _ => BandTouches::default(),
        },
        volatility: set
            .get(&IndicatorType::BandWidth)
            .map_or(VolatilityDirection::Undefined, signal_eval::volatility_direction),
    };

    let stochastic = match set.get(&config.stochastic_indicator()) {
        Some(k) => StochasticState {
            k: k.latest(),
            direction: signal_eval::stochastic_direction(k),
            last_cross: signal_eval::last_cross(k, config.cross_upper, config.cross_lower),
        },
        None => StochasticState {
            k: None,
            direction: StochasticDirection::Undefined,
            last_cross: None,
        },
    };

    let convergence = config
        .convergence
        .iter()
        .map(|pair| ConvergenceEstimate {
            pair: *pair,
            estimate: match (set.get(&pair.left), set.get(&pair.right)) {
                (Some(l), Some(r)) => {
                    signal_eval::convergence(l, r, config.convergence_lookback)
                }
                _ => Convergence::Undefined,
            },
        })
        .collect();

    Snapshot {
        symbol: symbol.to_string(),
        timeframe,
        as_of: last.date,
        bars: series.len(),
        last_price: last.close,
        change_pct: signal_eval::price_change_pct(bars, config.change_lookback),
        change_bars: config.change_lookback,
        streak: signal_eval::streak(bars),
        levels,
        comparisons: signal_eval::comparison_signals(set, config, last.close),
        bollinger,
        stochastic,
        convergence,
    }
}

impl Snapshot {
    /// Every optional float in the snapshot, for invariant checks.
    pub fn numeric_fields(&self) -> Vec<Option<f64>> {
        let mut out = vec![Some(self.last_price), self.change_pct];
        out.extend(self.levels.iter().map(|l| l.value));
        for s in &self.comparisons {
            if let Some(m) = s.magnitude {
                out.push(Some(m.absolute));
                out.push(m.percent);
            }
        }
        out.extend([
            self.bollinger.top,
            self.bollinger.bottom,
            self.bollinger.width,
            self.stochastic.k,
        ]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Rejection;
    use crate::domain::signal::Status;

    fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i % 3 == 0 { close + 0.5 } else { close - 0.5 };
                OhlcvBar {
                    date: start + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(close) + 1.0,
                    low: open.min(close) - 1.0,
                    close,
                    volume: 1000,
                }
            })
            .collect()
    }

    fn trending(n: usize) -> Vec<OhlcvBar> {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        make_bars(&closes)
    }

    #[test]
    fn short_series_is_unavailable() {
        let bars = trending(3);
        let config = SignalConfig {
            min_bars: 50,
            ..SignalConfig::default()
        };
        let err = build_snapshot("AAPL", Timeframe::Daily, &bars, &config).unwrap_err();
        assert_eq!(err.symbol, "AAPL");
        assert_eq!(
            err.reason,
            UnavailableReason::Rejected(Rejection::InsufficientData {
                bars: 3,
                minimum: 50
            })
        );
    }

    #[test]
    fn snapshot_describes_last_bar() {
        let bars = trending(60);
        let snap =
            build_snapshot("MSFT", Timeframe::Daily, &bars, &SignalConfig::default()).unwrap();

        assert_eq!(snap.as_of, bars[59].date);
        assert_eq!(snap.last_price, 159.0);
        assert_eq!(snap.bars, 60);
        assert_eq!(snap.timeframe, Timeframe::Daily);
    }

    #[test]
    fn levels_start_with_fast_ema_without_duplicates() {
        let bars = trending(60);
        let config = SignalConfig::default();
        let snap = build_snapshot("X", Timeframe::Daily, &bars, &config).unwrap();

        assert_eq!(snap.levels[0].indicator, IndicatorType::Ema(4));
        let ema4 = snap
            .levels
            .iter()
            .filter(|l| l.indicator == IndicatorType::Ema(4))
            .count();
        assert_eq!(ema4, 1);
        assert_eq!(snap.levels.len(), config.targets.len());
    }

    #[test]
    fn uptrend_comparisons() {
        let bars = trending(120);
        let snap =
            build_snapshot("X", Timeframe::Daily, &bars, &SignalConfig::default()).unwrap();

        let status = |name: &str| {
            snap.comparisons
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.status)
                .unwrap()
        };
        assert_eq!(status("EMA4"), Status::Undefined);
        assert_eq!(status("SMA20"), Status::True);
        assert_eq!(status("SMA100"), Status::True);
        assert_eq!(status("SMA200"), Status::Undefined);
        assert_eq!(status("EMA600"), Status::Undefined);
    }

    #[test]
    fn comparisons_for_each_target() {
        let bars = trending(30);
        let config = SignalConfig::default();
        let snap = build_snapshot("X", Timeframe::Daily, &bars, &config).unwrap();
        assert_eq!(snap.comparisons.len(), config.targets.len());
        assert_eq!(snap.convergence.len(), config.convergence.len());
    }

    #[test]
    fn no_non_finite_numbers() {
        let bars = trending(40);
        let snap =
            build_snapshot("X", Timeframe::Daily, &bars, &SignalConfig::default()).unwrap();
        assert!(snap.numeric_fields().into_iter().flatten().all(f64::is_finite));
    }

    #[test]
    fn flat_prices_leave_stochastic_undefined() {
        let bars: Vec<OhlcvBar> = (0..25)
            .map(|i| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i),
                open: 10.0,
                high: 10.0,
                low: 10.0,
                close: 10.0,
                volume: 0,
            })
            .collect();
        let snap =
            build_snapshot("FLAT", Timeframe::Daily, &bars, &SignalConfig::default()).unwrap();

        assert_eq!(snap.stochastic.k, None);
        assert_eq!(snap.stochastic.direction, StochasticDirection::Undefined);
        assert_eq!(snap.stochastic.last_cross, None);
        assert_eq!(snap.bollinger.position, BandPosition::AboveUpper);
        assert_eq!(snap.streak, -25);
    }
}
