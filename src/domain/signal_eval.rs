//! Signal derivation.
//!
//! Every function here reads the latest bar (and, where stated, a short
//! trailing window) of bars or indicator series that share one alignment.
//!
//! # Evaluation Semantics
//!
//! - Comparisons: undefined operands, or a target still inside its warm-up
//!   window, give `Status::Undefined`
//! - Streak: positive for up candles, negative for down; never zero
//! - Band touches: counted backward until the condition fails or a band is undefined
//! - Last cross: walks consecutive %K pairs newest to oldest; "below upper"
//!   is tested before "above lower" on each pair

use crate::domain::config::SignalConfig;
use crate::domain::indicator::{finite, IndicatorSeries, IndicatorSet, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{
    BandPosition, BandTouches, Convergence, CrossEvent, CrossKind, Magnitude, Signal, Status,
    StochasticDirection, VolatilityDirection,
};

/// Price distance from `target`, absolute and as a percentage of `target`.
pub fn magnitude(price: f64, target: f64) -> Option<Magnitude> {
    let absolute = finite(price - target)?;
    let percent = if target == 0.0 {
        None
    } else {
        finite(absolute / target * 100.0)
    };
    Some(Magnitude { absolute, percent })
}

/// `fast > target`, tri-state.
pub fn compare(fast: Option<f64>, target: Option<f64>) -> Status {
    match (fast, target) {
        (Some(f), Some(t)) => Status::from(Some(f > t)),
        _ => Status::Undefined,
    }
}

/// One comparison signal per configured target, in configuration order.
pub fn comparison_signals(set: &IndicatorSet, config: &SignalConfig, price: f64) -> Vec<Signal> {
    let fast_type = config.fast_indicator();
    let fast = set.get(&fast_type).and_then(IndicatorSeries::latest_available);

    config
        .targets
        .iter()
        .map(|target_type| {
            let target = set
                .get(target_type)
                .and_then(IndicatorSeries::latest_available);
            let status = if *target_type == fast_type {
                Status::Undefined
            } else {
                compare(fast, target)
            };
            Signal {
                name: target_type.to_string(),
                status,
                magnitude: target.and_then(|t| magnitude(price, t)),
            }
        })
        .collect()
}

/// Consecutive same-colour candles ending at the last bar; sign gives direction.
pub fn streak(bars: &[OhlcvBar]) -> i64 {
    let Some(last) = bars.last() else {
        return 0;
    };
    let up = last.is_up();
    let count = bars.iter().rev().take_while(|b| b.is_up() == up).count() as i64;
    if up { count } else { -count }
}

/// Place `close` relative to the bands. Touching a band counts as beyond it.
pub fn classify_band(
    close: f64,
    top: Option<f64>,
    bottom: Option<f64>,
    proximity_pct: f64,
) -> BandPosition {
    let (Some(top), Some(bottom)) = (top, bottom) else {
        return BandPosition::Undefined;
    };
    let tolerance = proximity_pct / 100.0;

    if close >= top {
        BandPosition::AboveUpper
    } else if close <= bottom {
        BandPosition::BelowLower
    } else if top - close <= top.abs() * tolerance {
        BandPosition::NearUpper
    } else if close - bottom <= bottom.abs() * tolerance {
        BandPosition::NearLower
    } else {
        BandPosition::Normal
    }
}

pub fn band_touches(bars: &[OhlcvBar], top: &IndicatorSeries, bottom: &IndicatorSeries) -> BandTouches {
    let trailing = |band: &IndicatorSeries, hit: fn(f64, f64) -> bool| {
        bars.iter()
            .enumerate()
            .rev()
            .take_while(|(i, bar)| band.value_at(*i).is_some_and(|b| hit(bar.close, b)))
            .count()
    };

    BandTouches {
        upper: trailing(top, |close, band| close >= band),
        lower: trailing(bottom, |close, band| close <= band),
    }
}

pub fn volatility_direction(width: &IndicatorSeries) -> VolatilityDirection {
    match (width.latest(), width.previous()) {
        (Some(curr), Some(prev)) if curr > prev => VolatilityDirection::Expanding,
        (Some(_), Some(_)) => VolatilityDirection::Tightening,
        _ => VolatilityDirection::Undefined,
    }
}

pub fn stochastic_direction(k: &IndicatorSeries) -> StochasticDirection {
    match (k.latest(), k.previous()) {
        (Some(curr), Some(prev)) if curr > prev => StochasticDirection::Up,
        (Some(_), Some(_)) => StochasticDirection::Down,
        _ => StochasticDirection::Undefined,
    }
}

/// Most recent completed threshold transition of %K, or `None` if none exists.
///
/// Each pair of consecutive bars is examined once, newest first. Pairs with
/// an undefined side are skipped.
pub fn last_cross(k: &IndicatorSeries, upper: f64, lower: f64) -> Option<CrossEvent> {
    (1..k.len()).rev().find_map(|i| {
        let prev = k.value_at(i - 1)?;
        let curr = k.value_at(i)?;

        let kind = if prev >= upper && curr < upper {
            CrossKind::BelowUpper
        } else if prev <= lower && curr > lower {
            CrossKind::AboveLower
        } else {
            return None;
        };

        Some(CrossEvent {
            kind,
            date: k.values[i].date,
            index: i,
        })
    })
}

/// Bars until `left` and `right` meet, extrapolating each series' recent slope.
///
/// Slope is `(v[-1] - v[-lookback]) / (lookback - 1)`. The closure rate is
/// positive when the gap is shrinking.
pub fn convergence(left: &IndicatorSeries, right: &IndicatorSeries, lookback: usize) -> Convergence {
    let n = left.len().min(right.len());
    if lookback < 2 || n < lookback {
        return Convergence::Undefined;
    }

    let window = n - lookback..n;
    let defined = window
        .clone()
        .all(|i| left.value_at(i).is_some() && right.value_at(i).is_some());
    if !defined {
        return Convergence::Undefined;
    }

    let (Some(l_now), Some(l_then), Some(r_now), Some(r_then)) = (
        left.value_at(n - 1),
        left.value_at(window.start),
        right.value_at(n - 1),
        right.value_at(window.start),
    ) else {
        return Convergence::Undefined;
    };

    let span = (lookback - 1) as f64;
    let left_slope = (l_now - l_then) / span;
    let right_slope = (r_now - r_then) / span;

    let gap = l_now - r_now;
    if gap == 0.0 {
        return Convergence::BarsToCross(0);
    }

    let closure = if gap > 0.0 {
        right_slope - left_slope
    } else {
        left_slope - right_slope
    };
    if closure <= 0.0 {
        return Convergence::NotConverging;
    }

    match finite((gap.abs() / closure).trunc()) {
        Some(bars) => Convergence::BarsToCross(bars as u64),
        None => Convergence::NotConverging,
    }
}

/// Percentage change of the last close against `lookback` bars earlier
/// (or the first bar when the series is shorter).
pub fn price_change_pct(bars: &[OhlcvBar], lookback: usize) -> Option<f64> {
    let last = bars.last()?;
    let base = if bars.len() > lookback {
        &bars[bars.len() - 1 - lookback]
    } else {
        &bars[0]
    };
    if base.close == 0.0 {
        return None;
    }
    finite((last.close - base.close) / base.close * 100.0)
}

/// Latest value of `indicator_type` once its warm-up window fits the series.
pub fn level(set: &IndicatorSet, indicator_type: &IndicatorType) -> Option<f64> {
    set.get(indicator_type)
        .and_then(IndicatorSeries::latest_available)
}
