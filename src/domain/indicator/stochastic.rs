//! Stochastic %K indicator.
//!
//! %K[i] = (C[i] - LL(n)) / (HH(n) - LL(n)) × 100
//! where HH/LL are the highest high and lowest low of the trailing n bars.
//! Warmup: first (n-1) bars are undefined. A flat window (HH == LL) is
//! undefined rather than a division by zero.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stochastic_k(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values: Vec<Option<f64>> = (0..bars.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            let window = &bars[i + 1 - period..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            let range = highest - lowest;

            if range == 0.0 {
                None
            } else {
                Some((bars[i].close - lowest) / range * 100.0)
            }
        })
        .collect();

    IndicatorSeries::from_values(IndicatorType::StochasticK(period), period, bars, values)
}
