//! Rolling standard deviation indicator.
//!
//! Sample standard deviation (divides by n-1) over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) bars are undefined. A window of 1 has no sample
//! deviation and is undefined everywhere.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values: Vec<Option<f64>> = (0..bars.len())
        .map(|i| {
            if period < 2 || i + 1 < period {
                return None;
            }
            let window = &bars[i + 1 - period..=i];
            let mean: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;

            let variance: f64 = window
                .iter()
                .map(|b| {
                    let diff = b.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (period - 1) as f64;

            Some(variance.sqrt())
        })
        .collect();

    IndicatorSeries::from_values(IndicatorType::Stddev(period), period, bars, values)
}
