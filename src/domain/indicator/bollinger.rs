//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Top: Middle + (multiplier × StdDev)
//! - Bottom: Middle - (multiplier × StdDev)
//! - Width: (Top - Bottom) / Middle × 100, undefined when Middle is zero
//!
//! Where StdDev is the sample standard deviation (divides by n-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are undefined.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub middle: IndicatorSeries,
    pub stddev: IndicatorSeries,
    pub top: IndicatorSeries,
    pub bottom: IndicatorSeries,
    pub width: IndicatorSeries,
}

pub fn calculate_bollinger(bars: &[OhlcvBar], period: usize, multiplier: f64) -> BollingerSeries {
    let middle = calculate_sma(bars, period);
    let stddev = calculate_stddev(bars, period);

    let bands: Vec<(Option<f64>, Option<f64>)> = middle
        .values
        .iter()
        .zip(&stddev.values)
        .map(|(m, s)| match (m.value, s.value) {
            (Some(m), Some(s)) => (Some(m + multiplier * s), Some(m - multiplier * s)),
            _ => (None, None),
        })
        .collect();

    let width: Vec<Option<f64>> = bands
        .iter()
        .zip(&middle.values)
        .map(|(&(top, bottom), m)| match (top, bottom, m.value) {
            (Some(t), Some(b), Some(m)) if m != 0.0 => Some((t - b) / m * 100.0),
            _ => None,
        })
        .collect();

    let top = IndicatorSeries::from_values(
        IndicatorType::BollingerTop,
        period,
        bars,
        bands.iter().map(|&(t, _)| t),
    );
    let bottom = IndicatorSeries::from_values(
        IndicatorType::BollingerBottom,
        period,
        bars,
        bands.iter().map(|&(_, b)| b),
    );
    let width = IndicatorSeries::from_values(IndicatorType::BandWidth, period, bars, width);

    BollingerSeries {
        middle,
        stddev,
        top,
        bottom,
        width,
    }
}
