//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values: Vec<Option<f64>> = (0..bars.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            let window = &bars[i + 1 - period..=i];
            Some(window.iter().map(|b| b.close).sum::<f64>() / period as f64)
        })
        .collect();

    IndicatorSeries::from_values(IndicatorType::Sma(period), period, bars, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&bars, 3);

        assert_eq!(series.value_at(0), None);
        assert_eq!(series.value_at(1), None);
        assert!(series.value_at(2).is_some());
        assert!(series.value_at(4).is_some());
    }

    #[test]
    fn sma_basic_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&bars, 3);

        assert_relative_eq!(series.value_at(2).unwrap(), 20.0);
        assert_relative_eq!(series.value_at(3).unwrap(), 30.0);
        assert_relative_eq!(series.value_at(4).unwrap(), 40.0);
    }

    #[test]
    fn sma_period_longer_than_series() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 50);
        assert_eq!(series.len(), 2);
        assert!(series.values.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn sma_period_0_is_undefined() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 0);
        assert!(series.values.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn sma_indicator_type() {
        let bars = make_bars(&[10.0]);
        assert_eq!(calculate_sma(&bars, 20).indicator_type, IndicatorType::Sma(20));
    }
}
