//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Every bar carries a value; the series reports `InsufficientData` availability
//! until n bars have elapsed.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], span: usize) -> IndicatorSeries {
    if span == 0 {
        return IndicatorSeries::from_values(
            IndicatorType::Ema(span),
            span,
            bars,
            std::iter::repeat(None),
        );
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut ema: Option<f64> = None;

    let values = bars.iter().map(|bar| {
        let next = match ema {
            None => bar.close,
            Some(prev) => bar.close * k + prev * (1.0 - k),
        };
        ema = Some(next);
        Some(next)
    });

    IndicatorSeries::from_values(IndicatorType::Ema(span), span, bars, values.collect::<Vec<_>>())
}
