//! Series validation.
//!
//! A [`ValidSeries`] is a borrowed, non-empty, strictly date-ordered run of
//! finite bars at least `min_length` long. Nothing downstream of the validator
//! re-checks these properties.

use crate::domain::error::{MalformedInput, Rejection};
use crate::domain::ohlcv::OhlcvBar;

/// Validated bars. Holds at least one bar, so [`ValidSeries::last`] is total.
#[derive(Debug, Clone, Copy)]
pub struct ValidSeries<'a> {
    bars: &'a [OhlcvBar],
    last: &'a OhlcvBar,
}

impl<'a> ValidSeries<'a> {
    pub fn bars(&self) -> &'a [OhlcvBar] {
        self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> &'a OhlcvBar {
        self.last
    }
}

/// Shape checks only: non-empty, finite prices, strictly increasing dates.
pub fn check_shape(bars: &[OhlcvBar]) -> Result<(), MalformedInput> {
    if bars.is_empty() {
        return Err(MalformedInput::Empty);
    }

    for (index, bar) in bars.iter().enumerate() {
        if let Some(field) = bar.non_finite_field() {
            return Err(MalformedInput::NonFinite { index, field });
        }
        if index > 0 && bar.date <= bars[index - 1].date {
            return Err(MalformedInput::NonMonotonic { index });
        }
    }

    Ok(())
}

/// Validate `bars` against a minimum length. `min_length` below 1 is treated as 1.
pub fn validate(bars: &[OhlcvBar], min_length: usize) -> Result<ValidSeries<'_>, Rejection> {
    check_shape(bars)?;
    let Some(last) = bars.last() else {
        return Err(Rejection::Malformed(MalformedInput::Empty));
    };

    let minimum = min_length.max(1);
    if bars.len() < minimum {
        return Err(Rejection::InsufficientData {
            bars: bars.len(),
            minimum,
        });
    }

    Ok(ValidSeries { bars, last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn accepts_long_enough_series() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let series = validate(&bars, 3).unwrap();
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
        assert_eq!(series.last().close, 3.0);
        assert_eq!(series.last().date, bars[2].date);
    }

    #[test]
    fn single_bar_series_last_is_that_bar() {
        let bars = make_bars(&[7.5]);
        let series = validate(&bars, 1).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.last().close, 7.5);
    }

    #[test]
    fn rejects_short_series() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert_eq!(
            validate(&bars, 50).unwrap_err(),
            Rejection::InsufficientData {
                bars: 3,
                minimum: 50
            }
        );
    }

    #[test]
    fn rejects_empty_series_as_malformed() {
        assert_eq!(
            validate(&[], 0).unwrap_err(),
            Rejection::Malformed(MalformedInput::Empty)
        );
    }

    #[test]
    fn zero_minimum_still_needs_one_bar() {
        let bars = make_bars(&[1.0]);
        assert!(validate(&bars, 0).is_ok());
    }

    #[test]
    fn rejects_duplicate_dates() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars[2].date = bars[1].date;
        assert_eq!(
            validate(&bars, 1).unwrap_err(),
            Rejection::Malformed(MalformedInput::NonMonotonic { index: 2 })
        );
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars.swap(0, 1);
        assert_eq!(
            validate(&bars, 1).unwrap_err(),
            Rejection::Malformed(MalformedInput::NonMonotonic { index: 1 })
        );
    }

    #[test]
    fn rejects_nan_close_before_length_check() {
        let mut bars = make_bars(&[1.0, 2.0]);
        bars[1].close = f64::NAN;
        assert_eq!(
            validate(&bars, 50).unwrap_err(),
            Rejection::Malformed(MalformedInput::NonFinite {
                index: 1,
                field: "close"
            })
        );
    }
}
