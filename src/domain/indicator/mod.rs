//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: a single dated point, `None` where the value is undefined
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: a series aligned 1:1 with the input bars
//! - `IndicatorSet`: every series computed for one snapshot

pub mod bollinger;
pub mod ema;
pub mod sma;
pub mod stddev;
pub mod stochastic;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Stddev(usize),
    BollingerTop,
    BollingerBottom,
    BandWidth,
    StochasticK(usize),
}

/// Whether the series has at least one full warm-up window behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    /// Warm-up window; the series is unavailable when it exceeds `values.len()`.
    pub window: usize,
    pub values: Vec<IndicatorPoint>,
}

/// Drop NaN and infinities so they never leave the indicator layer.
pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

impl IndicatorSeries {
    pub fn from_values(
        indicator_type: IndicatorType,
        window: usize,
        bars: &[OhlcvBar],
        values: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        let values = bars
            .iter()
            .zip(values)
            .map(|(bar, value)| IndicatorPoint {
                date: bar.date,
                value: value.and_then(finite),
            })
            .collect();
        Self {
            indicator_type,
            window,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().and_then(|p| p.value)
    }

    pub fn previous(&self) -> Option<f64> {
        self.values.len().checked_sub(2).and_then(|i| self.value_at(i))
    }

    pub fn availability(&self) -> Availability {
        if self.window <= self.values.len() {
            Availability::Available
        } else {
            Availability::InsufficientData
        }
    }

    /// Latest value, but only once the warm-up window fits in the series.
    pub fn latest_available(&self) -> Option<f64> {
        match self.availability() {
            Availability::Available => self.latest(),
            Availability::InsufficientData => None,
        }
    }
}

/// Mapping from indicator identity to its aligned series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    series: HashMap<IndicatorType, IndicatorSeries>,
}

impl IndicatorSet {
    pub fn insert(&mut self, series: IndicatorSeries) {
        self.series.insert(series.indicator_type, series);
    }

    pub fn get(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.series.get(indicator_type)
    }

    pub fn contains(&self, indicator_type: &IndicatorType) -> bool {
        self.series.contains_key(indicator_type)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA{}", period),
            IndicatorType::Ema(period) => write!(f, "EMA{}", period),
            IndicatorType::Stddev(period) => write!(f, "STD{}", period),
            IndicatorType::BollingerTop => write!(f, "BB_Top"),
            IndicatorType::BollingerBottom => write!(f, "BB_Bot"),
            IndicatorType::BandWidth => write!(f, "BB_Width"),
            IndicatorType::StochasticK(period) => write!(f, "STOCHK{}", period),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown indicator: {0}")]
pub struct UnknownIndicator(pub String);

impl FromStr for IndicatorType {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_uppercase();
        let unknown = || UnknownIndicator(s.trim().to_string());

        match name.as_str() {
            "BB_TOP" => return Ok(IndicatorType::BollingerTop),
            "BB_BOT" => return Ok(IndicatorType::BollingerBottom),
            "BB_WIDTH" => return Ok(IndicatorType::BandWidth),
            _ => {}
        }

        let split = name
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(unknown)?;
        let (prefix, digits) = name.split_at(split);
        let period: usize = digits.parse().map_err(|_| unknown())?;
        if period == 0 {
            return Err(unknown());
        }

        match prefix {
            "SMA" => Ok(IndicatorType::Sma(period)),
            "EMA" => Ok(IndicatorType::Ema(period)),
            "STD" => Ok(IndicatorType::Stddev(period)),
            "STOCHK" => Ok(IndicatorType::StochasticK(period)),
            _ => Err(unknown()),
        }
    }
}
