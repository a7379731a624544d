//! Tunable parameters for one snapshot computation.

use crate::domain::indicator::{IndicatorType, UnknownIndicator};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerParams {
    pub period: usize,
    pub multiplier: f64,
}

/// Two series expected to meet, e.g. the lower band rising toward a moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergencePair {
    pub left: IndicatorType,
    pub right: IndicatorType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    /// Validator minimum; shorter series are rejected outright.
    pub min_bars: usize,
    pub fast_ema: usize,
    /// Indicators the fast EMA and price are compared against.
    pub targets: Vec<IndicatorType>,
    pub bollinger: BollingerParams,
    pub stochastic_window: usize,
    /// Distance from a band, in percent of the band, that counts as "near".
    pub proximity_pct: f64,
    pub cross_upper: f64,
    pub cross_lower: f64,
    pub convergence_lookback: usize,
    pub convergence: Vec<ConvergencePair>,
    /// Bars back for the price change figure; 4 daily bars back spans one
    /// trading week ending at the last close.
    pub change_lookback: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_bars: 20,
            fast_ema: 4,
            targets: vec![
                IndicatorType::Ema(4),
                IndicatorType::Sma(20),
                IndicatorType::Sma(50),
                IndicatorType::Sma(100),
                IndicatorType::Sma(200),
                IndicatorType::Ema(250),
                IndicatorType::Ema(600),
            ],
            bollinger: BollingerParams {
                period: 20,
                multiplier: 2.0,
            },
            stochastic_window: 5,
            proximity_pct: 1.0,
            cross_upper: 80.0,
            cross_lower: 20.0,
            convergence_lookback: 4,
            convergence: vec![
                ConvergencePair {
                    left: IndicatorType::BollingerBottom,
                    right: IndicatorType::Sma(50),
                },
                ConvergencePair {
                    left: IndicatorType::BollingerTop,
                    right: IndicatorType::Sma(50),
                },
            ],
            change_lookback: 4,
        }
    }
}

impl SignalConfig {
    pub fn fast_indicator(&self) -> IndicatorType {
        IndicatorType::Ema(self.fast_ema)
    }

    pub fn stochastic_indicator(&self) -> IndicatorType {
        IndicatorType::StochasticK(self.stochastic_window)
    }

    /// Every indicator the bank must produce for this configuration.
    pub fn required_indicators(&self) -> Vec<IndicatorType> {
        let mut types = vec![
            self.fast_indicator(),
            IndicatorType::Sma(self.bollinger.period),
            IndicatorType::Stddev(self.bollinger.period),
            IndicatorType::BollingerTop,
            IndicatorType::BollingerBottom,
            IndicatorType::BandWidth,
            self.stochastic_indicator(),
        ];
        types.extend(self.targets.iter().copied());
        for pair in &self.convergence {
            types.push(pair.left);
            types.push(pair.right);
        }
        types.sort();
        types.dedup();
        types
    }
}

/// Parse `"SMA50, EMA250"` into indicator types.
pub fn parse_indicator_list(input: &str) -> Result<Vec<IndicatorType>, UnknownIndicator> {
    input
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.parse::<IndicatorType>())
        .collect()
}

/// Parse `"BB_Bot:SMA50, BB_Top:SMA50"` into convergence pairs.
pub fn parse_convergence_pairs(input: &str) -> Result<Vec<ConvergencePair>, UnknownIndicator> {
    input
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|token| {
            let (left, right) = token
                .split_once(':')
                .ok_or_else(|| UnknownIndicator(token.trim().to_string()))?;
            Ok(ConvergencePair {
                left: left.parse()?,
                right: right.parse()?,
            })
        })
        .collect()
}
