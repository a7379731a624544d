//! Signal value types produced by [`crate::domain::signal_eval`].

use chrono::NaiveDate;
use std::fmt;

/// Tri-state outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    True,
    False,
    Undefined,
}

impl From<Option<bool>> for Status {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Status::True,
            Some(false) => Status::False,
            None => Status::Undefined,
        }
    }
}

/// Distance of price from a comparison target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnitude {
    pub absolute: f64,
    /// `None` when the target is zero.
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    pub status: Status,
    pub magnitude: Option<Magnitude>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPosition {
    AboveUpper,
    NearUpper,
    Normal,
    NearLower,
    BelowLower,
    Undefined,
}

/// Consecutive trailing closes at or beyond each band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandTouches {
    pub upper: usize,
    pub lower: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatilityDirection {
    Expanding,
    Tightening,
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticDirection {
    Up,
    Down,
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossKind {
    /// %K fell through the upper threshold (e.g. "Below 80").
    BelowUpper,
    /// %K rose through the lower threshold (e.g. "Above 20").
    AboveLower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossEvent {
    pub kind: CrossKind,
    /// Bar on which the transition completed.
    pub date: NaiveDate,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    Undefined,
    NotConverging,
    BarsToCross(u64),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::True => "TRUE",
            Status::False => "FALSE",
            Status::Undefined => "UNDEFINED",
        })
    }
}

impl fmt::Display for BandPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BandPosition::AboveUpper => "ABOVE_UPPER",
            BandPosition::NearUpper => "NEAR_UPPER",
            BandPosition::Normal => "NORMAL",
            BandPosition::NearLower => "NEAR_LOWER",
            BandPosition::BelowLower => "BELOW_LOWER",
            BandPosition::Undefined => "UNDEFINED",
        })
    }
}

impl fmt::Display for VolatilityDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VolatilityDirection::Expanding => "EXPANDING",
            VolatilityDirection::Tightening => "TIGHTENING",
            VolatilityDirection::Undefined => "UNDEFINED",
        })
    }
}

impl fmt::Display for StochasticDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StochasticDirection::Up => "UP",
            StochasticDirection::Down => "DOWN",
            StochasticDirection::Undefined => "UNDEFINED",
        })
    }
}

impl fmt::Display for Convergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convergence::Undefined => f.write_str("UNDEFINED"),
            Convergence::NotConverging => f.write_str("not converging"),
            Convergence::BarsToCross(n) => write!(f, "~{} bars to cross", n),
        }
    }
}
