//! Core domain types and logic.

pub mod ohlcv;
pub mod error;
pub mod timeframe;
pub mod series;
pub mod indicator;
pub mod indicator_bank;
pub mod config;
pub mod config_validation;
pub mod signal;
pub mod signal_eval;
pub mod snapshot;
pub mod resample;
pub mod dashboard;
pub mod universe;
