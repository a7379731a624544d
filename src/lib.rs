//! signalboard: technical-analysis snapshots for OHLC price series.
//!
//! Hexagonal architecture: indicator and signal computation in [`domain`],
//! port traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
