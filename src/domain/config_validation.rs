//! Configuration loading and validation.
//!
//! Every key is optional and falls back to [`SignalConfig::default`]; a key
//! that is present must parse and satisfy its range check.

use std::time::Duration;

use crate::domain::config::{parse_convergence_pairs, parse_indicator_list, SignalConfig};
use crate::domain::dashboard::DashboardSettings;
use crate::domain::error::SignalboardError;
use crate::domain::timeframe::Timeframe;
use crate::domain::universe::{default_symbols, parse_symbols};
use crate::ports::config_port::ConfigPort;

const SIGNALS: &str = "signals";
const DASHBOARD: &str = "dashboard";
const DATA: &str = "data";

/// Largest accepted `min_bars`; far beyond any indicator window in use.
pub const MAX_MIN_BARS: i64 = 10_000;

fn int_key(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, SignalboardError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SignalboardError::invalid(section, key, format!("not an integer: {raw}"))),
    }
}

fn float_key(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SignalboardError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SignalboardError::invalid(section, key, format!("not a number: {raw}"))),
    }
}

fn window_key(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
    minimum: i64,
) -> Result<usize, SignalboardError> {
    let value = int_key(config, SIGNALS, key, default as i64)?;
    if value < minimum {
        return Err(SignalboardError::invalid(
            SIGNALS,
            key,
            format!("{key} must be at least {minimum}"),
        ));
    }
    Ok(value as usize)
}

/// Read the `[signals]` section into a checked [`SignalConfig`].
pub fn load_signal_config(config: &dyn ConfigPort) -> Result<SignalConfig, SignalboardError> {
    let defaults = SignalConfig::default();

    let min_bars = window_key(config, "min_bars", defaults.min_bars, 1)?;
    if min_bars as i64 > MAX_MIN_BARS {
        return Err(SignalboardError::invalid(
            SIGNALS,
            "min_bars",
            format!("min_bars must be at most {MAX_MIN_BARS}"),
        ));
    }

    let fast_ema = window_key(config, "fast_ema", defaults.fast_ema, 1)?;
    let stochastic_window = window_key(config, "stochastic_window", defaults.stochastic_window, 1)?;
    let convergence_lookback =
        window_key(config, "convergence_lookback", defaults.convergence_lookback, 2)?;
    let change_lookback = window_key(config, "change_lookback", defaults.change_lookback, 1)?;

    let bollinger_period = window_key(config, "bollinger_period", defaults.bollinger.period, 2)?;
    let bollinger_mult = float_key(config, SIGNALS, "bollinger_mult", defaults.bollinger.multiplier)?;
    if bollinger_mult <= 0.0 {
        return Err(SignalboardError::invalid(
            SIGNALS,
            "bollinger_mult",
            "bollinger_mult must be positive",
        ));
    }

    let proximity_pct = float_key(config, SIGNALS, "proximity_pct", defaults.proximity_pct)?;
    if !(0.0..100.0).contains(&proximity_pct) {
        return Err(SignalboardError::invalid(
            SIGNALS,
            "proximity_pct",
            "proximity_pct must be in [0, 100)",
        ));
    }

    let cross_upper = float_key(config, SIGNALS, "cross_upper", defaults.cross_upper)?;
    let cross_lower = float_key(config, SIGNALS, "cross_lower", defaults.cross_lower)?;
    if !(0.0 < cross_lower && cross_lower < cross_upper && cross_upper < 100.0) {
        return Err(SignalboardError::invalid(
            SIGNALS,
            "cross_upper",
            "thresholds must satisfy 0 < cross_lower < cross_upper < 100",
        ));
    }

    let targets = match config.get_string(SIGNALS, "targets") {
        None => defaults.targets,
        Some(raw) => parse_indicator_list(&raw)
            .map_err(|e| SignalboardError::invalid(SIGNALS, "targets", e.to_string()))?,
    };

    let convergence = match config.get_string(SIGNALS, "convergence") {
        None => defaults.convergence,
        Some(raw) => parse_convergence_pairs(&raw)
            .map_err(|e| SignalboardError::invalid(SIGNALS, "convergence", e.to_string()))?,
    };

    Ok(SignalConfig {
        min_bars,
        fast_ema,
        targets,
        bollinger: crate::domain::config::BollingerParams {
            period: bollinger_period,
            multiplier: bollinger_mult,
        },
        stochastic_window,
        proximity_pct,
        cross_upper,
        cross_lower,
        convergence_lookback,
        convergence,
        change_lookback,
    })
}

/// Read `[dashboard]` and `[data]` into [`DashboardSettings`].
pub fn load_dashboard_settings(
    config: &dyn ConfigPort,
) -> Result<DashboardSettings, SignalboardError> {
    let symbols = match config.get_string(DASHBOARD, "symbols") {
        None => default_symbols(),
        Some(raw) => parse_symbols(&raw)
            .map_err(|e| SignalboardError::invalid(DASHBOARD, "symbols", e.to_string()))?,
    };

    let timeframe = match config.get_string(DASHBOARD, "timeframe") {
        None => Timeframe::Daily,
        Some(raw) => raw
            .parse()
            .map_err(|e: crate::domain::timeframe::UnknownTimeframe| {
                SignalboardError::invalid(DASHBOARD, "timeframe", e.to_string())
            })?,
    };

    let data_dir = match config.get_string(DATA, "directory") {
        None => "data".to_string(),
        Some(raw) if raw.trim().is_empty() => {
            return Err(SignalboardError::ConfigMissing {
                section: DATA.to_string(),
                key: "directory".to_string(),
            });
        }
        Some(raw) => raw.trim().to_string(),
    };

    let ttl = int_key(config, DATA, "cache_ttl_secs", 600)?;
    if ttl < 0 {
        return Err(SignalboardError::invalid(
            DATA,
            "cache_ttl_secs",
            "cache_ttl_secs must be non-negative",
        ));
    }

    Ok(DashboardSettings {
        symbols,
        timeframe,
        data_dir: data_dir.into(),
        cache_ttl: Duration::from_secs(ttl as u64),
    })
}

/// Read every section, failing on the first invalid key.
pub fn load_full_config(
    config: &dyn ConfigPort,
) -> Result<(DashboardSettings, SignalConfig), SignalboardError> {
    let settings = load_dashboard_settings(config)?;
    let signals = load_signal_config(config)?;
    Ok((settings, signals))
}
