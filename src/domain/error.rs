//! Domain error types.

use crate::domain::timeframe::Timeframe;

/// Input shape problems detected before any computation starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedInput {
    #[error("series is empty")]
    Empty,

    #[error("timestamps not strictly increasing at bar {index}")]
    NonMonotonic { index: usize },

    #[error("non-finite {field} at bar {index}")]
    NonFinite { index: usize, field: &'static str },
}

/// Why a series was refused by the validator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInput),
}

/// Cause attached to an [`Unavailable`] result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnavailableReason {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("data source: {0}")]
    DataSource(String),
}

/// Marker returned in place of a snapshot. Never carries partial values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{symbol} ({timeframe}): {reason}")]
pub struct Unavailable {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub reason: UnavailableReason,
}

/// Top-level error type for signalboard.
#[derive(Debug, thiserror::Error)]
pub enum SignalboardError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalboardError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SignalboardError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SignalboardError> for std::process::ExitCode {
    fn from(err: &SignalboardError) -> Self {
        let code: u8 = match err {
            SignalboardError::Io(_) => 1,
            SignalboardError::ConfigParse { .. }
            | SignalboardError::ConfigMissing { .. }
            | SignalboardError::ConfigInvalid { .. } => 2,
            SignalboardError::DataSource { .. } | SignalboardError::NoData { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages() {
        let r = Rejection::InsufficientData {
            bars: 3,
            minimum: 50,
        };
        assert_eq!(r.to_string(), "insufficient data: have 3 bars, need 50");

        let r = Rejection::from(MalformedInput::NonFinite {
            index: 7,
            field: "close",
        });
        assert_eq!(r.to_string(), "malformed input: non-finite close at bar 7");
    }

    #[test]
    fn unavailable_message_names_symbol_and_timeframe() {
        let u = Unavailable {
            symbol: "AAPL".into(),
            timeframe: Timeframe::Weekly,
            reason: UnavailableReason::DataSource("timeout".into()),
        };
        assert_eq!(u.to_string(), "AAPL (weekly): data source: timeout");
    }

    #[test]
    fn invalid_helper_fills_fields() {
        let err = SignalboardError::invalid("signals", "fast_ema", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config value [signals] fast_ema: must be positive"
        );
    }
}
