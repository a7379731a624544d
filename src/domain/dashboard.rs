//! Multi-instrument dashboard: one snapshot attempt per symbol.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::config::SignalConfig;
use crate::domain::error::{Unavailable, UnavailableReason};
use crate::domain::snapshot::{build_snapshot, Snapshot};
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::DataPort;

/// `[dashboard]` and `[data]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub symbols: Vec<String>,
    pub timeframe: Timeframe,
    pub data_dir: PathBuf,
    pub cache_ttl: Duration,
}

pub type DashboardEntry = Result<Snapshot, Unavailable>;

fn snapshot_one(
    port: &(dyn DataPort + Sync),
    symbol: &str,
    timeframe: Timeframe,
    config: &SignalConfig,
) -> DashboardEntry {
    let bars = port.fetch_ohlcv(symbol, timeframe).map_err(|e| Unavailable {
        symbol: symbol.to_string(),
        timeframe,
        reason: UnavailableReason::DataSource(e.to_string()),
    })?;
    build_snapshot(symbol, timeframe, &bars, config)
}

/// Build snapshots for every symbol, in input order.
///
/// Symbols are independent, so each runs on its own scoped thread. A failing
/// symbol becomes an [`Unavailable`] entry and never affects the others.
pub fn build_dashboard(
    port: &(dyn DataPort + Sync),
    symbols: &[String],
    timeframe: Timeframe,
    config: &SignalConfig,
) -> Vec<DashboardEntry> {
    let entries: Vec<DashboardEntry> = std::thread::scope(|scope| {
        let handles: Vec<_> = symbols
            .iter()
            .map(|symbol| scope.spawn(move || snapshot_one(port, symbol, timeframe, config)))
            .collect();

        handles
            .into_iter()
            .zip(symbols)
            .map(|(handle, symbol)| {
                handle.join().unwrap_or_else(|_| {
                    Err(Unavailable {
                        symbol: symbol.clone(),
                        timeframe,
                        reason: UnavailableReason::DataSource("worker panicked".into()),
                    })
                })
            })
            .collect()
    });

    for entry in &entries {
        if let Err(unavailable) = entry {
            warn!(%unavailable, "skipping");
        }
    }
    let ready = entries.iter().filter(|e| e.is_ok()).count();
    debug!(ready, total = entries.len(), %timeframe, "dashboard built");

    entries
}
