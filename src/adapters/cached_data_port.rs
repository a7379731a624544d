//! Time-bounded cache in front of any [`DataPort`].
//!
//! Entries are keyed by (symbol, timeframe) and expire after `ttl`. Errors
//! are passed through and never stored, so a failed fetch is retried on the
//! next request.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::error::SignalboardError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::DataPort;

struct CachedBars {
    fetched_at: Instant,
    bars: Vec<OhlcvBar>,
}

pub struct CachedDataPort<P> {
    inner: P,
    ttl: Duration,
    entries: RwLock<HashMap<(String, Timeframe), CachedBars>>,
}

impl<P: DataPort> CachedDataPort<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn fresh(&self, key: &(String, Timeframe)) -> Option<Vec<OhlcvBar>> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.bars.clone())
    }
}

impl<P: DataPort> DataPort for CachedDataPort<P> {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<OhlcvBar>, SignalboardError> {
        let key = (symbol.to_string(), timeframe);
        if let Some(bars) = self.fresh(&key) {
            debug!(symbol, %timeframe, "cache hit");
            return Ok(bars);
        }

        let bars = self.inner.fetch_ohlcv(symbol, timeframe)?;
        if !self.ttl.is_zero() {
            self.entries.write().insert(
                key,
                CachedBars {
                    fetched_at: Instant::now(),
                    bars: bars.clone(),
                },
            );
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalboardError> {
        self.inner.list_symbols()
    }
}
