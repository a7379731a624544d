#![allow(dead_code)]

use chrono::NaiveDate;
use signalboard::domain::error::SignalboardError;
pub use signalboard::domain::ohlcv::OhlcvBar;
use signalboard::domain::timeframe::Timeframe;
use signalboard::ports::data_port::DataPort;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub fetches: AtomicUsize,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
    ) -> Result<Vec<OhlcvBar>, SignalboardError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalboardError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalboardError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day from 2024-01-01, with a one-point range around
/// each close and opens alternating above and below it.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i % 2 == 0 { close - 0.25 } else { close + 0.25 };
            OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000 + i as i64,
            }
        })
        .collect()
}

pub fn trending_bars(n: usize, start_price: f64, step: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..n).map(|i| start_price + step * i as f64).collect();
    bars_from_closes(&closes)
}

pub fn oscillating_bars(n: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..n)
        .map(|i| 100.0 + (i as f64 * 0.4).sin() * 10.0)
        .collect();
    bars_from_closes(&closes)
}

/// `date,open,high,low,close,volume` CSV text for `bars`.
pub fn to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    out
}
