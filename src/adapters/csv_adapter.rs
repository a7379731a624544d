//! CSV file data adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, holding daily bars with a
//! `date,open,high,low,close,volume` header. Weekly and monthly requests are
//! resampled from the daily file.

use crate::domain::error::SignalboardError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::resample::resample;
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

fn source_error(reason: String) -> SignalboardError {
    SignalboardError::DataSource { reason }
}

fn column<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str, SignalboardError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| source_error(format!("missing {name} column")))
}

fn price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, SignalboardError> {
    column(record, index, name)?
        .parse()
        .map_err(|e| source_error(format!("invalid {name} value: {e}")))
}

/// Whole-number volume. Float exports such as "1200.0" are accepted when
/// they are finite, integral and fit in `i64`.
fn volume(record: &csv::StringRecord, index: usize) -> Result<i64, SignalboardError> {
    let raw = column(record, index, "volume")?;
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    let v: f64 = raw
        .parse()
        .map_err(|e| source_error(format!("invalid volume value: {e}")))?;
    if !v.is_finite() || v.fract() != 0.0 || v < i64::MIN as f64 || v >= i64::MAX as f64 {
        return Err(source_error(format!("invalid volume value: {raw}")));
    }
    Ok(v as i64)
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    fn read_daily(&self, symbol: &str) -> Result<Vec<OhlcvBar>, SignalboardError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SignalboardError::NoData {
                    symbol: symbol.to_string(),
                }
            } else {
                source_error(format!("failed to read {}: {}", path.display(), e))
            }
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| source_error(format!("CSV parse error: {e}")))?;

            let date_str = column(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| source_error(format!("invalid date format: {e}")))?;

            bars.push(OhlcvBar {
                date,
                open: price(&record, 1, "open")?,
                high: price(&record, 2, "high")?,
                low: price(&record, 3, "low")?,
                close: price(&record, 4, "close")?,
                volume: volume(&record, 5)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded csv");
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<OhlcvBar>, SignalboardError> {
        let daily = self.read_daily(symbol)?;
        if daily.is_empty() {
            return Err(SignalboardError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(resample(&daily, timeframe))
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalboardError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            source_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| source_error(format!("directory entry error: {e}")))?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        // Deliberately out of order; 2024-01-15 is a Monday.
        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-22,115.0,125.0,110.0,120.0,70000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000.0\n";

        fs::write(path.join("BHP.csv"), csv_content).unwrap();
        fs::write(path.join("CBA.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,abc,1,1,1,1\n",
        )
        .unwrap();
        fs::write(path.join("notes.txt"), "ignored").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_daily_sorts_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_ohlcv("BHP", Timeframe::Daily).unwrap();

        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
        assert_eq!(bars[2].volume, 55000);
        assert_eq!(bars[3].date, NaiveDate::from_ymd_opt(2024, 1, 22).unwrap());
    }

    #[test]
    fn fetch_weekly_resamples() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_ohlcv("BHP", Timeframe::Weekly).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 120.0);
        assert_eq!(bars[0].close, 115.0);
        assert_eq!(bars[0].volume, 165000);
    }

    #[test]
    fn missing_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_ohlcv("XYZ", Timeframe::Daily);
        assert!(matches!(result, Err(SignalboardError::NoData { symbol }) if symbol == "XYZ"));
    }

    #[test]
    fn header_only_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert!(matches!(
            adapter.fetch_ohlcv("CBA", Timeframe::Daily),
            Err(SignalboardError::NoData { .. })
        ));
    }

    #[test]
    fn bad_number_is_data_source_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert!(matches!(
            adapter.fetch_ohlcv("BAD", Timeframe::Daily),
            Err(SignalboardError::DataSource { .. })
        ));
    }

    #[test]
    fn fractional_or_non_finite_volume_is_data_source_error() {
        let (_dir, path) = setup_test_data();
        let header = "date,open,high,low,close,volume\n";
        for (symbol, volume) in [("FRAC", "1200.5"), ("NAN", "NaN"), ("INF", "inf"), ("HUGE", "1e30")] {
            fs::write(
                path.join(format!("{symbol}.csv")),
                format!("{header}2024-01-15,1,1,1,1,{volume}\n"),
            )
            .unwrap();
        }
        let adapter = CsvAdapter::new(path);

        for symbol in ["FRAC", "NAN", "INF", "HUGE"] {
            assert!(
                matches!(
                    adapter.fetch_ohlcv(symbol, Timeframe::Daily),
                    Err(SignalboardError::DataSource { ref reason }) if reason.contains("volume")
                ),
                "{symbol} should be rejected"
            );
        }
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.list_symbols().unwrap(), vec!["BAD", "BHP", "CBA"]);
    }

    #[test]
    fn list_symbols_missing_directory() {
        let adapter = CsvAdapter::new(PathBuf::from("/nonexistent/bars"));
        assert!(adapter.list_symbols().is_err());
    }
}
