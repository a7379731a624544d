//! Aggregation of daily bars into weekly or monthly bars.

use chrono::{Datelike, NaiveDate};

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::timeframe::Timeframe;

fn bucket(date: NaiveDate, timeframe: Timeframe) -> (i32, u32) {
    match timeframe {
        Timeframe::Daily => (date.year(), date.ordinal()),
        Timeframe::Weekly => {
            let week = date.iso_week();
            (week.year(), week.week())
        }
        Timeframe::Monthly => (date.year(), date.month()),
    }
}

/// Aggregate date-ordered `bars` into `timeframe` buckets.
///
/// open = first open, high = max high, low = min low, close = last close,
/// volume = sum, date = last date in the bucket. Daily is the identity.
pub fn resample(bars: &[OhlcvBar], timeframe: Timeframe) -> Vec<OhlcvBar> {
    if timeframe == Timeframe::Daily {
        return bars.to_vec();
    }

    let mut out: Vec<OhlcvBar> = Vec::new();
    let mut current: Option<(i32, u32)> = None;

    for bar in bars {
        let key = bucket(bar.date, timeframe);
        if current == Some(key) {
            if let Some(agg) = out.last_mut() {
                agg.date = bar.date;
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume = agg.volume.saturating_add(bar.volume);
                continue;
            }
        }
        out.push(bar.clone());
        current = Some(key);
    }

    out
}
