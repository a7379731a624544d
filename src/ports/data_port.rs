//! Price data access port.

use crate::domain::error::SignalboardError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::timeframe::Timeframe;

pub trait DataPort {
    /// Date-ordered bars for `symbol` at `timeframe`.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<OhlcvBar>, SignalboardError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalboardError>;
}
