//! Market-data access port.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::{Bar, Instrument, Interval};
use chrono::NaiveDate;

/// Source of instruments and historical bars.
///
/// Implementations are shared by every fan-out worker, hence `Send + Sync`.
pub trait MarketDataPort: Send + Sync {
    fn resolve_instrument(&self, exchange: &str, token: &str)
    -> Result<Instrument, ScreenerError>;

    /// Bars in `[from_date, to_date]`, ascending by date.
    fn fetch_bars(
        &self,
        instrument: &Instrument,
        from_date: NaiveDate,
        to_date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Bar>, ScreenerError>;

    /// Batch-level reachability check, run once before any fan-out.
    fn check_available(&self) -> Result<(), ScreenerError> {
        Ok(())
    }
}
