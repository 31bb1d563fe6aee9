//! Data access port trait.

use crate::domain::error::TickergridError;
use crate::domain::ohlcv::{Bar, Interval};
use chrono::{DateTime, Utc};

pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        interval: Interval,
    ) -> Result<Vec<Bar>, TickergridError>;

    fn list_symbols(&self, interval: Interval) -> Result<Vec<String>, TickergridError>;
}
