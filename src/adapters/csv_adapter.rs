//! CSV file data adapter.
//!
//! Reads `<dir>/<SYMBOL>_<interval>.csv` with columns
//! `timestamp,open,high,low,close,volume` and RFC 3339 timestamps.

use crate::domain::error::TickergridError;
use crate::domain::ohlcv::{Bar, Interval};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, interval))
    }
}

fn parse_column<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, TickergridError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| TickergridError::Data {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| TickergridError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        interval: Interval,
    ) -> Result<Vec<Bar>, TickergridError> {
        let path = self.csv_path(symbol, interval);
        let content = fs::read_to_string(&path).map_err(|e| TickergridError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TickergridError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = record.get(0).ok_or_else(|| TickergridError::Data {
                reason: "missing timestamp column".into(),
            })?;
            let timestamp = DateTime::parse_from_rfc3339(ts_str)
                .map_err(|e| TickergridError::Data {
                    reason: format!("invalid timestamp: {}", e),
                })?
                .with_timezone(&Utc);

            if let Some(start) = start {
                if timestamp < start {
                    continue;
                }
            }
            if let Some(end) = end {
                if timestamp > end {
                    continue;
                }
            }

            bars.push(Bar {
                symbol: symbol.to_string(),
                timestamp,
                open: parse_column(&record, 1, "open")?,
                high: parse_column(&record, 2, "high")?,
                low: parse_column(&record, 3, "low")?,
                close: parse_column(&record, 4, "close")?,
                volume: parse_column(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    fn list_symbols(&self, interval: Interval) -> Result<Vec<String>, TickergridError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TickergridError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", interval);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TickergridError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.ends_with(&suffix) {
                let symbol = &name_str[..name_str.len() - suffix.len()];
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
