#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use tickergrid::domain::config::{ScanConfig, SignalPolicy};
use tickergrid::domain::error::TickergridError;
use tickergrid::domain::ohlcv::{Bar, Interval};
use tickergrid::domain::predicate_parser;
use tickergrid::ports::data_port::DataPort;

pub fn ts(i: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i as i64)
}

pub fn make_bar(symbol: &str, i: usize, close: f64) -> Bar {
    Bar {
        symbol: symbol.into(),
        timestamp: ts(i),
        open: close,
        high: close + 1.0,
        low: (close - 1.0).max(0.01),
        close,
        volume: 1000,
    }
}

pub fn make_bars(symbol: &str, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(symbol, i, c))
        .collect()
}

/// A config whose candidate condition is a single close-price predicate,
/// which makes scenarios easy to stage.
pub fn close_threshold_config(predicate: &str, exit_band_pct: f64) -> ScanConfig {
    ScanConfig {
        signals: SignalPolicy {
            predicates: predicate_parser::parse_list(predicate).unwrap(),
            score_threshold: 1.0,
            edge_trigger: true,
            exit_band: exit_band_pct / 100.0,
            target_gain: 1.04,
            alert_on_latest: false,
        },
        ..ScanConfig::default()
    }
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        _start: Option<DateTime<Utc>>,
        _end: Option<DateTime<Utc>>,
        _interval: Interval,
    ) -> Result<Vec<Bar>, TickergridError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TickergridError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self, _interval: Interval) -> Result<Vec<String>, TickergridError> {
        Ok(self.data.keys().cloned().collect())
    }
}
