//! IndicatorFrame: an OHLCV series plus its derived indicator columns.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Bar;
use std::collections::HashMap;

/// A series with named derived columns keyed by indicator identity.
///
/// Source bars are never mutated; every derived column is appended. Any
/// point at index i depends only on bars at index <= i.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
}

impl IndicatorFrame {
    pub fn new(symbol: String, bars: Vec<Bar>) -> Self {
        Self {
            symbol,
            bars,
            indicators: HashMap::new(),
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn series(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators.get(indicator_type)
    }

    pub fn insert(&mut self, series: IndicatorSeries) {
        self.indicators.insert(series.indicator_type.clone(), series);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{IndicatorPoint, IndicatorValue};
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(i: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i as i64)
    }

    fn make_bar(i: usize, close: f64) -> Bar {
        Bar {
            symbol: "TEST".into(),
            timestamp: ts(i),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn frame_starts_with_no_indicators() {
        let frame = IndicatorFrame::new("TEST".into(), vec![make_bar(0, 100.0)]);
        assert_eq!(frame.bar_count(), 1);
        assert!(frame.indicators.is_empty());
    }

    #[test]
    fn insert_and_lookup_series() {
        let mut frame = IndicatorFrame::new("TEST".into(), vec![make_bar(0, 100.0)]);
        frame.insert(IndicatorSeries {
            indicator_type: IndicatorType::Ema(5),
            values: vec![IndicatorPoint {
                timestamp: ts(0),
                valid: true,
                value: IndicatorValue::Simple(100.0),
            }],
        });

        assert!(frame.series(&IndicatorType::Ema(5)).is_some());
        assert!(frame.series(&IndicatorType::Ema(20)).is_none());
    }
}
