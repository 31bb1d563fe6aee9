//! Simple Moving Average indicator.
//!
//! Arithmetic mean of the trailing `window` closes. Warmup: first
//! (window-1) bars are invalid.

use crate::domain::error::TickergridError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

pub fn calculate_sma(bars: &[Bar], window: usize) -> Result<IndicatorSeries, TickergridError> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let sma = transform::sma(&closes, window)?;

    let values = bars
        .iter()
        .zip(sma)
        .map(|(bar, s)| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: s.is_some(),
            value: IndicatorValue::Simple(s.unwrap_or(0.0)),
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Sma(window),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(i: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i as i64)
    }

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                symbol: "TEST".into(),
                timestamp: ts(i),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 3).unwrap();

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
    }

    #[test]
    fn sma_trailing_mean() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 3).unwrap();

        if let IndicatorValue::Simple(v) = series.values[2].value {
            assert!((v - 20.0).abs() < 1e-12);
        }
        if let IndicatorValue::Simple(v) = series.values[3].value {
            assert!((v - 30.0).abs() < 1e-12);
        }
    }

    #[test]
    fn sma_zero_window_is_error() {
        let bars = make_bars(&[10.0]);
        assert!(calculate_sma(&bars, 0).is_err());
    }

    #[test]
    fn sma_indicator_type() {
        let bars = make_bars(&[10.0]);
        let series = calculate_sma(&bars, 10).unwrap();
        assert_eq!(series.indicator_type, IndicatorType::Sma(10));
    }
}
