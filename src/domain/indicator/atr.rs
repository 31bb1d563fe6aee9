//! ATR (Average True Range) indicator.
//!
//! True range = max(high - low, |high - prev_close|, |low - prev_close|);
//! the first bar has no previous close, so its true range is high - low.
//! ATR is the rolling mean of true range over `period`. Warmup: first
//! (period-1) bars are invalid.

use crate::domain::error::TickergridError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

pub fn calculate_atr(bars: &[Bar], period: usize) -> Result<IndicatorSeries, TickergridError> {
    let tr = true_ranges(bars);
    let atr = transform::sma(&tr, period)?;

    let values = bars
        .iter()
        .zip(atr)
        .map(|(bar, a)| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: a.is_some(),
            value: IndicatorValue::Simple(a.unwrap_or(0.0)),
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    })
}
