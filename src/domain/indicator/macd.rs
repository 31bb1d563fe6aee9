//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(close, fast) - EMA(close, slow)
//! Signal Line = EMA(MACD Line, signal)
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. With first-value-seeded
//! EMAs every point is defined, so the series carries no warm-up prefix.

use crate::domain::error::TickergridError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> Result<IndicatorSeries, TickergridError> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let ema_fast = transform::ema(&closes, fast)?;
    let ema_slow = transform::ema(&closes, slow)?;

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = transform::ema(&macd_line, signal_span)?;

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            },
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Macd {
            fast,
            slow,
            signal: signal_span,
        },
        values,
    })
}

pub fn calculate_macd_default(bars: &[Bar]) -> Result<IndicatorSeries, TickergridError> {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
