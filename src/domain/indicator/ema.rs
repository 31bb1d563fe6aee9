//! Exponential Moving Average indicator.
//!
//! k = 2/(span+1), seeded with the first close: EMA[0] = C[0],
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Defined from the first bar, so every
//! point is valid.

use crate::domain::error::TickergridError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

pub fn calculate_ema(bars: &[Bar], span: usize) -> Result<IndicatorSeries, TickergridError> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema = transform::ema(&closes, span)?;

    let values = bars
        .iter()
        .zip(ema)
        .map(|(bar, e)| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Simple(e),
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    })
}
