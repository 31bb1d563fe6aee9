//! OBV (On-Balance Volume) indicator.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

/// Calculate OBV (On-Balance Volume).
///
/// OBV[0] = volume[0]
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
///
/// No warmup period; all bars are valid.
pub fn calculate_obv(bars: &[Bar]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let mut obv: f64 = 0.0;
    let mut prev_close: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            obv = bar.volume as f64;
        } else if bar.close > prev_close {
            obv += bar.volume as f64;
        } else if bar.close < prev_close {
            obv -= bar.volume as f64;
        }
        prev_close = bar.close;

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Simple(obv),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Obv,
        values,
    }
}
