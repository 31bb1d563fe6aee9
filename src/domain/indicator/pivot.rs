//! Pivot point indicator.
//!
//! All levels derive from the *previous* bar's high/low/close only:
//! P  = (H + L + C) / 3
//! R1 = 2P - L        S1 = 2P - H
//! R2 = P + (H - L)   S2 = P - (H - L)
//!
//! The first bar has no predecessor and is invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub fn calculate_pivot(bars: &[Bar]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let point = if i == 0 {
            IndicatorPoint {
                timestamp: bar.timestamp,
                valid: false,
                value: IndicatorValue::Pivot {
                    pivot: 0.0,
                    r1: 0.0,
                    r2: 0.0,
                    s1: 0.0,
                    s2: 0.0,
                },
            }
        } else {
            let prev = &bars[i - 1];
            let pivot = (prev.high + prev.low + prev.close) / 3.0;
            let range = prev.high - prev.low;
            IndicatorPoint {
                timestamp: bar.timestamp,
                valid: true,
                value: IndicatorValue::Pivot {
                    pivot,
                    r1: 2.0 * pivot - prev.low,
                    r2: pivot + range,
                    s1: 2.0 * pivot - prev.high,
                    s2: pivot - range,
                },
            }
        };
        values.push(point);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Pivot,
        values,
    }
}
