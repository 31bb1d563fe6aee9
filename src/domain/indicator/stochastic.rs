//! Stochastic oscillator (%K / %D).
//!
//! %K = (close - min(low, k_period)) / (max(high, k_period) - min(low, k_period)) * 100
//! %D = SMA(%K, d_period)
//!
//! A zero-range window (max == min) yields an invalid point rather than a
//! NaN or infinity. %D needs d_period defined %K values, so a zero-range
//! window also poisons the %D values that overlap it.

use crate::domain::error::TickergridError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

pub fn calculate_stochastic(
    bars: &[Bar],
    k_period: usize,
    d_period: usize,
) -> Result<IndicatorSeries, TickergridError> {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();

    let min_low = transform::rolling_min(&lows, k_period)?;
    let max_high = transform::rolling_max(&highs, k_period)?;
    if d_period < 1 {
        return Err(TickergridError::InvalidParameter {
            name: "stoch_d".into(),
            reason: format!("must be >= 1, got {}", d_period),
        });
    }

    let k_values: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match min_low[i].zip(max_high[i]) {
            Some((lo, hi)) if hi > lo => Some((bar.close - lo) / (hi - lo) * 100.0),
            _ => None,
        })
        .collect();

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let k = k_values[i];

        // %D: mean of the trailing d_period %K values, all of which must be defined.
        let d = if i + 1 >= d_period {
            let window = &k_values[i + 1 - d_period..=i];
            if window.iter().all(|v| v.is_some()) {
                Some(window.iter().map(|v| v.unwrap()).sum::<f64>() / d_period as f64)
            } else {
                None
            }
        } else {
            None
        };

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: k.is_some() && d.is_some(),
            value: IndicatorValue::Stochastic {
                k: k.unwrap_or(0.0),
                d: d.unwrap_or(0.0),
            },
        });
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Stochastic { k_period, d_period },
        values,
    })
}
