//! SuperTrend indicator.
//!
//! Basic bands = (high + low)/2 ± multiplier * ATR. The final bands carry
//! the prior bar's final band as state, and the trend line switches sides
//! only when the close crosses a final band. Both are genuine sequential
//! recurrences, computed in one forward pass with an explicit accumulator.
//!
//! The line seeds at 0.0 and holds its previous value until the first
//! cross. Warmup follows ATR: first (period-1) bars are invalid.

use crate::domain::error::TickergridError;
use crate::domain::indicator::atr::true_ranges;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

struct BandState {
    final_upper: f64,
    final_lower: f64,
    line: f64,
    prev_close: f64,
}

pub fn calculate_supertrend(
    bars: &[Bar],
    period: usize,
    multiplier: f64,
) -> Result<IndicatorSeries, TickergridError> {
    if multiplier <= 0.0 {
        return Err(TickergridError::InvalidParameter {
            name: "supertrend_multiplier".into(),
            reason: format!("must be > 0, got {}", multiplier),
        });
    }

    let tr = true_ranges(bars);
    let atr = transform::sma(&tr, period)?;

    let indicator_type = IndicatorType::SuperTrend {
        period,
        mult_x100: (multiplier * 100.0).round() as u32,
    };

    let mut values = Vec::with_capacity(bars.len());
    let mut state: Option<BandState> = None;

    for (i, bar) in bars.iter().enumerate() {
        let Some(atr_val) = atr[i] else {
            values.push(IndicatorPoint {
                timestamp: bar.timestamp,
                valid: false,
                value: IndicatorValue::SuperTrend {
                    line: 0.0,
                    upper: 0.0,
                    lower: 0.0,
                },
            });
            continue;
        };

        let basic_upper = bar.median_price() + multiplier * atr_val;
        let basic_lower = bar.median_price() - multiplier * atr_val;

        let next = match state {
            None => BandState {
                final_upper: basic_upper,
                final_lower: basic_lower,
                line: 0.0,
                prev_close: bar.close,
            },
            Some(prev) => {
                let final_upper = if prev.prev_close > prev.final_upper {
                    basic_upper.min(prev.final_upper)
                } else {
                    basic_upper
                };
                let final_lower = if prev.prev_close < prev.final_lower {
                    basic_lower.max(prev.final_lower)
                } else {
                    basic_lower
                };

                let line = if prev.prev_close <= prev.final_upper && bar.close > final_upper {
                    final_lower
                } else if prev.prev_close >= prev.final_lower && bar.close < final_lower {
                    final_upper
                } else {
                    prev.line
                };

                BandState {
                    final_upper,
                    final_lower,
                    line,
                    prev_close: bar.close,
                }
            }
        };

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::SuperTrend {
                line: next.line,
                upper: next.final_upper,
                lower: next.final_lower,
            },
        });
        state = Some(next);
    }

    Ok(IndicatorSeries {
        indicator_type,
        values,
    })
}
