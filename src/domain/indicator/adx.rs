//! ADX / DI (Average Directional Index) indicator.
//!
//! Directional movement from consecutive high/low diffs:
//! +DM = up-move when it exceeds the down-move and is positive, else 0;
//! -DM symmetrically. +DM, -DM and true range are Wilder-smoothed over
//! `period`; ±DI = 100 * smoothed(±DM) / smoothed(TR);
//! DX = 100 * |+DI - (-DI)| / (+DI + (-DI)), zero-sum guarded to 0;
//! ADX = Wilder-smoothed DX.
//!
//! Warmup: DI needs `period` diffs, ADX needs `period` DX values on top,
//! so the first 2*period-1 bars are invalid.

use crate::domain::error::TickergridError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

pub fn calculate_adx(bars: &[Bar], period: usize) -> Result<IndicatorSeries, TickergridError> {
    if period < 1 {
        return Err(TickergridError::InvalidParameter {
            name: "adx_period".into(),
            reason: format!("must be >= 1, got {}", period),
        });
    }

    // Per-diff series, index j describes the move into bar j+1.
    let mut plus_dm = Vec::new();
    let mut minus_dm = Vec::new();
    let mut tr = Vec::new();
    for i in 1..bars.len() {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        tr.push(bars[i].true_range(bars[i - 1].close));
    }

    let sm_plus = transform::wilder_smoothing(&plus_dm, period)?;
    let sm_minus = transform::wilder_smoothing(&minus_dm, period)?;
    let sm_tr = transform::wilder_smoothing(&tr, period)?;

    // DI and DX per bar, where defined.
    let mut di: Vec<Option<(f64, f64)>> = vec![None; bars.len()];
    let mut dx_stream = Vec::new();
    for i in 1..bars.len() {
        let j = i - 1;
        if let (Some(p), Some(m), Some(t)) = (sm_plus[j], sm_minus[j], sm_tr[j]) {
            let (plus_di, minus_di) = if t == 0.0 {
                (0.0, 0.0)
            } else {
                (100.0 * p / t, 100.0 * m / t)
            };
            di[i] = Some((plus_di, minus_di));

            let di_sum = plus_di + minus_di;
            let dx = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            };
            dx_stream.push(dx);
        }
    }

    let sm_dx = transform::wilder_smoothing(&dx_stream, period)?;

    let mut values = Vec::with_capacity(bars.len());
    let mut dx_idx = 0usize;
    for (i, bar) in bars.iter().enumerate() {
        let point = match di[i] {
            Some((plus_di, minus_di)) => {
                let adx = sm_dx.get(dx_idx).copied().flatten();
                dx_idx += 1;
                IndicatorPoint {
                    timestamp: bar.timestamp,
                    valid: adx.is_some(),
                    value: IndicatorValue::Adx {
                        adx: adx.unwrap_or(0.0),
                        plus_di,
                        minus_di,
                    },
                }
            }
            None => IndicatorPoint {
                timestamp: bar.timestamp,
                valid: false,
                value: IndicatorValue::Adx {
                    adx: 0.0,
                    plus_di: 0.0,
                    minus_di: 0.0,
                },
            },
        };
        values.push(point);
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Adx(period),
        values,
    })
}
