//! RSI (Relative Strength Index) indicator.
//!
//! Gains/losses come from consecutive close diffs; their averaging is a
//! policy choice:
//! - `RsiSmoothing::Wilder` (default): first average is a simple mean over
//!   the first n diffs, then avg = (prev_avg * (n-1) + current) / n
//! - `RsiSmoothing::Simple`: plain trailing mean over the last n diffs
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)).
//! If avg_loss == 0: RSI saturates to 100 rather than dividing by zero.
//!
//! Warmup: first n bars are invalid (n price changes are needed for the
//! first average).

use crate::domain::error::TickergridError;
use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, RsiSmoothing,
};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

pub fn calculate_rsi(
    bars: &[Bar],
    period: usize,
    smoothing: RsiSmoothing,
) -> Result<IndicatorSeries, TickergridError> {
    if period < 1 {
        return Err(TickergridError::InvalidParameter {
            name: "rsi_period".into(),
            reason: format!("must be >= 1, got {}", period),
        });
    }

    let mut gains = Vec::new();
    let mut losses = Vec::new();
    for i in 1..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let (avg_gains, avg_losses) = match smoothing {
        RsiSmoothing::Wilder => (
            transform::wilder_smoothing(&gains, period)?,
            transform::wilder_smoothing(&losses, period)?,
        ),
        RsiSmoothing::Simple => (
            transform::sma(&gains, period)?,
            transform::sma(&losses, period)?,
        ),
    };

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let averages = if i == 0 {
            None
        } else {
            avg_gains[i - 1].zip(avg_losses[i - 1])
        };

        let point = match averages {
            Some((avg_gain, avg_loss)) => {
                let rsi = if avg_loss == 0.0 {
                    100.0
                } else {
                    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
                };
                IndicatorPoint {
                    timestamp: bar.timestamp,
                    valid: true,
                    value: IndicatorValue::Simple(rsi),
                }
            }
            None => IndicatorPoint {
                timestamp: bar.timestamp,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            },
        };
        values.push(point);
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
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
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (0..16).map(|i| 100.0 + (i % 5) as f64 * 2.0).collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14, RsiSmoothing::Wilder).unwrap();

        assert_eq!(series.values.len(), 16);
        for i in 0..14 {
            assert!(!series.values[i].valid, "Bar {} should be invalid", i);
        }
        assert!(series.values[14].valid);
        assert!(series.values[15].valid);
    }

    #[test]
    fn rsi_all_gains_saturates_to_100() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&prices);

        for smoothing in [RsiSmoothing::Wilder, RsiSmoothing::Simple] {
            let series = calculate_rsi(&bars, 14, smoothing).unwrap();
            if let IndicatorValue::Simple(rsi) = series.values[14].value {
                assert!(
                    (rsi - 100.0).abs() < f64::EPSILON,
                    "RSI should be 100 when all gains"
                );
            } else {
                panic!("Expected Simple value");
            }
        }
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14, RsiSmoothing::Wilder).unwrap();

        if let IndicatorValue::Simple(rsi) = series.values[14].value {
            assert!((rsi - 0.0).abs() < f64::EPSILON);
        } else {
            panic!("Expected Simple value");
        }
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (0..30)
            .map(|i| 100.0 + ((i % 7) as f64 - 3.0) * 2.0)
            .collect();
        let bars = make_bars(&prices);

        for smoothing in [RsiSmoothing::Wilder, RsiSmoothing::Simple] {
            let series = calculate_rsi(&bars, 14, smoothing).unwrap();
            for point in &series.values {
                if point.valid {
                    if let IndicatorValue::Simple(rsi) = point.value {
                        assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
                        assert!(rsi.is_finite());
                    }
                }
            }
        }
    }

    #[test]
    fn rsi_smoothing_variants_diverge() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 13) % 7) as f64 - ((i * 5) % 3) as f64)
            .collect();
        let bars = make_bars(&prices);

        let wilder = calculate_rsi(&bars, 14, RsiSmoothing::Wilder).unwrap();
        let simple = calculate_rsi(&bars, 14, RsiSmoothing::Simple).unwrap();

        // Both define the same warm-up but smooth differently afterwards.
        let mut saw_divergence = false;
        for i in 0..bars.len() {
            assert_eq!(wilder.values[i].valid, simple.values[i].valid);
            if let (IndicatorValue::Simple(w), IndicatorValue::Simple(s)) =
                (&wilder.values[i].value, &simple.values[i].value)
            {
                if wilder.values[i].valid && (w - s).abs() > 1e-9 {
                    saw_divergence = true;
                }
            }
        }
        assert!(saw_divergence);
    }

    #[test]
    fn rsi_single_bar() {
        let bars = make_bars(&[100.0]);
        let series = calculate_rsi(&bars, 14, RsiSmoothing::Wilder).unwrap();
        assert_eq!(series.values.len(), 1);
        assert!(!series.values[0].valid);
    }

    #[test]
    fn rsi_zero_period_is_error() {
        let bars = make_bars(&[100.0, 101.0]);
        assert!(calculate_rsi(&bars, 0, RsiSmoothing::Wilder).is_err());
    }

    #[test]
    fn rsi_indicator_type() {
        let bars = make_bars(&[100.0]);
        let series = calculate_rsi(&bars, 14, RsiSmoothing::Wilder).unwrap();
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }
}
