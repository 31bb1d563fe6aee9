//! Bollinger Bands indicator.
//!
//! Middle: SMA(close, period); bands = middle ± multiplier * stddev, where
//! stddev is population standard deviation (divides by N, not N-1).
//! Warmup: first (period-1) bars are invalid.

use crate::domain::error::TickergridError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;
use crate::domain::transform;

pub fn calculate_bollinger(
    bars: &[Bar],
    period: usize,
    stddev_mult_x100: u32,
) -> Result<IndicatorSeries, TickergridError> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let middle = transform::sma(&closes, period)?;
    let stddev = transform::rolling_stddev(&closes, period)?;
    let mult = stddev_mult_x100 as f64 / 100.0;

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match middle[i].zip(stddev[i]) {
            Some((mid, sd)) => IndicatorPoint {
                timestamp: bar.timestamp,
                valid: true,
                value: IndicatorValue::Bollinger {
                    upper: mid + mult * sd,
                    middle: mid,
                    lower: mid - mult * sd,
                },
            },
            None => IndicatorPoint {
                timestamp: bar.timestamp,
                valid: false,
                value: IndicatorValue::Bollinger {
                    upper: 0.0,
                    middle: 0.0,
                    lower: 0.0,
                },
            },
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
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
    fn bollinger_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_bollinger(&bars, 3, 200).unwrap();

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn bollinger_constant_prices_collapse_bands() {
        let bars = make_bars(&[100.0, 100.0, 100.0]);
        let series = calculate_bollinger(&bars, 3, 200).unwrap();

        if let IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        } = series.values[2].value
        {
            assert!((middle - 100.0).abs() < f64::EPSILON);
            assert!((upper - 100.0).abs() < f64::EPSILON);
            assert!((lower - 100.0).abs() < f64::EPSILON);
        } else {
            panic!("Expected Bollinger value");
        }
    }

    #[test]
    fn bollinger_basic_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_bollinger(&bars, 3, 200).unwrap();

        if let IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        } = series.values[2].value
        {
            let expected_middle: f64 = 20.0;
            let variance: f64 = ((10.0_f64 - 20.0).powi(2)
                + (20.0_f64 - 20.0).powi(2)
                + (30.0_f64 - 20.0).powi(2))
                / 3.0;
            let sd = variance.sqrt();

            assert!((middle - expected_middle).abs() < 1e-10);
            assert!((upper - (expected_middle + 2.0 * sd)).abs() < 1e-10);
            assert!((lower - (expected_middle - 2.0 * sd)).abs() < 1e-10);
        } else {
            panic!("Expected Bollinger value");
        }
    }

    #[test]
    fn bollinger_symmetry() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_bollinger(&bars, 3, 150).unwrap();

        if let IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        } = series.values[2].value
        {
            assert!(((upper - middle) - (middle - lower)).abs() < 1e-10);
        }
    }

    #[test]
    fn bollinger_zero_period_is_error() {
        let bars = make_bars(&[10.0]);
        assert!(calculate_bollinger(&bars, 0, 200).is_err());
    }

    #[test]
    fn bollinger_indicator_type() {
        let bars = make_bars(&[10.0]);
        let series = calculate_bollinger(&bars, 20, 200).unwrap();
        assert_eq!(
            series.indicator_type,
            IndicatorType::Bollinger {
                period: 20,
                stddev_mult_x100: 200
            }
        );
    }
}
