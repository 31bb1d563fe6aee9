//! Indicator engine: populates an IndicatorFrame from a catalog of
//! indicator types.
//!
//! Each indicator is computed independently; short history shows up as
//! invalid warm-up points in the affected series and never aborts the
//! frame. Invalid parameters do abort; those are caller errors.

use crate::domain::config::IndicatorParams;
use crate::domain::error::TickergridError;
use crate::domain::frame::IndicatorFrame;
use crate::domain::indicator::{
    adx, atr, bollinger, ema, macd, obv, pivot, rsi, sma, stochastic, supertrend,
    IndicatorSeries, IndicatorType, RsiSmoothing,
};
use crate::domain::ohlcv::Bar;
use crate::domain::predicate::{extract_indicators, Predicate};
use std::collections::HashMap;

/// The always-computed catalog for a parameter set, regardless of which
/// indicators the predicates reference.
pub fn catalog(params: &IndicatorParams) -> Vec<IndicatorType> {
    vec![
        IndicatorType::Macd {
            fast: params.macd_fast,
            slow: params.macd_slow,
            signal: params.macd_signal,
        },
        IndicatorType::Rsi(params.rsi_period),
        IndicatorType::Stochastic {
            k_period: params.stoch_k,
            d_period: params.stoch_d,
        },
        IndicatorType::Atr(params.atr_period),
        IndicatorType::SuperTrend {
            period: params.supertrend_period,
            mult_x100: (params.supertrend_multiplier * 100.0).round() as u32,
        },
        IndicatorType::Adx(params.adx_period),
        IndicatorType::Bollinger {
            period: params.bollinger_period,
            stddev_mult_x100: (params.bollinger_multiplier * 100.0).round() as u32,
        },
        IndicatorType::Obv,
        IndicatorType::Pivot,
    ]
}

/// Catalog plus whatever the predicates reference, deduplicated.
pub fn required_indicators(
    params: &IndicatorParams,
    predicates: &[Predicate],
) -> Vec<IndicatorType> {
    let mut types = catalog(params);
    for ty in extract_indicators(predicates) {
        if !types.contains(&ty) {
            types.push(ty);
        }
    }
    types
}

pub fn compute_indicator(
    bars: &[Bar],
    indicator_type: &IndicatorType,
    rsi_smoothing: RsiSmoothing,
) -> Result<IndicatorSeries, TickergridError> {
    match indicator_type {
        IndicatorType::Ema(span) => ema::calculate_ema(bars, *span),
        IndicatorType::Sma(window) => sma::calculate_sma(bars, *window),
        IndicatorType::Rsi(period) => rsi::calculate_rsi(bars, *period, rsi_smoothing),
        IndicatorType::Atr(period) => atr::calculate_atr(bars, *period),
        IndicatorType::Obv => Ok(obv::calculate_obv(bars)),
        IndicatorType::Macd { fast, slow, signal } => {
            macd::calculate_macd(bars, *fast, *slow, *signal)
        }
        IndicatorType::Stochastic { k_period, d_period } => {
            stochastic::calculate_stochastic(bars, *k_period, *d_period)
        }
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => bollinger::calculate_bollinger(bars, *period, *stddev_mult_x100),
        IndicatorType::SuperTrend { period, mult_x100 } => {
            supertrend::calculate_supertrend(bars, *period, *mult_x100 as f64 / 100.0)
        }
        IndicatorType::Adx(period) => adx::calculate_adx(bars, *period),
        IndicatorType::Pivot => Ok(pivot::calculate_pivot(bars)),
    }
}

pub fn compute_indicators(
    bars: &[Bar],
    types: &[IndicatorType],
    rsi_smoothing: RsiSmoothing,
) -> Result<HashMap<IndicatorType, IndicatorSeries>, TickergridError> {
    let mut indicators = HashMap::with_capacity(types.len());
    for ty in types {
        let series = compute_indicator(bars, ty, rsi_smoothing)?;
        indicators.insert(ty.clone(), series);
    }
    Ok(indicators)
}

/// Build a frame with every required indicator for the given parameters
/// and predicates.
pub fn build_frame(
    symbol: &str,
    bars: Vec<Bar>,
    params: &IndicatorParams,
    predicates: &[Predicate],
) -> Result<IndicatorFrame, TickergridError> {
    let types = required_indicators(params, predicates);
    let indicators = compute_indicators(&bars, &types, params.rsi_smoothing)?;
    let mut frame = IndicatorFrame::new(symbol.to_string(), bars);
    frame.indicators = indicators;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::predicate_parser;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(i: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i as i64)
    }

    fn make_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + ((i * 7) % 13) as f64;
                Bar {
                    symbol: "TEST".into(),
                    timestamp: ts(i),
                    open: close - 0.5,
                    high: close + 2.0,
                    low: close - 2.0,
                    close,
                    volume: 1000 + i as i64,
                }
            })
            .collect()
    }

    #[test]
    fn catalog_covers_fixed_indicator_set() {
        let types = catalog(&IndicatorParams::default());
        assert!(types.contains(&IndicatorType::Rsi(14)));
        assert!(types.contains(&IndicatorType::Obv));
        assert!(types.contains(&IndicatorType::Pivot));
        assert!(types.contains(&IndicatorType::Adx(14)));
        assert!(types.contains(&IndicatorType::SuperTrend {
            period: 14,
            mult_x100: 300
        }));
    }

    #[test]
    fn required_indicators_adds_predicate_references() {
        let predicates =
            predicate_parser::parse_list("EMA(5) > EMA(20); RSI(14) < 70").unwrap();
        let types = required_indicators(&IndicatorParams::default(), &predicates);

        assert!(types.contains(&IndicatorType::Ema(5)));
        assert!(types.contains(&IndicatorType::Ema(20)));
        // RSI(14) is already in the catalog; no duplicate entry.
        assert_eq!(
            types.iter().filter(|t| **t == IndicatorType::Rsi(14)).count(),
            1
        );
    }

    #[test]
    fn build_frame_populates_every_required_series() {
        let predicates = predicate_parser::parse_list("EMA(5) > EMA(20)").unwrap();
        let params = IndicatorParams::default();
        let frame = build_frame("TEST", make_bars(40), &params, &predicates).unwrap();

        for ty in required_indicators(&params, &predicates) {
            let series = frame.series(&ty).unwrap_or_else(|| panic!("missing {}", ty));
            assert_eq!(series.values.len(), 40, "{} row count", ty);
        }
    }

    #[test]
    fn short_history_never_aborts_the_frame() {
        // 3 bars against 14-period indicators: everything computes, the
        // unfilled prefixes are just invalid.
        let frame = build_frame("TEST", make_bars(3), &IndicatorParams::default(), &[]).unwrap();

        let rsi = frame.series(&IndicatorType::Rsi(14)).unwrap();
        assert_eq!(rsi.values.len(), 3);
        assert!(rsi.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn invalid_parameter_aborts() {
        let params = IndicatorParams {
            rsi_period: 0,
            ..IndicatorParams::default()
        };
        assert!(build_frame("TEST", make_bars(5), &params, &[]).is_err());
    }

    #[test]
    fn raw_ohlcv_is_untouched() {
        let bars = make_bars(30);
        let originals: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let frame = build_frame("TEST", bars, &IndicatorParams::default(), &[]).unwrap();

        let after: Vec<f64> = frame.bars.iter().map(|b| b.close).collect();
        assert_eq!(originals, after);
    }
}
