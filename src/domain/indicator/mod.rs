//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Each indicator lives in its own submodule. A point at index i is derived
//! only from bars at index <= i; warm-up rows are `valid: false`, never an
//! error.

pub mod ema;
pub mod sma;
pub mod macd;
pub mod rsi;
pub mod stochastic;
pub mod atr;
pub mod supertrend;
pub mod adx;
pub mod bollinger;
pub mod obv;
pub mod pivot;

use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Stochastic {
        k: f64,
        d: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
    SuperTrend {
        line: f64,
        upper: f64,
        lower: f64,
    },
    Adx {
        adx: f64,
        plus_di: f64,
        minus_di: f64,
    },
    Pivot {
        pivot: f64,
        r1: f64,
        r2: f64,
        s1: f64,
        s2: f64,
    },
}

/// RSI smoothing of average gain/loss is a run-level policy, not part of the
/// indicator's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RsiSmoothing {
    #[default]
    Wilder,
    Simple,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Obv,
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    SuperTrend {
        period: usize,
        mult_x100: u32,
    },
    Adx(usize),
    Pivot,
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Obv => write!(f, "OBV"),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "STOCH({},{})", k_period, d_period)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLL({},{})", period, mult)
            }
            IndicatorType::SuperTrend { period, mult_x100 } => {
                let mult = *mult_x100 as f64 / 100.0;
                write!(f, "SUPERTREND({},{})", period, mult)
            }
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Pivot => write!(f, "PIVOT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_supertrend() {
        let st = IndicatorType::SuperTrend {
            period: 14,
            mult_x100: 300,
        };
        assert_eq!(st.to_string(), "SUPERTREND(14,3)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        assert_eq!(boll.to_string(), "BOLL(20,2)");
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        let ema5 = IndicatorType::Ema(5);
        let ema20 = IndicatorType::Ema(20);
        let adx = IndicatorType::Adx(14);

        map.insert(ema5.clone(), "ema5_series".to_string());
        map.insert(ema20.clone(), "ema20_series".to_string());
        map.insert(adx.clone(), "adx_series".to_string());

        assert_eq!(map.get(&ema5), Some(&"ema5_series".to_string()));
        assert_eq!(map.get(&ema20), Some(&"ema20_series".to_string()));
        assert_eq!(map.get(&IndicatorType::Adx(14)), Some(&"adx_series".to_string()));
    }

    #[test]
    fn rsi_smoothing_default_is_wilder() {
        assert_eq!(RsiSmoothing::default(), RsiSmoothing::Wilder);
    }
}
