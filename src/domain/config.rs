//! Scan configuration: indicator parameters and signal policy.
//!
//! Built from a [`ConfigPort`] (INI sections `[indicators]` and
//! `[signals]`); every recognized option has a default so a minimal config
//! file works. Percentages in the file (`score_threshold`, `exit_band`,
//! `target_gain`) are converted to fractions/multipliers here, once.

use crate::domain::error::TickergridError;
use crate::domain::indicator::RsiSmoothing;
use crate::domain::predicate::Predicate;
use crate::domain::predicate_parser;
use crate::ports::config_port::ConfigPort;

/// The default composite: MACD above its signal, close above the pivot,
/// fast EMA above slow EMA, RSI not overbought, %K not overbought.
pub const DEFAULT_PREDICATES: &str = "MACD(12,26,9).line > MACD(12,26,9).signal; \
     CLOSE > PIVOT.pivot; \
     EMA(5) > EMA(20); \
     RSI(14) < 70; \
     STOCH(14,3).k < 80";

#[derive(Debug, Clone)]
pub struct IndicatorParams {
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub rsi_smoothing: RsiSmoothing,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub atr_period: usize,
    pub supertrend_period: usize,
    pub supertrend_multiplier: f64,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub adx_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            rsi_smoothing: RsiSmoothing::Wilder,
            stoch_k: 14,
            stoch_d: 3,
            atr_period: 14,
            supertrend_period: 14,
            supertrend_multiplier: 3.0,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            adx_period: 14,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignalPolicy {
    pub predicates: Vec<Predicate>,
    /// Candidate threshold as a fraction of agreeing predicates, 0.0–1.0.
    pub score_threshold: f64,
    pub edge_trigger: bool,
    /// Exit band as a fraction of the entry price (0.002 = 0.2%).
    pub exit_band: f64,
    /// Gain target as a multiplier (1.04 = 4%).
    pub target_gain: f64,
    /// Notify the alert sink when the latest bar carries a Buy label.
    pub alert_on_latest: bool,
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self {
            predicates: predicate_parser::parse_list(DEFAULT_PREDICATES)
                .unwrap_or_default(),
            score_threshold: 0.8,
            edge_trigger: true,
            exit_band: 0.002,
            target_gain: 1.04,
            alert_on_latest: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    pub indicators: IndicatorParams,
    pub signals: SignalPolicy,
}

fn get_period(
    adapter: &dyn ConfigPort,
    key: &str,
    default: i64,
) -> Result<usize, TickergridError> {
    let value = adapter.get_int("indicators", key, default);
    if value < 1 {
        return Err(TickergridError::ConfigInvalid {
            section: "indicators".into(),
            key: key.into(),
            reason: format!("must be >= 1, got {}", value),
        });
    }
    Ok(value as usize)
}

fn get_multiplier(
    adapter: &dyn ConfigPort,
    key: &str,
    default: f64,
) -> Result<f64, TickergridError> {
    let value = adapter.get_double("indicators", key, default);
    if value <= 0.0 {
        return Err(TickergridError::ConfigInvalid {
            section: "indicators".into(),
            key: key.into(),
            reason: format!("must be > 0, got {}", value),
        });
    }
    Ok(value)
}

pub fn build_scan_config(adapter: &dyn ConfigPort) -> Result<ScanConfig, TickergridError> {
    let rsi_smoothing = match adapter
        .get_string("indicators", "rsi_smoothing")
        .unwrap_or_else(|| "wilder".to_string())
        .to_lowercase()
        .as_str()
    {
        "wilder" => RsiSmoothing::Wilder,
        "simple" => RsiSmoothing::Simple,
        other => {
            return Err(TickergridError::ConfigInvalid {
                section: "indicators".into(),
                key: "rsi_smoothing".into(),
                reason: format!("expected 'wilder' or 'simple', got '{}'", other),
            });
        }
    };

    let indicators = IndicatorParams {
        macd_fast: get_period(adapter, "macd_fast", 12)?,
        macd_slow: get_period(adapter, "macd_slow", 26)?,
        macd_signal: get_period(adapter, "macd_signal", 9)?,
        rsi_period: get_period(adapter, "rsi_period", 14)?,
        rsi_smoothing,
        stoch_k: get_period(adapter, "stoch_k", 14)?,
        stoch_d: get_period(adapter, "stoch_d", 3)?,
        atr_period: get_period(adapter, "atr_period", 14)?,
        supertrend_period: get_period(adapter, "supertrend_period", 14)?,
        supertrend_multiplier: get_multiplier(adapter, "supertrend_multiplier", 3.0)?,
        bollinger_period: get_period(adapter, "bollinger_period", 20)?,
        bollinger_multiplier: get_multiplier(adapter, "bollinger_multiplier", 2.0)?,
        adx_period: get_period(adapter, "adx_period", 14)?,
    };

    let predicates_text = adapter
        .get_string("signals", "predicates")
        .unwrap_or_else(|| DEFAULT_PREDICATES.to_string());
    let predicates = predicate_parser::parse_list(&predicates_text)?;

    let threshold_pct = adapter.get_double("signals", "score_threshold", 80.0);
    if !(0.0..=100.0).contains(&threshold_pct) {
        return Err(TickergridError::ConfigInvalid {
            section: "signals".into(),
            key: "score_threshold".into(),
            reason: format!("must be between 0 and 100, got {}", threshold_pct),
        });
    }

    let exit_band_pct = adapter.get_double("signals", "exit_band", 0.2);
    if exit_band_pct < 0.0 {
        return Err(TickergridError::ConfigInvalid {
            section: "signals".into(),
            key: "exit_band".into(),
            reason: format!("must be >= 0, got {}", exit_band_pct),
        });
    }

    let target_gain_pct = adapter.get_double("signals", "target_gain", 4.0);
    if target_gain_pct <= 0.0 {
        return Err(TickergridError::ConfigInvalid {
            section: "signals".into(),
            key: "target_gain".into(),
            reason: format!("must be > 0, got {}", target_gain_pct),
        });
    }

    let signals = SignalPolicy {
        predicates,
        score_threshold: threshold_pct / 100.0,
        edge_trigger: adapter.get_bool("signals", "edge_trigger", true),
        exit_band: exit_band_pct / 100.0,
        target_gain: 1.0 + target_gain_pct / 100.0,
        alert_on_latest: adapter.get_bool("signals", "alert_on_latest", false),
    };

    Ok(ScanConfig {
        indicators,
        signals,
    })
}
