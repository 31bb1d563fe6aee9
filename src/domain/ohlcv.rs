//! OHLCV bar representation and series validation.

use crate::domain::error::TickergridError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Sampling interval of a series. One series covers one instrument at one
/// interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
    Minute,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Daily => write!(f, "1d"),
            Interval::Weekly => write!(f, "1wk"),
            Interval::Minute => write!(f, "1m"),
        }
    }
}

impl FromStr for Interval {
    type Err = TickergridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" | "daily" => Ok(Interval::Daily),
            "1wk" | "weekly" => Ok(Interval::Weekly),
            "1m" | "minute" => Ok(Interval::Minute),
            other => Err(TickergridError::InvalidParameter {
                name: "interval".into(),
                reason: format!("unknown interval '{}' (expected 1d, 1wk, 1m)", other),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// (high + low) / 2
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Input contract: timestamps strictly increasing, prices positive,
/// volume non-negative. Violations are caller errors, not warm-up
/// conditions, and fail the whole series.
pub fn validate_series(bars: &[Bar]) -> Result<(), TickergridError> {
    for (i, bar) in bars.iter().enumerate() {
        if bar.open <= 0.0 || bar.high <= 0.0 || bar.low <= 0.0 || bar.close <= 0.0 {
            return Err(TickergridError::InvalidInput {
                symbol: bar.symbol.clone(),
                reason: format!("non-positive price at row {}", i),
            });
        }
        if bar.volume < 0 {
            return Err(TickergridError::InvalidInput {
                symbol: bar.symbol.clone(),
                reason: format!("negative volume at row {}", i),
            });
        }
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(TickergridError::InvalidInput {
                symbol: bar.symbol.clone(),
                reason: format!("timestamps not strictly increasing at row {}", i),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn sample_bar() -> Bar {
        Bar {
            symbol: "TATAMOTORS".into(),
            timestamp: ts(15),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        }
    }

    #[test]
    fn median_price() {
        let bar = sample_bar();
        assert!((bar.median_price() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_hl_dominates() {
        let bar = sample_bar();
        // high-low=20, |high-100|=10, |low-100|=10 → 20
        assert!((bar.true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bar = sample_bar();
        // high-low=20, |110-70|=40, |90-70|=20 → 40
        assert!((bar.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        let bar = sample_bar();
        // high-low=20, |110-130|=20, |90-130|=40 → 40
        assert!((bar.true_range(130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_accepts_clean_series() {
        let mut b1 = sample_bar();
        b1.timestamp = ts(1);
        let mut b2 = sample_bar();
        b2.timestamp = ts(2);
        assert!(validate_series(&[b1, b2]).is_ok());
    }

    #[test]
    fn validate_rejects_unsorted_timestamps() {
        let mut b1 = sample_bar();
        b1.timestamp = ts(2);
        let mut b2 = sample_bar();
        b2.timestamp = ts(1);
        let err = validate_series(&[b1, b2]).unwrap_err();
        assert!(matches!(err, TickergridError::InvalidInput { .. }));
    }

    #[test]
    fn validate_rejects_duplicate_timestamps() {
        let b1 = sample_bar();
        let b2 = sample_bar();
        assert!(validate_series(&[b1, b2]).is_err());
    }

    #[test]
    fn validate_rejects_non_positive_price() {
        let mut bar = sample_bar();
        bar.low = 0.0;
        assert!(validate_series(&[bar]).is_err());
    }

    #[test]
    fn validate_rejects_negative_volume() {
        let mut bar = sample_bar();
        bar.volume = -1;
        assert!(validate_series(&[bar]).is_err());
    }

    #[test]
    fn validate_empty_series_is_ok() {
        assert!(validate_series(&[]).is_ok());
    }

    #[test]
    fn interval_round_trips_through_str() {
        for interval in [Interval::Daily, Interval::Weekly, Interval::Minute] {
            let parsed: Interval = interval.to_string().parse().unwrap();
            assert_eq!(parsed, interval);
        }
    }

    #[test]
    fn interval_rejects_unknown() {
        assert!("5h".parse::<Interval>().is_err());
    }
}
