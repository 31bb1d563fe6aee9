//! Series transforms: moving averages and rolling window aggregates.
//!
//! All transforms are pure, produce one output per input index, and only
//! ever look backwards. Insufficient history yields `None` for the
//! unfilled prefix; invalid parameters are errors.

use crate::domain::error::TickergridError;

fn check_window(name: &str, window: usize) -> Result<(), TickergridError> {
    if window < 1 {
        return Err(TickergridError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be >= 1, got {}", window),
        });
    }
    Ok(())
}

/// Exponential moving average with k = 2/(span+1).
///
/// Seeded with the first value: e[0] = x[0], e[t] = x[t]*k + e[t-1]*(1-k).
/// Defined at every index, so the output carries no warm-up prefix.
pub fn ema(xs: &[f64], span: usize) -> Result<Vec<f64>, TickergridError> {
    check_window("span", span)?;

    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(xs.len());
    let mut prev = 0.0;

    for (i, &x) in xs.iter().enumerate() {
        let e = if i == 0 { x } else { x * k + prev * (1.0 - k) };
        out.push(e);
        prev = e;
    }

    Ok(out)
}

/// Simple moving average over a trailing window.
pub fn sma(xs: &[f64], window: usize) -> Result<Vec<Option<f64>>, TickergridError> {
    check_window("window", window)?;

    let mut out = Vec::with_capacity(xs.len());
    let mut sum = 0.0;

    for (i, &x) in xs.iter().enumerate() {
        sum += x;
        if i >= window {
            sum -= xs[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }

    Ok(out)
}

/// Wilder smoothing: seed with the mean of the first `period` values, then
/// w[t] = (w[t-1]*(period-1) + x[t]) / period. Equivalent to an EMA with
/// k = 1/period.
pub fn wilder_smoothing(xs: &[f64], period: usize) -> Result<Vec<Option<f64>>, TickergridError> {
    check_window("period", period)?;

    let mut out = Vec::with_capacity(xs.len());
    let mut acc = 0.0;

    for (i, &x) in xs.iter().enumerate() {
        if i + 1 < period {
            acc += x;
            out.push(None);
        } else if i + 1 == period {
            acc = (acc + x) / period as f64;
            out.push(Some(acc));
        } else {
            acc = (acc * (period - 1) as f64 + x) / period as f64;
            out.push(Some(acc));
        }
    }

    Ok(out)
}

/// Minimum over a trailing window.
pub fn rolling_min(xs: &[f64], window: usize) -> Result<Vec<Option<f64>>, TickergridError> {
    check_window("window", window)?;
    rolling(xs, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Maximum over a trailing window.
pub fn rolling_max(xs: &[f64], window: usize) -> Result<Vec<Option<f64>>, TickergridError> {
    check_window("window", window)?;
    rolling(xs, window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Population standard deviation over a trailing window.
pub fn rolling_stddev(xs: &[f64], window: usize) -> Result<Vec<Option<f64>>, TickergridError> {
    check_window("window", window)?;
    rolling(xs, window, |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let variance = w
            .iter()
            .map(|x| {
                let diff = x - mean;
                diff * diff
            })
            .sum::<f64>()
            / w.len() as f64;
        variance.sqrt()
    })
}

fn rolling<F>(xs: &[f64], window: usize, f: F) -> Result<Vec<Option<f64>>, TickergridError>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = Vec::with_capacity(xs.len());
    for i in 0..xs.len() {
        if i + 1 >= window {
            out.push(Some(f(&xs[i + 1 - window..=i])));
        } else {
            out.push(None);
        }
    }
    Ok(out)
}
