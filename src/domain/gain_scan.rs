//! Forward gain scanner for retrospective validation.
//!
//! For each candidate bar, determines whether the close ever reaches
//! entry_close * target_gain strictly later in the series. Offline
//! diagnostic only: it looks forward and must never feed the live signal
//! path. A suffix-maximum array answers every candidate query in O(n)
//! total instead of rescanning overlapping windows.

use crate::domain::ohlcv::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainOutcome {
    Achieved,
    NotAchieved,
}

/// `candidates[i]` marks the bars to evaluate; the result has one entry per
/// bar, `Some` only where a candidate was marked. A candidate on the final
/// bar has no forward bars and is `NotAchieved`.
pub fn scan_gain_targets(
    bars: &[Bar],
    candidates: &[bool],
    target_gain: f64,
) -> Vec<Option<GainOutcome>> {
    let n = bars.len();

    // suffix_max[i] = max close over bars[i..]
    let mut suffix_max = vec![f64::NEG_INFINITY; n + 1];
    for i in (0..n).rev() {
        suffix_max[i] = bars[i].close.max(suffix_max[i + 1]);
    }

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if !candidates.get(i).copied().unwrap_or(false) {
                return None;
            }
            let achieved = i + 1 < n && suffix_max[i + 1] >= bar.close * target_gain;
            Some(if achieved {
                GainOutcome::Achieved
            } else {
                GainOutcome::NotAchieved
            })
        })
        .collect()
}
