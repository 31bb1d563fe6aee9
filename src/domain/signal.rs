//! Position state machine: Flat/Long with hysteresis.
//!
//! One `SignalState` is threaded through a single forward scan; the
//! decision at bar t uses only data at bars <= t, and a label is never
//! revised after it is emitted.
//!
//! - Flat → Long when the composite candidate condition holds at t and,
//!   with edge triggering on, did not hold at t-1 (bar 0 cannot edge-fire).
//!   The entry price is the closing price of the entry bar.
//! - Long → Flat when any of open/high/low/close has gained at least
//!   `exit_band` (fractional) over the entry price.
//! - A series that ends while Long leaves the position open; the caller
//!   sees it in the returned final state.

use crate::domain::ohlcv::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Flat,
    Long,
}

#[derive(Debug, Clone)]
pub struct SignalState {
    pub position: Position,
    pub entry_price: Option<f64>,
}

impl SignalState {
    pub fn flat() -> Self {
        Self {
            position: Position::Flat,
            entry_price: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeLabel {
    Buy,
    Sell,
}

#[derive(Debug, Clone)]
pub struct SignalRun {
    pub labels: Vec<Option<TradeLabel>>,
    pub final_state: SignalState,
}

pub fn run_state_machine(
    bars: &[Bar],
    candidates: &[bool],
    edge_trigger: bool,
    exit_band: f64,
) -> SignalRun {
    let mut state = SignalState::flat();
    let mut labels = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let label = match state.position {
            Position::Flat => {
                let fires = if edge_trigger {
                    i > 0 && candidates[i] && !candidates[i - 1]
                } else {
                    candidates[i]
                };
                if fires {
                    state.position = Position::Long;
                    state.entry_price = Some(bar.close);
                    Some(TradeLabel::Buy)
                } else {
                    None
                }
            }
            Position::Long => {
                let gained = state.entry_price.is_some_and(|entry| {
                    [bar.open, bar.high, bar.low, bar.close]
                        .iter()
                        .any(|&p| (p - entry) / entry >= exit_band)
                });
                if gained {
                    state.position = Position::Flat;
                    state.entry_price = None;
                    Some(TradeLabel::Sell)
                } else {
                    None
                }
            }
        };
        labels.push(label);
    }

    SignalRun {
        labels,
        final_state: state,
    }
}
