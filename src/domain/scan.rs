//! Pipeline assembly: (Series, Config) → AnnotatedFrame, plus the batch
//! driver over a symbol universe.
//!
//! One pipeline run is single-threaded and owns all of its state; batch
//! runs isolate per-symbol failures (log, skip, continue) so one bad
//! symbol never aborts the rest. Polling/rescheduling is the caller's
//! concern; there are no timers here.

use crate::domain::composite::{evaluate_composite, CompositeSeries};
use crate::domain::config::ScanConfig;
use crate::domain::engine::build_frame;
use crate::domain::error::TickergridError;
use crate::domain::frame::IndicatorFrame;
use crate::domain::gain_scan::{scan_gain_targets, GainOutcome};
use crate::domain::ohlcv::{validate_series, Bar, Interval};
use crate::domain::signal::{run_state_machine, SignalState, TradeLabel};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The pipeline's output: the enriched frame plus the derived signal
/// columns, row-count preserving over the input series.
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    pub frame: IndicatorFrame,
    pub composite: CompositeSeries,
    pub labels: Vec<Option<TradeLabel>>,
    pub final_state: SignalState,
    /// Gain outcomes per bar; empty until a backtest pass fills it.
    pub outcomes: Vec<Option<GainOutcome>>,
}

impl AnnotatedFrame {
    pub fn bar_count(&self) -> usize {
        self.frame.bar_count()
    }
}

/// Run the full pipeline over one validated series.
pub fn run_pipeline(
    symbol: &str,
    bars: Vec<Bar>,
    config: &ScanConfig,
) -> Result<AnnotatedFrame, TickergridError> {
    validate_series(&bars)?;

    let frame = build_frame(symbol, bars, &config.indicators, &config.signals.predicates)?;
    let composite = evaluate_composite(
        &frame,
        &config.signals.predicates,
        config.signals.score_threshold,
    );
    let run = run_state_machine(
        &frame.bars,
        &composite.candidates,
        config.signals.edge_trigger,
        config.signals.exit_band,
    );

    Ok(AnnotatedFrame {
        frame,
        composite,
        labels: run.labels,
        final_state: run.final_state,
        outcomes: Vec::new(),
    })
}

/// Fill the gain-outcome column. Diagnostic only: the scanner looks
/// forward, so its output must never feed back into the signal columns.
pub fn attach_gain_outcomes(annotated: &mut AnnotatedFrame, target_gain: f64) {
    annotated.outcomes = scan_gain_targets(
        &annotated.frame.bars,
        &annotated.composite.candidates,
        target_gain,
    );
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SymbolListError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, SymbolListError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SymbolListError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if seen.contains(&symbol) {
            return Err(SymbolListError::DuplicateSymbol(symbol));
        }
        seen.insert(symbol.clone());
        symbols.push(symbol);
    }

    Ok(symbols)
}

pub struct UniverseScan {
    pub frames: Vec<AnnotatedFrame>,
    pub failures: Vec<(String, TickergridError)>,
}

/// Fetch and scan every symbol, isolating per-symbol failures.
#[allow(clippy::too_many_arguments)]
pub fn scan_universe(
    data_port: &dyn DataPort,
    symbols: &[String],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    interval: Interval,
    config: &ScanConfig,
    with_backtest: bool,
) -> UniverseScan {
    let mut frames = Vec::new();
    let mut failures = Vec::new();

    for symbol in symbols {
        let result = data_port
            .fetch_ohlcv(symbol, start, end, interval)
            .and_then(|bars| {
                if bars.is_empty() {
                    return Err(TickergridError::NoData {
                        symbol: symbol.clone(),
                    });
                }
                run_pipeline(symbol, bars, config)
            });

        match result {
            Ok(mut annotated) => {
                if with_backtest {
                    attach_gain_outcomes(&mut annotated, config.signals.target_gain);
                }
                frames.push(annotated);
            }
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", symbol, e);
                failures.push((symbol.clone(), e));
            }
        }
    }

    UniverseScan { frames, failures }
}
