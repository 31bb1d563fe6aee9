//! CLI definition and dispatch.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_alert_adapter::ConsoleAlertAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config::{build_scan_config, ScanConfig};
use crate::domain::engine::required_indicators;
use crate::domain::error::TickergridError;
use crate::domain::gain_scan::GainOutcome;
use crate::domain::ohlcv::Interval;
use crate::domain::scan::{parse_symbols, scan_universe, AnnotatedFrame};
use crate::domain::signal::{Position, TradeLabel};
use crate::ports::alert_port::AlertPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::export_port::ExportPort;

#[derive(Parser, Debug)]
#[command(name = "tickergrid", about = "OHLCV indicator and buy-signal scanner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan symbols and write annotated signal tables
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the CSV data directory from the config
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Override the symbol list (comma-separated)
        #[arg(short, long)]
        symbols: Option<String>,
        /// Directory for the output tables (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Scan plus forward gain-target outcomes for each candidate bar
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        symbols: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration without touching any data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Sampling interval (1d, 1wk, 1m)
        #[arg(short, long, default_value = "1d")]
        interval: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            data,
            symbols,
            output,
        } => run_scan(
            &config,
            data.as_ref(),
            symbols.as_deref(),
            output.as_ref(),
            false,
        ),
        Command::Backtest {
            config,
            data,
            symbols,
            output,
        } => run_scan(
            &config,
            data.as_ref(),
            symbols.as_deref(),
            output.as_ref(),
            true,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols {
            config,
            data,
            interval,
        } => run_list_symbols(config.as_ref(), data.as_ref(), &interval),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TickergridError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn parse_window_bound(
    adapter: &dyn ConfigPort,
    key: &str,
) -> Result<Option<DateTime<Utc>>, TickergridError> {
    let Some(raw) = adapter.get_string("data", key) else {
        return Ok(None);
    };
    let raw = raw.trim().to_string();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        return Ok(midnight);
    }

    Err(TickergridError::ConfigInvalid {
        section: "data".into(),
        key: key.into(),
        reason: "expected an RFC 3339 timestamp or YYYY-MM-DD date".into(),
    })
}

fn resolve_interval(adapter: &dyn ConfigPort) -> Result<Interval, TickergridError> {
    match adapter.get_string("data", "interval") {
        Some(raw) => raw.trim().parse(),
        None => Ok(Interval::Daily),
    }
}

fn resolve_symbols(
    override_list: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, ExitCode> {
    let raw = match override_list {
        Some(s) => s.to_string(),
        None => match adapter.get_string("data", "symbols") {
            Some(s) => s,
            None => {
                eprintln!("error: no symbols configured (use --symbols or set [data] symbols)");
                return Err(ExitCode::from(2));
            }
        },
    };

    parse_symbols(&raw).map_err(|e| {
        eprintln!("error: failed to parse symbols: {e}");
        ExitCode::from(2)
    })
}

fn run_scan(
    config_path: &PathBuf,
    data_override: Option<&PathBuf>,
    symbols_override: Option<&str>,
    output_dir: Option<&PathBuf>,
    with_backtest: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_scan_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_dir = match data_override {
        Some(d) => d.clone(),
        None => match adapter.get_string("data", "csv_dir") {
            Some(d) => PathBuf::from(d),
            None => {
                eprintln!("error: no data directory (use --data or set [data] csv_dir)");
                return ExitCode::from(2);
            }
        },
    };

    let symbols = match resolve_symbols(symbols_override, &adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let interval = match resolve_interval(&adapter) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (start, end) = match (
        parse_window_bound(&adapter, "start"),
        parse_window_bound(&adapter, "end"),
    ) {
        (Ok(start), Ok(end)) => (start, end),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Scanning {} symbols at interval {} from {}",
        symbols.len(),
        interval,
        data_dir.display()
    );

    let data_port = CsvAdapter::new(data_dir);
    let scan = scan_universe(
        &data_port,
        &symbols,
        start,
        end,
        interval,
        &config,
        with_backtest,
    );

    if scan.frames.is_empty() {
        eprintln!("error: no symbols produced a scan");
        return ExitCode::from(5);
    }

    let out_dir = output_dir.cloned().unwrap_or_else(|| PathBuf::from("."));
    let exporter = CsvExportAdapter::new();
    let alerts = ConsoleAlertAdapter::new();

    for annotated in &scan.frames {
        let symbol = &annotated.frame.symbol;
        let path = out_dir.join(format!("{}_signals.csv", symbol));
        if let Err(e) = exporter.write(annotated, &path) {
            eprintln!("error: failed to write {}: {}", path.display(), e);
            return (&e).into();
        }

        print_summary(annotated, with_backtest);
        if config.signals.alert_on_latest {
            alert_on_latest_buy(annotated, &config, &alerts);
        }
        eprintln!("  table: {}", path.display());
    }

    eprintln!(
        "\nScanned {} of {} symbols",
        scan.frames.len(),
        scan.frames.len() + scan.failures.len()
    );
    ExitCode::SUCCESS
}

fn print_summary(annotated: &AnnotatedFrame, with_backtest: bool) {
    let symbol = &annotated.frame.symbol;
    let last = annotated.bar_count().saturating_sub(1);

    eprintln!("\n=== {} ===", symbol);
    eprintln!("  bars: {}", annotated.bar_count());
    if let Some(score) = annotated.composite.scores.last() {
        eprintln!(
            "  latest score: {:.0}%{}",
            score * 100.0,
            if annotated.composite.candidates[last] {
                " (candidate)"
            } else {
                ""
            }
        );
    }

    let buys = annotated
        .labels
        .iter()
        .filter(|l| **l == Some(TradeLabel::Buy))
        .count();
    let sells = annotated
        .labels
        .iter()
        .filter(|l| **l == Some(TradeLabel::Sell))
        .count();
    eprintln!("  signals: {} buys, {} sells", buys, sells);
    if annotated.final_state.position == Position::Long {
        if let Some(entry) = annotated.final_state.entry_price {
            eprintln!("  position still open (entry {})", entry);
        }
    }

    if with_backtest {
        let candidates = annotated.outcomes.iter().filter(|o| o.is_some()).count();
        let achieved = annotated
            .outcomes
            .iter()
            .filter(|o| **o == Some(GainOutcome::Achieved))
            .count();
        eprintln!(
            "  gain target: {} of {} candidates achieved",
            achieved, candidates
        );
    }
}

fn alert_on_latest_buy(annotated: &AnnotatedFrame, config: &ScanConfig, alerts: &dyn AlertPort) {
    if annotated.labels.last() == Some(&Some(TradeLabel::Buy)) {
        let threshold_pct = config.signals.score_threshold * 100.0;
        alerts.notify(
            &annotated.frame.symbol,
            &format!(
                "buy signal on latest bar (score >= {:.0}%)",
                threshold_pct
            ),
        );
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let predicates_text = adapter.get_string("signals", "predicates");
    let config = match build_scan_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            if let (TickergridError::PredicateParse(parse_err), Some(text)) =
                (&e, &predicates_text)
            {
                eprintln!(
                    "error: failed to parse predicates:\n{}",
                    parse_err.display_with_context(text)
                );
            } else {
                eprintln!("error: {e}");
            }
            return (&e).into();
        }
    };

    eprintln!("\nPredicates:");
    for pred in &config.signals.predicates {
        eprintln!("  {}", pred.label);
    }

    let mut indicator_list: Vec<String> =
        required_indicators(&config.indicators, &config.signals.predicates)
            .iter()
            .map(|i| i.to_string())
            .collect();
    indicator_list.sort();

    eprintln!("\nIndicators to compute:");
    for ind in &indicator_list {
        eprintln!("  {}", ind);
    }

    eprintln!(
        "\nSignal policy: threshold {:.0}%, edge trigger {}, exit band {:.2}%, gain target {:.1}%",
        config.signals.score_threshold * 100.0,
        if config.signals.edge_trigger { "on" } else { "off" },
        config.signals.exit_band * 100.0,
        (config.signals.target_gain - 1.0) * 100.0,
    );

    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}

fn run_list_symbols(
    config_path: Option<&PathBuf>,
    data_override: Option<&PathBuf>,
    interval: &str,
) -> ExitCode {
    let data_dir = match data_override {
        Some(d) => d.clone(),
        None => {
            let config_path = match config_path {
                Some(p) => p,
                None => {
                    eprintln!("error: --config or --data is required for list-symbols");
                    return ExitCode::from(1);
                }
            };
            let adapter = match load_config(config_path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            match adapter.get_string("data", "csv_dir") {
                Some(d) => PathBuf::from(d),
                None => {
                    eprintln!("error: no data directory configured");
                    return ExitCode::from(2);
                }
            }
        }
    };

    let interval: Interval = match interval.parse() {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(data_dir);
    let symbols = match adapter.list_symbols(interval) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found for interval {}", interval);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
