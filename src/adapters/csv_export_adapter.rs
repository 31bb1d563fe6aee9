//! CSV export adapter for annotated frames.
//!
//! Flattens the frame into one row per bar: OHLCV, every indicator column
//! (multi-value indicators expand to one column per field), per-predicate
//! verdicts, the score as a percentage, the candidate flag, the Buy/Sell
//! label, and the gain outcome when a backtest pass filled it. Warm-up
//! points become empty cells. A color-scale renderer can be pointed at the
//! score column; no formatting happens here.

use crate::domain::error::TickergridError;
use crate::domain::gain_scan::GainOutcome;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::scan::AnnotatedFrame;
use crate::domain::signal::TradeLabel;
use crate::ports::export_port::ExportPort;
use std::path::Path;

pub struct CsvExportAdapter;

impl CsvExportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn field_suffixes(indicator_type: &IndicatorType) -> &'static [&'static str] {
    match indicator_type {
        IndicatorType::Macd { .. } => &[".line", ".signal", ".histogram"],
        IndicatorType::Stochastic { .. } => &[".k", ".d"],
        IndicatorType::Bollinger { .. } => &[".upper", ".middle", ".lower"],
        IndicatorType::SuperTrend { .. } => &[".line", ".upper", ".lower"],
        IndicatorType::Adx(_) => &[".adx", ".plus_di", ".minus_di"],
        IndicatorType::Pivot => &[".pivot", ".r1", ".r2", ".s1", ".s2"],
        _ => &[""],
    }
}

fn field_values(value: &IndicatorValue) -> Vec<f64> {
    match value {
        IndicatorValue::Simple(v) => vec![*v],
        IndicatorValue::Macd {
            line,
            signal,
            histogram,
        } => vec![*line, *signal, *histogram],
        IndicatorValue::Stochastic { k, d } => vec![*k, *d],
        IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        } => vec![*upper, *middle, *lower],
        IndicatorValue::SuperTrend { line, upper, lower } => vec![*line, *upper, *lower],
        IndicatorValue::Adx {
            adx,
            plus_di,
            minus_di,
        } => vec![*adx, *plus_di, *minus_di],
        IndicatorValue::Pivot {
            pivot,
            r1,
            r2,
            s1,
            s2,
        } => vec![*pivot, *r1, *r2, *s1, *s2],
    }
}

fn indicator_cells(series: &IndicatorSeries, bar_index: usize) -> Vec<String> {
    let width = field_suffixes(&series.indicator_type).len();
    match series.values.get(bar_index) {
        Some(point) if point.valid => field_values(&point.value)
            .into_iter()
            .map(|v| format!("{}", v))
            .collect(),
        _ => vec![String::new(); width],
    }
}

impl ExportPort for CsvExportAdapter {
    fn write(&self, frame: &AnnotatedFrame, output_path: &Path) -> Result<(), TickergridError> {
        let mut writer = csv::Writer::from_path(output_path).map_err(|e| TickergridError::Data {
            reason: format!("failed to open {}: {}", output_path.display(), e),
        })?;

        // Stable column order: indicators sorted by display name.
        let mut indicator_series: Vec<&IndicatorSeries> =
            frame.frame.indicators.values().collect();
        indicator_series.sort_by_key(|s| s.indicator_type.to_string());

        let mut header: Vec<String> = vec![
            "timestamp".into(),
            "open".into(),
            "high".into(),
            "low".into(),
            "close".into(),
            "volume".into(),
        ];
        for series in &indicator_series {
            let name = series.indicator_type.to_string();
            for suffix in field_suffixes(&series.indicator_type) {
                header.push(format!("{}{}", name, suffix));
            }
        }
        for label in &frame.composite.labels {
            header.push(label.clone());
        }
        header.push("score_pct".into());
        header.push("candidate".into());
        header.push("signal".into());
        if !frame.outcomes.is_empty() {
            header.push("gain_outcome".into());
        }

        writer.write_record(&header).map_err(|e| TickergridError::Data {
            reason: format!("CSV write error: {}", e),
        })?;

        for (i, bar) in frame.frame.bars.iter().enumerate() {
            let mut row: Vec<String> = vec![
                bar.timestamp.to_rfc3339(),
                format!("{}", bar.open),
                format!("{}", bar.high),
                format!("{}", bar.low),
                format!("{}", bar.close),
                format!("{}", bar.volume),
            ];
            for series in &indicator_series {
                row.extend(indicator_cells(series, i));
            }
            for verdict in &frame.composite.verdicts[i] {
                row.push(verdict.to_string());
            }
            row.push(format!("{:.1}", frame.composite.scores[i] * 100.0));
            row.push(frame.composite.candidates[i].to_string());
            row.push(match frame.labels[i] {
                Some(TradeLabel::Buy) => "Buy".into(),
                Some(TradeLabel::Sell) => "Sell".into(),
                None => String::new(),
            });
            if !frame.outcomes.is_empty() {
                row.push(match frame.outcomes[i] {
                    Some(GainOutcome::Achieved) => "achieved".into(),
                    Some(GainOutcome::NotAchieved) => "not_achieved".into(),
                    None => String::new(),
                });
            }

            writer.write_record(&row).map_err(|e| TickergridError::Data {
                reason: format!("CSV write error: {}", e),
            })?;
        }

        writer.flush().map_err(|e| TickergridError::Data {
            reason: format!("CSV flush error: {}", e),
        })?;
        Ok(())
    }
}
