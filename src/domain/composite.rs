//! Composite signal evaluator.
//!
//! Evaluates each configured predicate at every bar and aggregates the
//! verdicts into a score (fraction of predicates agreeing, 0.0–1.0) plus a
//! candidate flag (score >= threshold).
//!
//! Operand resolution mirrors the frame's validity rules: a missing series,
//! an out-of-range index, or a warm-up point resolves to NaN, and every
//! comparison against NaN is false. Division-guard cases therefore surface
//! as "not favorable", never as NaN verdicts.

use crate::domain::frame::IndicatorFrame;
use crate::domain::indicator::IndicatorValue;
use crate::domain::predicate::{Comparator, IndicatorField, IndicatorRef, Operand, Predicate};

#[derive(Debug, Clone)]
pub struct CompositeSeries {
    /// Predicate labels, in evaluation order.
    pub labels: Vec<String>,
    /// verdicts[bar][predicate]
    pub verdicts: Vec<Vec<bool>>,
    /// Fraction of predicates true per bar, 0.0–1.0.
    pub scores: Vec<f64>,
    /// scores[i] >= threshold
    pub candidates: Vec<bool>,
}

pub fn evaluate_composite(
    frame: &IndicatorFrame,
    predicates: &[Predicate],
    threshold: f64,
) -> CompositeSeries {
    let labels = predicates.iter().map(|p| p.label.clone()).collect();
    let mut verdicts = Vec::with_capacity(frame.bar_count());
    let mut scores = Vec::with_capacity(frame.bar_count());
    let mut candidates = Vec::with_capacity(frame.bar_count());

    for i in 0..frame.bar_count() {
        let row: Vec<bool> = predicates
            .iter()
            .map(|p| evaluate_predicate(p, frame, i))
            .collect();

        let score = if row.is_empty() {
            0.0
        } else {
            row.iter().filter(|&&v| v).count() as f64 / row.len() as f64
        };

        candidates.push(!row.is_empty() && score >= threshold);
        verdicts.push(row);
        scores.push(score);
    }

    CompositeSeries {
        labels,
        verdicts,
        scores,
        candidates,
    }
}

pub fn evaluate_predicate(predicate: &Predicate, frame: &IndicatorFrame, bar_index: usize) -> bool {
    let left = resolve_operand(&predicate.left, frame, bar_index);
    let right = resolve_operand(&predicate.right, frame, bar_index);

    match predicate.cmp {
        Comparator::Gt => left > right,
        Comparator::Lt => left < right,
        Comparator::Ge => left >= right,
        Comparator::Le => left <= right,
    }
}

fn resolve_operand(operand: &Operand, frame: &IndicatorFrame, bar_index: usize) -> f64 {
    match operand {
        Operand::Open => frame.bars[bar_index].open,
        Operand::High => frame.bars[bar_index].high,
        Operand::Low => frame.bars[bar_index].low,
        Operand::Close => frame.bars[bar_index].close,
        Operand::Volume => frame.bars[bar_index].volume as f64,
        Operand::Constant(v) => *v,
        Operand::Indicator(ind_ref) => resolve_indicator(ind_ref, frame, bar_index),
    }
}

fn resolve_indicator(ind_ref: &IndicatorRef, frame: &IndicatorFrame, bar_index: usize) -> f64 {
    let series = match frame.series(&ind_ref.indicator_type) {
        Some(s) => s,
        None => return f64::NAN,
    };

    if bar_index >= series.values.len() {
        return f64::NAN;
    }

    let point = &series.values[bar_index];
    if !point.valid {
        return f64::NAN;
    }

    extract_field(&point.value, ind_ref.field)
}

fn extract_field(value: &IndicatorValue, field: IndicatorField) -> f64 {
    match (value, field) {
        (IndicatorValue::Simple(v), IndicatorField::Value) => *v,
        (IndicatorValue::Macd { line, .. }, IndicatorField::MacdLine) => *line,
        (IndicatorValue::Macd { signal, .. }, IndicatorField::MacdSignal) => *signal,
        (IndicatorValue::Macd { histogram, .. }, IndicatorField::MacdHistogram) => *histogram,
        (IndicatorValue::Stochastic { k, .. }, IndicatorField::StochasticK) => *k,
        (IndicatorValue::Stochastic { d, .. }, IndicatorField::StochasticD) => *d,
        (IndicatorValue::Bollinger { upper, .. }, IndicatorField::BollingerUpper) => *upper,
        (IndicatorValue::Bollinger { middle, .. }, IndicatorField::BollingerMiddle) => *middle,
        (IndicatorValue::Bollinger { lower, .. }, IndicatorField::BollingerLower) => *lower,
        (IndicatorValue::SuperTrend { line, .. }, IndicatorField::SuperTrendLine) => *line,
        (IndicatorValue::SuperTrend { upper, .. }, IndicatorField::SuperTrendUpper) => *upper,
        (IndicatorValue::SuperTrend { lower, .. }, IndicatorField::SuperTrendLower) => *lower,
        (IndicatorValue::Adx { adx, .. }, IndicatorField::AdxValue) => *adx,
        (IndicatorValue::Adx { plus_di, .. }, IndicatorField::PlusDi) => *plus_di,
        (IndicatorValue::Adx { minus_di, .. }, IndicatorField::MinusDi) => *minus_di,
        (IndicatorValue::Pivot { pivot, .. }, IndicatorField::Pivot) => *pivot,
        (IndicatorValue::Pivot { r1, .. }, IndicatorField::R1) => *r1,
        (IndicatorValue::Pivot { r2, .. }, IndicatorField::R2) => *r2,
        (IndicatorValue::Pivot { s1, .. }, IndicatorField::S1) => *s1,
        (IndicatorValue::Pivot { s2, .. }, IndicatorField::S2) => *s2,
        _ => f64::NAN,
    }
}
