//! Predicate AST for the composite signal evaluator.
//!
//! A predicate is one comparison between two operands (a price field, a
//! constant, or an indicator field reference). The evaluator carries a flat
//! list of these; nothing about which indicators matter is hardcoded.

use crate::domain::indicator::IndicatorType;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Open,
    High,
    Low,
    Close,
    Volume,
    Constant(f64),
    Indicator(IndicatorRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRef {
    pub indicator_type: IndicatorType,
    pub field: IndicatorField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorField {
    Value,
    MacdLine,
    MacdSignal,
    MacdHistogram,
    StochasticK,
    StochasticD,
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
    SuperTrendLine,
    SuperTrendUpper,
    SuperTrendLower,
    AdxValue,
    PlusDi,
    MinusDi,
    Pivot,
    R1,
    R2,
    S1,
    S2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Lt,
    Ge,
    Le,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Source text of the predicate, used as its column label in exports.
    pub label: String,
    pub left: Operand,
    pub cmp: Comparator,
    pub right: Operand,
}

/// Collect the indicator types a list of predicates references, deduplicated.
pub fn extract_indicators(predicates: &[Predicate]) -> Vec<IndicatorType> {
    let mut seen = Vec::new();
    for pred in predicates {
        for operand in [&pred.left, &pred.right] {
            if let Operand::Indicator(ind_ref) = operand {
                if !seen.contains(&ind_ref.indicator_type) {
                    seen.push(ind_ref.indicator_type.clone());
                }
            }
        }
    }
    seen
}
