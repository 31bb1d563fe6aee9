//! Predicate text parser.
//!
//! Recursive descent over the comparison grammar, with positioned errors:
//!
//! ```text
//! list      := predicate (';' predicate)*
//! predicate := operand cmp operand
//! cmp       := '>=' | '<=' | '>' | '<'
//! operand   := number | OPEN | HIGH | LOW | CLOSE | VOLUME | indicator
//! indicator := NAME [ '(' args ')' ] [ '.' field ]
//! ```
//!
//! Examples: `MACD(12,26,9).line > MACD(12,26,9).signal`, `RSI(14) < 70`,
//! `CLOSE > PIVOT.pivot`, `STOCH(14,3).k < 80`, `EMA(5) > EMA(20)`.

use crate::domain::error::ParseError;
use crate::domain::indicator::IndicatorType;
use crate::domain::predicate::{Comparator, IndicatorField, IndicatorRef, Operand, Predicate};

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(ParseError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    fn peek_word(&self) -> String {
        let mut word = String::new();
        for ch in self.remaining().chars() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
            } else {
                break;
            }
        }
        if word.is_empty() {
            self.peek()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "end of input".to_string())
        } else {
            word
        }
    }

    fn consume_exact(&mut self, s: &str) -> bool {
        if self.remaining().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut has_dot = false;
        let mut digits = 0;

        if self.peek() == Some('-') {
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(ParseError {
                message: "expected number".to_string(),
                position: start,
            });
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid number: {}", num_str),
            position: start,
        })
    }

    fn parse_integer(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut digits = 0;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(ParseError {
                message: "expected integer".to_string(),
                position: start,
            });
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<usize>().map_err(|_| ParseError {
            message: format!("invalid integer: {}", num_str),
            position: start,
        })
    }

    fn parse_field(&mut self, allowed: &[(&str, IndicatorField)], default: IndicatorField)
        -> Result<IndicatorField, ParseError>
    {
        if !self.consume_exact(".") {
            return Ok(default);
        }
        let word = self.peek_word();
        for (name, field) in allowed {
            if word == *name {
                self.pos += word.len();
                return Ok(*field);
            }
        }
        let names: Vec<&str> = allowed.iter().map(|(n, _)| *n).collect();
        Err(ParseError {
            message: format!(
                "unknown field '{}' (expected one of: {})",
                word,
                names.join(", ")
            ),
            position: self.pos,
        })
    }

    fn parse_indicator(&mut self) -> Result<Operand, ParseError> {
        self.skip_whitespace();

        if self.consume_exact("EMA(") {
            let span = self.parse_integer()?;
            self.expect_char(')')?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Ema(span),
                field: IndicatorField::Value,
            }));
        }

        if self.consume_exact("SMA(") {
            let window = self.parse_integer()?;
            self.expect_char(')')?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Sma(window),
                field: IndicatorField::Value,
            }));
        }

        if self.consume_exact("RSI(") {
            let period = self.parse_integer()?;
            self.expect_char(')')?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Rsi(period),
                field: IndicatorField::Value,
            }));
        }

        if self.consume_exact("ATR(") {
            let period = self.parse_integer()?;
            self.expect_char(')')?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Atr(period),
                field: IndicatorField::Value,
            }));
        }

        if self.consume_exact("MACD(") {
            let fast = self.parse_integer()?;
            self.expect_char(',')?;
            let slow = self.parse_integer()?;
            self.expect_char(',')?;
            let signal = self.parse_integer()?;
            self.expect_char(')')?;
            let field = self.parse_field(
                &[
                    ("line", IndicatorField::MacdLine),
                    ("signal", IndicatorField::MacdSignal),
                    ("histogram", IndicatorField::MacdHistogram),
                ],
                IndicatorField::MacdLine,
            )?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Macd { fast, slow, signal },
                field,
            }));
        }

        if self.consume_exact("STOCH(") {
            let k_period = self.parse_integer()?;
            self.expect_char(',')?;
            let d_period = self.parse_integer()?;
            self.expect_char(')')?;
            let field = self.parse_field(
                &[
                    ("k", IndicatorField::StochasticK),
                    ("d", IndicatorField::StochasticD),
                ],
                IndicatorField::StochasticK,
            )?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Stochastic { k_period, d_period },
                field,
            }));
        }

        if self.consume_exact("BOLL(") {
            let period = self.parse_integer()?;
            self.expect_char(',')?;
            let mult = self.parse_number()?;
            self.expect_char(')')?;
            let field = self.parse_field(
                &[
                    ("upper", IndicatorField::BollingerUpper),
                    ("middle", IndicatorField::BollingerMiddle),
                    ("lower", IndicatorField::BollingerLower),
                ],
                IndicatorField::BollingerMiddle,
            )?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Bollinger {
                    period,
                    stddev_mult_x100: (mult * 100.0).round() as u32,
                },
                field,
            }));
        }

        if self.consume_exact("SUPERTREND(") {
            let period = self.parse_integer()?;
            self.expect_char(',')?;
            let mult = self.parse_number()?;
            self.expect_char(')')?;
            let field = self.parse_field(
                &[
                    ("line", IndicatorField::SuperTrendLine),
                    ("upper", IndicatorField::SuperTrendUpper),
                    ("lower", IndicatorField::SuperTrendLower),
                ],
                IndicatorField::SuperTrendLine,
            )?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::SuperTrend {
                    period,
                    mult_x100: (mult * 100.0).round() as u32,
                },
                field,
            }));
        }

        if self.consume_exact("ADX(") {
            let period = self.parse_integer()?;
            self.expect_char(')')?;
            let field = self.parse_field(
                &[
                    ("adx", IndicatorField::AdxValue),
                    ("plus_di", IndicatorField::PlusDi),
                    ("minus_di", IndicatorField::MinusDi),
                ],
                IndicatorField::AdxValue,
            )?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Adx(period),
                field,
            }));
        }

        if self.consume_exact("PIVOT") {
            let field = self.parse_field(
                &[
                    ("pivot", IndicatorField::Pivot),
                    ("r1", IndicatorField::R1),
                    ("r2", IndicatorField::R2),
                    ("s1", IndicatorField::S1),
                    ("s2", IndicatorField::S2),
                ],
                IndicatorField::Pivot,
            )?;
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Pivot,
                field,
            }));
        }

        if self.consume_exact("OBV") {
            return Ok(Operand::Indicator(IndicatorRef {
                indicator_type: IndicatorType::Obv,
                field: IndicatorField::Value,
            }));
        }

        Err(ParseError {
            message: format!("unknown indicator '{}'", self.peek_word()),
            position: self.pos,
        })
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        self.skip_whitespace();

        match self.peek() {
            Some(ch) if ch.is_ascii_digit() || ch == '-' => {
                return self.parse_number().map(Operand::Constant);
            }
            _ => {}
        }

        if self.consume_exact("OPEN") {
            return Ok(Operand::Open);
        }
        if self.consume_exact("HIGH") {
            return Ok(Operand::High);
        }
        if self.consume_exact("LOW") {
            return Ok(Operand::Low);
        }
        if self.consume_exact("CLOSE") {
            return Ok(Operand::Close);
        }
        if self.consume_exact("VOLUME") {
            return Ok(Operand::Volume);
        }

        self.parse_indicator()
    }

    fn parse_comparator(&mut self) -> Result<Comparator, ParseError> {
        self.skip_whitespace();
        if self.consume_exact(">=") {
            return Ok(Comparator::Ge);
        }
        if self.consume_exact("<=") {
            return Ok(Comparator::Le);
        }
        if self.consume_exact(">") {
            return Ok(Comparator::Gt);
        }
        if self.consume_exact("<") {
            return Ok(Comparator::Lt);
        }
        Err(ParseError {
            message: format!(
                "expected comparator (>, <, >=, <=), found '{}'",
                self.peek_word()
            ),
            position: self.pos,
        })
    }

    fn parse_predicate(&mut self) -> Result<Predicate, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let left = self.parse_operand()?;
        let cmp = self.parse_comparator()?;
        let right = self.parse_operand()?;
        let label = self.input[start..self.pos].trim().to_string();
        Ok(Predicate {
            label,
            left,
            cmp,
            right,
        })
    }
}

/// Parse one predicate; trailing garbage is an error.
pub fn parse(input: &str) -> Result<Predicate, ParseError> {
    let mut parser = Parser::new(input);
    let pred = parser.parse_predicate()?;
    parser.skip_whitespace();
    if parser.pos != input.len() {
        return Err(ParseError {
            message: format!("unexpected trailing input '{}'", parser.peek_word()),
            position: parser.pos,
        });
    }
    Ok(pred)
}

/// Parse a `;`-separated predicate list. Empty segments are skipped so a
/// trailing separator is fine; an entirely empty list is an error.
pub fn parse_list(input: &str) -> Result<Vec<Predicate>, ParseError> {
    let mut parser = Parser::new(input);
    let mut predicates = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.pos == input.len() {
            break;
        }
        if parser.consume_exact(";") {
            continue;
        }
        predicates.push(parser.parse_predicate()?);
        parser.skip_whitespace();
        if parser.pos == input.len() {
            break;
        }
        parser.expect_char(';')?;
    }

    if predicates.is_empty() {
        return Err(ParseError {
            message: "empty predicate list".to_string(),
            position: 0,
        });
    }
    Ok(predicates)
}
