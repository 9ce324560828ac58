//! Level-up formulas - restricted arithmetic over `x` and `level`
//!
//! Formulas come from content files, so they are parsed rather than executed:
//! the grammar only admits the two variables, numeric literals, `+ - * /`,
//! unary minus and parentheses.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := number | 'x' | 'level' | '(' expr ')'
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Formula parsing/evaluation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },
    #[error("Formula '{formula}' produced a non-finite value for x={x}, level={level}")]
    NonFinite { formula: String, x: f64, level: u32 },
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    X,
    Level,
    Neg(Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Expr {
    fn eval(&self, x: f64, level: f64) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::X => x,
            Expr::Level => level,
            Expr::Neg(inner) => -inner.eval(x, level),
            Expr::Binary(lhs, op, rhs) => {
                let (a, b) = (lhs.eval(x, level), rhs.eval(x, level));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    X,
    Level,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' | '(' | ')' => {
                chars.next();
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    _ => Token::RParen,
                });
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &src[start..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| format!("bad number literal '{literal}'"))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                match &src[start..end] {
                    "x" => tokens.push(Token::X),
                    "level" => tokens.push(Token::Level),
                    other => return Err(format!("unknown identifier '{other}'")),
                }
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<Expr, String> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(Box::new(lhs), op, Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Expr, String> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(Box::new(lhs), op, Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, String> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::X) => Ok(Expr::X),
            Some(Token::Level) => Ok(Expr::Level),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("missing ')'".to_string()),
                }
            }
            Some(other) => Err(format!("unexpected token {other:?}")),
            None => Err("unexpected end of formula".to_string()),
        }
    }
}

/// A parsed level-up formula
///
/// Deserializes from its source string, so malformed content is rejected
/// when it is loaded rather than when a skill levels up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse a formula, rejecting anything outside the grammar
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let invalid = |reason: String| FormulaError::InvalidFormula {
            formula: source.to_string(),
            reason,
        };

        let tokens = tokenize(source).map_err(invalid)?;
        if tokens.is_empty() {
            return Err(invalid("empty formula".to_string()));
        }

        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.expr().map_err(invalid)?;
        if let Some(extra) = parser.peek() {
            return Err(invalid(format!("trailing token {extra:?}")));
        }

        Ok(Formula {
            source: source.to_string(),
            expr,
        })
    }

    /// The identity formula, `x`
    pub fn identity() -> Self {
        Formula {
            source: "x".to_string(),
            expr: Expr::X,
        }
    }

    /// Evaluate for a current value and a level
    pub fn eval(&self, x: f64, level: u32) -> Result<f64, FormulaError> {
        let value = self.expr.eval(x, level as f64);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite {
                formula: self.source.clone(),
                x,
                level,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for Formula {
    fn default() -> Self {
        Formula::identity()
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl TryFrom<String> for Formula {
    type Error = FormulaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Formula::parse(&value)
    }
}

impl From<Formula> for String {
    fn from(formula: Formula) -> Self {
        formula.source
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
