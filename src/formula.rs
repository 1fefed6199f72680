//! Formula syntax tree and the bracketed textual notation.
//!
//! The notation has three shapes, whitespace being insignificant:
//!
//! ```text
//! p            atom
//! op(X)        unary connective applied to X
//! (X)op(Y)     binary connective between X and Y
//! ```
//!
//! The parser does not know which operators exist; that depends on the logic
//! a formula is checked in (see [`Connective`]).
//!
//! # Example
//!
//! ```
//! use kripke_rs::formula::Formula;
//!
//! let f: Formula = "(p) /\\ (<>(~(q)))".parse().unwrap();
//! assert_eq!(f.arity(), 2);
//! assert_eq!(f.op(), "/\\");
//! assert_eq!(f.to_string(), "(p)/\\(<>(~(q)))");
//! ```

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Atom naming the evaluation point itself in the travel logic.
pub const HERE: &str = "I";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    Atom(String),
    Unary { op: String, operand: Box<Formula> },
    Binary { left: Box<Formula>, op: String, right: Box<Formula> },
}

impl Formula {
    pub fn atom(name: impl Into<String>) -> Self {
        Formula::Atom(name.into())
    }

    pub fn unary(op: impl Into<String>, operand: Formula) -> Self {
        Formula::Unary {
            op: op.into(),
            operand: Box::new(operand),
        }
    }

    pub fn binary(left: Formula, op: impl Into<String>, right: Formula) -> Self {
        Formula::Binary {
            left: Box::new(left),
            op: op.into(),
            right: Box::new(right),
        }
    }

    /// Parse the bracketed notation.
    pub fn parse(text: &str) -> Result<Formula> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        parse_compact(&compact)
    }

    pub fn arity(&self) -> usize {
        match self {
            Formula::Atom(_) => 0,
            Formula::Unary { .. } => 1,
            Formula::Binary { .. } => 2,
        }
    }

    /// The connective, or the atom's name for arity 0.
    pub fn op(&self) -> &str {
        match self {
            Formula::Atom(name) => name,
            Formula::Unary { op, .. } | Formula::Binary { op, .. } => op,
        }
    }

    pub fn left(&self) -> Option<&Formula> {
        match self {
            Formula::Binary { left, .. } => Some(left),
            _ => None,
        }
    }

    /// The single operand of a unary node, or the right operand of a binary one.
    pub fn right(&self) -> Option<&Formula> {
        match self {
            Formula::Atom(_) => None,
            Formula::Unary { operand, .. } => Some(operand),
            Formula::Binary { right, .. } => Some(right),
        }
    }

    /// Nesting depth; an atom has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Formula::Atom(_) => 1,
            Formula::Unary { operand, .. } => 1 + operand.depth(),
            Formula::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Rendering with `∧`/`∨` in place of `/\` and `\/`.
    pub fn pretty(&self) -> String {
        self.to_string().replace("/\\", "\u{2227}").replace("\\/", "\u{2228}")
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(name) => write!(f, "{}", name),
            Formula::Unary { op, operand } => write!(f, "{}({})", op, operand),
            Formula::Binary { left, op, right } => write!(f, "({}){}({})", left, op, right),
        }
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Formula::parse(s)
    }
}

fn parse_compact(text: &str) -> Result<Formula> {
    if text.is_empty() {
        return Err(Error::malformed(text, "empty formula"));
    }

    let Some(open) = text.find('(') else {
        if text.contains(')') {
            return Err(Error::malformed(text, "unbalanced parentheses"));
        }
        return Ok(Formula::Atom(text.to_string()));
    };

    if open == 0 {
        // (L)op(R)
        let close = matching_paren(text, 0).ok_or_else(|| Error::malformed(text, "unbalanced parentheses"))?;
        let left = parse_compact(&text[1..close])?;
        let rest = &text[close + 1..];
        let start = rest
            .find('(')
            .ok_or_else(|| Error::malformed(text, "missing right operand"))?;
        let op = &rest[..start];
        if op.is_empty() {
            return Err(Error::malformed(text, "empty operator"));
        }
        if op.contains(')') {
            return Err(Error::malformed(text, "unbalanced parentheses"));
        }
        let right = parse_operand(text, rest, start)?;
        Ok(Formula::binary(left, op, right))
    } else {
        // op(R)
        let op = &text[..open];
        if op.contains(')') {
            return Err(Error::malformed(text, "unbalanced parentheses"));
        }
        let operand = parse_operand(text, text, open)?;
        Ok(Formula::unary(op, operand))
    }
}

/// Parse the parenthesised group opening at `open`, which must close `text`.
fn parse_operand(whole: &str, text: &str, open: usize) -> Result<Formula> {
    let close = matching_paren(text, open).ok_or_else(|| Error::malformed(whole, "unbalanced parentheses"))?;
    if close != text.len() - 1 {
        return Err(Error::malformed(whole, "unexpected text after operand"));
    }
    parse_compact(&text[open + 1..close])
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Connectives recognised by at least one logic.
///
/// Which of them a given logic accepts is decided by its checker.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Connective {
    /// `(X)/\(Y)`
    And,
    /// `(X)\/(Y)`
    Or,
    /// `~(X)`
    Not,
    /// `<>(X)`
    Possibly,
    /// `[](X)`
    Necessarily,
    /// `<.>(X)`: after removing some edge.
    SomeSabotage,
    /// `[.](X)`: after removing any edge.
    EverySabotage,
    /// `<left>(X)` or `<H>(X)`
    MovePossibly,
    /// `[left](X)` or `[H](X)`
    MoveNecessarily,
    /// `<Si>(X)`, 1-based agent index.
    ShiftPossibly(usize),
    /// `[Si](X)`, 1-based agent index.
    ShiftNecessarily(usize),
}

impl Connective {
    pub fn binary(op: &str) -> Option<Connective> {
        match op {
            "/\\" => Some(Connective::And),
            "\\/" => Some(Connective::Or),
            _ => None,
        }
    }

    pub fn unary(op: &str) -> Option<Connective> {
        match op {
            "~" => Some(Connective::Not),
            "<>" => Some(Connective::Possibly),
            "[]" => Some(Connective::Necessarily),
            "<.>" => Some(Connective::SomeSabotage),
            "[.]" => Some(Connective::EverySabotage),
            "<left>" | "<H>" => Some(Connective::MovePossibly),
            "[left]" | "[H]" => Some(Connective::MoveNecessarily),
            _ => {
                if let Some(index) = shift_index(op, '<', '>') {
                    Some(Connective::ShiftPossibly(index))
                } else {
                    shift_index(op, '[', ']').map(Connective::ShiftNecessarily)
                }
            }
        }
    }

    /// Classify the connective at the root of `formula`; `None` for atoms.
    pub fn of(formula: &Formula) -> Option<Result<Connective>> {
        match formula {
            Formula::Atom(_) => None,
            Formula::Unary { op, .. } => Some(Connective::unary(op).ok_or_else(|| Error::UnknownOperator(op.clone()))),
            Formula::Binary { op, .. } => Some(Connective::binary(op).ok_or_else(|| Error::UnknownOperator(op.clone()))),
        }
    }
}

/// Parse `<S3>`-like tokens (brackets given) into the agent index.
fn shift_index(op: &str, open: char, close: char) -> Option<usize> {
    let inner = op.strip_prefix(open)?.strip_suffix(close)?;
    let digits = inner.strip_prefix('S')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
