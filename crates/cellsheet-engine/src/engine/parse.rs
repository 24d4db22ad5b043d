//! Formula parsing.
//!
//! Three forms are recognised, dispatched on the first character:
//!
//! - `=A1+2*-B3` arithmetic over cell references and numeric literals
//! - `@SUM(A1..A9)` a range aggregate (`SUM`, `AVER`, `MAX`, `MIN`, `STDDEV`)
//! - `<A1-CPY(B1..B9)` the broadcast command, which copies `A1` over a range
//!
//! Parsing validates shape and bounds. Numeric literals are kept as text
//! and only read when the formula is evaluated.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;
use super::error::{FormulaError, Result};
use crate::builtins::{COPY_FUNCTION, RangeFunction};

/// A binary operator between two arithmetic operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_char(ch: char) -> Option<Operator> {
        match ch {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn binds_tight(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }

    /// Apply the operator. A zero divisor is replaced by one.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div => lhs / if rhs == 0.0 { 1.0 } else { rhs },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Literal(String),
    Reference(CellRef),
}

/// An operand with its optional unary minus.
#[derive(Clone, Debug, PartialEq)]
pub struct Term {
    pub operand: Operand,
    pub negated: bool,
}

/// `terms[i] operators[i] terms[i + 1] ...`
#[derive(Clone, Debug, PartialEq)]
pub struct Arithmetic {
    pub terms: Vec<Term>,
    pub operators: Vec<Operator>,
}

/// A one-dimensional span of cells named by its two endpoints.
///
/// Endpoints sharing a column name a column-wise span over the rows between
/// them. Otherwise the span runs along the first endpoint's row, over the
/// columns between the two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub first: CellRef,
    pub last: CellRef,
}

impl CellRange {
    pub fn new(first: CellRef, last: CellRef) -> CellRange {
        CellRange { first, last }
    }

    pub fn is_column_wise(&self) -> bool {
        self.first.col == self.last.col
    }

    /// The cells of the range in order, lowest index first.
    pub fn cells(&self) -> Vec<CellRef> {
        if self.is_column_wise() {
            let (lo, hi) = ordered(self.first.row, self.last.row);
            (lo..=hi).map(|row| CellRef::new(self.first.col, row)).collect()
        } else {
            let (lo, hi) = ordered(self.first.col, self.last.col);
            (lo..=hi).map(|col| CellRef::new(col, self.first.row)).collect()
        }
    }

    pub fn len(&self) -> usize {
        let (lo, hi) = if self.is_column_wise() {
            ordered(self.first.row, self.last.row)
        } else {
            ordered(self.first.col, self.last.col)
        };
        hi - lo + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RangeCall {
    pub function: RangeFunction,
    pub range: CellRange,
}

/// A parsed cell formula. Transient: rebuilt on every evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum Formula {
    Arithmetic(Arithmetic),
    Range(RangeCall),
}

impl Formula {
    /// Every distinct cell the formula reads, in order of first appearance.
    pub fn references(&self) -> Vec<CellRef> {
        let mut refs: Vec<CellRef> = Vec::new();
        match self {
            Formula::Arithmetic(arith) => {
                for term in &arith.terms {
                    if let Operand::Reference(r) = term.operand {
                        if !refs.contains(&r) {
                            refs.push(r);
                        }
                    }
                }
            }
            Formula::Range(call) => refs = call.range.cells(),
        }
        refs
    }
}

/// What the broadcast command does besides copying.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BroadcastFunction {
    Copy,
    Aggregate(RangeFunction),
}

/// A parsed `<SRC-FUNC(FIRST..LAST)` command.
#[derive(Clone, Debug, PartialEq)]
pub struct Broadcast {
    pub source: CellRef,
    pub function: BroadcastFunction,
    pub range: CellRange,
}

fn range_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^@(?<name>[A-Z]+)\((?<first>[^().]*)\.\.(?<last>[^().]*)\)$")
            .expect("range call regex must compile")
    })
}

fn broadcast_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^<(?<source>[^-]*)-(?<name>[A-Z]+)\((?<first>[^().]*)\.\.(?<last>[^().]*)\)$")
            .expect("broadcast regex must compile")
    })
}

/// Parse formula text (starting with `=` or `@`) for a `rows x cols` grid.
pub fn parse_formula(text: &str, rows: usize, cols: usize) -> Result<Formula> {
    reject_lowercase(text)?;
    match text.chars().next() {
        Some('=') => parse_arithmetic(&text[1..], rows, cols).map(Formula::Arithmetic),
        Some('@') => parse_range_call(text, rows, cols).map(Formula::Range),
        _ => Err(FormulaError::Syntax(format!("not a formula: {}", text))),
    }
}

/// Parse the broadcast command `<SRC-FUNC(FIRST..LAST)`.
pub fn parse_broadcast(text: &str, rows: usize, cols: usize) -> Result<Broadcast> {
    reject_lowercase(text)?;
    if !text.starts_with('<') {
        return Err(FormulaError::Syntax(format!("not a broadcast: {}", text)));
    }
    if punctuation_count(text) != 4 {
        return Err(FormulaError::Syntax(
            "expected '(', '..' and ')' around the range".to_string(),
        ));
    }
    if !text.contains('-') {
        return Err(FormulaError::Syntax(
            "expected '-' between the source cell and the function".to_string(),
        ));
    }
    let letters = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if !(6..=9).contains(&letters) {
        return Err(FormulaError::Syntax(format!(
            "unexpected broadcast shape: {}",
            text
        )));
    }

    let caps = broadcast_re()
        .captures(text)
        .ok_or_else(|| FormulaError::Syntax(format!("unexpected broadcast shape: {}", text)))?;
    let name = &caps["name"];
    let function = if name == COPY_FUNCTION {
        BroadcastFunction::Copy
    } else {
        RangeFunction::from_name(name)
            .map(BroadcastFunction::Aggregate)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?
    };

    Ok(Broadcast {
        source: parse_reference(&caps["source"], rows, cols)?,
        function,
        range: CellRange::new(
            parse_reference(&caps["first"], rows, cols)?,
            parse_reference(&caps["last"], rows, cols)?,
        ),
    })
}

fn reject_lowercase(text: &str) -> Result<()> {
    if text.chars().any(|c| c.is_lowercase()) {
        Err(FormulaError::Lowercase)
    } else {
        Ok(())
    }
}

fn punctuation_count(text: &str) -> usize {
    text.chars().filter(|c| matches!(c, '(' | ')' | '.')).count()
}

/// Split `body` (the text after `=`) into operands and operators.
///
/// A sign is expected at the start and right after every operator; a `-` in
/// that position belongs to the next operand instead of being an operator.
fn tokenize(body: &str) -> (Vec<String>, Vec<Operator>) {
    let mut operands = Vec::new();
    let mut operators = Vec::new();
    let mut token = String::new();
    let mut expecting_sign = true;

    for ch in body.chars() {
        match Operator::from_char(ch) {
            Some(op) if !expecting_sign => {
                operands.push(token.trim().to_string());
                operators.push(op);
                token.clear();
                expecting_sign = true;
            }
            _ => {
                token.push(ch);
                if !ch.is_whitespace() {
                    expecting_sign = false;
                }
            }
        }
    }
    let last = token.trim();
    if !last.is_empty() {
        operands.push(last.to_string());
    }
    (operands, operators)
}

fn parse_arithmetic(body: &str, rows: usize, cols: usize) -> Result<Arithmetic> {
    let (operands, operators) = tokenize(body);
    if operands.is_empty() {
        return Err(FormulaError::Syntax("empty formula".to_string()));
    }
    if operands.len() != operators.len() + 1 {
        return Err(FormulaError::Syntax("dangling operator".to_string()));
    }

    let terms = operands
        .iter()
        .map(|token| parse_term(token, rows, cols))
        .collect::<Result<Vec<_>>>()?;
    Ok(Arithmetic { terms, operators })
}

fn parse_term(token: &str, rows: usize, cols: usize) -> Result<Term> {
    let (negated, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if rest.is_empty() {
        return Err(FormulaError::Syntax(format!("missing operand in '{}'", token)));
    }
    let operand = if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        Operand::Reference(parse_reference(rest, rows, cols)?)
    } else {
        Operand::Literal(rest.to_string())
    };
    Ok(Term { operand, negated })
}

fn parse_range_call(text: &str, rows: usize, cols: usize) -> Result<RangeCall> {
    let name: String = text[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let function =
        RangeFunction::from_name(&name).ok_or_else(|| FormulaError::UnknownFunction(name.clone()))?;

    if punctuation_count(text) != 4 {
        return Err(FormulaError::Syntax(
            "expected '(', '..' and ')' around the range".to_string(),
        ));
    }
    let caps = range_call_re()
        .captures(text)
        .ok_or_else(|| FormulaError::Syntax(format!("unexpected range call shape: {}", text)))?;

    Ok(RangeCall {
        function,
        range: CellRange::new(
            parse_reference(&caps["first"], rows, cols)?,
            parse_reference(&caps["last"], rows, cols)?,
        ),
    })
}

fn parse_reference(token: &str, rows: usize, cols: usize) -> Result<CellRef> {
    let token = token.trim();
    let cell = CellRef::parse(token).ok_or_else(|| FormulaError::InvalidReference(token.to_string()))?;
    if cell.within(rows, cols) {
        Ok(cell)
    } else {
        Err(FormulaError::OutOfBounds(token.to_string()))
    }
}
