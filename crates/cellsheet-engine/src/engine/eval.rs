//! Formula evaluation against a grid.
//!
//! Evaluation is split from edge registration: [`evaluate`] reports the
//! value together with every cell the formula reads, and the caller decides
//! which dependency edges to install.

use super::error::{FormulaError, Result};
use super::parse::{Arithmetic, CellRange, Formula, Operand, parse_formula};
use super::{CellRef, Grid};
use crate::builtins::RangeFunction;

/// The outcome of evaluating a well-formed formula.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// The computed number, or the numeric failure that prevented it.
    pub value: Result<f64>,
    /// Every distinct cell the formula reads.
    pub references: Vec<CellRef>,
}

/// Parse and evaluate formula text in the context of `grid`.
///
/// `Err` means the formula is malformed (its cell should be blanked). A
/// well-formed formula whose operands cannot be read as numbers yields
/// `Ok` with `value` set to the error.
pub fn evaluate(source: &str, grid: &Grid) -> Result<Evaluation> {
    let formula = parse_formula(source, grid.rows(), grid.cols())?;
    Ok(Evaluation {
        value: evaluate_formula(&formula, grid),
        references: formula.references(),
    })
}

/// Evaluate an already parsed formula.
pub fn evaluate_formula(formula: &Formula, grid: &Grid) -> Result<f64> {
    match formula {
        Formula::Arithmetic(arith) => evaluate_arithmetic(arith, grid),
        Formula::Range(call) => evaluate_range(call.function, &call.range, grid),
    }
}

/// Resolve operands, apply unary minus, fold `*` and `/` left to right,
/// then fold `+` and `-` left to right.
fn evaluate_arithmetic(arith: &Arithmetic, grid: &Grid) -> Result<f64> {
    let mut numbers = Vec::with_capacity(arith.terms.len());
    for term in &arith.terms {
        let n = resolve_operand(&term.operand, grid)?;
        numbers.push(n);
    }
    for (n, term) in numbers.iter_mut().zip(&arith.terms) {
        if term.negated {
            *n = -*n;
        }
    }

    // Collapse multiplicative runs first.
    let mut sums = vec![numbers[0]];
    let mut additive = Vec::new();
    for (op, rhs) in arith.operators.iter().zip(numbers.iter().skip(1)) {
        if op.binds_tight() {
            if let Some(lhs) = sums.last_mut() {
                *lhs = op.apply(*lhs, *rhs);
            }
        } else {
            additive.push(*op);
            sums.push(*rhs);
        }
    }

    let mut result = sums[0];
    for (op, rhs) in additive.iter().zip(sums.iter().skip(1)) {
        result = op.apply(result, *rhs);
    }
    Ok(result)
}

fn resolve_operand(operand: &Operand, grid: &Grid) -> Result<f64> {
    match operand {
        Operand::Literal(text) => text.parse::<f64>().map_err(|_| FormulaError::NotANumber {
            text: text.clone(),
        }),
        Operand::Reference(at) => match grid.get(at) {
            Some(cell) => cell.numeric_value(),
            None => Err(FormulaError::OutOfBounds(at.to_string())),
        },
    }
}

/// Aggregate the Number and Formula cells of `range`; other cells are skipped.
pub fn evaluate_range(function: RangeFunction, range: &CellRange, grid: &Grid) -> Result<f64> {
    let mut values = Vec::with_capacity(range.len());
    for at in range.cells() {
        let Some(cell) = grid.get(&at) else {
            return Err(FormulaError::OutOfBounds(at.to_string()));
        };
        if cell.kind().is_numeric() {
            values.push(cell.numeric_value()?);
        }
    }
    Ok(function.aggregate(&values))
}
