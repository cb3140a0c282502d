//! Literal-array evaluation of matched notebook lines.
//!
//! Matched lines are never executed. They are parsed by a closed grammar of
//! numbers, lists, tuples and numpy array/scalar constructors; anything else
//! (names, attribute access, arithmetic, assignment) is rejected.

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;

use nbweights_core::errors::LiteralError;
use nbweights_core::WeightCollection;

pub use eval::{evaluate, Value};
pub use parser::{parse_expression, MAX_DEPTH};

/// Evaluate a source line into a weight collection.
///
/// The line is stripped of surrounding whitespace and any trailing comment;
/// its value is iterated to produce one tensor per element.
pub fn evaluate_line(line: &str) -> Result<WeightCollection, LiteralError> {
    let expr = parse_expression(line.trim())?;
    evaluate(&expr)?.into_collection()
}
