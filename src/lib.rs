//! # symvec
//!
//! symvec evaluates and simplifies symbolic formulas over datasets whose cells
//! are scalars, vectors or categories. Formulas are trees of symbols (as
//! produced by genetic programming), or text in a small formula syntax.
//! Vector-valued cells are combined elementwise, aggregated, windowed and
//! summarized by time-series features.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::ops::Range;

use crate::{
    dataset::Dataset,
    interpreter::{
        evaluator::core::{Interpreter, InterpreterConfig},
        parser::core::{ParserConfig, parse_formula},
    },
    simplifier::core::Simplifier,
};

/// In-memory datasets of named columns.
///
/// A dataset maps column names to scalar, vector or categorical columns and
/// can be loaded from JSON. Terminals of a formula bind to its columns by
/// name when the formula is linearized.
pub mod dataset;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while parsing formula
/// text, linearizing a tree against a dataset, evaluating it, or simplifying
/// it.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (parser, evaluator,
///   simplifier).
/// - Attaches byte offsets and details for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Prints formula trees in the formula syntax.
///
/// Output parses back into the same tree.
pub mod formatter;
/// Orchestrates parsing and evaluation of formulas.
///
/// This module ties together lexing, parsing, evaluation and value
/// representations. It exposes the public API for turning formula text into
/// trees and evaluating trees row by row.
///
/// # Responsibilities
/// - Coordinates the lexer, parser, evaluator and value types.
/// - Provides entry points for parsing and evaluating formulas.
pub mod interpreter;
/// Algebraic simplification of formula trees.
///
/// The simplifier rewrites a tree into a smaller tree that evaluates to the
/// same values on every row, without changing whether the result is a scalar
/// or a vector.
pub mod simplifier;
/// The formula tree data model.
///
/// Defines the closed set of symbols, their arities, and the nodes that make
/// up a formula.
pub mod tree;
/// General numeric helpers.
///
/// This module provides rounding and conversion routines shared by the
/// evaluator and the simplifier.
///
/// # Responsibilities
/// - Safely convert between `f64`, `i32` and `usize` without silent data
///   loss.
/// - Map relative window bounds onto vector indices.
pub mod util;

/// Parses, optionally simplifies, and evaluates a formula on a range of rows.
///
/// Names in `vector_variables` parse as vector-valued variables. Every row
/// yields one value; rows whose result is undefined yield NaN.
///
/// # Errors
/// Returns an error if parsing, simplification, linearization or evaluation
/// fails.
///
/// # Examples
/// ```
/// use symvec::{
///     dataset::{Column, Dataset},
///     evaluate_formula,
///     interpreter::evaluator::core::InterpreterConfig,
/// };
///
/// let data = Dataset::new().with_column("x", Column::Scalar(vec![1.0, 4.0]));
/// let values = evaluate_formula("sqrt(x) + 1", &data, 0..2, &[], InterpreterConfig::default(), true);
/// assert_eq!(values.unwrap(), [2.0, 3.0]);
///
/// // 'y' is not a column of the dataset.
/// let values = evaluate_formula("y + 1", &data, 0..2, &[], InterpreterConfig::default(), false);
/// assert!(values.is_err());
/// ```
pub fn evaluate_formula(source: &str,
                        data: &Dataset,
                        rows: Range<usize>,
                        vector_variables: &[&str],
                        config: InterpreterConfig,
                        simplify: bool)
                        -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let parser_config = ParserConfig::with_vector_variables(vector_variables.iter().copied());
    let mut tree = parse_formula(source, &parser_config)?;
    if simplify {
        tree = Simplifier::default().simplify(&tree)?;
    }

    let interpreter = Interpreter::new(config);
    let values = interpreter.evaluate_rows(&tree, data, rows)?;
    Ok(values.iter().collect::<Result<_, _>>()?)
}
