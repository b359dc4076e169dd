use thiserror::Error;

use crate::{interpreter::evaluator::opcode::OpCode, tree::Symbol};

/// Result type used by linearization, evaluation and simplification.
pub type EvalResult<T> = Result<T, EvalError>;

/// Represents all fatal errors of the evaluator and simplifier.
///
/// None of these are retried: each one points at a tree, grammar or dataset
/// that does not fit the configured evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A node's symbol has no entry in the opcode table.
    #[error("Symbol '{symbol}' has no opcode mapping.")]
    UnsupportedSymbol {
        /// The unmapped symbol.
        symbol: Symbol,
    },
    /// Two vector operands differ in length under the `ExceptionIfDifferent`
    /// strategy.
    #[error("Vector lengths differ: {left} vs {right}.")]
    VectorLengthMismatch {
        /// Length of the left operand.
        left:  usize,
        /// Length of the right operand.
        right: usize,
    },
    /// The tree violates a structural invariant.
    #[error("Malformed tree: {details}.")]
    MalformedTree {
        /// What is wrong with the tree.
        details: String,
    },
    /// The opcode exists but has no implementation.
    #[error("Opcode {opcode:?} is not implemented.")]
    UnimplementedOpCode {
        /// The unavailable opcode.
        opcode: OpCode,
    },
    /// A terminal references a column the dataset does not contain.
    #[error("Unknown variable '{name}'.")]
    UnknownVariable {
        /// The column name.
        name: String,
    },
    /// A terminal references a column of the wrong kind.
    #[error("Column '{name}' cannot be bound here: expected {expected} data.")]
    InvalidColumnBinding {
        /// The column name.
        name:     String,
        /// The kind of column the terminal needs.
        expected: &'static str,
    },
    /// The whole-tree result is a vector and the final aggregation forbids it.
    #[error("Row {row} evaluated to a vector, but a scalar result is required.")]
    NonScalarResult {
        /// The row being evaluated.
        row: usize,
    },
}

impl EvalError {
    /// Shorthand for [`EvalError::MalformedTree`].
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::MalformedTree { details: details.into() }
    }
}
