/// Opcodes and the symbol-to-opcode table.
///
/// Declares the closed `OpCode` set the evaluator dispatches on and the
/// `OpCodeTable` the linearizer consults. Symbols without an entry cannot be
/// evaluated.
pub mod opcode;

/// Conversion of trees into instruction sequences.
///
/// Produces the post-order instruction stream and binds terminal nodes to
/// their dataset columns.
pub mod linearizer;

/// Core evaluation logic.
///
/// Contains the interpreter, its configuration, the per-evaluation cursor
/// state and the lazily produced per-row values.
pub mod core;

/// Vector length reconciliation.
///
/// Implements the strategies that bring two vector operands of different
/// lengths to a common length.
pub mod reconcile;

/// Binary and n-ary operators.
///
/// Handles arithmetic folds, powers and roots, and the two-vector comparison
/// measures.
pub mod binary;

/// Function evaluation.
///
/// Handles terminals, elementwise functions, aggregations, windows and the
/// time-series features.
pub mod function;
