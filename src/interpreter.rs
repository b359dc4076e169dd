/// The evaluator module executes formula trees against a dataset.
///
/// The evaluator linearizes a tree into a post-order instruction sequence,
/// binds terminals to dataset columns, and runs the sequence once per row on
/// an explicit operand stack. Results are scalars, vectors or `Undefined`.
///
/// # Responsibilities
/// - Maps symbols to opcodes and rejects trees with unmapped symbols.
/// - Applies arithmetic, elementwise, aggregation, window and time-series
///   operations with NaN-safe semantics.
/// - Reconciles vector operands of different lengths by a configured strategy.
pub mod evaluator;
/// The lexer module tokenizes formula text.
///
/// The lexer reads raw formula text and produces tokens for numbers, names,
/// quoted names, operators and delimiters, each paired with its byte offset.
pub mod lexer;
/// The parser module builds formula trees from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// a `SymbolicNode` tree, resolving function keywords against the symbol
/// registry.
///
/// # Responsibilities
/// - Applies operator precedence and collapses operator chains into n-ary
///   nodes.
/// - Parses the special forms for data-bound terminals, windows and programs.
/// - Reports syntax errors with byte positions.
pub mod parser;
/// The value module defines the runtime values of evaluation.
///
/// Declares the immutable `DoubleVector`, its statistics, and the
/// `EvaluationResult` every operation produces.
pub mod value;
