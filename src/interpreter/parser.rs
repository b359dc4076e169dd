/// Parser entry points and configuration.
///
/// Contains `parse_formula`, which turns formula text into a tree, and the
/// `ParserConfig` naming the vector-valued variables.
pub mod core;

/// Binary operator parsing.
///
/// Implements the precedence levels of `+ -`, `* /` and `^`, collecting chains
/// of the same operator into one n-ary node.
pub mod binary;

/// Unary minus and primary expressions.
///
/// Handles literals, variables, parenthesized expressions and dispatches
/// function calls.
pub mod unary;

/// Function calls and special forms.
///
/// Parses calls by symbol keyword and the forms with non-expression arguments
/// (`lag`, `factor`, `binfactor`, `subvector`, ...).
pub mod call;

/// Utility functions for the parser.
///
/// Provides token expectations and the small argument parsers shared by the
/// special forms.
pub mod utils;
