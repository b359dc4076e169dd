/// Formula parsing errors.
///
/// Defines all error types that can occur while tokenizing and parsing formula
/// text into a tree. Parse errors carry the byte offset of the offending token.
pub mod parse_error;
/// Linearization and evaluation errors.
///
/// Contains the fatal error kinds of the evaluator and simplifier: unmapped
/// symbols, vector length mismatches, malformed trees, unavailable opcodes and
/// dataset binding failures. Numeric domain violations are not errors; they
/// evaluate to `Undefined`.
pub mod eval_error;

pub use eval_error::{EvalError, EvalResult};
pub use parse_error::{ParseError, ParseResult};
