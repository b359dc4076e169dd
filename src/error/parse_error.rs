use thiserror::Error;

/// Result type used by the formula parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Unexpected token '{token}' at position {position}.")]
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// Byte offset of the token.
        position: usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Unexpected end of input.")]
    UnexpectedEndOfInput,
    /// Called a function the symbol set does not know.
    #[error("Unknown function '{name}' at position {position}.")]
    UnknownFunction {
        /// The function name.
        name:     String,
        /// Byte offset of the name.
        position: usize,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("Function '{name}' expects {expected} arguments, found {found}.")]
    ArgumentCountMismatch {
        /// The function name.
        name:     String,
        /// Human readable description of the accepted counts.
        expected: String,
        /// The number of arguments given.
        found:    usize,
    },
    /// An argument was invalid for a special form.
    #[error("Invalid argument: {details}.")]
    InvalidArgument {
        /// Why the argument is invalid.
        details: String,
    },
}
