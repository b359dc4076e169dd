use logos::Logos;

use crate::error::{ParseError, ParseResult};

/// Represents a lexical token of formula text.
/// A token is a minimal but meaningful unit of text produced by the lexer.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `.5`, `2` or `2.1e-10`.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    Number(f64),
    /// Identifier tokens; variable names, function names and flags such as
    /// `x`, `sin` or `true`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// Quoted names such as `'outdoor temp'`, for names that are not plain
    /// identifiers.
    #[regex(r"'[^']*'", |lex| {
        let slice = lex.slice();
        slice[1..slice.len() - 1].to_string()
    })]
    Quoted(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^`
    #[token("^")]
    Caret,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
}

/// Parses a floating-point literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed value if successful.
/// - `None`: If the slice is not a valid float.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Splits formula text into tokens paired with their byte offsets.
///
/// # Errors
/// `UnexpectedToken` for the first slice that is not a token.
///
/// # Example
/// ```
/// use symvec::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("2 * x").unwrap();
/// assert_eq!(tokens,
///            [(Token::Number(2.0), 0), (Token::Star, 2), (Token::Identifier("x".into()), 4)]);
/// assert!(tokenize("x # y").is_err());
/// ```
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(token) = lexer.next() {
        let position = lexer.span().start;
        match token {
            Ok(token) => tokens.push((token, position)),
            Err(()) => {
                return Err(ParseError::UnexpectedToken { token: lexer.slice().to_string(),
                                                         position });
            },
        }
    }
    Ok(tokens)
}
