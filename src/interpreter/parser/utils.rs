use std::iter::Peekable;

use crate::{
    error::{ParseError, ParseResult},
    interpreter::lexer::Token,
};

/// Consumes the next token, failing unless it equals `expected`.
///
/// # Errors
/// `UnexpectedToken` for any other token, `UnexpectedEndOfInput` when the
/// input is exhausted.
pub fn expect<'a, I>(tokens: &mut Peekable<I>, expected: &Token) -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((token, _)) if token == expected => Ok(()),
        Some((token, position)) => Err(unexpected(token, *position)),
        None => Err(ParseError::UnexpectedEndOfInput),
    }
}

/// Consumes the next token if it equals `expected`.
pub fn accept<'a, I>(tokens: &mut Peekable<I>, expected: &Token) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if tokens.peek().is_some_and(|(token, _)| token == expected) {
        tokens.next();
        true
    } else {
        false
    }
}

/// Parses a comma-separated list of items up to and including the closing
/// parenthesis. An empty list is allowed.
///
/// # Arguments
/// - `tokens`: Token iterator positioned after the opening parenthesis.
/// - `parse_item`: Parser for a single item.
///
/// # Errors
/// Errors from `parse_item`, or an unexpected token where a comma or the
/// closing parenthesis should be.
pub fn parse_comma_separated<'a, I, T, F>(tokens: &mut Peekable<I>,
                                          mut parse_item: F)
                                          -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone,
          F: FnMut(&mut Peekable<I>) -> ParseResult<T>
{
    let mut items = Vec::new();
    if accept(tokens, &Token::RParen) {
        return Ok(items);
    }

    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((Token::RParen, _)) => break,
            Some((token, position)) => return Err(unexpected(token, *position)),
            None => return Err(ParseError::UnexpectedEndOfInput),
        }
    }
    Ok(items)
}

/// Parses a column or category name: an identifier or a quoted name.
///
/// # Errors
/// `UnexpectedToken` if the next token is not a name.
pub fn parse_name<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Identifier(name) | Token::Quoted(name), _)) => Ok(name.clone()),
        Some((token, position)) => Err(unexpected(token, *position)),
        None => Err(ParseError::UnexpectedEndOfInput),
    }
}

/// Parses a numeric literal with an optional leading minus.
///
/// # Errors
/// `UnexpectedToken` if no number follows.
pub fn parse_signed_number<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<f64>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let sign = if accept(tokens, &Token::Minus) { -1.0 } else { 1.0 };
    match tokens.next() {
        Some((Token::Number(value), _)) => Ok(sign * value),
        Some((token, position)) => Err(unexpected(token, *position)),
        None => Err(ParseError::UnexpectedEndOfInput),
    }
}

/// Parses the boolean flag `true` or `false`.
///
/// # Errors
/// `InvalidArgument` for any other identifier.
pub fn parse_flag<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<bool>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Identifier(word), _)) if word == "true" => Ok(true),
        Some((Token::Identifier(word), _)) if word == "false" => Ok(false),
        Some((Token::Identifier(word), _)) => {
            Err(ParseError::InvalidArgument { details: format!("expected true or false, found '{word}'") })
        },
        Some((token, position)) => Err(unexpected(token, *position)),
        None => Err(ParseError::UnexpectedEndOfInput),
    }
}

/// Builds an `UnexpectedToken` error for `token`.
pub fn unexpected(token: &Token, position: usize) -> ParseError {
    ParseError::UnexpectedToken { token: format!("{token:?}"),
                                  position }
}
