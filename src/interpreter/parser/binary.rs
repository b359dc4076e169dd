use std::iter::Peekable;

use crate::{
    error::ParseResult,
    interpreter::{
        lexer::Token,
        parser::{core::ParserConfig, unary::parse_unary},
    },
    tree::{Symbol, SymbolicNode, symbol::MAX_CHILDREN},
};

/// Parses addition and subtraction chains.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// Consecutive uses of the same operator become one n-ary node, so `a - b - c`
/// is `Subtraction[a, b, c]`; a change of operator nests the chain so far as
/// the first operand.
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>,
                             config: &ParserConfig)
                             -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_chain(tokens,
                config,
                |token| match token {
                    Token::Plus => Some(Symbol::Addition),
                    Token::Minus => Some(Symbol::Subtraction),
                    _ => None,
                },
                parse_multiplicative)
}

/// Parses multiplication and division chains.
///
/// The rule is: `multiplicative := exponent (("*" | "/") exponent)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>,
                                   config: &ParserConfig)
                                   -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_chain(tokens,
                config,
                |token| match token {
                    Token::Star => Some(Symbol::Multiplication),
                    Token::Slash => Some(Symbol::Division),
                    _ => None,
                },
                parse_exponent)
}

/// Parses exponentiation with right-associativity:
/// `a ^ b ^ c` parses as `a ^ (b ^ c)`.
///
/// The rule is: `exponent := unary ("^" exponent)?`
pub fn parse_exponent<'a, I>(tokens: &mut Peekable<I>,
                             config: &ParserConfig)
                             -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let base = parse_unary(tokens, config)?;
    if let Some((Token::Caret, _)) = tokens.peek() {
        tokens.next();
        let exponent = parse_exponent(tokens, config)?;
        return Ok(SymbolicNode::binary(Symbol::Power, base, exponent));
    }
    Ok(base)
}

fn parse_chain<'a, I, O, N>(tokens: &mut Peekable<I>,
                            config: &ParserConfig,
                            operator: O,
                            operand: N)
                            -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone,
          O: Fn(&Token) -> Option<Symbol>,
          N: Fn(&mut Peekable<I>, &ParserConfig) -> ParseResult<SymbolicNode>
{
    let mut operands = vec![operand(tokens, config)?];
    let mut current: Option<Symbol> = None;

    while let Some((token, _)) = tokens.peek() {
        let Some(symbol) = operator(token) else {
            break;
        };
        tokens.next();
        if let Some(previous) = current
           && (previous != symbol || operands.len() == MAX_CHILDREN)
        {
            operands = vec![SymbolicNode::new(previous, operands)];
        }
        current = Some(symbol);
        operands.push(operand(tokens, config)?);
    }

    Ok(match current {
        Some(symbol) => SymbolicNode::new(symbol, operands),
        None => operands.remove(0),
    })
}
