use std::iter::Peekable;

use crate::{
    error::{ParseError, ParseResult},
    interpreter::{
        lexer::Token,
        parser::{
            call::parse_call,
            core::{ParserConfig, parse_expression},
            utils::{expect, unexpected},
        },
    },
    tree::{DataType, NodeParams, Symbol, SymbolicNode},
};

/// Parses a unary minus or a primary expression.
///
/// The rule is: `unary := "-" unary | primary`
///
/// A minus in front of a numeric literal folds into the literal; any other
/// operand becomes a one-child `Subtraction`.
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>,
                          config: &ParserConfig)
                          -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Minus, _)) = tokens.peek() {
        tokens.next();
        let operand = parse_unary(tokens, config)?;
        return Ok(negate(operand));
    }
    parse_primary(tokens, config)
}

fn negate(operand: SymbolicNode) -> SymbolicNode {
    match (operand.symbol, &operand.params) {
        (Symbol::Number, NodeParams::Number(v)) => SymbolicNode::number(-v),
        (Symbol::Constant, NodeParams::Number(v)) => SymbolicNode::constant(-v),
        _ => SymbolicNode::unary(Symbol::Subtraction, operand),
    }
}

/// Parses a primary expression: a number, a variable, a call or a
/// parenthesized expression.
///
/// The rule is: `primary := number | name | call | "(" expression ")"`
///
/// # Errors
/// `UnexpectedToken` for tokens that cannot start an expression.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>,
                            config: &ParserConfig)
                            -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Number(value), _)) => Ok(SymbolicNode::number(*value)),
        Some((Token::Identifier(name), position)) => {
            if let Some((Token::LParen, _)) = tokens.peek() {
                tokens.next();
                parse_call(name, *position, tokens, config)
            } else {
                Ok(variable(name, 1.0, config))
            }
        },
        Some((Token::Quoted(name), _)) => Ok(variable(name, 1.0, config)),
        Some((Token::LParen, _)) => {
            let inner = parse_expression(tokens, config)?;
            expect(tokens, &Token::RParen)?;
            Ok(inner)
        },
        Some((token, position)) => Err(unexpected(token, *position)),
        None => Err(ParseError::UnexpectedEndOfInput),
    }
}

/// A weighted variable shaped as `config` declares it.
pub fn variable(name: &str, weight: f64, config: &ParserConfig) -> SymbolicNode {
    match config.data_type(name) {
        DataType::Scalar => SymbolicNode::variable(name, weight),
        DataType::Vector => SymbolicNode::vector_variable(name, weight),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ParseError,
        interpreter::parser::core::{ParserConfig, parse_formula},
        tree::{DataType, Symbol, SymbolicNode},
    };

    #[test]
    fn minus_folds_into_literals() {
        let tree = parse_formula("-2.5", &ParserConfig::default()).unwrap();
        assert_eq!(tree, SymbolicNode::number(-2.5));
    }

    #[test]
    fn minus_on_expression_is_unary_subtraction() {
        let tree = parse_formula("-x", &ParserConfig::default()).unwrap();
        assert_eq!(tree, SymbolicNode::unary(Symbol::Subtraction, SymbolicNode::variable("x", 1.0)));
    }

    #[test]
    fn vector_variables_follow_config() {
        let config = ParserConfig::with_vector_variables(["v"]);
        let tree = parse_formula("v + 'x y'", &config).unwrap();
        let shapes: Vec<_> = tree.children
                                 .iter()
                                 .map(|c| c.variable_params().unwrap().data_type)
                                 .collect();
        assert_eq!(shapes, [DataType::Vector, DataType::Scalar]);
        assert_eq!(tree.children[1].column_name(), Some("x y"));
    }

    #[test]
    fn unbalanced_parentheses() {
        let config = ParserConfig::default();
        assert_eq!(parse_formula("(x + 1", &config), Err(ParseError::UnexpectedEndOfInput));
        assert!(matches!(parse_formula("x + 1)", &config),
                         Err(ParseError::UnexpectedToken { position: 5, .. })));
        assert_eq!(parse_formula("", &config), Err(ParseError::UnexpectedEndOfInput));
    }
}
