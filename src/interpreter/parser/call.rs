use std::iter::Peekable;

use crate::{
    error::{ParseError, ParseResult},
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParserConfig, parse_expression},
            unary::variable,
            utils::{
                accept, expect, parse_comma_separated, parse_flag, parse_name, parse_signed_number,
            },
        },
    },
    tree::{Arity, Symbol, SymbolicNode},
    util::num::MAX_SAFE_INT,
};

/// Parses a call after its opening parenthesis.
///
/// Special forms take names, numbers and flags as arguments:
///
/// ```text
/// variable(name, weight)
/// lag(name, offset[, weight])
/// factor(name, category: weight, ...)
/// binfactor(name, category, weight)
/// const(value)                      number(value)
/// subvector(expr, start, end[, round_trip])
/// subvector_expr(expr, start_expr, end_expr[, round_trip])
/// program(body, defun(name, body), ...)
/// invoke(name, expr, ...)           arg(index)
/// ```
///
/// Every other name is looked up as a symbol keyword and takes expression
/// arguments, checked against the symbol's arity.
///
/// # Errors
/// - `UnknownFunction` if `name` is no keyword.
/// - `ArgumentCountMismatch` if the arguments do not fit the arity.
/// - `InvalidArgument` for malformed special-form arguments.
pub fn parse_call<'a, I>(name: &str,
                         position: usize,
                         tokens: &mut Peekable<I>,
                         config: &ParserConfig)
                         -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let node = match name {
        "variable" => {
            let column = parse_name(tokens)?;
            expect(tokens, &Token::Comma)?;
            let weight = parse_signed_number(tokens)?;
            variable(&column, weight, config)
        },
        "lag" => {
            let column = parse_name(tokens)?;
            expect(tokens, &Token::Comma)?;
            let lag = parse_integer(tokens)?;
            let weight = if accept(tokens, &Token::Comma) { parse_signed_number(tokens)? } else { 1.0 };
            SymbolicNode::lagged_variable(column, weight, lag)
        },
        "factor" => {
            let column = parse_name(tokens)?;
            let mut weights = Vec::new();
            while accept(tokens, &Token::Comma) {
                let category = parse_name(tokens)?;
                expect(tokens, &Token::Colon)?;
                weights.push((category, parse_signed_number(tokens)?));
            }
            SymbolicNode::factor(column, weights)
        },
        "binfactor" => {
            let column = parse_name(tokens)?;
            expect(tokens, &Token::Comma)?;
            let category = parse_name(tokens)?;
            expect(tokens, &Token::Comma)?;
            SymbolicNode::binary_factor(column, category, parse_signed_number(tokens)?)
        },
        "const" => SymbolicNode::constant(parse_signed_number(tokens)?),
        "number" => SymbolicNode::number(parse_signed_number(tokens)?),
        "subvector" => {
            let operand = parse_expression(tokens, config)?;
            expect(tokens, &Token::Comma)?;
            let start = parse_signed_number(tokens)?;
            expect(tokens, &Token::Comma)?;
            let end = parse_signed_number(tokens)?;
            let round_trip = accept(tokens, &Token::Comma) && parse_flag(tokens)?;
            SymbolicNode::sub_vector(operand, start, end, round_trip)
        },
        "subvector_expr" => {
            let operand = parse_expression(tokens, config)?;
            expect(tokens, &Token::Comma)?;
            let start = parse_expression(tokens, config)?;
            expect(tokens, &Token::Comma)?;
            let end = parse_expression(tokens, config)?;
            let round_trip = accept(tokens, &Token::Comma) && parse_flag(tokens)?;
            SymbolicNode::sub_vector_subtree(operand, start, end, round_trip)
        },
        "program" => {
            let mut parts = parse_comma_separated(tokens, |t| parse_expression(t, config))?.into_iter();
            let Some(body) = parts.next() else {
                return Err(ParseError::ArgumentCountMismatch { name:     name.to_string(),
                                                               expected: describe(Symbol::ProgramRoot.arity()),
                                                               found:    0, });
            };
            let defuns: Vec<_> = parts.collect();
            if let Some(other) = defuns.iter().find(|d| d.symbol != Symbol::Defun) {
                return Err(ParseError::InvalidArgument { details: format!("program expects defun definitions, found {}",
                                                                          other.symbol) });
            }
            return Ok(SymbolicNode::program(body, defuns));
        },
        "defun" => {
            let function = parse_name(tokens)?;
            expect(tokens, &Token::Comma)?;
            SymbolicNode::defun(function, parse_expression(tokens, config)?)
        },
        "invoke" => {
            let function = parse_name(tokens)?;
            let arguments = if accept(tokens, &Token::Comma) {
                parse_comma_separated(tokens, |t| parse_expression(t, config))?
            } else {
                expect(tokens, &Token::RParen)?;
                Vec::new()
            };
            return Ok(SymbolicNode::invoke(function, arguments));
        },
        "arg" => {
            let index = parse_integer(tokens)?;
            let index = usize::try_from(index).map_err(|_| ParseError::InvalidArgument { details: format!("argument index {index} is negative") })?;
            SymbolicNode::argument(index)
        },
        _ => return parse_symbol_call(name, position, tokens, config),
    };
    expect(tokens, &Token::RParen)?;
    Ok(node)
}

/// Parses `keyword(expr, ...)` for a function symbol.
fn parse_symbol_call<'a, I>(name: &str,
                            position: usize,
                            tokens: &mut Peekable<I>,
                            config: &ParserConfig)
                            -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let symbol = Symbol::from_keyword(name).filter(|s| is_callable(*s))
                                           .ok_or_else(|| ParseError::UnknownFunction { name: name.to_string(),
                                                                                        position })?;
    let arguments = parse_comma_separated(tokens, |t| parse_expression(t, config))?;
    if !symbol.arity().contains(arguments.len()) {
        return Err(ParseError::ArgumentCountMismatch { name:     name.to_string(),
                                                       expected: describe(symbol.arity()),
                                                       found:    arguments.len(), });
    }
    Ok(SymbolicNode::new(symbol, arguments))
}

/// Symbols reachable through the generic `keyword(args)` syntax.
const fn is_callable(symbol: Symbol) -> bool {
    !symbol.is_terminal()
    && !symbol.is_structural()
    && !matches!(symbol, Symbol::SubVector | Symbol::SubVectorSubtree)
}

fn describe(arity: Arity) -> String {
    match arity {
        Arity::Exact(n) => n.to_string(),
        Arity::Range(min, max) => format!("{min} to {max}"),
    }
}

/// Parses a signed whole number.
#[allow(clippy::cast_possible_truncation)]
fn parse_integer<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<i64>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let value = parse_signed_number(tokens)?;
    if value.fract() != 0.0 || value.abs() > MAX_SAFE_INT {
        return Err(ParseError::InvalidArgument { details: format!("expected a whole number, found {value}") });
    }
    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        error::ParseError,
        interpreter::parser::core::{ParserConfig, parse_formula},
        tree::{NodeParams, Symbol, SymbolicNode},
    };

    fn parse(source: &str) -> Result<SymbolicNode, ParseError> {
        parse_formula(source, &ParserConfig::with_vector_variables(["v"]))
    }

    #[test]
    fn keyword_calls() {
        let tree = parse("quantile(v, 0.25)").unwrap();
        assert_eq!(tree.symbol, Symbol::Quantile);
        assert_eq!(tree.children[1], SymbolicNode::number(0.25));
        assert_eq!(parse("pow(x, 2)").unwrap().symbol, Symbol::Power);
    }

    #[test]
    fn arity_is_checked() {
        assert_eq!(parse("sin(x, y)"),
                   Err(ParseError::ArgumentCountMismatch { name:     "sin".into(),
                                                           expected: "1".into(),
                                                           found:    2, }));
    }

    #[test]
    fn unknown_functions_report_position() {
        assert_eq!(parse("1 + frobnicate(x)"),
                   Err(ParseError::UnknownFunction { name:     "frobnicate".into(),
                                                     position: 4, }));
        assert!(matches!(parse("start(x)"), Err(ParseError::UnknownFunction { .. })));
    }

    #[test]
    fn data_bound_forms() {
        assert_eq!(parse("variable(x, -2)").unwrap(), SymbolicNode::variable("x", -2.0));
        assert_eq!(parse("lag(x, -1, 0.5)").unwrap(), SymbolicNode::lagged_variable("x", 0.5, -1));
        assert_eq!(parse("factor(c, a: 1, 'b c': -2)").unwrap(),
                   SymbolicNode::factor("c", [("a", 1.0), ("b c", -2.0)]));
        assert_eq!(parse("binfactor(c, a, 3)").unwrap(), SymbolicNode::binary_factor("c", "a", 3.0));
        assert!(matches!(parse("lag(x, 1.5)"), Err(ParseError::InvalidArgument { .. })));
    }

    #[test]
    fn window_forms() {
        let tree = parse("subvector(v, 0.2, 0.6, true)").unwrap();
        assert_eq!(tree.params,
                   NodeParams::Window(crate::tree::WindowParams { start:      0.2,
                                                                  end:        0.6,
                                                                  round_trip: true, }));
        let tree = parse("subvector_expr(v, x, 1)").unwrap();
        assert_eq!(tree.symbol, Symbol::SubVectorSubtree);
        assert_eq!(tree.children.len(), 3);
    }

    #[test]
    fn programs() {
        let tree = parse("program(invoke(f, x, 2), defun(f, arg(0) * arg(1)))").unwrap();
        assert_eq!(tree.symbol, Symbol::ProgramRoot);
        assert_eq!(tree.body().symbol, Symbol::InvokeFunction);
        assert_eq!(tree.children[1].function_name(), Some("f"));
        assert!(matches!(parse("program(x, y)"), Err(ParseError::InvalidArgument { .. })));
    }
}
