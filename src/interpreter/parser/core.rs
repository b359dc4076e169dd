use std::{collections::BTreeSet, iter::Peekable};

use crate::{
    error::{ParseError, ParseResult},
    interpreter::{
        lexer::{Token, tokenize},
        parser::binary::parse_additive,
    },
    tree::{DataType, SymbolicNode},
};

/// Settings of the formula parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Names of variables bound to vector-valued columns.
    pub vector_variables: BTreeSet<String>,
}

impl ParserConfig {
    /// A configuration declaring `names` as vector variables.
    #[must_use]
    pub fn with_vector_variables<I, S>(names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { vector_variables: names.into_iter().map(Into::into).collect() }
    }

    /// The declared shape of variable `name`.
    #[must_use]
    pub fn data_type(&self, name: &str) -> DataType {
        if self.vector_variables.contains(name) {
            DataType::Vector
        } else {
            DataType::Scalar
        }
    }
}

/// Parses formula text into a tree.
///
/// The grammar, from lowest to highest precedence:
///
/// ```text
/// formula        := additive
/// additive       := multiplicative (("+" | "-") multiplicative)*
/// multiplicative := exponent (("*" | "/") exponent)*
/// exponent       := unary ("^" exponent)?
/// unary          := "-" unary | primary
/// primary        := number | name | call | "(" additive ")"
/// call           := identifier "(" arguments ")"
/// ```
///
/// # Errors
/// Any [`ParseError`]; trailing input after a complete formula is an
/// `UnexpectedToken`.
///
/// # Example
/// ```
/// use symvec::{
///     interpreter::parser::core::{ParserConfig, parse_formula},
///     tree::Symbol,
/// };
///
/// let tree = parse_formula("mean(v) * 2 + x", &ParserConfig::with_vector_variables(["v"])).unwrap();
/// assert_eq!(tree.symbol, Symbol::Addition);
/// assert_eq!(tree.children[0].symbol, Symbol::Multiplication);
/// ```
pub fn parse_formula(source: &str, config: &ParserConfig) -> ParseResult<SymbolicNode> {
    let tokens = tokenize(source)?;
    let mut iter = tokens.iter().peekable();
    let tree = parse_expression(&mut iter, config)?;
    if let Some((token, position)) = iter.next() {
        return Err(ParseError::UnexpectedToken { token:    format!("{token:?}"),
                                                 position: *position, });
    }
    Ok(tree)
}

/// Parses a full expression.
///
/// Grammar: `expression := additive`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>,
                               config: &ParserConfig)
                               -> ParseResult<SymbolicNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_additive(tokens, config)
}
