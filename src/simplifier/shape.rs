use crate::tree::{DataType, Symbol, SymbolicNode};

/// Tests whether `node` may evaluate to a vector.
///
/// Variables follow their declared `data_type`; scalar-valued symbols
/// (literals, factors, aggregations, comparisons and time-series features)
/// never produce vectors; everything else is a vector as soon as one operand
/// may be one. Function placeholders are assumed to be vectors.
///
/// # Example
/// ```
/// use symvec::{
///     simplifier::shape::may_be_vector,
///     tree::{Symbol, SymbolicNode},
/// };
///
/// let v = SymbolicNode::vector_variable("v", 1.0);
/// let x = SymbolicNode::variable("x", 1.0);
/// assert!(may_be_vector(&SymbolicNode::binary(Symbol::Addition, x.clone(), v.clone())));
/// assert!(!may_be_vector(&SymbolicNode::unary(Symbol::Mean, v)));
/// assert!(!may_be_vector(&x));
/// ```
#[must_use]
pub fn may_be_vector(node: &SymbolicNode) -> bool {
    match node.symbol {
        symbol if symbol.is_scalar_valued() => false,
        Symbol::Variable | Symbol::LaggedVariable => {
            node.variable_params()
                .is_some_and(|p| p.data_type == DataType::Vector)
        },
        Symbol::InvokeFunction | Symbol::Argument | Symbol::Defun => true,
        _ => node.children.iter().any(may_be_vector),
    }
}

/// Tests whether `node` evaluates to a finite value on every row.
///
/// Only finite literals qualify. Data-bound terminals are undefined on rows
/// past the end of a shorter column, on non-finite cells and, for lagged
/// variables, on rows shifted outside the column. Rewrites that would drop a
/// subtree therefore keep it as a zero-weighted terminal instead, which is `0`
/// exactly where the data is defined.
#[must_use]
pub fn is_total(node: &SymbolicNode) -> bool {
    match node.symbol {
        Symbol::Number | Symbol::Constant => node.literal_value().is_some_and(f64::is_finite),
        _ => false,
    }
}

/// The vector column, with its row offset, that every vector-valued part of
/// `node` is read from.
///
/// Elementwise operations keep the length of their vector operands, so two
/// nodes with the same source always evaluate to vectors of equal length.
/// Windows change the length and have no source.
#[must_use]
pub fn vector_source(node: &SymbolicNode) -> Option<(&str, i64)> {
    match node.symbol {
        Symbol::Variable | Symbol::LaggedVariable => {
            node.variable_params()
                .filter(|p| p.data_type == DataType::Vector)
                .map(|p| (p.name.as_str(), p.lag))
        },
        Symbol::SubVector | Symbol::SubVectorSubtree => None,
        symbol if symbol.is_elementwise()
                  || matches!(symbol,
                              Symbol::Addition
                              | Symbol::Subtraction
                              | Symbol::Multiplication
                              | Symbol::Division
                              | Symbol::Power
                              | Symbol::Root
                              | Symbol::AnalyticQuotient) =>
        {
            common_source(node.children.iter().filter(|c| may_be_vector(c)))
        },
        _ => None,
    }
}

fn common_source<'a, I>(mut nodes: I) -> Option<(&'a str, i64)>
    where I: Iterator<Item = &'a SymbolicNode>
{
    let first = vector_source(nodes.next()?)?;
    nodes.all(|n| vector_source(n) == Some(first)).then_some(first)
}

/// Tests whether the vector-valued operands among `operands` always have
/// equal lengths, so that reordering or regrouping them never involves the
/// length reconciliation strategy.
///
/// # Example
/// ```
/// use symvec::{
///     simplifier::shape::shares_length,
///     tree::{Symbol, SymbolicNode},
/// };
///
/// let v = SymbolicNode::vector_variable("v", 1.0);
/// let w = SymbolicNode::vector_variable("w", 1.0);
/// let x = SymbolicNode::variable("x", 1.0);
/// assert!(shares_length(&[v.clone(), x.clone(), SymbolicNode::unary(Symbol::Sine, v.clone())]));
/// assert!(!shares_length(&[v, x, w]));
/// ```
#[must_use]
pub fn shares_length<'a, I>(operands: I) -> bool
    where I: IntoIterator<Item = &'a SymbolicNode>
{
    let vectors: Vec<_> = operands.into_iter().filter(|o| may_be_vector(o)).collect();
    vectors.len() <= 1 || common_source(vectors.into_iter()).is_some()
}

/// Tests whether `node` is provably never negative.
#[must_use]
pub fn is_non_negative(node: &SymbolicNode) -> bool {
    match node.symbol {
        Symbol::Number | Symbol::Constant => node.literal_value().is_some_and(|v| v >= 0.0),
        Symbol::Absolute | Symbol::Square | Symbol::SquareRoot | Symbol::Exponential => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeParams;

    #[test]
    fn windows_follow_their_operand() {
        let v = SymbolicNode::vector_variable("v", 1.0);
        let x = SymbolicNode::variable("x", 1.0);
        assert!(may_be_vector(&SymbolicNode::sub_vector(v, 0.0, 0.5, false)));
        assert!(!may_be_vector(&SymbolicNode::sub_vector(x, 0.0, 0.5, false)));
    }

    #[test]
    fn only_literals_are_total() {
        assert!(is_total(&SymbolicNode::number(2.0)));
        assert!(!is_total(&SymbolicNode::variable("x", 2.0)));
        assert!(!is_total(&SymbolicNode::lagged_variable("x", 1.0, -1)));
        assert!(!is_total(&SymbolicNode::factor("c", [("a", 1.0)])));
        assert!(!is_total(&SymbolicNode::unary(Symbol::Logarithm, SymbolicNode::number(2.0))));
    }

    #[test]
    fn vector_sources() {
        let v = SymbolicNode::vector_variable("v", 2.0);
        let x = SymbolicNode::variable("x", 1.0);
        let shifted = SymbolicNode::binary(Symbol::Addition, SymbolicNode::unary(Symbol::Sine, v.clone()), x);
        assert_eq!(vector_source(&shifted), Some(("v", 0)));

        let window = SymbolicNode::sub_vector(v.clone(), 0.0, 0.5, false);
        assert_eq!(vector_source(&window), None);
        assert!(!shares_length(&[v.clone(), window]));

        let mut lagged = v.clone();
        if let NodeParams::Variable(p) = &mut lagged.params {
            p.lag = -1;
        }
        lagged.symbol = Symbol::LaggedVariable;
        assert!(!shares_length(&[v.clone(), lagged]));
        assert!(shares_length(&[v.clone(), v]));
    }

    #[test]
    fn non_negative_forms() {
        let x = SymbolicNode::variable("x", 1.0);
        assert!(is_non_negative(&SymbolicNode::unary(Symbol::Square, x.clone())));
        assert!(is_non_negative(&SymbolicNode::number(0.0)));
        assert!(!is_non_negative(&x));
    }
}
