use crate::{
    simplifier::{
        shape::{is_total, may_be_vector, shares_length},
        terms::{is_weighted, scale_weights},
    },
    tree::{Symbol, SymbolicNode},
};

/// Rewrites an aggregation whose operands are already simplified.
///
/// A scalar operand follows the evaluator's scalar rules: `mean`, `median`,
/// `sum`, `min`, `max` and a valid `quantile` return it. `std` and `var`
/// become `0` for a literal and the operand weighted by `0` for a weighted
/// terminal, which stays undefined wherever its data is.
///
/// An operand that splits into a vector part `V` and a scalar part `S` is
/// distributed:
///
/// | operand | rewrite |
/// |---------|---------|
/// | `V + S` | `mean`, `median`, `min`, `max`, `quantile`: `agg(V) + S`; `sum`: `sum(V) + S * length(V)`; `std`, `var`, `skewness`, `kurtosis`, `length`: `agg(V)` |
/// | `V * S` | `mean`, `median`, `sum`: `S * agg(V)`; `var`: `sqr(S) * var(V)`; `std`: `abs(S) * std(V)`; `length`: `length(V)`; `min`, `max` with a literal `S`: `S * min(V)` or `S * max(V)`, swapped for negative `S` |
///
/// Rewrites that drop `S` need every part of `S` to be a literal. Vector
/// parts must have equal lengths, so that no length strategy sees where `S`
/// sat among them.
///
/// # Example
/// ```
/// use symvec::{
///     simplifier::aggregation::simplify,
///     tree::{Symbol, SymbolicNode},
/// };
///
/// let v = SymbolicNode::vector_variable("v", 1.0);
/// let x = SymbolicNode::variable("x", 1.0);
/// let tree = SymbolicNode::unary(Symbol::Mean,
///                                SymbolicNode::binary(Symbol::Multiplication, v.clone(), x.clone()));
/// assert_eq!(simplify(tree),
///            SymbolicNode::binary(Symbol::Multiplication, x, SymbolicNode::unary(Symbol::Mean, v)));
/// ```
#[must_use]
pub fn simplify(node: SymbolicNode) -> SymbolicNode {
    let Some(operand) = node.children.first() else {
        return node;
    };
    let operand_symbol = operand.symbol;
    if !may_be_vector(operand) {
        return scalar_rule(node);
    }
    match operand_symbol {
        Symbol::Addition => distribute_over_sum(node),
        Symbol::Multiplication => distribute_over_product(node),
        _ => node,
    }
}

fn scalar_rule(mut node: SymbolicNode) -> SymbolicNode {
    let valid_level = node.children
                          .get(1)
                          .and_then(SymbolicNode::literal_value)
                          .is_some_and(|q| (0.0..=1.0).contains(&q));
    match node.symbol {
        Symbol::Mean | Symbol::Median | Symbol::Sum | Symbol::Minimum | Symbol::Maximum => {
            node.children.swap_remove(0)
        },
        Symbol::Quantile if valid_level => node.children.swap_remove(0),
        Symbol::StandardDeviation | Symbol::Variance => zero_where_defined(node),
        _ => node,
    }
}

fn zero_where_defined(mut node: SymbolicNode) -> SymbolicNode {
    let operand = &mut node.children[0];
    if is_total(operand) {
        return SymbolicNode::number(0.0);
    }
    if is_weighted(operand) && scale_weights(operand, 0.0) {
        return node.children.swap_remove(0);
    }
    node
}

/// Splits the operands of a sum or product into vector and scalar parts.
///
/// `None` unless both parts are present.
fn split(operand: &SymbolicNode) -> Option<(SymbolicNode, Vec<SymbolicNode>)> {
    let (vector, scalar): (Vec<_>, Vec<_>) = operand.children
                                                    .iter()
                                                    .cloned()
                                                    .partition(may_be_vector);
    if vector.is_empty() || scalar.is_empty() || !shares_length(&vector) {
        return None;
    }
    let vector = if vector.len() == 1 {
        vector.into_iter().next()?
    } else {
        SymbolicNode::new(operand.symbol, vector)
    };
    Some((vector, scalar))
}

fn join(symbol: Symbol, mut parts: Vec<SymbolicNode>) -> SymbolicNode {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        SymbolicNode::new(symbol, parts)
    }
}

/// `agg(V)`, keeping any further operands such as the quantile level.
fn aggregate(node: &SymbolicNode, symbol: Symbol, vector: SymbolicNode) -> SymbolicNode {
    let mut children = vec![vector];
    children.extend(node.children.iter().skip(1).cloned());
    SymbolicNode::new(symbol, children)
}

fn distribute_over_sum(node: SymbolicNode) -> SymbolicNode {
    let Some((vector, scalar)) = split(&node.children[0]) else {
        return node;
    };
    let symbol = node.symbol;
    match symbol {
        Symbol::Mean | Symbol::Median | Symbol::Minimum | Symbol::Maximum | Symbol::Quantile => {
            let mut terms = vec![aggregate(&node, symbol, vector)];
            terms.extend(scalar);
            SymbolicNode::new(Symbol::Addition, terms)
        },
        Symbol::Sum => {
            let length = SymbolicNode::unary(Symbol::Length, vector.clone());
            let offset = SymbolicNode::binary(Symbol::Multiplication,
                                              join(Symbol::Addition, scalar),
                                              length);
            SymbolicNode::binary(Symbol::Addition, SymbolicNode::unary(Symbol::Sum, vector), offset)
        },
        Symbol::StandardDeviation
        | Symbol::Variance
        | Symbol::Skewness
        | Symbol::Kurtosis
        | Symbol::Length
            if scalar.iter().all(is_total) =>
        {
            SymbolicNode::unary(symbol, vector)
        },
        _ => node,
    }
}

fn distribute_over_product(node: SymbolicNode) -> SymbolicNode {
    let Some((vector, scalar)) = split(&node.children[0]) else {
        return node;
    };
    let symbol = node.symbol;
    let scaled = |factor: SymbolicNode, aggregate: SymbolicNode| {
        SymbolicNode::binary(Symbol::Multiplication, factor, aggregate)
    };
    match symbol {
        Symbol::Mean | Symbol::Median | Symbol::Sum => {
            let mut factors = scalar;
            factors.push(SymbolicNode::unary(symbol, vector));
            SymbolicNode::new(Symbol::Multiplication, factors)
        },
        Symbol::Variance => {
            scaled(SymbolicNode::unary(Symbol::Square, join(Symbol::Multiplication, scalar)),
                   SymbolicNode::unary(Symbol::Variance, vector))
        },
        Symbol::StandardDeviation => {
            scaled(SymbolicNode::unary(Symbol::Absolute, join(Symbol::Multiplication, scalar)),
                   SymbolicNode::unary(Symbol::StandardDeviation, vector))
        },
        Symbol::Length if scalar.iter().all(is_total) => SymbolicNode::unary(Symbol::Length, vector),
        Symbol::Minimum | Symbol::Maximum => {
            let coefficient = match scalar.as_slice() {
                [single] => single.literal_value().filter(|c| *c != 0.0),
                _ => None,
            };
            let Some(coefficient) = coefficient else {
                return node;
            };
            let target = match (symbol, coefficient > 0.0) {
                (Symbol::Minimum, true) | (Symbol::Maximum, false) => Symbol::Minimum,
                _ => Symbol::Maximum,
            };
            scaled(SymbolicNode::unary(target, vector), SymbolicNode::number(coefficient))
        },
        _ => node,
    }
}
