use crate::{
    simplifier::shape::is_non_negative,
    tree::{Symbol, SymbolicNode},
    util::num::round_even,
};

/// Rewrites `Power` and `Root` with a literal exponent.
///
/// The exponent is rounded half to even first, as evaluation does:
/// - `x ^ 1` and `root(x, 1)` become `x`;
/// - `x ^ -1` and `root(x, -1)` become `1 / x`.
///
/// `x ^ 0` is kept: it is undefined wherever `x` is.
///
/// # Example
/// ```
/// use symvec::{
///     simplifier::functions::power,
///     tree::{Symbol, SymbolicNode},
/// };
///
/// let x = SymbolicNode::variable("x", 1.0);
/// let tree = SymbolicNode::binary(Symbol::Power, x.clone(), SymbolicNode::number(0.8));
/// assert_eq!(power(tree), x);
/// ```
#[must_use]
pub fn power(mut node: SymbolicNode) -> SymbolicNode {
    let Some(exponent) = node.children.get(1).and_then(SymbolicNode::literal_value) else {
        return node;
    };
    let exponent = round_even(exponent);

    if exponent == 1.0 {
        node.children.swap_remove(0)
    } else if exponent == -1.0 {
        SymbolicNode::unary(Symbol::Division, node.children.swap_remove(0))
    } else {
        node
    }
}

/// Rewrites an elementwise function applied to its inverse or to a value
/// whose sign is known.
///
/// - `sqrt(sqr(x))` becomes `abs(x)`, or `x` when `x` is never negative;
/// - `log(exp(x))` and `cube(cbrt(x))` become `x`;
/// - `abs(x)` becomes `x` when `x` is never negative.
///
/// `exp(log(x))` is left alone; it is undefined for `x <= 0`.
#[must_use]
pub fn elementwise(mut node: SymbolicNode) -> SymbolicNode {
    let Some(child) = node.children.first() else {
        return node;
    };
    let inverse = matches!((node.symbol, child.symbol),
                           (Symbol::SquareRoot, Symbol::Square)
                           | (Symbol::Logarithm, Symbol::Exponential)
                           | (Symbol::Cube, Symbol::CubeRoot));

    if node.symbol == Symbol::Absolute && is_non_negative(child) {
        return node.children.swap_remove(0);
    }
    if !inverse {
        return node;
    }

    let mut child = node.children.swap_remove(0);
    let inner = child.children.swap_remove(0);
    if node.symbol == Symbol::SquareRoot && !is_non_negative(&inner) {
        SymbolicNode::unary(Symbol::Absolute, inner)
    } else {
        inner
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn x() -> SymbolicNode {
        SymbolicNode::variable("x", 1.0)
    }

    #[test]
    fn square_root_of_square_is_absolute() {
        let tree = SymbolicNode::unary(Symbol::SquareRoot, SymbolicNode::unary(Symbol::Square, x()));
        assert_eq!(elementwise(tree), SymbolicNode::unary(Symbol::Absolute, x()));

        let positive = SymbolicNode::unary(Symbol::Exponential, x());
        let tree = SymbolicNode::unary(Symbol::SquareRoot,
                                       SymbolicNode::unary(Symbol::Square, positive.clone()));
        assert_eq!(elementwise(tree), positive);
    }

    #[test]
    fn inverse_pairs_cancel() {
        let tree = SymbolicNode::unary(Symbol::Logarithm, SymbolicNode::unary(Symbol::Exponential, x()));
        assert_eq!(elementwise(tree), x());
        let tree = SymbolicNode::unary(Symbol::Cube, SymbolicNode::unary(Symbol::CubeRoot, x()));
        assert_eq!(elementwise(tree), x());
    }

    #[test]
    fn exp_of_log_is_kept() {
        let tree = SymbolicNode::unary(Symbol::Exponential, SymbolicNode::unary(Symbol::Logarithm, x()));
        assert_eq!(elementwise(tree.clone()), tree);
    }

    #[test]
    fn power_identities() {
        let pow = |e: f64| SymbolicNode::binary(Symbol::Power, x(), SymbolicNode::number(e));
        assert_eq!(power(pow(1.0)), x());
        assert_eq!(power(pow(-1.0)), SymbolicNode::unary(Symbol::Division, x()));
        assert_eq!(power(pow(0.0)), pow(0.0));
        assert_eq!(power(pow(3.0)), pow(3.0));
    }
}
