use crate::{
    simplifier::{
        shape::shares_length,
        terms::{TermKey, is_weighted, multiply_weights, nary, scale_weights},
    },
    tree::{Symbol, SymbolicNode},
};

/// Rewrites a `Multiplication` or `Division` whose operands are already
/// simplified.
///
/// Division becomes multiplication by inverted operands, each inverted
/// operand wrapped in a one-child `Division`. Nested products are flattened
/// and numeric literals multiply into one coefficient. Factors and binary
/// factors over the same category merge by multiplying their weights.
///
/// The coefficient then scales the weight of the first weighted terminal, or
/// stays as a trailing literal (omitted when `1`) without such a terminal. A
/// coefficient of `0` is placed the same way, so the product stays undefined
/// wherever its data is.
///
/// Repeated factors such as `x * x` are kept as a product. Products of
/// vectors that may differ in length are left as they are, since moving the
/// coefficient past a padded or cycled vector changes the padded elements.
#[must_use]
pub fn simplify(node: SymbolicNode) -> SymbolicNode {
    merge(&node).unwrap_or(node)
}

fn merge(node: &SymbolicNode) -> Option<SymbolicNode> {
    let mut factors: Vec<SymbolicNode> = Vec::new();
    let mut coefficient = 1.0;

    let signed = signed_factors(node);
    if !shares_length(signed.iter().map(|(factor, _)| factor)) {
        return None;
    }
    for (factor, inverted) in signed {
        if let Some(value) = factor.literal_value() {
            coefficient *= if inverted { 1.0 / value } else { value };
            continue;
        }
        if inverted {
            factors.push(SymbolicNode::unary(Symbol::Division, factor));
            continue;
        }
        if let Some(key @ (TermKey::Factor { .. } | TermKey::BinaryFactor { .. })) = TermKey::of(&factor)
           && let Some(existing) = factors.iter_mut()
                                          .find(|f| TermKey::of(f) == Some(key))
        {
            if !multiply_weights(existing, &factor) {
                return None;
            }
            continue;
        }
        factors.push(factor);
    }

    if !coefficient.is_finite() {
        return None;
    }
    if coefficient != 1.0 {
        let absorbed = factors.iter_mut()
                              .find(|f| is_weighted(f))
                              .is_some_and(|f| scale_weights(f, coefficient));
        if !absorbed {
            factors.push(SymbolicNode::number(coefficient));
        }
    }

    Some(match factors.len() {
        0 => SymbolicNode::number(coefficient),
        1 => factors.remove(0),
        _ => nary(Symbol::Multiplication, factors),
    })
}

/// Operands of the product paired with whether they divide, with nested
/// multiplications spliced in.
fn signed_factors(node: &SymbolicNode) -> Vec<(SymbolicNode, bool)> {
    let divides = node.symbol == Symbol::Division;
    let single = node.children.len() == 1;
    let mut factors = Vec::with_capacity(node.children.len());

    for (i, child) in node.children.iter().enumerate() {
        let inverted = divides && (single || i > 0);
        if child.symbol == Symbol::Multiplication && !inverted {
            factors.extend(child.children.iter().map(|f| (f.clone(), false)));
        } else {
            factors.push((child.clone(), inverted));
        }
    }
    factors
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn x() -> SymbolicNode {
        SymbolicNode::variable("x", 1.0)
    }

    #[test]
    fn coefficients_fold_into_weights() {
        let tree = SymbolicNode::new(Symbol::Multiplication,
                                     vec![SymbolicNode::number(2.0), x(), SymbolicNode::number(3.0)]);
        assert_eq!(simplify(tree), SymbolicNode::variable("x", 6.0));
    }

    #[test]
    fn zero_keeps_the_data_it_multiplies() {
        let tree = SymbolicNode::binary(Symbol::Multiplication, x(), SymbolicNode::number(0.0));
        assert_eq!(simplify(tree), SymbolicNode::variable("x", 0.0));

        let v = SymbolicNode::vector_variable("v", 1.0);
        let tree = SymbolicNode::binary(Symbol::Multiplication, v, SymbolicNode::number(0.0));
        assert_eq!(simplify(tree), SymbolicNode::vector_variable("v", 0.0));

        let log = SymbolicNode::unary(Symbol::Logarithm, x());
        let tree = SymbolicNode::binary(Symbol::Multiplication, log.clone(), SymbolicNode::number(0.0));
        assert_eq!(simplify(tree),
                   SymbolicNode::binary(Symbol::Multiplication, log, SymbolicNode::number(0.0)));
    }

    #[test]
    fn division_inverts_operands() {
        let y = SymbolicNode::variable("y", 1.0);
        let tree = SymbolicNode::new(Symbol::Division,
                                     vec![x(), y.clone(), SymbolicNode::number(4.0)]);
        assert_eq!(simplify(tree),
                   SymbolicNode::binary(Symbol::Multiplication,
                                        SymbolicNode::variable("x", 0.25),
                                        SymbolicNode::unary(Symbol::Division, y)));
    }

    #[test]
    fn coefficient_stays_outside_vectors_of_different_lengths() {
        let tree = SymbolicNode::new(Symbol::Multiplication,
                                     vec![SymbolicNode::vector_variable("w", 1.0),
                                          SymbolicNode::vector_variable("v", 1.0),
                                          SymbolicNode::number(2.0)]);
        assert_eq!(simplify(tree.clone()), tree);

        let v = SymbolicNode::vector_variable("v", 1.0);
        let tree = SymbolicNode::new(Symbol::Multiplication,
                                     vec![v.clone(),
                                          SymbolicNode::unary(Symbol::Sine, v),
                                          SymbolicNode::number(2.0)]);
        assert_eq!(simplify(tree),
                   SymbolicNode::binary(Symbol::Multiplication,
                                        SymbolicNode::vector_variable("v", 2.0),
                                        SymbolicNode::unary(Symbol::Sine, SymbolicNode::vector_variable("v", 1.0))));
    }

    #[test]
    fn division_by_literal_zero_is_kept() {
        let tree = SymbolicNode::binary(Symbol::Division, x(), SymbolicNode::number(0.0));
        assert_eq!(simplify(tree.clone()), tree);
    }

    #[test]
    fn repeated_variables_stay_a_product() {
        let tree = SymbolicNode::binary(Symbol::Multiplication, x(), x());
        assert_eq!(simplify(tree.clone()), tree);
    }

    #[test]
    fn binary_factors_multiply() {
        let tree = SymbolicNode::binary(Symbol::Multiplication,
                                        SymbolicNode::binary_factor("c", "a", 2.0),
                                        SymbolicNode::binary_factor("c", "a", 3.0));
        assert_eq!(simplify(tree), SymbolicNode::binary_factor("c", "a", 6.0));
    }
}
