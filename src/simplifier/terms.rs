use std::{collections::BTreeMap, iter};

use crate::tree::{DataType, NodeParams, Symbol, SymbolicNode, symbol::MAX_CHILDREN};

/// Identity of a data-bound terminal for merging.
///
/// Two terminals with equal keys read the same data on every row, so their
/// weights can be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKey<'a> {
    /// A plain or lagged variable.
    Variable {
        /// `Variable` or `LaggedVariable`.
        symbol:    Symbol,
        /// Column name.
        name:      &'a str,
        /// Row offset.
        lag:       i64,
        /// Declared shape.
        data_type: DataType,
    },
    /// A factor over a categorical column.
    Factor {
        /// Column name.
        name: &'a str,
    },
    /// An indicator of one category.
    BinaryFactor {
        /// Column name.
        name:  &'a str,
        /// The category.
        value: &'a str,
    },
}

impl<'a> TermKey<'a> {
    /// The key of a weighted terminal, `None` for any other node.
    #[must_use]
    pub fn of(node: &'a SymbolicNode) -> Option<Self> {
        match &node.params {
            NodeParams::Variable(p) => Some(Self::Variable { symbol:    node.symbol,
                                                             name:      &p.name,
                                                             lag:       p.lag,
                                                             data_type: p.data_type, }),
            NodeParams::Factor(p) => Some(Self::Factor { name: &p.name }),
            NodeParams::BinaryFactor(p) => Some(Self::BinaryFactor { name:  &p.name,
                                                                     value: &p.value, }),
            _ => None,
        }
    }
}

/// Adds the weights of `other` to `target`; both must share a [`TermKey`].
///
/// Factor tables are added per category, a missing category counting as `0`.
///
/// # Returns
/// `false`, leaving `target` untouched, if a weight would stop being finite.
pub fn add_weights(target: &mut SymbolicNode, other: &SymbolicNode) -> bool {
    match (&mut target.params, &other.params) {
        (NodeParams::Variable(a), NodeParams::Variable(b)) => {
            set_finite(&mut a.weight, |w| w + b.weight)
        },
        (NodeParams::BinaryFactor(a), NodeParams::BinaryFactor(b)) => {
            set_finite(&mut a.weight, |w| w + b.weight)
        },
        (NodeParams::Factor(a), NodeParams::Factor(b)) => {
            let mut merged = a.weights.clone();
            for (category, weight) in &b.weights {
                *merged.entry(category.clone()).or_insert(0.0) += weight;
            }
            if merged.values().all(|w| w.is_finite()) {
                a.weights = merged;
                true
            } else {
                false
            }
        },
        _ => false,
    }
}

/// Multiplies the weights of `other` into `target`; both must share a
/// [`TermKey`] of a factor kind.
///
/// Factor tables keep only the categories both list, since any other
/// category weighs `0` in one of them.
pub fn multiply_weights(target: &mut SymbolicNode, other: &SymbolicNode) -> bool {
    match (&mut target.params, &other.params) {
        (NodeParams::BinaryFactor(a), NodeParams::BinaryFactor(b)) => {
            set_finite(&mut a.weight, |w| w * b.weight)
        },
        (NodeParams::Factor(a), NodeParams::Factor(b)) => {
            let merged: BTreeMap<_, _> =
                a.weights
                 .iter()
                 .filter_map(|(category, w)| b.weights.get(category).map(|v| (category.clone(), w * v)))
                 .collect();
            if merged.values().all(|w| w.is_finite()) {
                a.weights = merged;
                true
            } else {
                false
            }
        },
        _ => false,
    }
}

/// Tests whether `node` is a weighted terminal.
#[must_use]
pub const fn is_weighted(node: &SymbolicNode) -> bool {
    matches!(node.params,
             NodeParams::Variable(_) | NodeParams::Factor(_) | NodeParams::BinaryFactor(_))
}

/// Multiplies every weight of a weighted terminal by `factor`.
///
/// # Returns
/// `false`, leaving `node` untouched, if `node` is no weighted terminal or a
/// weight would stop being finite.
pub fn scale_weights(node: &mut SymbolicNode, factor: f64) -> bool {
    match &mut node.params {
        NodeParams::Variable(p) => set_finite(&mut p.weight, |w| w * factor),
        NodeParams::BinaryFactor(p) => set_finite(&mut p.weight, |w| w * factor),
        NodeParams::Factor(p) => {
            if p.weights.values().all(|w| (w * factor).is_finite()) {
                p.weights.values_mut().for_each(|w| *w *= factor);
                true
            } else {
                false
            }
        },
        _ => false,
    }
}

/// Negates a term.
///
/// Literals and weighted terminals negate in place; a product with a
/// trailing literal negates that literal; anything else is multiplied by
/// `-1`.
#[must_use]
pub fn negate(mut term: SymbolicNode) -> SymbolicNode {
    match &mut term.params {
        NodeParams::Number(v) => *v = -*v,
        NodeParams::Variable(p) => p.weight = -p.weight,
        NodeParams::BinaryFactor(p) => p.weight = -p.weight,
        NodeParams::Factor(p) => p.weights.values_mut().for_each(|w| *w = -*w),
        _ => return negate_compound(term),
    }
    term
}

fn negate_compound(mut term: SymbolicNode) -> SymbolicNode {
    if term.symbol == Symbol::Multiplication
       && let Some(coefficient) = term.children.last().and_then(SymbolicNode::literal_value)
    {
        term.children.pop();
        if coefficient != -1.0 {
            term.children.push(SymbolicNode::number(-coefficient));
        }
        if term.children.len() == 1 {
            return term.children.remove(0);
        }
        return term;
    }
    SymbolicNode::binary(Symbol::Multiplication, term, SymbolicNode::number(-1.0))
}

/// Builds an n-ary node, nesting the leading operands while there are more
/// than a node can hold.
#[must_use]
pub fn nary(symbol: Symbol, mut operands: Vec<SymbolicNode>) -> SymbolicNode {
    while operands.len() > MAX_CHILDREN {
        let rest = operands.split_off(MAX_CHILDREN);
        let head = SymbolicNode::new(symbol, operands);
        operands = iter::once(head).chain(rest).collect();
    }
    SymbolicNode::new(symbol, operands)
}

fn set_finite<F>(weight: &mut f64, f: F) -> bool
    where F: FnOnce(f64) -> f64
{
    let value = f(*weight);
    if value.is_finite() {
        *weight = value;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_distinguish_lags() {
        let x = SymbolicNode::variable("x", 2.0);
        let lagged = SymbolicNode::lagged_variable("x", 2.0, -1);
        assert_ne!(TermKey::of(&x), TermKey::of(&lagged));
        assert_eq!(TermKey::of(&x), TermKey::of(&SymbolicNode::variable("x", 7.0)));
        assert_eq!(TermKey::of(&SymbolicNode::number(1.0)), None);
    }

    #[test]
    fn factor_tables_add_per_category() {
        let mut a = SymbolicNode::factor("c", [("p", 1.0), ("q", 2.0)]);
        let b = SymbolicNode::factor("c", [("q", 3.0), ("r", 4.0)]);
        assert!(add_weights(&mut a, &b));
        assert_eq!(a, SymbolicNode::factor("c", [("p", 1.0), ("q", 5.0), ("r", 4.0)]));
    }

    #[test]
    fn factor_tables_multiply_on_shared_categories() {
        let mut a = SymbolicNode::factor("c", [("p", 2.0), ("q", 3.0)]);
        let b = SymbolicNode::factor("c", [("q", 4.0), ("r", 5.0)]);
        assert!(multiply_weights(&mut a, &b));
        assert_eq!(a, SymbolicNode::factor("c", [("q", 12.0)]));
    }

    #[test]
    fn negation_cancels_trailing_minus_one() {
        let sum = SymbolicNode::new(Symbol::Addition,
                                    vec![SymbolicNode::variable("x", 1.0),
                                         SymbolicNode::unary(Symbol::Sine, SymbolicNode::variable("y", 1.0))]);
        let negated = negate(sum.clone());
        assert_eq!(negated,
                   SymbolicNode::binary(Symbol::Multiplication, sum.clone(), SymbolicNode::number(-1.0)));
        assert_eq!(negate(negated), sum);
    }

    #[test]
    fn long_operand_lists_nest() {
        let operands = vec![SymbolicNode::number(1.0); MAX_CHILDREN + 2];
        let node = nary(Symbol::Addition, operands);
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.children[0].children.len(), MAX_CHILDREN);
        assert!(node.validate().is_ok());
    }
}
