use crate::{
    simplifier::{
        shape::shares_length,
        terms::{TermKey, add_weights, nary, negate},
    },
    tree::{Symbol, SymbolicNode},
};

/// Rewrites an `Addition` or `Subtraction` whose operands are already
/// simplified.
///
/// Subtraction becomes addition of negated terms and nested sums are
/// flattened. Terminals with the same [`TermKey`] merge into one by adding
/// their weights and all numeric literals merge into one trailing literal
/// (omitted when `0`). A terminal that ends up weighing `0` is kept, since it
/// is still undefined wherever its data is.
///
/// The node is returned unchanged if a merged weight or the literal sum
/// would not be finite, or if it adds vectors that may differ in length:
/// their order then decides how the length strategy pads, cycles or
/// resamples them.
///
/// # Example
/// ```
/// use symvec::{
///     simplifier::sum::simplify,
///     tree::{Symbol, SymbolicNode},
/// };
///
/// // 2x - (3 + 3x) + 1
/// let tree = SymbolicNode::new(Symbol::Subtraction,
///                              vec![SymbolicNode::variable("x", 2.0),
///                                   SymbolicNode::binary(Symbol::Addition,
///                                                        SymbolicNode::number(3.0),
///                                                        SymbolicNode::variable("x", 3.0)),
///                                   SymbolicNode::number(-1.0)]);
/// assert_eq!(simplify(tree),
///            SymbolicNode::binary(Symbol::Addition,
///                                 SymbolicNode::variable("x", -1.0),
///                                 SymbolicNode::number(-2.0)));
/// ```
#[must_use]
pub fn simplify(node: SymbolicNode) -> SymbolicNode {
    merge(&node).unwrap_or(node)
}

fn merge(node: &SymbolicNode) -> Option<SymbolicNode> {
    let mut terms: Vec<SymbolicNode> = Vec::new();
    let mut constant = 0.0;

    let signed = signed_terms(node);
    if !shares_length(&signed) {
        return None;
    }
    for term in signed {
        if let Some(value) = term.literal_value() {
            constant += value;
            continue;
        }
        if let Some(key) = TermKey::of(&term)
           && let Some(existing) = terms.iter_mut()
                                        .find(|t| TermKey::of(t) == Some(key))
        {
            if !add_weights(existing, &term) {
                return None;
            }
            continue;
        }
        terms.push(term);
    }

    if !constant.is_finite() {
        return None;
    }
    if constant != 0.0 || terms.is_empty() {
        terms.push(SymbolicNode::number(constant));
    }

    Some(if terms.len() == 1 {
             terms.remove(0)
         } else {
             nary(Symbol::Addition, terms)
         })
}

/// Operands of the sum with subtracted ones negated and nested additions
/// spliced in.
fn signed_terms(node: &SymbolicNode) -> Vec<SymbolicNode> {
    let subtracts = node.symbol == Symbol::Subtraction;
    let single = node.children.len() == 1;
    let mut terms = Vec::with_capacity(node.children.len());

    for (i, child) in node.children.iter().enumerate() {
        let negative = subtracts && (single || i > 0);
        let parts = if child.symbol == Symbol::Addition {
            child.children.clone()
        } else {
            vec![child.clone()]
        };
        terms.extend(parts.into_iter()
                          .map(|t| if negative { negate(t) } else { t }));
    }
    terms
}
