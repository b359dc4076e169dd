use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::Dataset,
    error::{EvalError, EvalResult},
    interpreter::evaluator::core::Interpreter,
    simplifier::{aggregation, composite::expand_composites, functions, product, sum},
    tree::{Symbol, SymbolicNode},
};

/// Bounds of a [`Simplifier`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifierConfig {
    /// Maximum number of rewrite passes before the current tree is returned.
    pub max_iterations: usize,
    /// Deepest tree accepted, before and after composite expansion.
    pub max_depth:      usize,
    /// Most nodes composite expansion may build.
    pub max_nodes:      usize,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self { max_iterations: 16,
               max_depth:      256,
               max_nodes:      1 << 20, }
    }
}

/// Algebraic simplifier for formula trees.
///
/// Each pass rewrites the tree bottom-up: children first, then the node
/// itself. Nodes whose operands are all literals are folded by evaluating
/// them, so folded values are exactly what evaluation would produce. Passes
/// repeat until the tree no longer changes, which makes the result a fixpoint:
/// simplifying it again returns it unchanged.
///
/// The caller's tree is never modified.
///
/// Rewrites keep every row undefined where the original is, including rows
/// past the end of a short column and non-finite cells. Two assumptions
/// remain: intermediates such as `exp(x)` in `log(exp(x))` do not overflow,
/// and variables hold the [`DataType`](crate::tree::DataType) they declare.
///
/// # Example
/// ```
/// use symvec::{
///     interpreter::parser::core::{ParserConfig, parse_formula},
///     simplifier::core::Simplifier,
///     tree::SymbolicNode,
/// };
///
/// let tree = parse_formula("x * 2 + x * 3 - (1 + 2)", &ParserConfig::default()).unwrap();
/// let simplified = Simplifier::default().simplify(&tree).unwrap();
/// assert_eq!(simplified.to_string(), "(variable(x, 5.0) + -3.0)");
/// ```
#[derive(Debug, Default)]
pub struct Simplifier {
    config: SimplifierConfig,
    folder: Interpreter,
}

impl Simplifier {
    /// Creates a simplifier with the given bounds.
    #[must_use]
    pub fn new(config: SimplifierConfig) -> Self {
        Self { config,
               folder: Interpreter::default() }
    }

    /// The bounds this simplifier was created with.
    #[must_use]
    pub const fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Returns a simplified copy of `tree`.
    ///
    /// Function invocations of a program are expanded first; a program comes
    /// back as a program without function definitions.
    ///
    /// # Errors
    /// `MalformedTree` if the tree fails validation, is deeper than
    /// `max_depth` before or after expansion, or cannot be expanded within
    /// `max_nodes`.
    pub fn simplify(&self, tree: &SymbolicNode) -> EvalResult<SymbolicNode> {
        tree.validate()?;
        self.check_depth(tree)?;
        let expanded = expand_composites(tree, self.config.max_depth, self.config.max_nodes)?;
        expanded.validate()?;
        self.check_depth(&expanded)?;

        let is_program = expanded.symbol == Symbol::ProgramRoot;
        let mut current = expanded.body().clone();
        let before = current.len();
        let mut passes = 0;
        while passes < self.config.max_iterations {
            let next = self.pass(&current);
            passes += 1;
            if next == current {
                break;
            }
            current = next;
        }
        debug!("simplified {before} nodes to {} in {passes} passes", current.len());

        Ok(if is_program {
               SymbolicNode::program(current, Vec::new())
           } else {
               current
           })
    }

    fn check_depth(&self, tree: &SymbolicNode) -> EvalResult<()> {
        let depth = tree.depth();
        if depth > self.config.max_depth {
            return Err(EvalError::malformed(format!("tree depth {depth} exceeds {}",
                                                    self.config.max_depth)));
        }
        Ok(())
    }

    fn pass(&self, node: &SymbolicNode) -> SymbolicNode {
        let children = node.children.iter().map(|c| self.pass(c)).collect();
        let node = SymbolicNode { symbol: node.symbol,
                                  children,
                                  params: node.params.clone() };
        match self.fold(&node) {
            Some(value) => SymbolicNode::number(value),
            None => rewrite(node),
        }
    }

    /// Value of a node whose operands are all literals, if it is finite.
    fn fold(&self, node: &SymbolicNode) -> Option<f64> {
        let foldable = !node.symbol.is_terminal()
                       && !node.symbol.is_structural()
                       && !node.children.is_empty()
                       && node.children.iter().all(|c| c.literal_value().is_some());
        if !foldable {
            return None;
        }
        self.folder
            .evaluate_row(node, &Dataset::new(), 0)
            .ok()?
            .as_scalar()
            .filter(|v| v.is_finite())
    }
}

fn rewrite(node: SymbolicNode) -> SymbolicNode {
    match node.symbol {
        Symbol::Addition | Symbol::Subtraction => sum::simplify(node),
        Symbol::Multiplication | Symbol::Division => product::simplify(node),
        Symbol::Power | Symbol::Root => functions::power(node),
        s if s.is_elementwise() => functions::elementwise(node),
        s if s.is_aggregation() => aggregation::simplify(node),
        _ => node,
    }
}
