use std::{cell::Cell, collections::HashMap};

use log::debug;

use crate::{
    error::{EvalError, EvalResult},
    tree::{NodeParams, Symbol, SymbolicNode},
};

/// Function bodies by name, taken from the `Defun` branches of a program.
type Functions<'a> = HashMap<&'a str, &'a SymbolicNode>;

/// Inlines every function invocation of a program.
///
/// For a `ProgramRoot`, each `InvokeFunction(name)` in the body is replaced by
/// a copy of the named `Defun` body in which every `Argument(i)` is replaced
/// by the invocation's `i`-th argument. Arguments are expanded before they are
/// substituted; bodies may invoke further functions up to `max_depth` nested
/// invocations. The result is a program without `Defun` branches. Arguments
/// used repeatedly are copied for every use, so expansion stops once it has
/// built `max_nodes` nodes.
///
/// Any other tree is returned as a copy, provided it contains no invocations
/// or placeholders.
///
/// # Errors
/// `MalformedTree` for an unknown or duplicate function name, an argument
/// index without a matching argument, a placeholder outside a function body,
/// invocations nested deeper than `max_depth`, or an expansion building more
/// than `max_nodes` nodes.
///
/// # Example
/// ```
/// use symvec::{
///     simplifier::composite::expand_composites,
///     tree::{Symbol, SymbolicNode},
/// };
///
/// let square = SymbolicNode::defun("square",
///                                  SymbolicNode::binary(Symbol::Multiplication,
///                                                       SymbolicNode::argument(0),
///                                                       SymbolicNode::argument(0)));
/// let x = SymbolicNode::variable("x", 1.0);
/// let program = SymbolicNode::program(SymbolicNode::invoke("square", vec![x.clone()]), vec![square]);
///
/// let expanded = expand_composites(&program, 16, 1_000).unwrap();
/// assert_eq!(expanded.body(), &SymbolicNode::binary(Symbol::Multiplication, x.clone(), x));
/// assert_eq!(expanded.children.len(), 1);
/// ```
pub fn expand_composites(tree: &SymbolicNode,
                         max_depth: usize,
                         max_nodes: usize)
                         -> EvalResult<SymbolicNode> {
    if tree.symbol != Symbol::ProgramRoot {
        return Expansion::new(Functions::new(), max_depth, max_nodes).expand(tree, None, 0);
    }

    let mut functions = Functions::new();
    for defun in tree.children.iter().filter(|c| c.symbol == Symbol::Defun) {
        let (NodeParams::Function(name), [body]) = (&defun.params, defun.children.as_slice()) else {
            return Err(EvalError::malformed("function definition without name or body"));
        };
        if functions.insert(name.as_str(), body).is_some() {
            return Err(EvalError::malformed(format!("function '{name}' is defined twice")));
        }
    }
    debug!("expanding program with {} function definitions", functions.len());

    let expansion = Expansion::new(functions, max_depth, max_nodes);
    let body = expansion.expand(tree.body(), None, 0)?;
    Ok(SymbolicNode::program(body, Vec::new()))
}

struct Expansion<'a> {
    functions: Functions<'a>,
    max_depth: usize,
    max_nodes: usize,
    nodes:     Cell<usize>,
}

impl<'a> Expansion<'a> {
    const fn new(functions: Functions<'a>, max_depth: usize, max_nodes: usize) -> Self {
        Self { functions,
               max_depth,
               max_nodes,
               nodes: Cell::new(0) }
    }

    /// Accounts for `count` more built nodes.
    fn charge(&self, count: usize) -> EvalResult<()> {
        let nodes = self.nodes.get().saturating_add(count);
        if nodes > self.max_nodes {
            return Err(EvalError::malformed(format!("expansion builds more than {} nodes",
                                                    self.max_nodes)));
        }
        self.nodes.set(nodes);
        Ok(())
    }

    fn expand(&self,
              node: &SymbolicNode,
              arguments: Option<&[SymbolicNode]>,
              depth: usize)
              -> EvalResult<SymbolicNode> {
        match (node.symbol, &node.params) {
            (Symbol::InvokeFunction, NodeParams::Function(name)) => {
                if depth >= self.max_depth {
                    return Err(EvalError::malformed(format!("invocations of '{name}' nest deeper than {}",
                                                            self.max_depth)));
                }
                let body = self.functions
                               .get(name.as_str())
                               .ok_or_else(|| EvalError::malformed(format!("unknown function '{name}'")))?;
                let actual = node.children
                                 .iter()
                                 .map(|child| self.expand(child, arguments, depth))
                                 .collect::<EvalResult<Vec<_>>>()?;
                self.expand(body, Some(&actual), depth + 1)
            },
            (Symbol::Argument, NodeParams::Argument(index)) => {
                let arguments =
                    arguments.ok_or_else(|| EvalError::malformed("argument outside a function body"))?;
                let argument = arguments.get(*index).ok_or_else(|| {
                                                        EvalError::malformed(format!("argument {index} of {} requested",
                                                                                     arguments.len()))
                                                    })?;
                self.charge(argument.len())?;
                Ok(argument.clone())
            },
            (Symbol::ProgramRoot | Symbol::Start | Symbol::Defun, _) => {
                Err(EvalError::malformed(format!("{} inside an expression", node.symbol)))
            },
            _ => {
                self.charge(1)?;
                let children = node.children
                                   .iter()
                                   .map(|child| self.expand(child, arguments, depth))
                                   .collect::<EvalResult<Vec<_>>>()?;
                Ok(SymbolicNode { symbol: node.symbol,
                                  children,
                                  params: node.params.clone() })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arguments: Vec<SymbolicNode>) -> SymbolicNode {
        SymbolicNode::invoke(name, arguments)
    }

    #[test]
    fn nested_invocations_expand() {
        let double = SymbolicNode::defun("double",
                                         SymbolicNode::binary(Symbol::Addition,
                                                              SymbolicNode::argument(0),
                                                              SymbolicNode::argument(0)));
        let quad = SymbolicNode::defun("quad", call("double", vec![call("double", vec![SymbolicNode::argument(0)])]));
        let program = SymbolicNode::program(call("quad", vec![SymbolicNode::number(3.0)]), vec![double, quad]);

        let expanded = expand_composites(&program, 8, 1_000).unwrap();
        let three = SymbolicNode::number(3.0);
        let six = SymbolicNode::binary(Symbol::Addition, three.clone(), three);
        assert_eq!(expanded.body(), &SymbolicNode::binary(Symbol::Addition, six.clone(), six));
    }

    #[test]
    fn recursion_is_bounded() {
        let endless = SymbolicNode::defun("f", call("f", Vec::new()));
        let program = SymbolicNode::program(call("f", Vec::new()), vec![endless]);
        assert!(matches!(expand_composites(&program, 8, 1_000), Err(EvalError::MalformedTree { .. })));
    }

    #[test]
    fn unknown_functions_and_arguments_are_malformed() {
        let program = SymbolicNode::program(call("g", Vec::new()), Vec::new());
        assert!(expand_composites(&program, 8, 1_000).is_err());

        let second = SymbolicNode::defun("second", SymbolicNode::argument(1));
        let program = SymbolicNode::program(call("second", vec![SymbolicNode::number(1.0)]), vec![second]);
        assert!(expand_composites(&program, 8, 1_000).is_err());

        assert!(expand_composites(&SymbolicNode::argument(0), 8, 1_000).is_err());
    }

    #[test]
    fn repeated_arguments_are_bounded() {
        let double = SymbolicNode::defun("double",
                                         SymbolicNode::binary(Symbol::Addition,
                                                              SymbolicNode::argument(0),
                                                              SymbolicNode::argument(0)));
        let mut body = SymbolicNode::variable("x", 1.0);
        for _ in 0..30 {
            body = call("double", vec![body]);
        }
        let program = SymbolicNode::program(body, vec![double]);

        assert!(matches!(expand_composites(&program, 64, 10_000),
                         Err(EvalError::MalformedTree { .. })));

        let small = SymbolicNode::program(call("double", vec![call("double", vec![SymbolicNode::number(1.0)])]),
                                          vec![SymbolicNode::defun("double",
                                                                   SymbolicNode::binary(Symbol::Addition,
                                                                                        SymbolicNode::argument(0),
                                                                                        SymbolicNode::argument(0)))]);
        assert_eq!(expand_composites(&small, 64, 10_000).unwrap().body().len(), 7);
    }

    #[test]
    fn plain_trees_are_copied() {
        let tree = SymbolicNode::binary(Symbol::Addition,
                                        SymbolicNode::variable("x", 1.0),
                                        SymbolicNode::number(1.0));
        assert_eq!(expand_composites(&tree, 8, 1_000).unwrap(), tree);
    }
}
