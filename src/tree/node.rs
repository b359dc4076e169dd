use std::collections::BTreeMap;

use crate::{
    error::{EvalError, EvalResult},
    tree::symbol::Symbol,
};

/// Declared shape of the column a variable binds to.
///
/// The evaluator always follows the actual column; the simplifier only has
/// this declaration to decide whether a subtree may produce a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// One number per row.
    #[default]
    Scalar,
    /// One fixed-length numeric vector per row.
    Vector,
}

/// Parameters of `Variable` and `LaggedVariable` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableParams {
    /// Column name.
    pub name:      String,
    /// Factor applied to the column value.
    pub weight:    f64,
    /// Row offset; always `0` for plain variables.
    pub lag:       i64,
    /// Declared shape of the column.
    pub data_type: DataType,
}

/// Parameters of `FactorVariable` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorParams {
    /// Categorical column name.
    pub name:    String,
    /// Weight per category; categories not listed weigh `0`.
    pub weights: BTreeMap<String, f64>,
}

/// Parameters of `BinaryFactorVariable` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryFactorParams {
    /// Categorical column name.
    pub name:   String,
    /// The category this indicator fires for.
    pub value:  String,
    /// Result when the row holds `value`.
    pub weight: f64,
}

/// Parameters of `SubVector` and `SubVectorSubtree` nodes.
///
/// `start` and `end` are relative positions in `[0, 1]`; the subtree variant
/// takes its bounds from operands and only uses `round_trip`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    /// Relative start of the window.
    pub start:      f64,
    /// Relative end of the window.
    pub end:        f64,
    /// Allows windows that wrap around the end of the vector.
    pub round_trip: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self { start:      0.0,
               end:        1.0,
               round_trip: false, }
    }
}

/// Per-node parameters; which variant applies depends on the symbol.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeParams {
    /// The symbol carries no parameters.
    #[default]
    None,
    /// Value of a `Number` or `Constant`.
    Number(f64),
    /// Binding of a `Variable` or `LaggedVariable`.
    Variable(VariableParams),
    /// Weight table of a `FactorVariable`.
    Factor(FactorParams),
    /// Indicator of a `BinaryFactorVariable`.
    BinaryFactor(BinaryFactorParams),
    /// Window of a `SubVector` or `SubVectorSubtree`.
    Window(WindowParams),
    /// Function name of a `Defun` or `InvokeFunction`.
    Function(String),
    /// Index of an `Argument`.
    Argument(usize),
}

/// A node of a formula tree.
///
/// Nodes own their children. Trees handed to the evaluator are only read;
/// the simplifier works on clones.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicNode {
    /// What this node computes.
    pub symbol:   Symbol,
    /// Ordered operands.
    pub children: Vec<Self>,
    /// Kind-specific parameters.
    pub params:   NodeParams,
}

impl SymbolicNode {
    /// Creates a function node without parameters.
    ///
    /// # Example
    /// ```
    /// use symvec::tree::{Symbol, SymbolicNode};
    ///
    /// let sum = SymbolicNode::new(Symbol::Addition,
    ///                             vec![SymbolicNode::number(1.0), SymbolicNode::number(2.0)]);
    /// assert_eq!(sum.children.len(), 2);
    /// ```
    #[must_use]
    pub const fn new(symbol: Symbol, children: Vec<Self>) -> Self {
        Self { symbol,
               children,
               params: NodeParams::None }
    }

    /// Creates a one-child function node.
    #[must_use]
    pub fn unary(symbol: Symbol, child: Self) -> Self {
        Self::new(symbol, vec![child])
    }

    /// Creates a two-child function node.
    #[must_use]
    pub fn binary(symbol: Symbol, left: Self, right: Self) -> Self {
        Self::new(symbol, vec![left, right])
    }

    /// Optimizable numeric literal.
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self { symbol:   Symbol::Number,
               children: Vec::new(),
               params:   NodeParams::Number(value), }
    }

    /// Fixed numeric literal.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self { symbol:   Symbol::Constant,
               children: Vec::new(),
               params:   NodeParams::Number(value), }
    }

    /// Weighted scalar-valued variable.
    #[must_use]
    pub fn variable(name: impl Into<String>, weight: f64) -> Self {
        Self::weighted_variable(Symbol::Variable, name, weight, 0, DataType::Scalar)
    }

    /// Weighted vector-valued variable.
    #[must_use]
    pub fn vector_variable(name: impl Into<String>, weight: f64) -> Self {
        Self::weighted_variable(Symbol::Variable, name, weight, 0, DataType::Vector)
    }

    /// Weighted scalar-valued variable read at `row + lag`.
    #[must_use]
    pub fn lagged_variable(name: impl Into<String>, weight: f64, lag: i64) -> Self {
        Self::weighted_variable(Symbol::LaggedVariable, name, weight, lag, DataType::Scalar)
    }

    fn weighted_variable(symbol: Symbol,
                         name: impl Into<String>,
                         weight: f64,
                         lag: i64,
                         data_type: DataType)
                         -> Self {
        Self { symbol,
               children: Vec::new(),
               params: NodeParams::Variable(VariableParams { name: name.into(),
                                                             weight,
                                                             lag,
                                                             data_type }) }
    }

    /// Categorical variable with a weight per category.
    #[must_use]
    pub fn factor<K, I>(name: impl Into<String>, weights: I) -> Self
        where K: Into<String>,
              I: IntoIterator<Item = (K, f64)>
    {
        let weights = weights.into_iter().map(|(k, w)| (k.into(), w)).collect();
        Self { symbol:   Symbol::FactorVariable,
               children: Vec::new(),
               params:   NodeParams::Factor(FactorParams { name: name.into(),
                                                           weights }), }
    }

    /// Indicator of one category, scaled by `weight`.
    #[must_use]
    pub fn binary_factor(name: impl Into<String>, value: impl Into<String>, weight: f64) -> Self {
        Self { symbol:   Symbol::BinaryFactorVariable,
               children: Vec::new(),
               params:   NodeParams::BinaryFactor(BinaryFactorParams { name: name.into(),
                                                                       value: value.into(),
                                                                       weight }), }
    }

    /// Window with fixed relative bounds.
    #[must_use]
    pub fn sub_vector(child: Self, start: f64, end: f64, round_trip: bool) -> Self {
        Self { symbol:   Symbol::SubVector,
               children: vec![child],
               params:   NodeParams::Window(WindowParams { start,
                                                           end,
                                                           round_trip }), }
    }

    /// Window whose relative bounds are computed by subtrees.
    #[must_use]
    pub fn sub_vector_subtree(child: Self, start: Self, end: Self, round_trip: bool) -> Self {
        Self { symbol:   Symbol::SubVectorSubtree,
               children: vec![child, start, end],
               params:   NodeParams::Window(WindowParams { round_trip,
                                                           ..WindowParams::default() }), }
    }

    /// Wraps `body` into `ProgramRoot(Start(body), defuns...)`.
    #[must_use]
    pub fn program(body: Self, defuns: Vec<Self>) -> Self {
        let mut children = Vec::with_capacity(defuns.len() + 1);
        children.push(Self::unary(Symbol::Start, body));
        children.extend(defuns);
        Self::new(Symbol::ProgramRoot, children)
    }

    /// Named function definition.
    #[must_use]
    pub fn defun(name: impl Into<String>, body: Self) -> Self {
        Self { symbol:   Symbol::Defun,
               children: vec![body],
               params:   NodeParams::Function(name.into()), }
    }

    /// Invocation of a named function.
    #[must_use]
    pub fn invoke(name: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self { symbol:   Symbol::InvokeFunction,
               children: arguments,
               params:   NodeParams::Function(name.into()), }
    }

    /// Placeholder for the `index`-th function argument.
    #[must_use]
    pub const fn argument(index: usize) -> Self {
        Self { symbol:   Symbol::Argument,
               children: Vec::new(),
               params:   NodeParams::Argument(index), }
    }

    /// Value of a numeric literal.
    #[must_use]
    pub fn literal_value(&self) -> Option<f64> {
        match (self.symbol.is_literal(), &self.params) {
            (true, NodeParams::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// Tests whether this node is a literal equal to `value`.
    #[must_use]
    pub fn is_literal_value(&self, value: f64) -> bool {
        self.literal_value().is_some_and(|v| v == value)
    }

    /// Variable binding of a `Variable` or `LaggedVariable`.
    #[must_use]
    pub const fn variable_params(&self) -> Option<&VariableParams> {
        match &self.params {
            NodeParams::Variable(p) => Some(p),
            _ => None,
        }
    }

    /// Name of the dataset column this node reads, if any.
    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        match &self.params {
            NodeParams::Variable(p) => Some(&p.name),
            NodeParams::Factor(p) => Some(&p.name),
            NodeParams::BinaryFactor(p) => Some(&p.name),
            _ => None,
        }
    }

    /// Function name of a `Defun` or `InvokeFunction`.
    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        match &self.params {
            NodeParams::Function(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the evaluated body: the child of `Start` for a program root,
    /// the child of `Start` itself, or the node unchanged otherwise.
    #[must_use]
    pub fn body(&self) -> &Self {
        match self.symbol {
            Symbol::ProgramRoot => self.children.first().map_or(self, Self::body),
            Symbol::Start => self.children.first().unwrap_or(self),
            _ => self,
        }
    }

    /// Iterates over the subtree in prefix order.
    pub fn iter_prefix(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of nodes in the subtree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter_prefix().count()
    }

    /// Always `false`; a tree has at least its root.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, d)) = stack.pop() {
            max = max.max(d);
            stack.extend(node.children.iter().map(|c| (c, d + 1)));
        }
        max
    }

    /// Checks every node's child count against its symbol's arity and that
    /// parameters match the symbol.
    ///
    /// # Errors
    /// `MalformedTree` naming the first offending node.
    pub fn validate(&self) -> EvalResult<()> {
        for node in self.iter_prefix() {
            let arity = node.symbol.arity();
            if !arity.contains(node.children.len()) {
                return Err(EvalError::MalformedTree { details: format!("{} expects {}..={} children, found {}",
                                                                       node.symbol,
                                                                       arity.min(),
                                                                       arity.max(),
                                                                       node.children.len()) });
            }
            if !node.params_match(node.symbol) {
                return Err(EvalError::MalformedTree { details: format!("{} carries parameters of another symbol",
                                                                       node.symbol) });
            }
        }
        Ok(())
    }

    /// `true` if the node's parameters are the kind `symbol` carries.
    #[must_use]
    pub fn params_match(&self, symbol: Symbol) -> bool {
        match symbol {
            Symbol::Number | Symbol::Constant => matches!(self.params, NodeParams::Number(_)),
            Symbol::Variable | Symbol::LaggedVariable => {
                matches!(self.params, NodeParams::Variable(_))
            },
            Symbol::FactorVariable => matches!(self.params, NodeParams::Factor(_)),
            Symbol::BinaryFactorVariable => matches!(self.params, NodeParams::BinaryFactor(_)),
            Symbol::SubVector => matches!(self.params, NodeParams::Window(_)),
            Symbol::SubVectorSubtree => {
                matches!(self.params, NodeParams::Window(_) | NodeParams::None)
            },
            Symbol::Defun | Symbol::InvokeFunction => matches!(self.params, NodeParams::Function(_)),
            Symbol::Argument => matches!(self.params, NodeParams::Argument(_)),
            _ => matches!(self.params, NodeParams::None),
        }
    }
}
