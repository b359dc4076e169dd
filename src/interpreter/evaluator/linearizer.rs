use log::debug;

use crate::{
    dataset::{Column, Dataset},
    error::{EvalError, EvalResult},
    interpreter::{evaluator::opcode::{OpCode, OpCodeTable}, value::DoubleVector},
    tree::{NodeParams, SymbolicNode},
};

/// Dataset column bound to a terminal instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnBinding<'a> {
    /// One number per row.
    Scalar(&'a [f64]),
    /// One vector per row.
    Vector(&'a [DoubleVector]),
    /// One category label per row.
    Categorical(&'a [String]),
}

/// One step of a linearized formula.
///
/// Instructions are stored in post-order: the `arg_count` operands of an
/// instruction are the results of the instructions evaluated right before it.
#[derive(Debug, Clone, Copy)]
pub struct Instruction<'a> {
    /// What to compute.
    pub opcode:    OpCode,
    /// Number of operands taken from the preceding results.
    pub arg_count: u8,
    /// The tree node this instruction was produced from.
    pub node:      &'a SymbolicNode,
    /// Column data for terminals reading the dataset.
    pub data:      Option<ColumnBinding<'a>>,
}

/// Converts a tree into its post-order instruction sequence.
///
/// Program roots are unwrapped first, so the sequence describes the body of
/// `Start`. Columns are looked up once here; evaluation only indexes rows.
///
/// # Errors
/// - `MalformedTree` if a node violates its arity or carries foreign
///   parameters.
/// - `UnsupportedSymbol` if `table` has no opcode for a node's symbol.
/// - `MalformedTree` if `table` maps a symbol to an opcode whose operands or
///   parameters differ from the node's.
/// - `UnknownVariable` if a terminal names a column `data` does not have.
/// - `InvalidColumnBinding` if a numeric terminal names a categorical column
///   or the other way round.
///
/// # Example
/// ```
/// use symvec::{
///     dataset::{Column, Dataset},
///     interpreter::evaluator::{
///         linearizer::linearize,
///         opcode::{OpCode, OpCodeTable},
///     },
///     tree::{Symbol, SymbolicNode},
/// };
///
/// let tree = SymbolicNode::binary(Symbol::Addition,
///                                 SymbolicNode::variable("x", 1.0),
///                                 SymbolicNode::number(2.0));
/// let data = Dataset::new().with_column("x", Column::Scalar(vec![1.0]));
/// let code = linearize(&tree, &data, &OpCodeTable::default()).unwrap();
///
/// let opcodes: Vec<_> = code.iter().map(|i| i.opcode).collect();
/// assert_eq!(opcodes, [OpCode::Variable, OpCode::Constant, OpCode::Add]);
/// assert_eq!(code[2].arg_count, 2);
/// ```
pub fn linearize<'a>(tree: &'a SymbolicNode,
                     data: &'a Dataset,
                     table: &OpCodeTable)
                     -> EvalResult<Vec<Instruction<'a>>> {
    let body = tree.body();
    body.validate()?;

    let mut pending = vec![body];
    let mut code = Vec::with_capacity(body.len());
    while let Some(node) = pending.pop() {
        code.push(instruction(node, data, table)?);
        pending.extend(node.children.iter());
    }
    code.reverse();

    debug!("linearized {} nodes into {} instructions", body.len(), code.len());
    Ok(code)
}

fn instruction<'a>(node: &'a SymbolicNode,
                   data: &'a Dataset,
                   table: &OpCodeTable)
                   -> EvalResult<Instruction<'a>> {
    let opcode = table.get(node.symbol)
                      .ok_or(EvalError::UnsupportedSymbol { symbol: node.symbol })?;
    let arg_count = u8::try_from(node.children.len()).map_err(|_| {
                        EvalError::malformed(format!("{} has {} children",
                                                     node.symbol,
                                                     node.children.len()))
                    })?;
    let fits = opcode.symbols()
                     .iter()
                     .any(|&s| s.arity().contains(node.children.len()) && node.params_match(s));
    if !fits {
        return Err(EvalError::malformed(format!("{} with {} children cannot execute as {opcode}",
                                                node.symbol,
                                                node.children.len())));
    }

    Ok(Instruction { opcode,
                     arg_count,
                     node,
                     data: bind_column(node, data)? })
}

fn bind_column<'a>(node: &SymbolicNode, data: &'a Dataset) -> EvalResult<Option<ColumnBinding<'a>>> {
    let (name, numeric) = match &node.params {
        NodeParams::Variable(p) => (&p.name, true),
        NodeParams::Factor(p) => (&p.name, false),
        NodeParams::BinaryFactor(p) => (&p.name, false),
        _ => return Ok(None),
    };

    let column = data.column(name)
                     .ok_or_else(|| EvalError::UnknownVariable { name: name.clone() })?;
    let binding = match (column, numeric) {
        (Column::Scalar(values), true) => ColumnBinding::Scalar(values),
        (Column::Vector(values), true) => ColumnBinding::Vector(values),
        (Column::Categorical(values), false) => ColumnBinding::Categorical(values),
        (_, true) => {
            return Err(EvalError::InvalidColumnBinding { name:     name.clone(),
                                                         expected: "numeric", });
        },
        (_, false) => {
            return Err(EvalError::InvalidColumnBinding { name:     name.clone(),
                                                         expected: "categorical", });
        },
    };
    Ok(Some(binding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Symbol;

    fn data() -> Dataset {
        Dataset::new().with_column("x", Column::Scalar(vec![1.0, 2.0]))
                      .with_column("c", Column::Categorical(vec!["a".into()]))
    }

    #[test]
    fn emits_post_order_with_argument_counts() {
        let tree = SymbolicNode::new(Symbol::Multiplication,
                                     vec![SymbolicNode::unary(Symbol::Sine,
                                                              SymbolicNode::variable("x", 1.0)),
                                          SymbolicNode::number(2.0),
                                          SymbolicNode::number(3.0)]);
        let data = data();
        let code = linearize(&tree, &data, &OpCodeTable::default()).unwrap();
        let shape: Vec<_> = code.iter().map(|i| (i.opcode, i.arg_count)).collect();
        assert_eq!(shape,
                   [(OpCode::Variable, 0),
                    (OpCode::Sine, 1),
                    (OpCode::Constant, 0),
                    (OpCode::Constant, 0),
                    (OpCode::Mul, 3)]);
        assert!(matches!(code[0].data, Some(ColumnBinding::Scalar(_))));
    }

    #[test]
    fn unwraps_program_root() {
        let tree = SymbolicNode::program(SymbolicNode::number(1.0), Vec::new());
        let data = data();
        let code = linearize(&tree, &data, &OpCodeTable::default()).unwrap();
        assert_eq!(code.len(), 1);
    }

    #[test]
    fn binding_errors() {
        let data = data();
        let table = OpCodeTable::default();

        let missing = SymbolicNode::variable("y", 1.0);
        assert_eq!(linearize(&missing, &data, &table).unwrap_err(),
                   EvalError::UnknownVariable { name: "y".into() });

        let wrong = SymbolicNode::variable("c", 1.0);
        assert!(matches!(linearize(&wrong, &data, &table),
                         Err(EvalError::InvalidColumnBinding { .. })));

        let wrong = SymbolicNode::factor("x", [("a", 1.0)]);
        assert!(matches!(linearize(&wrong, &data, &table),
                         Err(EvalError::InvalidColumnBinding { .. })));
    }

    #[test]
    fn arity_violation_is_malformed() {
        let tree = SymbolicNode::new(Symbol::Sine, Vec::new());
        assert!(matches!(linearize(&tree, &data(), &OpCodeTable::default()),
                         Err(EvalError::MalformedTree { .. })));
    }

    #[test]
    fn remapped_opcode_must_fit_the_node() {
        let data = data();
        let sine = SymbolicNode::unary(Symbol::Sine, SymbolicNode::variable("x", 1.0));

        let binary = OpCodeTable::default().with(Symbol::Sine, OpCode::Power);
        assert!(matches!(linearize(&sine, &data, &binary),
                         Err(EvalError::MalformedTree { .. })));

        let terminal = OpCodeTable::default().with(Symbol::Sine, OpCode::Variable);
        assert!(matches!(linearize(&sine, &data, &terminal),
                         Err(EvalError::MalformedTree { .. })));

        let unary = OpCodeTable::default().with(Symbol::Sine, OpCode::Cosine);
        let code = linearize(&sine, &data, &unary).unwrap();
        assert_eq!(code[1].opcode, OpCode::Cosine);
    }
}
