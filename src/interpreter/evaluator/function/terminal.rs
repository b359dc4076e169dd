use crate::{
    error::{EvalError, EvalResult},
    interpreter::{
        evaluator::linearizer::{ColumnBinding, Instruction},
        value::EvaluationResult,
    },
    tree::NodeParams,
};

/// Evaluates a literal or data-bound terminal for `row`.
///
/// - Literals return their value.
/// - `Variable` multiplies the row's value (scalar or every vector element) by
///   the node's weight; `LaggedVariable` reads row `row + lag`.
/// - `FactorVariable` returns the weight of the row's category, `0` for a
///   category without a weight.
/// - `BinaryFactorVariable` returns its weight when the row holds its
///   category, `0` otherwise.
///
/// Rows outside the bound column yield `Undefined`.
///
/// # Errors
/// `MalformedTree` if the instruction lacks the parameters or binding its
/// opcode needs.
pub fn evaluate(instruction: &Instruction<'_>, row: usize) -> EvalResult<EvaluationResult> {
    let node = instruction.node;
    match (&node.params, instruction.data) {
        (NodeParams::Number(v), _) => Ok(EvaluationResult::scalar(*v)),
        (NodeParams::Variable(p), Some(data)) => {
            let Some(row) = offset_row(row, p.lag) else {
                return Ok(EvaluationResult::Undefined);
            };
            Ok(match data {
                ColumnBinding::Scalar(values) => {
                    values.get(row)
                          .map_or(EvaluationResult::Undefined, |v| EvaluationResult::scalar(p.weight * v))
                },
                ColumnBinding::Vector(values) => values.get(row)
                                                       .map_or(EvaluationResult::Undefined, |v| {
                                                           EvaluationResult::vector(v.map(|x| p.weight * x))
                                                       }),
                ColumnBinding::Categorical(_) => EvaluationResult::Undefined,
            })
        },
        (NodeParams::Factor(p), Some(ColumnBinding::Categorical(values))) => {
            Ok(values.get(row).map_or(EvaluationResult::Undefined, |category| {
                                   EvaluationResult::scalar(p.weights
                                                             .get(category)
                                                             .copied()
                                                             .unwrap_or(0.0))
                               }))
        },
        (NodeParams::BinaryFactor(p), Some(ColumnBinding::Categorical(values))) => {
            Ok(values.get(row).map_or(EvaluationResult::Undefined, |category| {
                                   let weight = if *category == p.value { p.weight } else { 0.0 };
                                   EvaluationResult::scalar(weight)
                               }))
        },
        _ => Err(EvalError::malformed(format!("{} terminal without usable data binding",
                                              node.symbol))),
    }
}

fn offset_row(row: usize, lag: i64) -> Option<usize> {
    if lag >= 0 {
        row.checked_add(usize::try_from(lag).ok()?)
    } else {
        row.checked_sub(usize::try_from(lag.unsigned_abs()).ok()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::{Column, Dataset},
        interpreter::evaluator::{linearizer::linearize, opcode::OpCodeTable},
        tree::SymbolicNode,
    };

    fn evaluate_at(node: &SymbolicNode, data: &Dataset, row: usize) -> EvaluationResult {
        let code = linearize(node, data, &OpCodeTable::default()).unwrap();
        evaluate(&code[0], row).unwrap()
    }

    #[test]
    fn lagged_rows_outside_the_column_are_undefined() {
        let data = Dataset::new().with_column("x", Column::Scalar(vec![1.0, 2.0, 3.0]));
        let back = SymbolicNode::lagged_variable("x", 2.0, -1);
        assert_eq!(evaluate_at(&back, &data, 0), EvaluationResult::Undefined);
        assert_eq!(evaluate_at(&back, &data, 2), EvaluationResult::Scalar(4.0));

        let ahead = SymbolicNode::lagged_variable("x", 1.0, 1);
        assert_eq!(evaluate_at(&ahead, &data, 2), EvaluationResult::Undefined);
    }

    #[test]
    fn factor_weights() {
        let data = Dataset::new().with_column("c",
                                              Column::Categorical(vec!["a".into(),
                                                                       "b".into(),
                                                                       "z".into()]));
        let factor = SymbolicNode::factor("c", [("a", 1.5), ("b", -2.0)]);
        assert_eq!(evaluate_at(&factor, &data, 1), EvaluationResult::Scalar(-2.0));
        assert_eq!(evaluate_at(&factor, &data, 2), EvaluationResult::Scalar(0.0));

        let indicator = SymbolicNode::binary_factor("c", "a", 3.0);
        assert_eq!(evaluate_at(&indicator, &data, 0), EvaluationResult::Scalar(3.0));
        assert_eq!(evaluate_at(&indicator, &data, 1), EvaluationResult::Scalar(0.0));
    }

    #[test]
    fn non_finite_data_is_undefined() {
        let data = Dataset::new().with_column("x", Column::Scalar(vec![f64::NAN]));
        let x = SymbolicNode::variable("x", 1.0);
        assert!(evaluate_at(&x, &data, 0).is_undefined());
    }
}
