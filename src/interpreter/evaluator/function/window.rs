use crate::{
    interpreter::{
        evaluator::function::scalar_parameter,
        value::EvaluationResult,
    },
    tree::{NodeParams, SymbolicNode, WindowParams},
    util::num::relative_to_index,
};

/// Evaluates `SubVector`: the window bounds are stored on the node.
#[must_use]
pub fn fixed(node: &SymbolicNode, operand: &EvaluationResult) -> EvaluationResult {
    let params = window_params(node);
    select(operand, params.start, params.end, params.round_trip)
}

/// Evaluates `SubVectorSubtree`: the bounds are the second and third
/// operands.
#[must_use]
pub fn evaluated(node: &SymbolicNode, operands: &[EvaluationResult]) -> EvaluationResult {
    let [operand, start, end] = operands else {
        return EvaluationResult::Undefined;
    };
    match (scalar_parameter(start), scalar_parameter(end)) {
        (Some(start), Some(end)) => select(operand, start, end, window_params(node).round_trip),
        _ => EvaluationResult::Undefined,
    }
}

fn window_params(node: &SymbolicNode) -> WindowParams {
    match &node.params {
        NodeParams::Window(p) => *p,
        _ => WindowParams::default(),
    }
}

/// Copies the window `[start, end)` given in relative positions.
///
/// Each bound maps to `clamp(round(relative * (len + 1)), 0, len)`. Without
/// round trips the bounds are ordered first; with round trips `start > end`
/// wraps around the end of the vector. A scalar operand is its own window;
/// an empty window is `Undefined`.
///
/// # Example
/// ```
/// use symvec::interpreter::{
///     evaluator::function::window::select,
///     value::{DoubleVector, EvaluationResult},
/// };
///
/// let v = EvaluationResult::Vector(DoubleVector::new(vec![3.0, 5.0, 7.0, 9.0]).unwrap());
/// let wrapped = select(&v, 0.4, 0.2, true);
/// assert_eq!(wrapped.as_vector().unwrap().values(), &[7.0, 9.0, 3.0]);
/// let ordered = select(&v, 0.4, 0.2, false);
/// assert_eq!(ordered.as_vector().unwrap().values(), &[5.0]);
/// ```
#[must_use]
pub fn select(operand: &EvaluationResult,
              start: f64,
              end: f64,
              round_trip: bool)
              -> EvaluationResult {
    let v = match operand {
        EvaluationResult::Vector(v) => v,
        EvaluationResult::Scalar(_) => return operand.clone(),
        EvaluationResult::Undefined => return EvaluationResult::Undefined,
    };
    let (Some(mut start), Some(mut end)) =
        (relative_to_index(start, v.len()), relative_to_index(end, v.len()))
    else {
        return EvaluationResult::Undefined;
    };
    if !round_trip && start > end {
        std::mem::swap(&mut start, &mut end);
    }
    v.sub_vector(start, end, round_trip)
     .map_or(EvaluationResult::Undefined, EvaluationResult::vector)
}
