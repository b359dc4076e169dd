/// Terminals: literals and dataset-bound variables.
///
/// The only instructions that read the row index.
pub mod terminal;
/// One-argument functions applied per element.
pub mod elementwise;
/// Reductions of one operand to a scalar.
///
/// Includes the scalar fallbacks (`mean(s) = s`, `std(s) = 0`, ...).
pub mod aggregation;
/// Sub-vector windows.
///
/// Maps relative bounds to absolute indices and copies the window.
pub mod window;
/// Closed-form time-series features.
///
/// Each feature reduces one vector plus optional scalar parameters to a
/// scalar.
pub mod timeseries;

use crate::interpreter::value::EvaluationResult;

/// Reads a parameter operand: a scalar, or the element of a length-1 vector.
pub(crate) fn scalar_parameter(operand: &EvaluationResult) -> Option<f64> {
    match operand {
        EvaluationResult::Scalar(v) => Some(*v),
        EvaluationResult::Vector(v) if v.len() == 1 => Some(v.first()),
        _ => None,
    }
}
