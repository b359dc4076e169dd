use crate::interpreter::{
    evaluator::{binary::arithmetic::map, opcode::OpCode},
    value::EvaluationResult,
};

/// Applies a one-argument function to a scalar or to every vector element.
///
/// Domain errors are not raised: they produce NaN or infinities and the
/// result collapses to `Undefined`. Opcodes that are not elementwise leave
/// the operand unchanged.
///
/// # Example
/// ```
/// use symvec::interpreter::{
///     evaluator::{function::elementwise::apply, opcode::OpCode},
///     value::EvaluationResult,
/// };
///
/// assert_eq!(apply(OpCode::Square, &EvaluationResult::Scalar(-3.0)),
///            EvaluationResult::Scalar(9.0));
/// assert!(apply(OpCode::Logarithm, &EvaluationResult::Scalar(-1.0)).is_undefined());
/// ```
#[must_use]
pub fn apply(opcode: OpCode, operand: &EvaluationResult) -> EvaluationResult {
    match function(opcode) {
        Some(f) => map(operand, f),
        None => operand.clone(),
    }
}

/// The scalar function behind an elementwise opcode.
///
/// Constant folding uses the same functions, so folded literals equal what
/// evaluation would compute.
#[must_use]
pub fn function(opcode: OpCode) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match opcode {
        OpCode::Absolute => f64::abs,
        OpCode::Sine => f64::sin,
        OpCode::Cosine => f64::cos,
        OpCode::Tangent => f64::tan,
        OpCode::HyperbolicTangent => f64::tanh,
        OpCode::Square => |x| x * x,
        OpCode::SquareRoot => f64::sqrt,
        OpCode::Cube => |x| x * x * x,
        OpCode::CubeRoot => f64::cbrt,
        OpCode::Exponential => f64::exp,
        OpCode::Logarithm => f64::ln,
        _ => return None,
    };
    Some(f)
}
