use crate::{
    interpreter::{
        evaluator::{function::scalar_parameter, opcode::OpCode},
        value::{DoubleVector, EvaluationResult},
    },
    util::num::count_to_f64,
};

/// Reduces the first operand to a scalar.
///
/// Vectors use population statistics. A scalar operand `s` follows a fixed
/// rule per aggregation:
///
/// | aggregation                            | result                     |
/// |----------------------------------------|----------------------------|
/// | mean, median, sum, min, max, quantile  | `s`                        |
/// | standard deviation, variance           | `0`                        |
/// | length                                 | `1`                        |
/// | skewness, kurtosis                     | as for `[s]` (undefined)   |
///
/// `Quantile` takes `q` from its second operand; `q` outside `[0, 1]` or a
/// vector `q` longer than one element gives `Undefined`.
///
/// # Example
/// ```
/// use symvec::interpreter::{
///     evaluator::{function::aggregation::apply, opcode::OpCode},
///     value::{DoubleVector, EvaluationResult},
/// };
///
/// let v = EvaluationResult::Vector(DoubleVector::new(vec![1.0, 2.0, 6.0]).unwrap());
/// assert_eq!(apply(OpCode::Mean, &[v.clone()]), EvaluationResult::Scalar(3.0));
/// assert_eq!(apply(OpCode::Length, &[v]), EvaluationResult::Scalar(3.0));
/// assert_eq!(apply(OpCode::Variance, &[EvaluationResult::Scalar(7.0)]),
///            EvaluationResult::Scalar(0.0));
/// ```
#[must_use]
pub fn apply(opcode: OpCode, operands: &[EvaluationResult]) -> EvaluationResult {
    let Some(operand) = operands.first() else {
        return EvaluationResult::Undefined;
    };
    match operand {
        EvaluationResult::Scalar(s) => scalar_rule(opcode, *s, operands),
        EvaluationResult::Vector(v) => reduce(opcode, v, operands),
        EvaluationResult::Undefined => EvaluationResult::Undefined,
    }
}

fn scalar_rule(opcode: OpCode, s: f64, operands: &[EvaluationResult]) -> EvaluationResult {
    match opcode {
        OpCode::Mean | OpCode::Median | OpCode::Sum | OpCode::Minimum | OpCode::Maximum => {
            EvaluationResult::scalar(s)
        },
        OpCode::Quantile => match operands.get(1).and_then(scalar_parameter) {
            Some(q) if (0.0..=1.0).contains(&q) => EvaluationResult::scalar(s),
            _ => EvaluationResult::Undefined,
        },
        OpCode::StandardDeviation | OpCode::Variance => EvaluationResult::Scalar(0.0),
        OpCode::Length => EvaluationResult::Scalar(1.0),
        _ => DoubleVector::new(vec![s]).map_or(EvaluationResult::Undefined, |v| {
                                            reduce(opcode, &v, operands)
                                        }),
    }
}

fn reduce(opcode: OpCode, v: &DoubleVector, operands: &[EvaluationResult]) -> EvaluationResult {
    let value = match opcode {
        OpCode::Mean => v.mean(),
        OpCode::Median => v.median(),
        OpCode::Sum => v.sum(),
        OpCode::Minimum => v.min(),
        OpCode::Maximum => v.max(),
        OpCode::Quantile => match operands.get(1).and_then(scalar_parameter) {
            Some(q) => v.quantile(q),
            None => f64::NAN,
        },
        OpCode::StandardDeviation => v.std_dev(),
        OpCode::Variance => v.variance(),
        OpCode::Skewness => v.skewness(),
        OpCode::Kurtosis => v.kurtosis(),
        OpCode::Length => count_to_f64(v.len()),
        _ => f64::NAN,
    };
    EvaluationResult::scalar(value)
}
