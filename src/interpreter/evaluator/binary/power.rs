use crate::{
    error::{EvalError, EvalResult},
    interpreter::{
        evaluator::{binary::arithmetic::combine, opcode::OpCode, reconcile::LengthStrategy},
        value::EvaluationResult,
    },
    util::num::round_even,
};

/// Evaluates `Power` (`a ^ round(b)`) and `Root` (`a ^ (1 / round(b))`).
///
/// Operands of different lengths are always cut to the shorter length,
/// whatever strategy the interpreter is configured with.
///
/// # Errors
/// `MalformedTree` if called with another opcode.
///
/// # Example
/// ```
/// use symvec::interpreter::{
///     evaluator::{binary::power::evaluate, opcode::OpCode},
///     value::EvaluationResult,
/// };
///
/// let r = evaluate(OpCode::Power, &EvaluationResult::Scalar(2.0), &EvaluationResult::Scalar(2.6));
/// assert_eq!(r.unwrap(), EvaluationResult::Scalar(8.0));
///
/// let r = evaluate(OpCode::Root, &EvaluationResult::Scalar(27.0), &EvaluationResult::Scalar(3.0));
/// assert!((r.unwrap().as_scalar().unwrap() - 3.0).abs() < 1e-12);
/// ```
pub fn evaluate(opcode: OpCode,
                base: &EvaluationResult,
                exponent: &EvaluationResult)
                -> EvalResult<EvaluationResult> {
    let strategy = LengthStrategy::CutLonger;
    match opcode {
        OpCode::Power => combine(base, exponent, strategy, 1.0, |a, b| a.powf(round_even(b))),
        OpCode::Root => {
            combine(base, exponent, strategy, 1.0, |a, b| a.powf(1.0 / round_even(b)))
        },
        _ => Err(EvalError::malformed(format!("{opcode} is not a power opcode"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::DoubleVector;

    fn vector(values: &[f64]) -> EvaluationResult {
        EvaluationResult::Vector(DoubleVector::from_slice(values).unwrap())
    }

    #[test]
    fn power_cuts_the_longer_operand() {
        let r = evaluate(OpCode::Power, &vector(&[1.0, 2.0, 3.0]), &vector(&[2.0, 3.0])).unwrap();
        assert_eq!(r, vector(&[1.0, 8.0]));
    }

    #[test]
    fn zeroth_root_is_undefined_for_large_base() {
        let r = evaluate(OpCode::Root,
                         &EvaluationResult::Scalar(2.0),
                         &EvaluationResult::Scalar(0.2)).unwrap();
        assert!(r.is_undefined());
    }

    #[test]
    fn even_root_of_negative_is_undefined() {
        let r = evaluate(OpCode::Root,
                         &EvaluationResult::Scalar(-4.0),
                         &EvaluationResult::Scalar(2.0)).unwrap();
        assert!(r.is_undefined());
    }
}
