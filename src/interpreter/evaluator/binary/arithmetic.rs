use crate::{
    error::{EvalError, EvalResult},
    interpreter::{
        evaluator::{opcode::OpCode, reconcile::LengthStrategy},
        value::EvaluationResult,
    },
};

/// Applies `f` to two operands with scalar broadcasting.
///
/// A scalar is combined with every element of a vector; two vectors of
/// different lengths are first reconciled with `strategy`, padding with
/// `neutral` where the strategy asks for a neutral element.
///
/// # Errors
/// `VectorLengthMismatch` from the strategy.
pub fn combine<F>(left: &EvaluationResult,
                  right: &EvaluationResult,
                  strategy: LengthStrategy,
                  neutral: f64,
                  f: F)
                  -> EvalResult<EvaluationResult>
    where F: Fn(f64, f64) -> f64
{
    use EvaluationResult::{Scalar, Undefined, Vector};

    let result = match (left, right) {
        (Scalar(a), Scalar(b)) => EvaluationResult::scalar(f(*a, *b)),
        (Scalar(a), Vector(b)) => EvaluationResult::vector(b.map(|y| f(*a, y))),
        (Vector(a), Scalar(b)) => EvaluationResult::vector(a.map(|x| f(x, *b))),
        (Vector(a), Vector(b)) => {
            let (a, b) = strategy.reconcile(a, b, neutral)?;
            EvaluationResult::vector(a.zip_with(&b, f)?)
        },
        (Undefined, _) | (_, Undefined) => Undefined,
    };
    Ok(result)
}

/// Applies `f` to every element of a scalar or vector operand.
#[must_use]
pub fn map<F>(operand: &EvaluationResult, f: F) -> EvaluationResult
    where F: Fn(f64) -> f64
{
    match operand {
        EvaluationResult::Scalar(v) => EvaluationResult::scalar(f(*v)),
        EvaluationResult::Vector(v) => EvaluationResult::vector(v.map(f)),
        EvaluationResult::Undefined => EvaluationResult::Undefined,
    }
}

/// Evaluates `Add`, `Sub`, `Mul` and `Div` as a left fold.
///
/// With a single operand `Sub` negates and `Div` takes the reciprocal. The
/// running result collapses to `Undefined` as soon as it stops being finite.
///
/// # Errors
/// `VectorLengthMismatch` from the strategy, or `MalformedTree` if called
/// with another opcode or without operands.
///
/// # Example
/// ```
/// use symvec::interpreter::{
///     evaluator::{binary::arithmetic::nary, opcode::OpCode, reconcile::LengthStrategy},
///     value::{DoubleVector, EvaluationResult},
/// };
///
/// let v = EvaluationResult::Vector(DoubleVector::new(vec![1.0, 2.0]).unwrap());
/// let s = EvaluationResult::Scalar(10.0);
/// let sum = nary(OpCode::Add, &[s, v], LengthStrategy::default()).unwrap();
/// assert_eq!(sum.as_vector().unwrap().values(), &[11.0, 12.0]);
/// ```
pub fn nary(opcode: OpCode,
            operands: &[EvaluationResult],
            strategy: LengthStrategy)
            -> EvalResult<EvaluationResult> {
    let (op, neutral): (fn(f64, f64) -> f64, f64) = match opcode {
        OpCode::Add => (|a, b| a + b, 0.0),
        OpCode::Sub => (|a, b| a - b, 0.0),
        OpCode::Mul => (|a, b| a * b, 1.0),
        OpCode::Div => (|a, b| a / b, 1.0),
        _ => return Err(EvalError::malformed(format!("{opcode} is not an arithmetic opcode"))),
    };

    let (first, rest) = operands.split_first()
                                .ok_or_else(|| EvalError::malformed(format!("{opcode} without operands")))?;
    if rest.is_empty() {
        return Ok(match opcode {
            OpCode::Sub => map(first, |x| -x),
            OpCode::Div => map(first, |x| 1.0 / x),
            _ => first.clone(),
        });
    }

    let mut acc = first.clone();
    for operand in rest {
        acc = combine(&acc, operand, strategy, neutral, op)?;
        if acc.is_undefined() {
            break;
        }
    }
    Ok(acc)
}

/// `a / sqrt(1 + b^2)`, reconciled with the configured strategy.
///
/// # Errors
/// `VectorLengthMismatch` from the strategy.
pub fn analytic_quotient(a: &EvaluationResult,
                         b: &EvaluationResult,
                         strategy: LengthStrategy)
                         -> EvalResult<EvaluationResult> {
    combine(a, b, strategy, 0.0, |x, y| x / y.mul_add(y, 1.0).sqrt())
}
