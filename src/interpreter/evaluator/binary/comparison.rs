use crate::{
    error::{EvalError, EvalResult},
    interpreter::{
        evaluator::{opcode::OpCode, reconcile::LengthStrategy},
        value::{DoubleVector, EvaluationResult},
    },
    util::num::count_to_f64,
};

/// Evaluates `EuclideanDistance`, `Covariance`, `PearsonCorrelation` and
/// `SpearmanRankCorrelation`.
///
/// Two scalars give `|a - b|` for the distance and `0` for the others. A
/// scalar next to a vector is repeated to the vector's length. Vectors of
/// different lengths go through `strategy`; the neutral padding for these
/// measures is NaN.
///
/// # Errors
/// `VectorLengthMismatch` from the strategy, or `MalformedTree` if called
/// with another opcode.
pub fn evaluate(opcode: OpCode,
                left: &EvaluationResult,
                right: &EvaluationResult,
                strategy: LengthStrategy)
                -> EvalResult<EvaluationResult> {
    use EvaluationResult::{Scalar, Undefined, Vector};

    let measure: fn(&DoubleVector, &DoubleVector) -> f64 = match opcode {
        OpCode::EuclideanDistance => distance,
        OpCode::Covariance => covariance,
        OpCode::PearsonCorrelation => pearson,
        OpCode::SpearmanRankCorrelation => spearman,
        _ => return Err(EvalError::malformed(format!("{opcode} is not a comparison opcode"))),
    };

    let (a, b) = match (left, right) {
        (Scalar(a), Scalar(b)) => {
            let value = if opcode == OpCode::EuclideanDistance { (a - b).abs() } else { 0.0 };
            return Ok(EvaluationResult::scalar(value));
        },
        (Scalar(a), Vector(b)) => (broadcast(*a, b.len())?, b.clone()),
        (Vector(a), Scalar(b)) => (a.clone(), broadcast(*b, a.len())?),
        (Vector(a), Vector(b)) => strategy.reconcile(a, b, f64::NAN)?,
        (Undefined, _) | (_, Undefined) => return Ok(Undefined),
    };
    Ok(EvaluationResult::scalar(measure(&a, &b)))
}

fn broadcast(value: f64, len: usize) -> EvalResult<DoubleVector> {
    DoubleVector::filled(value, len).ok_or_else(|| EvalError::malformed("empty vector operand"))
}

fn distance(a: &DoubleVector, b: &DoubleVector) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

fn covariance(a: &DoubleVector, b: &DoubleVector) -> f64 {
    let (ma, mb) = (a.mean(), b.mean());
    let sum: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - ma) * (y - mb)).sum();
    sum / count_to_f64(a.len())
}

fn pearson(a: &DoubleVector, b: &DoubleVector) -> f64 {
    covariance(a, b) / (a.std_dev() * b.std_dev())
}

fn spearman(a: &DoubleVector, b: &DoubleVector) -> f64 {
    match (a.ranks(), b.ranks()) {
        (Some(ra), Some(rb)) => pearson(&ra, &rb),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn vector(values: &[f64]) -> EvaluationResult {
        EvaluationResult::Vector(DoubleVector::from_slice(values).unwrap())
    }

    fn scalar_of(r: EvalResult<EvaluationResult>) -> f64 {
        r.unwrap().as_scalar().unwrap()
    }

    #[rstest]
    #[case(OpCode::EuclideanDistance, 2.0)]
    #[case(OpCode::Covariance, 0.0)]
    #[case(OpCode::PearsonCorrelation, 0.0)]
    #[case(OpCode::SpearmanRankCorrelation, 0.0)]
    fn scalar_pairs(#[case] opcode: OpCode, #[case] expected: f64) {
        let r = evaluate(opcode,
                         &EvaluationResult::Scalar(1.0),
                         &EvaluationResult::Scalar(3.0),
                         LengthStrategy::default());
        assert_relative_eq!(scalar_of(r), expected);
    }

    #[test]
    fn vector_measures() {
        let a = vector(&[1.0, 2.0, 3.0, 4.0]);
        let b = vector(&[2.0, 4.0, 6.0, 9.0]);
        let s = LengthStrategy::default();

        assert_relative_eq!(scalar_of(evaluate(OpCode::EuclideanDistance, &a, &a, s)), 0.0);
        assert_relative_eq!(scalar_of(evaluate(OpCode::Covariance, &a, &a, s)), 1.25);
        assert_relative_eq!(scalar_of(evaluate(OpCode::SpearmanRankCorrelation, &a, &b, s)),
                            1.0,
                            epsilon = 1e-12);
        assert!(scalar_of(evaluate(OpCode::PearsonCorrelation, &a, &b, s)) < 1.0);
    }

    #[test]
    fn nan_padding_makes_the_measure_undefined() {
        let r = evaluate(OpCode::EuclideanDistance,
                         &vector(&[1.0, 2.0, 3.0]),
                         &vector(&[1.0, 2.0]),
                         LengthStrategy::FillShorterWithNeutralElement).unwrap();
        assert!(r.is_undefined());
    }

    #[test]
    fn constant_vector_correlation_is_undefined() {
        let r = evaluate(OpCode::PearsonCorrelation,
                         &vector(&[1.0, 1.0]),
                         &vector(&[1.0, 2.0]),
                         LengthStrategy::default()).unwrap();
        assert!(r.is_undefined());
    }
}
