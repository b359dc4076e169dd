use crate::{
    interpreter::{
        evaluator::{function::scalar_parameter, opcode::OpCode},
        value::{DoubleVector, EvaluationResult},
    },
    util::num::{count_to_f64, rounded_count},
};

/// Evaluates a time-series feature.
///
/// The first operand is the series; a scalar is treated as a series of
/// length one. Features with a second operand read it as a scalar
/// parameter. Boolean features yield `1` or `0`.
///
/// # Example
/// ```
/// use symvec::interpreter::{
///     evaluator::{function::timeseries::apply, opcode::OpCode},
///     value::{DoubleVector, EvaluationResult},
/// };
///
/// let v = EvaluationResult::Vector(DoubleVector::new(vec![1.0, 5.0, 6.0, 0.0, 7.0]).unwrap());
/// let strike = apply(OpCode::LongestStrikeAbove, &[v, EvaluationResult::Scalar(2.0)]);
/// assert_eq!(strike, EvaluationResult::Scalar(2.0));
/// ```
#[must_use]
pub fn apply(opcode: OpCode, operands: &[EvaluationResult]) -> EvaluationResult {
    let Some(series) = operands.first().and_then(EvaluationResult::to_vector) else {
        return EvaluationResult::Undefined;
    };
    if !series.is_finite() {
        return EvaluationResult::Undefined;
    }
    let parameter = operands.get(1).and_then(scalar_parameter);
    let v = series.values();

    let value = match (opcode, parameter) {
        (OpCode::AbsoluteEnergy, _) => v.iter().map(|x| x * x).sum(),
        (OpCode::AbsoluteSumOfChanges, _) => changes(v).map(f64::abs).sum(),
        (OpCode::CountAboveMean, _) => {
            let mean = series.mean();
            count_to_f64(v.iter().filter(|&&x| x > mean).count())
        },
        (OpCode::CountBelowMean, _) => {
            let mean = series.mean();
            count_to_f64(v.iter().filter(|&&x| x < mean).count())
        },
        (OpCode::FirstIndexMax, _) => relative_position(series.arg_max(), v.len()),
        (OpCode::FirstIndexMin, _) => relative_position(series.arg_min(), v.len()),
        (OpCode::LastIndexMax, _) => 1.0 - relative_position(series.reversed().arg_max(), v.len()),
        (OpCode::LastIndexMin, _) => 1.0 - relative_position(series.reversed().arg_min(), v.len()),
        (OpCode::MeanAbsoluteChange, _) => {
            changes(v).map(f64::abs).sum::<f64>() / count_to_f64(v.len() - 1)
        },
        (OpCode::MeanChange, _) => changes(v).sum::<f64>() / count_to_f64(v.len() - 1),
        (OpCode::MeanSecondDerivativeCentral, _) => mean_second_derivative_central(v),
        (OpCode::HasVarianceLargerThanStd, _) => indicator(series.variance() > series.std_dev()),
        (OpCode::SumOfReoccurringValues, _) => {
            series.value_counts()
                  .into_iter()
                  .filter(|&(_, count)| count > 1)
                  .map(|(value, _)| value.into_inner())
                  .sum()
        },
        (OpCode::LongestStrikeAbove, Some(threshold)) => longest_strike(v, |x| x > threshold),
        (OpCode::LongestStrikeBelow, Some(threshold)) => longest_strike(v, |x| x < threshold),
        (OpCode::LaggedAutocorrelation, Some(lag)) => {
            rounded_count(lag).map_or(f64::NAN, |lag| autocorrelation(&series, lag))
        },
        (OpCode::CountNumberOfPeaks, Some(distance)) => {
            rounded_count(distance).map_or(f64::NAN, |d| count_to_f64(count_peaks(v, d)))
        },
        (OpCode::RatioBeyondRSigma, Some(r)) => {
            let (mean, std) = (series.mean(), series.std_dev());
            let beyond = v.iter().filter(|&&x| (x - mean).abs() > r * std).count();
            count_to_f64(beyond) / count_to_f64(v.len())
        },
        (OpCode::HasLargeStandardDeviation, Some(r)) => {
            indicator(series.std_dev() > r * (series.max() - series.min()))
        },
        (OpCode::IsSymmetricLooking, Some(r)) => {
            indicator((series.mean() - series.median()).abs() < r * (series.max() - series.min()))
        },
        _ => f64::NAN,
    };
    EvaluationResult::scalar(value)
}

fn changes(v: &[f64]) -> impl Iterator<Item = f64> + '_ {
    v.windows(2).map(|w| w[1] - w[0])
}

const fn indicator(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

fn relative_position(index: Option<usize>, len: usize) -> f64 {
    index.map_or(f64::NAN, |i| count_to_f64(i) / count_to_f64(len))
}

fn mean_second_derivative_central(v: &[f64]) -> f64 {
    if v.len() < 3 {
        return f64::NAN;
    }
    let sum: f64 = v.windows(3).map(|w| (w[2] - 2.0 * w[1] + w[0]) / 2.0).sum();
    sum / count_to_f64(v.len() - 2)
}

fn longest_strike<F>(v: &[f64], predicate: F) -> f64
    where F: Fn(f64) -> bool
{
    let mut longest = 0;
    let mut current = 0;
    for &x in v {
        if predicate(x) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    count_to_f64(longest)
}

/// `Σ (v[i] - mean)(v[i + lag] - mean) / variance` over all `i` with
/// `i + lag < len`; not divided by the number of terms.
fn autocorrelation(series: &DoubleVector, lag: usize) -> f64 {
    let v = series.values();
    let mean = series.mean();
    let sum: f64 = v.iter()
                    .zip(v.iter().skip(lag))
                    .map(|(a, b)| (a - mean) * (b - mean))
                    .sum();
    sum / series.variance()
}

/// Counts indices whose value is at least every neighbour within `distance`
/// on both sides. Neighbour indices are clamped to the vector, so a boundary
/// index is compared with itself where a neighbour is missing. Distances past
/// the last index only repeat the boundary comparisons.
fn count_peaks(v: &[f64], distance: usize) -> usize {
    let last = v.len() - 1;
    let distance = distance.min(last);
    (0..v.len()).filter(|&i| {
                    (1..=distance).all(|d| {
                                      let left = i.saturating_sub(d);
                                      let right = (i + d).min(last);
                                      v[i] >= v[left] && v[i] >= v[right]
                                  })
                })
                .count()
}
