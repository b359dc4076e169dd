use std::{fmt, str::FromStr};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::{EvalError, EvalResult},
    interpreter::value::DoubleVector,
};

/// Policy for binary vector operations whose operands differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthStrategy {
    /// Fails with `VectorLengthMismatch`.
    #[default]
    ExceptionIfDifferent,
    /// Pads the shorter vector with NaN.
    #[serde(rename = "fill-shorter-with-nan")]
    FillShorterWithNaN,
    /// Pads the shorter vector with the operator's neutral element.
    FillShorterWithNeutralElement,
    /// Truncates the longer vector.
    CutLonger,
    /// Resamples the shorter vector to the longer length.
    ResampleToLonger,
    /// Resamples the longer vector to the shorter length.
    ResampleToShorter,
    /// Repeats the shorter vector up to the longer length.
    CycleShorter,
}

const STRATEGY_NAMES: &[(LengthStrategy, &str)] =
    &[(LengthStrategy::ExceptionIfDifferent, "exception-if-different"),
      (LengthStrategy::FillShorterWithNaN, "fill-shorter-with-nan"),
      (LengthStrategy::FillShorterWithNeutralElement, "fill-shorter-with-neutral-element"),
      (LengthStrategy::CutLonger, "cut-longer"),
      (LengthStrategy::ResampleToLonger, "resample-to-longer"),
      (LengthStrategy::ResampleToShorter, "resample-to-shorter"),
      (LengthStrategy::CycleShorter, "cycle-shorter")];

impl LengthStrategy {
    /// Brings `left` and `right` to a common length.
    ///
    /// `neutral` is the padding used by `FillShorterWithNeutralElement`; equal
    /// lengths are returned unchanged under every strategy.
    ///
    /// # Errors
    /// `VectorLengthMismatch` under `ExceptionIfDifferent` when the lengths
    /// differ.
    ///
    /// # Example
    /// ```
    /// use symvec::interpreter::{evaluator::reconcile::LengthStrategy, value::DoubleVector};
    ///
    /// let long = DoubleVector::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    /// let short = DoubleVector::new(vec![6.0, 7.0, 8.0]).unwrap();
    ///
    /// let (a, b) = LengthStrategy::CutLonger.reconcile(&long, &short, 0.0).unwrap();
    /// assert_eq!(a.values(), &[1.0, 2.0, 3.0]);
    /// assert_eq!(b.values(), &[6.0, 7.0, 8.0]);
    ///
    /// assert!(LengthStrategy::ExceptionIfDifferent.reconcile(&long, &short, 0.0).is_err());
    /// ```
    pub fn reconcile(self,
                     left: &DoubleVector,
                     right: &DoubleVector,
                     neutral: f64)
                     -> EvalResult<(DoubleVector, DoubleVector)> {
        let (l, r) = (left.len(), right.len());
        if l == r {
            return Ok((left.clone(), right.clone()));
        }
        let longer = l.max(r);
        let shorter = l.min(r);

        let reconciled = match self {
            Self::ExceptionIfDifferent => {
                return Err(EvalError::VectorLengthMismatch { left: l, right: r });
            },
            Self::FillShorterWithNaN => {
                (left.padded(longer, f64::NAN), right.padded(longer, f64::NAN))
            },
            Self::FillShorterWithNeutralElement => {
                (left.padded(longer, neutral), right.padded(longer, neutral))
            },
            Self::CutLonger => (left.truncated(shorter), right.truncated(shorter)),
            Self::ResampleToLonger => (resample(left, longer)?, resample(right, longer)?),
            Self::ResampleToShorter => (resample(left, shorter)?, resample(right, shorter)?),
            Self::CycleShorter => (left.cycled(longer), right.cycled(longer)),
        };
        warn!("reconciled vector lengths {l} and {r} to {} using {self}", reconciled.0.len());
        Ok(reconciled)
    }
}

fn resample(v: &DoubleVector, len: usize) -> EvalResult<DoubleVector> {
    v.resampled(len)
     .ok_or_else(|| EvalError::malformed("cannot resample a vector to length 0"))
}

impl fmt::Display for LengthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = STRATEGY_NAMES.iter()
                                 .find(|(s, _)| s == self)
                                 .map_or("unknown", |(_, n)| n);
        f.write_str(name)
    }
}

impl FromStr for LengthStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STRATEGY_NAMES.iter()
                      .find(|(_, n)| *n == s)
                      .map(|(strategy, _)| *strategy)
                      .ok_or_else(|| {
                          let known: Vec<_> = STRATEGY_NAMES.iter().map(|(_, n)| *n).collect();
                          format!("unknown length strategy '{s}', expected one of: {}",
                                  known.join(", "))
                      })
    }
}
