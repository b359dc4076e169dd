use std::fmt;

use crate::interpreter::value::vector::DoubleVector;

/// Outcome of evaluating one instruction for one row.
///
/// `Undefined` carries no payload. The constructors [`Self::scalar`] and
/// [`Self::vector`] collapse non-finite values to `Undefined`, so a `Scalar`
/// or `Vector` built through them is always finite.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    /// A single number.
    Scalar(f64),
    /// A vector of numbers.
    Vector(DoubleVector),
    /// No usable value: out-of-range data or a non-finite intermediate.
    Undefined,
}

impl EvaluationResult {
    /// A scalar result, or `Undefined` if `value` is NaN or infinite.
    ///
    /// # Example
    /// ```
    /// use symvec::interpreter::value::EvaluationResult;
    ///
    /// assert_eq!(EvaluationResult::scalar(2.0), EvaluationResult::Scalar(2.0));
    /// assert_eq!(EvaluationResult::scalar(f64::NAN), EvaluationResult::Undefined);
    /// ```
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        if value.is_finite() { Self::Scalar(value) } else { Self::Undefined }
    }

    /// A vector result, or `Undefined` if any element is NaN or infinite.
    #[must_use]
    pub fn vector(value: DoubleVector) -> Self {
        if value.is_finite() { Self::Vector(value) } else { Self::Undefined }
    }

    /// `false` for `Undefined`; otherwise `true` iff no element is NaN or
    /// infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(v) => v.is_finite(),
            Self::Vector(v) => v.is_finite(),
            Self::Undefined => false,
        }
    }

    /// Re-applies the finiteness collapse.
    #[must_use]
    pub fn finite(self) -> Self {
        if self.is_finite() { self } else { Self::Undefined }
    }

    /// `true` for `Undefined`.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// `true` for `Vector`.
    #[must_use]
    pub const fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    /// The scalar payload.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The vector payload.
    #[must_use]
    pub const fn as_vector(&self) -> Option<&DoubleVector> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a vector; a scalar becomes a length-1 vector.
    #[must_use]
    pub fn to_vector(&self) -> Option<DoubleVector> {
        match self {
            Self::Scalar(v) => DoubleVector::new(vec![*v]),
            Self::Vector(v) => Some(v.clone()),
            Self::Undefined => None,
        }
    }
}

impl From<f64> for EvaluationResult {
    fn from(value: f64) -> Self {
        Self::scalar(value)
    }
}

impl From<DoubleVector> for EvaluationResult {
    fn from(value: DoubleVector) -> Self {
        Self::vector(value)
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Vector(v) => write!(f, "{v}"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}
