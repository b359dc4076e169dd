use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

/// An immutable, non-empty vector of `f64` values.
///
/// Elementwise operations broadcast a length-1 operand against any length and
/// otherwise require equal lengths; callers reconcile mismatched lengths
/// beforehand. The storage is reference counted, so cloning is cheap and
/// safe across threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct DoubleVector {
    values: Arc<[f64]>,
}

impl DoubleVector {
    /// Creates a vector, or `None` if `values` is empty.
    ///
    /// # Example
    /// ```
    /// use symvec::interpreter::value::DoubleVector;
    ///
    /// let v = DoubleVector::new(vec![1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(v.len(), 3);
    /// assert!(DoubleVector::new(Vec::new()).is_none());
    /// ```
    #[must_use]
    pub fn new(values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self { values: values.into() })
    }

    /// Creates a vector from a slice, or `None` if it is empty.
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        Self::new(values.to_vec())
    }

    /// A vector of `len` copies of `value`, or `None` if `len` is zero.
    #[must_use]
    pub fn filled(value: f64, len: usize) -> Option<Self> {
        Self::new(vec![value; len])
    }

    /// Number of elements; at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The elements.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// The first element.
    #[must_use]
    pub fn first(&self) -> f64 {
        self.values[0]
    }

    /// `true` iff no element is NaN or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Applies `f` to every element.
    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
        where F: Fn(f64) -> f64
    {
        Self { values: self.values.iter().map(|&v| f(v)).collect() }
    }

    /// Combines two vectors element by element.
    ///
    /// A length-1 operand is broadcast against the other one.
    ///
    /// # Errors
    /// `VectorLengthMismatch` if both lengths differ and neither is 1.
    ///
    /// # Example
    /// ```
    /// use symvec::interpreter::value::DoubleVector;
    ///
    /// let a = DoubleVector::new(vec![1.0, 2.0, 3.0]).unwrap();
    /// let b = DoubleVector::new(vec![10.0]).unwrap();
    /// let c = a.zip_with(&b, |x, y| x + y).unwrap();
    /// assert_eq!(c.values(), &[11.0, 12.0, 13.0]);
    /// ```
    pub fn zip_with<F>(&self, other: &Self, f: F) -> EvalResult<Self>
        where F: Fn(f64, f64) -> f64
    {
        let values = match (self.len(), other.len()) {
            (l, r) if l == r => self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect(),
            (_, 1) => {
                let b = other.first();
                self.iter().map(|a| f(a, b)).collect()
            },
            (1, _) => {
                let a = self.first();
                other.iter().map(|b| f(a, b)).collect()
            },
            (left, right) => return Err(EvalError::VectorLengthMismatch { left, right }),
        };
        Ok(Self { values })
    }

    /// The elements in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self { values: self.values.iter().rev().copied().collect() }
    }

    /// The first `len` elements; the whole vector if it is not longer.
    #[must_use]
    pub fn truncated(&self, len: usize) -> Self {
        if len == 0 || len >= self.len() {
            return self.clone();
        }
        Self { values: self.values[..len].into() }
    }

    /// The vector extended to `len` elements with copies of `fill`.
    #[must_use]
    pub fn padded(&self, len: usize, fill: f64) -> Self {
        if len <= self.len() {
            return self.clone();
        }
        let mut values = self.values.to_vec();
        values.resize(len, fill);
        Self { values: values.into() }
    }

    /// The vector repeated cyclically until it has `len` elements.
    #[must_use]
    pub fn cycled(&self, len: usize) -> Self {
        if len <= self.len() {
            return self.clone();
        }
        Self { values: self.values.iter().copied().cycle().take(len).collect() }
    }

    /// Copies a contiguous or wrap-around window.
    ///
    /// With `start <= end` the window is `[start, end)`. With
    /// `allow_round_trip` and `start > end` it is `[start, len)` followed by
    /// `[0, end)`.
    ///
    /// Returns `None` if the window is empty, reaches past the end, or has
    /// `start > end` without round trips.
    ///
    /// # Example
    /// ```
    /// use symvec::interpreter::value::DoubleVector;
    ///
    /// let v = DoubleVector::new(vec![3.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(v.sub_vector(1, 3, false).unwrap().values(), &[5.0, 7.0]);
    /// assert_eq!(v.sub_vector(2, 1, true).unwrap().values(), &[7.0, 9.0, 3.0]);
    /// assert!(v.sub_vector(2, 1, false).is_none());
    /// ```
    #[must_use]
    pub fn sub_vector(&self, start: usize, end: usize, allow_round_trip: bool) -> Option<Self> {
        let len = self.len();
        if start > len || end > len {
            return None;
        }
        if start <= end {
            return Self::from_slice(&self.values[start..end]);
        }
        if !allow_round_trip {
            return None;
        }
        let mut values = Vec::with_capacity(len - start + end);
        values.extend_from_slice(&self.values[start..]);
        values.extend_from_slice(&self.values[..end]);
        Self::new(values)
    }

    /// Linearly resamples the vector to `len` elements.
    ///
    /// The piecewise linear interpolant through `(i, v[i])` is sampled at
    /// `len` evenly spaced positions from `0` to `self.len() - 1`, so both
    /// end points are kept. Returns `None` if `len` is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss)]
    pub fn resampled(&self, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        if len == self.len() {
            return Some(self.clone());
        }
        let n = self.len();
        if n == 1 {
            return Self::filled(self.first(), len);
        }
        if len == 1 {
            return Self::new(vec![self.first()]);
        }

        let step = (n - 1) as f64 / (len - 1) as f64;
        let values = (0..len).map(|i| {
                                 let x = i as f64 * step;
                                 let lo = (x.floor() as usize).min(n - 1);
                                 let hi = (lo + 1).min(n - 1);
                                 let frac = x - lo as f64;
                                 self.values[lo] + frac * (self.values[hi] - self.values[lo])
                             })
                             .collect();
        Self::new(values)
    }
}

impl TryFrom<Vec<f64>> for DoubleVector {
    type Error = &'static str;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values).ok_or("a vector needs at least one element")
    }
}

impl From<DoubleVector> for Vec<f64> {
    fn from(v: DoubleVector) -> Self {
        v.values.to_vec()
    }
}

impl std::fmt::Display for DoubleVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}
