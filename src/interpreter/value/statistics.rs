use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::interpreter::value::vector::DoubleVector;

impl DoubleVector {
    /// The elements if all of them are finite.
    ///
    /// Every reduction below starts here, so one NaN or infinity anywhere in
    /// the vector turns the whole statistic into `NaN`.
    fn finite_values(&self) -> Option<&[f64]> {
        self.is_finite().then(|| self.values())
    }

    /// The elements sorted ascending, if all of them are finite.
    fn sorted_values(&self) -> Option<Vec<f64>> {
        let mut sorted = self.finite_values()?.to_vec();
        sorted.sort_by_key(|&v| OrderedFloat(v));
        Some(sorted)
    }

    /// Sum of all elements.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.finite_values().map_or(f64::NAN, |v| v.iter().sum())
    }

    /// Arithmetic mean.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> f64 {
        self.finite_values()
            .map_or(f64::NAN, |v| v.iter().sum::<f64>() / v.len() as f64)
    }

    /// Middle element, or the mean of the two middle elements.
    #[must_use]
    pub fn median(&self) -> f64 {
        let Some(sorted) = self.sorted_values() else {
            return f64::NAN;
        };
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            f64::midpoint(sorted[mid - 1], sorted[mid])
        }
    }

    /// Smallest element.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.finite_values()
            .map_or(f64::NAN, |v| v.iter().copied().fold(f64::INFINITY, f64::min))
    }

    /// Largest element.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.finite_values()
            .map_or(f64::NAN, |v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Quantile `q` using the median-unbiased estimator (R-8).
    ///
    /// `q` outside `[0, 1]` yields `NaN`.
    ///
    /// # Example
    /// ```
    /// use symvec::interpreter::value::DoubleVector;
    ///
    /// let v = DoubleVector::new(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
    /// assert_eq!(v.quantile(0.0), 1.0);
    /// assert_eq!(v.quantile(1.0), 4.0);
    /// assert!((v.quantile(0.5) - 2.5).abs() < 1e-12);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss)]
    pub fn quantile(&self, q: f64) -> f64 {
        if !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        let Some(sorted) = self.sorted_values() else {
            return f64::NAN;
        };
        let n = sorted.len() as f64;
        let h = (n + 1.0 / 3.0).mul_add(q, 1.0 / 3.0);
        if h <= 1.0 {
            return sorted[0];
        }
        if h >= n {
            return sorted[sorted.len() - 1];
        }
        let lo = h.floor();
        let i = lo as usize - 1;
        (h - lo).mul_add(sorted[i + 1] - sorted[i], sorted[i])
    }

    /// `k`-th central moment.
    #[allow(clippy::cast_precision_loss)]
    fn central_moment(values: &[f64], k: i32) -> f64 {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        values.iter().map(|v| (v - mean).powi(k)).sum::<f64>() / n
    }

    /// Population variance.
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.finite_values().map_or(f64::NAN, |v| Self::central_moment(v, 2))
    }

    /// Population standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Population skewness `m3 / m2^1.5`; `NaN` for constant vectors.
    #[must_use]
    pub fn skewness(&self) -> f64 {
        self.finite_values().map_or(f64::NAN, |v| {
                                let m2 = Self::central_moment(v, 2);
                                Self::central_moment(v, 3) / m2.powf(1.5)
                            })
    }

    /// Population excess kurtosis `m4 / m2^2 - 3`; `NaN` for constant
    /// vectors.
    #[must_use]
    pub fn kurtosis(&self) -> f64 {
        self.finite_values().map_or(f64::NAN, |v| {
                                let m2 = Self::central_moment(v, 2);
                                Self::central_moment(v, 4) / (m2 * m2) - 3.0
                            })
    }

    /// Index of the first largest element.
    #[must_use]
    pub fn arg_max(&self) -> Option<usize> {
        let values = self.finite_values()?;
        let mut best = 0;
        for (i, &v) in values.iter().enumerate() {
            if v > values[best] {
                best = i;
            }
        }
        Some(best)
    }

    /// Index of the first smallest element.
    #[must_use]
    pub fn arg_min(&self) -> Option<usize> {
        let values = self.finite_values()?;
        let mut best = 0;
        for (i, &v) in values.iter().enumerate() {
            if v < values[best] {
                best = i;
            }
        }
        Some(best)
    }

    /// One-based ranks; ties share the mean of the ranks they span.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ranks(&self) -> Option<Self> {
        let values = self.finite_values()?;
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by_key(|&i| OrderedFloat(values[i]));

        let mut ranks = vec![0.0; values.len()];
        let mut i = 0;
        while i < order.len() {
            let mut j = i;
            while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
                j += 1;
            }
            let rank = (i + j) as f64 / 2.0 + 1.0;
            for &k in &order[i..=j] {
                ranks[k] = rank;
            }
            i = j + 1;
        }
        Self::new(ranks)
    }

    /// Occurrence count per distinct value, in ascending value order.
    #[must_use]
    pub fn value_counts(&self) -> BTreeMap<OrderedFloat<f64>, usize> {
        let mut counts = BTreeMap::new();
        for v in self.iter() {
            *counts.entry(OrderedFloat(v)).or_insert(0) += 1;
        }
        counts
    }
}
