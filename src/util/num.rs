/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;

/// Rounds to the nearest integer, resolving ties to the even neighbour.
///
/// Exponents, root indices, lags and peak distances are all rounded this way.
///
/// ## Example
/// ```
/// use symvec::util::num::round_even;
///
/// assert_eq!(round_even(2.5), 2.0);
/// assert_eq!(round_even(3.5), 4.0);
/// assert_eq!(round_even(-1.2), -1.0);
/// ```
#[must_use]
pub fn round_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Rounds `value` and converts it to an `i32`.
///
/// ## Returns
/// - `Some(i32)`: The rounded value if it is finite and fits.
/// - `None`: For NaN, infinities and out-of-range values.
///
/// ## Example
/// ```
/// use symvec::util::num::rounded_i32;
///
/// assert_eq!(rounded_i32(2.4), Some(2));
/// assert_eq!(rounded_i32(f64::NAN), None);
/// assert_eq!(rounded_i32(1e20), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rounded_i32(value: f64) -> Option<i32> {
    let rounded = round_even(value);
    if !rounded.is_finite() || rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return None;
    }
    Some(rounded as i32)
}

/// Rounds `value` and converts it to a non-negative count, mapping negative
/// values to `0`.
///
/// ## Returns
/// - `Some(usize)`: The rounded, clamped value.
/// - `None`: For NaN, infinities and values beyond [`MAX_SAFE_INT`].
///
/// ## Example
/// ```
/// use symvec::util::num::rounded_count;
///
/// assert_eq!(rounded_count(3.2), Some(3));
/// assert_eq!(rounded_count(-4.0), Some(0));
/// assert_eq!(rounded_count(f64::INFINITY), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rounded_count(value: f64) -> Option<usize> {
    let rounded = round_even(value);
    if !rounded.is_finite() || rounded > MAX_SAFE_INT {
        return None;
    }
    Some(rounded.max(0.0) as usize)
}

/// Maps a relative position onto an absolute index of a vector of length
/// `len`: `clamp(round(relative * (len + 1)), 0, len)`.
///
/// ## Returns
/// - `Some(usize)`: The index in `0..=len`.
/// - `None`: If `relative` is NaN or infinite.
///
/// ## Example
/// ```
/// use symvec::util::num::relative_to_index;
///
/// assert_eq!(relative_to_index(0.0, 4), Some(0));
/// assert_eq!(relative_to_index(1.0, 4), Some(4));
/// assert_eq!(relative_to_index(0.4, 4), Some(2));
/// assert_eq!(relative_to_index(-3.0, 4), Some(0));
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss)]
pub fn relative_to_index(relative: f64, len: usize) -> Option<usize> {
    if !relative.is_finite() {
        return None;
    }
    let len_f = len as f64;
    let index = round_even(relative * (len_f + 1.0)).clamp(0.0, len_f);
    Some(index as usize)
}

/// Converts a count to `f64`.
///
/// Counts handled here are vector lengths and indices, far below
/// [`MAX_SAFE_INT`], so the conversion is exact.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn count_to_f64(value: usize) -> f64 {
    value as f64
}
