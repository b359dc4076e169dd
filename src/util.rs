/// Numeric conversion helpers.
///
/// This module collects the float-to-integer conversions the evaluator needs:
/// rounding exponents and lags, and mapping relative window bounds onto
/// absolute vector indices. Every helper reports values that cannot be
/// converted instead of truncating them silently.
pub mod num;
