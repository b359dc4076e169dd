/// Immutable numeric vector.
///
/// Defines `DoubleVector`, the fixed-length, never-empty vector value bound to
/// vector-valued dataset columns. Every producing operation allocates a new
/// vector, so instances can be shared freely.
pub mod vector;
/// Population statistics over vectors.
///
/// Reductions used by the aggregation and time-series opcodes. All of them
/// return `NaN` as soon as any element is non-finite.
pub mod statistics;
/// Tagged evaluation results.
///
/// Defines `EvaluationResult`, the scalar/vector/undefined union produced for
/// every instruction of a linearized formula.
pub mod result;

pub use result::EvaluationResult;
pub use vector::DoubleVector;
