/// Simplifier entry point and configuration.
///
/// Contains `Simplifier`, which runs bottom-up rewrite passes to a fixpoint,
/// and the `SimplifierConfig` bounding passes and tree depth.
pub mod core;

/// Expansion of automatically defined functions.
///
/// Inlines `InvokeFunction` nodes with the body of the named `Defun`,
/// substituting arguments for `Argument` placeholders.
pub mod composite;

/// Static shape and definedness analysis.
///
/// Decides, without a dataset, whether a subtree may evaluate to a vector,
/// can ever be `Undefined`, or is never negative.
pub mod shape;

/// Weighted terminals and merge keys.
///
/// Groups terminals that read the same data so sums and products can merge
/// their weights.
pub mod terms;

/// Rewrites of `Addition` and `Subtraction`.
pub mod sum;

/// Rewrites of `Multiplication` and `Division`.
pub mod product;

/// Rewrites of powers, roots and elementwise functions.
pub mod functions;

/// Distribution of aggregations over sums and products.
pub mod aggregation;
