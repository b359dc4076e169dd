/// Symbol kinds and their static descriptors.
///
/// Declares the closed `Symbol` enum together with a process-wide registry of
/// descriptors (display name, formula keyword, arity). The registry is built
/// once at compile time and never mutated.
///
/// # Responsibilities
/// - Enumerates every node kind the evaluator and simplifier understand.
/// - Provides arity bounds used to validate trees.
/// - Classifies symbols into families (terminals, aggregations, ...).
pub mod symbol;
/// Tree nodes and their per-kind parameters.
///
/// A formula is a tree of [`node::SymbolicNode`] values. Each node owns its
/// children, so cloning a node clones the whole subtree; the simplifier relies
/// on this to work on a private copy of the caller's tree.
pub mod node;

pub use node::{
    BinaryFactorParams, DataType, FactorParams, NodeParams, SymbolicNode, VariableParams,
    WindowParams,
};
pub use symbol::{Arity, SYMBOLS, Symbol, SymbolDef};
