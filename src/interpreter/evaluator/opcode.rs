use std::collections::HashMap;

use crate::tree::Symbol;

/// Defines the opcode set by generating the `OpCode` enum and its default
/// symbol mapping.
///
/// Each entry lists the opcode and the symbols it is the default for. Symbols
/// that appear in no entry (program structure and composite functions) have no
/// opcode and cannot be linearized.
macro_rules! opcodes {
    (
        $(
            $(#[$meta:meta])*
            $opcode:ident => [$($symbol:ident),+ $(,)?]
        ),* $(,)?
    ) => {
        /// Dispatch code of a linearized instruction.
        ///
        /// The discriminant fits in a byte; the evaluator dispatches over the
        /// enum with one exhaustive match.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum OpCode {
            $(
                $(#[$meta])*
                $opcode,
            )*
        }

        impl OpCode {
            /// The opcode a symbol maps to by default, if any.
            ///
            /// # Example
            /// ```
            /// use symvec::{interpreter::evaluator::opcode::OpCode, tree::Symbol};
            ///
            /// assert_eq!(OpCode::default_for(Symbol::Addition), Some(OpCode::Add));
            /// assert_eq!(OpCode::default_for(Symbol::Number), Some(OpCode::Constant));
            /// assert_eq!(OpCode::default_for(Symbol::InvokeFunction), None);
            /// ```
            #[must_use]
            pub const fn default_for(symbol: Symbol) -> Option<Self> {
                match symbol {
                    $(
                        $(Symbol::$symbol)|+ => Some(Self::$opcode),
                    )*
                    _ => None,
                }
            }

            /// The symbols this opcode is the default for. A remapped symbol
            /// must have the shape of one of them.
            #[must_use]
            pub const fn symbols(self) -> &'static [Symbol] {
                match self {
                    $(
                        Self::$opcode => &[$(Symbol::$symbol),+],
                    )*
                }
            }
        }
    };
}

opcodes! {
    /// Numeric literal.
    Constant => [Number, Constant],
    /// Weighted column value.
    Variable => [Variable],
    /// Weighted column value at a row offset.
    LaggedVariable => [LaggedVariable],
    /// Per-category weight.
    FactorVariable => [FactorVariable],
    /// Weight of one category.
    BinaryFactorVariable => [BinaryFactorVariable],

    /// N-ary sum.
    Add => [Addition],
    /// N-ary difference or negation.
    Sub => [Subtraction],
    /// N-ary product.
    Mul => [Multiplication],
    /// N-ary quotient or reciprocal.
    Div => [Division],
    /// `a ^ round(b)`.
    Power => [Power],
    /// `a ^ (1 / round(b))`.
    Root => [Root],
    /// `a / sqrt(1 + b^2)`.
    AnalyticQuotient => [AnalyticQuotient],

    Absolute => [Absolute],
    Sine => [Sine],
    Cosine => [Cosine],
    Tangent => [Tangent],
    HyperbolicTangent => [HyperbolicTangent],
    Square => [Square],
    SquareRoot => [SquareRoot],
    Cube => [Cube],
    CubeRoot => [CubeRoot],
    Exponential => [Exponential],
    Logarithm => [Logarithm],

    Mean => [Mean],
    Median => [Median],
    Sum => [Sum],
    Minimum => [Minimum],
    Maximum => [Maximum],
    Quantile => [Quantile],
    StandardDeviation => [StandardDeviation],
    Variance => [Variance],
    Skewness => [Skewness],
    Kurtosis => [Kurtosis],
    Length => [Length],

    EuclideanDistance => [EuclideanDistance],
    Covariance => [Covariance],
    PearsonCorrelation => [PearsonCorrelation],
    SpearmanRankCorrelation => [SpearmanRankCorrelation],

    /// Window with bounds stored on the node.
    SubVector => [SubVector],
    /// Window with evaluated bounds.
    SubVectorSubtree => [SubVectorSubtree],

    AbsoluteEnergy => [AbsoluteEnergy],
    AbsoluteSumOfChanges => [AbsoluteSumOfChanges],
    CountAboveMean => [CountAboveMean],
    CountBelowMean => [CountBelowMean],
    FirstIndexMax => [FirstIndexMax],
    FirstIndexMin => [FirstIndexMin],
    LastIndexMax => [LastIndexMax],
    LastIndexMin => [LastIndexMin],
    MeanAbsoluteChange => [MeanAbsoluteChange],
    MeanChange => [MeanChange],
    MeanSecondDerivativeCentral => [MeanSecondDerivativeCentral],
    HasVarianceLargerThanStd => [HasVarianceLargerThanStd],
    SumOfReoccurringValues => [SumOfReoccurringValues],
    LongestStrikeAbove => [LongestStrikeAbove],
    LongestStrikeBelow => [LongestStrikeBelow],
    LaggedAutocorrelation => [LaggedAutocorrelation],
    CountNumberOfPeaks => [CountNumberOfPeaks],
    RatioBeyondRSigma => [RatioBeyondRSigma],
    HasLargeStandardDeviation => [HasLargeStandardDeviation],
    IsSymmetricLooking => [IsSymmetricLooking],
    /// Not available; fails when executed.
    ArimaCoefficient => [ArimaCoefficient],
    /// Not available; fails when executed.
    FftCoefficient => [FftCoefficient],
    /// Not available; fails when executed.
    SpectralDensity => [SpectralDensity],
    /// Not available; fails when executed.
    ContinuousWaveletTransformCoefficient => [ContinuousWaveletTransformCoefficient],
}

impl OpCode {
    /// The byte stored in an instruction.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Opcodes that exist only so that trees using them linearize; executing
    /// them is an error.
    #[must_use]
    pub const fn is_unimplemented(self) -> bool {
        matches!(self,
                 Self::ArimaCoefficient
                 | Self::FftCoefficient
                 | Self::SpectralDensity
                 | Self::ContinuousWaveletTransformCoefficient)
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Mapping from symbol kind to opcode used by the linearizer.
///
/// The default table holds every symbol's default opcode. Entries can be
/// removed to restrict the accepted grammar; linearizing a tree that uses a
/// symbol without an entry fails with `UnsupportedSymbol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpCodeTable {
    entries: HashMap<Symbol, OpCode>,
}

impl Default for OpCodeTable {
    fn default() -> Self {
        let entries = Symbol::all().filter_map(|s| OpCode::default_for(s).map(|op| (s, op)))
                                   .collect();
        Self { entries }
    }
}

impl OpCodeTable {
    /// A table without any entries.
    #[must_use]
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    /// The opcode for `symbol`, if mapped.
    #[must_use]
    pub fn get(&self, symbol: Symbol) -> Option<OpCode> {
        self.entries.get(&symbol).copied()
    }

    /// Returns the table with `symbol` mapped to `opcode`.
    #[must_use]
    pub fn with(mut self, symbol: Symbol, opcode: OpCode) -> Self {
        self.entries.insert(symbol, opcode);
        self
    }

    /// Returns the table with the entry for `symbol` removed.
    ///
    /// # Example
    /// ```
    /// use symvec::{interpreter::evaluator::opcode::OpCodeTable, tree::Symbol};
    ///
    /// let table = OpCodeTable::default().without(Symbol::Sine);
    /// assert!(table.get(Symbol::Sine).is_none());
    /// assert!(table.get(Symbol::Cosine).is_some());
    /// ```
    #[must_use]
    pub fn without(mut self, symbol: Symbol) -> Self {
        self.entries.remove(&symbol);
        self
    }

    /// Number of mapped symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no symbol is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_symbols_have_no_default_opcode() {
        let table = OpCodeTable::default();
        for symbol in Symbol::all() {
            assert_eq!(table.get(symbol).is_none(), symbol.is_structural(), "{symbol}");
        }
    }

    #[test]
    fn default_symbols_round_trip() {
        for symbol in Symbol::all() {
            if let Some(opcode) = OpCode::default_for(symbol) {
                assert!(opcode.symbols().contains(&symbol), "{symbol}");
            }
        }
    }

    #[test]
    fn stub_opcodes_are_flagged() {
        assert!(OpCode::FftCoefficient.is_unimplemented());
        assert!(!OpCode::Mean.is_unimplemented());
    }
}
