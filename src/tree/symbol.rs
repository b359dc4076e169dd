/// Specifies the allowed number of children for a symbol.
///
/// - `Exact(n)` means a node must have exactly `n` children.
/// - `Range(min, max)` means any child count in `min..=max` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many children.
    Exact(usize),
    /// Inclusive lower and upper bound on the number of children.
    Range(usize, usize),
}

impl Arity {
    /// Smallest accepted child count.
    #[must_use]
    pub const fn min(self) -> usize {
        match self {
            Self::Exact(n) | Self::Range(n, _) => n,
        }
    }

    /// Largest accepted child count.
    #[must_use]
    pub const fn max(self) -> usize {
        match self {
            Self::Exact(n) | Self::Range(_, n) => n,
        }
    }

    /// Tests whether the given child count satisfies this arity constraint.
    #[must_use]
    pub const fn contains(self, n: usize) -> bool {
        n >= self.min() && n <= self.max()
    }
}

/// Upper bound for n-ary symbols; instructions store their argument count in a
/// byte.
pub const MAX_CHILDREN: usize = u8::MAX as usize;

/// Defines the symbol set by generating the `Symbol` enum and the static
/// descriptor table.
///
/// Each entry provides:
/// - the enum variant (with its doc comment),
/// - a display name,
/// - the keyword used by the formula parser and formatter,
/// - an arity specification.
///
/// The macro produces:
/// - `Symbol` (a fieldless enum, declaration order = table order),
/// - `SymbolDef` (descriptor type),
/// - `SYMBOLS` (static registry indexed by the enum discriminant).
macro_rules! symbols {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => {
                name: $name:literal,
                keyword: $keyword:literal,
                arity: $arity:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// The kind of a tree node.
        ///
        /// The set is closed: evaluator and simplifier dispatch over it with
        /// exhaustive matches.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Symbol {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        /// Static descriptor of a symbol.
        #[derive(Debug)]
        pub struct SymbolDef {
            /// The described symbol.
            pub symbol:  Symbol,
            /// Human readable name.
            pub name:    &'static str,
            /// Keyword used in formula text.
            pub keyword: &'static str,
            /// Accepted child counts.
            pub arity:   Arity,
        }

        /// Registry of all symbol descriptors, in declaration order.
        pub static SYMBOLS: &[SymbolDef] = &[
            $(
                SymbolDef { symbol: Symbol::$variant, name: $name, keyword: $keyword, arity: $arity },
            )*
        ];
    };
}

symbols! {
    /// Root of a program; first child is `Start`, the rest are `Defun`s.
    ProgramRoot => { name: "ProgramRoot", keyword: "program", arity: Arity::Range(1, MAX_CHILDREN) },
    /// Entry point holding the evaluated body.
    Start => { name: "Start", keyword: "start", arity: Arity::Exact(1) },
    /// Named function definition (automatically defined function).
    Defun => { name: "Defun", keyword: "defun", arity: Arity::Exact(1) },
    /// Invocation of a `Defun` by name.
    InvokeFunction => { name: "InvokeFunction", keyword: "invoke", arity: Arity::Range(0, MAX_CHILDREN) },
    /// Placeholder for the i-th argument inside a `Defun` body.
    Argument => { name: "Argument", keyword: "arg", arity: Arity::Exact(0) },

    /// Optimizable numeric literal.
    Number => { name: "Number", keyword: "number", arity: Arity::Exact(0) },
    /// Fixed numeric literal.
    Constant => { name: "Constant", keyword: "const", arity: Arity::Exact(0) },
    /// Weighted dataset column (scalar or vector valued).
    Variable => { name: "Variable", keyword: "variable", arity: Arity::Exact(0) },
    /// Weighted dataset column read at a row offset.
    LaggedVariable => { name: "LaggedVariable", keyword: "lag", arity: Arity::Exact(0) },
    /// Categorical column mapped through a per-category weight table.
    FactorVariable => { name: "FactorVariable", keyword: "factor", arity: Arity::Exact(0) },
    /// Indicator of one category of a categorical column, times a weight.
    BinaryFactorVariable => { name: "BinaryFactorVariable", keyword: "binfactor", arity: Arity::Exact(0) },

    /// N-ary sum.
    Addition => { name: "Addition", keyword: "+", arity: Arity::Range(1, MAX_CHILDREN) },
    /// N-ary difference; unary form negates.
    Subtraction => { name: "Subtraction", keyword: "-", arity: Arity::Range(1, MAX_CHILDREN) },
    /// N-ary product.
    Multiplication => { name: "Multiplication", keyword: "*", arity: Arity::Range(1, MAX_CHILDREN) },
    /// N-ary quotient; unary form inverts.
    Division => { name: "Division", keyword: "/", arity: Arity::Range(1, MAX_CHILDREN) },
    /// `a ^ round(b)`.
    Power => { name: "Power", keyword: "pow", arity: Arity::Exact(2) },
    /// `a ^ (1 / round(b))`.
    Root => { name: "Root", keyword: "root", arity: Arity::Exact(2) },
    /// `a / sqrt(1 + b^2)`.
    AnalyticQuotient => { name: "AnalyticQuotient", keyword: "aq", arity: Arity::Exact(2) },

    /// Absolute value.
    Absolute => { name: "Absolute", keyword: "abs", arity: Arity::Exact(1) },
    /// Sine.
    Sine => { name: "Sine", keyword: "sin", arity: Arity::Exact(1) },
    /// Cosine.
    Cosine => { name: "Cosine", keyword: "cos", arity: Arity::Exact(1) },
    /// Tangent.
    Tangent => { name: "Tangent", keyword: "tan", arity: Arity::Exact(1) },
    /// Hyperbolic tangent.
    HyperbolicTangent => { name: "HyperbolicTangent", keyword: "tanh", arity: Arity::Exact(1) },
    /// `x^2`.
    Square => { name: "Square", keyword: "sqr", arity: Arity::Exact(1) },
    /// Square root.
    SquareRoot => { name: "SquareRoot", keyword: "sqrt", arity: Arity::Exact(1) },
    /// `x^3`.
    Cube => { name: "Cube", keyword: "cube", arity: Arity::Exact(1) },
    /// Real cube root.
    CubeRoot => { name: "CubeRoot", keyword: "cbrt", arity: Arity::Exact(1) },
    /// `e^x`.
    Exponential => { name: "Exponential", keyword: "exp", arity: Arity::Exact(1) },
    /// Natural logarithm.
    Logarithm => { name: "Logarithm", keyword: "log", arity: Arity::Exact(1) },

    /// Arithmetic mean.
    Mean => { name: "Mean", keyword: "mean", arity: Arity::Exact(1) },
    /// Median.
    Median => { name: "Median", keyword: "median", arity: Arity::Exact(1) },
    /// Sum of elements.
    Sum => { name: "Sum", keyword: "sum", arity: Arity::Exact(1) },
    /// Smallest element.
    Minimum => { name: "Minimum", keyword: "min", arity: Arity::Exact(1) },
    /// Largest element.
    Maximum => { name: "Maximum", keyword: "max", arity: Arity::Exact(1) },
    /// Quantile `q` of the first operand.
    Quantile => { name: "Quantile", keyword: "quantile", arity: Arity::Exact(2) },
    /// Population standard deviation.
    StandardDeviation => { name: "StandardDeviation", keyword: "std", arity: Arity::Exact(1) },
    /// Population variance.
    Variance => { name: "Variance", keyword: "var", arity: Arity::Exact(1) },
    /// Population skewness.
    Skewness => { name: "Skewness", keyword: "skewness", arity: Arity::Exact(1) },
    /// Population excess kurtosis.
    Kurtosis => { name: "Kurtosis", keyword: "kurtosis", arity: Arity::Exact(1) },
    /// Number of elements.
    Length => { name: "Length", keyword: "length", arity: Arity::Exact(1) },

    /// Euclidean distance of two vectors.
    EuclideanDistance => { name: "EuclideanDistance", keyword: "distance", arity: Arity::Exact(2) },
    /// Population covariance.
    Covariance => { name: "Covariance", keyword: "cov", arity: Arity::Exact(2) },
    /// Pearson correlation coefficient.
    PearsonCorrelation => { name: "PearsonCorrelation", keyword: "pearson", arity: Arity::Exact(2) },
    /// Spearman rank correlation coefficient.
    SpearmanRankCorrelation => { name: "SpearmanRankCorrelation", keyword: "spearman", arity: Arity::Exact(2) },

    /// Window of a vector selected by relative bounds stored on the node.
    SubVector => { name: "SubVector", keyword: "subvector", arity: Arity::Exact(1) },
    /// Window of a vector selected by two evaluated relative bounds.
    SubVectorSubtree => { name: "SubVectorSubtree", keyword: "subvector_expr", arity: Arity::Exact(3) },

    /// Sum of squared elements.
    AbsoluteEnergy => { name: "AbsoluteEnergy", keyword: "absolute_energy", arity: Arity::Exact(1) },
    /// Sum of absolute consecutive differences.
    AbsoluteSumOfChanges => { name: "AbsoluteSumOfChanges", keyword: "absolute_sum_of_changes", arity: Arity::Exact(1) },
    /// Number of elements greater than the mean.
    CountAboveMean => { name: "CountAboveMean", keyword: "count_above_mean", arity: Arity::Exact(1) },
    /// Number of elements less than the mean.
    CountBelowMean => { name: "CountBelowMean", keyword: "count_below_mean", arity: Arity::Exact(1) },
    /// Relative position of the first maximum.
    FirstIndexMax => { name: "FirstIndexMax", keyword: "first_index_max", arity: Arity::Exact(1) },
    /// Relative position of the first minimum.
    FirstIndexMin => { name: "FirstIndexMin", keyword: "first_index_min", arity: Arity::Exact(1) },
    /// Relative position of the last maximum.
    LastIndexMax => { name: "LastIndexMax", keyword: "last_index_max", arity: Arity::Exact(1) },
    /// Relative position of the last minimum.
    LastIndexMin => { name: "LastIndexMin", keyword: "last_index_min", arity: Arity::Exact(1) },
    /// Mean of absolute consecutive differences.
    MeanAbsoluteChange => { name: "MeanAbsoluteChange", keyword: "mean_absolute_change", arity: Arity::Exact(1) },
    /// Mean of consecutive differences.
    MeanChange => { name: "MeanChange", keyword: "mean_change", arity: Arity::Exact(1) },
    /// Mean of the central second derivative.
    MeanSecondDerivativeCentral => { name: "MeanSecondDerivativeCentral", keyword: "mean_second_derivative_central", arity: Arity::Exact(1) },
    /// `1` if the variance exceeds the standard deviation.
    HasVarianceLargerThanStd => { name: "HasVarianceLargerThanStd", keyword: "has_variance_larger_than_std", arity: Arity::Exact(1) },
    /// Sum of the distinct values that occur more than once.
    SumOfReoccurringValues => { name: "SumOfReoccurringValues", keyword: "sum_of_reoccurring_values", arity: Arity::Exact(1) },
    /// Longest run of elements above a threshold.
    LongestStrikeAbove => { name: "LongestStrikeAbove", keyword: "longest_strike_above", arity: Arity::Exact(2) },
    /// Longest run of elements below a threshold.
    LongestStrikeBelow => { name: "LongestStrikeBelow", keyword: "longest_strike_below", arity: Arity::Exact(2) },
    /// Autocorrelation at a given lag.
    LaggedAutocorrelation => { name: "LaggedAutocorrelation", keyword: "autocorrelation", arity: Arity::Exact(2) },
    /// Number of peaks with a given support.
    CountNumberOfPeaks => { name: "CountNumberOfPeaks", keyword: "number_peaks", arity: Arity::Exact(2) },
    /// Share of elements farther than `r` standard deviations from the mean.
    RatioBeyondRSigma => { name: "RatioBeyondRSigma", keyword: "ratio_beyond_r_sigma", arity: Arity::Exact(2) },
    /// `1` if the standard deviation exceeds `r` times the range.
    HasLargeStandardDeviation => { name: "HasLargeStandardDeviation", keyword: "has_large_std", arity: Arity::Exact(2) },
    /// `1` if mean and median differ by less than `r` times the range.
    IsSymmetricLooking => { name: "IsSymmetricLooking", keyword: "is_symmetric_looking", arity: Arity::Exact(2) },
    /// ARIMA model coefficient (not available).
    ArimaCoefficient => { name: "ArimaCoefficient", keyword: "arima_coefficient", arity: Arity::Exact(2) },
    /// FFT coefficient (not available).
    FftCoefficient => { name: "FftCoefficient", keyword: "fft_coefficient", arity: Arity::Exact(2) },
    /// Spectral density (not available).
    SpectralDensity => { name: "SpectralDensity", keyword: "spectral_density", arity: Arity::Exact(2) },
    /// Continuous wavelet transform coefficient (not available).
    ContinuousWaveletTransformCoefficient => { name: "ContinuousWaveletTransformCoefficient", keyword: "cwt_coefficient", arity: Arity::Exact(3) },
}

impl Symbol {
    /// Returns the static descriptor of this symbol.
    ///
    /// # Example
    /// ```
    /// use symvec::tree::{Arity, Symbol};
    ///
    /// assert_eq!(Symbol::Quantile.def().arity, Arity::Exact(2));
    /// assert_eq!(Symbol::Sine.def().keyword, "sin");
    /// ```
    #[must_use]
    pub fn def(self) -> &'static SymbolDef {
        &SYMBOLS[self as usize]
    }

    /// Human readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Keyword used in formula text.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        self.def().keyword
    }

    /// Accepted child counts.
    #[must_use]
    pub fn arity(self) -> Arity {
        self.def().arity
    }

    /// Looks up a symbol by its formula keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        SYMBOLS.iter().find(|d| d.keyword == keyword).map(|d| d.symbol)
    }

    /// Iterates over all symbols in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        SYMBOLS.iter().map(|d| d.symbol)
    }

    /// Numeric literals.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Number | Self::Constant)
    }

    /// Symbols bound to dataset columns.
    #[must_use]
    pub const fn is_variable_like(self) -> bool {
        matches!(self,
                 Self::Variable
                 | Self::LaggedVariable
                 | Self::FactorVariable
                 | Self::BinaryFactorVariable)
    }

    /// Leaves that produce a value (literals and data-bound symbols).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.is_literal() || self.is_variable_like()
    }

    /// Program structure and composite-function symbols.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self,
                 Self::ProgramRoot
                 | Self::Start
                 | Self::Defun
                 | Self::InvokeFunction
                 | Self::Argument)
    }

    /// One-argument functions applied per element.
    #[must_use]
    pub const fn is_elementwise(self) -> bool {
        matches!(self,
                 Self::Absolute
                 | Self::Sine
                 | Self::Cosine
                 | Self::Tangent
                 | Self::HyperbolicTangent
                 | Self::Square
                 | Self::SquareRoot
                 | Self::Cube
                 | Self::CubeRoot
                 | Self::Exponential
                 | Self::Logarithm)
    }

    /// Reductions of one vector to a scalar.
    #[must_use]
    pub const fn is_aggregation(self) -> bool {
        matches!(self,
                 Self::Mean
                 | Self::Median
                 | Self::Sum
                 | Self::Minimum
                 | Self::Maximum
                 | Self::Quantile
                 | Self::StandardDeviation
                 | Self::Variance
                 | Self::Skewness
                 | Self::Kurtosis
                 | Self::Length)
    }

    /// Binary reductions of two vectors to a scalar.
    #[must_use]
    pub const fn is_vector_comparison(self) -> bool {
        matches!(self,
                 Self::EuclideanDistance
                 | Self::Covariance
                 | Self::PearsonCorrelation
                 | Self::SpearmanRankCorrelation)
    }

    /// Closed-form time-series features, including the unavailable ones.
    #[must_use]
    pub const fn is_time_series_feature(self) -> bool {
        matches!(self,
                 Self::AbsoluteEnergy
                 | Self::AbsoluteSumOfChanges
                 | Self::CountAboveMean
                 | Self::CountBelowMean
                 | Self::FirstIndexMax
                 | Self::FirstIndexMin
                 | Self::LastIndexMax
                 | Self::LastIndexMin
                 | Self::MeanAbsoluteChange
                 | Self::MeanChange
                 | Self::MeanSecondDerivativeCentral
                 | Self::HasVarianceLargerThanStd
                 | Self::SumOfReoccurringValues
                 | Self::LongestStrikeAbove
                 | Self::LongestStrikeBelow
                 | Self::LaggedAutocorrelation
                 | Self::CountNumberOfPeaks
                 | Self::RatioBeyondRSigma
                 | Self::HasLargeStandardDeviation
                 | Self::IsSymmetricLooking
                 | Self::ArimaCoefficient
                 | Self::FftCoefficient
                 | Self::SpectralDensity
                 | Self::ContinuousWaveletTransformCoefficient)
    }

    /// Symbols whose result is always a scalar, whatever their operands are.
    #[must_use]
    pub const fn is_scalar_valued(self) -> bool {
        self.is_aggregation()
        || self.is_vector_comparison()
        || self.is_time_series_feature()
        || matches!(self,
                    Self::Number
                    | Self::Constant
                    | Self::FactorVariable
                    | Self::BinaryFactorVariable)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
