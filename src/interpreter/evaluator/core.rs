use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    dataset::Dataset,
    error::{EvalError, EvalResult},
    interpreter::{
        evaluator::{
            binary::{arithmetic, comparison, power},
            function::{aggregation, elementwise, terminal, timeseries, window},
            linearizer::{Instruction, linearize},
            opcode::{OpCode, OpCodeTable},
            reconcile::LengthStrategy,
        },
        value::EvaluationResult,
    },
    tree::SymbolicNode,
};

/// Reduction applied when a whole tree evaluates to a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalAggregation {
    /// Arithmetic mean of the elements.
    #[default]
    Mean,
    /// Median of the elements.
    Median,
    /// Sum of the elements.
    Sum,
    /// The first element.
    First,
    /// Always NaN.
    #[serde(rename = "nan")]
    NaN,
    /// Fails with `NonScalarResult`.
    Exception,
}

const AGGREGATION_NAMES: &[(FinalAggregation, &str)] = &[(FinalAggregation::Mean, "mean"),
                                                         (FinalAggregation::Median, "median"),
                                                         (FinalAggregation::Sum, "sum"),
                                                         (FinalAggregation::First, "first"),
                                                         (FinalAggregation::NaN, "nan"),
                                                         (FinalAggregation::Exception,
                                                          "exception")];

impl fmt::Display for FinalAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = AGGREGATION_NAMES.iter()
                                    .find(|(a, _)| a == self)
                                    .map_or("unknown", |(_, n)| n);
        f.write_str(name)
    }
}

impl FromStr for FinalAggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AGGREGATION_NAMES.iter()
                         .find(|(_, n)| *n == s)
                         .map(|(aggregation, _)| *aggregation)
                         .ok_or_else(|| format!("unknown final aggregation '{s}'"))
    }
}

/// Settings of an [`Interpreter`], fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Applied whenever a binary vector operation meets mismatched lengths.
    pub length_strategy:   LengthStrategy,
    /// Applied when a whole tree evaluates to a vector.
    pub final_aggregation: FinalAggregation,
}

/// Evaluation cursor over one linearized program.
///
/// The instruction slice is shared and read-only; the cursor and the operand
/// stack are private to this state. Parallel evaluations of the same program
/// each need their own state.
#[derive(Debug)]
pub struct InterpreterState<'p, 'a> {
    code:   &'p [Instruction<'a>],
    cursor: usize,
    stack:  Vec<EvaluationResult>,
}

impl<'p, 'a> InterpreterState<'p, 'a> {
    /// Creates a state positioned at the first instruction.
    #[must_use]
    pub const fn new(code: &'p [Instruction<'a>]) -> Self {
        Self { code,
               cursor: 0,
               stack: Vec::new() }
    }

    /// Moves the cursor back to the first instruction and clears the operand
    /// stack.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.stack.clear();
    }

    /// Returns the instruction under the cursor and advances past it.
    pub fn next_instruction(&mut self) -> Option<&'p Instruction<'a>> {
        let instruction = self.code.get(self.cursor)?;
        self.cursor += 1;
        Some(instruction)
    }

    /// Position of the next instruction.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Row-wise evaluator of formula trees.
///
/// An interpreter holds only its configuration, its opcode table and the
/// evaluated-solutions counter, so one instance can serve many threads.
///
/// # Example
/// ```
/// use symvec::{
///     dataset::{Column, Dataset},
///     interpreter::evaluator::core::Interpreter,
///     tree::{Symbol, SymbolicNode},
/// };
///
/// let tree = SymbolicNode::binary(Symbol::Multiplication,
///                                 SymbolicNode::variable("x", 1.0),
///                                 SymbolicNode::number(10.0));
/// let data = Dataset::new().with_column("x", Column::Scalar(vec![1.0, 2.0, 3.0]));
///
/// let interpreter = Interpreter::default();
/// let values = interpreter.evaluate_rows(&tree, &data, 0..3).unwrap();
/// let values: Vec<f64> = values.iter().collect::<Result<_, _>>().unwrap();
/// assert_eq!(values, [10.0, 20.0, 30.0]);
/// ```
#[derive(Debug, Default)]
pub struct Interpreter {
    config:              InterpreterConfig,
    table:               OpCodeTable,
    evaluated_solutions: AtomicU64,
}

impl Interpreter {
    /// Creates an interpreter with the default opcode table.
    #[must_use]
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config,
               table: OpCodeTable::default(),
               evaluated_solutions: AtomicU64::new(0) }
    }

    /// Replaces the opcode table.
    #[must_use]
    pub fn with_opcode_table(mut self, table: OpCodeTable) -> Self {
        self.table = table;
        self
    }

    /// The configuration this interpreter was created with.
    #[must_use]
    pub const fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Number of full row sequences evaluated so far.
    #[must_use]
    pub fn evaluated_solutions(&self) -> u64 {
        self.evaluated_solutions.load(Ordering::Relaxed)
    }

    /// Linearizes `tree` against `data` using this interpreter's opcode table.
    ///
    /// # Errors
    /// See [`linearize`].
    pub fn linearize<'a>(&self,
                         tree: &'a SymbolicNode,
                         data: &'a Dataset)
                         -> EvalResult<Vec<Instruction<'a>>> {
        linearize(tree, data, &self.table)
    }

    /// Evaluates a single row, keeping the scalar/vector/undefined
    /// distinction.
    ///
    /// # Errors
    /// Linearization errors, `VectorLengthMismatch` and
    /// `UnimplementedOpCode`.
    pub fn evaluate_row(&self,
                        tree: &SymbolicNode,
                        data: &Dataset,
                        row: usize)
                        -> EvalResult<EvaluationResult> {
        let code = self.linearize(tree, data)?;
        let mut state = InterpreterState::new(&code);
        self.execute(&mut state, row)
    }

    /// Runs a linearized program for one row.
    ///
    /// The state is reset first, so the same state can be reused row after
    /// row. Instructions are consumed in stored order; each one pops its
    /// operands from the stack and pushes its result.
    ///
    /// # Errors
    /// `VectorLengthMismatch`, `UnimplementedOpCode`, or `MalformedTree` if
    /// the program does not leave exactly one result.
    pub fn execute(&self,
                   state: &mut InterpreterState<'_, '_>,
                   row: usize)
                   -> EvalResult<EvaluationResult> {
        state.reset();
        while let Some(instruction) = state.next_instruction() {
            let arg_count = usize::from(instruction.arg_count);
            if arg_count > state.stack.len() {
                return Err(EvalError::malformed(format!("{:?} needs {arg_count} operands, found {}",
                                                        instruction.opcode,
                                                        state.stack.len())));
            }
            let operands = state.stack.split_off(state.stack.len() - arg_count);
            let result = self.apply(instruction, &operands, row)?;
            state.stack.push(result.finite());
        }

        let result = state.stack.pop().ok_or_else(|| EvalError::malformed("empty program"))?;
        if !state.stack.is_empty() {
            return Err(EvalError::malformed(format!("{} results left on the stack",
                                                    state.stack.len() + 1)));
        }
        Ok(result)
    }

    fn apply(&self,
             instruction: &Instruction<'_>,
             operands: &[EvaluationResult],
             row: usize)
             -> EvalResult<EvaluationResult> {
        let opcode = instruction.opcode;
        if opcode.is_unimplemented() {
            return Err(EvalError::UnimplementedOpCode { opcode });
        }
        if operands.iter().any(EvaluationResult::is_undefined) {
            return Ok(EvaluationResult::Undefined);
        }

        let strategy = self.config.length_strategy;
        match opcode {
            OpCode::Constant
            | OpCode::Variable
            | OpCode::LaggedVariable
            | OpCode::FactorVariable
            | OpCode::BinaryFactorVariable => terminal::evaluate(instruction, row),

            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div => {
                arithmetic::nary(opcode, operands, strategy)
            },
            OpCode::AnalyticQuotient => {
                let [a, b] = pair(opcode, operands)?;
                arithmetic::analytic_quotient(a, b, strategy)
            },
            OpCode::Power | OpCode::Root => {
                let [base, exponent] = pair(opcode, operands)?;
                power::evaluate(opcode, base, exponent)
            },

            OpCode::Absolute
            | OpCode::Sine
            | OpCode::Cosine
            | OpCode::Tangent
            | OpCode::HyperbolicTangent
            | OpCode::Square
            | OpCode::SquareRoot
            | OpCode::Cube
            | OpCode::CubeRoot
            | OpCode::Exponential
            | OpCode::Logarithm => Ok(elementwise::apply(opcode, single(opcode, operands)?)),

            OpCode::Mean
            | OpCode::Median
            | OpCode::Sum
            | OpCode::Minimum
            | OpCode::Maximum
            | OpCode::Quantile
            | OpCode::StandardDeviation
            | OpCode::Variance
            | OpCode::Skewness
            | OpCode::Kurtosis
            | OpCode::Length => Ok(aggregation::apply(opcode, operands)),

            OpCode::EuclideanDistance
            | OpCode::Covariance
            | OpCode::PearsonCorrelation
            | OpCode::SpearmanRankCorrelation => {
                let [a, b] = pair(opcode, operands)?;
                comparison::evaluate(opcode, a, b, strategy)
            },

            OpCode::SubVector => Ok(window::fixed(instruction.node, single(opcode, operands)?)),
            OpCode::SubVectorSubtree => Ok(window::evaluated(instruction.node, operands)),

            OpCode::AbsoluteEnergy
            | OpCode::AbsoluteSumOfChanges
            | OpCode::CountAboveMean
            | OpCode::CountBelowMean
            | OpCode::FirstIndexMax
            | OpCode::FirstIndexMin
            | OpCode::LastIndexMax
            | OpCode::LastIndexMin
            | OpCode::MeanAbsoluteChange
            | OpCode::MeanChange
            | OpCode::MeanSecondDerivativeCentral
            | OpCode::HasVarianceLargerThanStd
            | OpCode::SumOfReoccurringValues
            | OpCode::LongestStrikeAbove
            | OpCode::LongestStrikeBelow
            | OpCode::LaggedAutocorrelation
            | OpCode::CountNumberOfPeaks
            | OpCode::RatioBeyondRSigma
            | OpCode::HasLargeStandardDeviation
            | OpCode::IsSymmetricLooking => Ok(timeseries::apply(opcode, operands)),

            OpCode::ArimaCoefficient
            | OpCode::FftCoefficient
            | OpCode::SpectralDensity
            | OpCode::ContinuousWaveletTransformCoefficient => {
                Err(EvalError::UnimplementedOpCode { opcode })
            },
        }
    }

    /// Evaluates `tree` on every row in `rows`, one `f64` per row.
    ///
    /// The tree is linearized once, eagerly, so binding errors surface here.
    /// The returned values are produced lazily and can be iterated any number
    /// of times; each full iteration re-runs the evaluation and counts as one
    /// evaluated solution.
    ///
    /// Per row: a scalar is returned as is, a vector is reduced with the
    /// configured [`FinalAggregation`], and `Undefined` becomes NaN.
    ///
    /// # Errors
    /// See [`linearize`].
    pub fn evaluate_rows<'a, I>(&'a self,
                                tree: &'a SymbolicNode,
                                data: &'a Dataset,
                                rows: I)
                                -> EvalResult<EstimatedValues<'a>>
        where I: IntoIterator<Item = usize>
    {
        let code = self.linearize(tree, data)?;
        let rows: Vec<usize> = rows.into_iter().collect();
        debug!("evaluation session over {} rows with {} instructions ({}, final {})",
               rows.len(),
               code.len(),
               self.config.length_strategy,
               self.config.final_aggregation);
        Ok(EstimatedValues { interpreter: self,
                             code,
                             rows })
    }

    fn reduce(&self, result: &EvaluationResult, row: usize) -> EvalResult<f64> {
        match result {
            EvaluationResult::Scalar(v) => Ok(*v),
            EvaluationResult::Undefined => Ok(f64::NAN),
            EvaluationResult::Vector(v) => match self.config.final_aggregation {
                FinalAggregation::Mean => Ok(v.mean()),
                FinalAggregation::Median => Ok(v.median()),
                FinalAggregation::Sum => Ok(v.sum()),
                FinalAggregation::First => Ok(v.first()),
                FinalAggregation::NaN => Ok(f64::NAN),
                FinalAggregation::Exception => Err(EvalError::NonScalarResult { row }),
            },
        }
    }
}

/// Lazily evaluated, restartable per-row values of one tree.
///
/// Produced by [`Interpreter::evaluate_rows`]. Holds the linearized program
/// and the requested rows; nothing is evaluated until iteration.
#[derive(Debug)]
pub struct EstimatedValues<'a> {
    interpreter: &'a Interpreter,
    code:        Vec<Instruction<'a>>,
    rows:        Vec<usize>,
}

impl<'a> EstimatedValues<'a> {
    /// Number of rows that will be produced.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` if no rows were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The linearized program.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction<'a>] {
        &self.code
    }

    /// Starts a fresh evaluation pass over all rows.
    pub fn iter(&self) -> impl Iterator<Item = EvalResult<f64>> + '_ {
        self.interpreter.evaluated_solutions.fetch_add(1, Ordering::Relaxed);
        let mut state = InterpreterState::new(&self.code);
        self.rows.iter().map(move |&row| {
                            let result = self.interpreter.execute(&mut state, row)?;
                            trace!("row {row}: {result}");
                            self.interpreter.reduce(&result, row)
                        })
    }
}

impl<'s> IntoIterator for &'s EstimatedValues<'_> {
    type IntoIter = Box<dyn Iterator<Item = EvalResult<f64>> + 's>;
    type Item = EvalResult<f64>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

fn single(opcode: OpCode, operands: &[EvaluationResult]) -> EvalResult<&EvaluationResult> {
    match operands {
        [operand] => Ok(operand),
        _ => Err(operand_count_error(opcode, 1, operands.len())),
    }
}

fn pair(opcode: OpCode, operands: &[EvaluationResult]) -> EvalResult<[&EvaluationResult; 2]> {
    match operands {
        [a, b] => Ok([a, b]),
        _ => Err(operand_count_error(opcode, 2, operands.len())),
    }
}

fn operand_count_error(opcode: OpCode, expected: usize, found: usize) -> EvalError {
    EvalError::malformed(format!("{opcode} takes {expected} operands, found {found}"))
}
