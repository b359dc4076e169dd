use approx::relative_eq;
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng, rngs::StdRng};
use symvec::{
    dataset::{Column, Dataset},
    error::EvalResult,
    interpreter::{
        evaluator::{
            core::{FinalAggregation, Interpreter, InterpreterConfig},
            reconcile::LengthStrategy,
        },
        parser::core::{ParserConfig, parse_formula},
        value::DoubleVector,
    },
    simplifier::core::Simplifier,
    tree::{Symbol, SymbolicNode},
};

const ROWS: usize = 20;

/// Rows past the end of the ragged `x` column.
const X_ROWS: usize = ROWS - 2;

const STRATEGIES: [LengthStrategy; 7] = [LengthStrategy::ExceptionIfDifferent,
                                         LengthStrategy::FillShorterWithNaN,
                                         LengthStrategy::FillShorterWithNeutralElement,
                                         LengthStrategy::CutLonger,
                                         LengthStrategy::ResampleToLonger,
                                         LengthStrategy::ResampleToShorter,
                                         LengthStrategy::CycleShorter];

/// Random trees mixing scalars and vectors of unrelated lengths, including
/// operations that are undefined on part of the generated data.
struct TreeGenerator {
    rng: StdRng,
}

impl TreeGenerator {
    fn weight(&mut self) -> f64 {
        f64::from(self.rng.random_range(-4..=4)) / 2.0
    }

    fn nonzero_weight(&mut self) -> f64 {
        let w = self.weight();
        if w == 0.0 { 1.5 } else { w }
    }

    fn bound(&mut self) -> f64 {
        [0.0, 0.25, 0.5, 0.75, 1.0][self.rng.random_range(0..5)]
    }

    fn scalar_leaf(&mut self) -> SymbolicNode {
        match self.rng.random_range(0..7) {
            0 => SymbolicNode::variable("x", self.weight()),
            1 => SymbolicNode::variable("y", self.weight()),
            2 => SymbolicNode::binary_factor("c", "a", self.weight()),
            3 => SymbolicNode::factor("c", [("a", self.weight()), ("b", self.weight())]),
            4 => SymbolicNode::lagged_variable("x", self.weight(), -1),
            5 => SymbolicNode::lagged_variable("y", self.weight(), 1),
            _ => SymbolicNode::number(self.weight()),
        }
    }

    fn vector_leaf(&mut self) -> SymbolicNode {
        let name = if self.rng.random_bool(0.5) { "v" } else { "w" };
        SymbolicNode::vector_variable(name, self.weight())
    }

    /// Scalar operands, with at least one vector among them when `vector` is
    /// set. Further vectors land in the same node.
    fn operands(&mut self, symbol: Symbol, depth: usize, vector: bool) -> Vec<SymbolicNode> {
        let count = if symbol == Symbol::Multiplication { 2 } else { self.rng.random_range(2..=3) };
        let mut operands: Vec<_> = (0..count).map(|_| self.scalar(depth - 1)).collect();
        if vector {
            let at = self.rng.random_range(0..count);
            for (i, operand) in operands.iter_mut().enumerate() {
                if i == at || self.rng.random_bool(0.3) {
                    *operand = self.vector(depth - 1);
                }
            }
        }
        operands
    }

    fn nary(&mut self, symbol: Symbol, depth: usize, vector: bool) -> SymbolicNode {
        SymbolicNode::new(symbol, self.operands(symbol, depth, vector))
    }

    fn elementwise(&mut self) -> Symbol {
        [Symbol::Sine,
         Symbol::Cosine,
         Symbol::HyperbolicTangent,
         Symbol::Absolute,
         Symbol::Square,
         Symbol::Logarithm,
         Symbol::SquareRoot][self.rng.random_range(0..7)]
    }

    fn aggregation(&mut self) -> Symbol {
        [Symbol::Mean,
         Symbol::Median,
         Symbol::Sum,
         Symbol::Minimum,
         Symbol::Maximum,
         Symbol::Variance,
         Symbol::StandardDeviation,
         Symbol::Length][self.rng.random_range(0..8)]
    }

    fn feature(&mut self, series: SymbolicNode) -> SymbolicNode {
        match self.rng.random_range(0..3) {
            0 => SymbolicNode::unary(Symbol::MeanChange, series),
            1 => SymbolicNode::unary(Symbol::AbsoluteSumOfChanges, series),
            _ => SymbolicNode::binary(Symbol::LongestStrikeAbove, series, SymbolicNode::number(0.0)),
        }
    }

    /// Windows with `start > end` and no wrap-around are empty.
    fn window(&mut self, series: SymbolicNode) -> SymbolicNode {
        let (start, end) = (self.bound(), self.bound());
        let round_trip = self.rng.random_bool(0.5);
        SymbolicNode::sub_vector(series, start, end, round_trip)
    }

    fn divided_by_data(&mut self, dividend: SymbolicNode) -> SymbolicNode {
        let name = if self.rng.random_bool(0.5) { "x" } else { "y" };
        let divisor = SymbolicNode::variable(name, self.weight());
        SymbolicNode::binary(Symbol::Division, dividend, divisor)
    }

    fn scalar(&mut self, depth: usize) -> SymbolicNode {
        if depth == 0 || self.rng.random_bool(0.25) {
            return self.scalar_leaf();
        }
        match self.rng.random_range(0..12) {
            0 => self.nary(Symbol::Addition, depth, false),
            1 => self.nary(Symbol::Subtraction, depth, false),
            2 => self.nary(Symbol::Multiplication, depth, false),
            3 => {
                let divisor = SymbolicNode::number(self.nonzero_weight());
                SymbolicNode::binary(Symbol::Division, self.scalar(depth - 1), divisor)
            },
            4 => {
                let dividend = self.scalar(depth - 1);
                self.divided_by_data(dividend)
            },
            5 => {
                let symbol = self.elementwise();
                SymbolicNode::unary(symbol, self.scalar(depth - 1))
            },
            6 => {
                let exponent = [-2.0, -1.0, 0.0, 2.0, 3.0][self.rng.random_range(0..5)];
                SymbolicNode::binary(Symbol::Power,
                                     self.scalar(depth - 1),
                                     SymbolicNode::number(exponent))
            },
            7 => {
                let series = self.vector(depth - 1);
                self.feature(series)
            },
            8 => {
                let symbol = self.aggregation();
                let series = self.vector(depth - 1);
                let window = self.window(series);
                SymbolicNode::unary(symbol, window)
            },
            _ => {
                let symbol = self.aggregation();
                let operand = if self.rng.random_bool(0.8) {
                    self.vector(depth - 1)
                } else {
                    self.scalar(depth - 1)
                };
                SymbolicNode::unary(symbol, operand)
            },
        }
    }

    fn vector(&mut self, depth: usize) -> SymbolicNode {
        if depth == 0 || self.rng.random_bool(0.25) {
            return self.vector_leaf();
        }
        match self.rng.random_range(0..7) {
            0 => self.nary(Symbol::Addition, depth, true),
            1 => self.nary(Symbol::Subtraction, depth, true),
            2 => self.nary(Symbol::Multiplication, depth, true),
            3 => {
                let divisor = SymbolicNode::number(self.nonzero_weight());
                SymbolicNode::binary(Symbol::Division, self.vector(depth - 1), divisor)
            },
            4 => {
                let dividend = self.vector(depth - 1);
                self.divided_by_data(dividend)
            },
            5 => {
                let series = self.vector(depth - 1);
                self.window(series)
            },
            _ => {
                let symbol = self.elementwise();
                SymbolicNode::unary(symbol, self.vector(depth - 1))
            },
        }
    }

    fn tree(&mut self) -> SymbolicNode {
        if self.rng.random_bool(0.5) { self.scalar(3) } else { self.vector(3) }
    }
}

/// Eighths in `±[0.5, 2]`, so sums of half-weighted terms are exact and
/// cancel to exactly zero.
fn magnitude(rng: &mut StdRng) -> f64 {
    let value = f64::from(rng.random_range(4..=16)) / 8.0;
    if rng.random_bool(0.5) { -value } else { value }
}

/// `x` is shorter than the other columns and holds a zero, `y` holds a NaN
/// cell, and `v` and `w` have unrelated lengths in every row.
fn random_dataset(rng: &mut StdRng) -> Dataset {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut v = Vec::new();
    let mut w = Vec::new();
    let mut c = Vec::new();
    for _ in 0..ROWS {
        x.push(magnitude(rng));
        y.push(magnitude(rng));
        for column in [&mut v, &mut w] {
            let len = rng.random_range(3..=7);
            let values: Vec<f64> = (0..len).map(|_| magnitude(rng)).collect();
            column.push(DoubleVector::new(values).unwrap());
        }
        c.push(["a", "b", "z"][rng.random_range(0..3)].to_string());
    }
    x.truncate(X_ROWS);
    x[3] = 0.0;
    y[5] = f64::NAN;
    Dataset::new().with_column("x", Column::Scalar(x))
                  .with_column("y", Column::Scalar(y))
                  .with_column("v", Column::Vector(v))
                  .with_column("w", Column::Vector(w))
                  .with_column("c", Column::Categorical(c))
}

fn evaluate(tree: &SymbolicNode, data: &Dataset, config: InterpreterConfig) -> Vec<EvalResult<f64>> {
    let interpreter = Interpreter::new(config);
    let values = interpreter.evaluate_rows(tree, data, 0..ROWS).unwrap();
    values.iter().collect()
}

fn same_value(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || relative_eq!(a, b, epsilon = 1e-6, max_relative = 1e-9)
}

fn same_outcome(a: &EvalResult<f64>, b: &EvalResult<f64>) -> bool {
    match (a, b) {
        (Ok(a), Ok(b)) => same_value(*a, *b),
        (Err(_), Err(_)) => true,
        _ => false,
    }
}

#[test]
fn random_trees_keep_their_values() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let data = random_dataset(&mut rng);
    let mut generator = TreeGenerator { rng };
    let simplifier = Simplifier::default();

    for _ in 0..150 {
        let tree = generator.tree();
        let simplified = simplifier.simplify(&tree).unwrap();

        for length_strategy in STRATEGIES {
            let config = InterpreterConfig { length_strategy,
                                             ..InterpreterConfig::default() };
            let expected = evaluate(&tree, &data, config);
            let actual = evaluate(&simplified, &data, config);
            for (row, (e, a)) in expected.iter().zip(&actual).enumerate() {
                assert!(same_outcome(e, a),
                        "{length_strategy:?} row {row}: {tree} = {e:?}, but {simplified} = {a:?}");
            }
        }
    }
}

#[test]
fn random_trees_simplify_to_a_fixpoint() {
    let mut generator = TreeGenerator { rng: StdRng::seed_from_u64(42) };
    let simplifier = Simplifier::default();

    for _ in 0..150 {
        let tree = generator.tree();
        let once = simplifier.simplify(&tree).unwrap();
        let twice = simplifier.simplify(&once).unwrap();
        assert_eq!(twice, once, "{tree}");
    }
}

#[test]
fn like_terms_collapse_into_one_terminal() {
    let tree = parse_formula("x * 2 + x * 3", &ParserConfig::default()).unwrap();
    let simplified = Simplifier::default().simplify(&tree).unwrap();
    assert_eq!(simplified, SymbolicNode::variable("x", 5.0));
}

#[test]
fn literal_arithmetic_folds() {
    let tree = parse_formula("(2 + 3) * 4", &ParserConfig::default()).unwrap();
    let simplified = Simplifier::default().simplify(&tree).unwrap();
    assert_eq!(simplified, SymbolicNode::number(20.0));
}

#[test]
fn vector_shape_is_preserved() {
    let config = ParserConfig::with_vector_variables(["v"]);
    let tree = parse_formula("v * 0 + x - x", &config).unwrap();
    let simplified = Simplifier::default().simplify(&tree).unwrap();
    assert_eq!(simplified.to_string(), "(variable(v, 0.0) + variable(x, 0.0))");
}

#[test]
fn aggregations_of_scalars_collapse() {
    let config = ParserConfig::with_vector_variables(["v"]);
    let tree = parse_formula("mean(x) + var(y) + sum(2 * v + x)", &config).unwrap();
    let simplified = Simplifier::default().simplify(&tree).unwrap();
    assert_eq!(simplified.to_string(),
               "(x + variable(y, 0.0) + sum(variable(v, 2.0)) + (x * length(variable(v, 2.0))))");
}

#[test]
fn cancelled_terms_stay_undefined_past_a_short_column() {
    let data = Dataset::new().with_column("x", Column::Scalar(vec![1.0, 2.0]))
                             .with_column("y", Column::Scalar(vec![1.0, 2.0, 3.0]));
    let tree = parse_formula("x * 0 + y", &ParserConfig::default()).unwrap();
    let simplified = Simplifier::default().simplify(&tree).unwrap();

    let interpreter = Interpreter::default();
    for formula in [&tree, &simplified] {
        let values: Vec<f64> = interpreter.evaluate_rows(formula, &data, 0..3)
                                          .unwrap()
                                          .iter()
                                          .collect::<Result<_, _>>()
                                          .unwrap();
        assert_eq!(&values[..2], &[1.0, 2.0]);
        assert!(values[2].is_nan(), "{formula} is defined past the end of x");
    }
}

#[test]
fn padded_products_keep_their_coefficient_in_place() {
    let vector = |values: &[f64]| DoubleVector::from_slice(values).unwrap();
    let data = Dataset::new().with_column("w", Column::Vector(vec![vector(&[1.0, 1.0])]))
                             .with_column("v", Column::Vector(vec![vector(&[1.0, 2.0, 3.0])]));
    let config = ParserConfig::with_vector_variables(["v", "w"]);
    let tree = parse_formula("w * v * 2", &config).unwrap();
    let simplified = Simplifier::default().simplify(&tree).unwrap();

    let config = InterpreterConfig { length_strategy:   LengthStrategy::FillShorterWithNeutralElement,
                                     final_aggregation: FinalAggregation::Sum, };
    let interpreter = Interpreter::new(config);
    for formula in [&tree, &simplified] {
        let values = interpreter.evaluate_rows(formula, &data, 0..1).unwrap();
        let total: Vec<f64> = values.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(total, [12.0], "{formula}");
    }
}
