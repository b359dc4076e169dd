use std::fs;

use approx::relative_eq;
use symvec::{
    dataset::{Column, Dataset},
    interpreter::{
        evaluator::core::Interpreter,
        parser::core::{ParserConfig, parse_formula},
        value::DoubleVector,
    },
    simplifier::{
        composite::expand_composites,
        core::{Simplifier, SimplifierConfig},
    },
    tree::SymbolicNode,
};
use walkdir::WalkDir;

fn fixture() -> Dataset {
    let vectors = |rows: &[[f64; 4]]| {
        Column::Vector(rows.iter()
                           .map(|r| DoubleVector::from_slice(r).unwrap())
                           .collect())
    };
    Dataset::new().with_column("x", Column::Scalar(vec![0.5, -1.25, 2.0, 3.5]))
                  .with_column("y", Column::Scalar(vec![1.0, 2.0, -0.5, 0.25]))
                  .with_column("v",
                               vectors(&[[1.0, 2.0, 3.0, 4.0],
                                         [-1.0, 0.5, 0.25, 2.0],
                                         [3.0, 3.0, 1.0, -2.0],
                                         [0.0, 1.5, -1.5, 0.75]]))
                  .with_column("w",
                               vectors(&[[2.0, 1.0, 0.0, -1.0],
                                         [0.5, 0.5, 1.0, 1.5],
                                         [-2.0, 4.0, 1.0, 3.0],
                                         [1.25, 1.0, 2.5, -0.5]]))
                  .with_column("c",
                               Column::Categorical(["a", "b", "a", "z"].map(String::from).to_vec()))
}

fn evaluate(tree: &SymbolicNode, data: &Dataset) -> Vec<f64> {
    let interpreter = Interpreter::default();
    let values = interpreter.evaluate_rows(tree, data, 0..data.rows())
                            .unwrap_or_else(|e| panic!("cannot evaluate {tree}: {e}"));
    values.iter()
          .collect::<Result<_, _>>()
          .unwrap_or_else(|e| panic!("cannot evaluate {tree}: {e}"))
}

fn assert_same_values(formula: &str, expected: &[f64], actual: &[f64]) {
    for (row, (e, a)) in expected.iter().zip(actual).enumerate() {
        let same = (e.is_nan() && a.is_nan()) || relative_eq!(*e, *a, epsilon = 1e-9, max_relative = 1e-9);
        assert!(same, "'{formula}' row {row}: expected {e}, found {a}");
    }
}

#[test]
fn formula_files_simplify_without_changing_values() {
    let data = fixture();
    let config = ParserConfig::with_vector_variables(["v", "w"]);
    let limits = SimplifierConfig::default();
    let simplifier = Simplifier::new(limits);
    let mut count = 0;

    for entry in
        WalkDir::new("tests/formulas").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for formula in content.lines()
                              .map(str::trim)
                              .filter(|l| !l.is_empty() && !l.starts_with('#'))
        {
            count += 1;
            let tree = parse_formula(formula, &config).unwrap_or_else(|e| {
                                                           panic!("'{formula}' in {path:?} does not parse: {e}")
                                                       });
            let reference = expand_composites(&tree, limits.max_depth, limits.max_nodes).unwrap();
            let simplified = simplifier.simplify(&tree).unwrap();

            let expected = evaluate(&reference, &data);
            assert_same_values(formula, &expected, &evaluate(&simplified, &data));

            let printed = simplified.to_string();
            let reparsed = parse_formula(&printed, &config).unwrap_or_else(|e| {
                                                               panic!("'{printed}' does not parse back: {e}")
                                                           });
            assert_same_values(formula, &expected, &evaluate(&reparsed, &data));

            assert_eq!(simplifier.simplify(&simplified).unwrap(), simplified, "'{formula}'");
        }
    }

    assert!(count > 0, "No formulas found in tests/formulas");
}
