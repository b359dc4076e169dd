use std::{error::Error, fs, ops::Range};

use clap::Parser;
use log::info;
use serde::Deserialize;
use symvec::{
    dataset::Dataset,
    interpreter::{
        evaluator::{
            core::{FinalAggregation, Interpreter, InterpreterConfig},
            reconcile::LengthStrategy,
        },
        parser::core::{ParserConfig, parse_formula},
    },
    simplifier::core::{Simplifier, SimplifierConfig},
};

/// symvec evaluates a symbolic formula on every row of a dataset whose cells
/// may be scalars, vectors or categories.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The formula, for example "mean(v) * 2 + x".
    formula: String,

    /// JSON file mapping column names to arrays of row values.
    #[arg(short, long)]
    data: Option<String>,

    /// Rows to evaluate as "start..end"; all rows by default.
    #[arg(short, long, value_parser = parse_rows)]
    rows: Option<Range<usize>>,

    /// Simplifies the formula and prints it before evaluating.
    #[arg(short, long)]
    simplify: bool,

    /// Policy for vector operands of different lengths.
    #[arg(long)]
    length_strategy: Option<LengthStrategy>,

    /// Reduction applied when a row evaluates to a vector.
    #[arg(long)]
    final_aggregation: Option<FinalAggregation>,

    /// JSON file with "interpreter" and "simplifier" settings.
    #[arg(short, long)]
    config: Option<String>,

    /// Names of variables that hold vectors; inferred from the dataset when
    /// omitted.
    #[arg(long, value_delimiter = ',')]
    vector: Vec<String>,
}

/// Settings loaded with `--config`; flags take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    interpreter: InterpreterConfig,
    simplifier:  SimplifierConfig,
}

fn parse_rows(text: &str) -> Result<Range<usize>, String> {
    let (start, end) = text.split_once("..")
                           .ok_or_else(|| format!("expected 'start..end', found '{text}'"))?;
    let start = start.trim().parse::<usize>().map_err(|e| e.to_string())?;
    let end = end.trim().parse::<usize>().map_err(|e| e.to_string())?;
    if start > end {
        return Err(format!("empty row range {start}..{end}"));
    }
    Ok(start..end)
}

fn read(path: &str) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read '{path}': {e}").into())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut settings = match &args.config {
        Some(path) => serde_json::from_str::<Settings>(&read(path)?)?,
        None => Settings::default(),
    };
    if let Some(strategy) = args.length_strategy {
        settings.interpreter.length_strategy = strategy;
    }
    if let Some(aggregation) = args.final_aggregation {
        settings.interpreter.final_aggregation = aggregation;
    }

    let data = match &args.data {
        Some(path) => Dataset::from_json(&read(path)?)?,
        None => Dataset::new(),
    };

    let mut vector_names = args.vector;
    if vector_names.is_empty() {
        vector_names = data.names()
                           .filter(|name| data.column(name).is_some_and(|c| c.kind() == "vector"))
                           .map(str::to_string)
                           .collect();
    }
    let parser_config = ParserConfig::with_vector_variables(vector_names);
    let mut tree = parse_formula(&args.formula, &parser_config)?;

    if args.simplify {
        tree = Simplifier::new(settings.simplifier).simplify(&tree)?;
        println!("{tree}");
    }

    // A formula without variables still evaluates once.
    let rows = args.rows.unwrap_or(0..data.rows().max(1));
    info!("evaluating {} rows", rows.len());

    let interpreter = Interpreter::new(settings.interpreter);
    let values = interpreter.evaluate_rows(&tree, &data, rows)?;
    for value in &values {
        println!("{}", value?);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
