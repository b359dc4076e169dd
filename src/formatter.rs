use std::fmt::{self, Write};

use crate::tree::{NodeParams, Symbol, SymbolicNode};

/// Prints `tree` in the syntax accepted by
/// [`parse_formula`](crate::interpreter::parser::core::parse_formula).
///
/// Operator nodes are fully parenthesized, so parsing the output yields a
/// tree that evaluates identically. Vector shapes are not printed; they come
/// from the parser configuration.
///
/// # Example
/// ```
/// use symvec::{
///     formatter::format_formula,
///     tree::{Symbol, SymbolicNode},
/// };
///
/// let tree = SymbolicNode::new(Symbol::Addition,
///                              vec![SymbolicNode::variable("x", 2.0),
///                                   SymbolicNode::unary(Symbol::Sine, SymbolicNode::number(1.5))]);
/// assert_eq!(format_formula(&tree), "(variable(x, 2.0) + sin(1.5))");
/// ```
#[must_use]
pub fn format_formula(tree: &SymbolicNode) -> String {
    tree.to_string()
}

impl fmt::Display for SymbolicNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.params, self.symbol) {
            (NodeParams::Number(v), Symbol::Constant) => write!(f, "const({v:?})"),
            (NodeParams::Number(v), _) => write!(f, "{v:?}"),
            (NodeParams::Variable(p), Symbol::LaggedVariable) => {
                write!(f, "lag({}, {}, {:?})", Name(&p.name), p.lag, p.weight)
            },
            (NodeParams::Variable(p), _) if p.weight == 1.0 => write!(f, "{}", Name(&p.name)),
            (NodeParams::Variable(p), _) => write!(f, "variable({}, {:?})", Name(&p.name), p.weight),
            (NodeParams::Factor(p), _) => {
                write!(f, "factor({}", Name(&p.name))?;
                for (category, weight) in &p.weights {
                    write!(f, ", {}: {weight:?}", Name(category))?;
                }
                f.write_char(')')
            },
            (NodeParams::BinaryFactor(p), _) => {
                write!(f, "binfactor({}, {}, {:?})", Name(&p.name), Name(&p.value), p.weight)
            },
            (NodeParams::Window(w), Symbol::SubVector) => {
                f.write_str("subvector(")?;
                write_list(f, &self.children)?;
                write!(f, ", {:?}, {:?}", w.start, w.end)?;
                write_flag(f, w.round_trip)
            },
            (NodeParams::Window(w), _) => {
                f.write_str("subvector_expr(")?;
                write_list(f, &self.children)?;
                write_flag(f, w.round_trip)
            },
            (NodeParams::Function(name), Symbol::Defun) => {
                write!(f, "defun({}, ", Name(name))?;
                write_list(f, &self.children)?;
                f.write_char(')')
            },
            (NodeParams::Function(name), _) => {
                write!(f, "invoke({}", Name(name))?;
                for child in &self.children {
                    write!(f, ", {child}")?;
                }
                f.write_char(')')
            },
            (NodeParams::Argument(index), _) => write!(f, "arg({index})"),
            (NodeParams::None, symbol) => write_operation(f, symbol, &self.children),
        }
    }
}

fn write_operation(f: &mut fmt::Formatter<'_>, symbol: Symbol, children: &[SymbolicNode]) -> fmt::Result {
    let operator = match symbol {
        Symbol::Addition => " + ",
        Symbol::Subtraction => " - ",
        Symbol::Multiplication => " * ",
        Symbol::Division => " / ",
        Symbol::Power => " ^ ",
        Symbol::ProgramRoot => {
            f.write_str("program(")?;
            write_list(f, children)?;
            return f.write_char(')');
        },
        Symbol::Start => return write_list(f, children),
        _ => {
            write!(f, "{}(", symbol.keyword())?;
            write_list(f, children)?;
            return f.write_char(')');
        },
    };

    match (symbol, children) {
        (Symbol::Subtraction, [only]) => write!(f, "-({only})"),
        (Symbol::Division, [only]) => write!(f, "(1.0 / {only})"),
        (_, [only]) => write!(f, "{only}"),
        _ => {
            f.write_char('(')?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(operator)?;
                }
                write!(f, "{child}")?;
            }
            f.write_char(')')
        },
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, children: &[SymbolicNode]) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{child}")?;
    }
    Ok(())
}

fn write_flag(f: &mut fmt::Formatter<'_>, round_trip: bool) -> fmt::Result {
    if round_trip {
        f.write_str(", true")?;
    }
    f.write_char(')')
}

/// A column, category or function name, quoted unless it is an identifier.
struct Name<'a>(&'a str);

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.0.chars();
        let is_identifier = chars.next()
                                 .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if is_identifier {
            f.write_str(self.0)
        } else {
            write!(f, "'{}'", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{
        formatter::format_formula,
        interpreter::parser::core::{ParserConfig, parse_formula},
        tree::SymbolicNode,
    };

    #[rstest]
    #[case("((x + 1.0) - (y * 2.0) - 3.0)")]
    #[case("(x ^ (2.0 ^ -1.0))")]
    #[case("mean(subvector(v, 0.25, 0.75, true))")]
    #[case("(lag(x, -2, 0.5) + factor(c, a: 1.0, 'b b': -2.0) + binfactor(c, a, 3.0))")]
    #[case("quantile(v, 0.5)")]
    #[case("subvector_expr(v, x, 1.0)")]
    #[case("program(invoke(f, x, 2.0), defun(f, (arg(0) * arg(1))))")]
    #[case("(const(2.5) * variable('outdoor temp', -1.5))")]
    fn prints_what_it_parses(#[case] source: &str) {
        let config = ParserConfig::with_vector_variables(["v"]);
        let tree = parse_formula(source, &config).unwrap();
        assert_eq!(format_formula(&tree), source);
    }

    #[test]
    fn unary_operators_keep_their_meaning() {
        let config = ParserConfig::default();
        let tree = parse_formula("-(x)", &config).unwrap();
        assert_eq!(format_formula(&tree), "-(x)");
        let reparsed = parse_formula(&format_formula(&tree), &config).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn window_without_operand_still_prints() {
        let mut tree = SymbolicNode::sub_vector(SymbolicNode::vector_variable("v", 1.0), 0.25, 0.75, false);
        tree.children.clear();
        assert_eq!(format_formula(&tree), "subvector(, 0.25, 0.75)");
    }
}
