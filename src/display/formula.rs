//! Infix rendering of expressions, e.g. `3 * x^2 + sin(y)`.
use crate::graph::Expr;
use crate::store::{NodeId, NodeKind, Operation, Registry};
use std::f64::consts::E;
use std::fmt::{self, Write};

// Binding strength; higher binds tighter.
const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const PREFIX: u8 = 3;
const POWER: u8 = 4;
const ATOM: u8 = 5;

pub(crate) fn leaf_label(registry: &Registry, id: NodeId) -> String {
    registry.name(id).map_or_else(|| format!("v{}", id.0), str::to_string)
}

fn precedence(registry: &Registry, id: NodeId) -> u8 {
    match &registry.kinds[id.index()] {
        NodeKind::Constant(v) if *v < 0.0 => PREFIX,
        NodeKind::Formula(op) => match op {
            Operation::Add | Operation::Subtract => SUM,
            Operation::Multiply | Operation::Divide => PRODUCT,
            Operation::Negate | Operation::UnaryPlus => PREFIX,
            Operation::Power => POWER,
            _ => ATOM,
        },
        _ => ATOM,
    }
}

fn render(registry: &Registry, id: NodeId, min_prec: u8, out: &mut String) -> fmt::Result {
    let wrap = precedence(registry, id) < min_prec;
    if wrap {
        out.push('(');
    }
    match &registry.kinds[id.index()] {
        NodeKind::Variable(_) => out.push_str(&leaf_label(registry, id)),
        NodeKind::Constant(v) => write!(out, "{}", v)?,
        NodeKind::Formula(op) => {
            let args = registry.get_operands(id);
            match op {
                Operation::Add | Operation::Subtract | Operation::Multiply | Operation::Divide | Operation::Power => {
                    let prec = precedence(registry, id);
                    // Left-associative, except power which groups to the right.
                    let (lhs_min, rhs_min) = match op {
                        Operation::Add | Operation::Multiply => (prec, prec),
                        Operation::Power => (prec + 1, prec),
                        _ => (prec, prec + 1),
                    };
                    render(registry, args[0], lhs_min, out)?;
                    let symbol = op.symbol().unwrap_or("?");
                    if *op == Operation::Power {
                        out.push_str(symbol);
                    } else {
                        write!(out, " {} ", symbol)?;
                    }
                    render(registry, args[1], rhs_min, out)?;
                }
                Operation::Negate => {
                    out.push('-');
                    render(registry, args[0], PREFIX + 1, out)?;
                }
                Operation::UnaryPlus => {
                    out.push('+');
                    render(registry, args[0], PREFIX + 1, out)?;
                }
                Operation::Log if matches!(registry.kinds[args[1].index()], NodeKind::Constant(b) if b == E) => {
                    out.push_str("ln(");
                    render(registry, args[0], 0, out)?;
                    out.push(')');
                }
                _ => {
                    write!(out, "{}(", op.name())?;
                    for (i, &arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        render(registry, arg, 0, out)?;
                    }
                    out.push(')');
                }
            }
        }
    }
    if wrap {
        out.push(')');
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        render(&self.graph().registry(), self.id(), 0, &mut out)?;
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn test_formula_rendering() {
        let g = Graph::new();
        let x = g.named_variable("x", None);
        let y = g.named_variable("y", None);

        assert_eq!((3.0 * x.pow(2.0) + 2.0 * &y).to_string(), "3 * x^2 + 2 * y");
        assert_eq!(((&x + &y) * &x).to_string(), "(x + y) * x");
        assert_eq!((&x - (&y - 1.0)).to_string(), "x - (y - 1)");
        assert_eq!((-(&x + 1.0)).to_string(), "-(x + 1)");
        assert_eq!((x.sin() + y.cos()).to_string(), "sin(x) + cos(y)");
        assert_eq!(x.ln().to_string(), "ln(x)");
        assert_eq!(x.log(&y).to_string(), "log(x, y)");
        assert_eq!(x.logistic(0.5, 2.0, 5.0).to_string(), "logistic(x, 0.5, 2, 5)");
    }

    #[test]
    fn test_unnamed_variables_use_ids() {
        let g = Graph::new();
        let a = g.variable();
        let b = g.variable();
        assert_eq!((&a / &b).to_string(), "v0 / v1");
    }
}
