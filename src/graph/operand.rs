use super::expr::{Expr, Var};

/// Anything a composite node, an `Array` slot or a comparison accepts.
///
/// Inputs are normalized into this union before they reach the store:
/// `Node` is used as-is, `Scalar` becomes a Constant node, and `Sequence`
/// is rejected wherever exactly one scalar is required.
#[derive(Debug, Clone)]
pub enum Operand {
    Node(Expr),
    Scalar(f64),
    Sequence(Vec<Operand>),
}

impl Operand {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Operand::Node(_) => "node",
            Operand::Scalar(_) => "scalar",
            Operand::Sequence(_) => "sequence",
        }
    }
}

impl From<Expr> for Operand {
    fn from(e: Expr) -> Self { Operand::Node(e) }
}

impl From<&Expr> for Operand {
    fn from(e: &Expr) -> Self { Operand::Node(e.clone()) }
}

impl From<Var> for Operand {
    fn from(v: Var) -> Self { Operand::Node(v.into_expr()) }
}

impl From<&Var> for Operand {
    fn from(v: &Var) -> Self { Operand::Node(v.as_expr().clone()) }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self { Operand::Scalar(v) }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self { Operand::Scalar(v as f64) }
}

impl From<Vec<f64>> for Operand {
    fn from(values: Vec<f64>) -> Self {
        Operand::Sequence(values.into_iter().map(Operand::Scalar).collect())
    }
}

impl From<&[f64]> for Operand {
    fn from(values: &[f64]) -> Self {
        Operand::Sequence(values.iter().copied().map(Operand::Scalar).collect())
    }
}

impl From<Vec<Expr>> for Operand {
    fn from(nodes: Vec<Expr>) -> Self {
        Operand::Sequence(nodes.into_iter().map(Operand::Node).collect())
    }
}
