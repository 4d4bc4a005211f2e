use super::array::Array;
use super::context::Graph;
use super::expr::{Expr, Var};
use crate::analysis::topology;
use crate::compute::Result;
use crate::store::NodeId;

/// The result of evaluating a [`Function`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Value {
    pub fn len(&self) -> usize {
        match self { Value::Scalar(_) => 1, Value::Vector(v) => v.len() }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn as_scalar(&self) -> Option<f64> {
        match self { Value::Scalar(s) => Some(*s), Value::Vector(_) => None }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match self { Value::Scalar(s) => vec![*s], Value::Vector(v) => v.clone() }
    }

    /// Euclidean norm of the value.
    pub fn norm(&self) -> f64 {
        match self {
            Value::Scalar(s) => s.abs(),
            Value::Vector(v) => v.iter().map(|x| x * x).sum::<f64>().sqrt(),
        }
    }
}

/// What optimizers consume: either a scalar node or a vector of them.
#[derive(Debug, Clone)]
pub enum Function {
    Scalar(Expr),
    Vector(Array),
}

impl Function {
    pub fn is_vector(&self) -> bool { matches!(self, Function::Vector(_)) }

    pub fn graph(&self) -> &Graph {
        match self { Function::Scalar(e) => e.graph(), Function::Vector(a) => a.graph() }
    }

    pub fn value(&self) -> Result<Value> {
        match self {
            Function::Scalar(e) => e.value().map(Value::Scalar),
            Function::Vector(a) => a.value().map(Value::Vector),
        }
    }

    /// Jacobian rows; a scalar function yields a single row (its gradient).
    pub fn grad(&self, targets: &[Var]) -> Result<Vec<Vec<f64>>> {
        match self {
            Function::Scalar(e) => Ok(vec![e.grad(targets)?]),
            Function::Vector(a) => a.grad(targets),
        }
    }

    /// Variables any component depends on, ordered by id.
    pub fn variables(&self) -> Vec<Var> {
        let roots: Vec<NodeId> = match self {
            Function::Scalar(e) => vec![e.id()],
            Function::Vector(a) => a.iter().map(Expr::id).collect(),
        };
        let graph = self.graph();
        let ids = topology::upstream_variables(&graph.registry(), &roots);
        ids.into_iter().filter_map(|id| graph.var(id)).collect()
    }
}

impl From<Expr> for Function {
    fn from(e: Expr) -> Self { Function::Scalar(e) }
}

impl From<Var> for Function {
    fn from(v: Var) -> Self { Function::Scalar(v.into_expr()) }
}

impl From<Array> for Function {
    fn from(a: Array) -> Self { Function::Vector(a) }
}
