use super::context::Graph;
use crate::analysis::{telemetry::ExprStats, topology};
use crate::compute::{AutodiffError, Result};
use crate::store::{NodeId, NodeKind, Operation};
use std::fmt;
use std::ops::Deref;

/// A handle to one scalar node of a [`Graph`].
///
/// Cloning is cheap and yields a handle to the *same* node. There is no
/// `PartialEq`: use [`Expr::same_node`] for identity and the `value_*`
/// methods for numeric comparison.
#[derive(Clone)]
pub struct Expr {
    graph: Graph,
    id: NodeId,
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.id)
    }
}

impl Expr {
    pub(crate) fn new(graph: Graph, id: NodeId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> NodeId { self.id }

    pub fn graph(&self) -> &Graph { &self.graph }

    pub fn same_node(&self, other: &Expr) -> bool {
        self.id == other.id && self.graph.same_graph(&other.graph)
    }

    pub fn name(&self) -> Option<String> {
        self.graph.registry().name(self.id).map(str::to_string)
    }

    /// The operator of a composite node; `None` for leaves.
    pub fn operation(&self) -> Option<Operation> {
        match self.graph.registry().kind(self.id) {
            Some(NodeKind::Formula(op)) => Some(*op),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.graph.registry().kind(self.id).is_some_and(NodeKind::is_variable)
    }

    pub fn as_var(&self) -> Option<Var> {
        self.is_variable().then(|| Var(self.clone()))
    }

    pub fn operands(&self) -> Vec<Expr> {
        let ids = self.graph.registry().get_operands(self.id).to_vec();
        ids.into_iter().map(|id| Expr::new(self.graph.clone(), id)).collect()
    }

    /// Evaluates the node from the current Variable values.
    pub fn value(&self) -> Result<f64> {
        self.graph.with_engine(|engine| engine.value(self.id))
    }

    /// Partial derivative with respect to `target` at the current values.
    pub fn der(&self, target: &Var) -> Result<f64> {
        self.check_target(target)?;
        self.graph.with_engine(|engine| engine.derivative(self.id, target.id()))
    }

    /// Derivatives with respect to each of `targets`, in the same order.
    pub fn grad(&self, targets: &[Var]) -> Result<Vec<f64>> {
        for target in targets {
            self.check_target(target)?;
        }
        let ids: Vec<NodeId> = targets.iter().map(|t| t.id()).collect();
        self.graph.with_engine(|engine| engine.gradient(self.id, &ids))
    }

    fn check_target(&self, target: &Var) -> Result<()> {
        if target.graph().same_graph(&self.graph) {
            Ok(())
        } else {
            Err(AutodiffError::ForeignNode(target.id()))
        }
    }

    /// Variables this expression depends on, ordered by id.
    pub fn variables(&self) -> Vec<Var> {
        let ids = topology::upstream_variables(&self.graph.registry(), &[self.id]);
        ids.into_iter().map(|id| Var(Expr::new(self.graph.clone(), id))).collect()
    }

    pub fn stats(&self) -> ExprStats {
        ExprStats::analyze(&self.graph.registry(), &[self.id])
    }
}

/// An [`Expr`] known to be a Variable: the only valid derivative target.
#[derive(Clone)]
pub struct Var(Expr);

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Var({})", self.0.id)
    }
}

impl Var {
    pub(crate) fn new(expr: Expr) -> Self {
        debug_assert!(expr.is_variable());
        Self(expr)
    }

    pub fn set_value(&self, value: f64) {
        let result = self.0.graph.set_variable(self.0.id, Some(value));
        debug_assert!(result.is_ok(), "Var always points at a variable node");
    }

    /// Returns the Variable to the unset state.
    pub fn clear_value(&self) {
        let result = self.0.graph.set_variable(self.0.id, None);
        debug_assert!(result.is_ok(), "Var always points at a variable node");
    }

    /// The stored payload, without raising on an unset Variable.
    pub fn get(&self) -> Option<f64> {
        match self.0.graph.registry().kind(self.0.id) {
            Some(NodeKind::Variable(v)) => *v,
            _ => None,
        }
    }

    pub fn as_expr(&self) -> &Expr { &self.0 }

    pub fn into_expr(self) -> Expr { self.0 }
}

impl Deref for Var {
    type Target = Expr;
    fn deref(&self) -> &Expr { &self.0 }
}

impl From<Var> for Expr {
    fn from(v: Var) -> Self { v.0 }
}
