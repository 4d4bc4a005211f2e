//! The graph-construction context.
//!
//! A `Graph` owns one `Registry` (and with it the id allocator) behind a
//! shared, single-threaded handle. Every `Expr` keeps a clone of the handle,
//! so a Variable stays alive as long as any expression that uses it.
use super::expr::{Expr, Var};
use super::operand::Operand;
use crate::compute::{AutodiffError, Engine, Result};
use crate::store::{NodeId, NodeKind, NodeMetadata, Operation, Registry};
use smallvec::SmallVec;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct Graph {
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("nodes", &self.len()).finish()
    }
}

impl Graph {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.registry.borrow().count() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// True when both handles point at the same underlying graph.
    pub fn same_graph(&self, other: &Graph) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }

    pub(crate) fn registry(&self) -> Ref<'_, Registry> { self.registry.borrow() }

    pub(crate) fn with_engine<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        let registry = self.registry.borrow();
        f(&Engine::new(&registry))
    }

    pub(crate) fn set_variable(&self, id: NodeId, value: Option<f64>) -> Result<()> {
        self.registry.borrow_mut().set_variable(id, value)
    }

    fn push(&self, kind: NodeKind, operands: &[NodeId], meta: NodeMetadata) -> NodeId {
        self.registry.borrow_mut().add_node(kind, operands, meta)
    }

    fn handle(&self, id: NodeId) -> Expr { Expr::new(self.clone(), id) }

    // --- Leaves ---

    /// A Variable without a value. Evaluating it fails until `set_value`.
    pub fn variable(&self) -> Var {
        Var::new(self.handle(self.push(NodeKind::Variable(None), &[], NodeMetadata::default())))
    }

    pub fn variable_with(&self, value: f64) -> Var {
        Var::new(self.handle(self.push(NodeKind::Variable(Some(value)), &[], NodeMetadata::default())))
    }

    /// A named Variable. Duplicate names get a numeric suffix.
    pub fn named_variable(&self, name: &str, value: Option<f64>) -> Var {
        let meta = NodeMetadata { name: Some(name.to_string()) };
        Var::new(self.handle(self.push(NodeKind::Variable(value), &[], meta)))
    }

    pub fn constant(&self, value: f64) -> Expr {
        self.handle(self.push(NodeKind::Constant(value), &[], NodeMetadata::default()))
    }

    pub fn try_constant(&self, value: Option<f64>) -> Result<Expr> {
        value.map(|v| self.constant(v)).ok_or(AutodiffError::MissingConstantValue)
    }

    // --- Composites ---

    /// Normalizes one operand into a node of this graph.
    pub fn coerce(&self, operand: impl Into<Operand>) -> Result<Expr> {
        match operand.into() {
            Operand::Node(e) if e.graph().same_graph(self) => Ok(e),
            Operand::Node(e) => Err(AutodiffError::ForeignNode(e.id())),
            Operand::Scalar(v) => Ok(self.constant(v)),
            Operand::Sequence(items) => Err(AutodiffError::Shape { len: items.len() }),
        }
    }

    /// Builds a composite node, wrapping scalar operands as Constants.
    pub fn try_apply<I>(&self, op: Operation, operands: I) -> Result<Expr>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let ids = operands
            .into_iter()
            .map(|o| self.coerce(o).map(|e| e.id()))
            .collect::<Result<SmallVec<[NodeId; 4]>>>()?;
        if ids.len() != op.arity() {
            return Err(AutodiffError::OperandCountMismatch {
                op: op.name(),
                expected: op.arity(),
                actual: ids.len(),
            });
        }
        Ok(self.handle(self.push(NodeKind::Formula(op), &ids, NodeMetadata::default())))
    }

    /// Infallible form of [`Graph::try_apply`] used by the operator sugar.
    ///
    /// # Panics
    ///
    /// Panics if an operand belongs to another graph, is a sequence, or the
    /// operand count does not match the operation.
    pub fn apply<I>(&self, op: Operation, operands: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.try_apply(op, operands).unwrap_or_else(|e| panic!("{}", e))
    }

    /// `base ^ exponent`; either side may be a plain number.
    pub fn pow(&self, base: impl Into<Operand>, exponent: impl Into<Operand>) -> Expr {
        self.apply(Operation::Power, [base.into(), exponent.into()])
    }

    /// Sum of `terms` as a balanced tree of Add nodes, so the depth grows
    /// with log2 of the term count. An empty sum is the constant 0.
    pub fn sum<I>(&self, terms: I) -> Result<Expr>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let mut level = terms.into_iter().map(|t| self.coerce(t)).collect::<Result<Vec<_>>>()?;
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut pending = level.into_iter();
            while let Some(lhs) = pending.next() {
                next.push(match pending.next() {
                    Some(rhs) => self.try_apply(Operation::Add, [lhs, rhs])?,
                    None => lhs,
                });
            }
            level = next;
        }
        Ok(level.pop().unwrap_or_else(|| self.constant(0.0)))
    }

    // --- Lookup ---

    pub fn node(&self, id: NodeId) -> Option<Expr> {
        self.registry().contains(id).then(|| self.handle(id))
    }

    pub fn var(&self, id: NodeId) -> Option<Var> {
        let is_variable = self.registry().kind(id).is_some_and(NodeKind::is_variable);
        is_variable.then(|| Var::new(self.handle(id)))
    }

    pub fn find_variable(&self, name: &str) -> Option<Var> {
        let id = {
            let registry = self.registry();
            (0..registry.count())
                .map(NodeId::new)
                .find(|&id| registry.kinds[id.index()].is_variable() && registry.name(id) == Some(name))
        };
        id.map(|id| Var::new(self.handle(id)))
    }

    /// Every Variable in the graph, in creation order.
    pub fn variables(&self) -> Vec<Var> {
        let ids: Vec<NodeId> = {
            let registry = self.registry();
            (0..registry.count()).map(NodeId::new).filter(|id| registry.kinds[id.index()].is_variable()).collect()
        };
        ids.into_iter().map(|id| Var::new(self.handle(id))).collect()
    }

    // --- Snapshots ---

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.registry())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut registry: Registry = serde_json::from_str(json)?;
        registry.validate()?;
        registry.rebuild_name_cache();
        Ok(Self { registry: Rc::new(RefCell::new(registry)) })
    }
}
