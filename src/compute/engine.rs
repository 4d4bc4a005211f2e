//! Forward evaluation over a `Registry`.
//!
//! Each call walks the nodes below the root once, in ascending id order,
//! into a scratch buffer that is dropped when the call returns. Nothing is
//! kept between calls, so values set in between are always observed.
use super::error::{AutodiffError, Result};
use super::kernel::{self, Dual};
use crate::analysis::topology;
use crate::store::{NodeId, NodeKind, Operation, Registry};
use smallvec::SmallVec;

pub struct Engine<'a> {
    registry: &'a Registry,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    fn kind(&self, id: NodeId) -> Result<&'a NodeKind> {
        self.registry.kind(id).ok_or(AutodiffError::UnknownNode(id))
    }

    fn unset(&self, id: NodeId) -> AutodiffError {
        let name = self.registry.name(id).map_or_else(|| format!("v{}", id.0), str::to_string);
        AutodiffError::UnsetValue { node_id: id, name }
    }

    /// Evaluates every node below `root` exactly once, operands first.
    fn sweep<T: Copy>(
        &self,
        root: NodeId,
        leaf: impl Fn(NodeId, f64) -> T,
        combine: impl Fn(Operation, &[T]) -> T,
    ) -> Result<T> {
        self.kind(root)?;
        let mut slots: Vec<Option<T>> = vec![None; root.index() + 1];
        for id in topology::sort(self.registry, &[root]) {
            let slot = match &self.registry.kinds[id.index()] {
                NodeKind::Variable(Some(v)) => leaf(id, *v),
                NodeKind::Variable(None) => return Err(self.unset(id)),
                NodeKind::Constant(v) => leaf(id, *v),
                NodeKind::Formula(op) => {
                    let args = self
                        .registry
                        .get_operands(id)
                        .iter()
                        .map(|&operand| slots[operand.index()].ok_or(AutodiffError::UnknownNode(operand)))
                        .collect::<Result<SmallVec<[T; 4]>>>()?;
                    combine(*op, &args)
                }
            };
            slots[id.index()] = Some(slot);
        }
        slots[root.index()].ok_or(AutodiffError::UnknownNode(root))
    }

    /// Current scalar value of `id`.
    pub fn value(&self, id: NodeId) -> Result<f64> {
        self.sweep(id, |_, v| v, kernel::evaluate)
    }

    /// Value of `id` together with its derivative with respect to `target`.
    ///
    /// `target` is matched by identity: only the Variable whose id equals
    /// `target` seeds a derivative of 1. Constants never do.
    pub fn dual(&self, id: NodeId, target: NodeId) -> Result<Dual> {
        self.sweep(
            id,
            |leaf, v| match self.registry.kinds[leaf.index()] {
                NodeKind::Variable(_) if leaf == target => Dual::new(v, 1.0),
                _ => Dual::constant(v),
            },
            kernel::differentiate,
        )
    }

    /// Partial derivative of `id` with respect to the Variable `target`.
    pub fn derivative(&self, id: NodeId, target: NodeId) -> Result<f64> {
        match self.kind(target)? {
            NodeKind::Variable(_) => Ok(self.dual(id, target)?.deriv),
            _ => Err(AutodiffError::InvalidArgument(format!(
                "derivative target {} is not a variable", target
            ))),
        }
    }

    /// Derivatives of `id` with respect to each target, in order.
    pub fn gradient(&self, id: NodeId, targets: &[NodeId]) -> Result<Vec<f64>> {
        targets.iter().map(|&t| self.derivative(id, t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NodeMetadata, Operation};
    use approx::assert_relative_eq;

    fn leaf(reg: &mut Registry, kind: NodeKind) -> NodeId {
        reg.add_node(kind, &[], NodeMetadata::default())
    }

    fn formula(reg: &mut Registry, op: Operation, operands: &[NodeId]) -> NodeId {
        reg.add_node(NodeKind::Formula(op), operands, NodeMetadata::default())
    }

    #[test]
    fn test_shared_variable_in_diamond() {
        // f = x*x + x, f'(x) = 2x + 1
        let mut reg = Registry::new();
        let x = leaf(&mut reg, NodeKind::Variable(Some(3.0)));
        let sq = formula(&mut reg, Operation::Multiply, &[x, x]);
        let f = formula(&mut reg, Operation::Add, &[sq, x]);

        let engine = Engine::new(&reg);
        assert_eq!(engine.value(f).unwrap(), 12.0);
        assert_eq!(engine.derivative(f, x).unwrap(), 7.0);
    }

    #[test]
    fn test_unset_variable_propagates() {
        let mut reg = Registry::new();
        let x = reg.add_node(NodeKind::Variable(None), &[], NodeMetadata { name: Some("x".into()) });
        let f = formula(&mut reg, Operation::Cos, &[x]);

        let err = Engine::new(&reg).derivative(f, x).unwrap_err();
        assert_eq!(err, AutodiffError::UnsetValue { node_id: x, name: "x".into() });

        reg.set_variable(x, Some(std::f64::consts::FRAC_PI_2)).unwrap();
        assert_relative_eq!(Engine::new(&reg).derivative(f, x).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_target_must_be_variable() {
        let mut reg = Registry::new();
        let c = leaf(&mut reg, NodeKind::Constant(2.0));
        let f = formula(&mut reg, Operation::Exp, &[c]);
        let err = Engine::new(&reg).derivative(f, c).unwrap_err();
        assert!(matches!(err, AutodiffError::InvalidArgument(_)));
    }

    #[test]
    fn test_gradient_preserves_target_order() {
        // f = x * y
        let mut reg = Registry::new();
        let x = leaf(&mut reg, NodeKind::Variable(Some(5.0)));
        let y = leaf(&mut reg, NodeKind::Variable(Some(3.0)));
        let f = formula(&mut reg, Operation::Multiply, &[x, y]);
        assert_eq!(Engine::new(&reg).gradient(f, &[y, x]).unwrap(), vec![5.0, 3.0]);
    }

    #[test]
    fn test_deep_chain_evaluates_iteratively() {
        // f = x + x + ... + x, built as a left-deep chain
        let mut reg = Registry::new();
        let x = leaf(&mut reg, NodeKind::Variable(Some(0.5)));
        let mut f = x;
        for _ in 0..100_000 {
            f = formula(&mut reg, Operation::Add, &[f, x]);
        }
        let engine = Engine::new(&reg);
        assert_eq!(engine.value(f).unwrap(), 50_000.5);
        assert_eq!(engine.derivative(f, x).unwrap(), 100_001.0);
    }

    #[test]
    fn test_constant_with_target_id_is_not_seeded() {
        let mut reg = Registry::new();
        let c = leaf(&mut reg, NodeKind::Constant(4.0));
        assert_eq!(Engine::new(&reg).dual(c, c).unwrap(), Dual::constant(4.0));
    }

    #[test]
    fn test_unknown_node() {
        let reg = Registry::new();
        assert_eq!(Engine::new(&reg).value(NodeId(3)), Err(AutodiffError::UnknownNode(NodeId(3))));
    }
}
