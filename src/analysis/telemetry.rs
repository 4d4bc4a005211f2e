use super::topology;
use crate::store::{NodeId, NodeKind, Registry};
use std::collections::HashMap;

/// Size and shape of the sub-graph below one or more roots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprStats {
    /// Distinct nodes reachable from the roots (shared nodes count once).
    pub total_nodes: usize,
    pub variables: usize,
    pub constants: usize,
    /// Longest root-to-leaf chain.
    pub depth: usize,
    pub op_counts: HashMap<&'static str, usize>,
}

impl ExprStats {
    pub fn analyze(registry: &Registry, roots: &[NodeId]) -> Self {
        let order = topology::sort(registry, roots);
        let mut stats = Self { total_nodes: order.len(), ..Default::default() };

        for &id in &order {
            match &registry.kinds[id.index()] {
                NodeKind::Variable(_) => stats.variables += 1,
                NodeKind::Constant(_) => stats.constants += 1,
                NodeKind::Formula(op) => *stats.op_counts.entry(op.name()).or_insert(0) += 1,
            }
        }
        stats.depth = roots.iter().map(|&r| topology::depth(registry, r)).max().unwrap_or(0);
        stats
    }

    pub fn formulas(&self) -> usize {
        self.op_counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn test_stats_count_shared_nodes_once() {
        // f = 3*x^2 + 2*y
        let g = Graph::new();
        let x = g.variable_with(3.0);
        let y = g.variable_with(4.0);
        let f = 3.0 * x.pow(2.0) + 2.0 * &y;

        let stats = f.stats();
        assert_eq!(stats.variables, 2);
        assert_eq!(stats.constants, 3);
        assert_eq!(stats.op_counts["mul"], 2);
        assert_eq!(stats.op_counts["pow"], 1);
        assert_eq!(stats.op_counts["add"], 1);
        assert_eq!(stats.formulas(), 4);
        assert_eq!(stats.total_nodes, 9);
        assert_eq!(stats.depth, 4);
    }
}
