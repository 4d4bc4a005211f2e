use crate::store::{NodeId, NodeKind, Registry};

/// Every node reachable from `roots`, in ascending id order.
///
/// An operand always has a smaller id than its user, so ascending id order
/// is already a valid evaluation order. Reachability is marked in a single
/// backward sweep, which keeps the walk iterative for arbitrarily deep chains.
pub fn sort(registry: &Registry, roots: &[NodeId]) -> Vec<NodeId> {
    let Some(top) = roots.iter().filter(|&&r| registry.contains(r)).map(|r| r.index()).max() else {
        return Vec::new();
    };
    let mut reachable = vec![false; top + 1];
    for &root in roots.iter().filter(|&&r| registry.contains(r)) {
        reachable[root.index()] = true;
    }
    for index in (0..=top).rev() {
        if reachable[index] {
            for &operand in registry.get_operands(NodeId::new(index)) {
                reachable[operand.index()] = true;
            }
        }
    }
    reachable.iter().enumerate().filter_map(|(i, &r)| r.then(|| NodeId::new(i))).collect()
}

/// Variables reachable from `roots`, ordered by id.
pub fn upstream_variables(registry: &Registry, roots: &[NodeId]) -> Vec<NodeId> {
    let mut vars: Vec<NodeId> = sort(registry, roots)
        .into_iter()
        .filter(|id| matches!(registry.kinds[id.index()], NodeKind::Variable(_)))
        .collect();
    vars.sort();
    vars
}

/// Longest operand chain below `root`, counting `root` itself (a leaf has depth 1).
pub fn depth(registry: &Registry, root: NodeId) -> usize {
    let order = sort(registry, &[root]);
    let mut depths = vec![0usize; registry.count()];
    for &id in &order {
        let deepest = registry.get_operands(id).iter().map(|o| depths[o.index()]).max().unwrap_or(0);
        depths[id.index()] = deepest + 1;
    }
    if registry.contains(root) { depths[root.index()] } else { 0 }
}
