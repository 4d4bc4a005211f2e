use super::allocator::IdAllocator;
use super::types::*;
use crate::compute::error::AutodiffError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    allocator: IdAllocator,

    // Columnar Arrays
    pub kinds: Vec<NodeKind>,
    pub meta: Vec<NodeMetadata>,

    // Operands (CSR): every operand id is smaller than the node using it.
    pub operands_flat: Vec<NodeId>,
    pub operand_ranges: Vec<(u32, u32)>, // (start, count)

    // Ephemeral state for uniqueness checks (Not serialized, rebuilt on load)
    #[serde(skip)]
    pub used_names: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.kinds.len() }

    /// Rebuilds the `used_names` set after deserialization.
    pub fn rebuild_name_cache(&mut self) {
        self.used_names = self.meta.iter().filter_map(|m| m.name.clone()).collect();
    }

    pub fn add_node(&mut self, kind: NodeKind, operands: &[NodeId], mut meta: NodeMetadata) -> NodeId {
        let id = self.allocator.allocate();
        debug_assert_eq!(id.index(), self.kinds.len());

        // --- Unique Name Enforcement ---
        if let Some(original_name) = meta.name.take() {
            let mut candidate_name = original_name.clone();
            let mut counter = 1;
            while self.used_names.contains(&candidate_name) {
                candidate_name = format!("{}_{}", original_name, counter);
                counter += 1;
            }
            self.used_names.insert(candidate_name.clone());
            meta.name = Some(candidate_name);
        }

        let start = self.operands_flat.len() as u32;
        self.operands_flat.extend_from_slice(operands);
        self.operand_ranges.push((start, operands.len() as u32));

        self.kinds.push(kind);
        self.meta.push(meta);
        id
    }

    #[inline(always)]
    pub fn get_operands(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.operand_ranges[id.index()];
        let start = start as usize;
        &self.operands_flat[start..start + count as usize]
    }

    pub fn contains(&self, id: NodeId) -> bool { id.index() < self.count() }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> { self.kinds.get(id.index()) }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.meta.get(id.index())?.name.as_deref()
    }

    /// Overwrites the payload of a Variable node.
    pub fn set_variable(&mut self, id: NodeId, value: Option<f64>) -> Result<(), AutodiffError> {
        match self.kinds.get_mut(id.index()) {
            Some(NodeKind::Variable(slot)) => {
                *slot = value;
                Ok(())
            }
            Some(_) => Err(AutodiffError::InvalidArgument(format!("node {} is not a variable", id))),
            None => Err(AutodiffError::UnknownNode(id)),
        }
    }

    /// Checks the structural invariants of a registry that did not come from
    /// `add_node`, e.g. one read back from a snapshot.
    pub fn validate(&self) -> Result<(), AutodiffError> {
        let count = self.count();
        if self.meta.len() != count || self.operand_ranges.len() != count {
            return Err(AutodiffError::InvalidArgument("column lengths disagree".into()));
        }
        if self.allocator.issued() != count {
            return Err(AutodiffError::InvalidArgument(format!(
                "allocator issued {} ids for {} nodes", self.allocator.issued(), count
            )));
        }
        for (i, kind) in self.kinds.iter().enumerate() {
            let id = NodeId::new(i);
            let (start, len) = self.operand_ranges[i];
            let end = (start as usize).checked_add(len as usize);
            if end.map_or(true, |end| end > self.operands_flat.len()) {
                return Err(AutodiffError::InvalidArgument(format!("operand range of {} is out of bounds", id)));
            }
            let operands = self.get_operands(id);
            let expected = match kind {
                NodeKind::Formula(op) => op.arity(),
                _ => 0,
            };
            if operands.len() != expected {
                return Err(AutodiffError::InvalidArgument(format!(
                    "node {} has {} operands, expected {}", id, operands.len(), expected
                )));
            }
            if let Some(bad) = operands.iter().find(|o| o.index() >= i) {
                return Err(AutodiffError::InvalidArgument(format!(
                    "node {} references {} which is not an earlier node", id, bad
                )));
            }
        }
        Ok(())
    }
}
