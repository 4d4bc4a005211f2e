use super::types::NodeId;
use serde::{Deserialize, Serialize};

/// Issues node ids for a single graph: 0, 1, 2, ... never reused.
///
/// There is no reset. Each `Graph` owns its own allocator, so unrelated
/// graphs (and unrelated tests) never observe each other's counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self { Self::default() }

    pub fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> usize { self.next as usize }
}
