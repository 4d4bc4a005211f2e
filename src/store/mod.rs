//! Arena storage for expression nodes.
pub mod allocator;
pub mod registry;
pub mod types;

pub use allocator::IdAllocator;
pub use registry::Registry;
pub use types::{NodeId, NodeKind, NodeMetadata, Operation};
