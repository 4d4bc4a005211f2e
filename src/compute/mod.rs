//! Evaluates and differentiates the expression graph.
pub mod engine;
pub mod error;
pub mod kernel;

pub use engine::Engine;
pub use error::{AutodiffError, Result};
pub use kernel::Dual;
