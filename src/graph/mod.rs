//! Public handle layer over the node store.
pub mod array;
pub mod compare;
pub mod context;
pub mod expr;
pub mod function;
pub mod math;
pub mod ops;
pub mod operand;

pub use array::Array;
pub use context::Graph;
pub use expr::{Expr, Var};
pub use function::{Function, Value};
pub use operand::Operand;
