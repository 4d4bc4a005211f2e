//! Scalar forward-mode automatic differentiation over an expression graph.
//!
//! Expressions are built from [`Var`] and constant leaves with ordinary
//! arithmetic and the functions on [`Expr`]. Every node lives in the arena of
//! its [`Graph`]; values and derivatives are recomputed from the current
//! variable values on each request.
//!
//! ```
//! use autodiff_core::Graph;
//!
//! let g = Graph::new();
//! let x = g.variable_with(5.0);
//! let y = g.variable_with(2.0);
//! let f = 5.0 * x.pow(2.0) + 3.0 * &y;
//! assert_eq!(f.value().unwrap(), 131.0);
//! assert_eq!(f.der(&x).unwrap(), 50.0);
//! ```

// Node arena and id types.
pub mod store;

// Evaluation kernels, the recursive engine and the error type.
pub mod compute;

// Graph handles, operator sugar, arrays and functions.
pub mod graph;

// Read-only walks: ordering, upstream variables, statistics.
pub mod analysis;

// Formula rendering and audit traces.
pub mod display;

pub mod costs;
pub mod solver;

pub use compute::{AutodiffError, Result};
pub use display::format_trace;
pub use graph::{Array, Expr, Function, Graph, Operand, Value, Var};
pub use store::{NodeId, Operation};
