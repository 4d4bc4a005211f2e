//! Human-readable renderings of expressions.
pub mod formula;
pub mod trace;

pub use trace::format_trace;
