//! Numerical consumers of the derivative contract: Newton root finding and
//! BFGS minimization.
use crate::compute::AutodiffError;
use thiserror::Error;

pub mod bfgs;
pub mod newton;
pub mod options;

pub use options::SolverOptions;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Function must be scalar-valued")]
    NotScalar,

    #[error("Expected {expected} initial values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Jacobian is {rows}x{cols}; Newton needs a square system")]
    NonSquareJacobian { rows: usize, cols: usize },

    #[error("Jacobian is singular at iteration {iteration}")]
    SingularJacobian { iteration: usize },

    #[error("Invalid solver configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Autodiff(#[from] AutodiffError),
}

pub type Result<T> = std::result::Result<T, SolverError>;

fn seed(vars: &[crate::graph::Var], initial: &[f64]) -> Result<()> {
    if vars.len() != initial.len() {
        return Err(SolverError::DimensionMismatch { expected: vars.len(), actual: initial.len() });
    }
    for (v, &x) in vars.iter().zip(initial) {
        v.set_value(x);
    }
    Ok(())
}

fn current(vars: &[crate::graph::Var]) -> Vec<f64> {
    vars.iter().map(|v| v.get().unwrap_or(f64::NAN)).collect()
}
