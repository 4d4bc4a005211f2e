//! Multivariate Newton root finding driven by the Jacobian of a [`Function`].
use super::{current, seed, Result, SolverError, SolverOptions};
use crate::graph::{Function, Var};
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, PartialEq)]
pub struct NewtonReport {
    pub root: Vec<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
    /// Variable values after every iteration, starting with the initial guess.
    pub trajectory: Vec<Vec<f64>>,
    pub converged: bool,
}

/// Solves `function(vars) = 0` from `initial`, iterating `J h = -F`.
///
/// The variables are left at the last iterate. Running out of iterations is
/// reported through `converged`, not as an error.
pub fn solve(function: &Function, vars: &[Var], initial: &[f64], options: &SolverOptions) -> Result<NewtonReport> {
    options.validate()?;
    seed(vars, initial)?;

    let n = vars.len();
    let mut x = initial.to_vec();
    let mut trajectory = vec![x.clone()];
    let mut residual = function.value()?;
    if residual.len() != n {
        return Err(SolverError::NonSquareJacobian { rows: residual.len(), cols: n });
    }

    let mut iterations = 0;
    while residual.norm() > options.tolerance && iterations < options.max_iterations {
        let rows = function.grad(vars)?;
        let jacobian = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
        let rhs = DVector::from_iterator(n, residual.to_vec().into_iter().map(|r| -r));
        let step = jacobian.lu().solve(&rhs).ok_or(SolverError::SingularJacobian { iteration: iterations })?;

        for ((v, xi), h) in vars.iter().zip(x.iter_mut()).zip(step.iter()) {
            *xi += h;
            v.set_value(*xi);
        }
        trajectory.push(x.clone());
        residual = function.value()?;
        iterations += 1;
        debug!("newton iteration {}: |F| = {:e}", iterations, residual.norm());
    }

    let residual_norm = residual.norm();
    let converged = residual_norm <= options.tolerance;
    if converged {
        info!("newton converged in {} iterations (|F| = {:e})", iterations, residual_norm);
    } else {
        warn!("newton stopped after {} iterations with |F| = {:e}", iterations, residual_norm);
    }

    Ok(NewtonReport { root: current(vars), residual_norm, iterations, trajectory, converged })
}
