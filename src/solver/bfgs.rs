//! Unconstrained minimization with BFGS and automatic gradients.
use super::{current, seed, Result, SolverError, SolverOptions};
use crate::graph::{Expr, Function, Var};
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, PartialEq)]
pub struct BfgsReport {
    /// 2-norm of the last step taken.
    pub step_norm: f64,
    pub iterations: usize,
    pub converged: bool,
}

fn gradient(objective: &Expr, vars: &[Var]) -> Result<DVector<f64>> {
    Ok(DVector::from_vec(objective.grad(vars)?))
}

/// Minimizes a scalar `function` over `vars`, starting from `initial`.
///
/// Takes full quasi-Newton steps without a line search and stops once a
/// step is no longer than `options.tolerance`. The variables are left at the
/// final point.
pub fn minimize(function: &Function, vars: &[Var], initial: &[f64], options: &SolverOptions) -> Result<BfgsReport> {
    let objective = match function {
        Function::Scalar(e) => e,
        Function::Vector(_) => return Err(SolverError::NotScalar),
    };
    options.validate()?;
    seed(vars, initial)?;

    let n = vars.len();
    let identity = DMatrix::<f64>::identity(n, n);
    let mut x = DVector::from_column_slice(initial);
    let mut h_inv = identity.clone();
    let mut g = gradient(objective, vars)?;
    let mut step_norm = 1e20;
    let mut iterations = 0;

    let converged = loop {
        if step_norm <= options.tolerance {
            break true;
        }
        if iterations == options.max_iterations {
            break false;
        }

        let s = -(&h_inv * &g);
        x += &s;
        for (v, xi) in vars.iter().zip(x.iter()) {
            v.set_value(*xi);
        }
        let g_next = gradient(objective, vars)?;
        let y = &g_next - &g;

        // Secant update; a degenerate curvature pair leaves the estimate as is.
        let ys = y.dot(&s);
        if ys != 0.0 && ys.is_finite() {
            let rho = 1.0 / ys;
            let left = &identity - &s * y.transpose() * rho;
            let right = &identity - &y * s.transpose() * rho;
            h_inv = left * &h_inv * right + &s * s.transpose() * rho;
        }

        g = g_next;
        step_norm = s.norm();
        iterations += 1;
        debug!("bfgs iteration {}: |s| = {:e}", iterations, step_norm);
    };

    if converged {
        info!("bfgs converged in {} iterations at {:?}", iterations, current(vars));
    } else {
        warn!("bfgs reached {} iterations with |s| = {:e}", iterations, step_norm);
    }
    Ok(BfgsReport { step_norm, iterations, converged })
}
