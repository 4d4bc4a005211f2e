//! Cost-function builders for planning problems.
//!
//! Every builder only composes public node arithmetic, so the resulting
//! expression differentiates like any other. Observations that are NaN mark
//! "no target" and contribute nothing.
use crate::compute::{AutodiffError, Result};
use crate::graph::{Expr, Graph, Operand};

fn steepness(smoothness: f64) -> Result<f64> {
    if smoothness > 0.0 && smoothness.is_finite() {
        Ok(1.0 / smoothness)
    } else {
        Err(AutodiffError::InvalidArgument(format!("smoothness must be positive, got {}", smoothness)))
    }
}

fn paired<I>(graph: &Graph, values: I, observed: &[f64]) -> Result<Vec<(Expr, f64)>>
where
    I: IntoIterator,
    I::Item: Into<Operand>,
{
    let values = values.into_iter().map(|v| graph.coerce(v)).collect::<Result<Vec<_>>>()?;
    if values.len() != observed.len() {
        return Err(AutodiffError::InvalidArgument(format!(
            "{} values but {} observations", values.len(), observed.len()
        )));
    }
    Ok(values.into_iter().zip(observed.iter().copied()).filter(|(_, o)| !o.is_nan()).collect())
}

/// Sum of squared differences `Σ (y_i - o_i)^2` over observed entries.
pub fn mean_squared_error<I>(graph: &Graph, predicted: I, observed: &[f64]) -> Result<Expr>
where
    I: IntoIterator,
    I::Item: Into<Operand>,
{
    let terms = paired(graph, predicted, observed)?.into_iter().map(|(y, o)| (y - o).pow(2.0));
    graph.sum(terms)
}

/// Smoothed step from 0 to 2 centred at 0.5; sharper as `smoothness` shrinks.
pub fn approximate_step(x: &Expr, smoothness: f64) -> Result<Expr> {
    Ok(x.logistic(0.5, 2.0, steepness(smoothness)?))
}

/// Penalty that grows as any parameter goes negative: `Σ logistic(-p)`.
pub fn positivity_penalty<I>(graph: &Graph, params: I, smoothness: f64) -> Result<Expr>
where
    I: IntoIterator,
    I::Item: Into<Operand>,
{
    let k = steepness(smoothness)?;
    let terms = params
        .into_iter()
        .map(|p| graph.coerce(p).map(|p| (-p).logistic(0.0, 1.0, k)))
        .collect::<Result<Vec<_>>>()?;
    graph.sum(terms)
}

/// Smoothed count of entries exceeding their bound: `Σ step(x_i - o_i)`.
pub fn minmax_penalty<I>(graph: &Graph, values: I, observed: &[f64], smoothness: f64) -> Result<Expr>
where
    I: IntoIterator,
    I::Item: Into<Operand>,
{
    let terms = paired(graph, values, observed)?
        .into_iter()
        .map(|(x, o)| approximate_step(&(x - o), smoothness))
        .collect::<Result<Vec<_>>>()?;
    graph.sum(terms)
}
