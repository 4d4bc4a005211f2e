use super::{Result, SolverError};
use serde::Deserialize;

/// Stopping rules shared by the solvers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Newton stops on the residual 2-norm, BFGS on the step 2-norm.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { tolerance: 1e-8, max_iterations: 100_000 }
    }
}

impl SolverOptions {
    pub fn for_newton() -> Self {
        Self { tolerance: 1e-12, ..Self::default() }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Reads options from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).map_err(|e| SolverError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(SolverError::Config(format!("tolerance must be non-negative, got {}", self.tolerance)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(SolverOptions::default().tolerance, 1e-8);
        assert_eq!(SolverOptions::for_newton().tolerance, 1e-12);
        assert_eq!(SolverOptions::default().max_iterations, 100_000);
    }

    #[test]
    fn test_from_json_partial() {
        let opts = SolverOptions::from_json(r#"{"max_iterations": 10}"#).unwrap();
        assert_eq!(opts.max_iterations, 10);
        assert_eq!(opts.tolerance, 1e-8);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(SolverOptions::from_json("{"), Err(SolverError::Config(_))));
        assert!(matches!(SolverOptions::from_json(r#"{"tolerance": -1.0}"#), Err(SolverError::Config(_))));
    }
}
