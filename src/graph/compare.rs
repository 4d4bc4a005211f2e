//! Numeric comparison of node values.
//!
//! These are named methods rather than `PartialEq`/`PartialOrd`
//! impls: node identity is `same_node`, numeric equality is `value_eq`.
use super::expr::Expr;
use super::operand::Operand;
use crate::compute::{AutodiffError, Result};
use std::cmp::Ordering;

impl Expr {
    fn value_pair(&self, other: impl Into<Operand>) -> Result<(f64, f64)> {
        match other.into() {
            Operand::Node(rhs) => Ok((self.value()?, rhs.value()?)),
            other => Err(AutodiffError::TypeMismatch { found: other.describe() }),
        }
    }

    /// Ordering of the two current values; `None` when either is NaN.
    pub fn value_cmp(&self, other: impl Into<Operand>) -> Result<Option<Ordering>> {
        let (a, b) = self.value_pair(other)?;
        Ok(a.partial_cmp(&b))
    }

    pub fn value_eq(&self, other: impl Into<Operand>) -> Result<bool> {
        self.value_pair(other).map(|(a, b)| a == b)
    }

    pub fn value_ne(&self, other: impl Into<Operand>) -> Result<bool> {
        self.value_pair(other).map(|(a, b)| a != b)
    }

    pub fn value_lt(&self, other: impl Into<Operand>) -> Result<bool> {
        self.value_pair(other).map(|(a, b)| a < b)
    }

    pub fn value_gt(&self, other: impl Into<Operand>) -> Result<bool> {
        self.value_pair(other).map(|(a, b)| a > b)
    }

    pub fn value_le(&self, other: impl Into<Operand>) -> Result<bool> {
        self.value_pair(other).map(|(a, b)| a <= b)
    }

    pub fn value_ge(&self, other: impl Into<Operand>) -> Result<bool> {
        self.value_pair(other).map(|(a, b)| a >= b)
    }
}
