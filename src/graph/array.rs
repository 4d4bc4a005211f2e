use super::context::Graph;
use super::expr::{Expr, Var};
use super::operand::Operand;
use crate::compute::{AutodiffError, Result};
use std::ops::Index;
use std::slice;

/// A vector-valued function: an ordered list of scalar nodes.
///
/// The length is fixed at construction except through [`Array::push`];
/// each slot holds exactly one scalar node.
#[derive(Debug, Clone)]
pub struct Array {
    graph: Graph,
    elements: Vec<Expr>,
}

impl Array {
    /// Builds an array, wrapping plain numbers as Constants of `graph`.
    pub fn new<I>(graph: &Graph, elements: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let elements = elements.into_iter().map(|e| graph.coerce(e)).collect::<Result<Vec<_>>>()?;
        Ok(Self { graph: graph.clone(), elements })
    }

    pub fn graph(&self) -> &Graph { &self.graph }

    pub fn len(&self) -> usize { self.elements.len() }

    pub fn is_empty(&self) -> bool { self.elements.is_empty() }

    pub fn get(&self, index: usize) -> Option<&Expr> { self.elements.get(index) }

    /// Replaces one slot. A sequence is rejected; a number becomes a Constant.
    pub fn set(&mut self, index: usize, element: impl Into<Operand>) -> Result<()> {
        let len = self.elements.len();
        if index >= len {
            return Err(AutodiffError::IndexOutOfBounds { index, len });
        }
        self.elements[index] = self.graph.coerce(element)?;
        Ok(())
    }

    /// Appends one slot, coercing like [`Array::set`].
    ///
    /// Growing the array adds a row to [`Array::grad`], so a Newton system
    /// built from it is only square again once the variable count matches.
    pub fn push(&mut self, element: impl Into<Operand>) -> Result<()> {
        let node = self.graph.coerce(element)?;
        self.elements.push(node);
        Ok(())
    }

    pub fn iter(&self) -> slice::Iter<'_, Expr> { self.elements.iter() }

    /// Current value of every element.
    pub fn value(&self) -> Result<Vec<f64>> {
        self.elements.iter().map(Expr::value).collect()
    }

    /// Derivative of every element with respect to `target`.
    pub fn der(&self, target: &Var) -> Result<Vec<f64>> {
        self.elements.iter().map(|e| e.der(target)).collect()
    }

    /// Jacobian: one row per element, one column per target.
    pub fn grad(&self, targets: &[Var]) -> Result<Vec<Vec<f64>>> {
        self.elements.iter().map(|e| e.grad(targets)).collect()
    }
}

impl Index<usize> for Array {
    type Output = Expr;
    fn index(&self, index: usize) -> &Expr { &self.elements[index] }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Expr;
    type IntoIter = slice::Iter<'a, Expr>;
    fn into_iter(self) -> Self::IntoIter { self.elements.iter() }
}
