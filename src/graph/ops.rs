//! Operator sugar: `+ - * /` and unary `-` over nodes and plain numbers.
//!
//! Each overload builds a new composite node in the graph of its node
//! operand(s). Mixing nodes of two different graphs panics; use
//! [`Graph::try_apply`](super::Graph::try_apply) for a fallible form.
use super::expr::{Expr, Var};
use super::operand::Operand;
use crate::store::Operation;
use std::ops::{Add, Div, Mul, Neg, Sub};

fn combine(op: Operation, lhs: Operand, rhs: Operand) -> Expr {
    let graph = match (&lhs, &rhs) {
        (Operand::Node(e), _) | (_, Operand::Node(e)) => e.graph().clone(),
        _ => unreachable!("operator overloads always involve a node"),
    };
    graph.apply(op, [lhs, rhs])
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        binary_op!(@rhs $trait, $method, $op, Expr);
        binary_op!(@rhs $trait, $method, $op, &Expr);
        binary_op!(@rhs $trait, $method, $op, Var);
        binary_op!(@rhs $trait, $method, $op, &Var);
        binary_op!(@impl $trait, $method, $op, f64, Expr);
        binary_op!(@impl $trait, $method, $op, f64, &Expr);
        binary_op!(@impl $trait, $method, $op, f64, Var);
        binary_op!(@impl $trait, $method, $op, f64, &Var);
    };
    (@rhs $trait:ident, $method:ident, $op:expr, $lhs:ty) => {
        binary_op!(@impl $trait, $method, $op, $lhs, Expr);
        binary_op!(@impl $trait, $method, $op, $lhs, &Expr);
        binary_op!(@impl $trait, $method, $op, $lhs, Var);
        binary_op!(@impl $trait, $method, $op, $lhs, &Var);
        binary_op!(@impl $trait, $method, $op, $lhs, f64);
    };
    (@impl $trait:ident, $method:ident, $op:expr, $lhs:ty, $rhs:ty) => {
        impl $trait<$rhs> for $lhs {
            type Output = Expr;
            fn $method(self, rhs: $rhs) -> Expr {
                combine($op, Operand::from(self), Operand::from(rhs))
            }
        }
    };
}

binary_op!(Add, add, Operation::Add);
binary_op!(Sub, sub, Operation::Subtract);
binary_op!(Mul, mul, Operation::Multiply);
binary_op!(Div, div, Operation::Divide);

macro_rules! negate {
    ($($ty:ty),*) => {$(
        impl Neg for $ty {
            type Output = Expr;
            fn neg(self) -> Expr {
                let operand = Operand::from(self);
                match &operand {
                    Operand::Node(e) => e.graph().clone().apply(Operation::Negate, [operand]),
                    _ => unreachable!(),
                }
            }
        }
    )*};
}

negate!(Expr, &Expr, Var, &Var);

#[cfg(test)]
mod tests {
    use crate::graph::Graph;
    use approx::assert_relative_eq;

    #[test]
    fn test_reflected_forms_match_explicit() {
        let g = Graph::new();
        let x = g.variable_with(5.0);
        assert_eq!((3.0 + &x).der(&x).unwrap(), (&x + 3.0).der(&x).unwrap());
        assert_eq!((3.0 * &x).der(&x).unwrap(), 3.0);
        assert_eq!((3.0 - &x).der(&x).unwrap(), -1.0);
        assert_relative_eq!((3.0 / &x).der(&x).unwrap(), -0.12, epsilon = 1e-15);
    }

    #[test]
    fn test_negate() {
        let g = Graph::new();
        let x = g.variable_with(5.0);
        let f = -&x;
        assert_eq!(f.value().unwrap(), -5.0);
        assert_eq!(f.der(&x).unwrap(), -1.0);
    }

    #[test]
    fn test_multivar_quotient() {
        let g = Graph::new();
        let x = g.variable_with(5.0);
        let y = g.variable_with(3.0);
        let f = &y / &x;
        assert_relative_eq!(f.der(&x).unwrap(), -0.12, epsilon = 1e-15);
        assert_relative_eq!(f.der(&y).unwrap(), 0.2, epsilon = 1e-15);
    }

    #[test]
    #[should_panic(expected = "different graph")]
    fn test_mixing_graphs_panics() {
        let g1 = Graph::new();
        let g2 = Graph::new();
        let x = g1.variable_with(1.0);
        let y = g2.variable_with(1.0);
        let _ = x + y;
    }
}
