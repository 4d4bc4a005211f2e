//! Elementary functions as node constructors.
use super::expr::Expr;
use super::operand::Operand;
use crate::store::Operation;
use std::f64::consts::E;

impl Expr {
    fn unary(&self, op: Operation) -> Expr {
        self.graph().apply(op, [self])
    }

    /// UnaryPlus node: same value, same derivative.
    pub fn pos(&self) -> Expr { self.unary(Operation::UnaryPlus) }

    /// `self ^ exponent`.
    pub fn pow(&self, exponent: impl Into<Operand>) -> Expr {
        self.graph().pow(self, exponent)
    }

    pub fn exp(&self) -> Expr { self.unary(Operation::Exp) }

    /// Natural logarithm.
    pub fn ln(&self) -> Expr { self.log(E) }

    /// Logarithm in an arbitrary (possibly variable) base.
    pub fn log(&self, base: impl Into<Operand>) -> Expr {
        self.graph().apply(Operation::Log, [Operand::from(self), base.into()])
    }

    pub fn sqrt(&self) -> Expr { self.unary(Operation::Sqrt) }
    pub fn sin(&self) -> Expr { self.unary(Operation::Sin) }
    pub fn cos(&self) -> Expr { self.unary(Operation::Cos) }
    pub fn tan(&self) -> Expr { self.unary(Operation::Tan) }
    pub fn asin(&self) -> Expr { self.unary(Operation::Arcsin) }
    pub fn acos(&self) -> Expr { self.unary(Operation::Arccos) }
    pub fn atan(&self) -> Expr { self.unary(Operation::Arctan) }
    pub fn sinh(&self) -> Expr { self.unary(Operation::Sinh) }
    pub fn cosh(&self) -> Expr { self.unary(Operation::Cosh) }
    pub fn tanh(&self) -> Expr { self.unary(Operation::Tanh) }

    /// `L / (1 + exp(-k (self - x0)))`.
    pub fn logistic(&self, x0: impl Into<Operand>, l: impl Into<Operand>, k: impl Into<Operand>) -> Expr {
        self.graph().apply(
            Operation::Logistic,
            [Operand::from(self), x0.into(), l.into(), k.into()],
        )
    }

    /// The standard logistic curve (`x0 = 0`, `L = 1`, `k = 1`).
    pub fn sigmoid(&self) -> Expr { self.logistic(0.0, 1.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f64::consts::PI;

    #[test]
    fn test_power_rules() {
        let g = Graph::new();
        let x = g.variable_with(5.0);
        assert_eq!(x.pow(3.0).der(&x).unwrap(), 75.0);

        let t = g.variable_with(3.0);
        let f = g.pow(5.0, &t);
        assert_relative_eq!(f.der(&t).unwrap(), 201.17973905426254, max_relative = 1e-14);

        let y = g.variable_with(3.0);
        let h = x.pow(&y);
        assert_eq!(h.der(&x).unwrap(), 75.0);
        assert_relative_eq!(h.der(&y).unwrap(), 201.17973905426254, max_relative = 1e-14);
    }

    #[test]
    fn test_power_of_negative_base_with_constant_exponent() {
        let g = Graph::new();
        let x = g.variable_with(-2.0);
        let f = x.pow(2.0);
        let d = f.der(&x).unwrap();
        assert!(!d.is_nan());
        assert_eq!(d, -4.0);
    }

    #[test]
    fn test_pos() {
        let g = Graph::new();
        let x = g.variable_with(5.0);
        let f = x.pos();
        assert_eq!(f.value().unwrap(), 5.0);
        assert_eq!(f.der(&x).unwrap(), 1.0);
    }

    #[test]
    fn test_log_natural_and_based() {
        let g = Graph::new();
        let x = g.variable_with(5.0);
        assert_relative_eq!(x.ln().der(&x).unwrap(), 0.2, epsilon = 1e-15);

        let a = g.variable_with(8.0);
        let b = g.variable_with(2.0);
        let f = a.log(&b);
        assert_relative_eq!(f.value().unwrap(), 3.0, epsilon = 1e-15);
        assert_relative_eq!(f.der(&a).unwrap(), 0.18033688011112042, epsilon = 1e-15);
        assert_relative_eq!(f.der(&b).unwrap(), -2.1640425613334453, epsilon = 1e-14);
    }

    #[test]
    fn test_exp_of_constant_times_variable() {
        let g = Graph::new();
        let x = g.variable_with(5.0);
        let f = &x * g.constant(5.0).exp();
        assert_relative_eq!(f.der(&x).unwrap(), 148.4131591025766, max_relative = 1e-14);
        assert_relative_eq!(x.exp().der(&x).unwrap(), 148.4131591025766, max_relative = 1e-14);
    }

    #[rstest]
    #[case(PI / 2.0, 0.0)]
    #[case(0.0, 1.0)]
    fn test_sin(#[case] at: f64, #[case] expected: f64) {
        let g = Graph::new();
        let x = g.variable_with(at);
        assert_relative_eq!(x.sin().der(&x).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_hyperbolic_at_origin() {
        let g = Graph::new();
        let x = g.variable_with(0.0);
        assert_relative_eq!(x.sinh().der(&x).unwrap(), 1.0);
        assert_relative_eq!(x.cosh().value().unwrap(), 1.0);
        assert_relative_eq!(x.cosh().der(&x).unwrap(), 0.0);
        assert_relative_eq!(x.tanh().der(&x).unwrap(), 1.0);
    }

    #[test]
    fn test_inverse_trig() {
        let g = Graph::new();
        let x = g.variable_with(0.5);
        let slope = 1.0 / (1.0 - 0.25f64).sqrt();
        assert_relative_eq!(x.asin().der(&x).unwrap(), slope, epsilon = 1e-12);
        assert_relative_eq!(x.acos().der(&x).unwrap(), -slope, epsilon = 1e-12);
        assert_relative_eq!(x.atan().der(&x).unwrap(), 0.8, epsilon = 1e-12);

        let one = g.variable_with(1.0);
        assert_relative_eq!(one.asin().value().unwrap(), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sqrt() {
        let g = Graph::new();
        let x = g.variable_with(4.0);
        let f = x.sqrt();
        assert_eq!(f.value().unwrap(), 2.0);
        assert_eq!(f.der(&x).unwrap(), 0.25);
    }

    #[test]
    fn test_chain_through_composition() {
        // d/dx sin(x^2) = 2x cos(x^2)
        let g = Graph::new();
        let x = g.variable_with(1.5);
        let f = x.pow(2.0).sin();
        assert_relative_eq!(f.der(&x).unwrap(), 3.0 * 2.25f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_sigmoid() {
        let g = Graph::new();
        let x = g.variable_with(0.0);
        let f = x.sigmoid();
        assert_relative_eq!(f.value().unwrap(), 0.5);
        assert_relative_eq!(f.der(&x).unwrap(), 0.25);
    }
}
