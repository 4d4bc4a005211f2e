//! Value and derivative rules for every `Operation`.
//!
//! Both entry points receive operands in registry order and trust the
//! registry to have checked the arity.
use crate::store::Operation;

/// A node's value paired with its derivative with respect to one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual {
    pub value: f64,
    pub deriv: f64,
}

impl Dual {
    pub fn new(value: f64, deriv: f64) -> Self { Self { value, deriv } }
    pub fn constant(value: f64) -> Self { Self { value, deriv: 0.0 } }
}

#[inline]
fn logistic(x: f64, x0: f64, l: f64, k: f64) -> f64 {
    l / (1.0 + (-k * (x - x0)).exp())
}

pub fn evaluate(op: Operation, args: &[f64]) -> f64 {
    debug_assert_eq!(args.len(), op.arity());
    let x = args[0];
    match op {
        Operation::Add => x + args[1],
        Operation::Subtract => x - args[1],
        Operation::Multiply => x * args[1],
        Operation::Divide => x / args[1],
        Operation::Power => x.powf(args[1]),
        Operation::Negate => -x,
        Operation::UnaryPlus => x,
        Operation::Exp => x.exp(),
        Operation::Log => x.ln() / args[1].ln(),
        Operation::Sqrt => x.sqrt(),
        Operation::Sin => x.sin(),
        Operation::Cos => x.cos(),
        Operation::Tan => x.tan(),
        Operation::Arcsin => x.asin(),
        Operation::Arccos => x.acos(),
        Operation::Arctan => x.atan(),
        Operation::Sinh => x.sinh(),
        Operation::Cosh => x.cosh(),
        Operation::Tanh => x.tanh(),
        Operation::Logistic => logistic(x, args[1], args[2], args[3]),
    }
}

pub fn differentiate(op: Operation, args: &[Dual]) -> Dual {
    debug_assert_eq!(args.len(), op.arity());
    let Dual { value: x, deriv: dx } = args[0];
    match op {
        Operation::Add => {
            let y = args[1];
            Dual::new(x + y.value, dx + y.deriv)
        }
        Operation::Subtract => {
            let y = args[1];
            Dual::new(x - y.value, dx - y.deriv)
        }
        Operation::Multiply => {
            let y = args[1];
            Dual::new(x * y.value, y.value * dx + x * y.deriv)
        }
        Operation::Divide => {
            let y = args[1];
            Dual::new(x / y.value, (y.value * dx - x * y.deriv) / (y.value * y.value))
        }
        Operation::Power => {
            let Dual { value: y, deriv: dy } = args[1];
            let value = x.powf(y);
            let mut deriv = y * x.powf(y - 1.0) * dx;
            // ln(x) is only taken when the exponent actually moves and the
            // power is nonzero; otherwise a non-positive base would yield NaN.
            if dy != 0.0 && value != 0.0 {
                deriv += value * x.ln() * dy;
            }
            Dual::new(value, deriv)
        }
        Operation::Negate => Dual::new(-x, -dx),
        Operation::UnaryPlus => Dual::new(x, dx),
        Operation::Exp => {
            let value = x.exp();
            Dual::new(value, value * dx)
        }
        Operation::Log => {
            let Dual { value: base, deriv: dbase } = args[1];
            let ln_base = base.ln();
            let ln_x = x.ln();
            let denom = ln_base * ln_base;
            let deriv = (ln_base / x * dx) / denom - (ln_x / base * dbase) / denom;
            Dual::new(ln_x / ln_base, deriv)
        }
        Operation::Sqrt => {
            let value = x.sqrt();
            Dual::new(value, dx / (2.0 * value))
        }
        Operation::Sin => Dual::new(x.sin(), x.cos() * dx),
        Operation::Cos => Dual::new(x.cos(), -x.sin() * dx),
        Operation::Tan => {
            let c = x.cos();
            Dual::new(x.tan(), dx / (c * c))
        }
        Operation::Arcsin => Dual::new(x.asin(), dx / (1.0 - x * x).sqrt()),
        Operation::Arccos => Dual::new(x.acos(), -dx / (1.0 - x * x).sqrt()),
        Operation::Arctan => Dual::new(x.atan(), dx / (1.0 + x * x)),
        Operation::Sinh => Dual::new(x.sinh(), x.cosh() * dx),
        Operation::Cosh => Dual::new(x.cosh(), x.sinh() * dx),
        Operation::Tanh => {
            let value = x.tanh();
            Dual::new(value, (1.0 - value * value) * dx)
        }
        Operation::Logistic => {
            // Only the argument is differentiated; x0, L and k act as parameters.
            let (x0, l, k) = (args[1].value, args[2].value, args[3].value);
            let e = (-k * (x - x0)).exp();
            let deriv = k * l * e * (1.0 + e).powi(-2) * dx;
            Dual::new(logistic(x, x0, l, k), deriv)
        }
    }
}
