use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a node inside one graph. Also its index in the registry columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub name: Option<String>,
}

/// The operator applied by a `Formula` node.
///
/// Operand order is significant: `Subtract`, `Divide`, `Power` read
/// `[lhs, rhs]`, `Log` reads `[argument, base]` and `Logistic` reads
/// `[x, x0, L, k]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Negate,
    UnaryPlus,
    Exp,
    Log,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,
    Sinh,
    Cosh,
    Tanh,
    Logistic,
}

impl Operation {
    pub const ALL: [Operation; 20] = [
        Operation::Add, Operation::Subtract, Operation::Multiply, Operation::Divide,
        Operation::Power, Operation::Negate, Operation::UnaryPlus, Operation::Exp,
        Operation::Log, Operation::Sqrt, Operation::Sin, Operation::Cos, Operation::Tan,
        Operation::Arcsin, Operation::Arccos, Operation::Arctan, Operation::Sinh,
        Operation::Cosh, Operation::Tanh, Operation::Logistic,
    ];

    /// Number of operands the operation consumes.
    pub fn arity(&self) -> usize {
        match self {
            Operation::Add
            | Operation::Subtract
            | Operation::Multiply
            | Operation::Divide
            | Operation::Power
            | Operation::Log => 2,
            Operation::Logistic => 4,
            _ => 1,
        }
    }

    /// Lower-case name used in formulas and traces.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "sub",
            Operation::Multiply => "mul",
            Operation::Divide => "div",
            Operation::Power => "pow",
            Operation::Negate => "neg",
            Operation::UnaryPlus => "pos",
            Operation::Exp => "exp",
            Operation::Log => "log",
            Operation::Sqrt => "sqrt",
            Operation::Sin => "sin",
            Operation::Cos => "cos",
            Operation::Tan => "tan",
            Operation::Arcsin => "arcsin",
            Operation::Arccos => "arccos",
            Operation::Arctan => "arctan",
            Operation::Sinh => "sinh",
            Operation::Cosh => "cosh",
            Operation::Tanh => "tanh",
            Operation::Logistic => "logistic",
        }
    }

    /// Infix symbol for the binary arithmetic operators.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Operation::Add => Some("+"),
            Operation::Subtract => Some("-"),
            Operation::Multiply => Some("*"),
            Operation::Divide => Some("/"),
            Operation::Power => Some("^"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Mutable leaf. `None` until a value is assigned.
    Variable(#[serde(with = "payload::option")] Option<f64>),
    Constant(#[serde(with = "payload")] f64),
    Formula(Operation),
}

/// Leaf payloads in JSON: finite values are numbers, NaN and the infinities
/// are the strings `"NaN"`, `"inf"` and `"-inf"`. `null` is reserved for an
/// unset Variable.
mod payload {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    fn encode(value: f64) -> Repr {
        if value.is_finite() { Repr::Number(value) } else { Repr::Text(value.to_string()) }
    }

    fn decode<E: Error>(repr: Repr) -> Result<f64, E> {
        match repr {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => text
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_finite())
                .ok_or_else(|| E::custom(format!("invalid non-finite payload '{}'", text))),
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        encode(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        decode(Repr::deserialize(deserializer)?)
    }

    pub mod option {
        use super::{decode, encode, Repr};
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
            value.map(encode).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
            Option::<Repr>::deserialize(deserializer)?.map(decode).transpose()
        }
    }
}

impl NodeKind {
    pub fn is_variable(&self) -> bool { matches!(self, NodeKind::Variable(_)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Operation::Add, 2)]
    #[case(Operation::Power, 2)]
    #[case(Operation::Log, 2)]
    #[case(Operation::Logistic, 4)]
    #[case(Operation::Negate, 1)]
    #[case(Operation::Tanh, 1)]
    fn test_operation_arity(#[case] op: Operation, #[case] expected: usize) {
        assert_eq!(op.arity(), expected);
    }

    #[test]
    fn test_only_arithmetic_has_symbols() {
        let with_symbol: Vec<_> = Operation::ALL.iter().filter(|op| op.symbol().is_some()).collect();
        assert_eq!(with_symbol.len(), 5);
    }

    #[rstest]
    #[case(NodeKind::Constant(f64::INFINITY), r#"{"Constant":"inf"}"#)]
    #[case(NodeKind::Constant(f64::NEG_INFINITY), r#"{"Constant":"-inf"}"#)]
    #[case(NodeKind::Constant(1.5), r#"{"Constant":1.5}"#)]
    #[case(NodeKind::Variable(None), r#"{"Variable":null}"#)]
    #[case(NodeKind::Variable(Some(f64::INFINITY)), r#"{"Variable":"inf"}"#)]
    fn test_payload_encoding(#[case] kind: NodeKind, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&kind).unwrap(), json);
        assert_eq!(serde_json::from_str::<NodeKind>(json).unwrap(), kind);
    }

    #[test]
    fn test_nan_payload_survives() {
        let json = serde_json::to_string(&NodeKind::Variable(Some(f64::NAN))).unwrap();
        assert_eq!(json, r#"{"Variable":"NaN"}"#);
        match serde_json::from_str::<NodeKind>(&json).unwrap() {
            NodeKind::Variable(Some(v)) => assert!(v.is_nan()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_payload_text_rejected() {
        assert!(serde_json::from_str::<NodeKind>(r#"{"Constant":"1.5"}"#).is_err());
        assert!(serde_json::from_str::<NodeKind>(r#"{"Constant":null}"#).is_err());
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "#7");
    }
}
