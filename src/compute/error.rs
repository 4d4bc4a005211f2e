use crate::store::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutodiffError {
    #[error("Variable '{name}' ({node_id}) has no value set")]
    UnsetValue { node_id: NodeId, name: String },
    #[error("Cannot create a constant without a value")]
    MissingConstantValue,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Value comparison must be between two nodes, got {found}")]
    TypeMismatch { found: &'static str },
    #[error("Cannot store a sequence of {len} values in a single slot")]
    Shape { len: usize },
    #[error("Index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Node {0} belongs to a different graph")]
    ForeignNode(NodeId),
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
    #[error("Operation '{op}' expects {expected} operands, got {actual}")]
    OperandCountMismatch { op: &'static str, expected: usize, actual: usize },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AutodiffError {
    fn from(e: serde_json::Error) -> Self {
        AutodiffError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AutodiffError>;
