//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for OpsDeck
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum OpsDeckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for OpsDeck operations
pub type Result<T> = std::result::Result<T, OpsDeckError>;

impl From<serde_json::Error> for OpsDeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = OpsDeckError::Config("missing url".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Config");
        assert_eq!(json["message"], "missing url");
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: OpsDeckError = parse.into();
        assert!(matches!(err, OpsDeckError::Serialization(_)));
    }
}
