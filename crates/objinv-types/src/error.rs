use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object type {value:?}: {reason}")]
    InvalidObjectType { value: String, reason: String },
}
