/// Error types for the monitoring model
use thiserror::Error;

/// Errors raised while building a [`crate::hierarchy::Hierarchy`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// Two nodes in the same tree share an id
    #[error("Duplicate hierarchy node id: {0}")]
    DuplicateId(String),
}

/// Failed to parse an enum value sent as a string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
