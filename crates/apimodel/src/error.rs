use std::fmt;

use thiserror::Error;

/// High-level error type shared across the model components.
///
/// Apart from `Serialization` and `Io`, every variant reports a malformed
/// graph or configuration handed in by a front-end.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown {kind} id {id}")]
    UnknownItem { kind: &'static str, id: u32 },
    #[error("duplicate class: {0}")]
    DuplicateClass(String),
    #[error("duplicate type alias: {0}")]
    DuplicateTypeAlias(String),
    #[error("malformed containment: {0}")]
    MalformedContainment(String),
    #[error("cannot reassign the type of type alias {0}")]
    ImmutableTypeAliasType(String),
    #[error("invalid type: {0}")]
    InvalidType(String),
    #[error("duplicate option key: {0}")]
    DuplicateOptionKey(String),
    #[error("unknown file format: {0}")]
    UnknownFileFormat(String),
    #[error("invalid annotation filter: {0}")]
    InvalidAnnotationFilter(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl ModelError {
    pub fn context<T: fmt::Display>(self, ctx: T) -> Self {
        match self {
            ModelError::UnknownItem { kind, id } => ModelError::UnknownItem { kind, id },
            ModelError::DuplicateClass(name) => {
                ModelError::DuplicateClass(format!("{ctx}: {name}"))
            }
            ModelError::DuplicateTypeAlias(name) => {
                ModelError::DuplicateTypeAlias(format!("{ctx}: {name}"))
            }
            ModelError::MalformedContainment(msg) => {
                ModelError::MalformedContainment(format!("{ctx}: {msg}"))
            }
            ModelError::ImmutableTypeAliasType(name) => {
                ModelError::ImmutableTypeAliasType(format!("{ctx}: {name}"))
            }
            ModelError::InvalidType(msg) => ModelError::InvalidType(format!("{ctx}: {msg}")),
            ModelError::DuplicateOptionKey(name) => {
                ModelError::DuplicateOptionKey(format!("{ctx}: {name}"))
            }
            ModelError::UnknownFileFormat(name) => {
                ModelError::UnknownFileFormat(format!("{ctx}: {name}"))
            }
            ModelError::InvalidAnnotationFilter(filter) => {
                ModelError::InvalidAnnotationFilter(format!("{ctx}: {filter}"))
            }
            ModelError::Serialization(msg) => ModelError::Serialization(format!("{ctx}: {msg}")),
            ModelError::Io(err) => ModelError::Io(err),
        }
    }
}
