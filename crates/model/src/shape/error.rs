use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("unknown path '{path}': {shape} has no member '{segment}' (resolved prefix: '{resolved}')")]
    UnknownPath {
        path: String,
        segment: String,
        resolved: String,
        shape: String,
    },

    #[error("path '{path}' ends at nested shape {shape}, not at a value")]
    NotAValue { path: String, shape: String },
}

/// Invalid runtime shape definition.
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("invalid schema entry '{key}': {reason}")]
    InvalidSchema { key: String, reason: String },

    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResolveError {
    pub fn path(&self) -> &str {
        match self {
            ResolveError::UnknownPath { path, .. } | ResolveError::NotAValue { path, .. } => path,
        }
    }
}
