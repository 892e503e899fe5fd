use criteria_engine::{BuildError, Cancelled};
use criteria_syntax::SyntaxError;
use model::{shape::error::ShapeError, transform::MappingError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    InputRead(#[from] std::io::Error),

    #[error("Invalid criteria: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Failed to build the query: {0}")]
    Build(#[from] BuildError),

    #[error("Invalid shape schema: {0}")]
    Shape(#[from] ShapeError),

    #[error("Invalid mapping config: {0}")]
    Mapping(#[from] MappingError),

    #[error("Failed to parse JSON input: {0}")]
    JsonInput(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Records file must hold a JSON array, found {0}")]
    InvalidRecords(&'static str),

    #[error("Query {0}")]
    Cancelled(#[from] Cancelled),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
