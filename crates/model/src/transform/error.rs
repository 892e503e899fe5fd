use criteria_syntax::SyntaxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("invalid mapped column '{column}': {source}")]
    InvalidColumn {
        column: String,
        #[source]
        source: SyntaxError,
    },

    #[error("column '{0}' is mapped more than once")]
    DuplicateColumn(String),

    #[error("failed to read mapping config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid mapping config: {0}")]
    Json(#[from] serde_json::Error),
}
