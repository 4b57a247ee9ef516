use thiserror::Error;

/// Errors from the programmatic surfaces (documents, commands, queries).
///
/// Interactive operations never fail; they report whether anything changed.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    #[error("Duplicate command id: {0}")]
    DuplicateCommand(String),

    #[error("Duplicate query id: {0}")]
    DuplicateQuery(String),

    #[error("Invalid arguments for {id}: {reason}")]
    InvalidArgs { id: String, reason: String },

    #[error("Table is read-only")]
    ReadOnly,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
