use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Kuzu error: {0}")]
    Kuzu(#[from] kuzu::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to execute query: {query}. Error: {error}")]
    QueryExecutionError { query: String, error: kuzu::Error },
    #[error("Failed to check existing schema state: {0}")]
    SchemaCheckFailed(kuzu::Error),
    #[error("Database initialization failed: {0}")]
    InitializationFailed(String),
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error("Write batch '{batch}' failed: {message}")]
    WriteFailed { batch: String, message: String },
    #[error("Relationship {kind} is not defined from {from} to {to}")]
    InvalidRelationship {
        kind: String,
        from: String,
        to: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryNoop {
    Yes,
    No,
}

pub type QueryGeneratorResult = (QueryNoop, String);
