use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column {column}: expected {expected}, found {found}")]
    CellType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Row has {got} cells, table has {expected} columns")]
    RowArity { expected: usize, got: usize },

    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Grouping requires at least one column")]
    EmptyGroupKey,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TableResult<T> = Result<T, TableError>;
