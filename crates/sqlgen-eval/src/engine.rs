//! Execution engine seam

use sqlgen_ir::StructuredQuery;
use thiserror::Error;

/// Result values of one query, in row order
pub type ResultSet = Vec<serde_json::Value>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Table not found: {0}")]
    UnknownTable(String),

    #[error("Column {index} out of range for table {table} ({width} columns)")]
    ColumnOutOfRange {
        table: String,
        index: usize,
        width: usize,
    },

    #[error("Cannot read a number from literal '{0}'")]
    Coercion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Runs a structured query against a stored table
pub trait ExecutionEngine {
    fn execute(&self, table_id: &str, query: &StructuredQuery) -> Result<ResultSet, EngineError>;
}

impl<E: ExecutionEngine + ?Sized> ExecutionEngine for &E {
    fn execute(&self, table_id: &str, query: &StructuredQuery) -> Result<ResultSet, EngineError> {
        (**self).execute(table_id, query)
    }
}
