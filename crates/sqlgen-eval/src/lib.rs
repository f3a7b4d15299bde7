//! sqlgen eval - scoring generated queries against a WikiSQL-style test set
//!
//! Predictions are decoded with `sqlgen-decode`, executed through an
//! [`ExecutionEngine`] and compared with the gold query on three axes:
//! execution result, logical form text, and structured equality.

use thiserror::Error;

pub mod dataset;
pub mod engine;
pub mod harness;
pub mod memory;

pub use dataset::{load_predictions, load_rows, normalize_table_id, DatasetRow, GoldSql, TableRef};
pub use engine::{EngineError, ExecutionEngine, ResultSet};
pub use harness::{EvalCounts, EvalOptions, EvalReport, Evaluator};
pub use memory::{MemoryEngine, Table};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset row at line {line}: {source}")]
    Dataset {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Got {predictions} predictions for {rows} dataset rows")]
    PredictionCount { rows: usize, predictions: usize },

    #[error("Invalid gold query in row {row}: {source}")]
    GoldQuery {
        row: usize,
        #[source]
        source: sqlgen_ir::IrError,
    },

    #[error("Gold query failed to execute in row {row}: {source}")]
    GoldExecution {
        row: usize,
        #[source]
        source: EngineError,
    },

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}
