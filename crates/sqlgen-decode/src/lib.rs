//! sqlgen decode - human-readable query text back to a structured query
//!
//! Parses the fixed dialect
//! `SELECT [<AGG>(]<column>[)] FROM TABLE [WHERE <column> <op> <literal> [(AND|OR) ...]]`
//! against a table header and produces a [`DecodedQuery`].
//!
//! ```
//! use sqlgen_decode::decode;
//!
//! let columns = ["Player", "No.", "Position"];
//! let decoded = decode("SELECT COUNT(Player) FROM table WHERE No. > 21", &columns).unwrap();
//! assert_eq!(decoded.selected_column_index(), 0);
//! assert_eq!(decoded.aggregator().index(), 3);
//! assert_eq!(decoded.conditions()[0].literal, "21");
//! ```

use thiserror::Error;

mod catalog;
pub mod clause;
mod conditions;
mod decoder;
pub mod grammar;
mod select;

pub use catalog::{resolve_column, ColumnMatch};
pub use clause::locate_select_from;
pub use conditions::{resolve_condition, split_where};
pub use decoder::{decode, decode_with, DecodeOptions};
pub use select::resolve_select;
pub use sqlgen_ir::{Aggregator, CondOp, Condition, DecodedQuery, StructuredQuery};

/// Decode failures. Each variant carries the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Malformed condition: {0}")]
    MalformedCondition(String),
}

impl DecodeError {
    /// Stable name of the error kind, for counting failures
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedQuery(_) => "malformed_query",
            DecodeError::UnknownColumn(_) => "unknown_column",
            DecodeError::MalformedCondition(_) => "malformed_condition",
        }
    }
}
