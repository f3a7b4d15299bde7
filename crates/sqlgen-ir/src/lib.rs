//! sqlgen IR - the structured query representation
//!
//! `StructuredQuery` is what execution engines consume, `DecodedQuery`
//! additionally carries the text it was decoded from. Both serialize to the
//! index-based JSON shape expected by downstream tooling.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

pub mod schema;
mod types;

pub use schema::{ColumnSchema, SchemaError, TableSchema};
pub use types::*;

#[derive(Debug, Error)]
pub enum IrError {
    #[error("Invalid {kind} index: {index}")]
    InvalidIndex { kind: &'static str, index: usize },

    #[error("Ragged conditions: {columns} columns, {operators} operators, {literals} literals")]
    RaggedConditions {
        columns: usize,
        operators: usize,
        literals: usize,
    },
}

/// A single WHERE condition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub column_index: usize,
    #[serde(rename = "operator_index")]
    pub operator: CondOp,
    /// Raw literal text, quotes and all
    pub literal: String,
}

impl Condition {
    pub fn new(column_index: usize, operator: CondOp, literal: impl Into<String>) -> Self {
        Self {
            column_index,
            operator,
            literal: literal.into(),
        }
    }

    fn normalized(&self) -> (usize, CondOp, String) {
        (self.column_index, self.operator, self.literal.to_lowercase())
    }
}

/// Canonical query: one selected column, an optional aggregation, and
/// conditions in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuredQuery {
    pub selected_column_index: usize,
    #[serde(rename = "aggregator_index")]
    pub aggregator: Aggregator,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl StructuredQuery {
    /// Logical-form equality used for evaluation.
    ///
    /// Literals compare case-insensitively. With `ordered == false` the
    /// conditions compare as sets.
    pub fn matches(&self, other: &StructuredQuery, ordered: bool) -> bool {
        if self.selected_column_index != other.selected_column_index
            || self.aggregator != other.aggregator
        {
            return false;
        }

        if ordered {
            self.conditions
                .iter()
                .map(Condition::normalized)
                .eq(other.conditions.iter().map(Condition::normalized))
        } else {
            let ours: HashSet<_> = self.conditions.iter().map(Condition::normalized).collect();
            let theirs: HashSet<_> = other.conditions.iter().map(Condition::normalized).collect();
            ours == theirs
        }
    }

    /// Calculate fingerprint (SHA-256) of the canonical JSON
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("IR should always serialize");
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Result of decoding one human-readable query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedQuery {
    #[serde(flatten)]
    pub query: StructuredQuery,
    pub original_text: String,
}

impl DecodedQuery {
    pub fn selected_column_index(&self) -> usize {
        self.query.selected_column_index
    }

    pub fn aggregator(&self) -> Aggregator {
        self.query.aggregator
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.query.conditions
    }

    pub fn into_structured(self) -> StructuredQuery {
        self.query
    }
}

impl AsRef<StructuredQuery> for DecodedQuery {
    fn as_ref(&self) -> &StructuredQuery {
        &self.query
    }
}

/// WikiSQL dataset encoding of a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiSqlQuery {
    pub sel: usize,
    pub agg: usize,
    #[serde(default)]
    pub conds: ColumnarConds,
}

/// Conditions stored as three parallel arrays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnarConds {
    pub column_index: Vec<usize>,
    pub operator_index: Vec<usize>,
    pub condition: Vec<String>,
}

impl From<&StructuredQuery> for WikiSqlQuery {
    fn from(query: &StructuredQuery) -> Self {
        let mut conds = ColumnarConds::default();
        for cond in &query.conditions {
            conds.column_index.push(cond.column_index);
            conds.operator_index.push(cond.operator.index());
            conds.condition.push(cond.literal.clone());
        }

        WikiSqlQuery {
            sel: query.selected_column_index,
            agg: query.aggregator.index(),
            conds,
        }
    }
}

impl TryFrom<&WikiSqlQuery> for StructuredQuery {
    type Error = IrError;

    fn try_from(wiki: &WikiSqlQuery) -> Result<Self, Self::Error> {
        let conds = &wiki.conds;
        if conds.column_index.len() != conds.operator_index.len()
            || conds.column_index.len() != conds.condition.len()
        {
            return Err(IrError::RaggedConditions {
                columns: conds.column_index.len(),
                operators: conds.operator_index.len(),
                literals: conds.condition.len(),
            });
        }

        let conditions = conds
            .column_index
            .iter()
            .zip(&conds.operator_index)
            .zip(&conds.condition)
            .map(|((&column_index, &op), literal)| {
                Ok(Condition::new(column_index, CondOp::from_index(op)?, literal.clone()))
            })
            .collect::<Result<Vec<_>, IrError>>()?;

        Ok(StructuredQuery {
            selected_column_index: wiki.sel,
            aggregator: Aggregator::from_index(wiki.agg)?,
            conditions,
        })
    }
}
