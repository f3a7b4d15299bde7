//! Uploaded table schemas
//!
//! ```json
//! {"name": "players", "columns": [{"name": "Player", "type": "text"}]}
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema for table '{0}' has no columns")]
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let json = json.strip_prefix('\u{feff}').unwrap_or(json);
        let schema: TableSchema = serde_json::from_str(json)?;

        if schema.columns.is_empty() {
            return Err(SchemaError::Empty(schema.name));
        }
        Ok(schema)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Column names in declaration order; this order is the index space.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_types(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.data_type.clone()).collect()
    }
}
