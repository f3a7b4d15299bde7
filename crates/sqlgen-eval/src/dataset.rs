//! Test-set rows and prediction files
//!
//! Rows are JSON lines in the Hugging Face `wikisql` layout:
//!
//! ```json
//! {"question": "...", "table": {"id": "1-10015132-11", "header": ["Player", "No."], "types": ["text", "real"]},
//!  "sql": {"human_readable": "SELECT ...", "sel": 0, "agg": 0,
//!          "conds": {"column_index": [1], "operator_index": [0], "condition": ["5"]}}}
//! ```

use serde::{Deserialize, Serialize};
use sqlgen_ir::{StructuredQuery, WikiSqlQuery};
use std::path::Path;

use crate::EvalError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRef {
    pub id: String,
    pub header: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldSql {
    pub human_readable: String,
    #[serde(flatten)]
    pub query: WikiSqlQuery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRow {
    pub question: String,
    pub table: TableRef,
    pub sql: GoldSql,
}

impl DatasetRow {
    /// Gold query with thin spaces in literals replaced by plain spaces
    pub fn gold_query(&self) -> Result<StructuredQuery, sqlgen_ir::IrError> {
        let mut query = StructuredQuery::try_from(&self.sql.query)?;
        for cond in &mut query.conditions {
            cond.literal = normalize_literal(&cond.literal);
        }
        Ok(query)
    }

    pub fn table_id(&self) -> String {
        normalize_table_id(&self.table.id)
    }
}

/// Database table name for a dataset table id: `1-10015132-11` becomes
/// `table_1_10015132_11`.
pub fn normalize_table_id(id: &str) -> String {
    if id.starts_with("table") {
        id.to_string()
    } else {
        format!("table_{}", id.replace('-', "_"))
    }
}

pub(crate) fn normalize_literal(literal: &str) -> String {
    literal.replace('\u{2009}', " ")
}

pub fn parse_rows(contents: &str) -> Result<Vec<DatasetRow>, EvalError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| EvalError::Dataset { line: i + 1, source })
        })
        .collect()
}

pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<DatasetRow>, EvalError> {
    let contents = std::fs::read_to_string(path)?;
    parse_rows(&contents)
}

/// One prediction per line, blank lines included so indices stay aligned
/// with the dataset rows.
pub fn load_predictions<P: AsRef<Path>>(path: P) -> Result<Vec<String>, EvalError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::CondOp;

    const ROW: &str = r#"{"question": "What clock speed has 1.4 v?", "table": {"id": "1-1000181-1", "header": ["col0", "col1"], "types": ["text", "text"]}, "sql": {"human_readable": "SELECT col0 FROM table WHERE col1 = 1.4 v", "sel": 0, "agg": 0, "conds": {"column_index": [1], "operator_index": [0], "condition": ["1.4\u2009v"]}}}"#;

    #[test]
    fn test_table_id() {
        assert_eq!(normalize_table_id("1-1000181-1"), "table_1_1000181_1");
        assert_eq!(normalize_table_id("table_10015132_11"), "table_10015132_11");
    }

    #[test]
    fn test_parse_row_and_gold() {
        let rows = parse_rows(&format!("{}\n\n{}\n", ROW, ROW)).unwrap();
        assert_eq!(rows.len(), 2);

        let row = &rows[0];
        assert_eq!(row.table_id(), "table_1_1000181_1");
        assert_eq!(row.sql.human_readable, "SELECT col0 FROM table WHERE col1 = 1.4 v");

        let gold = row.gold_query().unwrap();
        assert_eq!(gold.conditions[0].operator, CondOp::Eq);
        assert_eq!(gold.conditions[0].literal, "1.4 v");
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let err = parse_rows(&format!("{}\n{{not json\n", ROW)).unwrap_err();
        assert!(matches!(err, EvalError::Dataset { line: 2, .. }));
    }
}
