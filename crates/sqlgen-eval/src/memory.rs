//! In-memory execution over WikiSQL table dumps
//!
//! Tables come from the `*.tables.jsonl` files shipped with WikiSQL:
//! `{"id": "1-1000181-1", "header": [...], "types": ["text", "real"], "rows": [[...]]}`.
//! Conditions are ANDed. Literals are lowercased, and for `real` columns they
//! are read as numbers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlgen_ir::{Aggregator, CondOp, Condition, StructuredQuery};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::dataset::normalize_table_id;
use crate::engine::{EngineError, ExecutionEngine, ResultSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub header: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    fn is_real(&self, column: usize) -> bool {
        self.types.get(column).map(String::as_str) == Some("real")
    }

    fn check_column(&self, index: usize) -> Result<(), EngineError> {
        if index < self.header.len() {
            Ok(())
        } else {
            Err(EngineError::ColumnOutOfRange {
                table: self.id.clone(),
                index,
                width: self.header.len(),
            })
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryEngine {
    tables: HashMap<String, Table>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under its normalized id
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(normalize_table_id(&table.id), table);
    }

    pub fn from_jsonl(contents: &str) -> Result<Self, EngineError> {
        let mut engine = Self::new();
        for (i, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let table: Table =
                serde_json::from_str(line).map_err(|source| EngineError::Json { line: i + 1, source })?;
            engine.insert(table);
        }
        Ok(engine)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let engine = Self::from_jsonl(&contents)?;
        tracing::info!(tables = engine.len(), path = %path.as_ref().display(), "Loaded tables");
        Ok(engine)
    }

    pub fn get(&self, table_id: &str) -> Option<&Table> {
        self.tables.get(table_id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl ExecutionEngine for MemoryEngine {
    fn execute(&self, table_id: &str, query: &StructuredQuery) -> Result<ResultSet, EngineError> {
        let table = self
            .tables
            .get(table_id)
            .ok_or_else(|| EngineError::UnknownTable(table_id.to_string()))?;

        table.check_column(query.selected_column_index)?;
        let filters = query
            .conditions
            .iter()
            .map(|cond| Filter::new(table, cond))
            .collect::<Result<Vec<_>, _>>()?;

        let cells: Vec<&Value> = table
            .rows
            .iter()
            .filter(|row| filters.iter().all(|f| f.accepts(row)))
            .map(|row| row.get(query.selected_column_index).unwrap_or(&NULL))
            .collect();

        Ok(aggregate(
            query.aggregator,
            table.is_real(query.selected_column_index),
            &cells,
        ))
    }
}

static NULL: Value = Value::Null;

enum Operand {
    Number(f64),
    Text(String),
}

struct Filter {
    column: usize,
    op: CondOp,
    operand: Operand,
}

impl Filter {
    fn new(table: &Table, cond: &Condition) -> Result<Self, EngineError> {
        table.check_column(cond.column_index)?;

        let literal = cond.literal.to_lowercase();
        let operand = if table.is_real(cond.column_index) {
            Operand::Number(coerce_number(&literal)?)
        } else {
            Operand::Text(literal)
        };

        Ok(Self {
            column: cond.column_index,
            op: cond.operator,
            operand,
        })
    }

    fn accepts(&self, row: &[Value]) -> bool {
        let Some(cell) = row.get(self.column) else {
            return false;
        };

        let ordering = match &self.operand {
            Operand::Number(n) => cell_number(cell).and_then(|v| v.partial_cmp(n)),
            Operand::Text(t) => cell_text(cell).map(|v| v.as_str().cmp(t.as_str())),
        };

        matches!(
            (ordering, self.op),
            (Some(Ordering::Equal), CondOp::Eq)
                | (Some(Ordering::Greater), CondOp::Gt)
                | (Some(Ordering::Less), CondOp::Lt)
        )
    }
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[-+]?\d*\.\d+|\d+").expect("static number pattern"))
}

/// Read a number out of a literal: the whole literal without thousands
/// separators if possible, else its first numeric run.
pub(crate) fn coerce_number(literal: &str) -> Result<f64, EngineError> {
    let cleaned = literal.trim().replace(',', "");
    if let Ok(n) = cleaned.parse::<f64>() {
        if n.is_finite() {
            return Ok(n);
        }
    }

    number_pattern()
        .find(literal)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| EngineError::Coercion(literal.to_string()))
}

fn cell_number(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.to_lowercase()),
        other => Some(other.to_string().to_lowercase()),
    }
}

fn aggregate(agg: Aggregator, real: bool, cells: &[&Value]) -> ResultSet {
    let present: Vec<&Value> = cells.iter().copied().filter(|c| !c.is_null()).collect();
    let numbers = || present.iter().filter_map(|c| cell_number(c));

    let value = match agg {
        Aggregator::None => return cells.iter().map(|&c| c.clone()).collect(),
        Aggregator::Count => Value::from(present.len()),
        Aggregator::Max | Aggregator::Min if real => {
            let pick: fn(f64, f64) -> f64 = if agg == Aggregator::Max { f64::max } else { f64::min };
            numbers().reduce(pick).map(Value::from).unwrap_or(Value::Null)
        }
        Aggregator::Max | Aggregator::Min => {
            let by_text = |a: &&&Value, b: &&&Value| cell_text(a).cmp(&cell_text(b));
            let picked = if agg == Aggregator::Max {
                present.iter().max_by(by_text)
            } else {
                present.iter().min_by(by_text)
            };
            picked.map(|&c| c.clone()).unwrap_or(Value::Null)
        }
        Aggregator::Sum => {
            let mut values = numbers().peekable();
            if values.peek().is_none() {
                Value::Null
            } else {
                Value::from(values.sum::<f64>())
            }
        }
        Aggregator::Avg => {
            let values: Vec<f64> = numbers().collect();
            if values.is_empty() {
                Value::Null
            } else {
                Value::from(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
    };

    vec![value]
}
