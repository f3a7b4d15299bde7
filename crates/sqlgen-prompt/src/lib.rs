//! Model input formats
//!
//! Each fine-tuned checkpoint was trained on one prompt layout. The registry
//! maps a checkpoint's format name to that layout so questions are phrased
//! the same way at inference time.

use serde::{Deserialize, Serialize};
use sqlgen_ir::TableSchema;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Unknown input format: {0}")]
    UnknownFormat(String),
}

/// How the question is introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// `translate to SQL: {question}`
    Short,
    /// `translate to SQL the following natural language query: '{question}'`
    Quoted,
}

/// How the table is described to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStyle {
    Omitted,
    /// `Table('Player', 'No.')`
    ColumnNames,
    /// `Table(Player: text, No.: real)`
    ColumnNamesAndTypes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFormat {
    pub name: String,
    pub instruction: Instruction,
    pub table: TableStyle,
}

impl InputFormat {
    pub fn new(name: impl Into<String>, instruction: Instruction, table: TableStyle) -> Self {
        Self {
            name: name.into(),
            instruction,
            table,
        }
    }

    pub fn table_str(&self, schema: &TableSchema) -> Option<String> {
        let columns: Vec<String> = match self.table {
            TableStyle::Omitted => return None,
            TableStyle::ColumnNames => schema
                .columns
                .iter()
                .map(|c| format!("'{}'", c.name))
                .collect(),
            TableStyle::ColumnNamesAndTypes => schema
                .columns
                .iter()
                .map(|c| format!("{}: {}", c.name, c.data_type))
                .collect(),
        };
        Some(format!("Table({})", columns.join(", ")))
    }

    /// Model input for `question` asked against `schema`
    pub fn format(&self, question: &str, schema: &TableSchema) -> String {
        let mut input = match self.instruction {
            Instruction::Short => format!("translate to SQL: {}", question),
            Instruction::Quoted => format!(
                "translate to SQL the following natural language query: '{}'",
                question
            ),
        };

        if let Some(table) = self.table_str(schema) {
            input.push_str(&format!(", where the table is '{}'", table));
        }
        input
    }
}

pub struct FormatRegistry {
    formats: HashMap<String, InputFormat>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            formats: HashMap::new(),
        };
        registry.register_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        self.register(InputFormat::new("PretrainedModel1", Instruction::Short, TableStyle::Omitted));
        self.register(InputFormat::new("PretrainedModel5", Instruction::Quoted, TableStyle::ColumnNames));

        for name in ["SQLT5Baseline", "SQLCodeT5Baseline"] {
            self.register(InputFormat::new(name, Instruction::Quoted, TableStyle::Omitted));
        }
        for name in ["SQLT5ColNameAware", "SQLCodeT5ColNameAware"] {
            self.register(InputFormat::new(name, Instruction::Quoted, TableStyle::ColumnNames));
        }
        for name in ["SQLT5ColNameTypeAware", "SQLCodeT5ColNameTypeAware"] {
            self.register(InputFormat::new(name, Instruction::Quoted, TableStyle::ColumnNamesAndTypes));
        }
    }

    pub fn register(&mut self, format: InputFormat) {
        self.formats.insert(format.name.clone(), format);
    }

    pub fn lookup(&self, name: &str) -> Result<&InputFormat, PromptError> {
        self.formats
            .get(name)
            .ok_or_else(|| PromptError::UnknownFormat(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formats.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
