//! Pest grammar for the WHERE clause

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "hrsql.pest"]
pub struct HrSqlParser;
