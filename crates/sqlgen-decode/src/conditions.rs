//! WHERE clause splitting and condition resolution

use pest::Parser;
use sqlgen_ir::{CondOp, Condition};

use crate::catalog::exact_position;
use crate::clause::where_body;
use crate::grammar::{HrSqlParser, Rule};
use crate::DecodeError;

/// Split the WHERE clause of `text` into trimmed, non-empty condition
/// fragments in source order.
///
/// `AND` and `OR` both separate fragments; the logical operator itself is
/// not kept. A query without `WHERE` has no fragments.
pub fn split_where(text: &str) -> Result<Vec<&str>, DecodeError> {
    let Some(body) = where_body(text) else {
        return Ok(Vec::new());
    };

    let where_pair = HrSqlParser::parse(Rule::where_body, body)
        .map_err(|_| DecodeError::MalformedCondition(body.to_string()))?
        .next()
        .ok_or_else(|| DecodeError::MalformedCondition(body.to_string()))?;

    let fragments: Vec<&str> = where_pair
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::fragment)
        .map(|pair| pair.as_str().trim())
        .filter(|fragment| !fragment.is_empty())
        .collect();

    tracing::trace!(count = fragments.len(), "split where clause");
    Ok(fragments)
}

/// Resolve one `<column> <op> <literal>` fragment.
///
/// The operator must have whitespace on both sides, so `a = b=c` splits
/// into `a`, `=`, `b=c`. The literal is returned verbatim.
pub fn resolve_condition<S: AsRef<str>>(fragment: &str, columns: &[S]) -> Result<Condition, DecodeError> {
    let fragment = fragment.trim();
    let malformed = || DecodeError::MalformedCondition(fragment.to_string());

    let condition_pair = HrSqlParser::parse(Rule::condition, fragment)
        .map_err(|_| malformed())?
        .next()
        .ok_or_else(malformed)?;

    let mut column = "";
    let mut op = "";
    let mut literal = "";
    for pair in condition_pair.into_inner() {
        match pair.as_rule() {
            Rule::column => column = pair.as_str().trim(),
            Rule::op => op = pair.as_str(),
            Rule::literal => literal = pair.as_str().trim(),
            _ => {}
        }
    }

    if column.is_empty() || literal.is_empty() {
        return Err(malformed());
    }
    let operator = CondOp::from_symbol(op).ok_or_else(malformed)?;

    let column_index = exact_position(columns, column)
        .ok_or_else(|| DecodeError::UnknownColumn(column.to_string()))?;

    Ok(Condition::new(column_index, operator, literal))
}
