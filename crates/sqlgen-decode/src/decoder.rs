//! Query assembly

use sqlgen_ir::{DecodedQuery, StructuredQuery};

use crate::catalog::ColumnMatch;
use crate::clause::locate_select_from;
use crate::conditions::{resolve_condition, split_where};
use crate::select::resolve_select;
use crate::DecodeError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Matching mode for the SELECT column. WHERE columns always match exactly.
    pub column_match: ColumnMatch,
}

/// Decode `text` against the table header `columns` with exact column matching.
pub fn decode<S: AsRef<str>>(text: &str, columns: &[S]) -> Result<DecodedQuery, DecodeError> {
    decode_with(text, columns, &DecodeOptions::default())
}

/// Decode `text` against `columns`.
///
/// The first failing stage aborts the decode; no partial result is returned.
pub fn decode_with<S: AsRef<str>>(
    text: &str,
    columns: &[S],
    options: &DecodeOptions,
) -> Result<DecodedQuery, DecodeError> {
    let result = assemble(text, columns, options);

    match &result {
        Ok(decoded) => tracing::trace!(
            sel = decoded.query.selected_column_index,
            agg = decoded.query.aggregator.index(),
            conds = decoded.query.conditions.len(),
            "decoded query"
        ),
        Err(e) => tracing::debug!(error = %e, kind = e.kind(), query = text, "decode failed"),
    }

    result
}

fn assemble<S: AsRef<str>>(
    text: &str,
    columns: &[S],
    options: &DecodeOptions,
) -> Result<DecodedQuery, DecodeError> {
    let select_body = locate_select_from(text)?;
    let (selected_column_index, aggregator) = resolve_select(select_body, columns, options.column_match)?;

    let conditions = split_where(text)?
        .into_iter()
        .map(|fragment| resolve_condition(fragment, columns))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedQuery {
        query: StructuredQuery {
            selected_column_index,
            aggregator,
            conditions,
        },
        original_text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::{Aggregator, CondOp, Condition};

    #[test]
    fn test_decode_full_query() {
        let columns = ["Column0", "Column1", "Column2", "Column3", "Column4"];
        let text = "SELECT Column1 FROM table WHERE Column0 > 2 AND Column4 = 2 AND Column1 < 5 OR Column2 = 'Alexander'";

        let decoded = decode(text, &columns).unwrap();
        assert_eq!(decoded.selected_column_index(), 1);
        assert_eq!(decoded.aggregator(), Aggregator::None);
        assert_eq!(
            decoded.conditions(),
            &[
                Condition::new(0, CondOp::Gt, "2"),
                Condition::new(4, CondOp::Eq, "2"),
                Condition::new(1, CondOp::Lt, "5"),
                Condition::new(2, CondOp::Eq, "'Alexander'"),
            ]
        );
        assert_eq!(decoded.original_text, text);
    }

    #[test]
    fn test_select_error_reported_before_where_error() {
        let err = decode("SELECT nope FROM table WHERE also_bad", &["a"]).unwrap_err();
        assert_eq!(err, DecodeError::UnknownColumn("nope".to_string()));
    }

    #[test]
    fn test_condition_failure_aborts() {
        let err = decode("SELECT a FROM table WHERE a = 1 AND b", &["a"]).unwrap_err();
        assert_eq!(err, DecodeError::MalformedCondition("b".to_string()));
    }

    #[test]
    fn test_where_columns_never_use_substring_fallback() {
        let options = DecodeOptions {
            column_match: ColumnMatch::Substring,
        };
        let columns = ["Team", "Score"];

        let decoded = decode_with("SELECT Team name FROM table", &columns, &options).unwrap();
        assert_eq!(decoded.selected_column_index(), 0);

        let err = decode_with("SELECT Team FROM table WHERE Team name = x", &columns, &options).unwrap_err();
        assert_eq!(err, DecodeError::UnknownColumn("Team name".to_string()));
    }
}
