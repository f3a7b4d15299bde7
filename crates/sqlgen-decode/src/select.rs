//! SELECT clause: aggregation keyword and target column

use sqlgen_ir::Aggregator;

use crate::catalog::{exact_position, resolve_column, ColumnMatch};
use crate::DecodeError;

/// Resolve the body of a SELECT clause to `(column_index, aggregator)`.
///
/// Aggregation keywords are matched as case-sensitive prefixes in the order
/// `MAX, MIN, COUNT, SUM, AVG`, first match wins. `COUNT Column1` and
/// `COUNT(Column1)` are equivalent.
pub fn resolve_select<S: AsRef<str>>(
    select_body: &str,
    columns: &[S],
    mode: ColumnMatch,
) -> Result<(usize, Aggregator), DecodeError> {
    let body = select_body.trim();

    let (aggregator, column_name) = match Aggregator::KEYWORDS
        .into_iter()
        .find(|agg| body.starts_with(agg.keyword()))
    {
        Some(agg) => {
            let rest = body[agg.keyword().len()..].trim();
            (agg, unwrap_parens(rest, columns))
        }
        None => (Aggregator::None, body),
    };

    let index = resolve_column(columns, column_name, mode)
        .ok_or_else(|| DecodeError::UnknownColumn(column_name.to_string()))?;

    tracing::trace!(column = column_name, index, agg = aggregator.keyword(), "resolved select");
    Ok((index, aggregator))
}

/// Strip one layer of parentheses, unless the wrapped text is itself a column
/// name such as `(km)`.
fn unwrap_parens<'a, S: AsRef<str>>(text: &'a str, columns: &[S]) -> &'a str {
    if is_wrapped(text) && exact_position(columns, text).is_none() {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// True when the opening parenthesis at the start closes at the very end.
fn is_wrapped(text: &str) -> bool {
    if text.len() < 2 || !text.starts_with('(') || !text.ends_with(')') {
        return false;
    }

    let last = text.len() - 1;
    let mut depth = 0i32;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && i != last {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [&str; 3] = ["Column0", "Column1", "Column2"];

    fn select(body: &str) -> Result<(usize, Aggregator), DecodeError> {
        resolve_select(body, &COLUMNS, ColumnMatch::Exact)
    }

    #[test]
    fn test_plain_column() {
        assert_eq!(resolve_select("Column", &["Column"], ColumnMatch::Exact).unwrap(), (0, Aggregator::None));
        assert_eq!(select("Column2").unwrap(), (2, Aggregator::None));
        assert_eq!(select("Column1").unwrap(), (1, Aggregator::None));
    }

    #[test]
    fn test_aggregated_column() {
        assert_eq!(select("COUNT(Column1)").unwrap(), (1, Aggregator::Count));
        assert_eq!(select("COUNT Column1").unwrap(), (1, Aggregator::Count));
        assert_eq!(select("MIN (Column1)").unwrap(), (1, Aggregator::Min));
        assert_eq!(select("AVG(Column0)").unwrap(), (0, Aggregator::Avg));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert!(matches!(select("count(Column1)"), Err(DecodeError::UnknownColumn(_))));
    }

    #[test]
    fn test_parenthesized_column_name_kept() {
        let columns = ["Speed", "(km)"];
        assert_eq!(resolve_select("MAX (km)", &columns, ColumnMatch::Exact).unwrap(), (1, Aggregator::Max));
    }

    #[test]
    fn test_only_one_paren_layer_stripped() {
        let columns = ["(Points)", "Points"];
        assert_eq!(resolve_select("SUM((Points))", &columns, ColumnMatch::Exact).unwrap(), (0, Aggregator::Sum));
        assert!(matches!(
            resolve_select("SUM(((Points)))", &columns, ColumnMatch::Exact),
            Err(DecodeError::UnknownColumn(name)) if name == "((Points))"
        ));
    }

    #[test]
    fn test_unbalanced_wrap_not_stripped() {
        assert!(is_wrapped("(a)"));
        assert!(is_wrapped("((a) b)"));
        assert!(!is_wrapped("(a) (b)"));
        assert!(!is_wrapped("()x"));
        assert!(!is_wrapped("("));
    }

    #[test]
    fn test_unknown_column() {
        assert!(matches!(select("Column9"), Err(DecodeError::UnknownColumn(name)) if name == "Column9"));
        assert!(matches!(select("COUNT"), Err(DecodeError::UnknownColumn(name)) if name.is_empty()));
    }

    #[test]
    fn test_substring_fallback_only_after_exact() {
        let columns = ["Team", "Team (Home)"];
        assert_eq!(
            resolve_select("COUNT(Team (Home))", &columns, ColumnMatch::Substring).unwrap(),
            (1, Aggregator::Count)
        );
        assert_eq!(
            resolve_select("COUNT(\"Team\")", &columns, ColumnMatch::Substring).unwrap(),
            (0, Aggregator::Count)
        );
        assert!(resolve_select("COUNT(\"Team\")", &columns, ColumnMatch::Exact).is_err());
    }
}
