//! Column name lookup against a table header

use std::str::FromStr;

/// How an extracted column name is matched against the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnMatch {
    /// Exact, case-sensitive match only
    #[default]
    Exact,
    /// Exact match first, then the first header name contained in the
    /// extracted text
    Substring,
}

impl FromStr for ColumnMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(ColumnMatch::Exact),
            "substring" => Ok(ColumnMatch::Substring),
            other => Err(format!("unknown column match mode: {}", other)),
        }
    }
}

/// First header position equal to `name`.
pub(crate) fn exact_position<S: AsRef<str>>(columns: &[S], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.as_ref() == name)
}

/// Resolve `name` to a 0-based header index.
///
/// Duplicate names resolve to their first occurrence. Substring matching
/// never considers empty header names.
pub fn resolve_column<S: AsRef<str>>(columns: &[S], name: &str, mode: ColumnMatch) -> Option<usize> {
    if let Some(index) = exact_position(columns, name) {
        return Some(index);
    }

    match mode {
        ColumnMatch::Exact => None,
        ColumnMatch::Substring => columns.iter().position(|c| {
            let c = c.as_ref();
            !c.is_empty() && name.contains(c)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_is_case_sensitive() {
        let columns = ["Name", "Team"];
        assert_eq!(resolve_column(&columns, "Team", ColumnMatch::Exact), Some(1));
        assert_eq!(resolve_column(&columns, "team", ColumnMatch::Exact), None);
    }

    #[test]
    fn test_duplicates_resolve_to_first() {
        let columns = ["Score", "Team", "Score"];
        assert_eq!(resolve_column(&columns, "Score", ColumnMatch::Exact), Some(0));
    }

    #[test]
    fn test_substring_fallback() {
        let columns = ["", "Team", "Home team", "Away team"];
        // exact wins even when an earlier column is a substring
        assert_eq!(resolve_column(&columns, "Home team", ColumnMatch::Substring), Some(2));
        // first catalog match wins among substrings, empty names skipped
        assert_eq!(resolve_column(&columns, "\"Team\" name", ColumnMatch::Substring), Some(1));
        assert_eq!(resolve_column(&columns, "Away team,", ColumnMatch::Substring), Some(3));
        assert_eq!(resolve_column(&columns, "Venue", ColumnMatch::Substring), None);
        assert_eq!(resolve_column(&columns, "\"Team\" name", ColumnMatch::Exact), None);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("exact".parse::<ColumnMatch>().unwrap(), ColumnMatch::Exact);
        assert_eq!("Substring".parse::<ColumnMatch>().unwrap(), ColumnMatch::Substring);
        assert!("fuzzy".parse::<ColumnMatch>().is_err());
    }
}
