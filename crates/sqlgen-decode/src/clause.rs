//! Clause boundaries of a human-readable query

use crate::DecodeError;

pub const SELECT_TOKEN: &str = "SELECT";
/// The dialect always names its single table `table`
pub const FROM_TOKEN: &str = "FROM TABLE";
pub const WHERE_TOKEN: &str = "WHERE";

/// Byte offset of the first ASCII case-insensitive occurrence of `needle`.
///
/// `needle` must be ASCII, so any match starts on a char boundary.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Text between `SELECT` and `FROM TABLE`, trimmed.
pub fn locate_select_from(text: &str) -> Result<&str, DecodeError> {
    let malformed = || DecodeError::MalformedQuery(text.to_string());

    let start = find_ignore_ascii_case(text, SELECT_TOKEN).ok_or_else(malformed)? + SELECT_TOKEN.len();
    let end = find_ignore_ascii_case(text, FROM_TOKEN).ok_or_else(malformed)?;

    if start >= end {
        return Err(malformed());
    }

    Ok(text[start..end].trim())
}

/// Everything after the first case-sensitive `WHERE`, if any.
pub fn where_body(text: &str) -> Option<&str> {
    text.find(WHERE_TOKEN)
        .map(|index| &text[index + WHERE_TOKEN.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_body() {
        assert_eq!(locate_select_from("SELECT Column FROM table").unwrap(), "Column");
        assert_eq!(
            locate_select_from("select  COUNT(No.)  from TABLE where x = 1").unwrap(),
            "COUNT(No.)"
        );
    }

    #[test]
    fn test_body_keeps_case_and_unicode() {
        assert_eq!(
            locate_select_from("SELECT Größe (m²) FROM table").unwrap(),
            "Größe (m²)"
        );
    }

    #[test]
    fn test_missing_tokens() {
        assert!(matches!(
            locate_select_from("SELECT a table"),
            Err(DecodeError::MalformedQuery(_))
        ));
        assert!(matches!(
            locate_select_from("a FROM table"),
            Err(DecodeError::MalformedQuery(_))
        ));
    }

    #[test]
    fn test_tokens_out_of_order() {
        assert!(matches!(
            locate_select_from("FROM table SELECT a"),
            Err(DecodeError::MalformedQuery(_))
        ));
        // SELECT must end strictly before FROM TABLE starts
        assert!(locate_select_from("SELECTFROM TABLE").is_err());
    }

    #[test]
    fn test_where_body() {
        assert_eq!(where_body("SELECT a FROM table WHERE b = 1"), Some(" b = 1"));
        assert_eq!(where_body("SELECT a FROM table where b = 1"), None);
        assert_eq!(where_body("SELECT a FROM table"), None);
    }
}
