//! Parsing of property path strings.
//!
//! Paths follow a loose JavaScript-like accessor grammar:
//!
//! ```text
//! pathElement := { '.' } ( '[' ( integer | '"' ( '\"' | [^"] )* '"' ) ']' | name )
//! path        := pathElement { pathElement }
//! ```
//!
//! where `name` runs up to the next `.` or `[`.

use super::path::{Path, PathElement};
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// PathError describes why a path string could not be parsed.
///
/// Offsets are byte offsets of the accessor that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty property path")]
    Empty,

    #[error("missing closing quote in property name at offset {offset}")]
    UnterminatedQuote { offset: usize },

    #[error("missing closing bracket in property access at offset {offset}")]
    MissingClosingBracket { offset: usize },

    #[error("invalid array index {index:?} at offset {offset}: {source}")]
    InvalidArrayIndex {
        offset: usize,
        index: String,
        #[source]
        source: ParseIntError,
    },
}

/// Parses a path string into its elements.
///
/// Fails on the empty string, and on a string made only of `.` separators,
/// since neither names any property.
pub fn parse_diff_path(path: &str) -> Result<Path, PathError> {
    let bytes = path.as_bytes();
    let mut elements = Path::default();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => pos += 1,
            b'[' if bytes.get(pos + 1) == Some(&b'"') => {
                let (key, end) = parse_quoted_key(path, pos)?;
                elements.push(PathElement::Key(key));
                pos = end;
            }
            b'[' => {
                let rest = &path[pos + 1..];
                let len = rest
                    .find(']')
                    .ok_or(PathError::MissingClosingBracket { offset: pos })?;
                let text = &rest[..len];
                let index = text
                    .parse::<i64>()
                    .map_err(|source| PathError::InvalidArrayIndex {
                        offset: pos,
                        index: text.to_string(),
                        source,
                    })?;
                elements.push(PathElement::Index(index));
                pos += len + 2;
            }
            _ => {
                let rest = &path[pos..];
                let len = rest.find(|c: char| c == '.' || c == '[').unwrap_or(rest.len());
                elements.push(PathElement::Key(rest[..len].to_string()));
                pos += len;
            }
        }
    }

    if elements.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(elements)
}

/// Parses `["..."]` starting at the `[` at `open`. Returns the unescaped
/// key and the offset just past the closing bracket.
fn parse_quoted_key(path: &str, open: usize) -> Result<(String, usize), PathError> {
    let start = open + 2;
    let mut key = String::new();
    let mut chars = path[start..].char_indices().peekable();

    let close = loop {
        match chars.next() {
            None => return Err(PathError::UnterminatedQuote { offset: open }),
            Some((i, '"')) => break start + i + 1,
            Some((_, '\\')) if matches!(chars.peek(), Some((_, '"'))) => {
                chars.next();
                key.push('"');
            }
            Some((_, c)) => key.push(c),
        }
    };

    if path.as_bytes().get(close) != Some(&b']') {
        return Err(PathError::MissingClosingBracket { offset: open });
    }
    Ok((key, close + 1))
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_diff_path(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(s: &str) -> Vec<PathElement> {
        parse_diff_path(s).unwrap().into_iter().collect()
    }

    #[test]
    fn test_parse_bare_name() {
        assert_eq!(elements("foo"), vec![PathElement::key("foo")]);
    }

    #[test]
    fn test_parse_dotted_names() {
        assert_eq!(
            elements("foo.bar.baz"),
            vec![PathElement::key("foo"), PathElement::key("bar"), PathElement::key("baz")]
        );
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(elements("[3]"), vec![PathElement::index(3)]);
    }

    #[test]
    fn test_parse_negative_index() {
        assert_eq!(elements("[-1]"), vec![PathElement::index(-1)]);
    }

    #[test]
    fn test_parse_mixed_path() {
        assert_eq!(
            elements(r#"foo[0]["bar"].baz"#),
            vec![
                PathElement::key("foo"),
                PathElement::index(0),
                PathElement::key("bar"),
                PathElement::key("baz"),
            ]
        );
    }

    #[test]
    fn test_parse_escaped_quote() {
        assert_eq!(elements(r#"["a\"b"]"#), vec![PathElement::key("a\"b")]);
    }

    #[test]
    fn test_parse_quoted_key_keeps_other_characters() {
        assert_eq!(
            elements(r#"tags["kubernetes.io/[name]"]"#),
            vec![PathElement::key("tags"), PathElement::key("kubernetes.io/[name]")]
        );
        assert_eq!(elements(r#"["a\nb"]"#), vec![PathElement::key(r"a\nb")]);
        assert_eq!(elements(r#"["héllo"]"#), vec![PathElement::key("héllo")]);
        assert_eq!(elements(r#"[""]"#), vec![PathElement::key("")]);
    }

    #[test]
    fn test_parse_leading_and_repeated_dots() {
        assert_eq!(elements(".foo"), vec![PathElement::key("foo")]);
        assert_eq!(
            elements("foo..bar."),
            vec![PathElement::key("foo"), PathElement::key("bar")]
        );
        assert_eq!(
            elements("foo.[1]"),
            vec![PathElement::key("foo"), PathElement::index(1)]
        );
    }

    #[test]
    fn test_parse_nested_indices() {
        assert_eq!(
            elements("matrix[1][2]"),
            vec![PathElement::key("matrix"), PathElement::index(1), PathElement::index(2)]
        );
    }

    #[test]
    fn test_parse_unterminated_quote() {
        assert_eq!(
            parse_diff_path(r#"["abc"#),
            Err(PathError::UnterminatedQuote { offset: 0 })
        );
        assert_eq!(
            parse_diff_path(r#"foo["abc\"]"#),
            Err(PathError::UnterminatedQuote { offset: 3 })
        );
    }

    #[test]
    fn test_parse_missing_bracket_after_quote() {
        assert_eq!(
            parse_diff_path(r#"["abc"x"#),
            Err(PathError::MissingClosingBracket { offset: 0 })
        );
        assert_eq!(
            parse_diff_path(r#"["abc""#),
            Err(PathError::MissingClosingBracket { offset: 0 })
        );
    }

    #[test]
    fn test_parse_missing_bracket_after_index() {
        assert_eq!(
            parse_diff_path("[3"),
            Err(PathError::MissingClosingBracket { offset: 0 })
        );
        assert_eq!(
            parse_diff_path("a["),
            Err(PathError::MissingClosingBracket { offset: 1 })
        );
    }

    #[test]
    fn test_parse_invalid_index() {
        match parse_diff_path("list[one]") {
            Err(PathError::InvalidArrayIndex { offset, index, .. }) => {
                assert_eq!(offset, 4);
                assert_eq!(index, "one");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            parse_diff_path("[]"),
            Err(PathError::InvalidArrayIndex { .. })
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_diff_path(""), Err(PathError::Empty));
        assert_eq!(parse_diff_path(".."), Err(PathError::Empty));
    }

    #[test]
    fn test_from_str() {
        let path: Path = "a[1].b".parse().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(&PathElement::key("a")));
    }

    #[test]
    fn test_display_reparses() {
        for s in [
            "foo[0].bar",
            r#"tags["kubernetes.io/name"]"#,
            r#"["say \"hi\""][2]"#,
            "[-1]",
        ] {
            let path = parse_diff_path(s).unwrap();
            assert_eq!(path.to_string(), s);
            assert_eq!(parse_diff_path(&path.to_string()).unwrap(), path);
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            parse_diff_path("[3").unwrap_err().to_string(),
            "missing closing bracket in property access at offset 0"
        );
    }
}
