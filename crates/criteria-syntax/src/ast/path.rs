use crate::errors::SyntaxError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Dot-separated column path (e.g. `age`, `user.address.city`).
///
/// Always has at least one segment and no empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnPath {
    segments: Vec<String>,
}

impl ColumnPath {
    pub fn parse(path: &str) -> Result<Self, SyntaxError> {
        let invalid = |reason| SyntaxError::InvalidColumn {
            column: path.to_string(),
            reason,
        };

        if path.is_empty() {
            return Err(invalid("column path is empty"));
        }

        let mut segments = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(invalid("column path has an empty segment"));
            }
            if segment
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | ',' | ':' | '\\'))
            {
                return Err(invalid(
                    "column path segments cannot contain whitespace or ( ) , : \\",
                ));
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Paths are never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment of the path.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The first `count` segments joined with dots.
    pub fn prefix(&self, count: usize) -> String {
        self.segments[..count.min(self.segments.len())].join(".")
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for ColumnPath {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnPath::parse(s)
    }
}

impl TryFrom<&str> for ColumnPath {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ColumnPath::parse(value)
    }
}

impl TryFrom<String> for ColumnPath {
    type Error = SyntaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ColumnPath::parse(&value)
    }
}

impl From<ColumnPath> for String {
    fn from(path: ColumnPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_path_segments() {
        let path = ColumnPath::parse("user.address.city").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments()[0], "user");
        assert_eq!(path.leaf(), "city");
        assert_eq!(path.prefix(2), "user.address");
        assert_eq!(path.prefix(0), "");
        assert_eq!(path.to_string(), "user.address.city");
    }

    #[test]
    fn test_column_path_rejects_empty_segments() {
        assert!(ColumnPath::parse("").is_err());
        assert!(ColumnPath::parse("a..b").is_err());
        assert!(ColumnPath::parse(".a").is_err());
        assert!(ColumnPath::parse("a b").is_err());
        assert!(ColumnPath::parse("a(b)").is_err());
    }

    #[test]
    fn test_column_path_serde_as_string() {
        let path = ColumnPath::parse("user.name").unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"user.name\"");
        let bad: Result<ColumnPath, _> = serde_json::from_str("\"a..b\"");
        assert!(bad.is_err());
    }
}
