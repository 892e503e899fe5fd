use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// Operand value of a filter criterion.
///
/// Parsed criteria only ever carry `Text`; the typed variants exist for criteria built
/// in code or produced by value transforms. Coercion to the column's kind happens when a
/// predicate is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    /// Textual form, as it appears (unescaped) in the grammar.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Literal::Text(s) => Cow::Borrowed(s),
            Literal::Integer(i) => Cow::Owned(i.to_string()),
            Literal::Float(f) => Cow::Owned(f.to_string()),
            Literal::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_text_forms() {
        assert_eq!(Literal::from("John").to_text(), "John");
        assert_eq!(Literal::from(25).to_text(), "25");
        assert_eq!(Literal::from(2.5).to_text(), "2.5");
        assert_eq!(Literal::from(true).to_text(), "true");
    }

    #[test]
    fn test_literal_untagged_serde() {
        let values: Vec<Literal> = serde_json::from_str(r#"[true, 7, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Literal::Boolean(true),
                Literal::Integer(7),
                Literal::Float(1.5),
                Literal::Text("x".to_string()),
            ]
        );
    }
}
