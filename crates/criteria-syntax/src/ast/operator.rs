use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

/// Filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    StartsWith,
    EndsWith,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Between,
    NotBetween,
}

/// Number of operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Zero,
    One,
    Two,
    AtLeastOne,
}

lazy_static! {
    static ref OPERATOR_KEYWORDS: HashMap<&'static str, Operator> = build_keyword_map();
}

impl Operator {
    pub const ALL: [Operator; 15] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::In,
        Operator::NotIn,
        Operator::Between,
        Operator::NotBetween,
    ];

    /// Canonical keyword used when serializing.
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Equal => "eq",
            Operator::NotEqual => "ne",
            Operator::GreaterThan => "gt",
            Operator::LessThan => "lt",
            Operator::GreaterThanOrEqual => "gte",
            Operator::LessThanOrEqual => "lte",
            Operator::Contains => "contains",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::IsNull => "isnull",
            Operator::IsNotNull => "isnotnull",
            Operator::In => "in",
            Operator::NotIn => "notin",
            Operator::Between => "between",
            Operator::NotBetween => "notbetween",
        }
    }

    /// Case-insensitive keyword lookup, aliases included.
    pub fn from_keyword(keyword: &str) -> Option<Operator> {
        OPERATOR_KEYWORDS
            .get(keyword.to_ascii_lowercase().as_str())
            .copied()
    }

    pub fn arity(self) -> Arity {
        match self {
            Operator::IsNull | Operator::IsNotNull => Arity::Zero,
            Operator::Between | Operator::NotBetween => Arity::Two,
            Operator::In | Operator::NotIn => Arity::AtLeastOne,
            _ => Arity::One,
        }
    }

    /// Substring, prefix and suffix tests. Only valid on string values.
    pub fn is_text_match(self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith
        )
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::LessThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThanOrEqual
        )
    }
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Zero => count == 0,
            Arity::One => count == 1,
            Arity::Two => count == 2,
            Arity::AtLeastOne => count >= 1,
        }
    }
}

fn build_keyword_map() -> HashMap<&'static str, Operator> {
    let mut map: HashMap<&'static str, Operator> =
        Operator::ALL.iter().map(|op| (op.keyword(), *op)).collect();

    let aliases = [
        ("neq", Operator::NotEqual),
        ("ge", Operator::GreaterThanOrEqual),
        ("le", Operator::LessThanOrEqual),
        ("starts_with", Operator::StartsWith),
        ("ends_with", Operator::EndsWith),
        ("null", Operator::IsNull),
        ("is_null", Operator::IsNull),
        ("notnull", Operator::IsNotNull),
        ("is_not_null", Operator::IsNotNull),
        ("nin", Operator::NotIn),
        ("not_in", Operator::NotIn),
        ("not_between", Operator::NotBetween),
    ];
    map.extend(aliases);

    map
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Zero => write!(f, "no operands"),
            Arity::One => write!(f, "exactly one operand"),
            Arity::Two => write!(f, "exactly two operands"),
            Arity::AtLeastOne => write!(f, "at least one operand"),
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_keyword(s).ok_or_else(|| format!("unknown operator '{s}'"))
    }
}

impl TryFrom<String> for Operator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.keyword().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_keyword(op.keyword()), Some(op));
        }
    }

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(Operator::from_keyword("GTE"), Some(Operator::GreaterThanOrEqual));
        assert_eq!(Operator::from_keyword("StartsWith"), Some(Operator::StartsWith));
        assert_eq!(Operator::from_keyword("NIN"), Some(Operator::NotIn));
        assert_eq!(Operator::from_keyword("like"), None);
    }

    #[test]
    fn test_arity_table() {
        assert!(Operator::IsNull.arity().accepts(0));
        assert!(!Operator::IsNotNull.arity().accepts(1));
        assert!(Operator::Between.arity().accepts(2));
        assert!(!Operator::NotBetween.arity().accepts(3));
        assert!(Operator::In.arity().accepts(5));
        assert!(!Operator::NotIn.arity().accepts(0));
        assert!(Operator::Contains.arity().accepts(1));
        assert!(!Operator::Equal.arity().accepts(2));
    }

    #[test]
    fn test_operator_serde_uses_keyword() {
        let json = serde_json::to_string(&Operator::GreaterThanOrEqual).unwrap();
        assert_eq!(json, "\"gte\"");
        let op: Operator = serde_json::from_str("\"not_in\"").unwrap();
        assert_eq!(op, Operator::NotIn);
    }
}
