use crate::{
    ast::{
        literal::Literal,
        operator::Operator,
        path::ColumnPath,
    },
    errors::SyntaxError,
    escape::escape_operand,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Leaf filter: `column operator operands`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: ColumnPath,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<Literal>,
}

/// Logical combinator of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    Or,
    Not,
}

/// Logical group of child criteria. `Not` groups have exactly one child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub combinator: Combinator,
    pub children: Vec<FilterCriterion>,
}

/// One filter rule: a leaf condition or a logical group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterCriterion {
    Condition(Condition),
    Group(Group),
}

impl Condition {
    pub fn new<I, L>(column: &str, operator: Operator, operands: I) -> Result<Self, SyntaxError>
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        let condition = Self {
            column: ColumnPath::parse(column)?,
            operator,
            operands: operands.into_iter().map(Into::into).collect(),
        };
        condition.validate()?;
        Ok(condition)
    }

    /// Checks the operand count against the operator's arity.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        let arity = self.operator.arity();
        if arity.accepts(self.operands.len()) {
            Ok(())
        } else {
            Err(SyntaxError::Arity {
                segment: self.to_string(),
                operator: self.operator,
                expected: arity,
                found: self.operands.len(),
            })
        }
    }
}

impl Combinator {
    pub fn keyword(self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
            Combinator::Not => "not",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Combinator> {
        match keyword.to_ascii_lowercase().as_str() {
            "and" => Some(Combinator::And),
            "or" => Some(Combinator::Or),
            "not" => Some(Combinator::Not),
            _ => None,
        }
    }
}

impl Group {
    pub fn new(combinator: Combinator, children: Vec<FilterCriterion>) -> Result<Self, SyntaxError> {
        let group = Self {
            combinator,
            children,
        };
        group.check_shape()?;
        Ok(group)
    }

    fn check_shape(&self) -> Result<(), SyntaxError> {
        match (self.combinator, self.children.len()) {
            (_, 0) => Err(SyntaxError::EmptyGroup {
                segment: self.to_string(),
            }),
            (Combinator::Not, 1) => Ok(()),
            (Combinator::Not, found) => Err(SyntaxError::NotArity {
                segment: self.to_string(),
                found,
            }),
            _ => Ok(()),
        }
    }

    /// Checks the group shape and every descendant.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        self.check_shape()?;
        self.children.iter().try_for_each(FilterCriterion::validate)
    }
}

impl FilterCriterion {
    pub fn condition<I, L>(column: &str, operator: Operator, operands: I) -> Result<Self, SyntaxError>
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        Condition::new(column, operator, operands).map(FilterCriterion::Condition)
    }

    /// `column:eq(value)`.
    pub fn eq(column: &str, value: impl Into<Literal>) -> Result<Self, SyntaxError> {
        Self::condition(column, Operator::Equal, [value.into()])
    }

    pub fn and(children: Vec<FilterCriterion>) -> Result<Self, SyntaxError> {
        Group::new(Combinator::And, children).map(FilterCriterion::Group)
    }

    pub fn or(children: Vec<FilterCriterion>) -> Result<Self, SyntaxError> {
        Group::new(Combinator::Or, children).map(FilterCriterion::Group)
    }

    /// Negates `child`, which must itself be valid.
    pub fn not(child: FilterCriterion) -> Result<Self, SyntaxError> {
        child.validate()?;
        Group::new(Combinator::Not, vec![child]).map(FilterCriterion::Group)
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            FilterCriterion::Condition(c) => Some(c),
            FilterCriterion::Group(_) => None,
        }
    }

    pub fn validate(&self) -> Result<(), SyntaxError> {
        match self {
            FilterCriterion::Condition(c) => c.validate(),
            FilterCriterion::Group(g) => g.validate(),
        }
    }
}

impl From<Condition> for FilterCriterion {
    fn from(condition: Condition) -> Self {
        FilterCriterion::Condition(condition)
    }
}

impl From<Group> for FilterCriterion {
    fn from(group: Group) -> Self {
        FilterCriterion::Group(group)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}(", self.column, self.operator)?;
        for (idx, operand) in self.operands.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            f.write_str(&escape_operand(&operand.to_text()))?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.combinator)?;
        for (idx, child) in self.children.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for FilterCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterCriterion::Condition(c) => write!(f, "{c}"),
            FilterCriterion::Group(g) => write!(f, "{g}"),
        }
    }
}

impl FromStr for FilterCriterion {
    type Err = SyntaxError;

    /// Parses exactly one criterion.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let collection = crate::builder::parse_filters(s)?;
        let mut criteria = collection.into_criteria();
        match criteria.len() {
            1 => Ok(criteria.remove(0)),
            0 => Err(SyntaxError::EmptyCriterion {
                input: s.to_string(),
            }),
            _ => Err(SyntaxError::Malformed {
                segment: s.to_string(),
                expected: "a single criterion",
            }),
        }
    }
}
