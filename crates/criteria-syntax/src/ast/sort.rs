use crate::{ast::path::ColumnPath, errors::SyntaxError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Accepts `asc`, `desc`, `ascending` and `descending` in any case.
    pub fn from_keyword(keyword: &str) -> Option<SortDirection> {
        match keyword.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    pub fn reversed(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// One sort key: column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortCriterion {
    pub column: ColumnPath,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(column: &str, direction: SortDirection) -> Result<Self, SyntaxError> {
        Ok(Self {
            column: ColumnPath::parse(column)?,
            direction,
        })
    }

    pub fn ascending(column: &str) -> Result<Self, SyntaxError> {
        Self::new(column, SortDirection::Ascending)
    }

    pub fn descending(column: &str) -> Result<Self, SyntaxError> {
        Self::new(column, SortDirection::Descending)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column, self.direction)
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortDirection::from_keyword(s).ok_or_else(|| format!("unknown sort direction '{s}'"))
    }
}
