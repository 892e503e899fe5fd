use crate::{
    ast::{
        collection::{FilterCollection, SortCollection},
        criterion::{Combinator, Condition, FilterCriterion, Group},
        literal::Literal,
        operator::Operator,
        path::ColumnPath,
        sort::{SortCriterion, SortDirection},
    },
    errors::{FILTER_PATTERN, SORT_PATTERN, SyntaxError},
    escape::{trim_unescaped, unescape},
    split::{call_name, split, split_call, split_once_top_level},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Knobs for parsing untrusted criterion text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Deepest allowed group nesting.
    pub max_depth: usize,
    /// Accept `column:value` as `column:eq(value)`.
    pub allow_simplified_equality: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 32,
            allow_simplified_equality: true,
        }
    }
}

/// Parse comma-separated filter criteria with default options.
pub fn parse_filters(input: &str) -> ParseResult<FilterCollection> {
    parse_filters_with(input, &ParseOptions::default())
}

pub fn parse_filters_with(input: &str, options: &ParseOptions) -> ParseResult<FilterCollection> {
    let segments = split(input, ',');
    debug!(segments = segments.len(), "Parsing filter criteria");

    let parser = FilterParser { input, options };
    segments
        .into_iter()
        .map(|segment| parser.criterion(segment, 0))
        .collect()
}

/// Parse comma-separated sort criteria with default options.
pub fn parse_sorts(input: &str) -> ParseResult<SortCollection> {
    parse_sorts_with(input, &ParseOptions::default())
}

/// Sort text has no nesting; the options are accepted for symmetry with filters.
pub fn parse_sorts_with(input: &str, _options: &ParseOptions) -> ParseResult<SortCollection> {
    let segments = split(input, ',');
    debug!(segments = segments.len(), "Parsing sort criteria");

    segments
        .into_iter()
        .map(|segment| parse_sort(input, segment))
        .collect()
}

fn parse_sort(input: &str, segment: &str) -> ParseResult<SortCriterion> {
    let segment = trim_unescaped(segment);
    if segment.is_empty() {
        return Err(SyntaxError::EmptyCriterion {
            input: input.to_string(),
        });
    }

    let (column, direction) =
        split_once_top_level(segment, ':').ok_or_else(|| SyntaxError::Malformed {
            segment: segment.to_string(),
            expected: SORT_PATTERN,
        })?;

    let direction = direction.trim();
    let direction =
        SortDirection::from_keyword(direction).ok_or_else(|| SyntaxError::UnknownDirection {
            segment: segment.to_string(),
            direction: direction.to_string(),
        })?;

    Ok(SortCriterion {
        column: ColumnPath::parse(column.trim())?,
        direction,
    })
}

struct FilterParser<'a> {
    input: &'a str,
    options: &'a ParseOptions,
}

impl FilterParser<'_> {
    fn criterion(&self, segment: &str, depth: usize) -> ParseResult<FilterCriterion> {
        let segment = trim_unescaped(segment);
        if segment.is_empty() {
            return Err(SyntaxError::EmptyCriterion {
                input: self.input.to_string(),
            });
        }

        if let Some((name, args)) = split_call(segment) {
            if let Some(combinator) = Combinator::from_keyword(name) {
                return self.group(segment, combinator, args, depth);
            }
        }

        self.condition(segment).map(FilterCriterion::Condition)
    }

    fn group(
        &self,
        segment: &str,
        combinator: Combinator,
        args: &str,
        depth: usize,
    ) -> ParseResult<FilterCriterion> {
        if depth >= self.options.max_depth {
            return Err(SyntaxError::TooDeep {
                segment: segment.to_string(),
                max_depth: self.options.max_depth,
            });
        }

        let children = split(args, ',')
            .into_iter()
            .map(|child| self.criterion(child, depth + 1))
            .collect::<ParseResult<Vec<_>>>()?;
        trace!(%combinator, children = children.len(), depth, "Parsed group");

        match (combinator, children.len()) {
            (_, 0) => Err(SyntaxError::EmptyGroup {
                segment: segment.to_string(),
            }),
            (Combinator::Not, found) if found != 1 => Err(SyntaxError::NotArity {
                segment: segment.to_string(),
                found,
            }),
            _ => Ok(FilterCriterion::Group(Group {
                combinator,
                children,
            })),
        }
    }

    fn condition(&self, segment: &str) -> ParseResult<Condition> {
        let (column, rhs) =
            split_once_top_level(segment, ':').ok_or_else(|| SyntaxError::Malformed {
                segment: segment.to_string(),
                expected: FILTER_PATTERN,
            })?;

        let column = ColumnPath::parse(column.trim())?;
        let rhs = trim_unescaped(rhs);

        if let Some((name, args)) = split_call(rhs) {
            let operator =
                Operator::from_keyword(name).ok_or_else(|| SyntaxError::UnknownOperator {
                    segment: segment.to_string(),
                    column: column.to_string(),
                    operator: name.to_string(),
                })?;
            let operands = operands(segment, args)?;

            let expected = operator.arity();
            if !expected.accepts(operands.len()) {
                return Err(SyntaxError::Arity {
                    segment: segment.to_string(),
                    operator,
                    expected,
                    found: operands.len(),
                });
            }

            trace!(%column, %operator, operands = operands.len(), "Parsed condition");
            return Ok(Condition {
                column,
                operator,
                operands,
            });
        }

        if call_name(rhs).is_some() {
            return Err(SyntaxError::Malformed {
                segment: segment.to_string(),
                expected: FILTER_PATTERN,
            });
        }

        self.simplified_equality(segment, column, rhs)
    }

    fn simplified_equality(
        &self,
        segment: &str,
        column: ColumnPath,
        rhs: &str,
    ) -> ParseResult<Condition> {
        if rhs.is_empty() {
            return Err(SyntaxError::Malformed {
                segment: segment.to_string(),
                expected: FILTER_PATTERN,
            });
        }
        if !self.options.allow_simplified_equality {
            return Err(SyntaxError::SimplifiedEqualityDisabled {
                segment: segment.to_string(),
            });
        }

        trace!(%column, "Parsed simplified equality");
        Ok(Condition {
            column,
            operator: Operator::Equal,
            operands: vec![Literal::Text(unescape(rhs))],
        })
    }
}

fn operands(segment: &str, args: &str) -> ParseResult<Vec<Literal>> {
    let parts = split(args, ',');
    if parts.len() > 1 && parts.iter().any(|part| trim_unescaped(part).is_empty()) {
        return Err(SyntaxError::Malformed {
            segment: segment.to_string(),
            expected: "non-empty operands separated by ','",
        });
    }

    Ok(parts
        .into_iter()
        .map(|part| Literal::Text(unescape(trim_unescaped(part))))
        .collect())
}
