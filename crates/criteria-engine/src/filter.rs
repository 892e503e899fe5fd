//! Builds record predicates from filter criteria.
//!
//! Operands are coerced to the kind of the resolved column once, at build time, so
//! evaluation only reads values and compares them.

use crate::error::{BuildError, Result};
use criteria_syntax::{
    Combinator, Condition, FilterCollection, FilterCriterion, Literal, Operator, parse_filters,
};
use model::{
    core::{coercion::coerce_literal, kind::ValueKind, value::Value},
    shape::{accessor::Accessor, resolver::PathResolver},
};
use std::{cmp::Ordering, fmt, sync::Arc};
use tracing::{debug, trace};

/// A compiled filter expression over records of type `R`.
enum FilterExpr<R> {
    Leaf { accessor: Accessor<R>, test: Test },
    And(Vec<FilterExpr<R>>),
    Or(Vec<FilterExpr<R>>),
    Not(Box<FilterExpr<R>>),
}

/// What a leaf checks once the value is read.
#[derive(Debug, Clone)]
enum Test {
    IsNull,
    IsNotNull,
    Compare { operator: Operator, operand: Value },
    Text { operator: Operator, operand: String },
    Membership { values: Vec<Value>, negate: bool },
    Range { lower: Value, upper: Value, negate: bool },
}

impl Test {
    fn check(&self, kind: &ValueKind, actual: Option<&Value>) -> bool {
        let Some(actual) = actual else {
            return matches!(self, Test::IsNull);
        };

        match self {
            Test::IsNull => false,
            Test::IsNotNull => true,
            Test::Compare { operator, operand } => {
                let ordering = kind.compare(actual, operand);
                match operator {
                    Operator::Equal => ordering == Some(Ordering::Equal),
                    Operator::NotEqual => ordering != Some(Ordering::Equal),
                    Operator::GreaterThan => ordering == Some(Ordering::Greater),
                    Operator::GreaterThanOrEqual => {
                        matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
                    }
                    Operator::LessThan => ordering == Some(Ordering::Less),
                    Operator::LessThanOrEqual => {
                        matches!(ordering, Some(Ordering::Less | Ordering::Equal))
                    }
                    _ => false,
                }
            }
            Test::Text { operator, operand } => {
                let Some(text) = actual.as_str() else {
                    return false;
                };
                match operator {
                    Operator::Contains => text.contains(operand.as_str()),
                    Operator::StartsWith => text.starts_with(operand.as_str()),
                    Operator::EndsWith => text.ends_with(operand.as_str()),
                    _ => false,
                }
            }
            Test::Membership { values, negate } => {
                values.iter().any(|v| kind.equal(actual, v)) != *negate
            }
            Test::Range {
                lower,
                upper,
                negate,
            } => {
                let above = matches!(
                    kind.compare(actual, lower),
                    Some(Ordering::Greater | Ordering::Equal)
                );
                let below = matches!(
                    kind.compare(actual, upper),
                    Some(Ordering::Less | Ordering::Equal)
                );
                (above && below) != *negate
            }
        }
    }
}

impl<R: 'static> FilterExpr<R> {
    fn eval(&self, record: &R) -> bool {
        match self {
            FilterExpr::Leaf { accessor, test } => {
                let value = accessor.read(record);
                test.check(accessor.kind(), value.as_ref())
            }
            FilterExpr::And(children) => children.iter().all(|c| c.eval(record)),
            FilterExpr::Or(children) => children.iter().any(|c| c.eval(record)),
            FilterExpr::Not(child) => !child.eval(record),
        }
    }
}

/// A record predicate. The empty predicate accepts every record.
pub struct Predicate<R> {
    expr: Option<Arc<FilterExpr<R>>>,
}

impl<R> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        Self {
            expr: self.expr.clone(),
        }
    }
}

impl<R> fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("always", &self.expr.is_none())
            .finish_non_exhaustive()
    }
}

impl<R: 'static> Predicate<R> {
    pub fn always() -> Self {
        Self { expr: None }
    }

    pub fn is_always(&self) -> bool {
        self.expr.is_none()
    }

    pub fn test(&self, record: &R) -> bool {
        match &self.expr {
            Some(expr) => expr.eval(record),
            None => true,
        }
    }

    /// Keeps the records that pass, in input order.
    pub fn filter<'r, I>(&self, records: I) -> impl Iterator<Item = &'r R>
    where
        I: IntoIterator<Item = &'r R>,
    {
        records.into_iter().filter(move |record| self.test(record))
    }
}

/// Builds a predicate; top-level criteria are combined with AND.
pub fn build_predicate<R: 'static>(
    filters: &FilterCollection,
    resolver: &PathResolver<R>,
) -> Result<Predicate<R>> {
    filters.validate()?;

    if filters.is_empty() {
        debug!("No filter criteria, predicate accepts every record");
        return Ok(Predicate::always());
    }

    let mut children = filters
        .iter()
        .map(|criterion| compile_criterion(criterion, resolver))
        .collect::<Result<Vec<_>>>()?;

    let expr = if children.len() == 1 {
        children.remove(0)
    } else {
        FilterExpr::And(children)
    };

    debug!(
        criteria = filters.len(),
        fingerprint = %filters.fingerprint(),
        shape = resolver.shape().name(),
        "Built predicate"
    );
    Ok(Predicate {
        expr: Some(Arc::new(expr)),
    })
}

/// Parses filter text and builds it in one step.
pub fn build_predicate_str<R: 'static>(
    text: &str,
    resolver: &PathResolver<R>,
) -> Result<Predicate<R>> {
    let filters = parse_filters(text)?;
    build_predicate(&filters, resolver)
}

fn compile_criterion<R: 'static>(
    criterion: &FilterCriterion,
    resolver: &PathResolver<R>,
) -> Result<FilterExpr<R>> {
    match criterion {
        FilterCriterion::Condition(condition) => compile_condition(condition, resolver),
        FilterCriterion::Group(group) => {
            let mut children = group
                .children
                .iter()
                .map(|child| compile_criterion(child, resolver))
                .collect::<Result<Vec<_>>>()?;

            Ok(match group.combinator {
                Combinator::And => FilterExpr::And(children),
                Combinator::Or => FilterExpr::Or(children),
                // Validation guarantees exactly one child.
                Combinator::Not => FilterExpr::Not(Box::new(children.remove(0))),
            })
        }
    }
}

fn compile_condition<R: 'static>(
    condition: &Condition,
    resolver: &PathResolver<R>,
) -> Result<FilterExpr<R>> {
    let accessor = resolver.resolve(&condition.column)?;
    let kind = accessor.kind();
    let column = condition.column.to_string();
    let operator = condition.operator;

    let test = match operator {
        Operator::IsNull => Test::IsNull,
        Operator::IsNotNull => Test::IsNotNull,
        Operator::Equal
        | Operator::NotEqual
        | Operator::GreaterThan
        | Operator::GreaterThanOrEqual
        | Operator::LessThan
        | Operator::LessThanOrEqual => Test::Compare {
            operator,
            operand: operand(&column, kind, &condition.operands[0])?,
        },
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            if *kind != ValueKind::String {
                return Err(BuildError::TypeMismatch {
                    column,
                    operator,
                    kind: kind.clone(),
                });
            }
            Test::Text {
                operator,
                operand: condition.operands[0].to_text().into_owned(),
            }
        }
        Operator::In | Operator::NotIn => Test::Membership {
            values: condition
                .operands
                .iter()
                .map(|literal| operand(&column, kind, literal))
                .collect::<Result<Vec<_>>>()?,
            negate: operator == Operator::NotIn,
        },
        Operator::Between | Operator::NotBetween => {
            let lower = operand(&column, kind, &condition.operands[0])?;
            let upper = operand(&column, kind, &condition.operands[1])?;
            if kind.compare(&lower, &upper) == Some(Ordering::Greater) {
                return Err(BuildError::InvalidRange {
                    column,
                    lower: condition.operands[0].to_text().into_owned(),
                    upper: condition.operands[1].to_text().into_owned(),
                });
            }
            Test::Range {
                lower,
                upper,
                negate: operator == Operator::NotBetween,
            }
        }
    };

    trace!(criterion = %condition, kind = %kind, "Compiled filter condition");
    Ok(FilterExpr::Leaf { accessor, test })
}

fn operand(column: &str, kind: &ValueKind, literal: &Literal) -> Result<Value> {
    coerce_literal(literal, kind).map_err(|err| BuildError::InvalidOperand {
        column: column.to_string(),
        kind: err.kind,
        text: err.text,
    })
}
