use crate::{
    ast::{
        criterion::{Combinator, FilterCriterion, Group},
        literal::Literal,
        operator::Operator,
        sort::{SortCriterion, SortDirection},
    },
    builder::{parse_filters, parse_sorts},
    errors::SyntaxError,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Ordered filter criteria, combined conjunctively at the top level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCollection {
    criteria: Vec<FilterCriterion>,
}

/// Ordered sort keys; the first is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortCollection {
    criteria: Vec<SortCriterion>,
}

impl FilterCollection {
    pub fn new(criteria: Vec<FilterCriterion>) -> Self {
        Self { criteria }
    }

    pub fn builder() -> FilterCollectionBuilder {
        FilterCollectionBuilder::default()
    }

    pub fn criteria(&self) -> &[FilterCriterion] {
        &self.criteria
    }

    pub fn into_criteria(self) -> Vec<FilterCriterion> {
        self.criteria
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterCriterion> {
        self.criteria.iter()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn push(&mut self, criterion: FilterCriterion) {
        self.criteria.push(criterion);
    }

    /// Re-checks arity and group shape, e.g. after deserializing.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        self.criteria.iter().try_for_each(FilterCriterion::validate)
    }

    /// Hex md5 digest of the canonical text.
    pub fn fingerprint(&self) -> String {
        format!("{:x}", md5::compute(self.to_string()))
    }
}

impl SortCollection {
    pub fn new(criteria: Vec<SortCriterion>) -> Self {
        Self { criteria }
    }

    pub fn builder() -> SortCollectionBuilder {
        SortCollectionBuilder::default()
    }

    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    pub fn into_criteria(self) -> Vec<SortCriterion> {
        self.criteria
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortCriterion> {
        self.criteria.iter()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn push(&mut self, criterion: SortCriterion) {
        self.criteria.push(criterion);
    }

    pub fn fingerprint(&self) -> String {
        format!("{:x}", md5::compute(self.to_string()))
    }
}

impl fmt::Display for FilterCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.criteria)
    }
}

impl fmt::Display for SortCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.criteria)
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl FromStr for FilterCollection {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_filters(s)
    }
}

impl FromStr for SortCollection {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sorts(s)
    }
}

impl From<Vec<FilterCriterion>> for FilterCollection {
    fn from(criteria: Vec<FilterCriterion>) -> Self {
        Self::new(criteria)
    }
}

impl From<Vec<SortCriterion>> for SortCollection {
    fn from(criteria: Vec<SortCriterion>) -> Self {
        Self::new(criteria)
    }
}

impl FromIterator<FilterCriterion> for FilterCollection {
    fn from_iter<T: IntoIterator<Item = FilterCriterion>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FromIterator<SortCriterion> for SortCollection {
    fn from_iter<T: IntoIterator<Item = SortCriterion>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for FilterCollection {
    type Item = FilterCriterion;
    type IntoIter = std::vec::IntoIter<FilterCriterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.into_iter()
    }
}

impl<'a> IntoIterator for &'a FilterCollection {
    type Item = &'a FilterCriterion;
    type IntoIter = std::slice::Iter<'a, FilterCriterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.iter()
    }
}

impl IntoIterator for SortCollection {
    type Item = SortCriterion;
    type IntoIter = std::vec::IntoIter<SortCriterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.into_iter()
    }
}

impl<'a> IntoIterator for &'a SortCollection {
    type Item = &'a SortCriterion;
    type IntoIter = std::slice::Iter<'a, SortCriterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.iter()
    }
}

/// Fluent construction of a [`FilterCollection`].
///
/// The first invalid criterion is remembered and returned by [`build`](Self::build);
/// later calls are still accepted so chains read naturally.
#[derive(Debug, Default)]
pub struct FilterCollectionBuilder {
    criteria: Vec<FilterCriterion>,
    error: Option<SyntaxError>,
}

impl FilterCollectionBuilder {
    pub fn filter<I, L>(self, column: &str, operator: Operator, operands: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        let result = FilterCriterion::condition(column, operator, operands);
        self.push_result(result)
    }

    pub fn eq(self, column: &str, value: impl Into<Literal>) -> Self {
        self.filter(column, Operator::Equal, [value.into()])
    }

    pub fn is_null(self, column: &str) -> Self {
        self.filter(column, Operator::IsNull, Vec::<Literal>::new())
    }

    pub fn between(self, column: &str, lower: impl Into<Literal>, upper: impl Into<Literal>) -> Self {
        self.filter(column, Operator::Between, [lower.into(), upper.into()])
    }

    pub fn criterion(self, criterion: FilterCriterion) -> Self {
        let result = criterion.validate().map(|_| criterion);
        self.push_result(result)
    }

    pub fn and(self, group: impl FnOnce(FilterCollectionBuilder) -> FilterCollectionBuilder) -> Self {
        self.group(Combinator::And, group)
    }

    pub fn or(self, group: impl FnOnce(FilterCollectionBuilder) -> FilterCollectionBuilder) -> Self {
        self.group(Combinator::Or, group)
    }

    /// The closure must add exactly one criterion.
    pub fn not(self, group: impl FnOnce(FilterCollectionBuilder) -> FilterCollectionBuilder) -> Self {
        self.group(Combinator::Not, group)
    }

    fn group(
        self,
        combinator: Combinator,
        group: impl FnOnce(FilterCollectionBuilder) -> FilterCollectionBuilder,
    ) -> Self {
        let inner = group(FilterCollectionBuilder::default());
        let result = match inner.error {
            Some(err) => Err(err),
            None => Group::new(combinator, inner.criteria).map(FilterCriterion::Group),
        };
        self.push_result(result)
    }

    fn push_result(mut self, result: Result<FilterCriterion, SyntaxError>) -> Self {
        match result {
            Ok(criterion) => self.criteria.push(criterion),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
        self
    }

    pub fn build(self) -> Result<FilterCollection, SyntaxError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(FilterCollection::new(self.criteria)),
        }
    }
}

/// Fluent construction of a [`SortCollection`].
#[derive(Debug, Default)]
pub struct SortCollectionBuilder {
    criteria: Vec<SortCriterion>,
    error: Option<SyntaxError>,
}

impl SortCollectionBuilder {
    pub fn asc(self, column: &str) -> Self {
        self.sort(column, SortDirection::Ascending)
    }

    pub fn desc(self, column: &str) -> Self {
        self.sort(column, SortDirection::Descending)
    }

    pub fn sort(mut self, column: &str, direction: SortDirection) -> Self {
        match SortCriterion::new(column, direction) {
            Ok(criterion) => self.criteria.push(criterion),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
        self
    }

    pub fn build(self) -> Result<SortCollection, SyntaxError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(SortCollection::new(self.criteria)),
        }
    }
}
