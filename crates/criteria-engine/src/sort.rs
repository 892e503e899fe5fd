//! Builds record comparators from sort criteria.

use crate::error::Result;
use criteria_syntax::{SortCollection, SortDirection, parse_sorts};
use model::shape::{accessor::Accessor, resolver::PathResolver};
use std::{cmp::Ordering, fmt, sync::Arc};
use tracing::debug;

struct SortKey<R> {
    accessor: Accessor<R>,
    direction: SortDirection,
}

impl<R: 'static> SortKey<R> {
    fn compare(&self, a: &R, b: &R) -> Ordering {
        match (self.accessor.read(a), self.accessor.read(b)) {
            (None, None) => Ordering::Equal,
            // Absent first, whatever the direction.
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => {
                let ordering = self.accessor.kind().sort_order(&a, &b);
                match self.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
        }
    }
}

/// Multi-key record comparator. With no keys every pair compares equal.
pub struct Comparator<R> {
    keys: Arc<Vec<SortKey<R>>>,
}

impl<R> Clone for Comparator<R> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<R> fmt::Debug for Comparator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .keys
            .iter()
            .map(|key| format!("{}:{}", key.accessor.path(), key.direction.keyword()))
            .collect();
        f.debug_struct("Comparator").field("keys", &keys).finish()
    }
}

impl<R: 'static> Comparator<R> {
    pub fn unordered() -> Self {
        Self {
            keys: Arc::new(Vec::new()),
        }
    }

    pub fn is_unordered(&self) -> bool {
        self.keys.is_empty()
    }

    /// First non-equal key decides.
    pub fn compare(&self, a: &R, b: &R) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Stable in-place sort.
    pub fn sort(&self, records: &mut [R]) {
        if !self.is_unordered() {
            records.sort_by(|a, b| self.compare(a, b));
        }
    }

    /// Stable in-place sort of borrowed records.
    pub fn sort_refs(&self, records: &mut [&R]) {
        if !self.is_unordered() {
            records.sort_by(|a, b| self.compare(a, b));
        }
    }
}

pub fn build_comparator<R: 'static>(
    sorts: &SortCollection,
    resolver: &PathResolver<R>,
) -> Result<Comparator<R>> {
    let keys = sorts
        .iter()
        .map(|criterion| {
            Ok(SortKey {
                accessor: resolver.resolve(&criterion.column)?,
                direction: criterion.direction,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(keys = keys.len(), sorts = %sorts, "Built comparator");
    Ok(Comparator {
        keys: Arc::new(keys),
    })
}

/// Parses sort text and builds it in one step.
pub fn build_comparator_str<R: 'static>(
    text: &str,
    resolver: &PathResolver<R>,
) -> Result<Comparator<R>> {
    let sorts = parse_sorts(text)?;
    build_comparator(&sorts, resolver)
}
