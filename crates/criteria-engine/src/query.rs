use crate::{
    batch::filter_in_batches,
    error::{Cancelled, Result},
    filter::{Predicate, build_predicate, build_predicate_str},
    sort::{Comparator, build_comparator, build_comparator_str},
};
use criteria_syntax::{FilterCollection, SortCollection};
use model::shape::resolver::PathResolver;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// A predicate and a comparator built against the same shape.
pub struct CompiledQuery<R> {
    pub predicate: Predicate<R>,
    pub comparator: Comparator<R>,
}

impl<R> Clone for CompiledQuery<R> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<R> fmt::Debug for CompiledQuery<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledQuery")
            .field("predicate", &self.predicate)
            .field("comparator", &self.comparator)
            .finish()
    }
}

impl<R: 'static> CompiledQuery<R> {
    pub fn compile(
        filters: &FilterCollection,
        sorts: &SortCollection,
        resolver: &PathResolver<R>,
    ) -> Result<Self> {
        Ok(Self {
            predicate: build_predicate(filters, resolver)?,
            comparator: build_comparator(sorts, resolver)?,
        })
    }

    pub fn compile_str(filters: &str, sorts: &str, resolver: &PathResolver<R>) -> Result<Self> {
        Ok(Self {
            predicate: build_predicate_str(filters, resolver)?,
            comparator: build_comparator_str(sorts, resolver)?,
        })
    }

    /// Matching records in sort order.
    pub fn apply<'a>(&self, records: &'a [R]) -> Vec<&'a R> {
        let mut matched: Vec<&R> = self.predicate.filter(records).collect();
        self.comparator.sort_refs(&mut matched);
        matched
    }

    /// Like [`apply`](Self::apply), checking `token` between batches while filtering.
    pub fn apply_cancellable<'a>(
        &self,
        records: &'a [R],
        batch_size: usize,
        token: &CancellationToken,
    ) -> std::result::Result<Vec<&'a R>, Cancelled> {
        let mut matched = filter_in_batches(records, &self.predicate, batch_size, token)?;
        self.comparator.sort_refs(&mut matched);
        Ok(matched)
    }
}
