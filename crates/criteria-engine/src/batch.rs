use crate::{error::Cancelled, filter::Predicate};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Filters `records` in batches of `batch_size`, checking `token` before each batch.
///
/// A batch that has started always runs to completion. A zero batch size is treated as
/// one.
pub fn filter_in_batches<'a, R: 'static>(
    records: &'a [R],
    predicate: &Predicate<R>,
    batch_size: usize,
    token: &CancellationToken,
) -> Result<Vec<&'a R>, Cancelled> {
    let mut matched = Vec::new();
    let mut processed = 0;

    for batch in records.chunks(batch_size.max(1)) {
        if token.is_cancelled() {
            info!(processed, total = records.len(), "Filtering cancelled");
            return Err(Cancelled { processed });
        }

        matched.extend(batch.iter().filter(|record| predicate.test(record)));
        processed += batch.len();
        debug!(processed, matched = matched.len(), "Filtered batch");
    }

    Ok(matched)
}
