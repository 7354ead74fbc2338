//! Bounded-concurrency helpers for fanning out independent API calls.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

async fn indexed<Fut: Future>(index: usize, fut: Fut) -> (usize, Fut::Output) {
    (index, fut.await)
}

/// Run `f` over every item with at most `max_concurrent` calls in flight.
///
/// Results are returned in input order regardless of completion order.
/// A `max_concurrent` of zero is treated as one.
///
/// # Example
///
/// ```ignore
/// let started = map_bounded(
///     issue_ids,
///     |id| async move { client.find_in_progress_at(&id).await },
///     8,
/// )
/// .await;
/// ```
pub async fn map_bounded<I, R, F, Fut>(items: Vec<I>, f: F, max_concurrent: usize) -> Vec<R>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = R>,
{
    if items.is_empty() {
        return Vec::new();
    }

    let total = items.len();
    let max_concurrent = max_concurrent.max(1);
    debug!(
        "Running {} requests with max {} concurrent",
        total, max_concurrent
    );

    let mut results: Vec<Option<R>> = (0..total).map(|_| None).collect();
    let mut futures = FuturesUnordered::new();
    let mut pending = items.into_iter().enumerate();

    // Seed initial batch up to max_concurrent
    for (index, item) in pending.by_ref().take(max_concurrent) {
        futures.push(indexed(index, f(item)));
    }

    // Keep the window full as requests complete
    while let Some((index, result)) = futures.next().await {
        results[index] = Some(result);

        if let Some((next_index, next_item)) = pending.next() {
            futures.push(indexed(next_index, f(next_item)));
        }
    }

    results.into_iter().flatten().collect()
}
