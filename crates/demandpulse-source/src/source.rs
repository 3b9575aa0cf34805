use async_trait::async_trait;

use demandpulse_core::{Post, PostQuery};

use crate::types::{BatchControl, FetchOutcome};

/// Per-batch callback. Receives each delivered batch and decides whether the
/// fetch continues; this is where the aggregator's cancellation check lives.
pub type BatchHandler<'a> = &'a mut (dyn FnMut(&[Post]) -> BatchControl + Send);

/// The post-search capability the aggregator depends on.
///
/// Implementations stream posts matching the query in batches, invoking
/// `on_batch` once per batch, and return everything accumulated regardless of
/// whether the fetch completed, was stopped, or failed partway.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch(&self, query: &PostQuery, on_batch: BatchHandler<'_>) -> FetchOutcome;
}
