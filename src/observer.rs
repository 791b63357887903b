//! Coordinator-scope observation of prefetch events.
//!
//! Observers are the global counterpart to per-submission callbacks: one
//! registration receives events for every batch the coordinator processes.
//! Both mechanisms may fire for the same event.
//!
//! All methods have empty default bodies, so implementors override only what
//! they care about.

use crate::batch::{BatchId, BatchSummary, ProgressUpdate};
use crate::loader::{LoadError, ResourceUrl};

/// Receives lifecycle and progress events for every batch.
///
/// Implementations must be cheap and non-blocking: events are delivered
/// synchronously from the coordinator's event fan-out (outside its lock, so
/// re-entering the coordinator from an observer is allowed).
pub trait PrefetchObserver: Send + Sync {
    /// A batch was accepted; fires before any of its loads are admitted.
    fn batch_started(&self, _batch: BatchId) {}

    /// A URL was fetched into the cache.
    fn url_prefetched(&self, _update: &ProgressUpdate) {}

    /// A URL failed to load; the batch continues regardless.
    fn url_failed(&self, _update: &ProgressUpdate, _error: &LoadError) {}

    /// A URL was skipped or aborted by a cancel path.
    fn url_cancelled(&self, _batch: BatchId, _url: &ResourceUrl) {}

    /// A batch completed through normal processing.
    fn batch_finished(&self, _summary: BatchSummary) {}

    /// A batch completed because it was cancelled.
    fn batch_cancelled(&self, _summary: BatchSummary) {}
}
