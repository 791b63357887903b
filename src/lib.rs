//! cachewarm - batch prefetch coordination for cache warming.
//!
//! This library schedules batches of URL fetch-and-cache operations under a
//! concurrency bound, ahead of need (e.g. before a list is scrolled into
//! view), so that later lookups hit a warm cache. It tracks per-item and
//! per-batch outcome counts, deduplicates concurrent loads of the same URL,
//! supports cancellation at single-URL and whole-batch granularity, and
//! reports lifecycle and progress events.
//!
//! The actual fetching, decoding, and cache persistence belong to a
//! [`loader::ResourceLoader`] collaborator; the coordinator only decides
//! when each URL is fetched, how many run concurrently, in what order, and
//! what happens on success, failure, and cancel.
//!
//! # Example
//!
//! ```ignore
//! use cachewarm::{BatchCallbacks, CoordinatorConfig, PrefetchCoordinator};
//!
//! let coordinator = PrefetchCoordinator::new(my_loader, CoordinatorConfig::default());
//! let id = coordinator.submit(
//!     urls,
//!     None,
//!     BatchCallbacks::new()
//!         .on_progress(|update| tracing::debug!(?update, "warmed"))
//!         .on_completed(|summary| tracing::info!(?summary, "batch done")),
//! )?;
//! ```

pub mod batch;
pub mod coordinator;
pub mod error;
pub mod loader;
pub mod observer;
pub mod shared;

pub use batch::{
    BatchCallbacks, BatchId, BatchState, BatchSummary, ProgressUpdate, SlotStatus,
};
pub use coordinator::{
    CoordinatorConfig, CoordinatorStats, CoordinatorStatsSnapshot, OperationHandle,
    PrefetchCoordinator,
};
pub use error::SubmitError;
pub use loader::{
    LoadError, LoadOptions, LoadResult, Loaded, Priority, ResourceLoader, ResourceUrl,
};
pub use observer::PrefetchObserver;

/// Version of the cachewarm library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
