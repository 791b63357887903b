//! Resource loader abstraction for fetch-and-cache operations.
//!
//! This module provides the [`ResourceLoader`] trait - the abstraction the
//! coordinator uses to fetch one URL into the cache. The coordinator doesn't
//! need to know about transports, decoders, or cache tiers; it only submits
//! loads and observes their outcomes.
//!
//! # Design
//!
//! - The coordinator depends on the trait, never on a concrete loader.
//! - Each load carries a `CancellationToken`; cancelling it is a best-effort,
//!   idempotent request for early termination.
//! - Results arrive on a `oneshot` receiver, so loaders are free to complete
//!   on any thread or task.
//!
//! # Example
//!
//! ```ignore
//! use cachewarm::loader::{LoadOptions, ResourceLoader, ResourceUrl};
//!
//! async fn warm_one(loader: &dyn ResourceLoader, url: ResourceUrl) -> bool {
//!     let cancellation = CancellationToken::new();
//!     let rx = loader.load(url, LoadOptions::default(), cancellation);
//!     matches!(rx.await, Ok(Ok(_)))
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Opaque resource locator.
///
/// The coordinator never interprets the contents; it only needs equality and
/// hashing for queueing and in-flight deduplication. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceUrl(Arc<str>);

impl ResourceUrl {
    /// Creates a URL from anything string-like.
    pub fn new(url: impl AsRef<str>) -> Self {
        Self(Arc::from(url.as_ref()))
    }

    /// Returns the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceUrl {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for ResourceUrl {
    fn from(url: String) -> Self {
        Self(Arc::from(url))
    }
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceUrl({})", self.0)
    }
}

/// Priority hint passed through to the loader.
///
/// Prefetch traffic defaults to [`Priority::Low`] so it never starves
/// foreground requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    /// Background work; yields to everything else.
    #[default]
    Low,
    /// Regular traffic.
    Normal,
    /// Latency-sensitive traffic.
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Normal => write!(f, "Normal"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Per-load configuration passed through to the loader unchanged.
///
/// The coordinator treats this as an opaque bag; only the loader gives the
/// fields meaning.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Scheduling hint for the loader.
    pub priority: Priority,
}

impl LoadOptions {
    /// Options with the given priority hint.
    pub fn with_priority(priority: Priority) -> Self {
        Self { priority }
    }
}

/// Successful load outcome: the artifact is now in the cache.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    /// Size of the cached artifact in bytes, if the loader reports it.
    pub bytes: usize,
    /// True if the artifact was already cached and no fetch was needed.
    pub cache_hit: bool,
}

/// A load that did not produce a cached artifact.
///
/// Reported through progress events with `success == false`; a failed URL
/// never aborts its batch.
#[derive(Debug, Clone, Error)]
#[error("failed to load {url}: {reason}")]
pub struct LoadError {
    /// The URL that failed.
    pub url: ResourceUrl,
    /// Loader-supplied description of the failure.
    pub reason: String,
}

impl LoadError {
    /// Creates a load error for the given URL.
    pub fn new(url: ResourceUrl, reason: impl Into<String>) -> Self {
        Self {
            url,
            reason: reason.into(),
        }
    }
}

/// Outcome of a single load.
pub type LoadResult = Result<Loaded, LoadError>;

/// Fetches one URL into the cache.
///
/// Implementations own transport, retry, decoding, and cache persistence.
/// The returned receiver resolves with the outcome; if the sender is dropped
/// without resolving, the coordinator records the load as failed.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so the coordinator can be
/// shared across tasks.
pub trait ResourceLoader: Send + Sync + 'static {
    /// Starts loading `url` into the cache.
    ///
    /// Must not block: the actual work runs asynchronously and the outcome is
    /// delivered through the returned receiver. `cancellation` is the
    /// coordinator's abort request channel - honoring it is best-effort.
    fn load(
        &self,
        url: ResourceUrl,
        options: LoadOptions,
        cancellation: CancellationToken,
    ) -> oneshot::Receiver<LoadResult>;
}
