//! Process-wide coordinator instance.
//!
//! The conventional deployment is one coordinator per process, installed
//! once at startup and looked up wherever prefetching is triggered. Passing
//! the coordinator explicitly is preferred where feasible; this module
//! exists for callers that genuinely need ambient access.
//!
//! Initialization is explicit - there is no hidden construction on first
//! use, because a coordinator cannot conjure its [`ResourceLoader`]
//! collaborator. For test isolation, [`PrefetchCoordinator::cancel_all`]
//! brings the shared instance back to a quiescent state.
//!
//! [`ResourceLoader`]: crate::loader::ResourceLoader
//! [`PrefetchCoordinator::cancel_all`]: crate::coordinator::PrefetchCoordinator::cancel_all

use std::sync::{Arc, OnceLock};

use crate::coordinator::PrefetchCoordinator;

static SHARED: OnceLock<Arc<PrefetchCoordinator>> = OnceLock::new();

/// Installs the process-wide coordinator.
///
/// # Errors
///
/// Returns the rejected coordinator if one was already installed; the
/// original instance stays in place.
pub fn init_shared(coordinator: Arc<PrefetchCoordinator>) -> Result<(), Arc<PrefetchCoordinator>> {
    SHARED.set(coordinator)
}

/// Returns the process-wide coordinator, if one has been installed.
pub fn shared() -> Option<Arc<PrefetchCoordinator>> {
    SHARED.get().map(Arc::clone)
}
