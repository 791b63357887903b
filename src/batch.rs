//! Batch and slot state tracking.
//!
//! A [`Batch`] is an ordered group of URLs submitted together; each URL gets
//! one [`FetchSlot`] carrying its status and options. Batches keep two
//! monotonic counters: `finished_count` (slots that ran to success or
//! failure) and `skipped_count` (slots that were skipped or cancelled).
//!
//! Accounting invariant, maintained after every transition:
//!
//! ```text
//! finished_count + skipped_count + open slots == total slots
//! ```
//!
//! where "open" means `Pending` or `Active`. A batch becomes terminal exactly
//! once, the instant its last slot leaves the open set.

use std::fmt;
use std::sync::Arc;

use crate::loader::{LoadOptions, ResourceUrl};

/// Coordinator-assigned batch identifier.
///
/// Monotonically increasing per coordinator instance, assigned at submission
/// time, never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(u64);

impl BatchId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric identifier.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch-{}", self.0)
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.0)
    }
}

/// Lifecycle status of a single slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotStatus {
    /// Queued, waiting for admission.
    #[default]
    Pending,

    /// Admitted; a load is in flight for this slot's URL.
    Active,

    /// The load completed and the artifact is cached.
    Succeeded,

    /// The load completed with an error.
    Failed,

    /// Never attempted: the batch was cancelled before this slot's turn.
    Skipped,

    /// Aborted while in flight.
    Cancelled,
}

impl SlotStatus {
    /// Returns true if the slot has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Active)
    }

    /// Returns true if this status counts toward `skipped_count`.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skipped | Self::Cancelled)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Active => write!(f, "Active"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Skipped => write!(f, "Skipped"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Lifecycle state of a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchState {
    /// Slots are still open.
    #[default]
    Running,

    /// All slots terminal; completion reached through normal processing.
    Finished,

    /// All slots terminal; completion triggered by a cancel path.
    Cancelled,
}

impl BatchState {
    /// Returns true if the batch can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Finished => write!(f, "Finished"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// One queued or in-flight unit of work: a URL plus its options and status.
#[derive(Debug, Clone)]
pub(crate) struct FetchSlot {
    pub(crate) url: ResourceUrl,
    pub(crate) options: LoadOptions,
    pub(crate) status: SlotStatus,
}

impl FetchSlot {
    pub(crate) fn new(url: ResourceUrl, options: LoadOptions) -> Self {
        Self {
            url,
            options,
            status: SlotStatus::Pending,
        }
    }
}

/// Per-URL progress payload delivered after each slot finishes.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// The batch the slot belongs to.
    pub batch: BatchId,
    /// The URL that finished.
    pub url: ResourceUrl,
    /// True if the artifact was cached, false on load failure.
    pub success: bool,
    /// The batch's finished count after this slot settled.
    pub finished_count: usize,
    /// The batch's skipped count after this slot settled.
    pub skipped_count: usize,
}

/// Final counts delivered exactly once per batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchSummary {
    /// The batch that completed.
    pub batch: BatchId,
    /// Slots that ran to success or failure.
    pub finished_count: usize,
    /// Slots that were skipped or cancelled.
    pub skipped_count: usize,
    /// `Finished` or `Cancelled`.
    pub state: BatchState,
}

/// Invoked synchronously from `submit` with the new batch id.
pub type StartedCallback = Box<dyn FnOnce(BatchId) + Send>;

/// Invoked after each slot finishes, in completion order.
pub type ProgressCallback = Arc<dyn Fn(&ProgressUpdate) + Send + Sync>;

/// Invoked exactly once when the batch reaches a terminal state.
pub type CompletionCallback = Box<dyn FnOnce(BatchSummary) + Send>;

/// Optional per-submission callbacks.
///
/// All three are independent; any subset may be supplied.
///
/// # Example
///
/// ```ignore
/// let callbacks = BatchCallbacks::new()
///     .on_progress(|update| println!("{}: {}", update.url, update.success))
///     .on_completed(|summary| println!("done: {:?}", summary));
/// coordinator.submit(urls, None, callbacks)?;
/// ```
#[derive(Default)]
pub struct BatchCallbacks {
    pub(crate) on_started: Option<StartedCallback>,
    pub(crate) on_progress: Option<ProgressCallback>,
    pub(crate) on_completed: Option<CompletionCallback>,
}

impl BatchCallbacks {
    /// Creates an empty callback set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the started callback.
    pub fn on_started(mut self, callback: impl FnOnce(BatchId) + Send + 'static) -> Self {
        self.on_started = Some(Box::new(callback));
        self
    }

    /// Sets the progress callback.
    pub fn on_progress(
        mut self,
        callback: impl Fn(&ProgressUpdate) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Sets the completion callback.
    pub fn on_completed(mut self, callback: impl FnOnce(BatchSummary) + Send + 'static) -> Self {
        self.on_completed = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for BatchCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchCallbacks")
            .field("on_started", &self.on_started.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .field("on_completed", &self.on_completed.is_some())
            .finish()
    }
}

/// An ordered group of slots submitted together.
pub(crate) struct Batch {
    pub(crate) id: BatchId,
    pub(crate) slots: Vec<FetchSlot>,
    pub(crate) finished_count: usize,
    pub(crate) skipped_count: usize,
    pub(crate) callbacks: BatchCallbacks,
    pub(crate) state: BatchState,
}

impl Batch {
    pub(crate) fn new(id: BatchId, slots: Vec<FetchSlot>, callbacks: BatchCallbacks) -> Self {
        Self {
            id,
            slots,
            finished_count: 0,
            skipped_count: 0,
            callbacks,
            state: BatchState::Running,
        }
    }

    /// Number of slots still `Pending` or `Active`.
    pub(crate) fn open_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !slot.status.is_terminal())
            .count()
    }

    /// True once every slot is terminal.
    pub(crate) fn is_settled(&self) -> bool {
        self.finished_count + self.skipped_count == self.slots.len()
    }

    /// Checks the accounting invariant; used by debug assertions and tests.
    pub(crate) fn accounting_holds(&self) -> bool {
        self.finished_count + self.skipped_count + self.open_slots() == self.slots.len()
    }

    /// Settles an open slot as `Succeeded` or `Failed` and bumps
    /// `finished_count`. Returns the progress payload for the event.
    pub(crate) fn settle_finished(&mut self, index: usize, success: bool) -> ProgressUpdate {
        let slot = &mut self.slots[index];
        debug_assert!(!slot.status.is_terminal(), "slot settled twice");
        slot.status = if success {
            SlotStatus::Succeeded
        } else {
            SlotStatus::Failed
        };
        self.finished_count += 1;
        debug_assert!(self.accounting_holds());
        ProgressUpdate {
            batch: self.id,
            url: self.slots[index].url.clone(),
            success,
            finished_count: self.finished_count,
            skipped_count: self.skipped_count,
        }
    }

    /// Settles an open slot as `Skipped` (never attempted) or `Cancelled`
    /// (aborted in flight) and bumps `skipped_count`.
    pub(crate) fn settle_skipped(&mut self, index: usize, was_active: bool) {
        let slot = &mut self.slots[index];
        debug_assert!(!slot.status.is_terminal(), "slot settled twice");
        slot.status = if was_active {
            SlotStatus::Cancelled
        } else {
            SlotStatus::Skipped
        };
        self.skipped_count += 1;
        debug_assert!(self.accounting_holds());
    }

    /// Marks the batch terminal and returns the completion payload.
    ///
    /// `via_cancel` records whether a cancel path triggered the terminal
    /// transition; a batch that merely contains skipped slots but finished
    /// through normal processing still reports `Finished`.
    pub(crate) fn finish(&mut self, via_cancel: bool) -> BatchSummary {
        debug_assert!(self.is_settled(), "finish() before all slots settled");
        debug_assert!(!self.state.is_terminal(), "batch finished twice");
        let any_skip = self.slots.iter().any(|slot| slot.status.is_skip());
        self.state = if via_cancel && any_skip {
            BatchState::Cancelled
        } else {
            BatchState::Finished
        };
        BatchSummary {
            batch: self.id,
            finished_count: self.finished_count,
            skipped_count: self.skipped_count,
            state: self.state,
        }
    }
}
