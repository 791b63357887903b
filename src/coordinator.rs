//! Batch prefetch coordinator: admission, completion, cancellation.
//!
//! The coordinator owns every outstanding batch and a bounded-concurrency
//! dispatch loop over one global FIFO of pending slots. Admitted slots are
//! handed to the [`ResourceLoader`]; completions are funneled back through
//! the coordinator's single exclusive section, which updates counters,
//! queues events, checks batch terminal conditions, and refills the freed
//! concurrency unit.
//!
//! # Architecture
//!
//! ```text
//! submit([A, B, C]) ──► pending FIFO ──► admission (≤ limit in flight)
//!                                            │
//!                                            ▼
//!                                      ResourceLoader
//!                                            │ oneshot
//!                                            ▼
//!                        waiter task ──► completion funnel
//!                                            │
//!                          counters, progress/completion events,
//!                          terminal detection, next admission
//! ```
//!
//! # Locking
//!
//! All admission/completion/cancellation decisions run under one mutex with
//! short, synchronous critical sections that are never held across `.await`.
//! Caller callbacks and observers are never invoked under the lock: events
//! are queued inside the critical section and drained afterwards by a single
//! delivery pump, which keeps per-batch event order (started, then progress
//! in completion order, then exactly one completion) and lets callbacks
//! re-enter the coordinator freely.
//!
//! # Deduplication
//!
//! At most one load is in flight per URL across all batches. A slot admitted
//! while its URL is already in flight becomes a *follower* of that load and
//! observes the same outcome without a second loader call.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::batch::{
    Batch, BatchCallbacks, BatchId, BatchState, BatchSummary, CompletionCallback, FetchSlot,
    ProgressCallback, ProgressUpdate, SlotStatus,
};
use crate::error::SubmitError;
use crate::loader::{LoadError, LoadOptions, LoadResult, ResourceLoader, ResourceUrl};
use crate::observer::PrefetchObserver;

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Maximum simultaneous in-flight loads. Values below 1 are clamped.
    ///
    /// The default of 1 keeps prefetch traffic from starving foreground
    /// loads.
    pub concurrency_limit: usize,
    /// Options applied to every slot of a submission that carries none.
    pub default_options: LoadOptions,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 1,
            default_options: LoadOptions::default(),
        }
    }
}

/// Coordinator statistics for monitoring.
#[derive(Debug, Default)]
pub struct CoordinatorStats {
    /// Batches accepted by `submit`.
    pub batches_submitted: AtomicU64,
    /// Slots enqueued across all batches.
    pub urls_queued: AtomicU64,
    /// Loads handed to the resource loader.
    pub loads_dispatched: AtomicU64,
    /// Slots that piggybacked on an in-flight load for the same URL.
    pub loads_coalesced: AtomicU64,
    /// Loads that completed successfully.
    pub loads_succeeded: AtomicU64,
    /// Loads that completed with an error.
    pub loads_failed: AtomicU64,
    /// Slots settled as skipped or cancelled.
    pub slots_skipped: AtomicU64,
}

impl CoordinatorStats {
    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> CoordinatorStatsSnapshot {
        CoordinatorStatsSnapshot {
            batches_submitted: self.batches_submitted.load(Ordering::Relaxed),
            urls_queued: self.urls_queued.load(Ordering::Relaxed),
            loads_dispatched: self.loads_dispatched.load(Ordering::Relaxed),
            loads_coalesced: self.loads_coalesced.load(Ordering::Relaxed),
            loads_succeeded: self.loads_succeeded.load(Ordering::Relaxed),
            loads_failed: self.loads_failed.load(Ordering::Relaxed),
            slots_skipped: self.slots_skipped.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of coordinator statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorStatsSnapshot {
    pub batches_submitted: u64,
    pub urls_queued: u64,
    pub loads_dispatched: u64,
    pub loads_coalesced: u64,
    pub loads_succeeded: u64,
    pub loads_failed: u64,
    pub slots_skipped: u64,
}

/// Reference to one slot inside one batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SlotRef {
    batch: BatchId,
    index: usize,
}

/// Bookkeeping for one in-flight load.
struct ActiveLoad {
    /// Monotonic sequence number distinguishing successive loads of the same
    /// URL, so a stale [`OperationHandle`] cannot cancel a newer load.
    seq: u64,
    /// The slot that triggered the load and owns its outcome first.
    primary: SlotRef,
    /// Abort request channel handed to the loader.
    token: CancellationToken,
    /// Slots for the same URL that mirror this load's outcome.
    followers: Vec<SlotRef>,
}

/// Event queued under the lock and delivered by the pump.
enum Event {
    Started {
        batch: BatchId,
    },
    Progress {
        callback: Option<ProgressCallback>,
        update: ProgressUpdate,
        error: Option<LoadError>,
    },
    UrlCancelled {
        batch: BatchId,
        url: ResourceUrl,
    },
    Completed {
        callback: Option<CompletionCallback>,
        summary: BatchSummary,
    },
}

/// A load admission decided under the lock and launched after release.
struct Admission {
    url: ResourceUrl,
    seq: u64,
    options: LoadOptions,
    token: CancellationToken,
}

/// Mutable coordinator state; everything behind the one mutex.
#[derive(Default)]
struct State {
    batches: HashMap<BatchId, Batch>,
    pending: VecDeque<SlotRef>,
    active_by_url: HashMap<ResourceUrl, ActiveLoad>,
    next_batch_id: u64,
    next_load_seq: u64,
    /// Events awaiting delivery, in queue order.
    events: VecDeque<Event>,
    /// True while some thread is draining `events`.
    delivering: bool,
}

/// Handle to the in-flight load for one URL.
///
/// Returned by [`PrefetchCoordinator::operation_for`]. Cancelling through the
/// handle behaves like cancelling just that slot: the owning batch's skipped
/// count is bumped and its terminal condition checked. Best-effort and
/// idempotent; a handle that outlives its load does nothing.
pub struct OperationHandle {
    url: ResourceUrl,
    seq: u64,
    token: CancellationToken,
    coordinator: Weak<PrefetchCoordinator>,
}

impl OperationHandle {
    /// The URL this handle refers to.
    pub fn url(&self) -> &ResourceUrl {
        &self.url
    }

    /// True once an abort has been requested for this load.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Requests cancellation of this load.
    pub fn cancel(&self) {
        if let Some(coordinator) = self.coordinator.upgrade() {
            coordinator.cancel_url(&self.url, self.seq);
        }
    }
}

impl std::fmt::Debug for OperationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationHandle")
            .field("url", &self.url)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Batch prefetch coordinator.
///
/// Created with [`PrefetchCoordinator::new`] and shared as an `Arc`. Must be
/// used within a Tokio runtime: admissions spawn a waiter task per load.
///
/// # Example
///
/// ```ignore
/// let coordinator = PrefetchCoordinator::new(loader, CoordinatorConfig::default());
/// let id = coordinator.submit(
///     vec!["https://cdn/a.jpg".into(), "https://cdn/b.jpg".into()],
///     None,
///     BatchCallbacks::new().on_completed(|summary| {
///         println!("warmed {} of {}", summary.finished_count,
///                  summary.finished_count + summary.skipped_count);
///     }),
/// )?;
/// // later, if the list scrolled away:
/// coordinator.cancel_batch(id);
/// ```
pub struct PrefetchCoordinator {
    loader: Arc<dyn ResourceLoader>,
    config: CoordinatorConfig,
    state: Mutex<State>,
    observers: Mutex<Vec<Arc<dyn PrefetchObserver>>>,
    stats: Arc<CoordinatorStats>,
}

impl PrefetchCoordinator {
    /// Creates a coordinator driving the given loader.
    pub fn new(loader: Arc<dyn ResourceLoader>, mut config: CoordinatorConfig) -> Arc<Self> {
        if config.concurrency_limit == 0 {
            warn!("concurrency_limit of 0 clamped to 1");
            config.concurrency_limit = 1;
        }
        Arc::new(Self {
            loader,
            config,
            state: Mutex::new(State::default()),
            observers: Mutex::new(Vec::new()),
            stats: Arc::new(CoordinatorStats::default()),
        })
    }

    /// Access to the statistics for monitoring.
    pub fn stats(&self) -> Arc<CoordinatorStats> {
        Arc::clone(&self.stats)
    }

    /// Registers a coordinator-scope observer; events for every batch are
    /// fanned out to all registered observers.
    pub fn add_observer(&self, observer: Arc<dyn PrefetchObserver>) {
        self.observers_lock().push(observer);
    }

    /// Number of slots queued for admission.
    pub fn pending_count(&self) -> usize {
        self.state_lock().pending.len()
    }

    /// Number of in-flight loads.
    pub fn active_count(&self) -> usize {
        self.state_lock().active_by_url.len()
    }

    /// Number of outstanding (non-terminal) batches.
    pub fn batch_count(&self) -> usize {
        self.state_lock().batches.len()
    }

    /// Submits a batch of URLs for prefetching.
    ///
    /// Slots are enqueued in submission order on the global FIFO; admission
    /// never reorders them, within the batch or across batches. The started
    /// callback is invoked synchronously before any load is dispatched, and
    /// the batch id is returned without blocking on any load.
    ///
    /// `options`, when present, must have one entry per URL; each entry is
    /// passed through to the loader for the corresponding slot. When absent,
    /// the coordinator's default options apply. Duplicate URLs are permitted
    /// and tracked as independent slots.
    ///
    /// # Errors
    ///
    /// [`SubmitError`] if the URL list is empty or the options length does
    /// not match; no batch is created.
    pub fn submit(
        self: &Arc<Self>,
        urls: Vec<ResourceUrl>,
        options: Option<Vec<LoadOptions>>,
        mut callbacks: BatchCallbacks,
    ) -> Result<BatchId, SubmitError> {
        if urls.is_empty() {
            return Err(SubmitError::EmptyUrlList);
        }
        if let Some(ref per_url) = options {
            if per_url.len() != urls.len() {
                return Err(SubmitError::OptionsLengthMismatch {
                    urls: urls.len(),
                    options: per_url.len(),
                });
            }
        }
        let count = urls.len();
        let per_url =
            options.unwrap_or_else(|| vec![self.config.default_options.clone(); count]);
        let started = callbacks.on_started.take();

        let id = {
            let mut state = self.state_lock();
            let id = BatchId::new(state.next_batch_id);
            state.next_batch_id += 1;

            let slots = urls
                .into_iter()
                .zip(per_url)
                .map(|(url, options)| FetchSlot::new(url, options))
                .collect();
            state.batches.insert(id, Batch::new(id, slots, callbacks));
            for index in 0..count {
                state.pending.push_back(SlotRef { batch: id, index });
            }
            state.events.push_back(Event::Started { batch: id });
            id
        };

        self.stats.batches_submitted.fetch_add(1, Ordering::Relaxed);
        self.stats
            .urls_queued
            .fetch_add(count as u64, Ordering::Relaxed);
        debug!(batch = %id, urls = count, "batch submitted");

        // The started callback runs synchronously, before the dispatch step,
        // so the caller holds the batch id before any load can reach the
        // loader. Observers get their started event through the queue, still
        // ahead of any progress event for this batch.
        if let Some(callback) = started {
            callback(id);
        }
        self.pump_events();

        let admissions = {
            let mut state = self.state_lock();
            self.admit_locked(&mut state)
        };
        self.launch(admissions);
        self.pump_events();
        Ok(id)
    }

    /// Cancels every open slot of the given batch.
    ///
    /// Pending slots are skipped unconditionally; in-flight loads get an
    /// abort request and are settled as cancelled immediately. The batch's
    /// completion event fires with the final counts, and the freed
    /// concurrency units are refilled from the pending queue. Idempotent:
    /// an unknown or already-completed id is a silent no-op.
    pub fn cancel_batch(self: &Arc<Self>, id: BatchId) {
        let admissions = {
            let mut state = self.state_lock();
            if !state.batches.contains_key(&id) {
                trace!(batch = %id, "cancel for unknown or completed batch ignored");
                return;
            }
            self.cancel_batch_locked(&mut state, id);
            self.admit_locked(&mut state)
        };
        self.launch(admissions);
        self.pump_events();
    }

    /// Cancels every outstanding batch and clears the pending queue,
    /// bringing the coordinator to a quiescent state.
    pub fn cancel_all(self: &Arc<Self>) {
        {
            let mut state = self.state_lock();
            let mut ids: Vec<BatchId> = state.batches.keys().copied().collect();
            ids.sort_unstable();
            for id in ids {
                self.cancel_batch_locked(&mut state, id);
            }
            // Orphaned followers were requeued above; quiescence wins.
            state.pending.clear();
            debug_assert!(state.active_by_url.is_empty());
        }
        info!("all prefetching cancelled");
        self.pump_events();
    }

    /// Returns a cancellation handle for the in-flight load of `url`, if one
    /// exists. `None` once the URL is no longer active.
    pub fn operation_for(self: &Arc<Self>, url: &ResourceUrl) -> Option<OperationHandle> {
        let state = self.state_lock();
        state.active_by_url.get(url).map(|active| OperationHandle {
            url: url.clone(),
            seq: active.seq,
            token: active.token.clone(),
            coordinator: Arc::downgrade(self),
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn state_lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observers_lock(&self) -> MutexGuard<'_, Vec<Arc<dyn PrefetchObserver>>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Admission step: fill free concurrency units from the pending FIFO.
    ///
    /// Runs under the lock after every state change. Slots whose URL is
    /// already in flight are attached as followers without consuming a unit.
    /// Returns the loads to launch once the lock is released.
    fn admit_locked(&self, state: &mut State) -> Vec<Admission> {
        let mut admissions = Vec::new();
        while state.active_by_url.len() < self.config.concurrency_limit {
            let Some(slot_ref) = state.pending.pop_front() else {
                break;
            };
            let Some(batch) = state.batches.get_mut(&slot_ref.batch) else {
                // Stale reference to a retired batch.
                continue;
            };
            let slot = &mut batch.slots[slot_ref.index];
            if slot.status != SlotStatus::Pending {
                continue;
            }
            let url = slot.url.clone();
            let options = slot.options.clone();
            if let Some(active) = state.active_by_url.get_mut(&url) {
                active.followers.push(slot_ref);
                self.stats.loads_coalesced.fetch_add(1, Ordering::Relaxed);
                trace!(batch = %slot_ref.batch, url = %url, "coalesced onto in-flight load");
                continue;
            }
            slot.status = SlotStatus::Active;
            let token = CancellationToken::new();
            let seq = state.next_load_seq;
            state.next_load_seq += 1;
            state.active_by_url.insert(
                url.clone(),
                ActiveLoad {
                    seq,
                    primary: slot_ref,
                    token: token.clone(),
                    followers: Vec::new(),
                },
            );
            self.stats.loads_dispatched.fetch_add(1, Ordering::Relaxed);
            trace!(batch = %slot_ref.batch, url = %url, "slot admitted");
            admissions.push(Admission {
                url,
                seq,
                options,
                token,
            });
        }
        debug_assert!(state.active_by_url.len() <= self.config.concurrency_limit);
        admissions
    }

    /// Hands admitted loads to the loader and spawns their waiter tasks.
    fn launch(self: &Arc<Self>, admissions: Vec<Admission>) {
        for admission in admissions {
            let rx = self
                .loader
                .load(admission.url.clone(), admission.options, admission.token);
            let coordinator = Arc::clone(self);
            let url = admission.url;
            let seq = admission.seq;
            tokio::spawn(async move {
                let result = match rx.await {
                    Ok(result) => result,
                    Err(_) => Err(LoadError::new(
                        url.clone(),
                        "loader dropped the response channel",
                    )),
                };
                coordinator.on_load_settled(url, seq, result);
            });
        }
    }

    /// Completion funnel: settles the primary slot and all followers of the
    /// finished load, then refills the freed concurrency unit.
    fn on_load_settled(self: &Arc<Self>, url: ResourceUrl, seq: u64, result: LoadResult) {
        let success = result.is_ok();
        let error = result.err();
        let admissions = {
            let mut state = self.state_lock();
            // The sequence check keeps a late result from a cancelled load
            // from settling a newer load of the same URL.
            let active = match state.active_by_url.entry(url.clone()) {
                Entry::Occupied(entry) if entry.get().seq == seq => entry.remove(),
                _ => {
                    trace!(url = %url, "late result for deregistered load ignored");
                    return;
                }
            };
            if success {
                self.stats.loads_succeeded.fetch_add(1, Ordering::Relaxed);
            } else {
                self.stats.loads_failed.fetch_add(1, Ordering::Relaxed);
            }

            let mut slot_refs = Vec::with_capacity(1 + active.followers.len());
            slot_refs.push(active.primary);
            slot_refs.extend(active.followers);

            for slot_ref in slot_refs {
                let Some(batch) = state.batches.get_mut(&slot_ref.batch) else {
                    continue;
                };
                if batch.slots[slot_ref.index].status.is_terminal() {
                    continue;
                }
                let update = batch.settle_finished(slot_ref.index, success);
                let progress = Event::Progress {
                    callback: batch.callbacks.on_progress.clone(),
                    update,
                    error: error.clone(),
                };
                state.events.push_back(progress);
                Self::retire_if_settled_locked(&mut state, slot_ref.batch, false);
            }
            self.admit_locked(&mut state)
        };
        self.launch(admissions);
        self.pump_events();
    }

    /// Settles every open slot of `id` as skipped/cancelled, requeues
    /// orphaned followers of aborted loads, and queues the completion event.
    /// Must only be called for a batch present in the map.
    fn cancel_batch_locked(&self, state: &mut State, id: BatchId) {
        let Some(mut batch) = state.batches.remove(&id) else {
            return;
        };
        // Drop this batch's queued slots so admission cannot resurrect them.
        state.pending.retain(|slot_ref| slot_ref.batch != id);

        let mut skipped_now = 0u64;
        let mut orphaned: Vec<SlotRef> = Vec::new();
        for index in 0..batch.slots.len() {
            let (status, url) = {
                let slot = &batch.slots[index];
                (slot.status, slot.url.clone())
            };
            match status {
                SlotStatus::Pending => {
                    // The slot may be a follower of another batch's load.
                    if let Some(active) = state.active_by_url.get_mut(&url) {
                        active
                            .followers
                            .retain(|r| !(r.batch == id && r.index == index));
                    }
                    batch.settle_skipped(index, false);
                }
                SlotStatus::Active => {
                    if let Some(active) = state.active_by_url.remove(&url) {
                        active.token.cancel();
                        orphaned.extend(active.followers);
                    }
                    batch.settle_skipped(index, true);
                }
                _ => continue,
            }
            skipped_now += 1;
            state.events.push_back(Event::UrlCancelled { batch: id, url });
        }

        // Followers orphaned by an aborted load go back to the head of the
        // queue for re-admission; their batches still owe them an outcome.
        for slot_ref in orphaned.into_iter().rev() {
            state.pending.push_front(slot_ref);
        }

        self.stats
            .slots_skipped
            .fetch_add(skipped_now, Ordering::Relaxed);

        debug_assert!(batch.is_settled());
        let summary = batch.finish(true);
        let callback = batch.callbacks.on_completed.take();
        state.events.push_back(Event::Completed { callback, summary });
        info!(
            batch = %id,
            finished = summary.finished_count,
            skipped = summary.skipped_count,
            "batch cancelled"
        );
    }

    /// Cancels the in-flight load for `url` iff it is still the load the
    /// handle was taken for. Behaves like cancelling just that slot.
    fn cancel_url(self: &Arc<Self>, url: &ResourceUrl, seq: u64) {
        let admissions = {
            let mut state = self.state_lock();
            let active = match state.active_by_url.entry(url.clone()) {
                Entry::Occupied(entry) if entry.get().seq == seq => entry.remove(),
                _ => {
                    trace!(url = %url, "stale cancel handle ignored");
                    return;
                }
            };
            active.token.cancel();
            // Followers re-fetch; the aborted load owes them nothing.
            for slot_ref in active.followers.into_iter().rev() {
                state.pending.push_front(slot_ref);
            }

            let slot_ref = active.primary;
            if let Some(batch) = state.batches.get_mut(&slot_ref.batch) {
                if !batch.slots[slot_ref.index].status.is_terminal() {
                    batch.settle_skipped(slot_ref.index, true);
                    self.stats.slots_skipped.fetch_add(1, Ordering::Relaxed);
                    state.events.push_back(Event::UrlCancelled {
                        batch: slot_ref.batch,
                        url: url.clone(),
                    });
                    Self::retire_if_settled_locked(&mut state, slot_ref.batch, true);
                }
            }
            debug!(url = %url, batch = %slot_ref.batch, "in-flight load cancelled");
            self.admit_locked(&mut state)
        };
        self.launch(admissions);
        self.pump_events();
    }

    /// Terminal detection: if every slot of `id` is settled, queues the
    /// completion event and removes the batch.
    fn retire_if_settled_locked(state: &mut State, id: BatchId, via_cancel: bool) {
        let Some(batch) = state.batches.get_mut(&id) else {
            return;
        };
        if !batch.is_settled() {
            return;
        }
        let summary = batch.finish(via_cancel);
        let callback = batch.callbacks.on_completed.take();
        state.batches.remove(&id);
        state.events.push_back(Event::Completed { callback, summary });
        debug!(
            batch = %id,
            finished = summary.finished_count,
            skipped = summary.skipped_count,
            state = %summary.state,
            "batch completed"
        );
    }

    /// Drains queued events, one drainer at a time.
    ///
    /// Events are delivered in queue order with no lock held, so callbacks
    /// may re-enter the coordinator; events they queue are picked up by the
    /// drain already in progress on this thread.
    fn pump_events(&self) {
        struct DeliveryGuard<'a>(&'a PrefetchCoordinator);
        impl Drop for DeliveryGuard<'_> {
            fn drop(&mut self) {
                self.0.state_lock().delivering = false;
            }
        }

        loop {
            let event = {
                let mut state = self.state_lock();
                if state.delivering {
                    return;
                }
                match state.events.pop_front() {
                    Some(event) => {
                        state.delivering = true;
                        event
                    }
                    None => return,
                }
            };
            // The guard resets `delivering` on unwind too: a panicking
            // callback must not wedge delivery for every later batch.
            let guard = DeliveryGuard(self);
            self.dispatch_event(event);
            drop(guard);
        }
    }

    /// Invokes the per-batch callback and fans the event out to observers.
    fn dispatch_event(&self, event: Event) {
        let observers: Vec<Arc<dyn PrefetchObserver>> = self.observers_lock().clone();
        match event {
            Event::Started { batch } => {
                for observer in &observers {
                    observer.batch_started(batch);
                }
            }
            Event::Progress {
                callback,
                update,
                error,
            } => {
                if let Some(callback) = callback {
                    callback(&update);
                }
                for observer in &observers {
                    match &error {
                        None => observer.url_prefetched(&update),
                        Some(error) => observer.url_failed(&update, error),
                    }
                }
            }
            Event::UrlCancelled { batch, url } => {
                for observer in &observers {
                    observer.url_cancelled(batch, &url);
                }
            }
            Event::Completed { callback, summary } => {
                if let Some(callback) = callback {
                    callback(summary);
                }
                for observer in &observers {
                    match summary.state {
                        BatchState::Cancelled => observer.batch_cancelled(summary),
                        _ => observer.batch_finished(summary),
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for PrefetchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state_lock();
        f.debug_struct("PrefetchCoordinator")
            .field("concurrency_limit", &self.config.concurrency_limit)
            .field("batches", &state.batches.len())
            .field("pending", &state.pending.len())
            .field("active", &state.active_by_url.len())
            .finish()
    }
}
