//! Region worker: a throttled, cancellable, self-extending task queue.
//!
//! Each worker is bound to one (service, region) pair and runs at most one
//! task at a time. Tasks are drained from a [`PriorityQueue`] by a timer that
//! is re-armed a fixed `work_delay` after every completion, which keeps the
//! call rate under the external API's limits without a thread pool.
//!
//! Cancellation is cooperative: every task captures the worker's
//! [`Generation`] when it is enqueued, and [`RegionWorker::reset_progress`]
//! moves the worker to a new generation. Work that settles under a stale
//! generation is discarded without touching the progress counters.

use std::fmt;
use std::future::Future;
use std::ops::Add;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::config::{Credentials, WorkerConfig};
use crate::core::{AppResult, WorkerError};
use crate::infra::queue::{Priority, PriorityQueue};

/// Abstraction for spawning the drain loop on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Cancellation epoch of a worker.
///
/// Passed by value into every task action; compared against the worker's
/// current generation when the action settles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    /// Raw epoch number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Progress counters of a worker (or a sum over workers).
///
/// `total` grows when work is enqueued, `done` and `errors` when it settles,
/// so `total >= done + errors` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Tasks that settled successfully.
    pub done: u64,
    /// Tasks enqueued in the current generation.
    pub total: u64,
    /// Tasks that settled with an error.
    pub errors: u64,
}

impl Progress {
    /// Tasks enqueued but not settled yet.
    #[must_use]
    pub const fn pending(&self) -> u64 {
        self.total.saturating_sub(self.done + self.errors)
    }
}

impl Add for Progress {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            done: self.done + rhs.done,
            total: self.total + rhs.total,
            errors: self.errors + rhs.errors,
        }
    }
}

impl std::iter::Sum for Progress {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Worker-specific hooks plugged into a generic [`RegionWorker`].
pub trait WorkerBehavior<S>: Send + Sync + 'static {
    /// Seed the initial tasks. Called once on the first `start` of each
    /// generation.
    fn fill_queue(&self, worker: &RegionWorker<S>);

    /// Drop per-generation state. Called by `reset_progress`.
    fn reset(&self) {}

    /// React to new account credentials.
    fn updated_credentials(&self, _credentials: &Credentials) {}
}

/// Behavior with nothing to seed; the worker only runs what others enqueue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeed;

impl<S: 'static> WorkerBehavior<S> for NoSeed {
    fn fill_queue(&self, _worker: &RegionWorker<S>) {}
}

/// One page of a paged transport call.
#[derive(Debug)]
pub struct Page<D, R> {
    /// Page payload.
    pub data: D,
    /// Request for the following page, if any.
    pub next: Option<R>,
}

impl<D, R> Page<D, R> {
    /// Final page.
    pub const fn last(data: D) -> Self {
        Self { data, next: None }
    }

    /// Page followed by `next`.
    pub const fn with_next(data: D, next: R) -> Self {
        Self {
            data,
            next: Some(next),
        }
    }

    /// Whether another page follows.
    pub const fn has_next_page(&self) -> bool {
        self.next.is_some()
    }
}

/// A transport operation that yields its result one page at a time.
#[async_trait]
pub trait PagedRequest: Send + Sized + 'static {
    /// Payload of one page.
    type Data: Send + 'static;

    /// Execute the request.
    async fn send(self) -> AppResult<Page<Self::Data, Self>>;
}

type Action = Box<dyn FnOnce(Generation) -> BoxFuture<'static, AppResult<()>> + Send>;

struct Task {
    generation: Generation,
    action: Action,
}

#[derive(Default)]
struct WorkerState {
    queue: PriorityQueue<Task>,
    started: bool,
    processing: bool,
    queue_filled: bool,
    generation: Generation,
    /// Sequence number of the pending tick; `None` when disarmed.
    armed: Option<u64>,
    arm_seq: u64,
    progress: Progress,
}

impl WorkerState {
    const fn finished(&self) -> bool {
        self.queue.is_empty() && !self.processing
    }

    const fn running(&self) -> bool {
        self.started && !self.finished()
    }
}

struct Inner<S> {
    region: String,
    config: WorkerConfig,
    behavior: Arc<dyn WorkerBehavior<S>>,
    spawner: S,
    state: Mutex<WorkerState>,
}

/// Scheduler bound to one (service, region) pair.
///
/// Cheap to clone; clones share the same queue and counters.
pub struct RegionWorker<S> {
    inner: Arc<Inner<S>>,
}

impl<S: 'static> Clone for RegionWorker<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: 'static> fmt::Debug for RegionWorker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("RegionWorker")
            .field("region", &self.inner.region)
            .field("started", &state.started)
            .field("processing", &state.processing)
            .field("queued", &state.queue.len())
            .field("generation", &state.generation)
            .field("progress", &state.progress)
            .finish_non_exhaustive()
    }
}

impl<S: 'static> RegionWorker<S> {
    /// Region this worker is bound to.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.inner.region
    }

    /// Scheduling configuration.
    #[must_use]
    pub fn config(&self) -> &WorkerConfig {
        &self.inner.config
    }

    /// Whether `start` was called more recently than `stop`.
    #[must_use]
    pub fn started(&self) -> bool {
        self.inner.state.lock().started
    }

    /// Queue empty and no task in flight.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.inner.state.lock().finished()
    }

    /// Started and not finished.
    #[must_use]
    pub fn running(&self) -> bool {
        self.inner.state.lock().running()
    }

    /// Snapshot of the progress counters.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.inner.state.lock().progress
    }

    /// Tasks that settled successfully.
    #[must_use]
    pub fn progress_done(&self) -> u64 {
        self.progress().done
    }

    /// Tasks enqueued in the current generation.
    #[must_use]
    pub fn progress_total(&self) -> u64 {
        self.progress().total
    }

    /// Tasks that settled with an error.
    #[must_use]
    pub fn progress_errors(&self) -> u64 {
        self.progress().errors
    }

    /// Number of queued tasks, not counting the one in flight.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    /// Current cancellation generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.inner.state.lock().generation
    }

    /// Whether work tagged with `generation` is still wanted.
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.inner.state.lock().generation == generation
    }

    /// Stop draining. A task already in flight keeps running and its result
    /// is still counted, but no further tick happens until `start`.
    pub fn stop(&self) {
        {
            let mut state = self.inner.state.lock();
            if !state.started {
                return;
            }
            state.started = false;
            state.armed = None;
        }
        tracing::info!(region = %self.inner.region, "worker stopped");
    }

    /// Forward new credentials to the worker's behavior.
    pub fn updated_credentials(&self, credentials: &Credentials) {
        self.inner.behavior.updated_credentials(credentials);
    }
}

impl<S> RegionWorker<S>
where
    S: Spawn + Send + Sync + 'static,
{
    /// Create an idle worker. Nothing runs until [`start`](Self::start).
    pub fn new(
        region: impl Into<String>,
        config: WorkerConfig,
        behavior: Arc<dyn WorkerBehavior<S>>,
        spawner: S,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                region: region.into(),
                config,
                behavior,
                spawner,
                state: Mutex::new(WorkerState::default()),
            }),
        }
    }

    /// Start draining. The first start of each generation seeds the queue
    /// through [`WorkerBehavior::fill_queue`].
    pub fn start(&self) {
        let seed = {
            let mut state = self.inner.state.lock();
            if state.started {
                return;
            }
            state.started = true;
            let seed = !state.queue_filled;
            state.queue_filled = true;
            seed
        };
        tracing::info!(region = %self.inner.region, seed, "worker started");

        self.ensure_timer();
        if seed {
            self.inner.behavior.fill_queue(self);
        }
    }

    /// Cancel all pending work and zero the counters.
    ///
    /// Fails while the worker is running. Tasks still in flight settle under
    /// a stale generation and are ignored; paged results waiting on dropped
    /// tasks resolve as [`WorkerError::Cancelled`].
    pub fn reset_progress(&self) -> Result<(), WorkerError> {
        let dropped = {
            let mut state = self.inner.state.lock();
            if state.running() {
                return Err(WorkerError::InvalidState(
                    "cannot reset progress while running".into(),
                ));
            }
            state.progress = Progress::default();
            state.generation = state.generation.next();
            state.queue_filled = false;
            std::mem::take(&mut state.queue)
        };
        tracing::info!(
            region = %self.inner.region,
            discarded = dropped.len(),
            "worker progress reset"
        );
        drop(dropped);

        self.inner.behavior.reset();
        Ok(())
    }

    /// Queue `action` at `priority`. The action receives the generation that
    /// was current at enqueue time.
    pub fn enqueue<F, Fut>(&self, priority: Priority, action: F)
    where
        F: FnOnce(Generation) -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        let started = {
            let mut state = self.inner.state.lock();
            state.progress.total += 1;
            let task = Task {
                generation: state.generation,
                action: Box::new(move |generation| action(generation).boxed()),
            };
            state.queue.push(priority, task);
            state.started
        };

        if started {
            self.ensure_timer();
        }
    }

    /// Queue a paged request, calling `on_page` for every page. Each further
    /// page is queued at the same priority once the previous one arrives.
    ///
    /// Resolves after the last page was handled.
    pub fn enqueue_paged_request<R, F>(
        &self,
        priority: Priority,
        request: R,
        on_page: F,
    ) -> impl Future<Output = Result<(), WorkerError>> + Send + 'static
    where
        R: PagedRequest,
        F: Fn(R::Data) + Send + Sync + 'static,
    {
        self.enqueue_paged_request_fold(priority, request, (), move |data, ()| on_page(data))
    }

    /// Queue a paged request and thread an accumulator through every page.
    ///
    /// Resolves to the final accumulator, to [`WorkerError::Cancelled`] when
    /// the worker is reset before the last page, or to [`WorkerError::Task`]
    /// when a page fails.
    pub fn enqueue_paged_request_fold<R, A, F>(
        &self,
        priority: Priority,
        request: R,
        initial: A,
        reducer: F,
    ) -> impl Future<Output = Result<A, WorkerError>> + Send + 'static
    where
        R: PagedRequest,
        A: Send + 'static,
        F: Fn(R::Data, A) -> A + Send + Sync + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.enqueue_page(priority, request, initial, Arc::new(reducer), tx);

        async move { rx.await.unwrap_or(Err(WorkerError::Cancelled)) }
    }

    fn enqueue_page<R, A, F>(
        &self,
        priority: Priority,
        request: R,
        acc: A,
        reducer: Arc<F>,
        tx: oneshot::Sender<Result<A, WorkerError>>,
    ) where
        R: PagedRequest,
        A: Send + 'static,
        F: Fn(R::Data, A) -> A + Send + Sync + 'static,
    {
        let worker = self.clone();
        self.enqueue(priority, move |generation| async move {
            let response = request.send().await;

            if !worker.is_current(generation) {
                tracing::debug!(region = %worker.inner.region, %generation, "dropping stale page");
                let _ = tx.send(Err(WorkerError::Cancelled));
                return Ok(());
            }

            let page = match response {
                Ok(page) => page,
                Err(e) => {
                    let _ = tx.send(Err(WorkerError::Task(format!("{e:#}"))));
                    return Err(e);
                }
            };

            let acc = reducer(page.data, acc);
            match page.next {
                Some(next) => {
                    tracing::trace!(region = %worker.inner.region, priority, "queueing next page");
                    worker.enqueue_page(priority, next, acc, reducer, tx);
                }
                None => {
                    let _ = tx.send(Ok(acc));
                }
            }
            Ok(())
        });
    }

    fn ensure_timer(&self) {
        let seq = {
            let mut state = self.inner.state.lock();
            if !state.started || state.armed.is_some() {
                return;
            }
            state.arm_seq += 1;
            state.armed = Some(state.arm_seq);
            state.arm_seq
        };

        let worker = self.clone();
        let delay = self.inner.config.work_delay();
        self.inner.spawner.spawn(async move {
            tokio::time::sleep(delay).await;
            worker.tick(seq).await;
        });
    }

    async fn tick(self, seq: u64) {
        let task = {
            let mut state = self.inner.state.lock();
            if state.armed != Some(seq) {
                return;
            }
            state.armed = None;
            // the in-flight task re-arms the timer when it settles
            if state.processing {
                return;
            }
            let Some(task) = state.queue.pop() else {
                return;
            };
            state.processing = true;
            task
        };

        let Task { generation, action } = task;
        // the closure itself may panic before yielding a future
        let result = AssertUnwindSafe(async move { action(generation).await })
            .catch_unwind()
            .await;

        {
            let mut state = self.inner.state.lock();
            state.processing = false;

            if state.generation == generation {
                match result {
                    Ok(Ok(())) => state.progress.done += 1,
                    Ok(Err(e)) => {
                        state.progress.errors += 1;
                        tracing::warn!(region = %self.inner.region, error = %e, "task failed");
                    }
                    Err(_) => {
                        state.progress.errors += 1;
                        tracing::error!(region = %self.inner.region, "task panicked");
                    }
                }
            } else {
                tracing::debug!(region = %self.inner.region, %generation, "discarding stale task result");
            }
        }

        self.ensure_timer();
    }
}
