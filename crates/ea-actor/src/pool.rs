//! The execution pool: a fixed set of single-concurrency lanes multiplexed
//! onto a fixed set of worker threads.
//!
//! # Lifecycle
//!
//! ```text
//! ExecutionPool::new(config)   ── once per simulation run
//!   .handle()                  ── cloned into every Actor at build time
//!   .block_on(tick)            ── the driver's only blocking wait, per tick
//!   .shutdown()                ── once, after the final flush
//! ```
//!
//! The pool is an explicit value.  There is no process-wide instance, so two
//! runs in one process never share lanes or bindings.
//!
//! # Ambient context
//!
//! [`current_context`] names the context the calling code is logically
//! running on.  It is a task-local value:
//!
//! - inside a job on lane `k` it is `Some(ContextId(k))`,
//! - inside [`ExecutionPool::block_on`] it is `Some(ContextId::MAIN)`,
//! - anywhere else it is `None`.
//!
//! [`with_context`] sets it for the duration of one future.  It is never
//! assigned by a forwarded call.  A caller that awaits a
//! [`Pending`] keeps its own task, and with it its own value, so after every
//! forwarded call the caller's context is the one it had before the call.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use ea_core::{ContextId, EntityKey, SimConfig};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{ActorError, ActorResult, Pending};

/// A unit of work shipped to a lane.
type Job = Box<dyn FnOnce() + Send + 'static>;

tokio::task_local! {
    static CURRENT_CONTEXT: ContextId;
}

/// The context the calling code is logically running on, if any.
pub fn current_context() -> Option<ContextId> {
    CURRENT_CONTEXT.try_with(|ctx| *ctx).ok()
}

/// Run `future` with `context` as its ambient context.
///
/// Scoped: the previous value is back in place once `future` completes or
/// is dropped, and other tasks never see it.
pub fn with_context<F: Future>(context: ContextId, future: F) -> impl Future<Output = F::Output> {
    CURRENT_CONTEXT.scope(context, future)
}

// ── PoolConfig ────────────────────────────────────────────────────────────────

/// Size of an [`ExecutionPool`].  Fixed for the pool's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Worker threads.
    pub workers: usize,
    /// Execution contexts.  May exceed `workers`.
    pub lanes: usize,
}

impl PoolConfig {
    pub fn new(workers: usize, lanes: usize) -> Self {
        Self { workers, lanes }
    }

    /// Size the pool from the run configuration.
    pub fn from_sim_config(config: &SimConfig) -> Self {
        Self::new(config.worker_count(), config.lane_count())
    }

    fn validate(&self) -> ActorResult<()> {
        if self.workers == 0 {
            return Err(ActorError::Config("at least one worker is required".into()));
        }
        if self.lanes == 0 {
            return Err(ActorError::Config("at least one lane is required".into()));
        }
        if self.lanes > u32::MAX as usize - 1 {
            return Err(ActorError::Config(format!("too many lanes: {}", self.lanes)));
        }
        Ok(())
    }
}

// ── Scheduler (shared) ────────────────────────────────────────────────────────

/// State shared between the pool and every handle.  Holds no runtime, so
/// dropping the last handle on a worker thread is harmless.
struct Scheduler {
    /// Mailbox senders, indexed by `ContextId`.  Emptied on shutdown.
    lanes:      RwLock<Vec<mpsc::UnboundedSender<Job>>>,
    lane_count: usize,
    bindings:   Mutex<HashMap<EntityKey, ContextId>>,
    next_lane:  AtomicUsize,
}

/// Cheap, cloneable access to the pool's scheduling operations.
///
/// Every [`Actor`](crate::Actor) holds one.  It cannot block and cannot shut
/// the pool down; only the owning [`ExecutionPool`] can.
#[derive(Clone)]
pub struct PoolHandle {
    scheduler: Arc<Scheduler>,
}

impl PoolHandle {
    /// The context bound to `entity`, binding one on first use.
    ///
    /// Idempotent: the same entity always gets the same context.  Lanes are
    /// handed out round-robin, so with more entities than lanes several
    /// entities share one lane (and are then serialized with each other too).
    pub fn context_for(&self, entity: EntityKey) -> ContextId {
        let mut bindings = self
            .scheduler
            .bindings
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *bindings.entry(entity).or_insert_with(|| {
            let lane = self.scheduler.next_lane.fetch_add(1, Ordering::Relaxed)
                % self.scheduler.lane_count;
            ContextId(lane as u32)
        })
    }

    /// Number of entities bound so far.
    pub fn bound_entities(&self) -> usize {
        self.scheduler
            .bindings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of execution contexts.
    pub fn lane_count(&self) -> usize {
        self.scheduler.lane_count
    }

    /// Schedule `f` to run exclusively on `context`.
    ///
    /// The job is enqueued before this returns; the returned future only
    /// delivers the result.  A panic inside `f` is caught on the lane and
    /// delivered as [`ActorError::Panicked`]; the lane keeps serving.
    pub fn run_on<T, F>(&self, context: ContextId, f: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.submit(context, move || Ok(f()))
    }

    /// Like [`run_on`](Self::run_on) for jobs that can themselves fail at the
    /// actor boundary.
    pub(crate) fn submit<T, F>(&self, context: ContextId, f: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> ActorResult<T> + Send + 'static,
    {
        let (reply, receiver) = oneshot::channel::<ActorResult<T>>();
        let job: Job = Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
                Err(ActorError::Panicked {
                    context,
                    message: panic_message(payload.as_ref()),
                })
            });
            // The caller may have stopped waiting; the work is done either way.
            let _ = reply.send(outcome);
        });

        let lanes = self
            .scheduler
            .lanes
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if lanes.is_empty() {
            return Pending::failed(ActorError::PoolClosed);
        }
        match lanes.get(context.index()) {
            None => Pending::failed(ActorError::UnknownContext(context)),
            Some(mailbox) => match mailbox.send(job) {
                Ok(()) => Pending::waiting(context, receiver),
                Err(_) => Pending::failed(ActorError::PoolClosed),
            },
        }
    }

    fn close(&self) -> Vec<mpsc::UnboundedSender<Job>> {
        let mut lanes = self
            .scheduler
            .lanes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *lanes)
    }
}

// ── ExecutionPool ─────────────────────────────────────────────────────────────

/// Owner of the worker threads and lanes of one simulation run.
pub struct ExecutionPool {
    runtime: Runtime,
    handle:  PoolHandle,
    lanes:   Vec<JoinHandle<u64>>,
    workers: usize,
}

impl ExecutionPool {
    /// Start `config.workers` worker threads and `config.lanes` lanes.
    pub fn new(config: PoolConfig) -> ActorResult<Self> {
        config.validate()?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(config.workers)
            .thread_name("ea-worker")
            .build()?;

        let mut senders = Vec::with_capacity(config.lanes);
        let mut lanes = Vec::with_capacity(config.lanes);
        for i in 0..config.lanes {
            let context = ContextId(i as u32);
            let (mailbox, jobs) = mpsc::unbounded_channel::<Job>();
            lanes.push(runtime.spawn(CURRENT_CONTEXT.scope(context, drain_lane(context, jobs))));
            senders.push(mailbox);
        }

        info!(workers = config.workers, lanes = config.lanes, "execution pool started");

        Ok(Self {
            runtime,
            handle: PoolHandle {
                scheduler: Arc::new(Scheduler {
                    lanes:      RwLock::new(senders),
                    lane_count: config.lanes,
                    bindings:   Mutex::new(HashMap::new()),
                    next_lane:  AtomicUsize::new(0),
                }),
            },
            lanes,
            workers: config.workers,
        })
    }

    /// A handle for actors to schedule through.
    pub fn handle(&self) -> PoolHandle {
        self.handle.clone()
    }

    /// See [`PoolHandle::context_for`].
    pub fn context_for(&self, entity: EntityKey) -> ContextId {
        self.handle.context_for(entity)
    }

    /// See [`PoolHandle::run_on`].
    pub fn run_on<T, F>(&self, context: ContextId, f: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.handle.run_on(context, f)
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    pub fn lane_count(&self) -> usize {
        self.handle.lane_count()
    }

    /// Drive `future` to completion on the calling thread, as the `MAIN`
    /// context.
    ///
    /// This is the only blocking wait in the system.  It is refused with
    /// [`ActorError::NestedBlock`] when called from inside a lane or from
    /// inside another `block_on`, where it could only deadlock or panic.
    pub fn block_on<F: Future>(&self, future: F) -> ActorResult<F::Output> {
        if let Some(context) = current_context() {
            return Err(ActorError::NestedBlock(context));
        }
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(ActorError::NestedBlock(ContextId::MAIN));
        }
        Ok(self.runtime.block_on(CURRENT_CONTEXT.scope(ContextId::MAIN, future)))
    }

    /// Stop accepting work, let every lane finish what is already queued,
    /// then stop the workers.
    pub fn shutdown(self) -> ActorResult<()> {
        let ExecutionPool { runtime, handle, lanes, .. } = self;

        // Dropping the only senders closes every mailbox; each lane exits
        // once its queue is empty.
        drop(handle.close());

        let results = runtime.block_on(futures::future::join_all(lanes));
        let mut executed = 0u64;
        for result in results {
            executed += result.map_err(|e| ActorError::LaneFailed(e.to_string()))?;
        }
        runtime.shutdown_background();
        info!(executed, "execution pool shut down");
        Ok(())
    }
}

/// Run one lane: take jobs from its mailbox one at a time until it closes.
async fn drain_lane(context: ContextId, mut jobs: mpsc::UnboundedReceiver<Job>) -> u64 {
    let mut executed = 0u64;
    while let Some(job) = jobs.recv().await {
        job();
        executed += 1;
    }
    debug!(context = context.0, executed, "lane drained");
    executed
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
