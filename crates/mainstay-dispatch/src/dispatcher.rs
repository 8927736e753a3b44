use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use mainstay_time::HostClock;
use tracing::{trace, warn};

use crate::gc_role;
use crate::queue::TaskQueue;

/// Host hook guaranteeing a future [`MainThreadDispatcher::drain`] call on the main thread.
///
/// The host may coalesce multiple requests into a single future drain; the dispatcher only
/// relies on at least one drain happening after each request.
pub trait DrainScheduler: Send + Sync {
    fn schedule_drain(&self);
}

/// How long a single [`MainThreadDispatcher::drain`] call may monopolise the main thread.
///
/// Delays around 0.1 s are where UI stalls become noticeable; the budget stays at half of
/// that so host input keeps flowing between drain passes.
pub const DEFAULT_DRAIN_BUDGET: Duration = Duration::from_millis(50);

/// Delivers work from any thread to the one designated main thread.
///
/// One instance per process is the norm (see [`crate::process`]), but instances are
/// self-contained and tests construct their own freely.
pub struct MainThreadDispatcher {
    queue: TaskQueue,
    /// Suppresses draining. Read and written only on the main thread.
    paused: AtomicBool,
    main: ThreadId,
    scheduler: Arc<dyn DrainScheduler>,
    clock: Arc<dyn HostClock>,
    budget_ns: u64,
}

impl MainThreadDispatcher {
    /// Creates a dispatcher, designating the calling thread as the main thread.
    ///
    /// Must run on the thread that will service [`drain`](Self::drain), before any work is
    /// dispatched; the identity is fixed for the dispatcher's lifetime.
    pub fn new(scheduler: Arc<dyn DrainScheduler>, clock: Arc<dyn HostClock>) -> Self {
        Self {
            queue: TaskQueue::new(),
            paused: AtomicBool::new(false),
            main: thread::current().id(),
            scheduler,
            clock,
            budget_ns: DEFAULT_DRAIN_BUDGET.as_nanos() as u64,
        }
    }

    /// Overrides the drain time budget (default [`DEFAULT_DRAIN_BUDGET`]).
    pub fn with_drain_budget(mut self, budget: Duration) -> Self {
        self.budget_ns = u64::try_from(budget.as_nanos()).unwrap_or(u64::MAX);
        self
    }

    /// Whether the calling thread is this dispatcher's main thread. Lock-free; the identity
    /// is write-once.
    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.main
    }

    /// Whether the calling thread is the main thread or has registered as a GC thread.
    ///
    /// Collaborators use this composite predicate to gate access to main-thread-only or
    /// GC-sensitive structures.
    pub fn is_main_or_gc_thread(&self) -> bool {
        gc_role::current_gc_thread_kind().is_some() || self.is_main_thread()
    }

    pub fn is_shut_down(&self) -> bool {
        self.queue.is_shut_down()
    }

    /// Enqueues `work` to run on the main thread. Callable from any thread.
    ///
    /// Exactly one [`DrainScheduler::schedule_drain`] request fires per empty -> non-empty
    /// queue transition. While the queue stays non-empty the pending drain is already
    /// obligated to run everything, so no further wake-ups are requested.
    ///
    /// After [`shutdown`](Self::shutdown) the work is dropped without running. The queue
    /// itself decides, under its own lock, so a dispatch racing a shutdown either lands in
    /// the batch the shutdown discards or is handed straight back; it cannot strand.
    pub fn dispatch(&self, work: impl FnOnce() + Send + 'static) {
        match self.queue.push(Box::new(work)) {
            Ok(was_empty) => {
                if was_empty {
                    self.scheduler.schedule_drain();
                }
            }
            Err(task) => {
                warn!("dispatch after shutdown; dropping task");
                // Dropped here, outside the queue lock, like any executed task.
                drop(task);
            }
        }
    }

    /// Runs queued tasks until the queue empties or the time budget is exhausted, whichever
    /// comes first. Must be called on the main thread.
    ///
    /// Returns immediately while paused or after shutdown; paused work stays queued until
    /// [`set_paused(false)`](Self::set_paused).
    ///
    /// Each task is popped under the queue lock but executed and destroyed outside it, so a
    /// task (or the destructor of its captured state) may itself dispatch without
    /// deadlocking. When the budget runs out, the scheduler is re-armed and control returns
    /// to the host run loop; a later drain picks up the remainder.
    ///
    /// A panicking task is not intercepted and unwinds into the caller.
    pub fn drain(&self) {
        debug_assert!(self.is_main_thread(), "drain called off the main thread");
        if self.paused.load(Ordering::Relaxed) || self.is_shut_down() {
            return;
        }

        let start_ns = self.clock.now_ns();
        loop {
            let Some(task) = self.queue.pop() else {
                break;
            };
            task();

            if self.clock.now_ns().saturating_sub(start_ns) > self.budget_ns {
                trace!("drain budget exhausted; re-arming");
                self.scheduler.schedule_drain();
                break;
            }
        }
    }

    /// Gates draining. Must be called on the main thread; no-op when unchanged.
    ///
    /// Unpausing re-arms the scheduler iff work is already queued, so deferred work resumes
    /// without waiting for an unrelated dispatch.
    pub fn set_paused(&self, paused: bool) {
        debug_assert!(self.is_main_thread(), "set_paused called off the main thread");
        if self.paused.load(Ordering::Relaxed) == paused {
            return;
        }
        self.paused.store(paused, Ordering::Relaxed);
        if !paused && !self.queue.is_empty() {
            self.scheduler.schedule_drain();
        }
    }

    /// Enters the terminal shut-down state. Must be called on the main thread; idempotent.
    ///
    /// Pending tasks are discarded (dropped outside the queue lock), later dispatches are
    /// dropped with a warning, and later drains return immediately. The flag and the queue
    /// clear are one critical section, so a dispatch racing this call either joins the
    /// discarded batch or is rejected; it never re-populates the cleared queue. Blocked
    /// [`call_and_wait`](Self::call_and_wait) callers are woken with an error rather than
    /// stranded.
    pub fn shutdown(&self) {
        debug_assert!(self.is_main_thread(), "shutdown called off the main thread");
        let discarded = self.queue.shut_down();
        if !discarded.is_empty() {
            warn!(count = discarded.len(), "shutdown discarded queued tasks");
        }
    }
}
