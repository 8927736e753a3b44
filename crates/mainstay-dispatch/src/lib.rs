//! Thread-affinity dispatch: run work on one designated main thread.
//!
//! Any thread may [`dispatch`](MainThreadDispatcher::dispatch) a closure; the host's run
//! loop services the queue by calling [`drain`](MainThreadDispatcher::drain) on the main
//! thread. Draining is time-boxed so accumulated work cannot starve host input handling,
//! and re-arms itself through the host's [`DrainScheduler`] hook when it stops early.
//!
//! # Design
//!
//! - Single consumer (the main thread), any number of producers; strict FIFO across all
//!   producers combined.
//! - The queue mutex is held only for O(1) push/pop. Tasks execute and drop outside it, so
//!   task side effects (including further dispatches) never nest inside the queue lock.
//! - Exactly one scheduling notification per empty -> non-empty queue transition.
//! - [`call_and_wait`](MainThreadDispatcher::call_and_wait) layers a blocking
//!   request/response handshake over the same queue; there is no second delivery mechanism.
//!
//! The host supplies the two hooks this crate does not implement: a [`DrainScheduler`]
//! ("invoke `drain` on the main thread soon", coalescing allowed) and a
//! [`HostClock`](mainstay_time::HostClock) (monotonic time for the drain budget).

mod dispatcher;
mod gc_role;
mod queue;
mod sync_call;

pub mod process;

pub use dispatcher::{DrainScheduler, MainThreadDispatcher, DEFAULT_DRAIN_BUDGET};
pub use gc_role::{current_gc_thread_kind, register_gc_thread, GcThreadKind};
pub use queue::Task;
pub use sync_call::SyncCallError;
