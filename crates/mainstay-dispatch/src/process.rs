//! The process-wide installed dispatcher.
//!
//! Collaborators that cannot thread a [`MainThreadDispatcher`] handle through their call
//! graph go through the installed instance. Installation is explicit and happens exactly
//! once, on the thread that becomes the main thread.

use std::sync::{Arc, OnceLock};

use mainstay_time::HostClock;

use crate::dispatcher::{DrainScheduler, MainThreadDispatcher};
use crate::gc_role;

static INSTANCE: OnceLock<Arc<MainThreadDispatcher>> = OnceLock::new();

/// Installs the process-wide dispatcher, designating the calling thread as the main thread.
///
/// The first call constructs and installs; later calls are idempotent no-ops that return
/// the existing instance regardless of their arguments. Must run before any code that
/// depends on dispatching.
pub fn initialize(
    scheduler: Arc<dyn DrainScheduler>,
    clock: Arc<dyn HostClock>,
) -> Arc<MainThreadDispatcher> {
    INSTANCE
        .get_or_init(|| Arc::new(MainThreadDispatcher::new(scheduler, clock)))
        .clone()
}

pub fn is_initialized() -> bool {
    INSTANCE.get().is_some()
}

/// The installed dispatcher.
///
/// # Panics
///
/// Panics if [`initialize`] has not run; using the dispatch operations before
/// initialization is a contract violation.
pub fn instance() -> Arc<MainThreadDispatcher> {
    INSTANCE
        .get()
        .expect("mainstay dispatcher not initialized")
        .clone()
}

/// Whether the calling thread is the installed main thread.
///
/// Answers `false` when no dispatcher is installed.
pub fn is_main_thread() -> bool {
    INSTANCE.get().is_some_and(|d| d.is_main_thread())
}

/// Whether the calling thread is the installed main thread or registered as a GC thread.
///
/// Usable before initialization: falls back to the GC classification alone, so workers in
/// processes that never install a dispatcher still get a clean answer.
pub fn is_main_or_gc_thread() -> bool {
    gc_role::current_gc_thread_kind().is_some() || is_main_thread()
}
