//! Per-thread garbage-collector role classification.
//!
//! A small number of worker threads identify themselves as GC-capable so that other
//! subsystems can treat "main thread or GC thread" as one privileged-access set.
//! Registration is classification only; it grants no scheduling or locking behaviour.

use std::cell::Cell;

/// Which garbage-collector duty a registered thread performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcThreadKind {
    /// The collector's own controller thread.
    Main,
    /// A parallel marking/sweeping helper.
    Helper,
}

thread_local! {
    static GC_ROLE: Cell<Option<GcThreadKind>> = const { Cell::new(None) };
}

/// Classifies the calling thread as GC-capable.
///
/// Typically called once when the thread starts; calling again replaces the kind.
pub fn register_gc_thread(kind: GcThreadKind) {
    GC_ROLE.with(|slot| slot.set(Some(kind)));
}

/// The calling thread's GC classification, or `None` if it never registered.
///
/// Always answers: threads that never opted in get a clean `None`, not an error.
pub fn current_gc_thread_kind() -> Option<GcThreadKind> {
    GC_ROLE.with(|slot| slot.get())
}
