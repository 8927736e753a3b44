//! Facade over the mainstay workspace: main-thread dispatch plus the host time source its
//! drain budget is measured against.

pub use mainstay_dispatch::{
    current_gc_thread_kind, process, register_gc_thread, DrainScheduler, GcThreadKind,
    MainThreadDispatcher, SyncCallError, Task, DEFAULT_DRAIN_BUDGET,
};
pub use mainstay_time::{FakeHostClock, HostClock, StdHostClock};
