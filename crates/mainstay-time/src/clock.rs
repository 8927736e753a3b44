use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic time source, in nanoseconds since an arbitrary origin.
///
/// `now_ns` never decreases. Callers only ever compare differences, so the origin is
/// implementation-defined.
pub trait HostClock: Send + Sync {
    fn now_ns(&self) -> u64;
}

/// Production clock backed by `std::time::Instant`.
pub struct StdHostClock {
    origin: Instant,
}

impl StdHostClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdHostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for StdHostClock {
    fn now_ns(&self) -> u64 {
        // u64 nanoseconds is ~584 years; saturate rather than wrap if the host reports more.
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Shared freely across threads; typically advanced by the thread simulating the host run
/// loop, from inside the work items whose execution time the test is modelling.
#[derive(Debug, Default)]
pub struct FakeHostClock {
    now_ns: AtomicU64,
}

impl FakeHostClock {
    pub fn new() -> Self {
        Self {
            now_ns: AtomicU64::new(0),
        }
    }

    /// Advances the clock by `by`.
    ///
    /// # Panics
    ///
    /// Panics if advancing would overflow `u64` nanoseconds.
    pub fn advance(&self, by: Duration) {
        let ns = u64::try_from(by.as_nanos()).expect("fake clock advance overflows u64");
        let prev = self.now_ns.fetch_add(ns, Ordering::SeqCst);
        assert!(
            prev.checked_add(ns).is_some(),
            "fake clock overflowed u64::MAX"
        );
    }
}

impl HostClock for FakeHostClock {
    fn now_ns(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
}
