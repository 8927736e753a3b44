use std::sync::atomic::{AtomicUsize, Ordering};

use mainstay_dispatch::DrainScheduler;

/// Records schedule requests instead of arranging any drain; tests drain by hand and
/// assert on the request count.
#[derive(Default)]
pub struct CountingScheduler {
    requests: AtomicUsize,
}

impl CountingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl DrainScheduler for CountingScheduler {
    fn schedule_drain(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}
