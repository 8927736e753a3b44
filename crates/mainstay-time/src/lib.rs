//! Host time modelling for the main-thread dispatch core.
//!
//! The drain loop budgets itself against a **monotonic host clock**. In production that clock
//! is [`StdHostClock`] (backed by `std::time::Instant`), while unit tests drive the time
//! budget deterministically via [`FakeHostClock`].

mod clock;

pub use clock::{FakeHostClock, HostClock, StdHostClock};
