mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::CountingScheduler;
use mainstay_dispatch::{MainThreadDispatcher, SyncCallError};
use mainstay_time::FakeHostClock;

fn dispatcher_with_counter() -> (Arc<MainThreadDispatcher>, Arc<CountingScheduler>) {
    let scheduler = Arc::new(CountingScheduler::new());
    let dispatcher = Arc::new(MainThreadDispatcher::new(
        scheduler.clone(),
        Arc::new(FakeHostClock::new()),
    ));
    (dispatcher, scheduler)
}

/// Spins until the worker's wrapper task has been enqueued (its dispatch signals the
/// scheduler exactly once on the empty queue).
fn wait_for_enqueue(scheduler: &CountingScheduler, at_least: usize) {
    while scheduler.requests() < at_least {
        thread::yield_now();
    }
}

#[test]
fn call_on_the_main_thread_runs_inline_with_no_scheduling() {
    let (dispatcher, scheduler) = dispatcher_with_counter();

    let counter = Arc::new(AtomicUsize::new(0));
    let inner = counter.clone();
    let doubled = dispatcher
        .call_and_wait(move || {
            inner.fetch_add(1, Ordering::SeqCst);
            21 * 2
        })
        .unwrap();

    // Executed before the call returned, with zero dispatch-hook invocations.
    assert_eq!(doubled, 42);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.requests(), 0);
}

#[test]
fn call_from_a_worker_blocks_until_the_main_thread_drains() {
    // The test thread constructs the dispatcher and plays the main thread.
    let (dispatcher, scheduler) = dispatcher_with_counter();

    let executed = Arc::new(AtomicBool::new(false));
    let returned = Arc::new(AtomicBool::new(false));

    let worker = {
        let dispatcher = dispatcher.clone();
        let executed = executed.clone();
        let returned = returned.clone();
        thread::spawn(move || {
            let inner = executed.clone();
            let value = dispatcher.call_and_wait(move || {
                inner.store(true, Ordering::SeqCst);
                7
            });
            // The work ran strictly before the call returned.
            assert!(executed.load(Ordering::SeqCst));
            returned.store(true, Ordering::SeqCst);
            value
        })
    };

    wait_for_enqueue(&scheduler, 1);

    // The wrapper is queued but not drained; the worker must still be blocked.
    thread::sleep(Duration::from_millis(20));
    assert!(!executed.load(Ordering::SeqCst));
    assert!(!returned.load(Ordering::SeqCst));

    dispatcher.drain();
    assert!(executed.load(Ordering::SeqCst));

    assert_eq!(worker.join().unwrap(), Ok(7));
    assert!(returned.load(Ordering::SeqCst));
}

#[test]
fn call_after_shutdown_fails_fast_instead_of_blocking() {
    let (dispatcher, _scheduler) = dispatcher_with_counter();
    dispatcher.shutdown();

    let from_worker = {
        let dispatcher = dispatcher.clone();
        thread::spawn(move || dispatcher.call_and_wait(|| 1)).join().unwrap()
    };
    assert_eq!(from_worker, Err(SyncCallError::ShutDown));

    // The inline main-thread path still executes: it never touches the queue.
    assert_eq!(dispatcher.call_and_wait(|| 2), Ok(2));
}

#[test]
fn shutdown_racing_a_sync_call_never_strands_the_caller() {
    // Line both sides up on a barrier and let them race. Depending on the interleaving the
    // worker's wrapper is rejected by the shut-down queue, discarded by the shutdown's
    // queue clear, or refused up front; every path must return an error rather than leave
    // the worker blocked on a wrapper nothing will ever run or drop.
    for _ in 0..200 {
        let (dispatcher, _scheduler) = dispatcher_with_counter();
        let start = Arc::new(std::sync::Barrier::new(2));

        let worker = {
            let dispatcher = dispatcher.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                dispatcher.call_and_wait(|| 3)
            })
        };

        start.wait();
        dispatcher.shutdown();

        let result = worker.join().unwrap();
        assert!(
            matches!(
                result,
                Err(SyncCallError::ShutDown) | Err(SyncCallError::Discarded)
            ),
            "racing sync call produced {result:?}"
        );
    }
}

#[test]
fn discarding_a_queued_call_wakes_the_blocked_caller() {
    let (dispatcher, scheduler) = dispatcher_with_counter();

    let worker = {
        let dispatcher = dispatcher.clone();
        thread::spawn(move || dispatcher.call_and_wait(|| 9))
    };

    // Once the scheduler has been signalled the wrapper is in the queue, so shutdown's
    // queue clear is what destroys it.
    wait_for_enqueue(&scheduler, 1);
    dispatcher.shutdown();

    assert_eq!(worker.join().unwrap(), Err(SyncCallError::Discarded));
}
