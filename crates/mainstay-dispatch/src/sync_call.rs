//! Synchronous cross-thread calls: run a closure on the main thread and block until it
//! completes, built entirely from the asynchronous dispatch primitive.

use std::sync::{Arc, Condvar, Mutex};

use thiserror::Error;

use crate::dispatcher::MainThreadDispatcher;

/// Why a synchronous call did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyncCallError {
    /// The dispatcher was already shut down when the call was made.
    #[error("dispatcher is shut down")]
    ShutDown,
    /// The work was destroyed without completing: discarded at shutdown, or torn down by a
    /// panic while it ran.
    #[error("queued work was discarded before completing")]
    Discarded,
}

/// Call-scoped completion state: a lock domain fully independent of the queue mutex.
type Completion<R> = Arc<(Mutex<Option<Result<R, SyncCallError>>>, Condvar)>;

/// Wakes the waiting caller with [`SyncCallError::Discarded`] if the wrapper task is
/// destroyed without having published a result.
struct CompletionGuard<R> {
    completion: Completion<R>,
}

impl<R> CompletionGuard<R> {
    fn publish(&self, result: Result<R, SyncCallError>) {
        let (slot, condvar) = &*self.completion;
        let mut slot = slot.lock().unwrap();
        if slot.is_none() {
            *slot = Some(result);
            condvar.notify_one();
        }
    }
}

impl<R> Drop for CompletionGuard<R> {
    fn drop(&mut self) {
        self.publish(Err(SyncCallError::Discarded));
    }
}

impl MainThreadDispatcher {
    /// Runs `f` on the main thread and blocks until it completes, returning its value.
    ///
    /// On the main thread itself, `f` runs inline and the queue is never touched, so there
    /// is no deadlock risk. The inline path runs even after shutdown.
    ///
    /// From any other thread the call blocks until a future [`drain`] executes `f`. The
    /// main thread must therefore eventually drain: never call this from code reachable
    /// while the main thread is itself blocked on work destined for this dispatcher, or
    /// both threads wait forever. If the dispatcher is already shut down the call fails
    /// fast with [`SyncCallError::ShutDown`]; if the queued work is discarded before it
    /// runs, the caller is woken with [`SyncCallError::Discarded`].
    ///
    /// [`drain`]: MainThreadDispatcher::drain
    pub fn call_and_wait<R, F>(&self, f: F) -> Result<R, SyncCallError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_main_thread() {
            return Ok(f());
        }
        if self.is_shut_down() {
            return Err(SyncCallError::ShutDown);
        }

        let completion: Completion<R> = Arc::new((Mutex::new(None), Condvar::new()));
        let guard = CompletionGuard {
            completion: completion.clone(),
        };
        self.dispatch(move || {
            // The queue lock was released before this wrapper ran; only the call-scoped
            // lock is taken to publish. If `f` panics, `guard`'s drop publishes instead.
            let value = f();
            guard.publish(Ok(value));
        });

        let (slot, condvar) = &*completion;
        let mut slot = slot.lock().unwrap();
        loop {
            // Predicate re-check loop: spurious wake-ups leave the slot empty.
            if let Some(result) = slot.take() {
                return result;
            }
            slot = condvar.wait(slot).unwrap();
        }
    }
}
