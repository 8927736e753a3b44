use std::collections::VecDeque;
use std::sync::Mutex;

/// An owned, single-invocation unit of main-thread work.
///
/// Moved into the queue on dispatch and consumed (executed, then destroyed) by the drain
/// loop. Never copied; owned by exactly one of producer, queue, or consumer at any instant.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Unbounded multi-producer FIFO drained by the main thread.
///
/// The lock is held only for the O(1) push/pop; tasks never execute or drop under it. The
/// shut-down flag lives inside the same critical section as the deque, so a push can never
/// land in a queue that a concurrent shut-down has already cleared.
pub(crate) struct TaskQueue {
    inner: Mutex<QueueState>,
}

struct QueueState {
    tasks: VecDeque<Task>,
    shut_down: bool,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                shut_down: false,
            }),
        }
    }

    /// Appends `task`, returning whether the queue was empty immediately before the insert.
    ///
    /// The emptiness check and the insert share one critical section, so producers racing
    /// onto an empty queue observe exactly one empty -> non-empty transition between them.
    ///
    /// After [`shut_down`](Self::shut_down) the task is handed back unqueued; the caller
    /// drops it with the lock already released.
    pub(crate) fn push(&self, task: Task) -> Result<bool, Task> {
        let mut state = self.inner.lock().unwrap();
        if state.shut_down {
            return Err(task);
        }
        let was_empty = state.tasks.is_empty();
        state.tasks.push_back(task);
        Ok(was_empty)
    }

    /// Takes the front task, or `None` when the queue is empty.
    pub(crate) fn pop(&self) -> Option<Task> {
        self.inner.lock().unwrap().tasks.pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().tasks.is_empty()
    }

    pub(crate) fn is_shut_down(&self) -> bool {
        self.inner.lock().unwrap().shut_down
    }

    /// Marks the queue shut down and removes every queued task, in one critical section:
    /// no push can observe the cleared queue without also observing the flag. The caller
    /// drops the returned batch with the lock already released.
    pub(crate) fn shut_down(&self) -> VecDeque<Task> {
        let mut state = self.inner.lock().unwrap();
        state.shut_down = true;
        std::mem::take(&mut state.tasks)
    }
}
