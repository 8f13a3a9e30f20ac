//! Deferred task scheduling.
//!
//! The controller only ever needs "run this after the current event turn";
//! hosts provide that through [`Scheduler`]. [`ManualScheduler`] queues tasks
//! until the host (or a test) calls [`ManualScheduler::tick`] or advances its
//! clock with [`ManualScheduler::advance`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Identifies a scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks asynchronously, never within the call that scheduled them.
pub trait Scheduler {
    /// Schedule `task` to run as soon as possible after the current turn.
    fn defer(&self, task: Task) -> TaskId;

    /// Cancel a task. Cancelling a task that already ran is a no-op.
    fn cancel(&self, id: TaskId);
}

/// Scheduler driven explicitly by its owner.
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<u64>,
    /// Milliseconds advanced so far.
    now: Cell<f64>,
    queue: RefCell<VecDeque<(TaskId, Task)>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("next_id", &self.next_id.get())
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the tasks queued before this call, in scheduling order.
    ///
    /// Tasks scheduled while ticking wait for the next tick.
    /// Returns the number of tasks run.
    pub fn tick(&self) -> usize {
        let due: Vec<(TaskId, Task)> = self.queue.borrow_mut().drain(..).collect();
        let count = due.len();
        for (_, task) in due {
            task();
        }
        count
    }

    /// Tick until no task is pending.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        while self.pending() > 0 {
            total += self.tick();
        }
        total
    }

    /// Move the clock forward by `ms` and run every task that became due.
    ///
    /// Deferred tasks have no delay, so this includes tasks scheduled by other
    /// tasks along the way. Negative or non-finite steps only run due tasks.
    pub fn advance(&self, ms: f64) -> usize {
        if ms.is_finite() && ms > 0.0 {
            self.now.set(self.now.get() + ms);
        }
        self.run_until_idle()
    }

    /// Milliseconds the clock has been advanced.
    pub fn elapsed(&self) -> f64 {
        self.now.get()
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Task) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.queue.borrow_mut().push_back((id, task));
        id
    }

    fn cancel(&self, id: TaskId) {
        self.queue.borrow_mut().retain(|(queued, _)| *queued != id);
    }
}

/// A boolean whose updates land one scheduler turn later.
///
/// Each update cancels the previous pending one, so the last scheduled value
/// wins and a value superseded before its turn is never observed.
pub struct DeferredFlag {
    value: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<TaskId>>>,
    scheduler: Rc<dyn Scheduler>,
}

impl fmt::Debug for DeferredFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredFlag")
            .field("value", &self.value.get())
            .field("pending", &self.pending.get())
            .finish()
    }
}

impl DeferredFlag {
    pub fn new(scheduler: Rc<dyn Scheduler>, initial: bool) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
            pending: Rc::new(Cell::new(None)),
            scheduler,
        }
    }

    /// Current value, ignoring any pending update.
    pub fn get(&self) -> bool {
        self.value.get()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Replace any pending update with one setting `value` on the next turn.
    pub fn set_deferred(&self, value: bool) {
        self.cancel();
        let flag = Rc::clone(&self.value);
        let pending = Rc::clone(&self.pending);
        let id = self.scheduler.defer(Box::new(move || {
            flag.set(value);
            pending.set(None);
        }));
        self.pending.set(Some(id));
    }

    /// Drop the pending update, if any.
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Cancel any pending update and set `value` immediately.
    pub fn reset(&self, value: bool) {
        self.cancel();
        self.value.set(value);
    }
}

impl Drop for DeferredFlag {
    fn drop(&mut self) {
        self.cancel();
    }
}
