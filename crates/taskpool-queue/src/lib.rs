//! FIFO transport for arena-allocated tasks.
//!
//! [`TaskQueue`] orders [`TaskHandle`]s between the code that creates tasks
//! and the code that runs them. It never builds or destroys a task itself:
//! handles go in with [`push`](TaskQueue::push) and come out, in the same
//! order, with [`pop`](TaskQueue::pop). Insertion order is invocation order.
//!
//! ```rust
//! use taskpool_arena::{make_fn_task, ArenaConfig, TaskArena};
//! use taskpool_core::TaskArg;
//! use taskpool_queue::TaskQueue;
//!
//! fn tick(_arg: TaskArg, _index: i32) {}
//!
//! let arena = TaskArena::new(ArenaConfig::default()).unwrap();
//! let mut queue = TaskQueue::new(&arena);
//! queue.push(make_fn_task(&arena, tick).unwrap());
//! while let Some(mut task) = queue.pop() {
//!     task.invoke(TaskArg::null(), 0);
//!     arena.release(task).unwrap();
//! }
//! assert!(queue.is_empty());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::fmt;

use taskpool_arena::{global, ArenaConfig, ArenaError, TaskArena, TaskHandle};
use tracing::trace;

/// Queue of task handles awaiting invocation.
///
/// The queue borrows the arena its tasks live in. Dropping a queue that
/// still holds handles destroys those tasks.
pub struct TaskQueue<'a> {
    arena: &'a TaskArena,
    tasks: VecDeque<TaskHandle<'a>>,
}

impl<'a> TaskQueue<'a> {
    /// Create an empty queue for tasks from `arena`.
    ///
    /// Storage for the arena's whole task budget is reserved up front, so
    /// pushes within that budget never reallocate.
    pub fn new(arena: &'a TaskArena) -> Self {
        Self {
            arena,
            tasks: VecDeque::with_capacity(arena.config().max_tasks),
        }
    }

    /// Append a handle at the tail.
    ///
    /// The handle must come from this queue's arena; debug builds assert it.
    pub fn push(&mut self, task: TaskHandle<'a>) {
        debug_assert!(
            task.is_from(self.arena),
            "task handle pushed onto a queue for a different arena"
        );
        trace!(slot = %task.slot(), len = self.tasks.len() + 1, "task queued");
        self.tasks.push_back(task);
    }

    /// Remove the handle at the head, or `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<TaskHandle<'a>> {
        let task = self.tasks.pop_front()?;
        trace!(slot = %task.slot(), len = self.tasks.len(), "task dequeued");
        Some(task)
    }

    /// Whether no handles are queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of queued handles.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// The arena the queued tasks live in.
    pub fn arena(&self) -> &'a TaskArena {
        self.arena
    }

    /// Remove every handle, head first.
    pub fn drain(&mut self) -> impl Iterator<Item = TaskHandle<'a>> + '_ {
        self.tasks.drain(..)
    }
}

impl TaskQueue<'static> {
    /// Create a queue on the thread's shared arena.
    ///
    /// The shared arena is initialized with [`ArenaConfig::default`] if no
    /// one has done so yet; otherwise the existing arena is reused as is.
    pub fn with_global() -> Result<Self, ArenaError> {
        let arena = match global::get() {
            Some(arena) => arena,
            None => global::initialize(ArenaConfig::default())?,
        };
        Ok(Self::new(arena))
    }
}

impl fmt::Debug for TaskQueue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.tasks.len())
            .field("arena", self.arena)
            .finish()
    }
}
