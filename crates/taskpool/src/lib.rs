//! Taskpool: deferred tasks carved from a fixed-capacity arena.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all taskpool sub-crates. For most users, adding `taskpool` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use taskpool::prelude::*;
//!
//! #[derive(Default)]
//! struct Score {
//!     points: i32,
//! }
//!
//! impl Score {
//!     fn award(&mut self, _arg: TaskArg, index: i32) {
//!         self.points += index;
//!     }
//! }
//!
//! fn log_frame(arg: TaskArg, index: i32) {
//!     // SAFETY: the frame loop below always passes a `&mut Vec<i32>`.
//!     let frames = unsafe { arg.as_mut::<Vec<i32>>() }.unwrap();
//!     frames.push(index);
//! }
//!
//! let mut score = Score::default();
//! let mut frames: Vec<i32> = Vec::new();
//! let mut arena = TaskArena::new(ArenaConfig::new(32)).unwrap();
//! {
//!     let mut queue = TaskQueue::new(&arena);
//!     queue.push(make_fn_task(&arena, log_frame).unwrap());
//!     queue.push(make_method_task(&arena, &mut score, Score::award).unwrap());
//!
//!     while let Some(mut task) = queue.pop() {
//!         task.invoke(TaskArg::from_mut(&mut frames), 5);
//!         arena.release(task).unwrap();
//!     }
//! }
//! arena.reset();
//!
//! assert_eq!(frames, vec![5]);
//! assert_eq!(score.points, 5);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `taskpool-core` | `Task` trait, `FnTask`, `MethodTask`, `TaskArg` |
//! | [`arena`] | `taskpool-arena` | `TaskArena`, `TaskHandle`, factory helpers, shared arena |
//! | [`queue`] | `taskpool-queue` | `TaskQueue` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Task trait and variants (`taskpool-core`).
pub use taskpool_core as types;

/// Arena allocation, handles and the thread's shared arena (`taskpool-arena`).
///
/// [`arena::global`] holds the lazily created per-thread arena.
pub use taskpool_arena as arena;

/// FIFO transport for task handles (`taskpool-queue`).
pub use taskpool_queue as queue;

/// Common imports for typical taskpool usage.
///
/// ```rust
/// use taskpool::prelude::*;
/// ```
pub mod prelude {
    // Tasks
    pub use taskpool_core::{FnTask, MethodFn, MethodTask, Task, TaskArg, TaskFn, TaskKind};

    // Arena
    pub use taskpool_arena::{
        destroy_task, make_fn_task, make_method_task, ArenaConfig, TaskArena, TaskHandle,
    };

    // Errors
    pub use taskpool_arena::ArenaError;
    pub use taskpool_core::TaskError;

    // Queue
    pub use taskpool_queue::TaskQueue;
}
