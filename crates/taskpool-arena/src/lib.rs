//! Fixed-capacity bump arena for deferred tasks.
//!
//! A [`TaskArena`] owns a single byte buffer sized once from an
//! [`ArenaConfig`] (`max_tasks * max_task_size`). Tasks of differently
//! sized, differently aligned types are carved from it by a monotonically
//! advancing cursor. There is no per-task reclamation: releasing a task runs
//! its destructor, and the bytes come back only when the whole arena is
//! reset. Apart from `TaskArg`'s accessors in `taskpool-core`, this crate
//! holds all of the workspace's `unsafe` code (`raw`, `handle`, `factory`).
//!
//! # Lifecycle per cycle
//!
//! ```text
//! make_task ─► TaskHandle ─► (queue) ─► invoke ─► release
//!                                                   │
//!                 reset / try_reset ◄───────────────┘ (all handles gone)
//! ```
//!
//! Handles borrow the arena, so [`TaskArena::reset`] (which takes
//! `&mut self`) cannot run while any task is alive. Where the arena is
//! shared, [`TaskArena::try_reset`] performs the same check at runtime.
//!
//! # Example
//!
//! ```rust
//! use taskpool_arena::{ArenaConfig, TaskArena};
//! use taskpool_core::{FnTask, TaskArg};
//!
//! fn greet(_arg: TaskArg, index: i32) {
//!     assert_eq!(index, 3);
//! }
//!
//! let mut arena = TaskArena::new(ArenaConfig::new(16)).unwrap();
//! let mut task = arena.make_task(FnTask::new(greet)).unwrap();
//! assert!(task.invoke(TaskArg::null(), 3));
//! arena.release(task).unwrap();
//! arena.reset();
//! assert_eq!(arena.used(), 0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod factory;
pub mod global;
pub mod handle;
mod raw;
pub mod slot;

// Public re-exports for the primary API surface.
pub use arena::{ArenaStats, TaskArena};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use factory::{destroy_task, make_fn_task, make_method_task};
pub use handle::TaskHandle;
pub use slot::{RawSlot, SlotInfo};
