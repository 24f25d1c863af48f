//! Core task types for the taskpool workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! [`Task`] capability ("callable with an argument pointer and an index")
//! and its two concrete variants:
//!
//! - [`FnTask`]: a free function `fn(TaskArg, i32)`.
//! - [`MethodTask`]: a method `fn(&mut T, TaskArg, i32)` bound to an instance.
//!
//! Tasks are plain values. Where they live (the arena) and how they are
//! transported (the queue) is handled by `taskpool-arena` and
//! `taskpool-queue`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arg;
pub mod error;
pub mod free_fn;
pub mod method;
pub mod task;

pub use arg::TaskArg;
pub use error::TaskError;
pub use free_fn::{FnTask, TaskFn};
pub use method::{MethodFn, MethodTask};
pub use task::{Task, TaskKind};
