//! Free-function task variant.

use std::fmt;

use crate::arg::TaskArg;
use crate::error::TaskError;
use crate::task::{Task, TaskKind};

/// Signature of a free function that can be wrapped in a [`FnTask`].
pub type TaskFn = fn(TaskArg, i32);

/// A task that calls a free function.
#[derive(Clone, Copy)]
pub struct FnTask {
    func: TaskFn,
}

impl FnTask {
    /// Wrap a function.
    pub fn new(func: TaskFn) -> Self {
        Self { func }
    }

    /// Wrap a function that may be absent.
    ///
    /// Returns [`TaskError::NullCallable`] for `None`.
    pub fn try_from_raw(func: Option<TaskFn>) -> Result<Self, TaskError> {
        func.map(Self::new).ok_or(TaskError::NullCallable {
            kind: TaskKind::FreeFunction,
        })
    }

    /// The wrapped function.
    pub fn func(&self) -> TaskFn {
        self.func
    }
}

impl Task for FnTask {
    fn invoke(&mut self, arg: TaskArg, index: i32) -> bool {
        (self.func)(arg, index);
        true
    }

    fn kind(&self) -> TaskKind {
        TaskKind::FreeFunction
    }
}

impl fmt::Debug for FnTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnTask({:p})", self.func as *const ())
    }
}
