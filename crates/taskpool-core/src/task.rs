//! The [`Task`] capability trait.

use std::fmt;

use crate::arg::TaskArg;

/// Which concrete variant a task is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// A free function, see [`FnTask`](crate::FnTask).
    FreeFunction,
    /// A method bound to an instance, see [`MethodTask`](crate::MethodTask).
    BoundMethod,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeFunction => write!(f, "free-function"),
            Self::BoundMethod => write!(f, "bound-method"),
        }
    }
}

/// A deferred unit of work callable with `(argument, index)`.
///
/// Implementors are constructed now and invoked later, usually after being
/// moved into a `TaskArena` slot and carried through a `TaskQueue`.
/// The index is an opaque integer chosen by the caller (a slot number,
/// an entity id, a frame counter).
pub trait Task {
    /// Run the task.
    ///
    /// Returns `true` when the callable ran. Both built-in variants always
    /// succeed; `false` is reserved for implementors that can decline.
    fn invoke(&mut self, arg: TaskArg, index: i32) -> bool;

    /// The variant of this task.
    fn kind(&self) -> TaskKind;
}
