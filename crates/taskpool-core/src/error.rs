//! Error types for task construction.

use std::error::Error;
use std::fmt;

use crate::task::TaskKind;

/// Errors raised while building a task from possibly-null parts.
///
/// Rust function pointers and references are never null, so these only
/// arise through the `try_from_raw` constructors that accept `Option`s
/// (e.g. values coming across an FFI boundary). The check runs in every
/// build profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskError {
    /// No callable was supplied.
    NullCallable {
        /// The variant that was being constructed.
        kind: TaskKind,
    },
    /// A bound-method task was given no instance to bind.
    NullInstance,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullCallable { kind } => write!(f, "{kind} task has no callable"),
            Self::NullInstance => write!(f, "bound-method task has no instance"),
        }
    }
}

impl Error for TaskError {}
