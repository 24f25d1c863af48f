//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use taskpool_core::TaskError;

use crate::config::ArenaConfig;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// No room left for the requested aligned region.
    ///
    /// The cursor is left where it was; earlier slots are unaffected.
    CapacityExceeded {
        /// Size of the request in bytes.
        requested: usize,
        /// Alignment of the request in bytes.
        align: usize,
        /// Bytes left between the cursor and the end of the buffer.
        remaining: usize,
        /// Total buffer capacity in bytes.
        capacity: usize,
    },
    /// The request needs a stricter alignment than the buffer guarantees.
    AlignmentTooLarge {
        /// Alignment of the request in bytes.
        align: usize,
        /// The arena's `buffer_align`.
        max: usize,
    },
    /// The configuration cannot describe a usable arena.
    InvalidConfig {
        /// What is wrong with it.
        reason: String,
    },
    /// The thread's shared arena already exists with different parameters.
    ConfigMismatch {
        /// Configuration the shared arena was built with.
        existing: ArenaConfig,
        /// Configuration the caller asked for.
        requested: ArenaConfig,
    },
    /// A reset was refused because task handles are still alive.
    LiveTasks {
        /// Number of handles not yet released.
        live: usize,
    },
    /// A handle was released through an arena that did not issue it.
    ForeignHandle,
    /// A task could not be built.
    Task(TaskError),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                align,
                remaining,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes (align {align}), \
                     {remaining} of {capacity} bytes remaining"
                )
            }
            Self::AlignmentTooLarge { align, max } => {
                write!(f, "alignment {align} exceeds arena buffer alignment {max}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::ConfigMismatch {
                existing,
                requested,
            } => {
                write!(
                    f,
                    "arena already initialized with {existing}, requested {requested}"
                )
            }
            Self::LiveTasks { live } => {
                write!(f, "cannot reset arena: {live} task handle(s) still alive")
            }
            Self::ForeignHandle => write!(f, "task handle was issued by a different arena"),
            Self::Task(err) => write!(f, "task construction failed: {err}"),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Task(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskError> for ArenaError {
    fn from(err: TaskError) -> Self {
        Self::Task(err)
    }
}
