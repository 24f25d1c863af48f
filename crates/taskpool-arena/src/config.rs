//! Arena configuration parameters.

use std::fmt;
use std::mem::size_of;

use taskpool_core::{FnTask, MethodTask};

use crate::error::ArenaError;

/// Configuration for a [`TaskArena`](crate::TaskArena).
///
/// Fixes the arena's byte capacity as `max_tasks * max_task_size`.
/// Validated at arena construction; the arena never grows afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Maximum number of tasks alive between two resets.
    ///
    /// Default: 100.
    pub max_tasks: usize,

    /// Bytes reserved per task slot.
    ///
    /// Must be at least the size of the largest task type the host will
    /// construct. Default: the larger of the two built-in variants.
    pub max_task_size: usize,

    /// Alignment of the backing buffer in bytes. Must be a power of two.
    ///
    /// Also the largest alignment a task may require; stricter requests
    /// are refused, so every arena with the same configuration hands out
    /// the same offsets for the same requests. Default: 16.
    pub buffer_align: usize,
}

impl ArenaConfig {
    /// Default per-cycle task budget.
    pub const DEFAULT_MAX_TASKS: usize = 100;

    /// Size of the largest built-in task variant.
    pub const DEFAULT_MAX_TASK_SIZE: usize = max_usize(
        size_of::<FnTask>(),
        size_of::<MethodTask<'static, ()>>(),
    );

    /// Default buffer alignment.
    pub const DEFAULT_BUFFER_ALIGN: usize = 16;

    /// Create a config for `max_tasks` slots of the default size.
    pub fn new(max_tasks: usize) -> Self {
        Self {
            max_tasks,
            max_task_size: Self::DEFAULT_MAX_TASK_SIZE,
            buffer_align: Self::DEFAULT_BUFFER_ALIGN,
        }
    }

    /// Create a config with an explicit slot size.
    pub fn with_slot_size(max_tasks: usize, max_task_size: usize) -> Self {
        Self {
            max_task_size,
            ..Self::new(max_tasks)
        }
    }

    /// Create a config whose slots fit `n` values of `T`.
    pub fn for_tasks<T>(n: usize) -> Self {
        Self::with_slot_size(n, size_of::<T>().max(1))
    }

    /// Total buffer size in bytes, or `None` on overflow.
    pub fn capacity_bytes(&self) -> Option<usize> {
        self.max_tasks.checked_mul(self.max_task_size)
    }

    /// Check that the configuration describes a buildable arena.
    pub fn validate(&self) -> Result<(), ArenaError> {
        let reason = if self.max_tasks == 0 {
            InvalidReason::ZeroTasks
        } else if self.max_task_size == 0 {
            InvalidReason::ZeroSlotSize
        } else if !self.buffer_align.is_power_of_two() {
            InvalidReason::BadAlign(self.buffer_align)
        } else if self.capacity_bytes().is_none_or(|c| c > isize::MAX as usize) {
            InvalidReason::Overflow
        } else {
            return Ok(());
        };
        Err(ArenaError::InvalidConfig {
            reason: reason.to_string(),
        })
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_TASKS)
    }
}

impl fmt::Display for ArenaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tasks x {} bytes (align {})",
            self.max_tasks, self.max_task_size, self.buffer_align
        )
    }
}

enum InvalidReason {
    ZeroTasks,
    ZeroSlotSize,
    BadAlign(usize),
    Overflow,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTasks => write!(f, "max_tasks must be at least 1"),
            Self::ZeroSlotSize => write!(f, "max_task_size must be at least 1"),
            Self::BadAlign(a) => write!(f, "buffer_align {a} is not a power of two"),
            Self::Overflow => write!(f, "max_tasks * max_task_size overflows"),
        }
    }
}

const fn max_usize(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}
