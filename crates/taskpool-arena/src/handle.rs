//! Owning handles to tasks constructed inside an arena.
//!
//! A [`TaskHandle`] is the only way to reach a task placed in a
//! [`TaskArena`]. It is neither `Clone` nor `Copy`, so a task has exactly one
//! owner, and it borrows the arena, so the arena cannot be reset or dropped
//! underneath it. Dropping the handle runs the task's destructor in place.

#![allow(unsafe_code)]

use std::fmt;
use std::ptr::{self, NonNull};

use taskpool_core::{Task, TaskArg, TaskKind};

use crate::arena::TaskArena;
use crate::slot::SlotInfo;

/// Exclusive handle to a task living in a [`TaskArena`] slot.
#[must_use = "dropping a TaskHandle destroys the task without running it"]
pub struct TaskHandle<'a> {
    /// Points into `arena`'s buffer at an initialised task.
    task: NonNull<dyn Task + 'a>,
    slot: SlotInfo,
    arena: &'a TaskArena,
}

impl<'a> TaskHandle<'a> {
    /// Wrap a task that was just written into `slot`.
    ///
    /// # Safety
    ///
    /// `task` must point to an initialised task inside `arena`'s buffer that
    /// no other handle refers to. The caller must already have counted it
    /// with `TaskArena::task_created`.
    pub(crate) unsafe fn from_raw(
        arena: &'a TaskArena,
        task: NonNull<dyn Task + 'a>,
        slot: SlotInfo,
    ) -> Self {
        Self { task, slot, arena }
    }

    /// Run the task with `arg` and `index`.
    pub fn invoke(&mut self, arg: TaskArg, index: i32) -> bool {
        // SAFETY: the handle uniquely owns an initialised task, and the
        // arena cannot rewind while the handle is alive.
        unsafe { self.task.as_mut() }.invoke(arg, index)
    }

    /// The variant of the task.
    pub fn kind(&self) -> TaskKind {
        // SAFETY: as in `invoke`; shared access through `&self`.
        unsafe { self.task.as_ref() }.kind()
    }

    /// Where the task sits in the arena buffer.
    pub fn slot(&self) -> SlotInfo {
        self.slot
    }

    /// The reset cycle the task was created in.
    pub fn generation(&self) -> u32 {
        self.slot.generation
    }

    /// Whether this handle was issued by `arena`.
    pub fn is_from(&self, arena: &TaskArena) -> bool {
        ptr::eq(self.arena, arena)
    }
}

impl Drop for TaskHandle<'_> {
    fn drop(&mut self) {
        // SAFETY: the task is initialised and owned by this handle; after
        // this call nothing refers to it again.
        unsafe { ptr::drop_in_place(self.task.as_ptr()) };
        self.arena.task_destroyed();
    }
}

impl fmt::Debug for TaskHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("kind", &self.kind())
            .field("slot", &self.slot)
            .finish()
    }
}

impl fmt::Display for TaskHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} task @ {}", self.kind(), self.slot)
    }
}
