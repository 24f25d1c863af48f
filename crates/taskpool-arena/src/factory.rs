//! Constructing tasks in arena memory and tearing them down again.
//!
//! [`TaskArena::make_task`] is the placement path: it reserves a slot sized
//! and aligned for the concrete task type, moves the task into it and hands
//! back a type-erased [`TaskHandle`]. [`destroy_task`] is the matching
//! teardown for callers that keep handles in `Option` slots.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use taskpool_core::{FnTask, MethodFn, MethodTask, Task, TaskFn};

use crate::arena::TaskArena;
use crate::error::ArenaError;
use crate::handle::TaskHandle;

impl TaskArena {
    /// Move `task` into a fresh slot and return a handle to it.
    ///
    /// Fails with [`ArenaError::CapacityExceeded`] when the arena has no
    /// room for `T`; `task` is dropped in that case.
    pub fn make_task<'a, T: Task + 'a>(&'a self, task: T) -> Result<TaskHandle<'a>, ArenaError> {
        let slot = self.allocate::<T>()?;
        let ptr: NonNull<T> = slot.cast();
        // SAFETY: the slot is in bounds, sized and aligned for `T`, and was
        // carved past every live slot, so nothing else refers to it.
        unsafe { ptr.as_ptr().write(task) };
        self.task_created();
        // SAFETY: `ptr` now holds an initialised `T` owned by nobody else,
        // and it has just been counted.
        Ok(unsafe { TaskHandle::from_raw(self, ptr, slot.info()) })
    }
}

/// Build a [`FnTask`] for `func` inside `arena`.
pub fn make_fn_task(arena: &TaskArena, func: TaskFn) -> Result<TaskHandle<'_>, ArenaError> {
    arena.make_task(FnTask::new(func))
}

/// Build a [`MethodTask`] binding `method` to `instance` inside `arena`.
pub fn make_method_task<'a, T>(
    arena: &'a TaskArena,
    instance: &'a mut T,
    method: MethodFn<T>,
) -> Result<TaskHandle<'a>, ArenaError> {
    arena.make_task(MethodTask::new(instance, method))
}

/// Release the handle in `slot` and leave `None` behind.
///
/// An empty slot is left alone, so destroying twice is harmless.
pub fn destroy_task(arena: &TaskArena, slot: &mut Option<TaskHandle<'_>>) -> Result<(), ArenaError> {
    match slot.take() {
        Some(handle) => arena.release(handle),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use taskpool_core::{TaskArg, TaskError, TaskKind};

    use super::*;
    use crate::config::ArenaConfig;

    fn noop(_: TaskArg, _: i32) {}

    fn small_arena(tasks: usize) -> TaskArena {
        TaskArena::new(ArenaConfig::new(tasks)).unwrap()
    }

    #[test]
    fn fn_task_lands_at_cursor() {
        let arena = small_arena(4);
        let a = make_fn_task(&arena, noop).unwrap();
        let b = make_fn_task(&arena, noop).unwrap();
        assert_eq!(a.slot().offset(), 0);
        assert_eq!(b.slot().offset(), std::mem::size_of::<FnTask>());
        assert_eq!(arena.live_tasks(), 2);
    }

    #[test]
    fn default_budget_holds_max_tasks_of_either_variant() {
        fn touch(_: &mut u8, _: TaskArg, _: i32) {}

        let arena = small_arena(4);
        let mut bytes = [0u8; 4];
        let [b0, b1, b2, b3] = &mut bytes;
        let handles = vec![
            make_method_task(&arena, b0, touch).unwrap(),
            make_method_task(&arena, b1, touch).unwrap(),
            make_method_task(&arena, b2, touch).unwrap(),
            make_method_task(&arena, b3, touch).unwrap(),
        ];
        assert!(matches!(
            make_fn_task(&arena, noop),
            Err(ArenaError::CapacityExceeded { .. })
        ));
        for h in &handles {
            assert_eq!(h.kind(), TaskKind::BoundMethod);
        }
    }

    #[test]
    fn exhaustion_propagates_and_keeps_cursor() {
        let arena = TaskArena::new(ArenaConfig::for_tasks::<FnTask>(1)).unwrap();
        let _a = make_fn_task(&arena, noop).unwrap();
        let used = arena.used();
        let err = make_fn_task(&arena, noop).unwrap_err();
        assert!(matches!(err, ArenaError::CapacityExceeded { .. }));
        assert_eq!(arena.used(), used);
        assert_eq!(arena.live_tasks(), 1);
    }

    #[test]
    fn release_does_not_reclaim_bytes() {
        let arena = small_arena(2);
        let a = make_fn_task(&arena, noop).unwrap();
        let a_slot = a.slot();
        arena.release(a).unwrap();
        let used_after_release = arena.used();
        assert_eq!(used_after_release, a_slot.end());

        let b = make_fn_task(&arena, noop).unwrap();
        assert!(!b.slot().overlaps(&a_slot));
        assert!(b.slot().offset() >= a_slot.end());
    }

    #[test]
    fn destroy_task_clears_slot_and_is_idempotent() {
        let arena = small_arena(2);
        let mut slot = Some(make_fn_task(&arena, noop).unwrap());
        destroy_task(&arena, &mut slot).unwrap();
        assert!(slot.is_none());
        assert_eq!(arena.live_tasks(), 0);
        destroy_task(&arena, &mut slot).unwrap();
        assert!(slot.is_none());
    }

    #[test]
    fn release_through_foreign_arena_is_reported() {
        let a = small_arena(2);
        let b = small_arena(2);
        let handle = make_fn_task(&a, noop).unwrap();
        assert_eq!(b.release(handle), Err(ArenaError::ForeignHandle));
        // The task was still destroyed by the arena that issued it.
        assert_eq!(a.live_tasks(), 0);
        assert_eq!(b.live_tasks(), 0);
    }

    #[test]
    fn try_reset_refuses_while_tasks_live() {
        let arena = small_arena(2);
        let handle = make_fn_task(&arena, noop).unwrap();
        assert_eq!(arena.try_reset(), Err(ArenaError::LiveTasks { live: 1 }));
        arena.release(handle).unwrap();
        arena.try_reset().unwrap();
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn reset_after_forgotten_handle_clears_live_count() {
        let mut arena = small_arena(2);
        std::mem::forget(make_fn_task(&arena, noop).unwrap());
        assert_eq!(arena.live_tasks(), 1);
        arena.reset();
        assert_eq!(arena.live_tasks(), 0);
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn null_parts_surface_as_arena_errors() {
        let arena = small_arena(1);
        let err: ArenaError = FnTask::try_from_raw(None)
            .map_err(ArenaError::from)
            .and_then(|task| arena.make_task(task).map(drop))
            .unwrap_err();
        assert_eq!(
            err,
            ArenaError::Task(TaskError::NullCallable {
                kind: TaskKind::FreeFunction
            })
        );
        assert_eq!(arena.used(), 0);
    }
}
