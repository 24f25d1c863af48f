//! The fixed-capacity bump arena.
//!
//! [`TaskArena`] owns one byte buffer of `max_tasks * max_task_size` bytes
//! and serves aligned regions from it by advancing a cursor. Individual
//! regions are never reclaimed: releasing a task runs its destructor but
//! leaves its bytes spent until the next reset rewinds the cursor to zero.
//!
//! All bookkeeping lives in `Cell`s, so allocation works through `&self`
//! and handles can borrow the arena while further tasks are carved from
//! it. The same `Cell`s make the arena `!Sync`: one thread owns it.

use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace, warn};

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::TaskHandle;
use crate::raw::RawBuffer;
use crate::slot::{RawSlot, SlotInfo};

/// Point-in-time counters for a [`TaskArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// Buffer size in bytes.
    pub capacity: usize,
    /// Bytes consumed since the last reset, alignment padding included.
    pub used: usize,
    /// Bytes still available.
    pub remaining: usize,
    /// Number of resets performed.
    pub generation: u32,
    /// Task handles issued and not yet released.
    pub live_tasks: usize,
    /// Allocations granted since the last reset.
    pub allocations: usize,
    /// Highest cursor position ever reached.
    pub high_water: usize,
}

/// Fixed-capacity bump allocator for task objects.
pub struct TaskArena {
    buffer: RawBuffer,
    config: ArenaConfig,
    /// Next free byte offset. Never exceeds `buffer.len()`.
    cursor: Cell<usize>,
    generation: Cell<u32>,
    live: Cell<usize>,
    allocations: Cell<usize>,
    high_water: Cell<usize>,
}

impl TaskArena {
    /// Build an arena, allocating its whole buffer up front.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let capacity = config.capacity_bytes().unwrap_or_default();
        let buffer =
            RawBuffer::new(capacity, config.buffer_align).ok_or_else(|| {
                ArenaError::InvalidConfig {
                    reason: format!("no valid layout for {config}"),
                }
            })?;
        debug!(%config, capacity, "task arena created");
        Ok(Self {
            buffer,
            config,
            cursor: Cell::new(0),
            generation: Cell::new(0),
            live: Cell::new(0),
            allocations: Cell::new(0),
            high_water: Cell::new(0),
        })
    }

    /// Reserve an uninitialised region sized and aligned for `T`.
    pub fn allocate<T>(&self) -> Result<RawSlot<'_>, ArenaError> {
        self.allocate_layout(Layout::new::<T>())
    }

    /// Reserve an uninitialised region for an arbitrary layout.
    ///
    /// The region starts at the first offset at or after the cursor that
    /// satisfies `layout.align()`. If it would run past the end of the
    /// buffer the call fails with [`ArenaError::CapacityExceeded`] and the
    /// cursor does not move.
    ///
    /// Alignments above the config's `buffer_align` are refused with
    /// [`ArenaError::AlignmentTooLarge`]: offsets would then depend on the
    /// buffer's address and differ between otherwise identical cycles.
    pub fn allocate_layout(&self, layout: Layout) -> Result<RawSlot<'_>, ArenaError> {
        let max_align = self.config.buffer_align;
        if layout.align() > max_align {
            warn!(align = layout.align(), max_align, "over-aligned task allocation refused");
            return Err(ArenaError::AlignmentTooLarge {
                align: layout.align(),
                max: max_align,
            });
        }

        let cursor = self.cursor.get();
        let capacity = self.buffer.len();
        let base = self.buffer.base().as_ptr() as usize;

        let offset = (base + cursor)
            .checked_next_multiple_of(layout.align())
            .map(|addr| addr - base)
            .filter(|&offset| {
                offset
                    .checked_add(layout.size())
                    .is_some_and(|end| end <= capacity)
            });
        let Some(offset) = offset else {
            let remaining = capacity - cursor;
            warn!(
                requested = layout.size(),
                align = layout.align(),
                remaining,
                capacity,
                "task arena exhausted"
            );
            return Err(ArenaError::CapacityExceeded {
                requested: layout.size(),
                align: layout.align(),
                remaining,
                capacity,
            });
        };

        let end = offset + layout.size();
        self.cursor.set(end);
        self.allocations.set(self.allocations.get() + 1);
        if end > self.high_water.get() {
            self.high_water.set(end);
        }

        let info = SlotInfo::new(self.generation.get(), offset, layout.size(), layout.align());
        trace!(%info, "slot allocated");
        Ok(RawSlot {
            ptr: self.buffer.at(offset),
            info,
            _arena: PhantomData,
        })
    }

    /// Destroy a task and give up its handle.
    ///
    /// The task's destructor runs in place. The cursor does not move: the
    /// slot's bytes stay spent until the next reset. A handle issued by a
    /// different arena is still destroyed (by that arena) but reported as
    /// [`ArenaError::ForeignHandle`].
    pub fn release(&self, handle: TaskHandle<'_>) -> Result<(), ArenaError> {
        let foreign = !handle.is_from(self);
        let slot = handle.slot();
        drop(handle);
        if foreign {
            warn!(%slot, "released task handle through a foreign arena");
            return Err(ArenaError::ForeignHandle);
        }
        trace!(%slot, "task released");
        Ok(())
    }

    /// Rewind the cursor to zero and start a new generation.
    ///
    /// Requiring `&mut self` proves no handle or raw slot borrowing this
    /// arena is still alive. The buffer contents are left as they are.
    pub fn reset(&mut self) {
        let leaked = self.live.replace(0);
        if leaked > 0 {
            debug!(leaked, "forgotten task handles discarded on reset");
        }
        self.rewind();
    }

    /// Rewind the cursor through a shared reference.
    ///
    /// Used where the arena is shared (e.g. the thread's shared arena).
    /// Refuses with [`ArenaError::LiveTasks`] while any task handle is still
    /// alive. Raw slots from [`TaskArena::allocate`] are not tracked; the
    /// caller must not touch them after a reset.
    pub fn try_reset(&self) -> Result<(), ArenaError> {
        let live = self.live.get();
        if live > 0 {
            warn!(live, "task arena reset refused");
            return Err(ArenaError::LiveTasks { live });
        }
        self.rewind();
        Ok(())
    }

    /// Rewind the cursor through a shared reference, ignoring live handles.
    ///
    /// This is the way out for a shared arena whose handles were abandoned
    /// (e.g. with [`std::mem::forget`]): [`TaskArena::try_reset`] refuses
    /// forever in that state. The live count is cleared and no destructor
    /// runs.
    ///
    /// # Safety
    ///
    /// No task handle or raw slot from this arena may be used after the
    /// call. Every task must have been released, dropped or abandoned for
    /// good; a surviving handle would alias tasks built in the next cycle.
    #[allow(unsafe_code)]
    pub unsafe fn reset_unchecked(&self) {
        let abandoned = self.live.replace(0);
        if abandoned > 0 {
            warn!(abandoned, "task arena reset with abandoned task handles");
        }
        self.rewind();
    }

    fn rewind(&self) {
        let generation = self.generation.get().wrapping_add(1);
        debug!(
            used = self.cursor.get(),
            allocations = self.allocations.get(),
            generation,
            "task arena reset"
        );
        self.cursor.set(0);
        self.allocations.set(0);
        self.generation.set(generation);
    }

    pub(crate) fn task_created(&self) {
        self.live.set(self.live.get() + 1);
    }

    pub(crate) fn task_destroyed(&self) {
        let live = self.live.get();
        debug_assert!(live > 0, "task destroyed with no live tasks");
        self.live.set(live.saturating_sub(1));
    }

    /// Buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes consumed since the last reset.
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes left before the arena is exhausted.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor.get()
    }

    /// Number of resets performed so far.
    pub fn generation(&self) -> u32 {
        self.generation.get()
    }

    /// Task handles issued and not yet released.
    pub fn live_tasks(&self) -> usize {
        self.live.get()
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Snapshot of all counters.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            capacity: self.capacity(),
            used: self.used(),
            remaining: self.remaining(),
            generation: self.generation(),
            live_tasks: self.live_tasks(),
            allocations: self.allocations.get(),
            high_water: self.high_water.get(),
        }
    }
}

impl fmt::Debug for TaskArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskArena")
            .field("config", &self.config)
            .field("cursor", &self.cursor.get())
            .field("generation", &self.generation.get())
            .field("live", &self.live.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(bytes: usize) -> TaskArena {
        TaskArena::new(ArenaConfig::with_slot_size(1, bytes)).unwrap()
    }

    #[test]
    fn new_arena_is_empty() {
        let arena = arena(64);
        assert_eq!(arena.capacity(), 64);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.remaining(), 64);
        assert_eq!(arena.generation(), 0);
        assert_eq!(arena.live_tasks(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = TaskArena::new(ArenaConfig::new(0)).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidConfig { .. }));
    }

    #[test]
    fn sequential_allocations_are_contiguous() {
        let arena = arena(64);
        let a = arena.allocate::<u64>().unwrap();
        let b = arena.allocate::<u64>().unwrap();
        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 8);
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn padding_inserted_for_alignment() {
        let arena = arena(64);
        let a = arena.allocate::<u8>().unwrap();
        let b = arena.allocate::<u32>().unwrap();
        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 4);
        assert_eq!(b.as_ptr() as usize % 4, 0);
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn exact_fit_succeeds() {
        let arena = arena(16);
        let _ = arena.allocate::<[u8; 16]>().unwrap();
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn exhaustion_leaves_cursor_untouched() {
        let arena = arena(16);
        let _ = arena.allocate::<[u8; 12]>().unwrap();
        let err = arena.allocate::<u64>().unwrap_err();
        assert_eq!(
            err,
            ArenaError::CapacityExceeded {
                requested: 8,
                align: 8,
                remaining: 4,
                capacity: 16,
            }
        );
        assert_eq!(arena.used(), 12);
        // A request that still fits is granted afterwards.
        let c = arena.allocate::<u32>().unwrap();
        assert_eq!(c.offset(), 12);
    }

    #[test]
    fn padding_alone_can_exhaust() {
        let arena = arena(16);
        let _ = arena.allocate::<[u8; 9]>().unwrap();
        assert_eq!(arena.remaining(), 7);
        assert!(arena.allocate::<u64>().is_err());
        assert_eq!(arena.used(), 9);
    }

    #[test]
    fn zero_sized_allocation_does_not_consume() {
        let arena = arena(8);
        let z = arena.allocate::<()>().unwrap();
        assert_eq!(z.size(), 0);
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn zero_sized_allocation_at_full_capacity_succeeds() {
        let arena = arena(8);
        let _ = arena.allocate::<u64>().unwrap();
        assert!(arena.allocate::<()>().is_ok());
    }

    #[test]
    fn reset_rewinds_and_bumps_generation() {
        let mut arena = arena(32);
        let _ = arena.allocate::<u64>().unwrap();
        arena.reset();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.generation(), 1);
        let slot = arena.allocate::<u64>().unwrap();
        assert_eq!(slot.offset(), 0);
        assert_eq!(slot.info().generation(), 1);
    }

    #[test]
    fn try_reset_on_idle_arena() {
        let arena = arena(32);
        let _ = arena.allocate::<u64>().unwrap();
        arena.try_reset().unwrap();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.generation(), 1);
    }

    #[test]
    fn stats_track_allocations_and_high_water() {
        let mut arena = arena(64);
        let _ = arena.allocate::<[u8; 24]>().unwrap();
        let _ = arena.allocate::<u64>().unwrap();
        let stats = arena.stats();
        assert_eq!(stats.allocations, 2);
        assert_eq!(stats.used, 32);
        assert_eq!(stats.high_water, 32);
        arena.reset();
        let _ = arena.allocate::<u64>().unwrap();
        let stats = arena.stats();
        assert_eq!(stats.allocations, 1);
        assert_eq!(stats.used, 8);
        assert_eq!(stats.high_water, 32);
        assert_eq!(stats.generation, 1);
    }

    #[test]
    fn buffer_aligned_type_is_aligned() {
        #[repr(align(16))]
        struct Wide([u8; 16]);

        let arena = arena(64);
        let _ = arena.allocate::<u8>().unwrap();
        let slot = arena.allocate::<Wide>().unwrap();
        assert_eq!(slot.as_ptr() as usize % 16, 0);
        assert_eq!(slot.offset(), 16);
    }

    #[test]
    fn over_aligned_type_is_refused() {
        #[repr(align(64))]
        struct Wide([u8; 64]);

        let arena = arena(256);
        let _ = arena.allocate::<u8>().unwrap();
        let err = arena.allocate::<Wide>().unwrap_err();
        assert_eq!(err, ArenaError::AlignmentTooLarge { align: 64, max: 16 });
        assert_eq!(arena.used(), 1);
        assert_eq!(arena.stats().allocations, 1);
    }

    #[test]
    fn over_aligned_offsets_match_after_reset() {
        #[repr(align(32))]
        struct Wide([u8; 32]);

        let config = ArenaConfig {
            buffer_align: 32,
            ..ArenaConfig::with_slot_size(1, 256)
        };
        let mut reused = TaskArena::new(config).unwrap();
        let fresh = TaskArena::new(config).unwrap();
        let first: Vec<usize> = (0..3)
            .map(|_| {
                let _ = reused.allocate::<u8>().unwrap();
                reused.allocate::<Wide>().unwrap().offset()
            })
            .collect();
        reused.reset();
        for &expected in &first {
            let _ = reused.allocate::<u8>().unwrap();
            let _ = fresh.allocate::<u8>().unwrap();
            assert_eq!(reused.allocate::<Wide>().unwrap().offset(), expected);
            assert_eq!(fresh.allocate::<Wide>().unwrap().offset(), expected);
        }
    }

    #[test]
    fn reset_unchecked_clears_abandoned_tasks() {
        let arena = arena(64);
        std::mem::forget(arena.make_task(taskpool_core::FnTask::new(|_, _| {})).unwrap());
        assert_eq!(arena.try_reset(), Err(ArenaError::LiveTasks { live: 1 }));
        // SAFETY: the only handle was forgotten and is never used again.
        #[allow(unsafe_code)]
        unsafe {
            arena.reset_unchecked();
        }
        assert_eq!(arena.live_tasks(), 0);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.generation(), 1);
        arena.try_reset().unwrap();
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Build a layout from a size and an alignment exponent.
        fn layout(size: usize, align_pow: u32) -> Layout {
            Layout::from_size_align(size, 1 << align_pow).unwrap()
        }

        proptest! {
            #[test]
            fn granted_slots_are_disjoint_aligned_and_ordered(
                reqs in proptest::collection::vec((0usize..48, 0u32..5), 1..40),
            ) {
                let arena = arena(512);
                let mut granted: Vec<(SlotInfo, usize)> = Vec::new();
                for &(size, pow) in &reqs {
                    let before = arena.used();
                    match arena.allocate_layout(layout(size, pow)) {
                        Ok(slot) => {
                            prop_assert_eq!(slot.as_ptr() as usize % (1 << pow), 0);
                            prop_assert!(slot.offset() >= before);
                            prop_assert!(slot.info().end() <= arena.capacity());
                            granted.push((slot.info(), slot.as_ptr() as usize));
                        }
                        Err(_) => {
                            prop_assert_eq!(arena.used(), before);
                        }
                    }
                }
                for (i, (a, _)) in granted.iter().enumerate() {
                    for (b, _) in &granted[i + 1..] {
                        prop_assert!(!a.overlaps(b));
                        prop_assert!(a.offset() <= b.offset());
                    }
                }
            }

            #[test]
            fn requests_within_capacity_all_succeed(
                sizes in proptest::collection::vec(1usize..32, 1..20),
            ) {
                let total: usize = sizes.iter().sum();
                let arena = arena(total);
                for &size in &sizes {
                    prop_assert!(arena.allocate_layout(layout(size, 0)).is_ok());
                }
                prop_assert_eq!(arena.remaining(), 0);
            }

            #[test]
            fn reset_replays_fresh_offsets(
                reqs in proptest::collection::vec((1usize..32, 0u32..5), 1..30),
            ) {
                let mut reused = arena(256);
                let fresh = arena(256);
                for &(size, pow) in &reqs {
                    let _ = reused.allocate_layout(layout(size, pow));
                }
                reused.reset();
                for &(size, pow) in &reqs {
                    let a = reused.allocate_layout(layout(size, pow)).map(|s| s.offset());
                    let b = fresh.allocate_layout(layout(size, pow)).map(|s| s.offset());
                    prop_assert_eq!(a, b);
                }
            }
        }
    }
}
