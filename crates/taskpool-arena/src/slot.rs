//! Slot descriptors.
//!
//! A [`SlotInfo`] records where an allocation sits inside the arena buffer.
//! It is generation-scoped: the `generation` field tells which reset cycle
//! the slot was carved in, so two slots from different cycles can share an
//! offset without being confused.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::arena::TaskArena;

/// Location of one allocation within the arena buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotInfo {
    pub(crate) generation: u32,
    pub(crate) offset: usize,
    pub(crate) size: usize,
    pub(crate) align: usize,
}

impl SlotInfo {
    pub(crate) fn new(generation: u32, offset: usize, size: usize, align: usize) -> Self {
        Self {
            generation,
            offset,
            size,
            align,
        }
    }

    /// The reset cycle this slot was allocated in.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Byte offset from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the slot in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alignment the slot was placed at.
    pub fn align(&self) -> usize {
        self.align
    }

    /// One past the last byte of the slot.
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Whether the two byte ranges intersect.
    ///
    /// Zero-sized slots never overlap anything.
    pub fn overlaps(&self, other: &SlotInfo) -> bool {
        self.size > 0
            && other.size > 0
            && self.offset < other.end()
            && other.offset < self.end()
    }
}

impl fmt::Display for SlotInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Slot(gen={}, off={}, size={}, align={})",
            self.generation, self.offset, self.size, self.align
        )
    }
}

/// An uninitialised region handed out by
/// [`TaskArena::allocate`](crate::TaskArena::allocate).
///
/// The region is sized and aligned for the requested type and borrows the
/// arena, so the arena cannot be reset through `&mut` while it exists.
/// Writing to it is `unsafe`; nothing is dropped for it on release or reset.
#[derive(Debug)]
#[must_use]
pub struct RawSlot<'a> {
    pub(crate) ptr: NonNull<u8>,
    pub(crate) info: SlotInfo,
    pub(crate) _arena: PhantomData<&'a TaskArena>,
}

impl RawSlot<'_> {
    /// Start of the region.
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Start of the region, typed.
    pub fn cast<T>(&self) -> NonNull<T> {
        self.ptr.cast()
    }

    /// Where the region sits in the buffer.
    pub fn info(&self) -> SlotInfo {
        self.info
    }

    /// Byte offset from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.info.offset
    }

    /// Size of the region in bytes.
    pub fn size(&self) -> usize {
        self.info.size
    }
}
