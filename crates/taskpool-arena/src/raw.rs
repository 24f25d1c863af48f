//! The arena's backing byte buffer.
//!
//! This is the only module that talks to the global allocator. The buffer is
//! allocated once, never resized, and released when the arena drops.

#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::ptr::NonNull;

/// A fixed-size, uninitialised, aligned byte buffer.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl RawBuffer {
    /// Allocate `capacity` bytes aligned to `align`.
    ///
    /// `capacity` must be non-zero and `align` a power of two; both are
    /// guaranteed by `ArenaConfig::validate`. Returns `None` if the pair
    /// does not form a valid layout.
    pub(crate) fn new(capacity: usize, align: usize) -> Option<Self> {
        let layout = Layout::from_size_align(capacity, align).ok()?;
        debug_assert!(layout.size() > 0);
        // SAFETY: `layout` has non-zero size.
        let ptr = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            handle_alloc_error(layout)
        };
        Some(Self { ptr, layout })
    }

    /// Base address of the buffer.
    pub(crate) fn base(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Buffer size in bytes.
    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    /// Pointer to byte `offset`.
    ///
    /// `offset` must not exceed [`RawBuffer::len`].
    pub(crate) fn at(&self, offset: usize) -> NonNull<u8> {
        debug_assert!(offset <= self.len());
        // SAFETY: `offset <= len`, so the result stays within (or one past)
        // the allocation and cannot wrap to null.
        unsafe { self.ptr.add(offset) }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from `alloc` with exactly this layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}
