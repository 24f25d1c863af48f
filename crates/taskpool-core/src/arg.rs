//! The opaque argument passed to every task invocation.

use std::fmt;

/// Opaque argument pointer handed to a task on invocation.
///
/// A `TaskArg` is an untyped address, possibly null. Tasks that know what
/// the caller passed recover a typed reference with [`TaskArg::as_ref`] or
/// [`TaskArg::as_mut`]. Constructing and copying a `TaskArg` is always safe;
/// only dereferencing it is not.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskArg(*mut ());

impl TaskArg {
    /// An argument that points nowhere.
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// Wrap a raw pointer.
    pub const fn from_raw(ptr: *mut ()) -> Self {
        Self(ptr)
    }

    /// Point at a shared value. Only [`TaskArg::as_ref`] may be used on it.
    pub fn from_ref<T>(value: &T) -> Self {
        Self(value as *const T as *mut ())
    }

    /// Point at an exclusively borrowed value.
    pub fn from_mut<T>(value: &mut T) -> Self {
        Self(value as *mut T as *mut ())
    }

    /// The raw address.
    pub fn as_ptr(self) -> *mut () {
        self.0
    }

    /// Whether this argument is null.
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// Whether this argument points at `value`.
    pub fn points_to<T>(self, value: &T) -> bool {
        std::ptr::eq(self.0 as *const T, value)
    }

    /// Recover a shared reference.
    ///
    /// Returns `None` for a null argument.
    ///
    /// # Safety
    ///
    /// The argument must have been built from a live `T` that is not
    /// mutably borrowed elsewhere for the returned lifetime.
    #[allow(unsafe_code)]
    pub unsafe fn as_ref<'a, T>(self) -> Option<&'a T> {
        // SAFETY: upheld by the caller.
        unsafe { (self.0 as *const T).as_ref() }
    }

    /// Recover an exclusive reference.
    ///
    /// Returns `None` for a null argument.
    ///
    /// # Safety
    ///
    /// The argument must have been built with [`TaskArg::from_mut`] (or an
    /// equivalent raw pointer) from a live `T`, and no other reference to
    /// that `T` may be used for the returned lifetime.
    #[allow(unsafe_code)]
    pub unsafe fn as_mut<'a, T>(self) -> Option<&'a mut T> {
        // SAFETY: upheld by the caller.
        unsafe { (self.0 as *mut T).as_mut() }
    }
}

impl Default for TaskArg {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for TaskArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskArg({:p})", self.0)
    }
}

impl<T> From<&mut T> for TaskArg {
    fn from(value: &mut T) -> Self {
        Self::from_mut(value)
    }
}
