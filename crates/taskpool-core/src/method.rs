//! Bound-method task variant.
//!
//! A [`MethodTask`] pairs an exclusive borrow of an instance with a method
//! on that instance's type. The borrow is held for the task's whole life,
//! so the instance cannot be observed or moved while the task is pending.

use std::fmt;

use crate::arg::TaskArg;
use crate::error::TaskError;
use crate::task::{Task, TaskKind};

/// Signature of a method that can be bound in a [`MethodTask`].
pub type MethodFn<T> = fn(&mut T, TaskArg, i32);

/// A task that calls a method on a bound instance.
pub struct MethodTask<'a, T> {
    instance: &'a mut T,
    method: MethodFn<T>,
}

impl<'a, T> MethodTask<'a, T> {
    /// Bind `method` to `instance`.
    pub fn new(instance: &'a mut T, method: MethodFn<T>) -> Self {
        Self { instance, method }
    }

    /// Bind parts that may be absent.
    ///
    /// The callable is checked first, so a task missing both parts reports
    /// [`TaskError::NullCallable`].
    pub fn try_from_raw(
        instance: Option<&'a mut T>,
        method: Option<MethodFn<T>>,
    ) -> Result<Self, TaskError> {
        let method = method.ok_or(TaskError::NullCallable {
            kind: TaskKind::BoundMethod,
        })?;
        let instance = instance.ok_or(TaskError::NullInstance)?;
        Ok(Self::new(instance, method))
    }

    /// Shared access to the bound instance.
    pub fn instance(&self) -> &T {
        &*self.instance
    }

    /// Give back the borrow of the instance.
    pub fn into_instance(self) -> &'a mut T {
        self.instance
    }
}

impl<T> Task for MethodTask<'_, T> {
    fn invoke(&mut self, arg: TaskArg, index: i32) -> bool {
        (self.method)(&mut *self.instance, arg, index);
        true
    }

    fn kind(&self) -> TaskKind {
        TaskKind::BoundMethod
    }
}

impl<T> fmt::Debug for MethodTask<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTask")
            .field("instance", &(&*self.instance as *const T))
            .field("method", &(self.method as *const ()))
            .finish()
    }
}
