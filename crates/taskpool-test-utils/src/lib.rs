//! Test fixtures for taskpool development.
//!
//! Task functions and instances with observable side effects, so tests can
//! check that the right callable ran with the right `(argument, index)`:
//!
//! - [`record_call`] logs every call into a per-thread side channel.
//! - [`push_index`] appends the index to a `Vec<i32>` passed as argument.
//! - [`Counter`] accumulates indices through a bound method.
//! - [`DropProbe`] counts how many times it has been destroyed.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::{Cell, RefCell};

use taskpool_core::{Task, TaskArg, TaskKind};

thread_local! {
    static CALLS: RefCell<Vec<(TaskArg, i32)>> = const { RefCell::new(Vec::new()) };
}

/// Task function that records `(arg, index)` for [`take_calls`].
pub fn record_call(arg: TaskArg, index: i32) {
    CALLS.with(|calls| calls.borrow_mut().push((arg, index)));
}

/// Drain everything [`record_call`] has seen on this thread.
pub fn take_calls() -> Vec<(TaskArg, i32)> {
    CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
}

/// Task function that pushes `index` onto the `Vec<i32>` behind `arg`.
///
/// `arg` must come from `TaskArg::from_mut(&mut Vec<i32>)`.
pub fn push_index(arg: TaskArg, index: i32) {
    // SAFETY: by contract `arg` points at a live, unaliased `Vec<i32>`.
    #[allow(unsafe_code)]
    let log = unsafe { arg.as_mut::<Vec<i32>>() };
    if let Some(log) = log {
        log.push(index);
    }
}

/// Instance with counter state for bound-method tasks.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Counter {
    pub total: i64,
    pub calls: u32,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Method that adds `index` to the running total.
    pub fn add_index(&mut self, _arg: TaskArg, index: i32) {
        self.total += i64::from(index);
        self.calls += 1;
    }
}

/// A task that counts its own destruction in a shared cell.
pub struct DropProbe<'a> {
    drops: &'a Cell<u32>,
    pub invocations: u32,
}

impl<'a> DropProbe<'a> {
    pub fn new(drops: &'a Cell<u32>) -> Self {
        Self {
            drops,
            invocations: 0,
        }
    }
}

impl Task for DropProbe<'_> {
    fn invoke(&mut self, _arg: TaskArg, _index: i32) -> bool {
        self.invocations += 1;
        true
    }

    fn kind(&self) -> TaskKind {
        TaskKind::FreeFunction
    }
}

impl Drop for DropProbe<'_> {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
