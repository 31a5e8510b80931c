//! The active-task pointer
//!
//! At most one task is live in the interpreter at any instant; this slot
//! identifies it so `suspend` and the entry path can find their task
//! without threading it through every call. Never read or written without
//! the save/restore bracketing: `set_active` returns the previous pointer
//! and the caller must put it back, which is what makes re-entrant
//! stepping (task B driven from inside task A) hold together.

use std::cell::Cell;
use std::ptr;

use crate::task::TaskInner;

thread_local! {
    static ACTIVE_TASK: Cell<*const TaskInner> = const { Cell::new(ptr::null()) };
}

/// Install `task` as the active task, returning the previously active one.
#[inline]
pub(crate) fn set_active(task: *const TaskInner) -> *const TaskInner {
    ACTIVE_TASK.with(|cell| cell.replace(task))
}

/// The currently active task, or null.
#[inline]
pub(crate) fn active() -> *const TaskInner {
    ACTIVE_TASK.with(|cell| cell.get())
}

/// Is any task live on this thread?
#[inline]
pub fn in_task() -> bool {
    !active().is_null()
}
