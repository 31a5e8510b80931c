//! The live interpreter slots
//!
//! One `VmSnapshot` per thread is "live": the recursion depth, frame chain
//! and pending error that script evaluation reads and writes. Tasks keep
//! their own copy while paused; the driver swaps a task's copy in before
//! switching into it and back out after control returns. Each direction is
//! a single `mem::swap`, so install and capture are inseparable.

use std::cell::RefCell;
use std::mem;

use tasklet_core::error::{ScriptError, SourceLocation};
use tasklet_core::snapshot::{Frame, VmSnapshot};

thread_local! {
    static LIVE: RefCell<VmSnapshot> = RefCell::new(VmSnapshot::new());
}

/// Exchange the live slots with `snapshot`.
///
/// Entering a task: its snapshot becomes live, the caller's live state
/// parks in the task's snapshot field. Leaving: the same call captures
/// whatever the task mutated and reinstates the caller's state.
pub fn swap_live(snapshot: &mut VmSnapshot) {
    LIVE.with(|live| mem::swap(&mut *live.borrow_mut(), snapshot));
}

/// Begin an evaluation frame at `origin`.
///
/// Bumps the recursion counter and pushes the frame chain; fails as an
/// ordinary script error when `limit` frames are already active.
pub fn enter_frame(origin: SourceLocation, limit: u32) -> Result<(), ScriptError> {
    LIVE.with(|live| {
        let mut s = live.borrow_mut();
        if s.recursion_depth >= limit {
            return Err(ScriptError::with_location(
                "maximum recursion depth exceeded",
                origin,
            ));
        }
        s.recursion_depth += 1;
        s.frame = Some(Frame::new(origin, s.frame.take()));
        Ok(())
    })
}

/// End the innermost evaluation frame.
pub fn leave_frame() {
    LIVE.with(|live| {
        let mut s = live.borrow_mut();
        s.recursion_depth = s.recursion_depth.saturating_sub(1);
        s.frame = match s.frame.take() {
            Some(f) => f.parent.clone(),
            None => None,
        };
    });
}

/// Record an error in the pending slot. Overwrites an unconsumed one, the
/// way a newly raised exception replaces the current one.
pub fn set_pending(err: ScriptError) {
    LIVE.with(|live| live.borrow_mut().pending = Some(err));
}

/// Consume the pending error, if any.
pub fn take_pending() -> Option<ScriptError> {
    LIVE.with(|live| live.borrow_mut().pending.take())
}

/// Depth of the live frame chain.
pub fn recursion_depth() -> u32 {
    LIVE.with(|live| live.borrow().recursion_depth)
}

/// Origin of the innermost live frame.
pub fn current_origin() -> Option<SourceLocation> {
    LIVE.with(|live| live.borrow().frame.as_ref().map(|f| f.origin.clone()))
}

/// Read-only access to the live slots, for assertions and host probes.
pub fn inspect<R>(f: impl FnOnce(&VmSnapshot) -> R) -> R {
    LIVE.with(|live| f(&live.borrow()))
}
