//! Interpreter state that travels with a paused task
//!
//! The interpreter keeps a small amount of mutable per-thread execution
//! state: the recursion-depth counter, the active call-frame chain and the
//! pending-error slot. Only one task's copy may occupy the live slots at a
//! time; every context switch swaps the whole snapshot in one operation so
//! two paused tasks can never see each other's state.

use std::rc::Rc;

use crate::error::{ScriptError, SourceLocation};

/// Reference-counted frame handle; cheap to save and restore.
pub type FrameRef = Rc<Frame>;

/// One entry in the active call-frame chain.
#[derive(Debug)]
pub struct Frame {
    /// Where the code executing in this frame came from.
    pub origin: SourceLocation,

    /// Enclosing frame, if any.
    pub parent: Option<FrameRef>,
}

impl Frame {
    pub fn new(origin: SourceLocation, parent: Option<FrameRef>) -> FrameRef {
        Rc::new(Frame { origin, parent })
    }

    /// Number of frames in this chain, including self.
    pub fn depth(&self) -> usize {
        let mut n = 1;
        let mut cur = self.parent.as_deref();
        while let Some(f) = cur {
            n += 1;
            cur = f.parent.as_deref();
        }
        n
    }
}

/// The minimal per-thread interpreter state swapped on every context switch.
///
/// A task's snapshot holds its copy while it is paused; the live copy for
/// the current thread sits in the runtime's `vm` module. Swapping is a
/// single `mem::swap` of this struct, so install and capture cannot be torn
/// apart.
#[derive(Debug, Default)]
pub struct VmSnapshot {
    /// Recursion-depth counter (frames entered, nested evaluations).
    pub recursion_depth: u32,

    /// Currently executing frame; `None` between evaluations.
    pub frame: Option<FrameRef>,

    /// Error raised but not yet consumed by an evaluation boundary.
    pub pending: Option<ScriptError>,
}

impl VmSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no evaluation is in flight and no error is pending.
    pub fn is_idle(&self) -> bool {
        self.recursion_depth == 0 && self.frame.is_none() && self.pending.is_none()
    }
}
