//! Seams between the engine and its host
//!
//! The engine never schedules and never resolves names; it only stores
//! these handles and hands them back at the right moments.

use std::net::IpAddr;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::ScriptError;

/// Asks the host reactor to re-invoke the driver for one task.
///
/// `post` marks the underlying event ready; the reactor turns that into a
/// future `step` call. Implementations must make `post` idempotent and
/// safe to call after the task has been terminated — a stale wake must
/// never crash the host.
pub trait WakeHandle {
    fn post(&self);
}

impl<T: WakeHandle + ?Sized> WakeHandle for Rc<T> {
    fn post(&self) {
        (**self).post()
    }
}

impl<T: WakeHandle + ?Sized> WakeHandle for Arc<T> {
    fn post(&self) {
        (**self).post()
    }
}

/// Opaque name-resolution collaborator.
///
/// A task carries at most one resolver plus a timeout; script-visible
/// bindings call it, the engine does not.
pub trait Resolver {
    fn resolve(&self, name: &str) -> Result<Vec<IpAddr>, ScriptError>;
}
