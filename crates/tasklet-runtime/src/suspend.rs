//! Suspend: the one way a running body gives control back
//!
//! Callable only from inside a task body. Switches back to whoever last
//! stepped the task; when the task is resumed, execution continues right
//! here with all locals intact, and the terminate flag is checked before
//! control returns to script code.

use tasklet_core::error::{EngineError, EngineResult, ScriptError};
use tasklet_core::tdebug;

use crate::current_arch as arch;
use crate::{tls, vm};

/// Yield control to the driver.
///
/// Before suspending, the body is expected to have arranged for some
/// external event to eventually post the task's wake handle; the engine
/// only exposes the handle, it never schedules.
///
/// Fails with [`EngineError::SuspendOutsideTask`] when no task is active
/// (synchronous and configuration-time evaluation included) and with
/// [`EngineError::Terminated`] when resumed after a termination request.
/// Both failures are also raised into the pending-error slot so the
/// body's unwind carries the frame it was suspended in.
pub fn suspend() -> EngineResult<()> {
    let task = tls::active();

    if task.is_null() {
        raise(EngineError::SuspendOutsideTask);
        return Err(EngineError::SuspendOutsideTask);
    }

    let task = unsafe { &*task };

    tdebug!("task suspend");

    unsafe {
        arch::switch_context(task.own_ctx_ptr(), task.caller_ctx_ptr());
    }

    tdebug!("task resume");

    if task.terminate.get() {
        tdebug!("task terminate");
        raise(EngineError::Terminated);
        return Err(EngineError::Terminated);
    }

    Ok(())
}

/// Mirror an engine failure into the pending slot, located at the frame
/// it was raised in when one is live.
fn raise(e: EngineError) {
    let err = match vm::current_origin() {
        Some(origin) => ScriptError::with_location(e.to_string(), origin),
        None => ScriptError::from(e),
    };
    vm::set_pending(err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misuse_raises_into_pending_slot() {
        assert_eq!(suspend(), Err(EngineError::SuspendOutsideTask));

        let pending = vm::take_pending().expect("pending error set");
        assert_eq!(pending.message, "blocking calls are not allowed");
        // No evaluation frame was live, so no location either.
        assert!(pending.location.is_none());
    }
}
