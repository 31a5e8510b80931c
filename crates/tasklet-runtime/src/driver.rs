//! The driver: one step of a task per invocation
//!
//! A step either starts the task (arming its context on a fresh stack),
//! resumes it where it suspended, or - when no wake handle is supplied -
//! evaluates the body directly with no stack and no switching at all.
//!
//! Every switch, in either direction, is bracketed the same way: chain the
//! active-task pointer, swap the interpreter snapshot into the live slots,
//! switch, swap the live slots back into the snapshot, unchain. Skipping
//! any part of that bracket would let two paused tasks see each other's
//! interpreter state.

use std::ptr;

use tasklet_core::error::{EngineError, EngineResult, ScriptError};
use tasklet_core::script::CompiledScript;
use tasklet_core::state::TaskOutcome;
use tasklet_core::traits::WakeHandle;
use tasklet_core::value::Value;
use tasklet_core::{tdebug, terror};

use crate::current_arch as arch;
use crate::stack::TaskStack;
use crate::task::TaskInner;
use crate::{tls, vm};

/// What one step produced.
#[derive(Debug, PartialEq)]
pub enum Step {
    /// The task suspended; step again after its wake handle fires.
    Pending,

    /// The body finished. Errors have already been logged.
    Complete(Result<Value, ScriptError>),
}

impl Step {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Step::Pending)
    }
}

/// Drive `task` one step.
///
/// `script` is consumed by the task's first step and ignored afterwards;
/// `wake` is stored on the first step and ignored afterwards. A first step
/// without a wake handle runs in synchronous mode. A pending task resumes
/// regardless of the arguments, which is what lets forced termination
/// re-step it with neither.
pub(crate) fn step(
    task: &TaskInner,
    script: Option<CompiledScript>,
    wake: Option<Box<dyn WakeHandle>>,
) -> EngineResult<Step> {
    if task.outcome.borrow().is_complete() {
        return Err(EngineError::AlreadyCompleted);
    }

    let resuming = task.outcome.borrow().is_pending();

    if !resuming && wake.is_none() {
        return eval_sync(task, script);
    }

    if !resuming {
        let script = script.ok_or(EngineError::MissingScript)?;

        let stack_top = {
            let mut stack = task.stack.borrow_mut();
            if stack.is_none() {
                match TaskStack::allocate(task.stack_size) {
                    Ok(s) => *stack = Some(s),
                    Err(e) => {
                        terror!("task stack setup failed: {}", e);
                        return Err(e);
                    }
                }
            }
            stack.as_ref().map(|s| s.top()).unwrap_or(ptr::null_mut())
        };

        unsafe {
            arch::init_context(
                task.own_ctx_ptr(),
                stack_top,
                task_entry as usize,
                task as *const TaskInner as usize,
            );
        }

        *task.script.borrow_mut() = Some(script);
        *task.wake.borrow_mut() = wake;
        *task.outcome.borrow_mut() = TaskOutcome::Pending;

        tdebug!("task start");
    }

    let prev = tls::set_active(task as *const TaskInner);
    {
        let mut snapshot = task.snapshot.borrow_mut();
        vm::swap_live(&mut snapshot);
    }

    unsafe {
        arch::switch_context(task.caller_ctx_ptr(), task.own_ctx_ptr());
    }

    {
        let mut snapshot = task.snapshot.borrow_mut();
        vm::swap_live(&mut snapshot);
    }
    tls::set_active(prev);

    if task.outcome.borrow().is_pending() {
        return Ok(Step::Pending);
    }

    // Final step: the body/wake slots are dead from here on.
    task.script.borrow_mut().take();
    task.wake.borrow_mut().take();

    let result = task
        .outcome
        .borrow()
        .result()
        .expect("completed task has a result");
    tdebug!("task done");

    Ok(Step::Complete(result))
}

/// Synchronous mode: evaluate the body directly against the namespace.
///
/// Used for configuration-time evaluation and hosts built without
/// suspension. The active-task pointer is cleared around the call so a
/// suspend attempt inside fails with the misuse error.
fn eval_sync(task: &TaskInner, script: Option<CompiledScript>) -> EngineResult<Step> {
    let script = script.ok_or(EngineError::MissingScript)?;

    let prev = tls::set_active(ptr::null());
    let result = run_body(task, script);
    tls::set_active(prev);

    *task.outcome.borrow_mut() = TaskOutcome::Complete(result.clone());
    Ok(Step::Complete(result))
}

/// Shared evaluation path for both modes: frame bracketing, pending-error
/// pickup and diagnostic logging.
fn run_body(task: &TaskInner, script: CompiledScript) -> Result<Value, ScriptError> {
    let (origin, body) = script.into_parts();

    if let Err(e) = vm::enter_frame(origin, task.recursion_limit) {
        terror!("script error: {}", e.diagnostic());
        return Err(e);
    }

    let mut result = body(&task.ns);

    // An error raised at a suspend point lands in the pending slot with
    // the frame it was raised in; prefer it over the propagated value.
    if let Some(pending) = vm::take_pending() {
        if result.is_err() {
            result = Err(pending);
        }
    }

    vm::leave_frame();

    if let Err(e) = &result {
        terror!("script error: {}", e.diagnostic());
    }

    result
}

/// Entry routine: the first code a task runs on its own stack.
///
/// Returning from here falls through the trampoline into a switch back to
/// the caller context, so the driver observes a completed task whether the
/// body suspended along the way or not.
extern "C" fn task_entry(task: usize) {
    let task = unsafe { &*(task as *const TaskInner) };

    tdebug!("task entry");

    let result = match task.script.borrow_mut().take() {
        Some(script) => run_body(task, script),
        None => Err(ScriptError::from(EngineError::MissingScript)),
    };

    *task.outcome.borrow_mut() = TaskOutcome::Complete(result);
}
