//! The task: one suspendable unit of script execution
//!
//! A task owns its stack, both machine contexts (its own and the
//! resumption point of whoever stepped it), its parked interpreter
//! snapshot, the tri-state outcome slot, the terminate flag and the wake
//! handle. All mutation goes through interior cells: the driver holds a
//! shared borrow while the entry routine reaches the same task through the
//! active-task pointer.

use std::cell::{Cell, RefCell, UnsafeCell};
use std::rc::Rc;
use std::time::Duration;

use tasklet_core::context::MachineContext;
use tasklet_core::error::{EngineResult, ScriptError};
use tasklet_core::namespace::Namespace;
use tasklet_core::script::CompiledScript;
use tasklet_core::snapshot::VmSnapshot;
use tasklet_core::state::TaskOutcome;
use tasklet_core::tdebug;
use tasklet_core::traits::{Resolver, WakeHandle};
use tasklet_core::value::Value;

use crate::config::EngineConfig;
use crate::driver::{self, Step};
use crate::stack::TaskStack;

pub(crate) struct TaskInner {
    pub(crate) ns: Namespace,
    pub(crate) stack_size: usize,
    pub(crate) recursion_limit: u32,

    /// Allocated on the first resumable step, never before.
    pub(crate) stack: RefCell<Option<TaskStack>>,

    /// The task's own context and the context of whoever last stepped it.
    /// UnsafeCell: the switch assembly writes through raw pointers while
    /// the driver holds `&self`.
    pub(crate) own_ctx: UnsafeCell<MachineContext>,
    pub(crate) caller_ctx: UnsafeCell<MachineContext>,

    /// Interpreter state parked here whenever the task is not live.
    pub(crate) snapshot: RefCell<VmSnapshot>,

    pub(crate) outcome: RefCell<TaskOutcome>,

    /// Set at most once; observed at the task's next suspend point.
    pub(crate) terminate: Cell<bool>,

    pub(crate) wake: RefCell<Option<Box<dyn WakeHandle>>>,
    pub(crate) script: RefCell<Option<CompiledScript>>,

    pub(crate) resolver: RefCell<Option<Rc<dyn Resolver>>>,
    pub(crate) resolver_timeout: Cell<Duration>,
}

impl TaskInner {
    #[inline]
    pub(crate) fn own_ctx_ptr(&self) -> *mut MachineContext {
        self.own_ctx.get()
    }

    #[inline]
    pub(crate) fn caller_ctx_ptr(&self) -> *mut MachineContext {
        self.caller_ctx.get()
    }
}

/// One suspendable script invocation.
///
/// Created when execution of a compiled script is requested; driven by
/// repeated [`Task::step`] calls; destroyed when its owning scope ends.
/// Dropping a task that is still pending forces it through termination
/// first, so no stack is ever freed while a live context references it.
pub struct Task {
    inner: Box<TaskInner>,
}

impl Task {
    pub fn new(ns: Namespace, config: &EngineConfig) -> Self {
        Self {
            inner: Box::new(TaskInner {
                ns,
                stack_size: config.stack_size,
                recursion_limit: config.recursion_limit,
                stack: RefCell::new(None),
                own_ctx: UnsafeCell::new(MachineContext::new()),
                caller_ctx: UnsafeCell::new(MachineContext::new()),
                snapshot: RefCell::new(VmSnapshot::new()),
                outcome: RefCell::new(TaskOutcome::NotStarted),
                terminate: Cell::new(false),
                wake: RefCell::new(None),
                script: RefCell::new(None),
                resolver: RefCell::new(None),
                resolver_timeout: Cell::new(Duration::ZERO),
            }),
        }
    }

    /// Drive the task one step. See [`driver::step`] for the protocol.
    pub fn step(
        &self,
        script: Option<CompiledScript>,
        wake: Option<Box<dyn WakeHandle>>,
    ) -> EngineResult<Step> {
        driver::step(&self.inner, script, wake)
    }

    /// Ask the host reactor to step this task again.
    ///
    /// Posts the stored wake handle unless termination has been requested;
    /// a terminated task must not be rescheduled by stale events.
    pub fn wakeup(&self) {
        if self.inner.terminate.get() {
            return;
        }
        if let Some(wake) = &*self.inner.wake.borrow() {
            wake.post();
        }
    }

    /// Request forced unwind. Observed at the task's next suspend point.
    pub fn request_terminate(&self) {
        self.inner.terminate.set(true);
    }

    pub fn terminate_requested(&self) -> bool {
        self.inner.terminate.get()
    }

    #[inline]
    pub fn is_not_started(&self) -> bool {
        self.inner.outcome.borrow().is_not_started()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.inner.outcome.borrow().is_pending()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.inner.outcome.borrow().is_complete()
    }

    /// The final result, once complete.
    pub fn result(&self) -> Option<Result<Value, ScriptError>> {
        self.inner.outcome.borrow().result()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.inner.ns
    }

    /// True once the task's stack has been mapped.
    pub fn has_stack(&self) -> bool {
        self.inner.stack.borrow().is_some()
    }

    pub fn stack_size(&self) -> usize {
        self.inner.stack_size
    }

    /// Attach the host's resolver handle and its timeout.
    pub fn set_resolver(&self, resolver: Rc<dyn Resolver>, timeout: Duration) {
        *self.inner.resolver.borrow_mut() = Some(resolver);
        self.inner.resolver_timeout.set(timeout);
    }

    /// The attached resolver and timeout, if any. The engine stores these
    /// for script-visible bindings; it never resolves anything itself.
    pub fn resolver(&self) -> Option<(Rc<dyn Resolver>, Duration)> {
        self.inner
            .resolver
            .borrow()
            .clone()
            .map(|r| (r, self.inner.resolver_timeout.get()))
    }
}

impl Drop for Task {
    /// Forced termination of a still-pending task.
    ///
    /// Sets the terminate flag and re-steps until the body has unwound
    /// through its suspend point. The value or error produced is discarded.
    ///
    /// Known risk, inherited from the design: a body that keeps suspending
    /// without propagating the termination error will keep this loop
    /// spinning, one iteration per remaining suspend point.
    fn drop(&mut self) {
        if !self.inner.outcome.borrow().is_pending() {
            return;
        }

        tdebug!("task cleanup: forcing termination");
        self.inner.terminate.set(true);

        while self.inner.outcome.borrow().is_pending() {
            if driver::step(&self.inner, None, None).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingWake(Arc<AtomicUsize>);

    impl WakeHandle for CountingWake {
        fn post(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FixedResolver;

    impl Resolver for FixedResolver {
        fn resolve(&self, _name: &str) -> Result<Vec<IpAddr>, ScriptError> {
            Ok(vec!["127.0.0.1".parse().unwrap()])
        }
    }

    fn new_task() -> Task {
        Task::new(Namespace::new("t"), &EngineConfig::new())
    }

    #[test]
    fn test_fresh_task_state() {
        let task = new_task();
        assert!(task.is_not_started());
        assert!(!task.has_stack());
        assert!(task.result().is_none());
        assert!(!task.terminate_requested());
    }

    #[test]
    fn test_wakeup_posts_stored_handle() {
        let task = new_task();
        let posts = Arc::new(AtomicUsize::new(0));
        *task.inner.wake.borrow_mut() = Some(Box::new(CountingWake(posts.clone())));

        task.wakeup();
        task.wakeup();
        assert_eq!(posts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_wakeup_suppressed_after_terminate() {
        let task = new_task();
        let posts = Arc::new(AtomicUsize::new(0));
        *task.inner.wake.borrow_mut() = Some(Box::new(CountingWake(posts.clone())));

        task.request_terminate();
        task.wakeup();
        assert_eq!(posts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_resolver_round_trip() {
        let task = new_task();
        assert!(task.resolver().is_none());

        task.set_resolver(Rc::new(FixedResolver), Duration::from_millis(500));
        let (resolver, timeout) = task.resolver().expect("resolver set");
        assert_eq!(timeout, Duration::from_millis(500));
        assert!(resolver.resolve("localhost").is_ok());
    }
}
