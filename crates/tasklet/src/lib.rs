//! # tasklet - suspendable script tasks for event-driven hosts
//!
//! A host process that runs one logical thread per worker cannot afford a
//! blocking call anywhere, yet embedded scripts are most natural written as
//! plain sequential code. tasklet bridges the two: each script invocation
//! gets its own execution stack, may suspend in the middle of what looks
//! like a blocking call, and resumes later exactly where it stopped - from
//! the script's point of view the call simply returned.
//!
//! ## Quick start
//!
//! ```ignore
//! use tasklet::{suspend, CompiledScript, EngineConfig, Namespace, Step, Task, Value};
//!
//! let ns = Namespace::new("app");
//! let task = Task::new(ns, &EngineConfig::from_env());
//!
//! let script = CompiledScript::labeled("app.conf", 12, |ns| {
//!     let greeting = ns.get("greeting").unwrap_or(Value::Null);
//!     suspend().map_err(Into::into)?;   // wait for the host event
//!     Ok(greeting)
//! });
//!
//! match task.step(Some(script), Some(Box::new(my_wake)))? {
//!     Step::Pending => { /* reactor re-steps after the wake fires */ }
//!     Step::Complete(result) => { /* done in one go */ }
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`Task`] - one suspendable invocation: its stack, contexts and result
//! - [`Task::step`] - drive a task once, observe `Pending` or `Complete`
//! - [`suspend`] - called from inside a body to yield to the driver
//! - [`Namespace`] - the global bindings a body runs against
//! - [`reactor`] - a minimal posted-event loop for hosts and tests
//!
//! Stepping is strictly cooperative and single-threaded. Many tasks may be
//! paused at once; exactly one is ever live, and the engine swaps the
//! interpreter's per-thread state around every switch so paused tasks never
//! observe each other.

pub mod reactor;

// Re-export core types
pub use tasklet_core::{
    CompiledScript, EngineError, EngineResult, Frame, FrameRef, MachineContext, Namespace,
    NamespaceRegistry, Resolver, ScriptBody, ScriptError, SourceLocation, TaskOutcome, Value,
    VmSnapshot, WakeHandle,
};

pub use tasklet_core::constants;
pub use tasklet_core::env::{env_get, env_get_bool, env_get_opt};
pub use tasklet_core::tlog::{init as init_logging, set_flush, set_log_level, LogLevel};

// Re-export logging macros
pub use tasklet_core::{tdebug, terror, tinfo, ttrace, twarn};

// Re-export runtime types
pub use tasklet_runtime::{suspend, ConfigError, EngineConfig, Step, Task, TaskStack};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_surface_compiles_together() {
        let ns = Namespace::new("smoke");
        let task = Task::new(ns, &EngineConfig::new());

        let step = task
            .step(
                Some(CompiledScript::labeled("smoke.conf", 3, |ns| {
                    ns.set("answer", Value::Int(42));
                    Ok(Value::Int(42))
                })),
                None,
            )
            .unwrap();

        assert_eq!(step, Step::Complete(Ok(Value::Int(42))));
        assert_eq!(task.namespace().get("answer"), Some(Value::Int(42)));
    }
}
