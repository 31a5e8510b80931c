//! # tasklet-core
//!
//! Core types for the tasklet engine: suspendable script execution inside a
//! single-threaded, event-driven host.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! The stack allocator, context switching and the driver live in
//! `tasklet-runtime`.
//!
//! ## Modules
//!
//! - `value` - dynamic value produced by script bodies
//! - `error` - engine and script error types, diagnostic formatting
//! - `context` - machine-context record layout (repr(C), asm-visible)
//! - `snapshot` - interpreter state that travels with a paused task
//! - `script` - compiled script body plus its source origin
//! - `namespace` - global-binding container and registry
//! - `state` - task outcome tri-state
//! - `traits` - wake-handle and resolver seams to the host
//! - `tlog` - leveled stderr logging macros
//! - `env` - environment variable parsing helpers

pub mod context;
pub mod env;
pub mod error;
pub mod namespace;
pub mod script;
pub mod snapshot;
pub mod state;
pub mod tlog;
pub mod traits;
pub mod value;

// Re-exports for convenience
pub use context::MachineContext;
pub use env::{env_get, env_get_bool, env_get_opt};
pub use error::{EngineError, EngineResult, ScriptError, SourceLocation};
pub use namespace::{Namespace, NamespaceRegistry};
pub use script::{CompiledScript, ScriptBody};
pub use snapshot::{Frame, FrameRef, VmSnapshot};
pub use state::TaskOutcome;
pub use traits::{Resolver, WakeHandle};
pub use value::Value;

/// Shared constants
pub mod constants {
    /// Default per-task stack size (bytes).
    pub const DEFAULT_STACK_SIZE: usize = 32 * 1024;

    /// Smallest stack a task may be configured with.
    pub const MIN_STACK_SIZE: usize = 16 * 1024;

    /// Guard region below the usable stack (one page).
    pub const GUARD_SIZE: usize = 4096;

    /// Default recursion-depth limit for script evaluation.
    pub const DEFAULT_RECURSION_LIMIT: u32 = 1000;

    /// Size of the saved machine-context record (bytes).
    pub const CONTEXT_SIZE: usize = 64;
}
