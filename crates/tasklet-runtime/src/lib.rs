//! # tasklet-runtime
//!
//! Platform-specific half of the tasklet engine:
//! - per-task stack allocation (mmap + guard page)
//! - context switching (architecture-specific assembly)
//! - the live interpreter slots and the active-task chain
//! - `Task`, the driver, suspend and termination

pub mod arch;
pub mod config;
pub mod driver;
pub mod stack;
pub mod suspend;
pub mod task;
pub mod tls;
pub mod vm;

// Re-exports
pub use config::{ConfigError, EngineConfig};
pub use driver::Step;
pub use stack::TaskStack;
pub use suspend::suspend;
pub use task::Task;

// Platform detection: stacks are mmap-backed, see stack.rs
cfg_if::cfg_if! {
    if #[cfg(unix)] {
        // supported
    } else {
        compile_error!("Unsupported platform");
    }
}

// Architecture detection
cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub use arch::x86_64 as current_arch;
    } else if #[cfg(target_arch = "aarch64")] {
        pub use arch::aarch64 as current_arch;
    } else {
        compile_error!("Unsupported architecture");
    }
}
