//! Architecture-specific context switching
//!
//! Saving and restoring the machine context of a flow of control, and
//! arming a fresh stack so its first switch-in lands in the entry routine.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub mod x86_64;
    } else if #[cfg(target_arch = "aarch64")] {
        pub mod aarch64;
    }
}
