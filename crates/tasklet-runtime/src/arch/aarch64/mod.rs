//! aarch64 context switching implementation
//!
//! TODO: port the x86_64 switch (x19-x28, fp, lr, sp, d8-d15) once the
//! MachineContext record grows an aarch64 layout.

use tasklet_core::context::MachineContext;

/// Arm a context to start a fresh call on a new stack
pub unsafe fn init_context(
    _ctx: *mut MachineContext,
    _stack_top: *mut u8,
    _entry_fn: usize,
    _entry_arg: usize,
) {
    todo!("aarch64 init_context not yet implemented")
}

/// Switch from one machine context to another
pub unsafe extern "C" fn switch_context(
    _save: *mut MachineContext,
    _load: *const MachineContext,
) {
    todo!("aarch64 switch_context not yet implemented")
}
