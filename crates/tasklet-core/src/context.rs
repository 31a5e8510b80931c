//! Machine-context record layout
//!
//! `MachineContext` has a fixed repr(C) layout because the context-switch
//! assembly in `tasklet-runtime` addresses its fields by byte offset.
//!
//! Layout (offsets are stable for ASM access):
//! ```text
//! 0x00: rsp    0x08: rip    0x10: rbx    0x18: rbp
//! 0x20: r12    0x28: r13    0x30: r14    0x38: r15
//! ```
//!
//! Only the callee-saved register set is recorded: every switch is
//! voluntary (a call into the switch primitive), so caller-saved registers
//! are dead by ABI at the switch point. The field names follow x86_64; the
//! aarch64 port will widen this record when it lands.

use crate::constants::CONTEXT_SIZE;

/// Saved execution context of one flow of control.
///
/// Two per task: the task's own context and the context of whoever last
/// stepped it. A zeroed record is "never ran"; `init_context` in the
/// runtime arms it with an entry routine and a stack.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct MachineContext {
    pub rsp: u64,
    pub rip: u64,
    pub rbx: u64,
    pub rbp: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,
}

impl MachineContext {
    /// A context that has never run.
    pub const fn new() -> Self {
        Self {
            rsp: 0,
            rip: 0,
            rbx: 0,
            rbp: 0,
            r12: 0,
            r13: 0,
            r14: 0,
            r15: 0,
        }
    }
}

impl Default for MachineContext {
    fn default() -> Self {
        Self::new()
    }
}

// The asm depends on this exact size.
const _: () = {
    assert!(core::mem::size_of::<MachineContext>() == CONTEXT_SIZE);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_offsets() {
        let ctx = MachineContext::new();
        let base = &ctx as *const _ as usize;

        assert_eq!(&ctx.rsp as *const _ as usize - base, 0x00);
        assert_eq!(&ctx.rip as *const _ as usize - base, 0x08);
        assert_eq!(&ctx.rbx as *const _ as usize - base, 0x10);
        assert_eq!(&ctx.rbp as *const _ as usize - base, 0x18);
        assert_eq!(&ctx.r12 as *const _ as usize - base, 0x20);
        assert_eq!(&ctx.r13 as *const _ as usize - base, 0x28);
        assert_eq!(&ctx.r14 as *const _ as usize - base, 0x30);
        assert_eq!(&ctx.r15 as *const _ as usize - base, 0x38);
    }

    #[test]
    fn test_size() {
        assert_eq!(core::mem::size_of::<MachineContext>(), CONTEXT_SIZE);
    }
}
