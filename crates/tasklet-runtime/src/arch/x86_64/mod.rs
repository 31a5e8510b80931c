//! x86_64 context switching implementation
//!
//! Naked-asm save/restore of the callee-saved register set. Stable since
//! Rust 1.88 (naked_asm!).

use std::arch::naked_asm;

use tasklet_core::context::MachineContext;

/// Arm a context to start a fresh call on a new stack
///
/// When `ctx` is first switched to, execution begins in the entry
/// trampoline, which calls `entry_fn(entry_arg)` and, if the entry routine
/// returns, falls through into a switch back to the task's caller context.
/// This makes "ran to completion" and "suspended" look identical to the
/// driver: both are a context switch back.
///
/// # Safety
///
/// `ctx` must point to valid `MachineContext` memory and `stack_top` must
/// be the top of a mapped stack region.
#[inline]
pub unsafe fn init_context(
    ctx: *mut MachineContext,
    stack_top: *mut u8,
    entry_fn: usize,
    entry_arg: usize,
) {
    // 16-byte alignment per the System V AMD64 ABI; the trampoline's own
    // `call` then produces the usual rsp % 16 == 8 state at entry_fn.
    let aligned_sp = (stack_top as usize) & !0xF;

    let ctx = &mut *ctx;
    ctx.rsp = aligned_sp as u64;
    ctx.rip = entry_trampoline as usize as u64;
    ctx.rbx = 0;
    ctx.rbp = 0;
    ctx.r12 = entry_fn as u64;
    ctx.r13 = entry_arg as u64;
    ctx.r14 = 0;
    ctx.r15 = 0;
}

/// First code to run on a task's own stack: calls the entry routine with
/// its argument, then hands control to the fall-through path.
#[unsafe(naked)]
pub unsafe extern "C" fn entry_trampoline() {
    naked_asm!(
        "mov rdi, r13",
        "call r12",
        "call {fell_through}",
        "ud2",
        fell_through = sym entry_fell_through,
    );
}

/// Switch from one machine context to another
///
/// Saves the callee-saved registers of the running flow into `save`, then
/// restores `load` and transfers control there. Returns when some later
/// switch restores `save`, with locals and stack exactly as they were.
///
/// The switch itself cannot fail; every fallible step (stack mapping,
/// context arming) happens before the first switch is attempted.
///
/// # Safety
///
/// `load` must contain a context armed by `init_context` or captured by a
/// previous `switch_context`; its stack must still be mapped.
#[unsafe(naked)]
pub unsafe extern "C" fn switch_context(
    _save: *mut MachineContext,
    _load: *const MachineContext,
) {
    naked_asm!(
        // Save callee-saved registers into *save (RDI)
        "mov [rdi + 0x00], rsp",
        "lea rax, [rip + 1f]",
        "mov [rdi + 0x08], rax",
        "mov [rdi + 0x10], rbx",
        "mov [rdi + 0x18], rbp",
        "mov [rdi + 0x20], r12",
        "mov [rdi + 0x28], r13",
        "mov [rdi + 0x30], r14",
        "mov [rdi + 0x38], r15",
        // Restore *load (RSI)
        "mov rsp, [rsi + 0x00]",
        "mov rax, [rsi + 0x08]",
        "mov rbx, [rsi + 0x10]",
        "mov rbp, [rsi + 0x18]",
        "mov r12, [rsi + 0x20]",
        "mov r13, [rsi + 0x28]",
        "mov r14, [rsi + 0x30]",
        "mov r15, [rsi + 0x38]",
        "jmp rax",
        // Resume point for the saved context
        "1:",
        "ret",
    );
}

/// Entry routine returned without suspending: switch back to the caller
/// context so the driver observes a completed task. The ucontext
/// `uc_link` equivalent.
extern "C" fn entry_fell_through() {
    let task = crate::tls::active();

    if task.is_null() {
        // No active task to return to - nothing sane left to do on this
        // stack. Spin rather than run off the trampoline's ud2.
        loop {
            std::hint::spin_loop();
        }
    }

    unsafe {
        let task = &*task;
        switch_context(task.own_ctx_ptr(), task.caller_ctx_ptr());
    }

    unreachable!("completed task was switched into again");
}
