//! Per-task execution stacks
//!
//! Each task owns one fixed-size stack, mapped lazily on its first step and
//! unmapped when the task is dropped. A PROT_NONE guard page sits below the
//! usable region, so running off the end of the stack faults instead of
//! corrupting neighbouring memory.

use std::ffi::c_void;
use std::num::NonZeroUsize;
use std::ptr::NonNull;

use nix::sys::mman::{mmap_anonymous, mprotect, munmap, MapFlags, ProtFlags};

use tasklet_core::error::{EngineError, EngineResult};
use tasklet_core::twarn;

/// An exclusively-owned stack region.
///
/// Layout, low to high: `[guard page][usable stack]`. The stack grows down
/// from `top()` toward the guard.
#[derive(Debug)]
pub struct TaskStack {
    base: NonNull<c_void>,
    total: usize,
    guard: usize,
}

impl TaskStack {
    /// Map a stack with at least `stack_size` usable bytes (rounded up to
    /// whole pages) plus one guard page.
    pub fn allocate(stack_size: usize) -> EngineResult<Self> {
        let page = page_size();

        let usable = stack_size
            .checked_add(page - 1)
            .map(|n| n & !(page - 1))
            .ok_or(EngineError::StackAllocationFailed(libc::EINVAL))?;
        let total = usable
            .checked_add(page)
            .ok_or(EngineError::StackAllocationFailed(libc::EINVAL))?;

        let len = NonZeroUsize::new(total)
            .ok_or(EngineError::StackAllocationFailed(libc::EINVAL))?;

        let base = unsafe {
            mmap_anonymous(
                None,
                len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_PRIVATE,
            )
        }
        .map_err(|e| EngineError::StackAllocationFailed(e as i32))?;

        // Revoke access to the lowest page; overflow faults there.
        if let Err(e) = unsafe { mprotect(base, page, ProtFlags::PROT_NONE) } {
            let _ = unsafe { munmap(base, total) };
            return Err(EngineError::StackProtectionFailed(e as i32));
        }

        Ok(Self {
            base,
            total,
            guard: page,
        })
    }

    /// One past the highest usable byte; the initial stack pointer.
    #[inline]
    pub fn top(&self) -> *mut u8 {
        unsafe { (self.base.as_ptr() as *mut u8).add(self.total) }
    }

    /// Lowest usable address, just above the guard page.
    #[inline]
    pub fn bottom(&self) -> *mut u8 {
        unsafe { (self.base.as_ptr() as *mut u8).add(self.guard) }
    }

    /// Usable bytes between guard and top.
    #[inline]
    pub fn usable_size(&self) -> usize {
        self.total - self.guard
    }
}

impl Drop for TaskStack {
    fn drop(&mut self) {
        if let Err(e) = unsafe { munmap(self.base, self.total) } {
            twarn!("munmap of task stack failed (errno {})", e as i32);
        }
    }
}

#[inline]
fn page_size() -> usize {
    let n = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if n > 0 {
        n as usize
    } else {
        4096
    }
}
