use crate::{arch::Synthesis, types::DependencyBits};
use core::arch::asm;

pub(crate) struct Aarch64;

impl Synthesis for Aarch64 {
    #[inline(always)]
    fn narrow(value: u32) -> DependencyBits {
        let dep: DependencyBits;
        // SAFETY: Register-only arithmetic. Writing the `w` view zero-extends into
        // the full `x` register, so `dep` is a 64-bit zero. Not `pure`, so the
        // block is never folded or hoisted.
        unsafe {
            asm!(
                "eor {dep:w}, {src:w}, {src:w}",
                dep = lateout(reg) dep,
                src = in(reg) value,
                options(nomem, nostack, preserves_flags),
            );
        }
        dep
    }

    #[inline(always)]
    fn wide(value: u64) -> DependencyBits {
        let dep: DependencyBits;
        // SAFETY: Register-only arithmetic. Not `pure`, so the block is never
        // folded or hoisted.
        unsafe {
            asm!(
                "eor {dep}, {src}, {src}",
                dep = lateout(reg) dep,
                src = in(reg) value,
                options(nomem, nostack, preserves_flags),
            );
        }
        dep
    }
}
