use crate::{arch::Synthesis, types::DependencyBits};
use core::arch::asm;

pub(crate) struct PowerPc64;

impl Synthesis for PowerPc64 {
    #[inline(always)]
    fn narrow(value: u32) -> DependencyBits {
        Self::wide(u64::from(value))
    }

    #[inline(always)]
    fn wide(value: u64) -> DependencyBits {
        let dep: DependencyBits;
        // SAFETY: Register-only arithmetic; `xor` without the record bit leaves
        // CR0 alone. Not `pure`, so the block is never folded or hoisted.
        unsafe {
            asm!(
                "xor {dep}, {src}, {src}",
                dep = lateout(reg) dep,
                src = in(reg) value,
                options(nomem, nostack, preserves_flags),
            );
        }
        dep
    }
}
