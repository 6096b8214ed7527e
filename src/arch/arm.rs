use crate::{arch::Synthesis, types::DependencyBits};
use core::arch::asm;

pub(crate) struct Arm;

impl Synthesis for Arm {
    #[inline(always)]
    fn narrow(value: u32) -> DependencyBits {
        let dep: DependencyBits;
        // SAFETY: Register-only arithmetic; `eor` without `s` leaves the flags
        // alone. Not `pure`, so the block is never folded or hoisted.
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

    /// A 64-bit value lives in a register pair; both halves feed the token.
    #[inline(always)]
    fn wide(value: u64) -> DependencyBits {
        let low = value as u32;
        let high = (value >> 32) as u32;
        Self::narrow(low).wrapping_add(Self::narrow(high))
    }
}
