use crate::{arch::Synthesis, types::DependencyBits};
use core::sync::atomic::{Ordering, compiler_fence};

/// x86 never reorders a load with a later load, so any zero will do; only the
/// compiler has to be kept from moving dependent accesses above the origin.
pub(crate) struct X86;

impl Synthesis for X86 {
    #[inline(always)]
    #[allow(clippy::eq_op)]
    fn narrow(value: u32) -> DependencyBits {
        let dep = (value ^ value) as DependencyBits;
        compiler_fence(Ordering::Acquire);
        dep
    }

    #[inline(always)]
    #[allow(clippy::eq_op)]
    fn wide(value: u64) -> DependencyBits {
        let dep = (value ^ value) as DependencyBits;
        compiler_fence(Ordering::Acquire);
        dep
    }
}
