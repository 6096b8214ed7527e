//! Build-time selection of the dependency synthesis strategy.
//!
//! Exactly one strategy is compiled for the target and exported as [`Target`].
//! Every strategy fulfills the same contract: return zero bits whose
//! computation the optimizer cannot separate from the input register.

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "arm")]
mod arm;
#[cfg(target_arch = "powerpc64")]
mod powerpc64;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86;

#[cfg(target_arch = "aarch64")]
pub(crate) use aarch64::Aarch64 as Target;
#[cfg(target_arch = "arm")]
pub(crate) use arm::Arm as Target;
#[cfg(target_arch = "powerpc64")]
pub(crate) use powerpc64::PowerPc64 as Target;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) use x86::X86 as Target;

#[cfg(not(any(
    target_arch = "aarch64",
    target_arch = "arm",
    target_arch = "powerpc64",
    target_arch = "x86",
    target_arch = "x86_64",
)))]
compile_error!(
    "consume: dependency synthesis is only implemented for aarch64, arm, powerpc64, x86 and \
     x86_64; other targets would have to fall back to acquire loads, which this crate refuses \
     to do silently"
);

use crate::types::DependencyBits;

/// Contract of an architecture strategy.
pub(crate) trait Synthesis {
    /// Zero bits data-dependent on a 32-bit register.
    fn narrow(value: u32) -> DependencyBits;
    /// Zero bits data-dependent on a 64-bit value.
    fn wide(value: u64) -> DependencyBits;
}

#[cfg(test)]
mod tests {
    use super::{Synthesis, Target};

    #[test]
    fn narrow_is_zero() {
        for value in [0, 1, 42, 0x8000_0000, u32::MAX] {
            assert_eq!(Target::narrow(value), 0, "narrow({value:#x})");
        }
    }

    #[test]
    fn wide_is_zero() {
        for value in [0, 1, 42, 0xDEAD_BEEF_0000_0001, u64::MAX] {
            assert_eq!(Target::wide(value), 0, "wide({value:#x})");
        }
    }
}
