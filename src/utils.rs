/// Bits of a loaded value widened to a register the synthesis strategy can
/// operate on.
///
/// Values of 1 or 2 bytes are widened to `Narrow`; there is no 8- or 16-bit
/// variant because the strategies only target native register widths.
#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterBits {
    /// A 32-bit register.
    Narrow(u32),
    /// A 64-bit register (a register pair on 32-bit targets).
    Wide(u64),
}

impl RegisterBits {
    #[cfg(target_pointer_width = "32")]
    #[inline(always)]
    pub(crate) const fn from_usize(value: usize) -> Self {
        Self::Narrow(value as u32)
    }

    #[cfg(target_pointer_width = "64")]
    #[inline(always)]
    pub(crate) const fn from_usize(value: usize) -> Self {
        Self::Wide(value as u64)
    }
}
