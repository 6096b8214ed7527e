use crate::{
    arch::{Synthesis, Target},
    types::DependencyBits,
    utils::RegisterBits,
};
use core::ops::BitOr;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// An opaque value that can be chained through consume operations.
///
/// A dependency is always numerically zero, but it is produced from the bits
/// of a loaded value by an operation the optimizer cannot see through. Any
/// address or value computed from it therefore carries a real data dependency
/// on that load, which the hardware orders without a fence.
///
/// Dependencies combine with `|`: the result depends on every input. They
/// also tag integers with `|`, which is how dependent pointers are built.
///
/// Tokens create *false dependencies* in the ISA sense: they order, they carry
/// no information.
#[must_use]
#[derive(Clone, Copy, derive_more::Debug)]
#[debug("Dependency({_0:#x})")]
#[repr(transparent)]
pub struct Dependency(DependencyBits);

impl Dependency {
    /// Synthesize a dependency from the bits of `value`.
    ///
    /// Values narrower than 32 bits are widened first.
    #[inline]
    pub fn new<T: DependencySource>(value: T) -> Self {
        let bits = match value.register_bits() {
            RegisterBits::Narrow(value) => Target::narrow(value),
            RegisterBits::Wide(value) => Target::wide(value),
        };
        Self(bits)
    }

    /// The raw token bits.
    ///
    /// Always zero. Exposed so that harnesses can verify it; branching on the
    /// result lets the compiler drop the dependency, so never do it on a hot
    /// path.
    #[must_use]
    #[inline]
    pub const fn to_bits(self) -> DependencyBits {
        self.0
    }
}

impl BitOr for Dependency {
    type Output = Self;

    /// Combine two dependencies into one that depends on both.
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl BitOr<usize> for Dependency {
    type Output = usize;

    /// Tag an integer with this dependency.
    #[inline]
    fn bitor(self, rhs: usize) -> usize {
        self.0 | rhs
    }
}

impl BitOr<Dependency> for usize {
    type Output = usize;

    #[inline]
    fn bitor(self, rhs: Dependency) -> usize {
        self | rhs.0
    }
}

impl BitOr<isize> for Dependency {
    type Output = isize;

    /// Tag a signed integer with this dependency.
    #[inline]
    fn bitor(self, rhs: isize) -> isize {
        self.0 as isize | rhs
    }
}

impl BitOr<Dependency> for isize {
    type Output = isize;

    #[inline]
    fn bitor(self, rhs: Dependency) -> isize {
        self | rhs.0 as isize
    }
}

/// Scalars a dependency can be synthesized from.
///
/// Implemented for every 1-, 2-, 4- and 8-byte primitive, `usize`/`isize`
/// and thin raw pointers. Sealed: the set of supported widths is fixed by the
/// architecture strategies.
pub trait DependencySource: Copy + sealed::Sealed {
    #[doc(hidden)]
    fn register_bits(self) -> RegisterBits;
}

macro_rules! impl_dependency_source {
    ($($ty:ty: $value:ident => $bits:expr;)*) => {$(
        impl sealed::Sealed for $ty {}

        impl DependencySource for $ty {
            #[inline(always)]
            fn register_bits(self) -> RegisterBits {
                let $value = self;
                $bits
            }
        }
    )*};
}

impl_dependency_source! {
    u8: value => RegisterBits::Narrow(u32::from(value));
    i8: value => RegisterBits::Narrow(value as u32);
    u16: value => RegisterBits::Narrow(u32::from(value));
    i16: value => RegisterBits::Narrow(value as u32);
    u32: value => RegisterBits::Narrow(value);
    i32: value => RegisterBits::Narrow(value as u32);
    u64: value => RegisterBits::Wide(value);
    i64: value => RegisterBits::Wide(value as u64);
    usize: value => RegisterBits::from_usize(value);
    isize: value => RegisterBits::from_usize(value as usize);
    bool: value => RegisterBits::Narrow(u32::from(value));
    char: value => RegisterBits::Narrow(u32::from(value));
    f32: value => RegisterBits::Narrow(value.to_bits());
    f64: value => RegisterBits::Wide(value.to_bits());
}

impl<T> sealed::Sealed for *const T {}

impl<T> DependencySource for *const T {
    #[inline(always)]
    fn register_bits(self) -> RegisterBits {
        RegisterBits::from_usize(self.addr())
    }
}

impl<T> sealed::Sealed for *mut T {}

impl<T> DependencySource for *mut T {
    #[inline(always)]
    fn register_bits(self) -> RegisterBits {
        RegisterBits::from_usize(self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_width_decodes_to_zero() {
        assert_eq!(Dependency::new(0xABu8).to_bits(), 0);
        assert_eq!(Dependency::new(-1i8).to_bits(), 0);
        assert_eq!(Dependency::new(0xABCDu16).to_bits(), 0);
        assert_eq!(Dependency::new(i16::MIN).to_bits(), 0);
        assert_eq!(Dependency::new(u32::MAX).to_bits(), 0);
        assert_eq!(Dependency::new(i32::MIN).to_bits(), 0);
        assert_eq!(Dependency::new(u64::MAX).to_bits(), 0);
        assert_eq!(Dependency::new(i64::MIN).to_bits(), 0);
        assert_eq!(Dependency::new(usize::MAX).to_bits(), 0);
        assert_eq!(Dependency::new(-7isize).to_bits(), 0);
        assert_eq!(Dependency::new(true).to_bits(), 0);
        assert_eq!(Dependency::new('λ').to_bits(), 0);
        assert_eq!(Dependency::new(f32::NAN).to_bits(), 0);
        assert_eq!(Dependency::new(-0.0f64).to_bits(), 0);
    }

    #[test]
    fn pointer_sources_decode_to_zero() {
        let mut slot = 7u32;
        let ptr: *mut u32 = &mut slot;
        assert_eq!(Dependency::new(ptr).to_bits(), 0);
        assert_eq!(Dependency::new(ptr.cast_const()).to_bits(), 0);
        assert_eq!(Dependency::new(core::ptr::null::<u8>()).to_bits(), 0);
    }

    #[test]
    fn combination_is_associative_and_zero() {
        let a = Dependency::new(1u32);
        let b = Dependency::new(2u64);
        let c = Dependency::new(3u8);
        assert_eq!(((a | b) | c).to_bits(), (a | (b | c)).to_bits());
        assert_eq!(((a | b) | c).to_bits(), 0);
    }

    #[test]
    fn tagging_preserves_integers() {
        let dep = Dependency::new(99u16);
        assert_eq!(dep | 0x1234usize, 0x1234);
        assert_eq!(0x1234usize | dep, 0x1234);
        assert_eq!(dep | -5isize, -5);
        assert_eq!(-5isize | dep, -5);
    }

    #[test]
    fn debug_shows_bits() {
        assert_eq!(format!("{:?}", Dependency::new(5u32)), "Dependency(0x0)");
    }
}
