use crate::{
    dependency::{Dependency, DependencySource},
    dependent::Dependent,
    dependent_ptr::DependentPtr,
    sync::{self, ORIGIN_ORDERING},
};
use core::sync::atomic::{self as core_atomic, Ordering};

/// Atomic locations a dependency chain can originate from.
///
/// The load is relaxed; ordering of everything downstream comes from the
/// dependency synthesized from the loaded bits. The storing thread must
/// publish with a release store (or stronger); nothing here can check that.
pub trait ConsumeLoad {
    /// The dependent wrapper of the loaded value.
    type Output;

    /// Load the current value and start a dependency chain from it.
    fn consume_load(&self) -> Self::Output;
}

macro_rules! impl_consume_load {
    ($($atomic:ident => $ty:ty),* $(,)?) => {$(
        impl ConsumeLoad for sync::$atomic {
            type Output = Dependent<$ty>;

            #[inline]
            fn consume_load(&self) -> Dependent<$ty> {
                Dependent::new(self.load(ORIGIN_ORDERING))
            }
        }
    )*};
}

impl_consume_load! {
    AtomicBool => bool,
    AtomicU8 => u8,
    AtomicI8 => i8,
    AtomicU16 => u16,
    AtomicI16 => i16,
    AtomicU32 => u32,
    AtomicI32 => i32,
    AtomicU64 => u64,
    AtomicI64 => i64,
    AtomicUsize => usize,
    AtomicIsize => isize,
}

impl<T> ConsumeLoad for sync::AtomicPtr<T> {
    type Output = DependentPtr<T>;

    #[inline]
    fn consume_load(&self) -> DependentPtr<T> {
        DependentPtr::loaded(self.load(ORIGIN_ORDERING))
    }
}

#[cfg(not(feature = "loom"))]
impl ConsumeLoad for atomic_float::AtomicF32 {
    type Output = Dependent<f32>;

    #[inline]
    fn consume_load(&self) -> Dependent<f32> {
        Dependent::new(self.load(ORIGIN_ORDERING))
    }
}

#[cfg(not(feature = "loom"))]
impl ConsumeLoad for atomic_float::AtomicF64 {
    type Output = Dependent<f64>;

    #[inline]
    fn consume_load(&self) -> Dependent<f64> {
        Dependent::new(self.load(ORIGIN_ORDERING))
    }
}

/// Scalars that a chain can be continued through by reading them atomically.
///
/// Sealed through [`DependencySource`].
pub trait AtomicWord: DependencySource {
    /// # Safety
    ///
    /// See [`ChainLoad::consume_load`].
    #[doc(hidden)]
    unsafe fn load_relaxed(ptr: *mut Self) -> Self;
}

macro_rules! impl_atomic_word {
    ($($ty:ty => $atomic:ident),* $(,)?) => {$(
        const _: () = assert!(size_of::<$ty>() == size_of::<core_atomic::$atomic>());

        impl AtomicWord for $ty {
            #[inline]
            unsafe fn load_relaxed(ptr: *mut Self) -> Self {
                // SAFETY: Upheld by the caller; the sizes match (checked above).
                unsafe { core_atomic::$atomic::from_ptr(ptr) }.load(Ordering::Relaxed)
            }
        }
    )*};
}

impl_atomic_word! {
    bool => AtomicBool,
    u8 => AtomicU8,
    i8 => AtomicI8,
    u16 => AtomicU16,
    i16 => AtomicI16,
    u32 => AtomicU32,
    i32 => AtomicI32,
    u64 => AtomicU64,
    i64 => AtomicI64,
    usize => AtomicUsize,
    isize => AtomicIsize,
}

impl AtomicWord for f32 {
    #[inline]
    unsafe fn load_relaxed(ptr: *mut Self) -> Self {
        // SAFETY: Upheld by the caller; `f32` and `u32` share size and layout.
        let bits = unsafe { u32::load_relaxed(ptr.cast()) };
        f32::from_bits(bits)
    }
}

impl AtomicWord for f64 {
    #[inline]
    unsafe fn load_relaxed(ptr: *mut Self) -> Self {
        // SAFETY: Upheld by the caller; `f64` and `u64` share size and layout.
        let bits = unsafe { u64::load_relaxed(ptr.cast()) };
        f64::from_bits(bits)
    }
}

/// Dependent pointers a chain can be continued through.
///
/// This is the only place where plain memory is reinterpreted as an atomic:
/// the pointee is read with a relaxed atomic load through the tagged pointer,
/// so the read itself sits on the chain, and the result carries a dependency
/// on the bits it read.
pub trait ChainLoad {
    /// The dependent wrapper of the pointee.
    type Output;

    /// Read the pointee and extend the chain to it.
    ///
    /// # Safety
    ///
    /// - The pointer must be non-null, aligned to the atomic type of the
    ///   pointee (which may exceed the pointee's own alignment, e.g. `u64` on
    ///   32-bit x86), and valid for both reads and writes. The read goes
    ///   through a shared atomic, so a pointer derived from a shared reference
    ///   or a `*const` does not qualify even though nothing is written.
    /// - The pointee may be written concurrently only through atomic
    ///   operations.
    /// - The pointer must actually be part of a chain anchored to a consume
    ///   load. A dependency fabricated without a load orders nothing; the
    ///   read is then as unordered as a relaxed load.
    unsafe fn consume_load(self) -> Self::Output;
}

impl<T: AtomicWord> ChainLoad for DependentPtr<T> {
    type Output = Dependent<T>;

    #[inline]
    unsafe fn consume_load(self) -> Dependent<T> {
        // SAFETY: Upheld by the caller.
        let value = unsafe { T::load_relaxed(self.as_ptr()) };
        Dependent::new(value)
    }
}

impl<T> ChainLoad for DependentPtr<*mut T> {
    type Output = DependentPtr<T>;

    #[inline]
    unsafe fn consume_load(self) -> DependentPtr<T> {
        const { assert!(size_of::<*mut T>() == size_of::<core_atomic::AtomicPtr<T>>()) };
        // SAFETY: Upheld by the caller; `*mut T` and `AtomicPtr<T>` have the same
        // size (checked above) and in-memory representation.
        let slot = unsafe { core_atomic::AtomicPtr::from_ptr(self.as_ptr()) };
        let loaded = slot.load(Ordering::Relaxed);
        DependentPtr::loaded(loaded)
    }
}

/// Start a dependency chain from an atomic location.
///
/// Equivalent to `location.consume_load()`.
#[inline]
pub fn consume_load<A: ConsumeLoad + ?Sized>(location: &A) -> A::Output {
    location.consume_load()
}

/// Continue a dependency chain through a dependent pointer.
///
/// # Safety
///
/// See [`ChainLoad::consume_load`].
#[inline]
pub unsafe fn consume_load_through<P: ChainLoad>(ptr: P) -> P::Output {
    // SAFETY: Upheld by the caller.
    unsafe { ptr.consume_load() }
}

/// Continue a dependency chain through `location`, tagged with `dependency`.
///
/// # Safety
///
/// See [`ChainLoad::consume_load`]; `dependency` must come from the chain the
/// read is meant to be ordered by.
#[inline]
pub unsafe fn consume_load_at<T>(
    location: *mut T,
    dependency: Dependency,
) -> <DependentPtr<T> as ChainLoad>::Output
where
    DependentPtr<T>: ChainLoad,
{
    // SAFETY: Upheld by the caller.
    unsafe { DependentPtr::with_dependency(location, dependency).consume_load() }
}
