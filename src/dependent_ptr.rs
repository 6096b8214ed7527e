use crate::{
    dependency::{Dependency, DependencySource},
    dependent::Dependent,
};
use core::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    ops::BitOr,
    ptr,
    sync::atomic::AtomicPtr,
};

/// A pointer obtained through a consume load.
///
/// Unlike `Dependent<*mut T>`, a `DependentPtr` is a single machine word: the
/// dependency is ORed into the pointer's bit pattern. The token is zero, so
/// the address is unchanged, but every access through the pointer is
/// data-dependent on the load the token came from. This closely matches how
/// ISAs express address dependencies.
///
/// Chain rules:
/// - Constructing from a raw pointer, or assigning one with
///   [`set_raw`](Self::set_raw)/[`set_null`](Self::set_null), carries no
///   dependency.
/// - [`with_dependency`](Self::with_dependency) starts a chain.
/// - Copies, and [`assign`](Self::assign) from another dependent pointer,
///   extend the chain.
/// - [`index`](Self::index), [`read`](Self::read),
///   [`address_of`](Self::address_of) and [`to_addr`](Self::to_addr) extend
///   the chain to their results.
/// - [`as_ptr`](Self::as_ptr) and [`as_ref`](Self::as_ref) are ordered by the
///   chain but their results do not extend it.
///
/// Comparisons use the address only and never extend a chain: the compiler
/// may use the outcome of a branch to replace one pointer with another and
/// drop the dependency.
///
/// A `DependentPtr` never owns its pointee.
#[must_use]
#[derive(derive_more::Debug)]
#[debug("DependentPtr({ptr:p})")]
#[repr(transparent)]
pub struct DependentPtr<T> {
    ptr: *mut T,
}

const _: () = assert!(size_of::<DependentPtr<u8>>() == size_of::<AtomicPtr<u8>>());
const _: () = assert!(align_of::<DependentPtr<u64>>() <= align_of::<AtomicPtr<u64>>());

impl<T> DependentPtr<T> {
    /// Wrap a raw pointer without a dependency.
    #[inline]
    pub const fn new(ptr: *mut T) -> Self {
        Self { ptr }
    }

    /// A null pointer without a dependency.
    #[inline]
    pub const fn null() -> Self {
        Self::new(ptr::null_mut())
    }

    /// Tag `ptr` with `dependency`, starting a chain.
    #[inline]
    pub fn with_dependency(ptr: *mut T, dependency: Dependency) -> Self {
        let dependency = dependency | Dependency::new(ptr);
        Self {
            ptr: ptr.map_addr(|addr| dependency | addr),
        }
    }

    /// Tag a pointer with a dependency on its own, just loaded, bits.
    #[inline]
    pub(crate) fn loaded(ptr: *mut T) -> Self {
        let dependency = Dependency::new(ptr);
        Self {
            ptr: ptr.map_addr(|addr| dependency | addr),
        }
    }

    /// Rebuild a pointer from a dependent address, e.g. after stripping tag
    /// bits from the result of [`to_addr`](Self::to_addr).
    ///
    /// The address must come from an exposed pointer for the result to be
    /// dereferenceable.
    #[inline]
    pub fn from_addr(addr: Dependent<usize>) -> Self {
        let (addr, dependency) = addr.into_parts();
        Self::with_dependency(ptr::with_exposed_provenance_mut(addr), dependency)
    }

    /// Signed counterpart of [`from_addr`](Self::from_addr).
    #[inline]
    pub fn from_signed_addr(addr: Dependent<isize>) -> Self {
        let (addr, dependency) = addr.into_parts();
        Self::with_dependency(ptr::with_exposed_provenance_mut(addr as usize), dependency)
    }

    /// Assign a raw pointer, breaking the chain.
    #[inline]
    pub fn set_raw(&mut self, ptr: *mut T) {
        self.ptr = ptr;
    }

    /// Assign null, breaking the chain.
    #[inline]
    pub fn set_null(&mut self) {
        self.ptr = ptr::null_mut();
    }

    /// Assign another dependent pointer.
    ///
    /// The chain extends to cover both the assignment and the returned value.
    #[inline]
    pub fn assign(&mut self, rhs: Self) -> Self {
        self.ptr = rhs.ptr;
        *self
    }

    /// Convert to an integer, extending the chain to the result.
    ///
    /// Tag bits may be ORed into the integer (or ORed with further
    /// dependencies) without leaving the chain; see
    /// [`from_addr`](Self::from_addr) for the way back.
    #[inline]
    pub fn to_addr(&self) -> Dependent<usize> {
        Dependent::new(self.ptr.expose_provenance())
    }

    /// Signed counterpart of [`to_addr`](Self::to_addr).
    #[inline]
    pub fn to_signed_addr(&self) -> Dependent<isize> {
        Dependent::new(self.ptr.expose_provenance() as isize)
    }

    /// Read the element at `offset`, extending the chain through the read.
    ///
    /// # Safety
    ///
    /// `self.value().add(offset)` must be valid for reads and properly
    /// aligned, and the element must not be written concurrently. Writes made
    /// by another thread are visible only if that thread released them before
    /// the store that this chain's origin load observed.
    #[inline]
    pub unsafe fn index(&self, offset: usize) -> Dependent<T>
    where
        T: DependencySource,
    {
        // SAFETY: Upheld by the caller.
        let value = unsafe { self.ptr.add(offset).read() };
        Dependent::new(value)
    }

    /// Read the pointee, extending the chain through the read.
    ///
    /// # Safety
    ///
    /// Same as [`index`](Self::index) with an offset of zero.
    #[inline]
    pub unsafe fn read(&self) -> Dependent<T>
    where
        T: Copy,
    {
        // SAFETY: Upheld by the caller.
        let value = unsafe { self.ptr.read() };
        Dependent::with_dependency(value, self.dependency())
    }

    /// The tagged pointer, for member access.
    ///
    /// Accesses made through it are ordered by the chain, but field pointers
    /// derived from it carry no new dependency. Wrap them with
    /// [`with_dependency`](Self::with_dependency) to continue.
    #[must_use]
    #[inline]
    pub const fn as_ptr(&self) -> *mut T {
        self.ptr
    }

    /// Borrow the pointee for member access.
    ///
    /// # Safety
    ///
    /// The pointer must be non-null, aligned and point to a `T` that stays
    /// alive and unmutated for `'a`.
    #[must_use]
    #[inline]
    pub unsafe fn as_ref<'a>(&self) -> &'a T {
        // SAFETY: Upheld by the caller.
        unsafe { &*self.ptr }
    }

    /// A dependent pointer to this pointer's own storage.
    ///
    /// The chain extends to the address computation. The result points into
    /// `self`, carries write provenance for it, and must not be used after
    /// `self` is moved or dropped.
    #[inline]
    pub fn address_of(&mut self) -> DependentPtr<*mut T> {
        let dependency = self.dependency();
        DependentPtr::with_dependency(&raw mut self.ptr, dependency)
    }

    /// The raw pointer value, e.g. to call through a function pointer.
    ///
    /// The chain extends to the returned value.
    #[must_use]
    #[inline]
    pub const fn value(&self) -> *mut T {
        self.ptr
    }

    /// A pure dependency on the pointer's current value.
    ///
    /// Does not consume or alter the chain; may be called any number of times.
    #[inline]
    pub fn dependency(&self) -> Dependency {
        Dependency::new(self.ptr)
    }

    /// Whether the pointer is null.
    #[must_use]
    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

impl<T> Clone for DependentPtr<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DependentPtr<T> {}

impl<T> Default for DependentPtr<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<*mut T> for DependentPtr<T> {
    #[inline]
    fn from(ptr: *mut T) -> Self {
        Self::new(ptr)
    }
}

impl<T> From<*const T> for DependentPtr<T> {
    #[inline]
    fn from(ptr: *const T) -> Self {
        Self::new(ptr.cast_mut())
    }
}

impl<T> PartialEq for DependentPtr<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr.addr() == other.ptr.addr()
    }
}

impl<T> Eq for DependentPtr<T> {}

impl<T> PartialEq<*mut T> for DependentPtr<T> {
    #[inline]
    fn eq(&self, other: &*mut T) -> bool {
        self.ptr.addr() == other.addr()
    }
}

impl<T> PartialEq<*const T> for DependentPtr<T> {
    #[inline]
    fn eq(&self, other: &*const T) -> bool {
        self.ptr.addr() == other.addr()
    }
}

impl<T> PartialOrd for DependentPtr<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for DependentPtr<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.ptr.addr().cmp(&other.ptr.addr())
    }
}

impl<T> Hash for DependentPtr<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.addr().hash(state);
    }
}

impl<T> BitOr<DependentPtr<T>> for Dependency {
    type Output = Dependency;

    #[inline]
    fn bitor(self, rhs: DependentPtr<T>) -> Dependency {
        self | rhs.dependency()
    }
}

impl<T> BitOr<Dependency> for DependentPtr<T> {
    type Output = Dependency;

    #[inline]
    fn bitor(self, rhs: Dependency) -> Dependency {
        self.dependency() | rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagging_keeps_the_address() {
        let mut value = 5u64;
        let raw: *mut u64 = &mut value;
        let tagged = DependentPtr::with_dependency(raw, Dependency::new(11u32));
        assert_eq!(tagged.value(), raw);
        assert_eq!(tagged, raw);
        // SAFETY: `raw` points to a live local.
        assert_eq!(unsafe { tagged.read() }.value(), 5);
    }

    #[test]
    fn comparisons_use_addresses() {
        let values = [1u32, 2];
        let first = DependentPtr::from(values.as_ptr());
        let second = DependentPtr::with_dependency(
            values[1..].as_ptr().cast_mut(),
            Dependency::new(first.value()),
        );
        assert!(first < second);
        assert_ne!(first, second);
        assert_eq!(first.max(second), second);
    }

    #[test]
    fn null_and_default() {
        let null = DependentPtr::<u8>::default();
        assert!(null.is_null());
        assert_eq!(null, DependentPtr::null());
        let tagged_null =
            DependentPtr::<u8>::with_dependency(ptr::null_mut(), Dependency::new(1u8));
        assert!(tagged_null.is_null());
    }

    #[test]
    fn debug_prints_the_address() {
        let null = DependentPtr::<u8>::null();
        assert_eq!(format!("{null:?}"), "DependentPtr(0x0)");
    }

    #[test]
    fn address_of_points_at_own_storage() {
        let mut value = 4u8;
        let mut pointer = DependentPtr::with_dependency(&raw mut value, Dependency::new(2u16));
        let storage = ptr::from_mut(&mut pointer).cast::<*mut u8>();
        let slot = pointer.address_of();
        assert_eq!(slot, storage);
        assert_eq!(slot.dependency().to_bits(), 0);
    }
}
