use crate::sync::UnsafeCell;
use derive_more::{Deref, DerefMut};

/// A minimal `UnsafeCell` wrapper that is `Sync` when `T: Sync`.
///
/// Used by the harness to share a plainly written buffer between the
/// publishing thread and the consuming thread. Correctness is ensured by the
/// publication protocol: the consumer reads a slot only through a dependency
/// chain anchored to the flag the producer released after its last write.
///
/// Under loom the inner cell is `loom::cell::UnsafeCell`, so every slot access
/// is checked for causality.
#[derive(Debug, Deref, DerefMut)]
#[repr(transparent)]
pub(crate) struct SyncUnsafeCell<T>(UnsafeCell<T>);

unsafe impl<T: Sync> Sync for SyncUnsafeCell<T> {}

impl<T> SyncUnsafeCell<T> {
    pub(crate) fn new(val: T) -> Self {
        Self(UnsafeCell::new(val))
    }
}

/// Raw representation of a dependency token.
///
/// One general-purpose register: 32 bits on 32-bit targets, 64 bits on 64-bit
/// targets. The value is always zero.
pub type DependencyBits = usize;
