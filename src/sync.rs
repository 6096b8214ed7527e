#[cfg(feature = "loom")]
mod imp {
    pub(crate) use loom::{
        cell::UnsafeCell,
        sync::atomic::{
            AtomicBool, AtomicI8, AtomicI16, AtomicI32, AtomicI64, AtomicIsize, AtomicPtr,
            AtomicU8, AtomicU16, AtomicU32, AtomicU64, AtomicUsize, Ordering,
        },
        thread,
    };

    /// Ordering of the atomic read at a chain origin.
    ///
    /// Loom does not model address or data dependencies, so under loom the
    /// origin is an acquire load and the models check the publication protocol
    /// around it.
    pub(crate) const ORIGIN_ORDERING: Ordering = Ordering::Acquire;

    pub(crate) fn join<RA: Send + 'static, RB: Send + 'static>(
        lhs: impl FnOnce() -> RA + Send + 'static,
        rhs: impl FnOnce() -> RB + Send + 'static,
    ) -> (RA, RB) {
        let lhs = thread::spawn(lhs);
        let rhs = thread::spawn(rhs);
        (joined(lhs), joined(rhs))
    }

    pub(crate) fn spin_wait() {
        thread::yield_now();
    }

    fn joined<R>(handle: thread::JoinHandle<R>) -> R {
        handle
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
    }
}

#[cfg(not(feature = "loom"))]
mod imp {
    pub(crate) use core::{
        cell::UnsafeCell,
        sync::atomic::{
            AtomicBool, AtomicI8, AtomicI16, AtomicI32, AtomicI64, AtomicIsize, AtomicPtr,
            AtomicU8, AtomicU16, AtomicU32, AtomicU64, AtomicUsize, Ordering,
        },
    };

    /// Ordering of the atomic read at a chain origin.
    pub(crate) const ORIGIN_ORDERING: Ordering = Ordering::Relaxed;

    pub(crate) fn join<RA: Send, RB: Send>(
        lhs: impl FnOnce() -> RA + Send,
        rhs: impl FnOnce() -> RB + Send,
    ) -> (RA, RB) {
        rayon::join(lhs, rhs)
    }

    pub(crate) fn spin_wait() {
        core::hint::spin_loop();
    }

    /// The closure-based access of `loom::cell::UnsafeCell`.
    pub(crate) trait LoomUnsafeCellCompat<T> {
        fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R;
        fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R;
    }

    impl<T> LoomUnsafeCellCompat<T> for UnsafeCell<T> {
        #[inline]
        fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
            f(self.get())
        }

        #[inline]
        fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
            f(self.get())
        }
    }
}

pub(crate) use imp::*;
