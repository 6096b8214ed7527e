//! Dependency-ordered ("consume") atomic loads.
//!
//! A consumer of an atomic load usually only needs ordering for memory it
//! reaches *through* the loaded value, e.g. the fields of a just-published
//! object. An acquire load over-orders: it also fences every unrelated load
//! that follows. On ARM and POWER the hardware already orders accesses whose
//! address or data depends on a load, so the fence is not needed, provided the
//! compiler keeps the dependency. This crate makes sure it does:
//! - Origin loads are relaxed and synthesize a zero-valued [`Dependency`] from
//!   the loaded bits by an operation the optimizer cannot see through
//!   (hand-written `eor`/`xor` on ARM and POWER, a compiler fence on x86).
//! - The dependency travels with the value as a [`Dependent`], or is ORed into
//!   the bit pattern of a [`DependentPtr`]. Every indexing, dereference or
//!   chained load through a dependent pointer is data-dependent on the origin.
//!
//! Key modules:
//! - `dependency`: the opaque token and its combination rules.
//! - `dependent`, `dependent_ptr`: the value and pointer wrappers.
//! - `load`: origin loads ([`ConsumeLoad`]) and continuations ([`ChainLoad`]).
//! - `harness`: checks of the ordering contract, including the two-thread
//!   publication scenario.
//!
//! Quick start:
//! ```
//! use consume::{DependentPtr, consume_load};
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let data = [10u32, 20, 30];
//! let ready = AtomicBool::new(false);
//! ready.store(true, Ordering::Release);
//!
//! let flag = consume_load(&ready);
//! if flag.value() {
//!     let data = DependentPtr::with_dependency(data.as_ptr().cast_mut(), flag.dependency());
//!     // SAFETY: `data` points to three live elements.
//!     assert_eq!(unsafe { data.index(2) }.value(), 30);
//! }
//! ```
//!
//! The crate only orders accesses. It never owns, frees or reclaims the memory
//! a dependent pointer refers to, and it relies on the producer publishing
//! with a release store.
//!
//! Supported targets are aarch64, arm, x86, x86_64 and powerpc64 (nightly,
//! for `asm_experimental_arch`). Any other target fails to build.
#![cfg_attr(target_arch = "powerpc64", feature(asm_experimental_arch))]

mod arch;
/// Parameters of the publication scenario.
pub mod config;
/// The opaque dependency token and its combination rules.
///
/// Exposes [`Dependency`] and the sealed [`DependencySource`] trait listing
/// the scalars a dependency can be synthesized from.
pub mod dependency;
/// A scalar value paired with its dependency.
pub mod dependent;
/// A single-word pointer carrying its dependency in its bit pattern.
pub mod dependent_ptr;
/// Verification of the ordering contract on the running machine.
///
/// Mirrors a standalone check program: origin loads of every supported width
/// must decode to a zero dependency, and a consumer that reads a published
/// buffer through a dependency chain must never observe a stale element.
pub mod harness;
/// Origin and continuation loads.
pub mod load;
mod sync;
/// Shared aliases and the `SyncUnsafeCell` primitive used internally.
pub mod types;
mod utils;

pub use dependency::{Dependency, DependencySource};
pub use dependent::Dependent;
pub use dependent_ptr::DependentPtr;
pub use load::{
    AtomicWord, ChainLoad, ConsumeLoad, consume_load, consume_load_at, consume_load_through,
};
