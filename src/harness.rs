use crate::{
    config::PublicationConfig,
    dependent::Dependent,
    dependent_ptr::DependentPtr,
    load::ConsumeLoad,
    sync::*,
    types::SyncUnsafeCell,
};
use core::{fmt::Debug, sync::atomic::compiler_fence};
use log::{debug, error, trace};
use std::sync::Arc;
use thiserror::Error;

/// A violation detected by the harness.
///
/// Every variant means the ordering contract of this crate does not hold on
/// the running machine (or the harness was misconfigured); callers should
/// treat any of them as fatal.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum HarnessError {
    /// A synthesized dependency did not decode to zero.
    #[error("dependency decoded to {bits:#x} instead of zero")]
    NonZeroDependency {
        /// Raw token bits.
        bits: usize,
    },
    /// A loaded value differs from the expected one.
    #[error("got {got} expected {expected} for {what}")]
    Mismatch {
        /// What was being checked.
        what: &'static str,
        /// Debug rendering of the observed value.
        got: String,
        /// Debug rendering of the expected value.
        expected: String,
    },
    /// The consumer observed the flag but read an element written before it
    /// was published.
    #[error("round {round}: element {index} read {got}, expected {expected}")]
    StaleRead {
        /// Zero-based round.
        round: usize,
        /// Element index.
        index: usize,
        /// Observed element.
        got: u32,
        /// Published element.
        expected: u32,
    },
    /// The publication scenario cannot run with the given parameters.
    #[error("invalid publication config: {0}")]
    InvalidConfig(&'static str),
}

/// Statistics of a successful [`run_publication`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicationReport {
    /// Completed rounds.
    pub rounds: usize,
    /// Elements verified across all rounds.
    pub elements: usize,
    /// Consume loads of the flag that observed `false`, across all rounds.
    pub spins: u64,
}

/// Consume-load `location` between compiler fences and check that the
/// dependency decodes to zero.
///
/// The fences keep the compiler from merging the load with surrounding code,
/// so the check sees the token exactly as a consumer would.
///
/// # Errors
/// [`HarnessError::NonZeroDependency`] if the token is not zero. Since chains
/// OR the token into addresses, a non-zero token would corrupt every
/// downstream access.
#[inline(never)]
pub fn check_origin<A, T>(location: &A) -> Result<Dependent<T>, HarnessError>
where
    A: ConsumeLoad<Output = Dependent<T>> + ?Sized,
{
    compiler_fence(Ordering::SeqCst);
    let loaded = location.consume_load();
    compiler_fence(Ordering::SeqCst);
    let bits = loaded.dependency().to_bits();
    if bits != 0 {
        error!("origin load synthesized a non-zero dependency {bits:#x}");
        return Err(HarnessError::NonZeroDependency { bits });
    }
    Ok(loaded)
}

/// Pointer counterpart of [`check_origin`].
///
/// # Errors
/// [`HarnessError::NonZeroDependency`] if a dependency taken from the loaded
/// pointer is not zero.
#[inline(never)]
pub fn check_origin_ptr<T>(location: &AtomicPtr<T>) -> Result<DependentPtr<T>, HarnessError> {
    compiler_fence(Ordering::SeqCst);
    let loaded = location.consume_load();
    compiler_fence(Ordering::SeqCst);
    let bits = loaded.dependency().to_bits();
    if bits != 0 {
        error!("pointer origin load synthesized a non-zero dependency {bits:#x}");
        return Err(HarnessError::NonZeroDependency { bits });
    }
    Ok(loaded)
}

/// Compare an observed value against the expected one.
///
/// # Errors
/// [`HarnessError::Mismatch`] naming `what` if the values differ.
pub fn check_eq<T: PartialEq + Debug>(
    what: &'static str,
    got: T,
    expected: T,
) -> Result<(), HarnessError> {
    if got == expected {
        trace!("{what}: {got:?}");
        return Ok(());
    }
    error!("{what}: got {got:?}, expected {expected:?}");
    Err(HarnessError::Mismatch {
        what,
        got: format!("{got:?}"),
        expected: format!("{expected:?}"),
    })
}

/// Run the producer/consumer publication scenario.
///
/// Per round, the producer fills a fresh buffer with `i * 2` using plain
/// stores and then stores `true` into a flag with `Release`. The consumer
/// spins on a consume load of the flag; once it observes `true` it tags each
/// slot pointer with the flag's dependency and reads the element through the
/// resulting [`DependentPtr`]. No acquire fence is issued, so every element
/// being current proves the chain ordered the reads. The token is checked to
/// be zero only after all reads.
///
/// Under loom both sides run as loom threads and every slot access is checked
/// for causality.
///
/// # Errors
/// - [`HarnessError::InvalidConfig`] if `config` does not validate.
/// - [`HarnessError::StaleRead`] on the first element that is not current.
/// - [`HarnessError::NonZeroDependency`] if the flag's dependency is not zero.
pub fn run_publication(config: &PublicationConfig) -> Result<PublicationReport, HarnessError> {
    config.validate()?;
    let PublicationConfig { len, rounds } = *config;
    let mut report = PublicationReport::default();
    for round in 0..rounds {
        let spins = publish_round(round, len)?;
        debug!("round {round}: verified {len} elements after {spins} spins");
        report.rounds += 1;
        report.elements += len;
        report.spins += spins;
    }
    Ok(report)
}

fn element(index: usize) -> u32 {
    // `PublicationConfig::validate` bounds `index` below 2^31.
    (index as u32) * 2
}

fn publish_round(round: usize, len: usize) -> Result<u64, HarnessError> {
    let buffer: Arc<[SyncUnsafeCell<u32>]> = (0..len).map(|_| SyncUnsafeCell::new(0)).collect();
    let ready = Arc::new(AtomicBool::new(false));

    // The producer goes first: `join` runs it on the current worker, so even a
    // single-threaded pool never leaves the consumer spinning on an
    // unpublished flag.
    let producer = {
        let buffer = Arc::clone(&buffer);
        let ready = Arc::clone(&ready);
        move || produce(&buffer, &ready)
    };
    let ((), consumed) = join(producer, move || consume_round(round, &buffer, &ready));
    consumed
}

fn produce(buffer: &[SyncUnsafeCell<u32>], ready: &AtomicBool) {
    for (index, slot) in buffer.iter().enumerate() {
        // SAFETY: The consumer reads no slot before it observes `ready`, which is
        // stored after the last write.
        slot.with_mut(|slot| unsafe { *slot = element(index) });
    }
    ready.store(true, Ordering::Release);
}

fn consume_round(
    round: usize,
    buffer: &[SyncUnsafeCell<u32>],
    ready: &AtomicBool,
) -> Result<u64, HarnessError> {
    let mut spins = 0u64;
    let flag = loop {
        let flag = ready.consume_load();
        if flag.value() {
            break flag;
        }
        spins += 1;
        spin_wait();
    };
    let dependency = flag.dependency();
    for (index, slot) in buffer.iter().enumerate() {
        let got = slot.with(|slot| {
            let slot = DependentPtr::with_dependency(slot.cast_mut(), dependency);
            // SAFETY: The slot is live, and the producer wrote it before the release
            // store this chain's origin observed.
            unsafe { slot.read() }.value()
        });
        let expected = element(index);
        if got != expected {
            error!("round {round}: stale element {index}: got {got}, expected {expected}");
            return Err(HarnessError::StaleRead {
                round,
                index,
                got,
                expected,
            });
        }
    }
    // Only after the reads: the reads must stay dependent on an unchecked token.
    let bits = dependency.to_bits();
    if bits != 0 {
        error!("round {round}: flag load synthesized a non-zero dependency {bits:#x}");
        return Err(HarnessError::NonZeroDependency { bits });
    }
    Ok(spins)
}
