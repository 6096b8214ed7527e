#![allow(missing_docs)]
#![cfg(feature = "loom")]

use consume::{
    Dependent, DependentPtr, config::PublicationConfig, consume_load, harness::run_publication,
};
use loom::{
    cell::UnsafeCell,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicPtr, Ordering},
    },
    thread,
};

/// Plainly written slots shared between a producer and a consumer.
///
/// Every slot access goes through `loom::cell::UnsafeCell`, so loom reports a
/// read that is not ordered after the write it observes.
struct Published {
    slots: [UnsafeCell<u32>; 3],
    ready: AtomicBool,
}

unsafe impl Sync for Published {}

impl Published {
    fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| UnsafeCell::new(0)),
            ready: AtomicBool::new(false),
        }
    }

    fn publish(&self) {
        for (index, slot) in self.slots.iter().enumerate() {
            // SAFETY: The consumer reads no slot before it observes `ready`.
            slot.with_mut(|slot| unsafe { *slot = index as u32 * 2 });
        }
        self.ready.store(true, Ordering::Release);
    }

    /// Returns `None` while nothing is published.
    fn try_consume(&self, origin: fn(&AtomicBool) -> Dependent<bool>) -> Option<[u32; 3]> {
        let flag = origin(&self.ready);
        if !flag.value() {
            return None;
        }
        let dependency = flag.dependency();
        Some(core::array::from_fn(|index| {
            self.slots[index].with(|slot| {
                let slot = DependentPtr::with_dependency(slot.cast_mut(), dependency);
                // SAFETY: The slot is live and was written before `ready`.
                unsafe { slot.read() }.value()
            })
        }))
    }
}

fn flag_publication(origin: fn(&AtomicBool) -> Dependent<bool>) {
    loom::model(move || {
        // Producer:  slots[i] = 2i; ready.store(true, Release)
        // Consumer:  origin(ready); if true, read slots through the chain
        let shared = Arc::new(Published::new());

        let producer = {
            let shared = shared.clone();
            thread::spawn(move || shared.publish())
        };
        let consumer = {
            let shared = shared.clone();
            thread::spawn(move || shared.try_consume(origin))
        };

        producer.join().unwrap();
        if let Some(seen) = consumer.join().unwrap() {
            assert_eq!(seen, [0, 2, 4]);
        }
        assert_eq!(shared.try_consume(origin), Some([0, 2, 4]));
    });
}

#[test]
fn loom_flag_publication_is_visible_through_the_chain() {
    flag_publication(|ready| consume_load(ready));
}

#[test]
#[should_panic]
fn loom_flag_publication_without_ordering_is_rejected() {
    flag_publication(|ready| Dependent::new(ready.load(Ordering::Relaxed)));
}

#[test]
fn loom_harness_publication_round() {
    loom::model(|| {
        let config = PublicationConfig { len: 2, rounds: 1 };
        let report = run_publication(&config).unwrap();
        assert_eq!(report.rounds, 1);
        assert_eq!(report.elements, 2);
    });
}

#[test]
fn loom_pointer_publication_is_visible_through_the_chain() {
    loom::model(|| {
        // Producer:  node = Box::new(7); head.store(node, Release)
        // Consumer:  consume head; if non-null, read *node through the chain
        let head = Arc::new(AtomicPtr::<UnsafeCell<u64>>::new(core::ptr::null_mut()));

        let producer = {
            let head = head.clone();
            thread::spawn(move || {
                let node = Box::new(UnsafeCell::new(0));
                // SAFETY: The node is not shared yet.
                node.with_mut(|value| unsafe { *value = 7 });
                head.store(Box::into_raw(node), Ordering::Release);
            })
        };
        let consumer = {
            let head = head.clone();
            thread::spawn(move || {
                let node = consume_load(&*head);
                if node.is_null() {
                    return None;
                }
                // SAFETY: The node is published once and freed only after both
                // threads are joined.
                let cell = unsafe { node.as_ref() };
                Some(cell.with(|value| {
                    let value = DependentPtr::with_dependency(value.cast_mut(), node.dependency());
                    // SAFETY: See above.
                    unsafe { value.read() }.value()
                }))
            })
        };

        producer.join().unwrap();
        if let Some(seen) = consumer.join().unwrap() {
            assert_eq!(seen, 7);
        }

        let node = head.load(Ordering::Acquire);
        assert!(!node.is_null());
        // SAFETY: Allocated by the producer and no longer shared.
        drop(unsafe { Box::from_raw(node) });
    });
}

#[test]
fn loom_chained_dependencies_decode_to_zero() {
    loom::model(|| {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = {
            let flag = flag.clone();
            thread::spawn(move || flag.store(true, Ordering::Release))
        };
        let loaded = consume_load(&*flag);
        let combined = loaded.dependency() | loaded.dependency();
        assert_eq!(combined.to_bits(), 0);
        setter.join().unwrap();
    });
}
