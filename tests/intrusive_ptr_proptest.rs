use intrusive_rc::{impl_ref_counted, IntrusivePtr, RefCounter};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Obj {
    rc: RefCounter,
    id: usize,
    drops: Arc<AtomicUsize>,
}

impl_ref_counted!(Obj, rc);

impl Drop for Obj {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

// Model handle operations over a few objects and a few handle slots; the
// counter must always equal the number of slots pointing at each object and
// an object is destroyed exactly when no slot points at it.
proptest! {
    #[test]
    fn prop_use_count_matches_live_handles(
        objs in 1usize..=4,
        slots in 1usize..=6,
        ops in proptest::collection::vec((0u8..=5u8, 0usize..64, 0usize..64), 1..150),
    ) {
        let drops: Vec<Arc<AtomicUsize>> = (0..objs).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        // Keep one handle per object so pointers stay valid for the model; it
        // is accounted for in the expected counts.
        let mut roots: Vec<IntrusivePtr<Obj>> = (0..objs)
            .map(|id| IntrusivePtr::new(Obj { rc: RefCounter::new(), id, drops: drops[id].clone() }))
            .collect();
        let mut table: Vec<IntrusivePtr<Obj>> = (0..slots).map(|_| IntrusivePtr::null()).collect();

        for (op, a, b) in ops {
            let s = a % slots;
            let o = b % objs;
            match op {
                // Copy-assign a root into a slot
                0 => table[s].clone_from(&roots[o]),
                // Copy-assign between slots
                1 => {
                    let t = b % slots;
                    let src = table[t].clone();
                    table[s].clone_from(&src);
                }
                // Reset a slot
                2 => table[s].reset(),
                // Swap two slots
                3 => {
                    let t = b % slots;
                    if s != t {
                        let (lo, hi) = (s.min(t), s.max(t));
                        let (left, right) = table.split_at_mut(hi);
                        left[lo].swap(&mut right[0]);
                    }
                }
                // Detach and adopt back into another slot
                4 => {
                    let t = b % slots;
                    if let Some(p) = table[s].detach() {
                        let adopted = unsafe { IntrusivePtr::from_raw(p.as_ptr(), false) };
                        table[t] = adopted;
                    }
                }
                // Move a slot out and back in
                5 => {
                    let moved = table[s].take();
                    prop_assert!(table[s].is_null());
                    table[s] = moved;
                }
                _ => unreachable!(),
            }

            for (id, root) in roots.iter().enumerate() {
                let held = table.iter().filter(|h| **h == *root).count();
                prop_assert_eq!(root.use_count(), held + 1);
                prop_assert_eq!(root.id, id);
            }
        }

        drop(table);
        for (id, root) in roots.iter().enumerate() {
            prop_assert_eq!(root.use_count(), 1);
            prop_assert_eq!(drops[id].load(Ordering::SeqCst), 0);
        }
        roots.clear();
        for d in &drops {
            prop_assert_eq!(d.load(Ordering::SeqCst), 1);
        }
    }
}
