//! Embedded atomic reference counter and the add-ref/release protocol.
//!
//! A type opts into intrusive counting by embedding a [`RefCounter`] and
//! implementing [`RefCounted`]. The counter's increment and decrement are
//! private to this module; the only way to drive them is through the
//! protocol pair [`add_ref`] and [`release`], which is what
//! [`IntrusivePtr`](crate::IntrusivePtr) calls.

use core::fmt;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Atomic holder count embedded in an intrusively counted object.
///
/// The count is metadata about how many handles refer to the object, not
/// part of the object's value: cloning yields a fresh counter at zero and
/// `clone_from` leaves the destination's count untouched.
pub struct RefCounter {
    count: AtomicUsize,
}

impl RefCounter {
    /// Create a counter with no holders.
    pub const fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    /// Snapshot of the current number of holders.
    ///
    /// Informational only: other threads may change the count right after
    /// the load, so the value must not drive ownership decisions.
    #[inline]
    pub fn use_count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    #[inline]
    fn inc(&self) {
        // Relaxed: a new reference is only ever made from an existing one,
        // and handing that one to this thread already synchronized.
        let prev = self.count.fetch_add(1, Ordering::Relaxed);
        debug_assert!(prev != usize::MAX, "RefCounter overflow");
    }

    /// Returns the count before the decrement.
    #[inline]
    fn dec(&self) -> usize {
        self.count.fetch_sub(1, Ordering::AcqRel)
    }
}

impl Default for RefCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RefCounter {
    fn clone(&self) -> Self {
        Self::new()
    }

    fn clone_from(&mut self, _source: &Self) {}
}

impl fmt::Debug for RefCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefCounter")
            .field("use_count", &self.use_count())
            .finish()
    }
}

/// Types that embed a [`RefCounter`] and can be held by
/// [`IntrusivePtr`](crate::IntrusivePtr).
///
/// Trait objects work as well: a trait with `RefCounted` as a supertrait
/// makes `dyn Trait: RefCounted`, and releasing a `dyn Trait` destroys the
/// concrete value.
///
/// # Safety
///
/// `ref_counter` must always return the same counter, embedded in `self`
/// and used by no other object. Objects handed to a handle must live in a
/// `Box` allocation, because the last [`release`] frees them as one.
pub unsafe trait RefCounted {
    fn ref_counter(&self) -> &RefCounter;

    /// See [`RefCounter::use_count`].
    #[inline]
    fn use_count(&self) -> usize {
        self.ref_counter().use_count()
    }
}

/// Record one more holder of `obj`.
#[inline]
pub fn add_ref<T: ?Sized + RefCounted>(obj: &T) {
    obj.ref_counter().inc();
}

/// Give up one holder of `obj`, destroying it if that was the last one.
///
/// # Safety
///
/// `obj` must point to a live object obtained from `Box::into_raw`, and
/// the caller must own one counted reference to it, which this call
/// consumes. `obj` must not be used afterwards through that reference.
pub unsafe fn release<T: ?Sized + RefCounted>(obj: NonNull<T>) {
    let prev = unsafe { obj.as_ref() }.ref_counter().dec();
    debug_assert!(prev != 0, "release of an object with no holders");
    if prev == 1 {
        log::trace!("destroying intrusively counted object at {:p}", obj);
        drop(unsafe { Box::from_raw(obj.as_ptr()) });
    }
}

/// Implement [`RefCounted`] for a type by naming its [`RefCounter`] field.
///
/// The field must be a `RefCounter` stored inline; fields that merely
/// dereference to one are rejected. Generic parameters go in a leading
/// `[...]` list.
///
/// ```
/// use intrusive_rc::{impl_ref_counted, IntrusivePtr, RefCounter};
///
/// struct Node {
///     rc: RefCounter,
///     label: &'static str,
/// }
/// impl_ref_counted!(Node, rc);
///
/// struct Slot<T> {
///     rc: RefCounter,
///     item: T,
/// }
/// impl_ref_counted!([T] Slot<T>, rc);
///
/// let n = IntrusivePtr::new(Node { rc: RefCounter::new(), label: "a" });
/// assert_eq!(n.label, "a");
/// assert_eq!(n.use_count(), 1);
///
/// let s = IntrusivePtr::new(Slot { rc: RefCounter::new(), item: 5u8 });
/// assert_eq!(s.item, 5);
/// ```
///
/// A borrowed counter is not embedded in the object:
///
/// ```compile_fail
/// use intrusive_rc::{impl_ref_counted, RefCounter};
///
/// static SHARED: RefCounter = RefCounter::new();
///
/// struct Borrowed {
///     rc: &'static RefCounter,
/// }
/// impl_ref_counted!(Borrowed, rc);
/// ```
///
/// Neither is one reached through `Deref`:
///
/// ```compile_fail
/// use intrusive_rc::{impl_ref_counted, RefCounter};
///
/// struct Indirect(Box<RefCounter>);
///
/// impl std::ops::Deref for Indirect {
///     type Target = RefCounter;
///     fn deref(&self) -> &RefCounter {
///         &self.0
///     }
/// }
///
/// struct Obj {
///     rc: Indirect,
/// }
/// impl_ref_counted!(Obj, rc);
/// ```
#[macro_export]
macro_rules! impl_ref_counted {
    ([$($gen:tt)*] $ty:ty, $field:ident) => {
        unsafe impl<$($gen)*> $crate::RefCounted for $ty {
            #[inline]
            fn ref_counter(&self) -> &$crate::RefCounter {
                // Raw pointers do not deref-coerce, so this only compiles
                // when the field is exactly a `RefCounter`.
                let c: *const $crate::RefCounter = ::core::ptr::addr_of!(self.$field);
                unsafe { &*c }
            }
        }
    };
    ($ty:ty, $field:ident) => {
        $crate::impl_ref_counted!([] $ty, $field);
    };
}
