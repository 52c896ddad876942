//! Identity comparison, ordering, hashing and swap for `IntrusivePtr`.
//!
//! Handles compare by the address of their pointee, never by value. Null
//! handles compare equal to each other and to null raw pointers.

use crate::intrusive_ptr::IntrusivePtr;
use crate::ref_counter::RefCounted;
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::ptr::NonNull;

impl<T, U> PartialEq<IntrusivePtr<U>> for IntrusivePtr<T>
where
    T: ?Sized + RefCounted,
    U: ?Sized + RefCounted,
{
    #[inline]
    fn eq(&self, other: &IntrusivePtr<U>) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized + RefCounted> Eq for IntrusivePtr<T> {}

impl<T: ?Sized + RefCounted, U: ?Sized> PartialEq<*const U> for IntrusivePtr<T> {
    #[inline]
    fn eq(&self, other: &*const U) -> bool {
        self.addr() == other.cast::<()>()
    }
}

impl<T: ?Sized + RefCounted, U: ?Sized> PartialEq<*mut U> for IntrusivePtr<T> {
    #[inline]
    fn eq(&self, other: &*mut U) -> bool {
        self.addr() == other.cast::<()>().cast_const()
    }
}

impl<T: ?Sized + RefCounted, U: ?Sized> PartialEq<NonNull<U>> for IntrusivePtr<T> {
    #[inline]
    fn eq(&self, other: &NonNull<U>) -> bool {
        self.addr() == other.cast::<()>().as_ptr().cast_const()
    }
}

impl<T: ?Sized, U: ?Sized + RefCounted> PartialEq<IntrusivePtr<U>> for *const T {
    #[inline]
    fn eq(&self, other: &IntrusivePtr<U>) -> bool {
        self.cast::<()>() == other.addr()
    }
}

impl<T: ?Sized, U: ?Sized + RefCounted> PartialEq<IntrusivePtr<U>> for *mut T {
    #[inline]
    fn eq(&self, other: &IntrusivePtr<U>) -> bool {
        self.cast::<()>().cast_const() == other.addr()
    }
}

impl<T: ?Sized + RefCounted> PartialOrd for IntrusivePtr<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized + RefCounted> Ord for IntrusivePtr<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.addr().cmp(&other.addr())
    }
}

impl<T: ?Sized + RefCounted> Hash for IntrusivePtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

/// Exchange the pointees of two handles; counts are unchanged.
#[inline]
pub fn swap<T: ?Sized + RefCounted>(a: &mut IntrusivePtr<T>, b: &mut IntrusivePtr<T>) {
    a.swap(b);
}
