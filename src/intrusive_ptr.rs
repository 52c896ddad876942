//! `IntrusivePtr`: an owning handle to an intrusively counted object.

use crate::convert::PointerConvertible;
use crate::ref_counter::{self, RefCounted};
use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::{self, NonNull};

/// Owning handle to a [`RefCounted`] object, or null.
///
/// A non-null handle accounts for exactly one count in the pointee's
/// [`RefCounter`](crate::RefCounter). Cloning adds a count, dropping
/// releases it, and the release that takes the count to zero destroys the
/// object. Moving a handle transfers its count without touching the
/// counter.
pub struct IntrusivePtr<T: ?Sized + RefCounted> {
    ptr: Option<NonNull<T>>,
    // Logically owns a `T` for drop-check purposes.
    _owns: PhantomData<T>,
}

unsafe impl<T: ?Sized + RefCounted + Send + Sync> Send for IntrusivePtr<T> {}
unsafe impl<T: ?Sized + RefCounted + Send + Sync> Sync for IntrusivePtr<T> {}

impl<T: RefCounted> IntrusivePtr<T> {
    /// Move `value` to the heap and take the first reference to it.
    pub fn new(value: T) -> Self {
        Self::from_box(Box::new(value))
    }
}

impl<T: ?Sized + RefCounted> IntrusivePtr<T> {
    #[inline]
    fn from_parts(ptr: Option<NonNull<T>>) -> Self {
        Self {
            ptr,
            _owns: PhantomData,
        }
    }

    /// A handle that refers to nothing.
    #[inline]
    pub const fn null() -> Self {
        Self {
            ptr: None,
            _owns: PhantomData,
        }
    }

    /// Take a counted reference to a boxed object.
    ///
    /// The count already recorded in the object is kept, so a box whose
    /// counter was bumped by hand ends up with one more.
    pub fn from_box(obj: Box<T>) -> Self {
        unsafe { Self::from_raw(Box::into_raw(obj), true) }
    }

    /// Wrap a raw object pointer, which may be null.
    ///
    /// With `add_ref` the handle records a new reference. Without it the
    /// handle adopts a reference someone already counted, for instance one
    /// produced by [`detach`](Self::detach).
    ///
    /// # Safety
    ///
    /// A non-null `p` must come from `Box::into_raw` (possibly through
    /// [`detach`](Self::detach)) and point to a live object. If `add_ref`
    /// is false the caller must hand over one reference it owns.
    #[inline]
    pub unsafe fn from_raw(p: *mut T, add_ref: bool) -> Self {
        let ptr = NonNull::new(p);
        if add_ref {
            if let Some(p) = ptr {
                ref_counter::add_ref(unsafe { p.as_ref() });
            }
        }
        Self::from_parts(ptr)
    }

    /// The object pointer, without affecting the count.
    #[inline]
    pub fn get(&self) -> Option<NonNull<T>> {
        self.ptr
    }

    /// Borrow the object, or `None` for a null handle.
    #[inline]
    pub fn get_ref(&self) -> Option<&T> {
        self.ptr.map(|p| unsafe { &*p.as_ptr() })
    }

    /// Thin address used for identity comparisons; null for a null handle.
    #[inline]
    pub fn addr(&self) -> *const () {
        match self.ptr {
            Some(p) => p.cast::<()>().as_ptr().cast_const(),
            None => ptr::null(),
        }
    }

    /// True if the handle refers to nothing.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// True if the handle refers to an object.
    #[inline]
    pub fn is_some(&self) -> bool {
        self.ptr.is_some()
    }

    /// Holder count of the pointee, 0 for a null handle. Informational only.
    pub fn use_count(&self) -> usize {
        self.get_ref().map_or(0, |obj| obj.use_count())
    }

    /// Give up the object without releasing it.
    ///
    /// The handle becomes null and the caller owns the reference it held:
    /// hand it back with `from_raw(p, false)` or drop it with
    /// [`release`](crate::release).
    #[inline]
    pub fn detach(&mut self) -> Option<NonNull<T>> {
        self.ptr.take()
    }

    /// Consuming form of [`detach`](Self::detach).
    #[inline]
    pub fn into_raw(mut self) -> Option<NonNull<T>> {
        self.detach()
    }

    /// Move the reference out, leaving this handle null.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self::from_parts(self.detach())
    }

    /// Exchange pointees with `other`; counts are unchanged.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.ptr, &mut other.ptr);
    }

    /// Release the current object, if any, and become null.
    pub fn reset(&mut self) {
        Self::null().swap(self);
    }

    /// Refer to `obj` instead of the current object.
    pub fn reset_box(&mut self, obj: Box<T>) {
        Self::from_box(obj).swap(self);
    }

    /// Refer to `p`, adding a reference to it, and release the old object.
    ///
    /// # Safety
    ///
    /// Same as [`from_raw`](Self::from_raw) with `add_ref` set.
    pub unsafe fn reset_raw(&mut self, p: *mut T) {
        unsafe { Self::from_raw(p, true) }.swap(self);
    }

    /// Refer to `p` and release the old object; `add_ref` as in
    /// [`from_raw`](Self::from_raw).
    ///
    /// # Safety
    ///
    /// Same as [`from_raw`](Self::from_raw).
    pub unsafe fn reset_raw_with(&mut self, p: *mut T, add_ref: bool) {
        unsafe { Self::from_raw(p, add_ref) }.swap(self);
    }

    /// Convert into a handle of a type `T` converts to, keeping the count.
    pub fn upcast<U>(self) -> IntrusivePtr<U>
    where
        U: ?Sized + RefCounted,
        T: PointerConvertible<U>,
    {
        let mut this = self;
        IntrusivePtr::from_parts(this.detach().map(T::convert_ptr))
    }

    /// Converting copy: a new handle of type `U` with its own reference.
    pub fn upcast_clone<U>(&self) -> IntrusivePtr<U>
    where
        U: ?Sized + RefCounted,
        T: PointerConvertible<U>,
    {
        self.clone().upcast()
    }

    /// Converting move assignment.
    pub fn assign<Y>(&mut self, other: IntrusivePtr<Y>)
    where
        Y: ?Sized + RefCounted + PointerConvertible<T>,
    {
        other.upcast::<T>().swap(self);
    }

    /// Converting copy assignment.
    pub fn assign_from<Y>(&mut self, other: &IntrusivePtr<Y>)
    where
        Y: ?Sized + RefCounted + PointerConvertible<T>,
    {
        other.upcast_clone::<T>().swap(self);
    }
}

impl<T: ?Sized + RefCounted> Clone for IntrusivePtr<T> {
    #[inline]
    fn clone(&self) -> Self {
        if let Some(obj) = self.get_ref() {
            ref_counter::add_ref(obj);
        }
        Self::from_parts(self.ptr)
    }

    fn clone_from(&mut self, source: &Self) {
        if self.addr() != source.addr() {
            source.clone().swap(self);
        }
    }
}

impl<T: ?Sized + RefCounted> Drop for IntrusivePtr<T> {
    fn drop(&mut self) {
        if let Some(p) = self.ptr.take() {
            unsafe { ref_counter::release(p) };
        }
    }
}

impl<T: ?Sized + RefCounted> Default for IntrusivePtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized + RefCounted> From<Box<T>> for IntrusivePtr<T> {
    fn from(obj: Box<T>) -> Self {
        Self::from_box(obj)
    }
}

impl<T: ?Sized + RefCounted> Deref for IntrusivePtr<T> {
    type Target = T;

    /// Panics if the handle is null.
    #[inline]
    #[track_caller]
    fn deref(&self) -> &T {
        match self.get_ref() {
            Some(obj) => obj,
            None => null_deref(),
        }
    }
}

#[cold]
#[track_caller]
fn null_deref() -> ! {
    panic!("dereferenced a null IntrusivePtr")
}

impl<T: ?Sized + RefCounted + fmt::Debug> fmt::Debug for IntrusivePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get_ref() {
            Some(obj) => fmt::Debug::fmt(obj, f),
            None => f.write_str("IntrusivePtr(null)"),
        }
    }
}

impl<T: ?Sized + RefCounted> fmt::Pointer for IntrusivePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.addr(), f)
    }
}
