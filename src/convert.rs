//! Compile-time pointer convertibility between handle element types.

use core::ptr::NonNull;

/// `Self` pointers can be used wherever `U` pointers are expected.
///
/// Every type converts to itself. Further conversions, typically from a
/// concrete type to a trait object it implements, are declared with
/// [`impl_pointer_convertible!`](crate::impl_pointer_convertible), which
/// only compiles when the unsizing coercion exists.
///
/// # Safety
///
/// `convert_ptr` must return a pointer to the same object, usable with
/// `Box::from_raw` to free that object, and whose
/// [`RefCounted::ref_counter`](crate::RefCounted::ref_counter) is the
/// counter seen through `Self`.
pub unsafe trait PointerConvertible<U: ?Sized> {
    fn convert_ptr(ptr: NonNull<Self>) -> NonNull<U>;
}

unsafe impl<T: ?Sized> PointerConvertible<T> for T {
    #[inline]
    fn convert_ptr(ptr: NonNull<T>) -> NonNull<T> {
        ptr
    }
}

/// Declare `From => To` pointer conversions backed by unsizing coercion.
///
/// ```
/// use intrusive_rc::{impl_pointer_convertible, impl_ref_counted, IntrusivePtr, RefCounted, RefCounter};
///
/// trait Shape: RefCounted {
///     fn area(&self) -> u32;
/// }
///
/// struct Square {
///     rc: RefCounter,
///     side: u32,
/// }
/// impl_ref_counted!(Square, rc);
/// impl Shape for Square {
///     fn area(&self) -> u32 {
///         self.side * self.side
///     }
/// }
/// impl_pointer_convertible!(Square => dyn Shape);
///
/// let sq = IntrusivePtr::new(Square { rc: RefCounter::new(), side: 3 });
/// let shape: IntrusivePtr<dyn Shape> = sq.upcast_clone();
/// assert_eq!(shape.area(), 9);
/// assert_eq!(shape.use_count(), 2);
/// ```
#[macro_export]
macro_rules! impl_pointer_convertible {
    ($($from:ty => $to:ty),+ $(,)?) => {
        $(
            unsafe impl $crate::PointerConvertible<$to> for $from {
                #[inline]
                fn convert_ptr(ptr: ::core::ptr::NonNull<Self>) -> ::core::ptr::NonNull<$to> {
                    ptr
                }
            }
        )+
    };
}
