//! intrusive-rc: intrusive, atomically reference-counted pointers for
//! manually managed object graphs.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: shared ownership of heap objects whose reference count lives
//!   inside the object itself, released deterministically when the last
//!   holder goes away.
//! - Pieces:
//!   - RefCounter: atomic count embedded in the object. A type opts in by
//!     embedding one and implementing `RefCounted`.
//!   - add_ref / release: the only operations that move the count.
//!     `release` destroys the object when it observes the last holder.
//!   - IntrusivePtr<T>: owning handle. Each non-null handle accounts for
//!     exactly one count; clone adds one, drop releases one, moves and
//!     swaps leave the counter alone.
//!   - PointerConvertible: compile-time check that a handle of one element
//!     type may become a handle of another (concrete type to trait
//!     object).
//!
//! Constraints
//! - Thread-safe: handles are `Send`/`Sync` when the pointee is; the
//!   counter is the only state this crate mutates and it is always atomic.
//! - No locks, no blocking; every operation is O(1) apart from the
//!   pointee's own destructor.
//! - Objects enter a handle from a `Box`; the final release frees that
//!   allocation through the handle's element type, so a `dyn Trait`
//!   handle runs the concrete destructor.
//!
//! Memory ordering
//! - Increments are `Relaxed`: a new reference is only ever created from
//!   an existing one, whose transfer to this thread already synchronized.
//! - Decrements are `AcqRel` and return the prior value. Release
//!   publishes each holder's writes; acquire on the decrement that sees 1
//!   makes them all visible to the destroying thread.
//! - `use_count` is an `Acquire` load and only a snapshot; acting on it
//!   later races with other holders.
//!
//! Counter copy semantics
//! - Cloning a `RefCounter` gives a fresh counter at zero: a copied object
//!   has no handles yet. `clone_from` leaves the destination's count as
//!   it is. Hand-written `Clone` impls of counted types should forward
//!   `clone_from` per field to keep that property.
//!
//! Overflow semantics
//! - Reference-count overflow is not checked in release builds, matching
//!   `Arc`'s practical assumption that fewer than `usize::MAX` references
//!   exist. Debug builds assert on overflow and on releasing an object
//!   with no holders.
//!
//! Notes and non-goals
//! - No weak handles and no cycle detection: a cycle of handles leaks.
//! - Null handles are a valid steady state. Dereferencing one panics;
//!   `get_ref` and `is_null` observe absence without panicking.
//! - Destroying a counted object by any other means while handles exist
//!   is a caller error the crate does not guard against.

mod cmp;
mod convert;
mod intrusive_ptr;
mod ref_counter;

// Public surface
pub use cmp::swap;
pub use convert::PointerConvertible;
pub use intrusive_ptr::IntrusivePtr;
pub use ref_counter::{add_ref, release, RefCounted, RefCounter};
