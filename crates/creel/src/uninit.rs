//! Element lifetime primitives over raw slots.
//!
//! These free functions construct, relocate, and destroy values inside
//! storage obtained from [`crate::storage`]. Every primitive that runs user
//! code (`Clone`, `Default`) is panic-safe in the local sense: if a user
//! call unwinds partway, the primitive drops exactly the elements it had
//! constructed in that call before letting the panic continue. Callers
//! compose these into larger transactions and remain responsible for
//! anything the primitive did not itself create.
//!
//! Each function is `unsafe` with a mandatory `# Safety` contract and each
//! `unsafe` block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::ptr;

/// Drops partially constructed slots if the enclosing primitive unwinds.
///
/// `constructed` is bumped after each successful element construction;
/// completing the primitive forgets the guard so nothing is dropped twice.
struct PartialGuard<T> {
    base: *mut T,
    constructed: usize,
}

impl<T> Drop for PartialGuard<T> {
    fn drop(&mut self) {
        // SAFETY: slots [0, constructed) of `base` hold live values that
        // the enclosing primitive constructed and no longer owns a path to.
        unsafe { drop_range(self.base, self.constructed) };
    }
}

/// Clone-construct `value` into the `n` slots starting at `dst`.
///
/// If a clone panics, the slots constructed so far are dropped before the
/// panic propagates; `dst` is left fully uninitialized.
///
/// # Safety
///
/// `dst` must be valid for writes of `n` elements and the slots must be
/// uninitialized (or their contents already forgotten).
pub(crate) unsafe fn fill_with_clone<T: Clone>(dst: *mut T, n: usize, value: &T) {
    let mut guard = PartialGuard {
        base: dst,
        constructed: 0,
    };
    for i in 0..n {
        // SAFETY: i < n, so dst.add(i) is in the writable range.
        unsafe { ptr::write(dst.add(i), value.clone()) };
        guard.constructed = i + 1;
    }
    std::mem::forget(guard);
}

/// Default-construct values into the `n` slots starting at `dst`.
///
/// Same rollback contract as [`fill_with_clone`].
///
/// # Safety
///
/// `dst` must be valid for writes of `n` elements and the slots must be
/// uninitialized.
pub(crate) unsafe fn fill_with_default<T: Default>(dst: *mut T, n: usize) {
    let mut guard = PartialGuard {
        base: dst,
        constructed: 0,
    };
    for i in 0..n {
        // SAFETY: i < n, so dst.add(i) is in the writable range.
        unsafe { ptr::write(dst.add(i), T::default()) };
        guard.constructed = i + 1;
    }
    std::mem::forget(guard);
}

/// Clone-construct the elements of `src`, in order, into the slots starting
/// at `dst`.
///
/// Same rollback contract as [`fill_with_clone`].
///
/// # Safety
///
/// `dst` must be valid for writes of `src.len()` elements, uninitialized,
/// and must not overlap `src`.
pub(crate) unsafe fn clone_from_slice<T: Clone>(dst: *mut T, src: &[T]) {
    let mut guard = PartialGuard {
        base: dst,
        constructed: 0,
    };
    for (i, item) in src.iter().enumerate() {
        // SAFETY: i < src.len(), so dst.add(i) is in the writable range.
        unsafe { ptr::write(dst.add(i), item.clone()) };
        guard.constructed = i + 1;
    }
    std::mem::forget(guard);
}

/// Relocate `n` live elements from `src` to `dst`.
///
/// Rust moves are bitwise, so this cannot run user code and cannot fail.
/// Afterwards the source slots are logically uninitialized: they must not
/// be dropped or read as values again.
///
/// # Safety
///
/// `src` must hold `n` live elements, `dst` must be valid for writes of
/// `n` elements, and the two ranges must not overlap.
pub(crate) unsafe fn move_range<T>(src: *const T, dst: *mut T, n: usize) {
    // SAFETY: caller guarantees validity and non-overlap.
    unsafe { ptr::copy_nonoverlapping(src, dst, n) };
}

/// Drop the `n` live elements starting at `ptr`, in index order.
///
/// # Safety
///
/// `ptr` must hold exactly `n` live elements, each dropped only this once.
pub(crate) unsafe fn drop_range<T>(ptr: *mut T, n: usize) {
    // SAFETY: the range [ptr, ptr + n) is a valid slice of live elements;
    // drop_in_place drops them front to back.
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr, n)) };
}
