//! Raw storage blocks: allocation bookkeeping with no element lifetimes.
//!
//! A [`RawStorage`] owns a contiguous block able to hold `cap` elements of
//! `T` and nothing more — it has no notion of which slots hold live values.
//! Construction and destruction of elements inside the block is the job of
//! [`crate::uninit`]; the container layer composes the two.

use std::alloc::{alloc, dealloc, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::error::CreelError;

/// An owned block of uninitialized storage for `cap` elements of `T`.
///
/// The block is released on drop. Element contents are never touched:
/// whoever constructed values into the block must drop them before the
/// `RawStorage` goes away, or they leak.
///
/// Zero-sized `T` never allocates; the capacity reports `usize::MAX` so
/// callers above never see a "full" zero-sized container.
pub(crate) struct RawStorage<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

impl<T> RawStorage<T> {
    /// The empty block: no allocation, dangling pointer.
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if mem::size_of::<T>() == 0 { usize::MAX } else { 0 },
            _marker: PhantomData,
        }
    }

    /// Allocate storage for exactly `n` elements.
    ///
    /// Returns [`CreelError::AllocationFailure`] if the byte size of the
    /// request overflows `isize::MAX` or the allocator returns null.
    /// `n == 0` (and any `n` for zero-sized `T`) is the empty block.
    pub(crate) fn allocate(n: usize) -> Result<Self, CreelError> {
        if n == 0 || mem::size_of::<T>() == 0 {
            return Ok(Self::empty());
        }
        let layout = Layout::array::<T>(n)
            .map_err(|_| CreelError::AllocationFailure { requested: n })?;
        // SAFETY: layout has non-zero size (n > 0, T is not zero-sized).
        let raw = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            return Err(CreelError::AllocationFailure { requested: n });
        };
        Ok(Self {
            ptr,
            cap: n,
            _marker: PhantomData,
        })
    }

    /// Base pointer of the block. Dangling (but aligned) when nothing is
    /// allocated.
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Number of element slots the block can hold.
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// Whether this block came from the allocator (and will return to it).
    fn is_allocated(&self) -> bool {
        self.cap != 0 && mem::size_of::<T>() != 0
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if self.is_allocated() {
            // Layout::array succeeded for this cap at allocation time, so
            // rebuilding it cannot fail.
            let layout = Layout::array::<T>(self.cap)
                .expect("layout was valid when this block was allocated");
            // SAFETY: ptr was returned by `alloc` with this exact layout
            // and has not been freed (RawStorage is the unique owner).
            unsafe { dealloc(self.ptr.as_ptr().cast(), layout) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_has_zero_capacity_and_no_allocation() {
        let block = RawStorage::<u64>::empty();
        assert_eq!(block.capacity(), 0);
    }

    #[test]
    fn allocate_zero_is_the_empty_block() {
        let block = RawStorage::<u64>::allocate(0).unwrap();
        assert_eq!(block.capacity(), 0);
    }

    #[test]
    fn allocate_returns_aligned_storage_for_requested_count() {
        let block = RawStorage::<u64>::allocate(16).unwrap();
        assert_eq!(block.capacity(), 16);
        assert_eq!(block.ptr() as usize % std::mem::align_of::<u64>(), 0);
    }

    #[test]
    fn zero_sized_elements_never_allocate() {
        let block = RawStorage::<()>::allocate(1_000_000).unwrap();
        assert_eq!(block.capacity(), usize::MAX);
    }

    #[test]
    fn absurd_request_reports_allocation_failure_not_panic() {
        // Byte size overflows isize::MAX — must surface as an error.
        let result = RawStorage::<u64>::allocate(usize::MAX / 2);
        assert!(matches!(
            result,
            Err(CreelError::AllocationFailure { .. })
        ));
    }
}
