//! The container: growth policy and the public surface.
//!
//! A [`Creel`] is a raw storage block ([`crate::storage`]) plus a count of
//! live elements. The first `len` slots hold constructed values; the rest
//! of the block is uninitialized. Every capacity change is a transaction:
//! allocate the new block, run all fallible work (user `Clone`/`Default`
//! calls) against it, and only then relocate the live elements and commit.
//! A failure at any point leaves the container exactly as it was.

#![allow(unsafe_code)]

use std::alloc::{handle_alloc_error, Layout};
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr;
use std::slice;

use crate::error::CreelError;
use crate::storage::RawStorage;
use crate::uninit;

/// A contiguous growable sequence of `T`.
///
/// Capacity is managed separately from length: the backing block holds
/// `capacity()` slots of which the first `len()` are live. Tail insertion
/// grows the block geometrically (0→1→2→4→8…), so `push` is amortized
/// O(1); `reserve`, `shrink_to_fit`, and capacity-growing `resize` use the
/// exact requested capacity instead.
///
/// Operations that may allocate return `Result` and report
/// [`CreelError::AllocationFailure`] instead of aborting. Operations that
/// run user code (`Clone`, `Default`) give the strong guarantee: if user
/// code panics, the container's observable state is unchanged and nothing
/// is leaked.
///
/// ```
/// use creel::Creel;
///
/// let mut c = Creel::new();
/// c.push(1)?;
/// c.push(2)?;
/// c.push(3)?;
/// assert_eq!(c.as_slice(), &[1, 2, 3]);
/// assert_eq!(c.pop(), Some(3));
/// # Ok::<(), creel::CreelError>(())
/// ```
pub struct Creel<T> {
    buf: RawStorage<T>,
    len: usize,
}

// The block is uniquely owned; sending or sharing a Creel is exactly
// sending or sharing its elements.
unsafe impl<T: Send> Send for Creel<T> {}
unsafe impl<T: Sync> Sync for Creel<T> {}

impl<T> Creel<T> {
    /// The empty container. Does not allocate.
    pub const fn new() -> Self {
        Self {
            buf: RawStorage::empty(),
            len: 0,
        }
    }

    /// A container of `n` default-constructed elements with capacity
    /// exactly `n`.
    ///
    /// All-or-nothing: an allocation failure or a panicking `Default`
    /// leaves nothing behind.
    pub fn with_len(n: usize) -> Result<Self, CreelError>
    where
        T: Default,
    {
        let buf = RawStorage::allocate(n)?;
        // SAFETY: buf holds at least n uninitialized slots. On panic the
        // primitive rolls back its constructions and `buf` frees the block.
        unsafe { uninit::fill_with_default(buf.ptr(), n) };
        Ok(Self { buf, len: n })
    }

    /// A container of `n` clones of `value` with capacity exactly `n`.
    ///
    /// Same all-or-nothing rule as [`with_len`](Creel::with_len).
    pub fn from_elem(n: usize, value: T) -> Result<Self, CreelError>
    where
        T: Clone,
    {
        let buf = RawStorage::allocate(n)?;
        // SAFETY: buf holds at least n uninitialized slots.
        unsafe { uninit::fill_with_clone(buf.ptr(), n, &value) };
        Ok(Self { buf, len: n })
    }

    /// A container cloned element-wise from a slice, with capacity exactly
    /// `src.len()`.
    pub fn from_slice(src: &[T]) -> Result<Self, CreelError>
    where
        T: Clone,
    {
        let buf = RawStorage::allocate(src.len())?;
        // SAFETY: buf holds at least src.len() uninitialized slots and a
        // fresh allocation cannot overlap `src`.
        unsafe { uninit::clone_from_slice(buf.ptr(), src) };
        Ok(Self {
            buf,
            len: src.len(),
        })
    }

    /// An independent copy with capacity equal to this container's
    /// capacity, reporting allocation failure instead of aborting.
    ///
    /// This is the propagating form of [`Clone`].
    pub fn try_clone(&self) -> Result<Self, CreelError>
    where
        T: Clone,
    {
        let buf = RawStorage::allocate(self.capacity())?;
        // SAFETY: buf holds at least len uninitialized slots (capacity is
        // always >= len) and a fresh allocation cannot overlap self.
        unsafe { uninit::clone_from_slice(buf.ptr(), self.as_slice()) };
        Ok(Self { buf, len: self.len })
    }

    /// Take the contents, leaving this container in the empty state
    /// (length 0, capacity 0, no allocation).
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots the backing block can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether the container holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The live region `[0, len)` as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first len slots are live; the base pointer is
        // aligned and non-null (dangling-but-aligned when unallocated,
        // which is valid for a zero-length slice).
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// The live region `[0, len)` as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`, plus &mut self gives unique access.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Base address of the block, or null when capacity is 0.
    pub fn data(&self) -> *const T {
        if self.capacity() == 0 {
            ptr::null()
        } else {
            self.buf.ptr()
        }
    }

    /// Bounds-checked element access.
    ///
    /// Returns [`CreelError::IndexOutOfRange`] when `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T, CreelError> {
        self.as_slice().get(index).ok_or(CreelError::IndexOutOfRange {
            index,
            len: self.len,
        })
    }

    /// Bounds-checked mutable element access.
    ///
    /// Returns [`CreelError::IndexOutOfRange`] when `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, CreelError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(CreelError::IndexOutOfRange { index, len })
    }

    /// First element, or `None` when empty.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// First element mutably, or `None` when empty.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Last element, or `None` when empty.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Last element mutably, or `None` when empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Iterate over the live region front to back. The iterator is
    /// double-ended, so `.rev()` gives reverse traversal.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably over the live region.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Append an element to the tail, growing geometrically when full.
    ///
    /// On `Err` the container is unchanged; the consumed `value` is
    /// dropped with the error.
    pub fn push(&mut self, value: T) -> Result<(), CreelError> {
        if self.len == self.capacity() {
            self.grow_amortized()?;
        }
        // SAFETY: len < capacity after the growth check, so slot `len`
        // is within the block and uninitialized.
        unsafe { ptr::write(self.buf.ptr().add(self.len), value) };
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element, or `None` when empty.
    /// Never fails.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` (post-decrement) held the last live element;
        // shrinking len first means it is never dropped a second time.
        Some(unsafe { ptr::read(self.buf.ptr().add(self.len)) })
    }

    /// Resize to `n` elements, cloning `value` into any new trailing
    /// slots.
    ///
    /// Growth past the current capacity reallocates to capacity exactly
    /// `n`. Shrinking drops the trailing `len - n` elements in place.
    /// Strong guarantee: a panicking clone or a failed allocation leaves
    /// the container unchanged.
    pub fn resize(&mut self, n: usize, value: T) -> Result<(), CreelError>
    where
        T: Clone,
    {
        // SAFETY: resize_impl hands the closure `count` uninitialized
        // slots starting at `dst`, outside the recorded length.
        self.resize_impl(n, |dst, count| unsafe {
            uninit::fill_with_clone(dst, count, &value)
        })
    }

    /// Resize to `n` elements, default-constructing any new trailing
    /// slots. Same rules as [`resize`](Creel::resize).
    pub fn resize_default(&mut self, n: usize) -> Result<(), CreelError>
    where
        T: Default,
    {
        self.resize_impl(n, |dst, count| unsafe {
            uninit::fill_with_default(dst, count)
        })
    }

    /// Grow capacity to exactly `n`. No-op when `n <= capacity()`;
    /// never shrinks.
    pub fn reserve(&mut self, n: usize) -> Result<(), CreelError> {
        if n > self.capacity() {
            self.relocate_to(n)?;
        }
        Ok(())
    }

    /// Reallocate down to capacity exactly `len()`. No-op when already
    /// tight.
    pub fn shrink_to_fit(&mut self) -> Result<(), CreelError> {
        if self.len < self.capacity() {
            self.relocate_to(self.len)?;
        }
        Ok(())
    }

    /// Drop all live elements. Capacity and the block are retained.
    pub fn clear(&mut self) {
        let len = self.len;
        // Zero the length first so a panicking element Drop cannot leave
        // the container claiming dead slots as live.
        self.len = 0;
        // SAFETY: the first `len` slots were live and are dropped exactly
        // once.
        unsafe { uninit::drop_range(self.buf.ptr(), len) };
    }

    /// Swap contents with another container. O(1), never fails,
    /// no element is moved or cloned.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Doubling policy for tail insertion: 0→1, otherwise ×2.
    fn grow_amortized(&mut self) -> Result<(), CreelError> {
        let target = if self.capacity() == 0 {
            1
        } else {
            self.capacity()
                .checked_mul(2)
                .ok_or(CreelError::AllocationFailure {
                    requested: usize::MAX,
                })?
        };
        self.relocate_to(target)
    }

    /// Move the live elements into a fresh block of exactly `new_cap`
    /// slots and commit it. `new_cap` must be >= `len`.
    ///
    /// No user code runs here, so the only failure is allocation, which
    /// leaves the container untouched.
    fn relocate_to(&mut self, new_cap: usize) -> Result<(), CreelError> {
        debug_assert!(new_cap >= self.len);
        let new = RawStorage::allocate(new_cap)?;
        // SAFETY: the old block holds `len` live elements and the new
        // block has room for them; distinct allocations cannot overlap.
        unsafe { uninit::move_range(self.buf.ptr(), new.ptr(), self.len) };
        // Commit. The old block is freed here; its elements were
        // relocated, and RawStorage's Drop never touches element slots.
        self.buf = new;
        Ok(())
    }

    /// Disassemble into block + length without running `Drop`. Ownership
    /// of the live elements and the block moves to the caller.
    pub(crate) fn into_raw_parts(self) -> (RawStorage<T>, usize) {
        let me = mem::ManuallyDrop::new(self);
        // SAFETY: `me` is never dropped, so reading the block out does not
        // duplicate ownership.
        let buf = unsafe { ptr::read(&me.buf) };
        (buf, me.len)
    }

    /// Shared body of the `resize` family. `construct(dst, count)` must
    /// fill `count` uninitialized slots at `dst`, rolling back its own
    /// work on panic.
    fn resize_impl<F>(&mut self, n: usize, construct: F) -> Result<(), CreelError>
    where
        F: FnOnce(*mut T, usize),
    {
        match n.cmp(&self.len) {
            Ordering::Equal => Ok(()),
            Ordering::Less => {
                let excess = self.len - n;
                self.len = n;
                // SAFETY: the trailing `excess` slots were live and are
                // now outside the recorded length.
                unsafe { uninit::drop_range(self.buf.ptr().add(n), excess) };
                Ok(())
            }
            Ordering::Greater if n <= self.capacity() => {
                // In-capacity growth: construct directly into the spare
                // slots. On panic the primitive rolls back and `len` was
                // never advanced.
                construct(self.buf.ptr().wrapping_add(self.len), n - self.len);
                self.len = n;
                Ok(())
            }
            Ordering::Greater => {
                // Reallocating growth. All fallible work targets the new
                // block before anything is relocated: a panicking
                // constructor unwinds through `new`'s Drop with the old
                // block still intact.
                let new: RawStorage<T> = RawStorage::allocate(n)?;
                construct(new.ptr().wrapping_add(self.len), n - self.len);
                // SAFETY: old block holds `len` live elements; slots
                // [0, len) of the new block are untouched by `construct`.
                unsafe { uninit::move_range(self.buf.ptr(), new.ptr(), self.len) };
                self.buf = new;
                self.len = n;
                Ok(())
            }
        }
    }
}

impl<T> Drop for Creel<T> {
    fn drop(&mut self) {
        // SAFETY: the first `len` slots are live and dropped exactly once;
        // the block itself is freed by RawStorage's Drop.
        unsafe { uninit::drop_range(self.buf.ptr(), self.len) };
    }
}

impl<T> Default for Creel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Creel<T> {
    /// Independent copy with the source's capacity.
    ///
    /// `Clone` cannot report errors, so an allocation failure aborts via
    /// [`handle_alloc_error`]; use [`Creel::try_clone`] to propagate it
    /// instead.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(_) => {
                // try_clone only fails for a non-trivial capacity whose
                // layout was already proven valid by the source block.
                let layout = Layout::array::<T>(self.capacity())
                    .expect("source capacity has a valid layout");
                handle_alloc_error(layout)
            }
        }
    }
}

impl<T: Clone> TryFrom<&[T]> for Creel<T> {
    type Error = CreelError;

    fn try_from(src: &[T]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

impl<T> Index<usize> for Creel<T> {
    type Output = T;

    /// Unchecked-style access: panics on out-of-range like slice indexing.
    /// Use [`Creel::at`] for a recoverable bounds check.
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for Creel<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for Creel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: PartialEq> PartialEq for Creel<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Creel<T> {}

impl<T: PartialOrd> PartialOrd for Creel<T> {
    /// Lexicographic, element-wise; a strict prefix orders first.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for Creel<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

/// Construct a [`Creel`] from a literal element list, or from
/// `[value; count]` repetition syntax.
///
/// This is the infallible convenience form: an allocation failure panics.
/// Use [`Creel::from_slice`] / [`Creel::from_elem`] to propagate it.
///
/// ```
/// use creel::creel;
///
/// let c = creel![1, 2, 3];
/// assert_eq!(c.as_slice(), &[1, 2, 3]);
///
/// let filled = creel![0u8; 4];
/// assert_eq!(filled.len(), 4);
/// ```
#[macro_export]
macro_rules! creel {
    () => {
        $crate::Creel::new()
    };
    ($value:expr; $n:expr) => {
        $crate::Creel::from_elem($n, $value).expect("allocation failure")
    };
    ($($x:expr),+ $(,)?) => {{
        let mut c = $crate::Creel::new();
        $(c.push($x).expect("allocation failure");)+
        c
    }};
}
