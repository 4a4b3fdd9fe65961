//! Owned iteration.
//!
//! Borrowing iteration is slice iteration (see [`Creel::iter`] and
//! [`Creel::iter_mut`]); this module supplies the consuming form. The
//! iterator owns the backing block and walks a start/end pointer pair;
//! whatever has not been yielded when the iterator is dropped is dropped
//! with it, and the block is then released.

#![allow(unsafe_code)]

use std::iter::FusedIterator;
use std::mem;
use std::ptr;
use std::slice;

use crate::creel::Creel;
use crate::storage::RawStorage;
use crate::uninit;

/// A consuming iterator over a [`Creel`], front to back.
///
/// Double-ended and exact-sized. Created by `into_iter()` on an owned
/// container.
pub struct IntoIter<T> {
    // Keeps the block alive until the iterator is dropped; never read
    // after construction. Drop yields the elements first, explicitly.
    _buf: RawStorage<T>,
    start: *const T,
    end: *const T,
}

unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> IntoIter<T> {
    fn new(buf: RawStorage<T>, len: usize) -> Self {
        let start = buf.ptr() as *const T;
        // Zero-sized elements cannot use pointer offsets: track the count
        // in the pointer value itself.
        let end = if mem::size_of::<T>() == 0 {
            (start as usize).wrapping_add(len) as *const T
        } else {
            // SAFETY: the block holds at least `len` slots.
            unsafe { start.add(len) }
        };
        Self { _buf: buf, start, end }
    }

    /// The elements not yet yielded, as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [start, start + remaining) are live, unyielded elements.
        unsafe { slice::from_raw_parts(self.start, self.remaining()) }
    }

    fn remaining(&self) -> usize {
        if mem::size_of::<T>() == 0 {
            (self.end as usize).wrapping_sub(self.start as usize)
        } else {
            // SAFETY: start and end are in (or one past) the same block.
            unsafe { self.end.offset_from(self.start) as usize }
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        if mem::size_of::<T>() == 0 {
            self.start = (self.start as usize).wrapping_add(1) as *const T;
            // SAFETY: a zero-sized value can be conjured from any aligned
            // pointer; the count bookkeeping above keeps yields == len.
            return Some(unsafe { ptr::read(ptr::NonNull::dangling().as_ptr()) });
        }
        // SAFETY: start != end, so start points at a live element the
        // iterator still owns; advancing past it transfers that ownership.
        let value = unsafe { ptr::read(self.start) };
        // SAFETY: start stays within (or one past) the block.
        self.start = unsafe { self.start.add(1) };
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        if mem::size_of::<T>() == 0 {
            self.end = (self.end as usize).wrapping_sub(1) as *const T;
            // SAFETY: as in `next` for the zero-sized case.
            return Some(unsafe { ptr::read(ptr::NonNull::dangling().as_ptr()) });
        }
        // SAFETY: start != end, so the slot before end is live and owned
        // by the iterator.
        self.end = unsafe { self.end.sub(1) };
        Some(unsafe { ptr::read(self.end) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: the unyielded elements are live and owned by the
        // iterator; the block itself is released by `buf`'s Drop after.
        unsafe { uninit::drop_range(self.start as *mut T, self.remaining()) };
    }
}

impl<T> IntoIterator for Creel<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consume the container, yielding its elements front to back.
    fn into_iter(self) -> IntoIter<T> {
        let (buf, len) = self.into_raw_parts();
        IntoIter::new(buf, len)
    }
}

impl<'a, T> IntoIterator for &'a Creel<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Creel<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}
