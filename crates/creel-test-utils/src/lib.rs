//! Instrumented element fixtures for creel development.
//!
//! Three standard element types for lifetime and panic-safety testing:
//!
//! - [`DropTally`] / [`Token`] — counts live instances, catching leaks and
//!   double drops.
//! - [`PanicOnNthClone`] — panics deterministically on the N-th clone.
//! - [`CloneCounter`] — counts how many times a value has been cloned.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared live-instance counter.
///
/// Hand out [`Token`]s with [`token`](DropTally::token); every clone of a
/// token increments the tally and every drop decrements it. A test that
/// ends with `live() != expected` has leaked or double-dropped.
#[derive(Default)]
pub struct DropTally {
    live: Arc<AtomicUsize>,
}

impl DropTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens currently alive.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Mint a new live token counted by this tally.
    pub fn token(&self) -> Token {
        self.live.fetch_add(1, Ordering::SeqCst);
        Token {
            live: Arc::clone(&self.live),
        }
    }
}

/// A counted instance minted by [`DropTally::token`].
pub struct Token {
    live: Arc<AtomicUsize>,
}

impl Clone for Token {
    fn clone(&self) -> Self {
        self.live.fetch_add(1, Ordering::SeqCst);
        Self {
            live: Arc::clone(&self.live),
        }
    }
}

impl Drop for Token {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Panics deterministically on the N-th clone.
///
/// Carries a [`Token`] so instances participate in drop accounting: after
/// a caught panic, a leak-free container leaves the tally where it started.
pub struct PanicOnNthClone {
    fuse: Arc<AtomicUsize>,
    _token: Token,
}

impl PanicOnNthClone {
    /// Create an instance whose `n`-th clone (counted across all clones of
    /// this instance and its descendants) panics.
    pub fn armed(n: usize, tally: &DropTally) -> Self {
        Self {
            fuse: Arc::new(AtomicUsize::new(n)),
            _token: tally.token(),
        }
    }
}

impl Clone for PanicOnNthClone {
    fn clone(&self) -> Self {
        if self.fuse.fetch_sub(1, Ordering::SeqCst) == 1 {
            panic!("clone fuse burned out");
        }
        Self {
            fuse: Arc::clone(&self.fuse),
            _token: self._token.clone(),
        }
    }
}

/// Counts clone calls across a value and all of its clones.
///
/// `value` is an ordinary payload for equality assertions; the clone count
/// lets tests prove that an operation moved elements rather than copying
/// them.
pub struct CloneCounter {
    clones: Arc<AtomicUsize>,
    pub value: u64,
}

impl CloneCounter {
    pub fn new(value: u64) -> Self {
        Self {
            clones: Arc::new(AtomicUsize::new(0)),
            value,
        }
    }

    /// Total clones performed on this value's family so far.
    pub fn clone_count(&self) -> usize {
        self.clones.load(Ordering::SeqCst)
    }
}

impl Clone for CloneCounter {
    fn clone(&self) -> Self {
        self.clones.fetch_add(1, Ordering::SeqCst);
        Self {
            clones: Arc::clone(&self.clones),
            value: self.value,
        }
    }
}

impl PartialEq for CloneCounter {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_tracks_clone_and_drop() {
        let tally = DropTally::new();
        let a = tally.token();
        assert_eq!(tally.live(), 1);
        let b = a.clone();
        assert_eq!(tally.live(), 2);
        drop(a);
        drop(b);
        assert_eq!(tally.live(), 0);
    }

    #[test]
    fn fuse_panics_on_exactly_the_nth_clone() {
        let tally = DropTally::new();
        let bomb = PanicOnNthClone::armed(3, &tally);
        let _c1 = bomb.clone();
        let _c2 = bomb.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| bomb.clone()));
        assert!(result.is_err());
    }

    #[test]
    fn clone_counter_counts_across_descendants() {
        let original = CloneCounter::new(7);
        let child = original.clone();
        let _grandchild = child.clone();
        assert_eq!(original.clone_count(), 2);
        assert_eq!(child.value, 7);
    }
}
