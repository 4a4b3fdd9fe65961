//! Benchmark profiles and utilities for the creel container.
//!
//! Provides pre-built containers for the bench targets:
//!
//! - [`sequential_u64`]: a container of `n` sequential `u64` values.
//! - [`REFERENCE_LEN`]: the element count the reference benches use.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use creel::Creel;

/// Element count for the reference benchmark profile.
pub const REFERENCE_LEN: usize = 10_000;

/// Build a container of `n` sequential `u64` values.
pub fn sequential_u64(n: usize) -> Creel<u64> {
    let mut c = Creel::new();
    c.reserve(n).expect("bench profile allocation");
    for i in 0..n {
        c.push(i as u64).expect("bench profile push");
    }
    c
}
