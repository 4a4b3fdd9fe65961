//! Strong-guarantee tests: a panic in user `Clone` code must leave the
//! container exactly as it was, with nothing leaked and nothing dropped
//! twice.
//!
//! `PanicOnNthClone` panics on the n-th clone counted across the whole
//! clone family, so each test below arms the fuse to detonate partway
//! through the operation under test. `DropTally` proves the rollback freed
//! exactly what the failed operation had constructed.

use creel::Creel;
use creel_test_utils::{DropTally, PanicOnNthClone};
use std::panic::{catch_unwind, AssertUnwindSafe};

fn creel_of_clones(bomb: &PanicOnNthClone, n: usize) -> Creel<PanicOnNthClone> {
    let mut c = Creel::new();
    for _ in 0..n {
        c.push(bomb.clone()).unwrap();
    }
    c
}

#[test]
fn resize_growth_panic_leaves_container_untouched() {
    let tally = DropTally::new();
    // Clones: 2 pushes + 1 resize argument + fill... detonates on the
    // third fill clone (the sixth overall).
    let bomb = PanicOnNthClone::armed(6, &tally);
    let mut c = creel_of_clones(&bomb, 2);
    assert_eq!(c.capacity(), 2);
    let addr = c.data();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = c.resize(8, bomb.clone());
    }));
    assert!(result.is_err());

    // Prior observable state, exactly.
    assert_eq!(c.len(), 2);
    assert_eq!(c.capacity(), 2);
    assert_eq!(c.data(), addr);
    // Live: the original bomb + the 2 elements still in the container.
    // The resize argument and the partially filled new block were all
    // released during unwinding.
    assert_eq!(tally.live(), 3);

    drop(c);
    assert_eq!(tally.live(), 1);
}

#[test]
fn in_capacity_resize_panic_leaves_length_unchanged() {
    let tally = DropTally::new();
    // Clones: 2 pushes + 1 argument + detonate on the second fill clone.
    let bomb = PanicOnNthClone::armed(5, &tally);
    let mut c = creel_of_clones(&bomb, 2);
    c.reserve(10).unwrap();
    let addr = c.data();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = c.resize(9, bomb.clone());
    }));
    assert!(result.is_err());

    assert_eq!(c.len(), 2);
    assert_eq!(c.capacity(), 10);
    assert_eq!(c.data(), addr);
    assert_eq!(tally.live(), 3);
}

#[test]
fn from_elem_panic_materializes_nothing() {
    let tally = DropTally::new();
    let bomb = PanicOnNthClone::armed(3, &tally);

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = Creel::from_elem(8, bomb.clone());
    }));
    assert!(result.is_err());
    // Only the original survives: the argument clone and the slot
    // constructed before the detonation were both rolled back.
    assert_eq!(tally.live(), 1);
}

#[test]
fn clone_panic_leaves_the_source_intact() {
    let tally = DropTally::new();
    // Clones: 4 pushes, then detonate on the third element clone inside
    // Clone for Creel.
    let bomb = PanicOnNthClone::armed(7, &tally);
    let c = creel_of_clones(&bomb, 4);

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = c.clone();
    }));
    assert!(result.is_err());

    assert_eq!(c.len(), 4);
    assert_eq!(tally.live(), 5);
}

#[test]
fn from_slice_panic_rolls_back_the_partial_copy() {
    let tally = DropTally::new();
    // Clones: 3 pushes, then detonate on the second slot of from_slice.
    let bomb = PanicOnNthClone::armed(5, &tally);
    let src = creel_of_clones(&bomb, 3);

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = Creel::from_slice(src.as_slice());
    }));
    assert!(result.is_err());

    assert_eq!(src.len(), 3);
    assert_eq!(tally.live(), 4);
}
