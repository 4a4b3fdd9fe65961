//! Allocation-failure propagation: a request the allocator can never
//! satisfy must surface as `AllocationFailure` and leave the container's
//! prior state fully intact.
//!
//! A byte size past `isize::MAX` is rejected by layout computation before
//! the allocator is even asked, which makes the failure deterministic and
//! safe to provoke in a test.

use creel::{creel, Creel, CreelError};

// Large enough that element_count * size_of overflows the layout limit.
const ABSURD: usize = usize::MAX / 2;

#[test]
fn reserve_failure_is_reported_and_state_preserved() {
    let mut c = creel![1u64, 2, 3];
    let addr = c.data();

    let err = c.reserve(ABSURD).unwrap_err();
    assert_eq!(err, CreelError::AllocationFailure { requested: ABSURD });

    assert_eq!(c.as_slice(), &[1, 2, 3]);
    assert_eq!(c.data(), addr);
}

#[test]
fn resize_failure_runs_no_user_code_and_preserves_state() {
    let mut c = creel![7u64];
    let err = c.resize(ABSURD, 0).unwrap_err();
    assert!(matches!(err, CreelError::AllocationFailure { .. }));
    assert_eq!(c.as_slice(), &[7]);
}

#[test]
fn sized_constructors_propagate_the_failure() {
    assert!(matches!(
        Creel::<u64>::with_len(ABSURD),
        Err(CreelError::AllocationFailure { .. })
    ));
    assert!(matches!(
        Creel::from_elem(ABSURD, 0u64),
        Err(CreelError::AllocationFailure { .. })
    ));
}

#[test]
fn failed_reserve_on_an_empty_container_keeps_the_empty_state() {
    let mut c: Creel<u64> = Creel::new();
    let err = c.reserve(ABSURD).unwrap_err();
    assert_eq!(err, CreelError::AllocationFailure { requested: ABSURD });
    assert_eq!(c.capacity(), 0);
    assert!(c.data().is_null());
}
