//! A contiguous growable sequence container built from raw storage upward.
//!
//! `creel` reimplements the classic dynamic array on top of manual
//! allocation: the backing block and the set of live elements are managed
//! separately, and every mutating operation is transactional. This crate
//! contains `unsafe` code by design; every `unsafe` block carries a
//! `// SAFETY:` comment.
//!
//! # Architecture
//!
//! ```text
//! Creel<T> (growth policy + public surface)
//! ├── storage::RawStorage<T> (allocate/free raw blocks, no lifetimes)
//! ├── uninit (construct/relocate/drop element ranges, panic rollback)
//! └── iter::IntoIter<T> (owned iteration over a detached block)
//! ```
//!
//! # Failure model
//!
//! - Allocation failure is an error value ([`CreelError::AllocationFailure`])
//!   returned from every operation that may allocate — never retried,
//!   never swallowed.
//! - Bounds-checked access fails with [`CreelError::IndexOutOfRange`].
//! - A panic in user code (`Clone`, `Default`) unwinds with the strong
//!   guarantee: the container's observable state is exactly what it was
//!   before the call, with nothing leaked and nothing dropped twice.
//!
//! # Quick start
//!
//! ```
//! use creel::{creel, Creel};
//!
//! let mut basket = creel![1, 2, 3];
//! basket.push(4)?;
//! assert_eq!(basket.as_slice(), &[1, 2, 3, 4]);
//!
//! assert_eq!(basket.pop(), Some(4));
//! assert_eq!(basket.pop(), Some(3));
//! assert_eq!(basket.len(), 2);
//!
//! let copy = basket.try_clone()?;
//! assert_eq!(copy, basket);
//! assert!(basket.at(5).is_err());
//! # Ok::<(), creel::CreelError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

mod creel;
pub mod error;
pub mod iter;
mod storage;
mod uninit;

// Public re-exports for the primary API surface.
pub use crate::creel::Creel;
pub use error::CreelError;
pub use iter::IntoIter;
