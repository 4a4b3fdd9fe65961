//! Container-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during container operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreelError {
    /// Raw storage for the requested number of elements could not be
    /// obtained, either because the allocator refused or because the
    /// byte size of the request overflowed `isize::MAX`.
    AllocationFailure {
        /// Number of elements requested.
        requested: usize,
    },
    /// A bounds-checked access was given an index past the live region.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of live elements at the time of the access.
        len: usize,
    },
}

impl fmt::Display for CreelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure { requested } => {
                write!(f, "allocation failure: requested storage for {requested} elements")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
        }
    }
}

impl Error for CreelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_request() {
        let err = CreelError::AllocationFailure { requested: 64 };
        assert_eq!(
            err.to_string(),
            "allocation failure: requested storage for 64 elements"
        );
    }

    #[test]
    fn display_reports_index_and_len() {
        let err = CreelError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "index 5 out of range for length 3");
    }
}
