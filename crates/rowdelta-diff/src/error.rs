//! Error types for the sequence diff crate.

/// Errors that can occur while applying an edit script.
///
/// Diffing itself never fails on its own; a fallible equivalence predicate
/// reports its own error type through `try_diff_by`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// A removal addresses a position past the end of the target.
    #[error("remove index {index} out of range for sequence of length {len}")]
    RemoveOutOfRange {
        /// The offending index in the old sequence.
        index: usize,
        /// The length of the target when the removal would run.
        len: usize,
    },

    /// An insertion addresses a position past the end of the target.
    #[error("insert index {index} out of range for sequence of length {len}")]
    InsertOutOfRange {
        /// The offending index in the new sequence.
        index: usize,
        /// The length of the target when the insertion would run.
        len: usize,
    },

    /// Two removals address the same old position.
    #[error("duplicate removal at index {index}")]
    DuplicateRemoval {
        /// The index removed more than once.
        index: usize,
    },

    /// Two insertions address the same new position.
    #[error("duplicate insertion at index {index}")]
    DuplicateInsertion {
        /// The index inserted more than once.
        index: usize,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
