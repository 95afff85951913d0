//! Error types for sectioned collections.

use rowdelta_diff::DiffError;

/// Errors that can occur while editing or patching a section set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// An item-level script was rejected.
    #[error("item diff error: {0}")]
    Diff(#[from] DiffError),

    /// A section index is past the end of the set.
    #[error("section index {index} out of range for {len} sections")]
    SectionOutOfRange {
        /// The offending section index.
        index: usize,
        /// The number of sections at the time of the access.
        len: usize,
    },

    /// An item index is past the end of its section.
    #[error("item index {index} out of range for section {section} of length {len}")]
    ItemOutOfRange {
        /// The section being addressed.
        section: usize,
        /// The offending item index.
        index: usize,
        /// The section's length at the time of the access.
        len: usize,
    },

    /// Two section-level changes address the same section index.
    #[error("duplicate change for section {index}")]
    DuplicateSectionIndex {
        /// The section index addressed more than once.
        index: usize,
    },

    /// Two item-level changes address the same item.
    #[error("duplicate change for item {index} in section {section}")]
    DuplicateItemIndex {
        /// The section containing the item.
        section: usize,
        /// The item index addressed more than once.
        index: usize,
    },

    /// An item-level change targets a section that is itself removed.
    #[error("section {section} is both patched and removed")]
    ConflictingSectionChange {
        /// The old section index.
        section: usize,
    },

    /// An operation needs at least one section.
    #[error("section set has no sections")]
    NoSections,
}

/// Convenience alias for section results.
pub type SectionResult<T> = Result<T, SectionError>;
