//! Sequence diff engine for rowdelta.
//!
//! Computes minimal edit scripts between two versions of an ordered
//! sequence with a longest-common-subsequence table, and applies a script
//! to a live collection without invalidating indices mid-way.
//!
//! # Key Types
//!
//! - [`EditScript`] / [`EditOp`] -- Ordered Insert/Remove/Update operations
//! - [`LcsTable`] -- Suffix LCS lengths and the backtrace that reads a script out of them
//! - [`MutableSequence`] -- Index-addressed collection a script can be applied to
//! - [`DiffConfig`] / [`UpdatePolicy`] -- Whether replacements are paired into `Update`

pub mod config;
pub mod error;
pub mod lcs;
pub mod patch;
pub mod script;
pub mod sequence;

pub use config::{DiffConfig, UpdatePolicy};
pub use error::{DiffError, DiffResult};
pub use lcs::{diff, diff_by, diff_with, try_diff_by, try_diff_with, LcsTable};
pub use patch::apply;
pub use script::{EditKind, EditOp, EditScript};
pub use sequence::MutableSequence;
