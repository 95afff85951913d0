//! High-level API for rowdelta.
//!
//! Bundles the flat sequence diff and the sectioned diff behind a single
//! configured [`Differ`], with TOML-loadable [`RowdeltaConfig`] and one
//! error type for everything that can fail. This is the main entry point
//! for applications embedding rowdelta.

pub mod config;
pub mod differ;
pub mod error;

pub use config::RowdeltaConfig;
pub use differ::Differ;
pub use error::{RowdeltaError, RowdeltaResult};

// Re-export key types
pub use rowdelta_diff::{
    DiffConfig, DiffError, EditKind, EditOp, EditScript, LcsTable, MutableSequence, UpdatePolicy,
};
pub use rowdelta_sections::{
    ApplyOptions, BatchSurface, BatchUpdate, DisjointPolicy, IndexPath, Section, SectionChange,
    SectionDiffConfig, SectionError, SectionId, SectionSet, SectionedDiff, UpdateRendering,
};
pub use rowdelta_sections::perform_batch;
