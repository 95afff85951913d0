//! Two-level diffing for sectioned collections.
//!
//! A [`SectionSet`] is an ordered list of [`Section`]s, each an ordered run
//! of items with an optional identity, header and footer. Diffing two sets
//! produces a [`SectionedDiff`]: whole-section insertions, removals and
//! replacements, plus an item-level [`EditScript`] for every section that
//! survived with changed contents.
//!
//! # Key Types
//!
//! - [`Section`] / [`SectionId`] -- one region of items
//! - [`SectionSet`] / [`IndexPath`] -- the two-level collection and its coordinates
//! - [`SectionedDiff`] / [`SectionChange`] -- the result of [`diff_sections`]
//! - [`ApplyOptions`] -- controls [`apply_sections`]
//! - [`BatchUpdate`] / [`BatchSurface`] / [`UpdateRendering`] -- hand-off to a rendering surface
//!
//! [`EditScript`]: rowdelta_diff::EditScript

pub mod apply;
pub mod batch;
pub mod diff;
pub mod error;
pub mod section;
pub mod set;

pub use apply::{apply_sections, ApplyOptions};
pub use batch::{perform_batch, BatchSurface, BatchUpdate, UpdateRendering};
pub use diff::{
    diff_sections, diff_sections_by, diff_sections_with, try_diff_sections_by,
    try_diff_sections_with, DisjointPolicy, SectionChange, SectionDiffConfig, SectionedDiff,
};
pub use error::{SectionError, SectionResult};
pub use section::{Section, SectionId};
pub use set::{IndexPath, Iter, SectionSet};
