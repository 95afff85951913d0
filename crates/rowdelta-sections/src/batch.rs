//! Translation of diffs into batch updates for a rendering surface.
//!
//! A surface addressed by `(section, item)` coordinates receives one
//! [`BatchUpdate`] per diff. Deletions are expressed in the coordinates of
//! the state before the batch; insertions and reloads in the coordinates of
//! the state after it. The surface owns the mapping into its own addressing
//! scheme.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rowdelta_diff::{EditOp, EditScript};

use crate::diff::{SectionChange, SectionedDiff};
use crate::set::IndexPath;

/// How `Update` entries of a sectioned diff are handed to a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRendering {
    /// A deletion at the old coordinate plus an insertion at the new one.
    #[default]
    Replace,
    /// A reload at the new coordinate. The surface redraws in place.
    Reload,
}

/// The coordinates touched by one diff, grouped the way a batch-update
/// surface consumes them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchUpdate {
    pub deleted_items: Vec<IndexPath>,
    pub deleted_sections: Vec<usize>,
    pub inserted_items: Vec<IndexPath>,
    pub inserted_sections: Vec<usize>,
    pub reloaded_items: Vec<IndexPath>,
    pub reloaded_sections: Vec<usize>,
}

impl BatchUpdate {
    /// Build a batch from a sectioned diff, rendering replacements at either
    /// level as a deletion at the old coordinate plus an insertion at the new
    /// one. Items inside inserted or removed sections are not listed
    /// individually.
    pub fn from_sectioned<I, H, F>(diff: &SectionedDiff<I, H, F>) -> Self {
        Self::from_sectioned_with(diff, UpdateRendering::Replace)
    }

    /// Build a batch from a sectioned diff with an explicit treatment of
    /// `UpdateSection` entries and item-level `Update`s.
    pub fn from_sectioned_with<I, H, F>(
        diff: &SectionedDiff<I, H, F>,
        updates: UpdateRendering,
    ) -> Self {
        let mut batch = Self::default();
        for change in diff {
            match change {
                SectionChange::InsertSection { index, .. } => batch.inserted_sections.push(*index),
                SectionChange::RemoveSection { index, .. } => batch.deleted_sections.push(*index),
                SectionChange::UpdateSection {
                    old_index,
                    new_index,
                    ..
                } => match updates {
                    UpdateRendering::Replace => {
                        batch.deleted_sections.push(*old_index);
                        batch.inserted_sections.push(*new_index);
                    }
                    UpdateRendering::Reload => batch.reloaded_sections.push(*new_index),
                },
                SectionChange::Items {
                    old_section,
                    section,
                    diff,
                } => {
                    for op in diff {
                        match (op, updates) {
                            (EditOp::Update { new_index, .. }, UpdateRendering::Reload) => {
                                batch.reloaded_items.push(IndexPath::new(*section, *new_index));
                            }
                            _ => {
                                if let Some(index) = op.old_index() {
                                    batch.deleted_items.push(IndexPath::new(*old_section, index));
                                }
                                if let Some(index) = op.new_index() {
                                    batch.inserted_items.push(IndexPath::new(*section, index));
                                }
                            }
                        }
                    }
                }
            }
        }
        batch.normalized()
    }

    /// Build a batch from a flat script rendered as section `section`.
    ///
    /// An `Update` becomes a reload of the item at its new index.
    pub fn from_script<T>(section: usize, script: &EditScript<T>) -> Self {
        let mut batch = Self::default();
        for op in script {
            match op {
                EditOp::Insert { index, .. } => {
                    batch.inserted_items.push(IndexPath::new(section, *index))
                }
                EditOp::Remove { index, .. } => {
                    batch.deleted_items.push(IndexPath::new(section, *index))
                }
                EditOp::Update { new_index, .. } => {
                    batch.reloaded_items.push(IndexPath::new(section, *new_index))
                }
            }
        }
        batch.normalized()
    }

    /// Returns `true` if the batch touches nothing.
    pub fn is_empty(&self) -> bool {
        self.deleted_items.is_empty()
            && self.deleted_sections.is_empty()
            && self.inserted_items.is_empty()
            && self.inserted_sections.is_empty()
            && self.reloaded_items.is_empty()
            && self.reloaded_sections.is_empty()
    }

    /// Sort every list into delivery order and drop repeated coordinates.
    /// Deletions come out descending, everything else ascending.
    pub fn normalized(mut self) -> Self {
        fn descending<K: Ord>(keys: &mut Vec<K>) {
            keys.sort_unstable_by(|a, b| b.cmp(a));
            keys.dedup();
        }
        fn ascending<K: Ord>(keys: &mut Vec<K>) {
            keys.sort_unstable();
            keys.dedup();
        }

        descending(&mut self.deleted_items);
        descending(&mut self.deleted_sections);
        ascending(&mut self.inserted_items);
        ascending(&mut self.inserted_sections);
        ascending(&mut self.reloaded_items);
        ascending(&mut self.reloaded_sections);
        self
    }
}

/// A rendering surface that accepts batched structural updates.
///
/// Calls for one batch arrive between [`begin_updates`] and
/// [`end_updates`], in this order: item deletions, section deletions, item
/// insertions, section insertions, item reloads, section reloads. Empty
/// groups are skipped.
///
/// [`begin_updates`]: BatchSurface::begin_updates
/// [`end_updates`]: BatchSurface::end_updates
pub trait BatchSurface {
    /// Start a batch. Default is a no-op.
    fn begin_updates(&mut self) {}

    /// Delete items at pre-batch coordinates, given in descending order.
    fn delete_items(&mut self, paths: &[IndexPath]);

    /// Delete sections at pre-batch indices, given in descending order.
    fn delete_sections(&mut self, indices: &[usize]);

    /// Insert items at post-batch coordinates, given in ascending order.
    fn insert_items(&mut self, paths: &[IndexPath]);

    /// Insert sections at post-batch indices, given in ascending order.
    fn insert_sections(&mut self, indices: &[usize]);

    /// Redraw items in place. Default is a no-op.
    fn reload_items(&mut self, _paths: &[IndexPath]) {}

    /// Redraw sections in place. Default is a no-op.
    fn reload_sections(&mut self, _indices: &[usize]) {}

    /// Finish a batch. Default is a no-op.
    fn end_updates(&mut self) {}
}

/// Drive `surface` through one batch.
pub fn perform_batch<S>(batch: &BatchUpdate, surface: &mut S)
where
    S: BatchSurface + ?Sized,
{
    let batch = batch.clone().normalized();
    if batch.is_empty() {
        return;
    }

    surface.begin_updates();
    if !batch.deleted_items.is_empty() {
        surface.delete_items(&batch.deleted_items);
    }
    if !batch.deleted_sections.is_empty() {
        surface.delete_sections(&batch.deleted_sections);
    }
    if !batch.inserted_items.is_empty() {
        surface.insert_items(&batch.inserted_items);
    }
    if !batch.inserted_sections.is_empty() {
        surface.insert_sections(&batch.inserted_sections);
    }
    if !batch.reloaded_items.is_empty() {
        surface.reload_items(&batch.reloaded_items);
    }
    if !batch.reloaded_sections.is_empty() {
        surface.reload_sections(&batch.reloaded_sections);
    }
    surface.end_updates();

    debug!(
        deleted_items = batch.deleted_items.len(),
        deleted_sections = batch.deleted_sections.len(),
        inserted_items = batch.inserted_items.len(),
        inserted_sections = batch.inserted_sections.len(),
        reloaded_items = batch.reloaded_items.len(),
        reloaded_sections = batch.reloaded_sections.len(),
        "batch delivered"
    );
}
