//! Edit operations and the ordered script that holds them.
//!
//! An [`EditScript`] keeps operations in generation order: the order in which
//! the backtrace walked the old and new sequences, left to right. It is not
//! sorted by index. Removal indices refer to the old sequence, insertion
//! indices to the new one.

use serde::{Deserialize, Serialize};

/// Discriminant of an [`EditOp`], used for counting and filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Insert,
    Remove,
    Update,
}

/// A single edit operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOp<T> {
    /// `element` appears at `index` in the new sequence.
    Insert { index: usize, element: T },
    /// `element` at `index` in the old sequence is gone.
    Remove { index: usize, element: T },
    /// The old element at `old_index` is replaced by the new element at
    /// `new_index`. Realized as a removal followed by an insertion.
    Update {
        old_index: usize,
        old_element: T,
        new_index: usize,
        new_element: T,
    },
}

impl<T> EditOp<T> {
    /// The kind of this operation.
    pub fn kind(&self) -> EditKind {
        match self {
            EditOp::Insert { .. } => EditKind::Insert,
            EditOp::Remove { .. } => EditKind::Remove,
            EditOp::Update { .. } => EditKind::Update,
        }
    }

    /// Position in the old sequence consumed by this operation, if any.
    pub fn old_index(&self) -> Option<usize> {
        match self {
            EditOp::Remove { index, .. } => Some(*index),
            EditOp::Update { old_index, .. } => Some(*old_index),
            EditOp::Insert { .. } => None,
        }
    }

    /// Position in the new sequence produced by this operation, if any.
    pub fn new_index(&self) -> Option<usize> {
        match self {
            EditOp::Insert { index, .. } => Some(*index),
            EditOp::Update { new_index, .. } => Some(*new_index),
            EditOp::Remove { .. } => None,
        }
    }

    /// The element leaving the old sequence, if any.
    pub fn old_element(&self) -> Option<&T> {
        match self {
            EditOp::Remove { element, .. } => Some(element),
            EditOp::Update { old_element, .. } => Some(old_element),
            EditOp::Insert { .. } => None,
        }
    }

    /// The element entering the new sequence, if any.
    pub fn new_element(&self) -> Option<&T> {
        match self {
            EditOp::Insert { element, .. } => Some(element),
            EditOp::Update { new_element, .. } => Some(new_element),
            EditOp::Remove { .. } => None,
        }
    }
}

/// An ordered list of edit operations transforming one sequence into another.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript<T> {
    ops: Vec<EditOp<T>>,
}

impl<T> Default for EditScript<T> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<T> EditScript<T> {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the script has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Append an operation.
    pub fn push(&mut self, op: EditOp<T>) {
        self.ops.push(op);
    }

    /// Iterate over the operations in generation order.
    pub fn iter(&self) -> std::slice::Iter<'_, EditOp<T>> {
        self.ops.iter()
    }

    /// The operations as a slice.
    pub fn as_slice(&self) -> &[EditOp<T>] {
        &self.ops
    }

    /// Consume the script, returning its operations.
    pub fn into_ops(self) -> Vec<EditOp<T>> {
        self.ops
    }

    /// Number of operations of the given kind.
    pub fn count(&self, kind: EditKind) -> usize {
        self.ops.iter().filter(|op| op.kind() == kind).count()
    }

    /// Number of `Insert` operations. `Update` is not counted.
    pub fn insert_count(&self) -> usize {
        self.count(EditKind::Insert)
    }

    /// Number of `Remove` operations. `Update` is not counted.
    pub fn remove_count(&self) -> usize {
        self.count(EditKind::Remove)
    }

    /// Number of `Update` operations.
    pub fn update_count(&self) -> usize {
        self.count(EditKind::Update)
    }

    /// The `Insert` operations, in generation order.
    pub fn inserted(&self) -> impl Iterator<Item = &EditOp<T>> {
        self.ops.iter().filter(|op| op.kind() == EditKind::Insert)
    }

    /// The `Remove` operations, in generation order.
    pub fn removed(&self) -> impl Iterator<Item = &EditOp<T>> {
        self.ops.iter().filter(|op| op.kind() == EditKind::Remove)
    }

    /// The `Update` operations, in generation order.
    pub fn updated(&self) -> impl Iterator<Item = &EditOp<T>> {
        self.ops.iter().filter(|op| op.kind() == EditKind::Update)
    }

    /// Number of old elements the script leaves in place, given the length
    /// of the old sequence it was computed from.
    pub fn kept_count(&self, old_len: usize) -> usize {
        old_len.saturating_sub(self.remove_count() + self.update_count())
    }
}

impl<T> From<Vec<EditOp<T>>> for EditScript<T> {
    fn from(ops: Vec<EditOp<T>>) -> Self {
        Self { ops }
    }
}

impl<T> FromIterator<EditOp<T>> for EditScript<T> {
    fn from_iter<I: IntoIterator<Item = EditOp<T>>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for EditScript<T> {
    type Item = EditOp<T>;
    type IntoIter = std::vec::IntoIter<EditOp<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a EditScript<T> {
    type Item = &'a EditOp<T>;
    type IntoIter = std::slice::Iter<'a, EditOp<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
