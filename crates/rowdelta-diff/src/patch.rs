//! Flat patch application.
//!
//! A script is applied in two phases:
//!
//! 1. every `Remove` and the old side of every `Update`, by descending old
//!    index, so no removal shifts a removal still pending;
//! 2. every `Insert` and the new side of every `Update`, by ascending new
//!    index, so each element lands at its final position.
//!
//! The plan is validated against the target's length before the first
//! mutation. A rejected script leaves the target untouched.

use tracing::{debug, warn};

use crate::error::{DiffError, DiffResult};
use crate::script::EditScript;
use crate::sequence::MutableSequence;

/// The index plan derived from a script: removals descending, insertions
/// ascending.
#[derive(Debug)]
pub(crate) struct PatchPlan<'a, T> {
    pub(crate) removals: Vec<usize>,
    pub(crate) insertions: Vec<(usize, &'a T)>,
}

impl<'a, T> PatchPlan<'a, T> {
    pub(crate) fn from_script(script: &'a EditScript<T>) -> Self {
        let mut removals: Vec<usize> = script.iter().filter_map(|op| op.old_index()).collect();
        let mut insertions: Vec<(usize, &T)> = script
            .iter()
            .filter_map(|op| op.new_index().zip(op.new_element()))
            .collect();

        removals.sort_unstable_by(|a, b| b.cmp(a));
        insertions.sort_by_key(|(index, _)| *index);

        Self {
            removals,
            insertions,
        }
    }

    /// Check the plan against a target of length `len`.
    pub(crate) fn validate(&self, len: usize) -> DiffResult<()> {
        let mut len = len;

        for pair in self.removals.windows(2) {
            if pair[0] == pair[1] {
                return Err(DiffError::DuplicateRemoval { index: pair[0] });
            }
        }
        for &index in &self.removals {
            if index >= len {
                return Err(DiffError::RemoveOutOfRange { index, len });
            }
            len -= 1;
        }

        for pair in self.insertions.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(DiffError::DuplicateInsertion { index: pair[0].0 });
            }
        }
        for &(index, _) in &self.insertions {
            if index > len {
                return Err(DiffError::InsertOutOfRange { index, len });
            }
            len += 1;
        }

        Ok(())
    }
}

/// Apply `script` to `target` in place.
///
/// `target` must hold the old sequence the script was computed from; the
/// result is then the new sequence. Out-of-range or duplicated indices are
/// reported before anything is mutated.
pub fn apply<T, S>(script: &EditScript<T>, target: &mut S) -> DiffResult<()>
where
    T: Clone,
    S: MutableSequence<T> + ?Sized,
{
    let plan = PatchPlan::from_script(script);
    if let Err(e) = plan.validate(target.len()) {
        warn!(error = %e, len = target.len(), "edit script rejected");
        return Err(e);
    }

    for &index in &plan.removals {
        let len = target.len();
        target
            .remove_at(index)
            .ok_or(DiffError::RemoveOutOfRange { index, len })?;
    }
    for &(index, element) in &plan.insertions {
        target.insert_at(index, element.clone());
    }

    debug!(
        removed = plan.removals.len(),
        inserted = plan.insertions.len(),
        len = target.len(),
        "edit script applied"
    );
    Ok(())
}

impl<T: Clone> EditScript<T> {
    /// Apply this script to `target` in place. See [`apply`].
    pub fn apply_to<S>(&self, target: &mut S) -> DiffResult<()>
    where
        S: MutableSequence<T> + ?Sized,
    {
        apply(self, target)
    }

    /// Apply this script to a copy of `old` and return the result.
    pub fn applied(&self, old: &[T]) -> DiffResult<Vec<T>> {
        let mut out = old.to_vec();
        apply(self, &mut out)?;
        Ok(out)
    }
}
