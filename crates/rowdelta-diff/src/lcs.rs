//! Longest-common-subsequence diff over two ordered sequences.
//!
//! [`LcsTable`] holds the suffix LCS lengths: cell `(i, j)` is the length of
//! the longest common subsequence of `old[i..]` and `new[j..]`. The backtrace
//! walks the table from `(0, 0)` to `(old.len(), new.len())` and reports
//! every step that is not on the common subsequence as an [`EditOp`].
//!
//! Backtrace priority at each step, first match wins:
//!
//! 1. new exhausted: remove `old[i]`
//! 2. old exhausted: insert `new[j]`
//! 3. pairing `old[i]` with `new[j]` loses nothing: update (or remove + insert)
//! 4. skipping `old[i]` loses nothing: remove `old[i]`
//! 5. skipping `new[j]` loses nothing: insert `new[j]`
//! 6. otherwise the pair is equivalent and kept, nothing is emitted
//!
//! Time and space are `O(m * n)`; the backtrace is `O(m + n)`. Both are
//! iterative.

use std::convert::Infallible;

use tracing::debug;

use crate::config::{DiffConfig, UpdatePolicy};
use crate::script::{EditOp, EditScript};

/// Suffix LCS lengths for an `old` x `new` pair, stored row-major in a
/// single `(m + 1) * (n + 1)` buffer. Row `m` and column `n` are zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LcsTable {
    rows: usize,
    cols: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    /// Fill the table with an infallible equivalence predicate.
    pub fn build<A, B, F>(old: &[A], new: &[B], mut equivalent: F) -> Self
    where
        F: FnMut(&A, &B) -> bool,
    {
        match Self::try_build(old, new, |a, b| Ok::<_, Infallible>(equivalent(a, b))) {
            Ok(table) => table,
            Err(never) => match never {},
        }
    }

    /// Fill the table with a fallible equivalence predicate.
    ///
    /// The first predicate error aborts the fill and is returned unchanged.
    pub fn try_build<A, B, E, F>(old: &[A], new: &[B], mut equivalent: F) -> Result<Self, E>
    where
        F: FnMut(&A, &B) -> Result<bool, E>,
    {
        let rows = old.len() + 1;
        let cols = new.len() + 1;
        let mut cells = vec![0usize; rows * cols];

        for i in (0..old.len()).rev() {
            for j in (0..new.len()).rev() {
                let here = i * cols + j;
                cells[here] = if equivalent(&old[i], &new[j])? {
                    1 + cells[here + cols + 1]
                } else {
                    cells[here + 1].max(cells[here + cols])
                };
            }
        }

        Ok(Self { rows, cols, cells })
    }

    /// LCS length of `old[i..]` and `new[j..]`, or `None` when `i > old.len()`
    /// or `j > new.len()`.
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        if i < self.rows && j < self.cols {
            Some(self.cells[i * self.cols + j])
        } else {
            None
        }
    }

    /// LCS length of the full sequences.
    pub fn lcs_len(&self) -> usize {
        self.cells[0]
    }

    /// Length of the old sequence the table was built from.
    pub fn old_len(&self) -> usize {
        self.rows - 1
    }

    /// Length of the new sequence the table was built from.
    pub fn new_len(&self) -> usize {
        self.cols - 1
    }

    fn at(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    /// Read the edit script out of the table.
    ///
    /// `old` and `new` must be the sequences the table was built from.
    pub fn backtrace<T: Clone>(
        &self,
        old: &[T],
        new: &[T],
        updates: UpdatePolicy,
    ) -> EditScript<T> {
        debug_assert_eq!(old.len(), self.old_len());
        debug_assert_eq!(new.len(), self.new_len());

        let (m, n) = (old.len(), new.len());
        let mut script = EditScript::new();
        let (mut i, mut j) = (0, 0);

        while i < m || j < n {
            if j == n {
                script.push(EditOp::Remove {
                    index: i,
                    element: old[i].clone(),
                });
                i += 1;
            } else if i == m {
                script.push(EditOp::Insert {
                    index: j,
                    element: new[j].clone(),
                });
                j += 1;
            } else if self.at(i, j) == self.at(i + 1, j + 1) {
                match updates {
                    UpdatePolicy::Pair => script.push(EditOp::Update {
                        old_index: i,
                        old_element: old[i].clone(),
                        new_index: j,
                        new_element: new[j].clone(),
                    }),
                    UpdatePolicy::Split => {
                        script.push(EditOp::Remove {
                            index: i,
                            element: old[i].clone(),
                        });
                        script.push(EditOp::Insert {
                            index: j,
                            element: new[j].clone(),
                        });
                    }
                }
                i += 1;
                j += 1;
            } else if self.at(i, j) == self.at(i + 1, j) {
                script.push(EditOp::Remove {
                    index: i,
                    element: old[i].clone(),
                });
                i += 1;
            } else if self.at(i, j) == self.at(i, j + 1) {
                script.push(EditOp::Insert {
                    index: j,
                    element: new[j].clone(),
                });
                j += 1;
            } else {
                i += 1;
                j += 1;
            }
        }

        script
    }
}

/// Diff two sequences using `PartialEq` as the equivalence.
pub fn diff<T: Clone + PartialEq>(old: &[T], new: &[T]) -> EditScript<T> {
    diff_by(old, new, |a, b| a == b)
}

/// Diff two sequences with a caller-supplied equivalence predicate.
pub fn diff_by<T, F>(old: &[T], new: &[T], equivalent: F) -> EditScript<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    diff_with(old, new, &DiffConfig::default(), equivalent)
}

/// Diff two sequences with a fallible equivalence predicate.
///
/// If the predicate fails, no script is produced and its error is returned.
pub fn try_diff_by<T, E, F>(old: &[T], new: &[T], equivalent: F) -> Result<EditScript<T>, E>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<bool, E>,
{
    try_diff_with(old, new, &DiffConfig::default(), equivalent)
}

/// Diff two sequences under an explicit configuration.
pub fn diff_with<T, F>(
    old: &[T],
    new: &[T],
    config: &DiffConfig,
    mut equivalent: F,
) -> EditScript<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    match try_diff_with(old, new, config, |a, b| Ok::<_, Infallible>(equivalent(a, b))) {
        Ok(script) => script,
        Err(never) => match never {},
    }
}

/// Diff two sequences under an explicit configuration with a fallible
/// equivalence predicate.
pub fn try_diff_with<T, E, F>(
    old: &[T],
    new: &[T],
    config: &DiffConfig,
    equivalent: F,
) -> Result<EditScript<T>, E>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<bool, E>,
{
    let table = LcsTable::try_build(old, new, equivalent)?;
    let script = table.backtrace(old, new, config.updates);

    debug!(
        old_len = old.len(),
        new_len = new.len(),
        lcs = table.lcs_len(),
        inserts = script.insert_count(),
        removes = script.remove_count(),
        updates = script.update_count(),
        "sequence diff computed"
    );

    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::EditKind;

    fn ins<T>(index: usize, element: T) -> EditOp<T> {
        EditOp::Insert { index, element }
    }

    fn rem<T>(index: usize, element: T) -> EditOp<T> {
        EditOp::Remove { index, element }
    }

    fn upd<T>(old_index: usize, old_element: T, new_index: usize, new_element: T) -> EditOp<T> {
        EditOp::Update {
            old_index,
            old_element,
            new_index,
            new_element,
        }
    }

    #[test]
    fn table_holds_suffix_lcs_lengths() {
        let old = ['a', 'b', 'c', 'b'];
        let new = ['b', 'c', 'b'];
        let table = LcsTable::build(&old, &new, |a, b| a == b);
        assert_eq!(table.lcs_len(), 3);
        assert_eq!(table.get(1, 0), Some(3));
        assert_eq!(table.get(3, 0), Some(1));
        assert_eq!(table.get(4, 0), Some(0));
        assert_eq!(table.get(0, 3), Some(0));
        assert_eq!(table.old_len(), 4);
        assert_eq!(table.new_len(), 3);
    }

    #[test]
    fn table_for_empty_inputs() {
        let table = LcsTable::build::<u8, u8, _>(&[], &[], |a, b| a == b);
        assert_eq!(table.lcs_len(), 0);
        assert_eq!(table.get(0, 0), Some(0));
    }

    #[test]
    fn out_of_range_cells_are_none() {
        let table = LcsTable::build(&[1], &[1], |a: &i32, b: &i32| a == b);
        assert_eq!(table.get(1, 1), Some(0));
        assert_eq!(table.get(2, 0), None);
        assert_eq!(table.get(0, 2), None);
    }

    #[test]
    fn empty_old_is_all_inserts() {
        let script = diff(&[], &[1, 2, 3]);
        assert_eq!(script.as_slice(), &[ins(0, 1), ins(1, 2), ins(2, 3)]);
    }

    #[test]
    fn empty_new_is_all_removes() {
        let script = diff(&[1, 2, 3], &[]);
        assert_eq!(script.as_slice(), &[rem(0, 1), rem(1, 2), rem(2, 3)]);
    }

    #[test]
    fn identical_sequences_produce_empty_script() {
        let seq = vec!["a", "b", "c"];
        assert!(diff(&seq, &seq).is_empty());
        assert!(diff::<u8>(&[], &[]).is_empty());
    }

    #[test]
    fn mismatched_pairs_become_updates() {
        let script = diff(&[1, 2], &[3, 4]);
        assert_eq!(script.as_slice(), &[upd(0, 1, 0, 3), upd(1, 2, 1, 4)]);
    }

    #[test]
    fn disjoint_sequences_interleave_under_split_policy() {
        let config = DiffConfig::insert_remove_only();
        let script = diff_with(&[1, 2], &[3, 4], &config, |a, b| a == b);
        assert_eq!(
            script.as_slice(),
            &[rem(0, 1), ins(0, 3), rem(1, 2), ins(1, 4)]
        );
        assert_eq!(script.update_count(), 0);
    }

    #[test]
    fn shifted_window() {
        let script = diff(&[1, 2, 3], &[2, 3, 4]);
        assert_eq!(script.as_slice(), &[rem(0, 1), ins(2, 4)]);
    }

    #[test]
    fn long_mixed_scenario() {
        let old = [9, 4, 0, 7, 2, 1, 3, 3, 7, 7, 2, 1, 1];
        let new = [5, 6, 2, 8, 6, 9, 8, 1];
        let script = diff(&old, &new);
        let expected = vec![
            upd(0, 9, 0, 5),
            upd(1, 4, 1, 6),
            rem(2, 0),
            rem(3, 7),
            rem(4, 2),
            rem(5, 1),
            rem(6, 3),
            rem(7, 3),
            rem(8, 7),
            rem(9, 7),
            upd(11, 1, 3, 8),
            ins(4, 6),
            ins(5, 9),
            ins(6, 8),
        ];
        assert_eq!(script.into_ops(), expected);
    }

    #[test]
    fn reversal_keeps_middle() {
        let script = diff(&[1, 2, 3], &[3, 2, 1]);
        assert_eq!(script.as_slice(), &[upd(0, 1, 0, 3), upd(2, 3, 2, 1)]);
    }

    #[test]
    fn custom_equivalence_matches_by_key() {
        #[derive(Clone, Debug, PartialEq)]
        struct Row {
            id: u32,
            title: &'static str,
        }

        let old = vec![Row { id: 1, title: "one" }, Row { id: 2, title: "two" }];
        let new = vec![Row { id: 2, title: "TWO" }];
        let script = diff_by(&old, &new, |a, b| a.id == b.id);
        assert_eq!(script.len(), 1);
        assert_eq!(script.as_slice()[0].kind(), EditKind::Remove);
        assert_eq!(script.as_slice()[0].old_index(), Some(0));
    }

    #[test]
    fn predicate_error_aborts_diff() {
        let mut calls = 0;
        let result = try_diff_by(&[1, 2, 3], &[4, 5, 6], |a, b| {
            calls += 1;
            if calls == 3 {
                Err(format!("cannot compare {a} and {b}"))
            } else {
                Ok(a == b)
            }
        });
        assert_eq!(result.unwrap_err(), "cannot compare 3 and 4");
        assert_eq!(calls, 3);
    }

    #[test]
    fn fallible_predicate_success_matches_infallible() {
        let old = [1, 5, 2, 7];
        let new = [5, 2, 8];
        let fallible = try_diff_by(&old, &new, |a, b| Ok::<_, ()>(a == b)).unwrap();
        assert_eq!(fallible, diff(&old, &new));
    }
}
