use rowdelta_diff::{EditScript, MutableSequence};
use rowdelta_sections::{BatchUpdate, SectionSet, SectionedDiff, UpdateRendering};

use crate::config::RowdeltaConfig;
use crate::error::RowdeltaResult;

/// Configured entry point for diffing and patching.
///
/// A `Differ` carries a [`RowdeltaConfig`] and applies it to every call, so
/// callers pick policies once instead of threading them through each diff.
#[derive(Clone, Debug, Default)]
pub struct Differ {
    config: RowdeltaConfig,
}

impl Differ {
    pub fn new(config: RowdeltaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RowdeltaConfig {
        &self.config
    }

    // ---- Flat sequences ----

    /// Diff two sequences using `PartialEq`.
    pub fn diff<T: Clone + PartialEq>(&self, old: &[T], new: &[T]) -> EditScript<T> {
        self.diff_by(old, new, |a, b| a == b)
    }

    /// Diff two sequences with a caller-supplied equivalence.
    pub fn diff_by<T, P>(&self, old: &[T], new: &[T], equivalent: P) -> EditScript<T>
    where
        T: Clone,
        P: FnMut(&T, &T) -> bool,
    {
        rowdelta_diff::diff_with(old, new, &self.config.diff, equivalent)
    }

    /// Diff two sequences with a fallible equivalence. The predicate's error
    /// is returned as-is.
    pub fn try_diff_by<T, E, P>(
        &self,
        old: &[T],
        new: &[T],
        equivalent: P,
    ) -> Result<EditScript<T>, E>
    where
        T: Clone,
        P: FnMut(&T, &T) -> Result<bool, E>,
    {
        rowdelta_diff::try_diff_with(old, new, &self.config.diff, equivalent)
    }

    /// Apply a flat script to `target` in place.
    pub fn apply<T, S>(&self, script: &EditScript<T>, target: &mut S) -> RowdeltaResult<()>
    where
        T: Clone,
        S: MutableSequence<T> + ?Sized,
    {
        rowdelta_diff::apply(script, target)?;
        Ok(())
    }

    // ---- Section sets ----

    /// Diff two section sets using `PartialEq` for items.
    pub fn diff_sections<I, H, F>(
        &self,
        old: &SectionSet<I, H, F>,
        new: &SectionSet<I, H, F>,
    ) -> SectionedDiff<I, H, F>
    where
        I: Clone + PartialEq,
        H: Clone + PartialEq,
        F: Clone + PartialEq,
    {
        self.diff_sections_by(old, new, |a, b| a == b)
    }

    /// Diff two section sets with a caller-supplied item equivalence.
    pub fn diff_sections_by<I, H, F, P>(
        &self,
        old: &SectionSet<I, H, F>,
        new: &SectionSet<I, H, F>,
        equivalent: P,
    ) -> SectionedDiff<I, H, F>
    where
        I: Clone + PartialEq,
        H: Clone + PartialEq,
        F: Clone + PartialEq,
        P: FnMut(&I, &I) -> bool,
    {
        rowdelta_sections::diff_sections_with(old, new, &self.config.sections, equivalent)
    }

    /// Diff two section sets with a fallible item equivalence.
    pub fn try_diff_sections_by<I, H, F, E, P>(
        &self,
        old: &SectionSet<I, H, F>,
        new: &SectionSet<I, H, F>,
        equivalent: P,
    ) -> Result<SectionedDiff<I, H, F>, E>
    where
        I: Clone + PartialEq,
        H: Clone + PartialEq,
        F: Clone + PartialEq,
        P: FnMut(&I, &I) -> Result<bool, E>,
    {
        rowdelta_sections::try_diff_sections_with(old, new, &self.config.sections, equivalent)
    }

    /// Apply a sectioned diff to `target` in place, honouring the configured
    /// apply options.
    pub fn apply_sections<I, H, F>(
        &self,
        diff: &SectionedDiff<I, H, F>,
        target: &mut SectionSet<I, H, F>,
    ) -> RowdeltaResult<()>
    where
        I: Clone,
        H: Clone,
        F: Clone,
    {
        rowdelta_sections::apply_sections(diff, target, &self.config.apply)?;
        Ok(())
    }

    /// The batch-update plan for a sectioned diff.
    pub fn batch<I, H, F>(&self, diff: &SectionedDiff<I, H, F>) -> BatchUpdate {
        BatchUpdate::from_sectioned(diff)
    }

    /// The batch-update plan for a sectioned diff, with replacements
    /// rendered per `updates`.
    pub fn batch_with<I, H, F>(
        &self,
        diff: &SectionedDiff<I, H, F>,
        updates: UpdateRendering,
    ) -> BatchUpdate {
        BatchUpdate::from_sectioned_with(diff, updates)
    }
}

impl From<RowdeltaConfig> for Differ {
    fn from(config: RowdeltaConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowdelta_diff::{DiffConfig, DiffError, EditOp};
    use rowdelta_sections::{ApplyOptions, DisjointPolicy, IndexPath, Section};

    use crate::error::RowdeltaError;

    #[test]
    fn default_differ_pairs_updates() {
        let script = Differ::default().diff(&[1, 2], &[1, 3]);
        assert_eq!(script.update_count(), 1);
    }

    #[test]
    fn configured_policy_is_used() {
        let differ = Differ::new(RowdeltaConfig {
            diff: DiffConfig::insert_remove_only(),
            ..Default::default()
        });
        let script = differ.diff(&[1, 2], &[1, 3]);
        assert_eq!(
            script.as_slice(),
            &[
                EditOp::Remove { index: 1, element: 2 },
                EditOp::Insert { index: 1, element: 3 },
            ]
        );
    }

    #[test]
    fn apply_wraps_diff_errors() {
        let differ = Differ::default();
        let script = differ.diff(&[1, 2, 3], &[]);
        let mut short = vec![1];
        let err = differ.apply(&script, &mut short).unwrap_err();
        assert!(matches!(
            err,
            RowdeltaError::Diff(DiffError::RemoveOutOfRange { .. })
        ));
        assert_eq!(short, vec![1]);
    }

    #[test]
    fn fallible_predicate_error_passes_through() {
        let result = Differ::default().try_diff_by(&["a"], &["b"], |_, _| Err::<bool, _>(7));
        assert_eq!(result.unwrap_err(), 7);
    }

    #[test]
    fn sections_follow_config() {
        let differ = Differ::from(RowdeltaConfig {
            sections: rowdelta_sections::SectionDiffConfig {
                disjoint: DisjointPolicy::Replace,
                ..Default::default()
            },
            apply: ApplyOptions::compacting(),
            ..Default::default()
        });

        let old: SectionSet<u32> = SectionSet::from_items(vec![vec![1, 2], vec![5]]);
        let new: SectionSet<u32> = SectionSet::from_items(vec![vec![3, 4], vec![]]);
        let diff = differ.diff_sections(&old, &new);

        let mut target = old.clone();
        differ.apply_sections(&diff, &mut target).unwrap();
        assert_eq!(target, SectionSet::from(vec![Section::new(vec![3, 4])]));
    }

    #[test]
    fn batch_lists_item_coordinates() {
        let differ = Differ::default();
        let old: SectionSet<char> = SectionSet::from_items(vec![vec!['a', 'b']]);
        let new: SectionSet<char> = SectionSet::from_items(vec![vec!['b', 'c']]);
        let batch = differ.batch(&differ.diff_sections(&old, &new));
        assert_eq!(batch.deleted_items, vec![IndexPath::new(0, 0)]);
        assert_eq!(batch.inserted_items, vec![IndexPath::new(0, 1)]);
    }

    #[test]
    fn batch_can_reload_replaced_sections() {
        let differ = Differ::default();
        let old: SectionSet<u8, &str> =
            SectionSet::from(vec![Section::new(vec![1]).with_header("a")]);
        let new: SectionSet<u8, &str> =
            SectionSet::from(vec![Section::new(vec![1]).with_header("b")]);
        let diff = differ.diff_sections(&old, &new);
        let batch = differ.batch_with(&diff, UpdateRendering::Reload);
        assert_eq!(batch.reloaded_sections, vec![0]);
        assert!(batch.deleted_sections.is_empty());
        assert_eq!(differ.batch(&diff).deleted_sections, vec![0]);
    }
}
