//! Sectioned patch application.
//!
//! Mutations run in a fixed order so that every coordinate is valid when it
//! is used:
//!
//! 1. item removals, descending, at `(old section, old item)`;
//! 2. section removals and the old side of section replacements,
//!    descending by old section index;
//! 3. item insertions, ascending, at `(surviving section, new item)` where
//!    the surviving section index is the old index minus the number of
//!    removed sections below it;
//! 4. section insertions and the new side of section replacements,
//!    ascending by new section index;
//! 5. optionally, compaction of sections left empty.
//!
//! The full plan is validated against the target's shape first; a rejected
//! diff leaves the target untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rowdelta_diff::EditOp;

use crate::diff::{SectionChange, SectionedDiff};
use crate::error::{SectionError, SectionResult};
use crate::section::Section;
use crate::set::{IndexPath, SectionSet};

/// Options for sectioned patch application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyOptions {
    /// Drop sections that hold no items once the diff is applied.
    pub compact_empty: bool,
}

impl ApplyOptions {
    pub fn compacting() -> Self {
        Self {
            compact_empty: true,
        }
    }
}

struct SectionPlan<'a, I, H, F> {
    item_removals: Vec<IndexPath>,
    section_removals: Vec<usize>,
    item_insertions: Vec<(IndexPath, &'a I)>,
    section_insertions: Vec<(usize, &'a Section<I, H, F>)>,
}

impl<'a, I, H, F> SectionPlan<'a, I, H, F> {
    fn from_diff(diff: &'a SectionedDiff<I, H, F>) -> SectionResult<Self> {
        let mut section_removals = Vec::new();
        let mut section_insertions = Vec::new();

        for change in diff {
            match change {
                SectionChange::RemoveSection { index, .. } => section_removals.push(*index),
                SectionChange::InsertSection { index, section } => {
                    section_insertions.push((*index, section))
                }
                SectionChange::UpdateSection {
                    old_index,
                    new_index,
                    new_section,
                    ..
                } => {
                    section_removals.push(*old_index);
                    section_insertions.push((*new_index, new_section));
                }
                SectionChange::Items { .. } => {}
            }
        }
        section_removals.sort_unstable_by(|a, b| b.cmp(a));
        section_insertions.sort_by_key(|(index, _)| *index);

        let mut item_removals = Vec::new();
        let mut item_insertions = Vec::new();
        for (old_section, _, script) in diff.item_diffs() {
            if section_removals.contains(&old_section) {
                return Err(SectionError::ConflictingSectionChange {
                    section: old_section,
                });
            }
            let removed_below = section_removals.iter().filter(|&&r| r < old_section).count();
            let surviving = old_section - removed_below;

            for op in script {
                if let Some(index) = op.old_index() {
                    item_removals.push(IndexPath::new(old_section, index));
                }
                match op {
                    EditOp::Insert { index, element }
                    | EditOp::Update {
                        new_index: index,
                        new_element: element,
                        ..
                    } => item_insertions.push((IndexPath::new(surviving, *index), element)),
                    EditOp::Remove { .. } => {}
                }
            }
        }
        item_removals.sort_unstable_by(|a, b| b.cmp(a));
        item_insertions.sort_by_key(|(path, _)| *path);

        Ok(Self {
            item_removals,
            section_removals,
            item_insertions,
            section_insertions,
        })
    }

    /// Replay the plan against section lengths only.
    fn validate(&self, target: &SectionSet<I, H, F>) -> SectionResult<()> {
        let mut lens: Vec<usize> = target.sections().iter().map(Section::len).collect();

        for pair in self.item_removals.windows(2) {
            if pair[0] == pair[1] {
                return Err(SectionError::DuplicateItemIndex {
                    section: pair[0].section,
                    index: pair[0].item,
                });
            }
        }
        for path in &self.item_removals {
            let len = *lens.get(path.section).ok_or(SectionError::SectionOutOfRange {
                index: path.section,
                len: lens.len(),
            })?;
            if path.item >= len {
                return Err(SectionError::ItemOutOfRange {
                    section: path.section,
                    index: path.item,
                    len,
                });
            }
            lens[path.section] -= 1;
        }

        for pair in self.section_removals.windows(2) {
            if pair[0] == pair[1] {
                return Err(SectionError::DuplicateSectionIndex { index: pair[0] });
            }
        }
        for &index in &self.section_removals {
            if index >= lens.len() {
                return Err(SectionError::SectionOutOfRange {
                    index,
                    len: lens.len(),
                });
            }
            lens.remove(index);
        }

        for pair in self.item_insertions.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(SectionError::DuplicateItemIndex {
                    section: pair[0].0.section,
                    index: pair[0].0.item,
                });
            }
        }
        for (path, _) in &self.item_insertions {
            let len = *lens.get(path.section).ok_or(SectionError::SectionOutOfRange {
                index: path.section,
                len: lens.len(),
            })?;
            if path.item > len {
                return Err(SectionError::ItemOutOfRange {
                    section: path.section,
                    index: path.item,
                    len,
                });
            }
            lens[path.section] += 1;
        }

        for pair in self.section_insertions.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(SectionError::DuplicateSectionIndex { index: pair[0].0 });
            }
        }
        for &(index, _) in &self.section_insertions {
            if index > lens.len() {
                return Err(SectionError::SectionOutOfRange {
                    index,
                    len: lens.len(),
                });
            }
            lens.insert(index, 0);
        }

        Ok(())
    }
}

/// Apply `diff` to `target` in place.
///
/// `target` must hold the old section set the diff was computed from; the
/// result is then the new set (minus empty sections when
/// [`ApplyOptions::compact_empty`] is set).
pub fn apply_sections<I, H, F>(
    diff: &SectionedDiff<I, H, F>,
    target: &mut SectionSet<I, H, F>,
    options: &ApplyOptions,
) -> SectionResult<()>
where
    I: Clone,
    H: Clone,
    F: Clone,
{
    let plan = SectionPlan::from_diff(diff)
        .and_then(|plan| plan.validate(target).map(|()| plan));
    let plan = match plan {
        Ok(plan) => plan,
        Err(e) => {
            warn!(error = %e, sections = target.section_count(), "sectioned diff rejected");
            return Err(e);
        }
    };

    for path in &plan.item_removals {
        target.remove_item(*path)?;
    }
    for &index in &plan.section_removals {
        target.remove_section(index)?;
    }
    for (path, item) in &plan.item_insertions {
        target.insert_item(*path, (*item).clone())?;
    }
    for (index, section) in &plan.section_insertions {
        target.insert_section(*index, (*section).clone())?;
    }

    let before_compaction = target.section_count();
    if options.compact_empty {
        target.compact();
    }

    debug!(
        items_removed = plan.item_removals.len(),
        sections_removed = plan.section_removals.len(),
        items_inserted = plan.item_insertions.len(),
        sections_inserted = plan.section_insertions.len(),
        compacted = before_compaction - target.section_count(),
        "sectioned diff applied"
    );
    Ok(())
}

impl<I: Clone, H: Clone, F: Clone> SectionSet<I, H, F> {
    /// Apply a sectioned diff in place. See [`apply_sections`].
    pub fn apply(
        &mut self,
        diff: &SectionedDiff<I, H, F>,
        options: &ApplyOptions,
    ) -> SectionResult<()> {
        apply_sections(diff, self, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{diff_sections, diff_sections_with, DisjointPolicy, SectionDiffConfig};

    type Set = SectionSet<u32, &'static str>;
    type Sec = Section<u32, &'static str>;

    fn round_trip(old: &Set, new: &Set) {
        let diff = diff_sections(old, new);
        let mut target = old.clone();
        apply_sections(&diff, &mut target, &ApplyOptions::default()).unwrap();
        assert_eq!(&target, new);
    }

    #[test]
    fn item_patch_round_trip() {
        round_trip(
            &Set::from_items(vec![vec![1, 2, 3]]),
            &Set::from_items(vec![vec![2, 3, 4]]),
        );
    }

    #[test]
    fn section_insert_round_trip() {
        round_trip(
            &Set::from_items(vec![vec![4, 5, 6]]),
            &Set::from_items(vec![vec![1, 2, 3], vec![4, 5, 6]]),
        );
    }

    #[test]
    fn mixed_levels_round_trip() {
        let old = Set::from(vec![
            Sec::new(vec![1]).with_id("gone"),
            Sec::new(vec![7, 8]).with_id("a").with_header("A"),
            Sec::new(vec![2, 5, 6]).with_id("kept"),
            Sec::new(vec![]).with_id("empty"),
        ]);
        let new = Set::from(vec![
            Sec::new(vec![0]).with_id("fresh"),
            Sec::new(vec![7, 8]).with_id("a").with_header("A"),
            Sec::new(vec![9, 2, 6, 3]).with_id("kept"),
            Sec::new(vec![4]).with_id("tail"),
        ]);
        round_trip(&old, &new);
    }

    #[test]
    fn replacement_round_trip() {
        round_trip(
            &Set::from(vec![Sec::new(vec![1, 2]).with_header("x")]),
            &Set::from(vec![Sec::new(vec![1, 2]).with_header("y")]),
        );
    }

    #[test]
    fn disjoint_replacement_round_trip() {
        let old = Set::from(vec![Sec::new(vec![1, 2]).with_id("a"), Sec::new(vec![3])]);
        let new = Set::from(vec![Sec::new(vec![5, 6, 7]).with_id("a"), Sec::new(vec![3])]);
        let config = SectionDiffConfig {
            disjoint: DisjointPolicy::Replace,
            ..Default::default()
        };
        let diff = diff_sections_with(&old, &new, &config, |a, b| a == b);
        let mut target = old.clone();
        target.apply(&diff, &ApplyOptions::default()).unwrap();
        assert_eq!(target, new);
    }

    #[test]
    fn to_and_from_empty() {
        let some = Set::from_items(vec![vec![1], vec![], vec![2, 3]]);
        round_trip(&Set::new(), &some);
        round_trip(&some, &Set::new());
        round_trip(&Set::new(), &Set::new());
    }

    #[test]
    fn compaction_drops_emptied_sections() {
        let old = Set::from(vec![
            Sec::new(vec![1, 2]).with_id("a"),
            Sec::new(vec![3]).with_id("b"),
        ]);
        let new = Set::from(vec![
            Sec::new(vec![]).with_id("a"),
            Sec::new(vec![3]).with_id("b"),
        ]);
        let diff = diff_sections(&old, &new);

        let mut kept = old.clone();
        kept.apply(&diff, &ApplyOptions::default()).unwrap();
        assert_eq!(kept, new);

        let mut compacted = old.clone();
        compacted.apply(&diff, &ApplyOptions::compacting()).unwrap();
        assert_eq!(compacted.section_count(), 1);
        assert_eq!(compacted.section(0).unwrap().items(), &[3]);
    }

    #[test]
    fn wrong_target_is_rejected_untouched() {
        let old = Set::from_items(vec![vec![1, 2, 3], vec![4]]);
        let new = Set::from_items(vec![vec![1]]);
        let diff = diff_sections(&old, &new);

        let mut target = Set::from_items(vec![vec![1]]);
        let snapshot = target.clone();
        assert!(apply_sections(&diff, &mut target, &ApplyOptions::default()).is_err());
        assert_eq!(target, snapshot);
    }

    #[test]
    fn patching_a_removed_section_conflicts() {
        let diff: SectionedDiff<u32, &'static str> = vec![
            SectionChange::RemoveSection {
                index: 0,
                section: Sec::new(vec![1]),
            },
            SectionChange::Items {
                old_section: 0,
                section: 0,
                diff: vec![EditOp::Remove { index: 0, element: 1 }].into(),
            },
        ]
        .into();
        let mut target = Set::from_items(vec![vec![1]]);
        assert_eq!(
            apply_sections(&diff, &mut target, &ApplyOptions::default()),
            Err(SectionError::ConflictingSectionChange { section: 0 })
        );
    }

    #[test]
    fn duplicate_section_removal_is_rejected() {
        let diff: SectionedDiff<u32, &'static str> = vec![
            SectionChange::RemoveSection {
                index: 0,
                section: Sec::new(vec![]),
            },
            SectionChange::RemoveSection {
                index: 0,
                section: Sec::new(vec![]),
            },
        ]
        .into();
        let mut target = Set::from_items(vec![vec![], vec![]]);
        assert_eq!(
            target.apply(&diff, &ApplyOptions::default()),
            Err(SectionError::DuplicateSectionIndex { index: 0 })
        );
        assert_eq!(target.section_count(), 2);
    }
}
