//! Two-level diff over section sets.
//!
//! The section lists are diffed first, with structural [`Section`] equality
//! as the equivalence. Each section-level `Update` then pairs an old section
//! with the new section occupying the same slot:
//!
//! - same id, header and footer: the region survived and only its items
//!   changed, so the items are diffed with the caller's equivalence and
//!   reported as [`SectionChange::Items`];
//! - anything else: the section is a different entity and is replaced
//!   wholesale with [`SectionChange::UpdateSection`].

use std::convert::Infallible;

use rowdelta_diff::{DiffConfig, EditOp, EditScript};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::section::Section;
use crate::set::SectionSet;

/// How to report a surviving section whose items share nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisjointPolicy {
    /// Always report an item-level diff.
    #[default]
    Items,
    /// When both sections have items and the item diff keeps none of them,
    /// report `RemoveSection` + `InsertSection` instead.
    Replace,
}

/// Configuration for the sectioned diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionDiffConfig {
    /// Item-level diff configuration.
    pub items: DiffConfig,
    /// Treatment of surviving sections with fully disjoint contents.
    pub disjoint: DisjointPolicy,
}

/// One entry of a [`SectionedDiff`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionChange<I, H = (), F = ()> {
    /// `section` appears at `index` in the new set.
    InsertSection { index: usize, section: Section<I, H, F> },
    /// `section` at `index` in the old set is gone.
    RemoveSection { index: usize, section: Section<I, H, F> },
    /// The old section was replaced by an unrelated one.
    UpdateSection {
        old_index: usize,
        old_section: Section<I, H, F>,
        new_index: usize,
        new_section: Section<I, H, F>,
    },
    /// The section at `old_section` in the old set survives at `section` in
    /// the new set with the same id, header and footer; `diff` edits its
    /// items.
    Items {
        old_section: usize,
        section: usize,
        diff: EditScript<I>,
    },
}

/// The ordered result of diffing two section sets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionedDiff<I, H = (), F = ()> {
    changes: Vec<SectionChange<I, H, F>>,
}

impl<I, H, F> Default for SectionedDiff<I, H, F> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<I, H, F> From<Vec<SectionChange<I, H, F>>> for SectionedDiff<I, H, F> {
    fn from(changes: Vec<SectionChange<I, H, F>>) -> Self {
        Self { changes }
    }
}

impl<I, H, F> SectionedDiff<I, H, F> {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn push(&mut self, change: SectionChange<I, H, F>) {
        self.changes.push(change);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionChange<I, H, F>> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[SectionChange<I, H, F>] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<SectionChange<I, H, F>> {
        self.changes
    }

    /// Number of inserted sections.
    pub fn section_insert_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, SectionChange::InsertSection { .. }))
            .count()
    }

    /// Number of removed sections.
    pub fn section_remove_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, SectionChange::RemoveSection { .. }))
            .count()
    }

    /// Number of wholesale section replacements.
    pub fn section_update_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, SectionChange::UpdateSection { .. }))
            .count()
    }

    /// The item-level scripts with their old and new section indices.
    pub fn item_diffs(&self) -> impl Iterator<Item = (usize, usize, &EditScript<I>)> {
        self.changes.iter().filter_map(|c| match c {
            SectionChange::Items {
                old_section,
                section,
                diff,
            } => Some((*old_section, *section, diff)),
            _ => None,
        })
    }
}

impl<I, H, F> IntoIterator for SectionedDiff<I, H, F> {
    type Item = SectionChange<I, H, F>;
    type IntoIter = std::vec::IntoIter<SectionChange<I, H, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a, I, H, F> IntoIterator for &'a SectionedDiff<I, H, F> {
    type Item = &'a SectionChange<I, H, F>;
    type IntoIter = std::slice::Iter<'a, SectionChange<I, H, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Diff two section sets, comparing items with `PartialEq`.
pub fn diff_sections<I, H, F>(
    old: &SectionSet<I, H, F>,
    new: &SectionSet<I, H, F>,
) -> SectionedDiff<I, H, F>
where
    I: Clone + PartialEq,
    H: Clone + PartialEq,
    F: Clone + PartialEq,
{
    diff_sections_by(old, new, |a, b| a == b)
}

/// Diff two section sets with a caller-supplied item equivalence.
pub fn diff_sections_by<I, H, F, P>(
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
    diff_sections_with(old, new, &SectionDiffConfig::default(), equivalent)
}

/// Diff two section sets with a fallible item equivalence.
pub fn try_diff_sections_by<I, H, F, E, P>(
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
    try_diff_sections_with(old, new, &SectionDiffConfig::default(), equivalent)
}

/// Diff two section sets under an explicit configuration.
pub fn diff_sections_with<I, H, F, P>(
    old: &SectionSet<I, H, F>,
    new: &SectionSet<I, H, F>,
    config: &SectionDiffConfig,
    mut equivalent: P,
) -> SectionedDiff<I, H, F>
where
    I: Clone + PartialEq,
    H: Clone + PartialEq,
    F: Clone + PartialEq,
    P: FnMut(&I, &I) -> bool,
{
    match try_diff_sections_with(old, new, config, |a, b| {
        Ok::<_, Infallible>(equivalent(a, b))
    }) {
        Ok(diff) => diff,
        Err(never) => match never {},
    }
}

/// Diff two section sets under an explicit configuration with a fallible
/// item equivalence. The first predicate error aborts the whole diff.
pub fn try_diff_sections_with<I, H, F, E, P>(
    old: &SectionSet<I, H, F>,
    new: &SectionSet<I, H, F>,
    config: &SectionDiffConfig,
    mut equivalent: P,
) -> Result<SectionedDiff<I, H, F>, E>
where
    I: Clone + PartialEq,
    H: Clone + PartialEq,
    F: Clone + PartialEq,
    P: FnMut(&I, &I) -> Result<bool, E>,
{
    // The section level always pairs replacements: an `Update` is what lets
    // a surviving section recurse into its items.
    let outer = rowdelta_diff::diff_with(
        old.sections(),
        new.sections(),
        &DiffConfig::default(),
        |a, b| a == b,
    );

    let mut result = SectionedDiff::new();
    for op in outer {
        match op {
            EditOp::Insert { index, element } => {
                result.push(SectionChange::InsertSection {
                    index,
                    section: element,
                });
            }
            EditOp::Remove { index, element } => {
                result.push(SectionChange::RemoveSection {
                    index,
                    section: element,
                });
            }
            EditOp::Update {
                old_index,
                old_element,
                new_index,
                new_element,
            } if old_element.same_region(&new_element) => {
                let items =
                    old_element.try_diff_with(&new_element, &config.items, &mut equivalent)?;
                let disjoint = !old_element.is_empty()
                    && !new_element.is_empty()
                    && items.kept_count(old_element.len()) == 0;

                if disjoint && config.disjoint == DisjointPolicy::Replace {
                    trace!(old_index, new_index, "disjoint section contents replaced");
                    result.push(SectionChange::RemoveSection {
                        index: old_index,
                        section: old_element,
                    });
                    result.push(SectionChange::InsertSection {
                        index: new_index,
                        section: new_element,
                    });
                } else {
                    trace!(old_index, new_index, ops = items.len(), "section items diffed");
                    result.push(SectionChange::Items {
                        old_section: old_index,
                        section: new_index,
                        diff: items,
                    });
                }
            }
            EditOp::Update {
                old_index,
                old_element,
                new_index,
                new_element,
            } => {
                trace!(old_index, new_index, "section replaced");
                result.push(SectionChange::UpdateSection {
                    old_index,
                    old_section: old_element,
                    new_index,
                    new_section: new_element,
                });
            }
        }
    }

    debug!(
        old_sections = old.section_count(),
        new_sections = new.section_count(),
        inserted = result.section_insert_count(),
        removed = result.section_remove_count(),
        replaced = result.section_update_count(),
        patched = result.item_diffs().count(),
        "sectioned diff computed"
    );

    Ok(result)
}
