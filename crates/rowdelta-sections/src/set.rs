//! The two-level collection: an ordered list of sections addressed by
//! `(section, item)` pairs.
//!
//! # Invariants
//!
//! - A valid [`IndexPath`] has `section < section_count()` and
//!   `item < item_count(section)`.
//! - [`SectionSet::end_index`] is the sentinel `(section_count(), 0)`. It is
//!   an exclusive upper bound and is never dereferenced.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};
use crate::section::{Section, SectionId};

/// A `(section, item)` coordinate into a [`SectionSet`].
///
/// Ordered section-major, so sorting a list of paths visits sections in
/// order and items in order within each section.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, item): (usize, usize)) -> Self {
        Self { section, item }
    }
}

/// An ordered sequence of [`Section`]s.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionSet<I, H = (), F = ()> {
    sections: Vec<Section<I, H, F>>,
}

impl<I, H, F> Default for SectionSet<I, H, F> {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
        }
    }
}

impl<I, H, F> From<Vec<Section<I, H, F>>> for SectionSet<I, H, F> {
    fn from(sections: Vec<Section<I, H, F>>) -> Self {
        Self { sections }
    }
}

impl<I, H, F> FromIterator<Section<I, H, F>> for SectionSet<I, H, F> {
    fn from_iter<T: IntoIterator<Item = Section<I, H, F>>>(iter: T) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

impl<I, H, F> SectionSet<I, H, F> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set of anonymous sections from nested item lists.
    pub fn from_items(groups: impl IntoIterator<Item = Vec<I>>) -> Self {
        groups.into_iter().map(Section::new).collect()
    }

    pub fn sections(&self) -> &[Section<I, H, F>] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section<I, H, F>> {
        self.sections
    }

    // ---------------------------------------------------------------
    // Counting and addressing
    // ---------------------------------------------------------------

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of items in `section`, or `None` if there is no such section.
    pub fn item_count(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(Section::len)
    }

    /// Number of items across all sections.
    pub fn total_items(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Returns `true` if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, index: usize) -> Option<&Section<I, H, F>> {
        self.sections.get(index)
    }

    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section<I, H, F>> {
        self.sections.get_mut(index)
    }

    pub fn get(&self, path: IndexPath) -> Option<&I> {
        self.sections.get(path.section)?.get(path.item)
    }

    pub fn get_mut(&mut self, path: IndexPath) -> Option<&mut I> {
        self.sections.get_mut(path.section)?.get_mut(path.item)
    }

    /// The first position, `(0, 0)`.
    pub fn start_index(&self) -> IndexPath {
        IndexPath::new(0, 0)
    }

    /// The end sentinel, `(section_count, 0)`.
    pub fn end_index(&self) -> IndexPath {
        IndexPath::new(self.sections.len(), 0)
    }

    /// The position following `path`: the next item in the same section,
    /// or the start of the next section. Returns the end sentinel after the
    /// last section.
    pub fn index_after(&self, path: IndexPath) -> IndexPath {
        match self.sections.get(path.section) {
            Some(section) if path.item + 1 < section.len() => {
                IndexPath::new(path.section, path.item + 1)
            }
            Some(_) => IndexPath::new(path.section + 1, 0),
            None => self.end_index(),
        }
    }

    /// Iterate over every item with its position, in order. Empty sections
    /// contribute nothing.
    pub fn iter(&self) -> Iter<'_, I, H, F> {
        Iter {
            set: self,
            next: self.start_index(),
        }
    }

    /// The position of the last item in the last section, if that section
    /// has any.
    pub fn last_index_path(&self) -> Option<IndexPath> {
        let section = self.sections.len().checked_sub(1)?;
        let item = self.sections[section].len().checked_sub(1)?;
        Some(IndexPath::new(section, item))
    }

    // ---------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------

    pub fn first_index_path<P>(&self, mut predicate: P) -> Option<IndexPath>
    where
        P: FnMut(&I) -> bool,
    {
        self.iter()
            .find(|(_, item)| predicate(*item))
            .map(|(path, _)| path)
    }

    pub fn first_item<P>(&self, predicate: P) -> Option<&I>
    where
        P: FnMut(&I) -> bool,
    {
        let path = self.first_index_path(predicate)?;
        self.get(path)
    }

    pub fn first_section_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&Section<I, H, F>) -> bool,
    {
        self.sections.iter().position(predicate)
    }

    pub fn first_section_index_by_id(&self, id: &SectionId) -> Option<usize> {
        self.first_section_index(|s| s.id() == Some(id))
    }

    pub fn first_section<P>(&self, mut predicate: P) -> Option<&Section<I, H, F>>
    where
        P: FnMut(&Section<I, H, F>) -> bool,
    {
        self.sections.iter().find(|s| predicate(*s))
    }

    pub fn section_by_id(&self, id: &SectionId) -> Option<&Section<I, H, F>> {
        self.first_section(|s| s.id() == Some(id))
    }

    // ---------------------------------------------------------------
    // Reordering
    // ---------------------------------------------------------------

    pub fn sort_sections<C>(&mut self, compare: C)
    where
        C: FnMut(&Section<I, H, F>, &Section<I, H, F>) -> Ordering,
    {
        self.sections.sort_by(compare);
    }

    /// Drop every section that has no items.
    pub fn compact(&mut self) {
        self.sections.retain(|s| !s.is_empty());
    }

    // ---------------------------------------------------------------
    // Insertion
    // ---------------------------------------------------------------

    pub fn insert_section(&mut self, index: usize, section: Section<I, H, F>) -> SectionResult<()> {
        if index > self.sections.len() {
            return Err(SectionError::SectionOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        self.sections.insert(index, section);
        Ok(())
    }

    /// Insert `item` at `path`. Inserting at the end sentinel
    /// `(section_count, 0)` first appends an empty anonymous section.
    pub fn insert_item(&mut self, path: IndexPath, item: I) -> SectionResult<()> {
        if path.section == self.sections.len() && path.item == 0 {
            self.sections.push(Section::default());
        }
        let len = self.sections.len();
        let section = self
            .sections
            .get_mut(path.section)
            .ok_or(SectionError::SectionOutOfRange {
                index: path.section,
                len,
            })?;
        section.insert(path.item, item).map_err(|_| SectionError::ItemOutOfRange {
            section: path.section,
            index: path.item,
            len: section.len(),
        })
    }

    pub fn append_section(&mut self, section: Section<I, H, F>) {
        self.sections.push(section);
    }

    pub fn append_item_to(&mut self, section: usize, item: I) -> SectionResult<()> {
        let len = self.sections.len();
        self.sections
            .get_mut(section)
            .ok_or(SectionError::SectionOutOfRange {
                index: section,
                len,
            })?
            .push(item);
        Ok(())
    }

    /// Append `item` to the last section.
    pub fn append_item(&mut self, item: I) -> SectionResult<()> {
        self.sections
            .last_mut()
            .ok_or(SectionError::NoSections)?
            .push(item);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------

    pub fn remove_section(&mut self, index: usize) -> SectionResult<Section<I, H, F>> {
        if index >= self.sections.len() {
            return Err(SectionError::SectionOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        Ok(self.sections.remove(index))
    }

    pub fn remove_item(&mut self, path: IndexPath) -> SectionResult<I> {
        let len = self.sections.len();
        let section = self
            .sections
            .get_mut(path.section)
            .ok_or(SectionError::SectionOutOfRange {
                index: path.section,
                len,
            })?;
        let item_len = section.len();
        section.remove(path.item).ok_or(SectionError::ItemOutOfRange {
            section: path.section,
            index: path.item,
            len: item_len,
        })
    }

    /// Remove the first item matching `predicate`, returning it.
    pub fn remove_first<P>(&mut self, predicate: P) -> Option<I>
    where
        P: FnMut(&I) -> bool,
    {
        let path = self.first_index_path(predicate)?;
        self.sections[path.section].remove(path.item)
    }

    /// Remove every item matching `predicate`. Sections are kept even when
    /// they end up empty.
    pub fn remove_all<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&I) -> bool,
    {
        for section in &mut self.sections {
            section.items_mut().retain(|item| !predicate(item));
        }
    }
}

impl<'a, I, H, F> IntoIterator for &'a SectionSet<I, H, F> {
    type Item = (IndexPath, &'a I);
    type IntoIter = Iter<'a, I, H, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the items of a [`SectionSet`] with their positions.
#[derive(Clone, Debug)]
pub struct Iter<'a, I, H, F> {
    set: &'a SectionSet<I, H, F>,
    next: IndexPath,
}

impl<'a, I, H, F> Iterator for Iter<'a, I, H, F> {
    type Item = (IndexPath, &'a I);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.set.end_index() {
            let path = self.next;
            self.next = self.set.index_after(path);
            if let Some(item) = self.set.get(path) {
                return Some((path, item));
            }
        }
        None
    }
}
