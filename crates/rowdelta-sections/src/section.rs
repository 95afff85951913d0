//! A section: an identified, ordered run of items with optional header and
//! footer.
//!
//! Item-level diffing and patching delegate to `rowdelta-diff`; everything
//! else is thin plumbing over the underlying `Vec`.

use std::cmp::Ordering;
use std::fmt;

use rowdelta_diff::{DiffConfig, DiffError, DiffResult, EditScript, MutableSequence};
use serde::{Deserialize, Serialize};

/// Stable identity of a section across versions.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Create an identity from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for SectionId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// An ordered run of items with optional identity, header and footer.
///
/// Equality is structural: same id, same items, same header, same footer.
/// A section with no items is valid; [`SectionSet::compact`] drops such
/// sections.
///
/// [`SectionSet::compact`]: crate::SectionSet::compact
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section<I, H = (), F = ()> {
    id: Option<SectionId>,
    items: Vec<I>,
    header: Option<H>,
    footer: Option<F>,
}

impl<I, H, F> Default for Section<I, H, F> {
    fn default() -> Self {
        Self {
            id: None,
            items: Vec::new(),
            header: None,
            footer: None,
        }
    }
}

impl<I, H, F> From<Vec<I>> for Section<I, H, F> {
    fn from(items: Vec<I>) -> Self {
        Self::new(items)
    }
}

impl<I, H, F> Section<I, H, F> {
    /// Create an anonymous section with no header or footer.
    pub fn new(items: Vec<I>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Set the section's identity.
    pub fn with_id(mut self, id: impl Into<SectionId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the section's header.
    pub fn with_header(mut self, header: H) -> Self {
        self.header = Some(header);
        self
    }

    /// Set the section's footer.
    pub fn with_footer(mut self, footer: F) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn id(&self) -> Option<&SectionId> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: Option<SectionId>) {
        self.id = id;
    }

    pub fn header(&self) -> Option<&H> {
        self.header.as_ref()
    }

    pub fn set_header(&mut self, header: Option<H>) {
        self.header = header;
    }

    pub fn footer(&self) -> Option<&F> {
        self.footer.as_ref()
    }

    pub fn set_footer(&mut self, footer: Option<F>) {
        self.footer = footer;
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<I> {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<I> {
        self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the section holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut I> {
        self.items.get_mut(index)
    }

    pub fn push(&mut self, item: I) {
        self.items.push(item);
    }

    /// Insert `item` at `index`, shifting later items right.
    pub fn insert(&mut self, index: usize, item: I) -> DiffResult<()> {
        if index > self.items.len() {
            return Err(DiffError::InsertOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item);
        Ok(())
    }

    /// Remove and return the item at `index`.
    pub fn remove(&mut self, index: usize) -> Option<I> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Index of the first item matching `predicate`.
    pub fn first_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&I) -> bool,
    {
        self.items.iter().position(predicate)
    }

    pub fn sort_by<C>(&mut self, compare: C)
    where
        C: FnMut(&I, &I) -> Ordering,
    {
        self.items.sort_by(compare);
    }

    /// Returns `true` when `self` and `other` are the same logical region:
    /// same identity, header and footer. Items may differ.
    pub fn same_region(&self, other: &Self) -> bool
    where
        H: PartialEq,
        F: PartialEq,
    {
        self.id == other.id && self.header == other.header && self.footer == other.footer
    }
}

impl<I: Clone, H, F> Section<I, H, F> {
    /// Item-level diff from `self` to `other` using `PartialEq`.
    pub fn diff(&self, other: &Self) -> EditScript<I>
    where
        I: PartialEq,
    {
        rowdelta_diff::diff(&self.items, &other.items)
    }

    /// Item-level diff from `self` to `other` with a caller-supplied
    /// equivalence.
    pub fn diff_by<P>(&self, other: &Self, equivalent: P) -> EditScript<I>
    where
        P: FnMut(&I, &I) -> bool,
    {
        rowdelta_diff::diff_by(&self.items, &other.items, equivalent)
    }

    /// Item-level diff with a fallible equivalence.
    pub fn try_diff_by<E, P>(&self, other: &Self, equivalent: P) -> Result<EditScript<I>, E>
    where
        P: FnMut(&I, &I) -> Result<bool, E>,
    {
        rowdelta_diff::try_diff_by(&self.items, &other.items, equivalent)
    }

    pub(crate) fn try_diff_with<E, P>(
        &self,
        other: &Self,
        config: &DiffConfig,
        equivalent: P,
    ) -> Result<EditScript<I>, E>
    where
        P: FnMut(&I, &I) -> Result<bool, E>,
    {
        rowdelta_diff::try_diff_with(&self.items, &other.items, config, equivalent)
    }

    /// Apply an item-level script to this section's items in place.
    pub fn apply(&mut self, script: &EditScript<I>) -> DiffResult<()> {
        rowdelta_diff::apply(script, &mut self.items)
    }
}

impl<I, H, F> MutableSequence<I> for Section<I, H, F> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn insert_at(&mut self, index: usize, element: I) {
        self.items.insert(index, element);
    }

    fn remove_at(&mut self, index: usize) -> Option<I> {
        self.remove(index)
    }
}
