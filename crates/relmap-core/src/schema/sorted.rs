use std::{cmp::Ordering, fmt};

/// A set of arena ids kept ordered by a caller supplied comparator.
///
/// The comparator is not stored: it usually needs the whole schema to look
/// up the entities behind the ids, so every mutation takes it as an argument.
/// Two ids for which the comparator returns `Equal` are the same element.
#[derive(Clone, PartialEq, Eq)]
pub struct SortedIds<I> {
    ids: Vec<I>,
}

impl<I: Copy + PartialEq> SortedIds<I> {
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    pub fn as_slice(&self) -> &[I] {
        &self.ids
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = I> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn first(&self) -> Option<I> {
        self.ids.first().copied()
    }

    /// Membership by id, independent of the ordering.
    pub fn contains(&self, id: I) -> bool {
        self.ids.contains(&id)
    }

    /// Inserts `id` at its ordered position. Returns `false` if an equal
    /// element is already present.
    pub fn insert_by(&mut self, id: I, mut cmp: impl FnMut(I, I) -> Ordering) -> bool {
        let pos = self
            .ids
            .partition_point(|probe| cmp(*probe, id) == Ordering::Less);

        if pos < self.ids.len() && cmp(self.ids[pos], id) == Ordering::Equal {
            return false;
        }

        self.ids.insert(pos, id);
        true
    }

    /// Removes the element equal to `id`.
    ///
    /// The comparator must order the elements the same way it did when they
    /// were inserted; re-keying an element means removing it before its sort
    /// key changes.
    pub fn remove_by(&mut self, id: I, cmp: impl FnMut(I, I) -> Ordering) -> bool {
        match self.position_by(id, cmp) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn position_by(&self, id: I, mut cmp: impl FnMut(I, I) -> Ordering) -> Option<usize> {
        let pos = self
            .ids
            .partition_point(|probe| cmp(*probe, id) == Ordering::Less);

        (pos < self.ids.len() && cmp(self.ids[pos], id) == Ordering::Equal).then_some(pos)
    }
}

impl<I: Copy + PartialEq> Default for SortedIds<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: fmt::Debug> fmt::Debug for SortedIds<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(&self.ids).finish()
    }
}

impl<'a, I: Copy + PartialEq> IntoIterator for &'a SortedIds<I> {
    type Item = I;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}
