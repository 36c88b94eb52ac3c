// =============================================================================
// Iterator Implementation
// =============================================================================
//
// Both iterators snapshot the visiting order when created. They borrow the
// tree, so the tree cannot change underneath them, and cloning one restarts
// nothing: `tree.traverse(order)` can simply be called again.

/// An in-order iterator over the entries of a tree.
///
/// Created by the `iter` method of each tree type.
#[derive(Clone, Debug)]
pub struct Iter<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    current_index: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) const fn new(entries: Vec<(&'a K, &'a V)>) -> Self {
        Self {
            entries,
            current_index: 0,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.current_index).copied();
        if entry.is_some() {
            self.current_index += 1;
        }
        entry
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.entries.len().saturating_sub(self.current_index)
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.entries.len() {
            None
        } else {
            self.entries.pop()
        }
    }
}

/// An iterator over the values of a tree in a chosen
/// [`TraversalOrder`](super::TraversalOrder).
///
/// Created by the `traverse` method of each tree type.
#[derive(Clone, Debug)]
pub struct Traverse<'a, K, V> {
    entries: Iter<'a, K, V>,
}

impl<'a, K, V> Traverse<'a, K, V> {
    pub(crate) const fn new(entries: Vec<(&'a K, &'a V)>) -> Self {
        Self {
            entries: Iter::new(entries),
        }
    }

    /// Keeps the keys alongside the values.
    pub fn with_keys(self) -> Iter<'a, K, V> {
        self.entries
    }
}

impl<'a, K, V> Iterator for Traverse<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Traverse<'_, K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}
