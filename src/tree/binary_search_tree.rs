//! Unbalanced ordered map.
//!
//! [`BinarySearchTree`] places keys exactly where a plain search lands them
//! and never rotates. Operations cost O(height): O(log n) for random input,
//! O(n) once keys arrive in sorted order.

use super::bst;
use super::invariant::InvariantViolation;
use super::raw::RawTree;
use crate::comparer::{Comparer, NaturalOrder};
use crate::log::tree_debug;

/// An ordered map without any balancing.
///
/// # Examples
///
/// ```rust
/// use ordered_trees::BinarySearchTree;
///
/// let mut tree = BinarySearchTree::new();
/// for key in 1..=5 {
///     tree.insert(key, key * 10);
/// }
///
/// // Sorted input degenerates into a chain.
/// assert_eq!(tree.height(), 5);
/// assert_eq!(tree.max(), Some(&50));
/// ```
#[derive(Clone)]
pub struct BinarySearchTree<K, V, C = NaturalOrder> {
    raw: RawTree<K, V, (), C>,
}

super::impl_search_tree!(BinarySearchTree);

impl<K, V, C> BinarySearchTree<K, V, C> {
    /// Creates an empty tree ordered by `comparer`.
    #[inline]
    #[must_use]
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            raw: RawTree::new(comparer),
        }
    }
}

impl<K, V, C: Comparer<K>> BinarySearchTree<K, V, C> {
    /// Inserts a key-value pair, replacing the value of an equal key.
    pub fn insert(&mut self, key: K, value: V) -> &mut Self {
        self.raw.insert_leaf(key, value, ());
        self
    }

    /// Removes `key` and returns its value, or `None` if it was absent.
    ///
    /// A node with two children is replaced by its in-order successor.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let node = self.raw.find(key);
        if node.is_nil() {
            return None;
        }

        bst::splice_out(&mut self.raw.arena, &mut self.raw.root, node);
        tree_debug!(?node, "spliced out");

        let (_, value) = self.raw.arena.release(node, &mut self.raw.root);
        Some(value)
    }

    /// Checks ordering and links.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.raw.validate_structure()
    }
}

static_assertions::assert_impl_all!(BinarySearchTree<i32, String>: Send, Sync, Clone);
