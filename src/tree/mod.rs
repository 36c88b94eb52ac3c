//! Ordered maps backed by binary search trees.
//!
//! This module provides three ordered maps with one shared surface:
//!
//! - [`BinarySearchTree`]: unbalanced; O(n) worst case
//! - [`AvlTree`]: height-balanced; O(log n) worst case
//! - [`RedBlackTree`]: color-balanced; O(log n) worst case
//!
//! # Shared Design
//!
//! All variants store their nodes in one index-based arena per tree, with
//! `parent` links as plain indices. Structural primitives (search,
//! placement, transplant, rotation, traversal) are free functions in a
//! private `bst` module; each balanced variant composes them with its own
//! fixup pass instead of inheriting from the plain tree.
//!
//! # Examples
//!
//! ```rust
//! use ordered_trees::{AvlTree, RedBlackTree, SearchTree, TraversalOrder};
//!
//! fn fill<T: SearchTree<i32, i32> + Default>() -> T {
//!     let mut tree = T::default();
//!     for key in [2, 3, 7, 1, 9, 0, 8, 6] {
//!         tree.insert(key, key);
//!     }
//!     tree
//! }
//!
//! let avl: AvlTree<i32, i32> = fill();
//! let red_black: RedBlackTree<i32, i32> = fill();
//!
//! assert_eq!(avl.to_string(), "0 | 1 | 2 | 3 | 6 | 7 | 8 | 9");
//! assert_eq!(avl.to_string(), red_black.to_string());
//!
//! let post_order: Vec<&i32> = avl.traverse(TraversalOrder::PostOrder).collect();
//! assert_eq!(post_order.len(), 8);
//! ```

mod arena;
mod avl_tree;
mod binary_search_tree;
mod bst;
mod invariant;
mod iter;
mod raw;
mod red_black_tree;

pub use avl_tree::AvlTree;
pub use binary_search_tree::BinarySearchTree;
pub use invariant::InvariantViolation;
pub use iter::{Iter, Traverse};
pub use red_black_tree::{Color, RedBlackTree};

// =============================================================================
// TraversalOrder
// =============================================================================

/// The order in which `traverse` visits nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, node, right subtree: ascending key order.
    #[default]
    InOrder,
    /// Left subtree, right subtree, then node.
    PostOrder,
}

/// Separator placed between values by the `Display` implementations.
pub const DISPLAY_SEPARATOR: &str = " | ";

// =============================================================================
// SearchTree
// =============================================================================

/// The surface shared by every tree variant.
///
/// Missing keys are never errors: lookups return `None`, and removing an
/// absent key does nothing.
pub trait SearchTree<K, V> {
    /// Inserts `key`, or replaces the value if an equal key is present.
    fn insert(&mut self, key: K, value: V) -> &mut Self;

    /// Removes `key` if present.
    fn remove(&mut self, key: &K) -> &mut Self;

    /// Removes `key` and returns its value, or `None` if it was absent.
    fn take(&mut self, key: &K) -> Option<V>;

    /// Returns the value stored under `key`.
    fn get(&self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` is present.
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Value of the smallest key.
    fn min(&self) -> Option<&V>;

    /// Value of the largest key.
    fn max(&self) -> Option<&V>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the tree holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    fn clear(&mut self);

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    fn height(&self) -> usize;

    /// Values in the requested order.
    fn traverse(&self, order: TraversalOrder) -> Traverse<'_, K, V>;

    /// Checks every structural invariant of the variant.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    fn validate(&self) -> Result<(), InvariantViolation>;
}

// =============================================================================
// Shared Implementation
// =============================================================================

/// Implements the variant-independent surface of a tree type.
///
/// The type must be a struct `$tree<K, V, C>` with a `raw: RawTree<K, V, _, C>`
/// field and inherent `insert`, `take` and `validate` methods.
macro_rules! impl_search_tree {
    ($tree:ident) => {
        impl<K: Ord, V> $tree<K, V> {
            /// Creates an empty tree ordered by `K`'s [`Ord`] implementation.
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self::with_comparer($crate::comparer::NaturalOrder)
            }
        }

        impl<K, V, C> $tree<K, V, C> {
            /// Returns the number of entries.
            ///
            /// # Complexity
            ///
            /// O(1)
            #[inline]
            #[must_use]
            pub const fn len(&self) -> usize {
                self.raw.len()
            }

            /// Returns `true` if the tree holds no entries.
            #[inline]
            #[must_use]
            pub const fn is_empty(&self) -> bool {
                self.raw.len() == 0
            }

            /// Removes every entry, keeping the comparer.
            pub fn clear(&mut self) {
                self.raw.clear();
            }

            /// Value of the smallest key, or `None` when empty.
            #[must_use]
            pub fn min(&self) -> Option<&V> {
                self.raw.min_entry().map(|(_, value)| value)
            }

            /// Value of the largest key, or `None` when empty.
            #[must_use]
            pub fn max(&self) -> Option<&V> {
                self.raw.max_entry().map(|(_, value)| value)
            }

            /// Smallest key and its value.
            #[must_use]
            pub fn min_entry(&self) -> Option<(&K, &V)> {
                self.raw.min_entry()
            }

            /// Largest key and its value.
            #[must_use]
            pub fn max_entry(&self) -> Option<(&K, &V)> {
                self.raw.max_entry()
            }

            /// The entry stored at the root node.
            #[must_use]
            pub fn root_entry(&self) -> Option<(&K, &V)> {
                self.raw.root_entry()
            }

            /// Number of nodes on the longest root-to-leaf path; 0 when empty.
            ///
            /// # Complexity
            ///
            /// O(n)
            #[must_use]
            pub fn height(&self) -> usize {
                self.raw.height()
            }

            /// Entries in ascending key order.
            pub fn iter(&self) -> $crate::tree::Iter<'_, K, V> {
                self.raw.iter()
            }

            /// Keys in ascending order.
            pub fn keys(&self) -> impl Iterator<Item = &K> {
                self.iter().map(|(key, _)| key)
            }

            /// Values in ascending key order.
            pub fn values(&self) -> impl Iterator<Item = &V> {
                self.iter().map(|(_, value)| value)
            }

            /// Values in the requested order.
            ///
            /// The returned iterator is a snapshot; call again to restart.
            pub fn traverse(
                &self,
                order: $crate::tree::TraversalOrder,
            ) -> $crate::tree::Traverse<'_, K, V> {
                self.raw.traverse(order)
            }
        }

        impl<K, V, C: $crate::comparer::Comparer<K>> $tree<K, V, C> {
            /// Returns the value stored under `key`.
            ///
            /// # Complexity
            ///
            /// O(height)
            #[must_use]
            pub fn get(&self, key: &K) -> Option<&V> {
                self.raw.get(key)
            }

            /// Returns a mutable reference to the value stored under `key`.
            pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
                self.raw.get_mut(key)
            }

            /// Returns `true` if `key` is present.
            #[must_use]
            pub fn contains_key(&self, key: &K) -> bool {
                !self.raw.find(key).is_nil()
            }

            /// Removes `key` if present; removing an absent key does nothing.
            pub fn remove(&mut self, key: &K) -> &mut Self {
                self.take(key);
                self
            }
        }

        impl<K, V, C: Default> Default for $tree<K, V, C> {
            fn default() -> Self {
                Self {
                    raw: $crate::tree::raw::RawTree::new(C::default()),
                }
            }
        }

        impl<K, V, C> FromIterator<(K, V)> for $tree<K, V, C>
        where
            C: $crate::comparer::Comparer<K> + Default,
        {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut tree = Self::default();
                tree.extend(iter);
                tree
            }
        }

        impl<K, V, C: $crate::comparer::Comparer<K>> Extend<(K, V)> for $tree<K, V, C> {
            fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                for (key, value) in iter {
                    self.insert(key, value);
                }
            }
        }

        impl<'a, K, V, C> IntoIterator for &'a $tree<K, V, C> {
            type Item = (&'a K, &'a V);
            type IntoIter = $crate::tree::Iter<'a, K, V>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<K: PartialEq, V: PartialEq, C> PartialEq for $tree<K, V, C> {
            fn eq(&self, other: &Self) -> bool {
                self.len() == other.len() && self.iter().eq(other.iter())
            }
        }

        impl<K: Eq, V: Eq, C> Eq for $tree<K, V, C> {}

        impl<K: std::fmt::Debug, V: std::fmt::Debug, C> std::fmt::Debug for $tree<K, V, C> {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.debug_map().entries(self.iter()).finish()
            }
        }

        /// Renders values in ascending key order joined by `" | "`; an empty
        /// tree renders as the empty string.
        impl<K, V: std::fmt::Display, C> std::fmt::Display for $tree<K, V, C> {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut first = true;
                for value in self.values() {
                    if first {
                        first = false;
                    } else {
                        formatter.write_str($crate::tree::DISPLAY_SEPARATOR)?;
                    }
                    write!(formatter, "{value}")?;
                }
                Ok(())
            }
        }

        impl<K, V, C: $crate::comparer::Comparer<K>> $crate::tree::SearchTree<K, V>
            for $tree<K, V, C>
        {
            fn insert(&mut self, key: K, value: V) -> &mut Self {
                Self::insert(self, key, value)
            }

            fn remove(&mut self, key: &K) -> &mut Self {
                Self::remove(self, key)
            }

            fn take(&mut self, key: &K) -> Option<V> {
                Self::take(self, key)
            }

            fn get(&self, key: &K) -> Option<&V> {
                Self::get(self, key)
            }

            fn contains_key(&self, key: &K) -> bool {
                Self::contains_key(self, key)
            }

            fn min(&self) -> Option<&V> {
                Self::min(self)
            }

            fn max(&self) -> Option<&V> {
                Self::max(self)
            }

            fn len(&self) -> usize {
                Self::len(self)
            }

            fn clear(&mut self) {
                Self::clear(self);
            }

            fn height(&self) -> usize {
                Self::height(self)
            }

            fn traverse(
                &self,
                order: $crate::tree::TraversalOrder,
            ) -> $crate::tree::Traverse<'_, K, V> {
                Self::traverse(self, order)
            }

            fn validate(&self) -> Result<(), $crate::tree::InvariantViolation> {
                Self::validate(self)
            }
        }
    };
}

pub(crate) use impl_search_tree;
