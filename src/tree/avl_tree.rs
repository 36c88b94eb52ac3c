//! Height-balanced ordered map.
//!
//! This module provides [`AvlTree`], an ordered map that keeps
//! `|height(left) - height(right)| <= 1` at every node.
//!
//! # Overview
//!
//! - O(log N) get
//! - O(log N) insert
//! - O(log N) remove
//! - O(log N) min/max
//! - O(1) len and `is_empty`
//!
//! # Internal Structure
//!
//! Each node stores its balance factor, `height(left) - height(right)`, as an
//! `i8`. A settled tree only holds -1, 0 or 1; ±2 appears transiently inside
//! a fixup pass and is rotated away before the pass ends.
//!
//! Insertion walks up from the new leaf adjusting factors and stops at the
//! first node whose factor becomes 0 or that needs a rotation. Deletion walks
//! up from the node that lost a child and keeps going as long as the subtree
//! it just fixed got shorter, which may rotate at every level.
//!
//! # Examples
//!
//! ```rust
//! use ordered_trees::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! tree.insert(1, "one").insert(3, "three").insert(5, "five");
//!
//! // The right-leaning chain was rotated: 3 is the root.
//! assert_eq!(tree.root_entry(), Some((&3, &"three")));
//! assert_eq!(tree.height(), 2);
//! ```

use super::arena::{NodeId, Side};
use super::bst;
use super::invariant::{self, InvariantViolation};
use super::raw::RawTree;
use crate::comparer::{Comparer, NaturalOrder};
use crate::log::{tree_debug, tree_trace};

/// Balance factor: `height(left) - height(right)`.
type BalanceFactor = i8;

/// Factor change at a parent when the subtree on `side` grows by one.
const fn growth(side: Side) -> BalanceFactor {
    match side {
        Side::Left => 1,
        Side::Right => -1,
    }
}

// =============================================================================
// AvlTree Definition
// =============================================================================

/// An ordered map balanced by subtree height.
///
/// Keys are ordered by the comparer `C`, [`NaturalOrder`] by default.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `get`          | O(log N)   |
/// | `insert`       | O(log N)   |
/// | `remove`       | O(log N)   |
/// | `min`/`max`    | O(log N)   |
/// | `len`          | O(1)       |
/// | `clone`        | O(N)       |
///
/// # Examples
///
/// ```rust
/// use ordered_trees::AvlTree;
///
/// let mut tree: AvlTree<i32, i32> = [2, 3, 7, 1, 9, 0, 8, 6]
///     .into_iter()
///     .map(|key| (key, key))
///     .collect();
/// assert_eq!(tree.to_string(), "0 | 1 | 2 | 3 | 6 | 7 | 8 | 9");
///
/// tree.remove(&6).remove(&9);
/// assert_eq!(tree.to_string(), "0 | 1 | 2 | 3 | 7 | 8");
/// assert_eq!(tree.len(), 6);
/// ```
#[derive(Clone)]
pub struct AvlTree<K, V, C = NaturalOrder> {
    raw: RawTree<K, V, BalanceFactor, C>,
}

super::impl_search_tree!(AvlTree);

impl<K, V, C> AvlTree<K, V, C> {
    /// Creates an empty tree ordered by `comparer`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_trees::AvlTree;
    ///
    /// let mut by_length = AvlTree::with_comparer(|left: &&str, right: &&str| {
    ///     left.len().cmp(&right.len())
    /// });
    /// by_length.insert("ccc", 3).insert("a", 1).insert("bb", 2);
    ///
    /// let keys: Vec<&&str> = by_length.keys().collect();
    /// assert_eq!(keys, vec![&"a", &"bb", &"ccc"]);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            raw: RawTree::new(comparer),
        }
    }

    /// Balance factor of the root node, `height(left) - height(right)`.
    #[must_use]
    pub fn root_balance(&self) -> Option<i8> {
        (!self.raw.root.is_nil()).then(|| self.raw.arena.meta(self.raw.root))
    }
}

impl<K, V, C: Comparer<K>> AvlTree<K, V, C> {
    /// Inserts a key-value pair.
    ///
    /// If an equal key is present its value is replaced in place and the
    /// shape of the tree does not change.
    ///
    /// # Complexity
    ///
    /// O(log N)
    pub fn insert(&mut self, key: K, value: V) -> &mut Self {
        if let Some(leaf) = self.raw.insert_leaf(key, value, 0) {
            self.rebalance_after_insert(leaf);
        }
        self
    }

    /// Removes `key` and returns its value, or `None` if it was absent.
    ///
    /// # Complexity
    ///
    /// O(log N)
    pub fn take(&mut self, key: &K) -> Option<V> {
        let node = self.raw.find(key);
        if node.is_nil() {
            return None;
        }

        let (start, side) = self.splice_out(node);
        self.rebalance_after_remove(start, side);

        let (_, value) = self.raw.arena.release(node, &mut self.raw.root);
        Some(value)
    }

    /// Checks ordering, links, and that every balance factor is exact and
    /// within ±1.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.raw.validate_structure()?;
        invariant::check_avl_balance(&self.raw.arena, self.raw.root)
    }
}

// =============================================================================
// Rotation
// =============================================================================

impl<K, V, C> AvlTree<K, V, C> {
    /// Rotates `candidate` towards `direction` and updates both balance
    /// factors from the rotation arithmetic alone.
    ///
    /// With `x` the demoted node and `y` the promoted one, a left rotation
    /// gives `x' = x + 1 - min(y, 0)` and `y' = y + 1 + max(x', 0)`; a right
    /// rotation is the mirror image. These hold for every input factor,
    /// including a promoted child with factor 0, which only deletion makes.
    fn rotate(&mut self, candidate: NodeId, direction: Side) -> NodeId {
        let arena = &mut self.raw.arena;
        let promoted = bst::rotate(arena, &mut self.raw.root, candidate, direction);
        debug_assert!(
            promoted.is_some(),
            "AVL rotation of {candidate:?} without a child to promote"
        );
        let Some(promoted) = promoted else {
            return candidate;
        };

        let demoted_factor = arena.meta(candidate);
        let promoted_factor = arena.meta(promoted);
        let (demoted_factor, promoted_factor) = match direction {
            Side::Left => {
                let demoted = demoted_factor + 1 - promoted_factor.min(0);
                (demoted, promoted_factor + 1 + demoted.max(0))
            }
            Side::Right => {
                let demoted = demoted_factor - 1 - promoted_factor.max(0);
                (demoted, promoted_factor - 1 + demoted.min(0))
            }
        };
        arena.set_meta(candidate, demoted_factor);
        arena.set_meta(promoted, promoted_factor);

        promoted
    }

    /// Restores `|factor| <= 1` at an overweight node with one single or
    /// double rotation and returns the new subtree root.
    fn rebalance(&mut self, node: NodeId) -> NodeId {
        let factor = self.raw.arena.meta(node);
        let heavy = if factor > 1 {
            Side::Left
        } else if factor < -1 {
            Side::Right
        } else {
            return node;
        };

        let child = self.raw.arena.child(node, heavy);
        // A child leaning away from the heavy side needs the double rotation.
        if self.raw.arena.meta(child) * growth(heavy) < 0 {
            tree_trace!(?node, ?heavy, "double rotation");
            self.rotate(child, heavy);
        }
        self.rotate(node, heavy.opposite())
    }

    // =========================================================================
    // Fixup
    // =========================================================================

    fn rebalance_after_insert(&mut self, leaf: NodeId) {
        let mut child = leaf;
        let mut parent = self.raw.arena.parent(child);

        while !parent.is_nil() {
            let side = self.raw.arena.side_of(child);
            let factor = self.raw.arena.meta(parent) + growth(side);
            self.raw.arena.set_meta(parent, factor);

            match factor {
                // The shorter side caught up; no ancestor changed height.
                0 => break,
                -1 | 1 => {
                    child = parent;
                    parent = self.raw.arena.parent(parent);
                }
                _ => {
                    // Rotation returns the subtree to its pre-insert height.
                    self.rebalance(parent);
                    break;
                }
            }
        }
    }

    /// Walks up from `parent`, whose subtree on `side` just got one shorter.
    fn rebalance_after_remove(&mut self, parent: NodeId, side: Side) {
        let mut parent = parent;
        let mut side = side;

        while !parent.is_nil() {
            let factor = self.raw.arena.meta(parent) - growth(side);
            self.raw.arena.set_meta(parent, factor);

            let shortened = match factor {
                // Was balanced: the other side still carries the height.
                -1 | 1 => break,
                0 => parent,
                _ => {
                    let subtree = self.rebalance(parent);
                    // A promoted child with factor 0 leaves the height intact.
                    if self.raw.arena.meta(subtree) != 0 {
                        break;
                    }
                    subtree
                }
            };

            let above = self.raw.arena.parent(shortened);
            if !above.is_nil() {
                side = self.raw.arena.side_of(shortened);
            }
            parent = above;
        }
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Unlinks `node` and returns where the height loss starts: the lowest
    /// node whose child count changed and the side it lost.
    ///
    /// A two-child node is replaced by its in-order successor, which takes
    /// over the node's links and balance factor.
    fn splice_out(&mut self, node: NodeId) -> (NodeId, Side) {
        let arena = &mut self.raw.arena;
        let root = &mut self.raw.root;
        let left = arena.left(node);
        let right = arena.right(node);

        if left.is_nil() || right.is_nil() {
            let child = if left.is_nil() { right } else { left };
            let parent = arena.parent(node);
            let side = if parent.is_nil() {
                Side::Left
            } else {
                arena.side_of(node)
            };
            tree_debug!(?node, ?child, "splice node with at most one child");
            bst::transplant(arena, root, node, child);
            return (parent, side);
        }

        let successor = bst::minimum(arena, right);
        tree_debug!(?node, ?successor, "splice node with two children");
        let start = if arena.parent(successor) == node {
            (successor, Side::Right)
        } else {
            let successor_parent = arena.parent(successor);
            let successor_right = arena.right(successor);
            bst::transplant(arena, root, successor, successor_right);
            arena.set_right(successor, right);
            arena.set_parent(right, successor);
            (successor_parent, Side::Left)
        };
        bst::transplant(arena, root, node, successor);
        arena.set_left(successor, left);
        arena.set_parent(left, successor);
        let factor = arena.meta(node);
        arena.set_meta(successor, factor);
        start
    }
}

static_assertions::assert_impl_all!(AvlTree<i32, String>: Send, Sync, Clone);
