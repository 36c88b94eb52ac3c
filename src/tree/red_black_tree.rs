//! Color-balanced ordered map.
//!
//! This module provides [`RedBlackTree`], an ordered map that colors every
//! node red or black and keeps the usual red-black rules:
//!
//! 1. The root is black.
//! 2. Absent children (the shared sentinel leaf) are black.
//! 3. A red node has no red child.
//! 4. Every path from a node down to a leaf passes the same number of black
//!    nodes.
//!
//! Together they bound the height by `2 * log2(n + 1)`.
//!
//! # Internal Structure
//!
//! Absent children point at a sentinel leaf owned by the arena. The sentinel
//! is always black and its parent link is writable: deletion fixup may start
//! at the sentinel and reads that link to find where it sits.
//!
//! Fixups are written once for a `side` and its mirror image instead of
//! twice for left and right.
//!
//! # Examples
//!
//! ```rust
//! use ordered_trees::{Color, RedBlackTree};
//!
//! let mut tree = RedBlackTree::new();
//! tree.insert(1, "one").insert(2, "two").insert(3, "three");
//!
//! assert_eq!(tree.root_entry(), Some((&2, &"two")));
//! assert_eq!(tree.root_color(), Some(Color::Black));
//! assert_eq!(tree.color_of(&1), Some(Color::Red));
//! ```

use super::arena::{NodeId, Side};
use super::bst;
use super::invariant::{self, InvariantViolation};
use super::raw::RawTree;
use crate::comparer::{Comparer, NaturalOrder};
use crate::log::{tree_debug, tree_trace};

// =============================================================================
// Color
// =============================================================================

/// The color of a red-black node.
///
/// The default is [`Color::Black`], which is also the color of every absent
/// child.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    /// A red node.
    Red,
    /// A black node.
    #[default]
    Black,
}

// =============================================================================
// RedBlackTree Definition
// =============================================================================

/// An ordered map balanced by node colors.
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
/// Insertion performs at most two rotations and removal at most three.
///
/// # Examples
///
/// ```rust
/// use ordered_trees::RedBlackTree;
///
/// let mut tree: RedBlackTree<i32, i32> = [2, 3, 7, 1, 9, 0, 8, 6]
///     .into_iter()
///     .map(|key| (key, key))
///     .collect();
///
/// let snapshot = tree.clone();
/// tree.remove(&6).remove(&9);
///
/// assert_eq!(tree.to_string(), "0 | 1 | 2 | 3 | 7 | 8");
/// assert_eq!(snapshot.len(), 8);
/// assert_eq!(tree.validate(), Ok(()));
/// ```
#[derive(Clone)]
pub struct RedBlackTree<K, V, C = NaturalOrder> {
    raw: RawTree<K, V, Color, C>,
}

super::impl_search_tree!(RedBlackTree);

impl<K, V, C> RedBlackTree<K, V, C> {
    /// Creates an empty tree ordered by `comparer`.
    #[inline]
    #[must_use]
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            raw: RawTree::new(comparer),
        }
    }

    /// Color of the root node; `None` when empty, black otherwise.
    #[must_use]
    pub fn root_color(&self) -> Option<Color> {
        (!self.raw.root.is_nil()).then(|| self.color(self.raw.root))
    }

    #[inline]
    fn color(&self, node: NodeId) -> Color {
        self.raw.arena.meta(node)
    }

    #[inline]
    fn paint(&mut self, node: NodeId, color: Color) {
        debug_assert!(
            !(node.is_nil() && color == Color::Red),
            "the sentinel leaf must stay black"
        );
        self.raw.arena.set_meta(node, color);
    }

    #[inline]
    fn parent(&self, node: NodeId) -> NodeId {
        self.raw.arena.parent(node)
    }

    #[inline]
    fn child(&self, node: NodeId, side: Side) -> NodeId {
        self.raw.arena.child(node, side)
    }

    /// Rotates at `node` and returns the child promoted into its place.
    fn rotate(&mut self, node: NodeId, direction: Side) -> NodeId {
        let promoted = bst::rotate(&mut self.raw.arena, &mut self.raw.root, node, direction);
        debug_assert!(
            promoted.is_some(),
            "red-black rotation of {node:?} without a child to promote"
        );
        promoted.unwrap_or(node)
    }
}

impl<K, V, C: Comparer<K>> RedBlackTree<K, V, C> {
    /// Inserts a key-value pair.
    ///
    /// New keys enter as red leaves and are recolored or rotated into place.
    /// If an equal key is present its value is replaced and nothing else
    /// changes.
    ///
    /// # Complexity
    ///
    /// O(log N)
    pub fn insert(&mut self, key: K, value: V) -> &mut Self {
        if let Some(leaf) = self.raw.insert_leaf(key, value, Color::Red) {
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

        let (replacement, removed_color) = self.splice_out(node);
        if removed_color == Color::Black {
            self.rebalance_after_remove(replacement);
        }

        let (_, value) = self.raw.arena.release(node, &mut self.raw.root);
        Some(value)
    }

    /// Color of the node holding `key`.
    #[must_use]
    pub fn color_of(&self, key: &K) -> Option<Color> {
        let node = self.raw.find(key);
        (!node.is_nil()).then(|| self.color(node))
    }

    /// Checks ordering, links and the four coloring rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.raw.validate_structure()?;
        invariant::check_red_black(&self.raw.arena, self.raw.root)
    }
}

// =============================================================================
// Fixup
// =============================================================================

impl<K, V, C> RedBlackTree<K, V, C> {
    fn rebalance_after_insert(&mut self, leaf: NodeId) {
        let mut node = leaf;

        // A red parent is never the root, so the grandparent exists.
        while self.color(self.parent(node)) == Color::Red {
            let parent = self.parent(node);
            let grandparent = self.parent(parent);
            let side = self.raw.arena.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                tree_trace!(?node, "insert fixup: red uncle");
                self.paint(parent, Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if node == self.child(parent, side.opposite()) {
                tree_trace!(?node, "insert fixup: inner grandchild");
                node = parent;
                self.rotate(node, side);
            }

            tree_trace!(?node, "insert fixup: outer grandchild");
            let parent = self.parent(node);
            let grandparent = self.parent(parent);
            self.paint(parent, Color::Black);
            self.paint(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        let root = self.raw.root;
        self.paint(root, Color::Black);
    }

    /// Restores the black height after a black node left the position now
    /// held by `node`, which may be the sentinel.
    fn rebalance_after_remove(&mut self, node: NodeId) {
        let mut node = node;

        while node != self.raw.root && self.color(node) == Color::Black {
            let parent = self.parent(node);
            // Compare against the parent's slot directly: `node` may be the
            // sentinel, which `side_of` cannot place.
            let side = if self.child(parent, Side::Left) == node {
                Side::Left
            } else {
                Side::Right
            };
            let mut sibling = self.child(parent, side.opposite());

            if self.color(sibling) == Color::Red {
                tree_trace!(?node, "remove fixup: red sibling");
                self.paint(sibling, Color::Black);
                self.paint(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, side.opposite());
            }

            let near = self.child(sibling, side);
            let mut far = self.child(sibling, side.opposite());

            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                tree_trace!(?node, "remove fixup: black nephews");
                self.paint(sibling, Color::Red);
                node = parent;
                continue;
            }

            if self.color(far) == Color::Black {
                tree_trace!(?node, "remove fixup: red near nephew");
                self.paint(near, Color::Black);
                self.paint(sibling, Color::Red);
                sibling = self.rotate(sibling, side.opposite());
                far = self.child(sibling, side.opposite());
            }

            tree_trace!(?node, "remove fixup: red far nephew");
            let parent_color = self.color(parent);
            self.paint(sibling, parent_color);
            self.paint(parent, Color::Black);
            self.paint(far, Color::Black);
            self.rotate(parent, side);
            node = self.raw.root;
        }

        self.paint(node, Color::Black);
    }

    /// Unlinks `node` and returns the node now sitting where a color was
    /// lost, together with that lost color.
    ///
    /// A two-child node is replaced by its in-order successor, which takes
    /// the node's color; the color lost is then the successor's own.
    fn splice_out(&mut self, node: NodeId) -> (NodeId, Color) {
        let arena = &mut self.raw.arena;
        let root = &mut self.raw.root;
        let left = arena.left(node);
        let right = arena.right(node);
        let color = arena.meta(node);

        if left.is_nil() || right.is_nil() {
            let child = if left.is_nil() { right } else { left };
            tree_debug!(?node, ?child, "splice node with at most one child");
            bst::transplant(arena, root, node, child);
            return (child, color);
        }

        let successor = bst::minimum(arena, right);
        tree_debug!(?node, ?successor, "splice node with two children");
        let removed_color = arena.meta(successor);
        let replacement = arena.right(successor);

        if arena.parent(successor) == node {
            // Also needed when `replacement` is the sentinel.
            arena.set_parent(replacement, successor);
        } else {
            bst::transplant(arena, root, successor, replacement);
            arena.set_right(successor, right);
            arena.set_parent(right, successor);
        }
        bst::transplant(arena, root, node, successor);
        arena.set_left(successor, left);
        arena.set_parent(left, successor);
        arena.set_meta(successor, color);

        (replacement, removed_color)
    }
}

static_assertions::assert_impl_all!(RedBlackTree<i32, String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(Color: Copy, Send, Sync, Default);
