//! Structural primitives shared by every tree variant.
//!
//! These are free functions over an [`Arena`] and a root id. They know
//! nothing about balance metadata beyond carrying it along: the AVL and
//! red-black trees compose them with their own fixup passes, and the plain
//! binary search tree uses them as they are.
//!
//! Traversals and height are iterative with explicit stacks, so a
//! degenerate (list-shaped) unbalanced tree never recurses deeply.

use std::cmp::Ordering;

use smallvec::SmallVec;

use super::TraversalOrder;
use super::arena::{Arena, NodeId, Side};
use crate::comparer::Comparer;
use crate::log::tree_trace;

/// Inline capacity of traversal stacks; a balanced tree of 2^32 nodes fits.
const STACK_INLINE_CAPACITY: usize = 48;

type NodeStack = SmallVec<[NodeId; STACK_INLINE_CAPACITY]>;

// =============================================================================
// Search
// =============================================================================

/// Returns the node holding `key`, or [`NodeId::NIL`].
pub(crate) fn search<K, V, M, C>(
    arena: &Arena<K, V, M>,
    root: NodeId,
    comparer: &C,
    key: &K,
) -> NodeId
where
    M: Copy + Default,
    C: Comparer<K>,
{
    let mut current = root;
    while !current.is_nil() {
        current = match comparer.compare(key, arena.key(current)) {
            Ordering::Less => arena.left(current),
            Ordering::Greater => arena.right(current),
            Ordering::Equal => return current,
        };
    }
    NodeId::NIL
}

/// Leftmost node of the subtree rooted at `node`, or `NIL` for an empty one.
pub(crate) fn minimum<K, V, M: Copy + Default>(arena: &Arena<K, V, M>, node: NodeId) -> NodeId {
    let mut current = node;
    if current.is_nil() {
        return current;
    }
    while !arena.left(current).is_nil() {
        current = arena.left(current);
    }
    current
}

/// Rightmost node of the subtree rooted at `node`, or `NIL` for an empty one.
pub(crate) fn maximum<K, V, M: Copy + Default>(arena: &Arena<K, V, M>, node: NodeId) -> NodeId {
    let mut current = node;
    if current.is_nil() {
        return current;
    }
    while !arena.right(current).is_nil() {
        current = arena.right(current);
    }
    current
}

// =============================================================================
// Insertion
// =============================================================================

/// Where a key belongs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Placement {
    /// The key is already stored at this node.
    Occupied(NodeId),
    /// The key belongs in the empty `side` slot of `parent` (`NIL` parent
    /// means the tree is empty).
    Vacant { parent: NodeId, side: Side },
}

pub(crate) fn locate<K, V, M, C>(
    arena: &Arena<K, V, M>,
    root: NodeId,
    comparer: &C,
    key: &K,
) -> Placement
where
    M: Copy + Default,
    C: Comparer<K>,
{
    let mut parent = NodeId::NIL;
    let mut side = Side::Left;
    let mut current = root;
    while !current.is_nil() {
        parent = current;
        match comparer.compare(key, arena.key(current)) {
            Ordering::Less => side = Side::Left,
            Ordering::Greater => side = Side::Right,
            Ordering::Equal => return Placement::Occupied(current),
        }
        current = arena.child(current, side);
    }
    Placement::Vacant { parent, side }
}

/// Allocates a leaf in a vacant slot found by [`locate`].
pub(crate) fn attach<K, V, M: Copy + Default>(
    arena: &mut Arena<K, V, M>,
    root: &mut NodeId,
    parent: NodeId,
    side: Side,
    key: K,
    value: V,
    meta: M,
) -> NodeId {
    let node = arena.allocate(key, value, parent, meta);
    if parent.is_nil() {
        *root = node;
    } else {
        arena.set_child(parent, side, node);
    }
    node
}

// =============================================================================
// Relinking
// =============================================================================

/// Points whichever slot held `old` (a child slot of `parent`, or the root)
/// at `new`. Does not touch `new`'s parent link.
fn replace_child<K, V, M: Copy + Default>(
    arena: &mut Arena<K, V, M>,
    root: &mut NodeId,
    parent: NodeId,
    old: NodeId,
    new: NodeId,
) {
    if parent.is_nil() {
        *root = new;
    } else if arena.left(parent) == old {
        arena.set_left(parent, new);
    } else {
        arena.set_right(parent, new);
    }
}

/// Replaces the subtree rooted at `old` with the one rooted at `new`.
///
/// `new`'s parent link is written even when `new` is `NIL`; the red-black
/// deletion fixup reads the sentinel's parent afterwards.
pub(crate) fn transplant<K, V, M: Copy + Default>(
    arena: &mut Arena<K, V, M>,
    root: &mut NodeId,
    old: NodeId,
    new: NodeId,
) {
    let parent = arena.parent(old);
    replace_child(arena, root, parent, old, new);
    arena.set_parent(new, parent);
}

/// Rotates `candidate` down towards `direction`, promoting its child on the
/// opposite side into its position. In-order sequence is preserved.
///
/// `Side::Left` is a left rotation (the right child is promoted), `Side::Right`
/// a right rotation. Returns the promoted node, or `None` without touching
/// anything when `candidate` has no child to promote.
pub(crate) fn rotate<K, V, M: Copy + Default>(
    arena: &mut Arena<K, V, M>,
    root: &mut NodeId,
    candidate: NodeId,
    direction: Side,
) -> Option<NodeId> {
    let promoted_side = direction.opposite();
    let replacement = arena.child(candidate, promoted_side);
    if candidate.is_nil() || replacement.is_nil() {
        return None;
    }

    tree_trace!(?candidate, ?replacement, ?direction, "rotate");

    let inner = arena.child(replacement, direction);
    arena.set_child(candidate, promoted_side, inner);
    if !inner.is_nil() {
        arena.set_parent(inner, candidate);
    }

    let parent = arena.parent(candidate);
    arena.set_parent(replacement, parent);
    replace_child(arena, root, parent, candidate, replacement);

    arena.set_child(replacement, direction, candidate);
    arena.set_parent(candidate, replacement);

    Some(replacement)
}

/// Splices `node` out without any rebalancing.
///
/// Two-child nodes are replaced by their in-order successor, which is
/// relinked into `node`'s position (not copied). Returns the lowest node
/// whose child count changed, `NIL` if the tree became empty.
pub(crate) fn splice_out<K, V, M: Copy + Default>(
    arena: &mut Arena<K, V, M>,
    root: &mut NodeId,
    node: NodeId,
) -> NodeId {
    let left = arena.left(node);
    let right = arena.right(node);

    if left.is_nil() || right.is_nil() {
        let child = if left.is_nil() { right } else { left };
        let parent = arena.parent(node);
        transplant(arena, root, node, child);
        return parent;
    }

    let successor = minimum(arena, right);
    let changed = if arena.parent(successor) == node {
        successor
    } else {
        let successor_parent = arena.parent(successor);
        let successor_right = arena.right(successor);
        transplant(arena, root, successor, successor_right);
        arena.set_right(successor, right);
        arena.set_parent(right, successor);
        successor_parent
    };
    transplant(arena, root, node, successor);
    arena.set_left(successor, left);
    arena.set_parent(left, successor);
    changed
}

// =============================================================================
// Traversal
// =============================================================================

/// Node ids of the tree rooted at `root` in the requested order.
pub(crate) fn collect<K, V, M: Copy + Default>(
    arena: &Arena<K, V, M>,
    root: NodeId,
    order: TraversalOrder,
) -> Vec<NodeId> {
    let mut visited = Vec::with_capacity(arena.len());
    if root.is_nil() {
        return visited;
    }

    let mut stack = NodeStack::new();
    match order {
        TraversalOrder::PreOrder => {
            stack.push(root);
            while let Some(node) = stack.pop() {
                visited.push(node);
                push_if_present(&mut stack, arena.right(node));
                push_if_present(&mut stack, arena.left(node));
            }
        }
        TraversalOrder::InOrder => {
            let mut current = root;
            while !current.is_nil() || !stack.is_empty() {
                while !current.is_nil() {
                    stack.push(current);
                    current = arena.left(current);
                }
                if let Some(node) = stack.pop() {
                    visited.push(node);
                    current = arena.right(node);
                }
            }
        }
        TraversalOrder::PostOrder => {
            // Root-right-left, reversed.
            stack.push(root);
            while let Some(node) = stack.pop() {
                visited.push(node);
                push_if_present(&mut stack, arena.left(node));
                push_if_present(&mut stack, arena.right(node));
            }
            visited.reverse();
        }
    }
    visited
}

#[inline]
fn push_if_present(stack: &mut NodeStack, node: NodeId) {
    if !node.is_nil() {
        stack.push(node);
    }
}

/// Per-node subtree heights, indexed by [`NodeId::index`].
///
/// A leaf has height 1.
pub(crate) fn subtree_heights<K, V, M: Copy + Default>(
    arena: &Arena<K, V, M>,
    root: NodeId,
) -> Vec<usize> {
    let mut heights = vec![0; arena.len()];
    for node in collect(arena, root, TraversalOrder::PostOrder) {
        heights[node.index()] = 1 + height_of(&heights, arena.left(node))
            .max(height_of(&heights, arena.right(node)));
    }
    heights
}

#[inline]
pub(crate) fn height_of(heights: &[usize], node: NodeId) -> usize {
    if node.is_nil() { 0 } else { heights[node.index()] }
}

/// Number of nodes on the longest root-to-leaf path; 0 for an empty tree.
pub(crate) fn height<K, V, M: Copy + Default>(arena: &Arena<K, V, M>, root: NodeId) -> usize {
    height_of(&subtree_heights(arena, root), root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::NaturalOrder;
    use rstest::rstest;

    fn build(keys: &[i32]) -> (Arena<i32, i32, ()>, NodeId) {
        let mut arena = Arena::new();
        let mut root = NodeId::NIL;
        for &key in keys {
            if let Placement::Vacant { parent, side } = locate(&arena, root, &NaturalOrder, &key) {
                attach(&mut arena, &mut root, parent, side, key, key * 10, ());
            }
        }
        (arena, root)
    }

    fn keys_in(arena: &Arena<i32, i32, ()>, root: NodeId, order: TraversalOrder) -> Vec<i32> {
        collect(arena, root, order)
            .into_iter()
            .map(|node| *arena.key(node))
            .collect()
    }

    #[rstest]
    fn test_search_finds_present_and_absent() {
        let (arena, root) = build(&[5, 3, 8, 1, 4]);
        let found = search(&arena, root, &NaturalOrder, &4);
        assert_eq!(*arena.value(found), 40);
        assert!(search(&arena, root, &NaturalOrder, &7).is_nil());
        assert!(search(&arena, NodeId::NIL, &NaturalOrder, &7).is_nil());
    }

    #[rstest]
    fn test_locate_reports_occupied() {
        let (arena, root) = build(&[5, 3, 8]);
        match locate(&arena, root, &NaturalOrder, &3) {
            Placement::Occupied(node) => assert_eq!(*arena.key(node), 3),
            Placement::Vacant { .. } => panic!("3 should be present"),
        }
    }

    #[rstest]
    fn test_minimum_maximum() {
        let (arena, root) = build(&[5, 3, 8, 1, 4, 9]);
        assert_eq!(*arena.key(minimum(&arena, root)), 1);
        assert_eq!(*arena.key(maximum(&arena, root)), 9);
        assert!(minimum(&arena, NodeId::NIL).is_nil());
    }

    #[rstest]
    #[case(TraversalOrder::PreOrder, vec![5, 3, 1, 4, 8, 9])]
    #[case(TraversalOrder::InOrder, vec![1, 3, 4, 5, 8, 9])]
    #[case(TraversalOrder::PostOrder, vec![1, 4, 3, 9, 8, 5])]
    fn test_collect_orders(#[case] order: TraversalOrder, #[case] expected: Vec<i32>) {
        let (arena, root) = build(&[5, 3, 8, 1, 4, 9]);
        assert_eq!(keys_in(&arena, root, order), expected);
    }

    #[rstest]
    fn test_rotate_left_preserves_order() {
        let (mut arena, mut root) = build(&[1, 2, 3]);
        let candidate = root;
        let promoted = rotate(&mut arena, &mut root, candidate, Side::Left);
        assert_eq!(promoted, Some(root));
        assert_eq!(*arena.key(root), 2);
        assert!(arena.parent(root).is_nil());
        assert_eq!(keys_in(&arena, root, TraversalOrder::InOrder), vec![1, 2, 3]);
        assert_eq!(height(&arena, root), 2);
    }

    #[rstest]
    fn test_rotate_right_moves_inner_subtree() {
        let (mut arena, mut root) = build(&[4, 2, 5, 1, 3]);
        let candidate = root;
        rotate(&mut arena, &mut root, candidate, Side::Right);
        assert_eq!(*arena.key(root), 2);
        let demoted = arena.right(root);
        assert_eq!(*arena.key(demoted), 4);
        let inner = arena.left(demoted);
        assert_eq!(*arena.key(inner), 3);
        assert_eq!(arena.parent(inner), demoted);
        assert_eq!(
            keys_in(&arena, root, TraversalOrder::InOrder),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[rstest]
    fn test_rotate_without_child_is_noop() {
        let (mut arena, mut root) = build(&[1, 2]);
        let before = root;
        assert_eq!(rotate(&mut arena, &mut root, before, Side::Right), None);
        assert_eq!(root, before);
        assert_eq!(keys_in(&arena, root, TraversalOrder::PreOrder), vec![1, 2]);
    }

    #[rstest]
    #[case(1, vec![2, 3, 5, 7, 8])]
    #[case(3, vec![1, 2, 5, 7, 8])]
    #[case(5, vec![1, 2, 3, 7, 8])]
    fn test_splice_out_keeps_order(#[case] key: i32, #[case] expected: Vec<i32>) {
        let (mut arena, mut root) = build(&[5, 2, 8, 1, 3, 7]);
        let node = search(&arena, root, &NaturalOrder, &key);
        splice_out(&mut arena, &mut root, node);
        arena.release(node, &mut root);
        assert_eq!(keys_in(&arena, root, TraversalOrder::InOrder), expected);
    }

    #[rstest]
    fn test_splice_out_reports_changed_parent() {
        let (mut arena, mut root) = build(&[5, 2, 8, 7, 9, 6]);
        let node = search(&arena, root, &NaturalOrder, &5);
        let changed = splice_out(&mut arena, &mut root, node);
        // Successor 6 came from under 7.
        assert_eq!(*arena.key(changed), 7);
        assert_eq!(*arena.key(root), 6);
    }

    #[rstest]
    fn test_height_of_degenerate_chain() {
        let keys: Vec<i32> = (0..2_000).collect();
        let (arena, root) = build(&keys);
        assert_eq!(height(&arena, root), 2_000);
        assert_eq!(
            collect(&arena, root, TraversalOrder::PostOrder).len(),
            2_000
        );
    }
}
