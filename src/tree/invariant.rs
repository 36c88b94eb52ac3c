//! Invariant checks for every tree variant.
//!
//! None of the public tree operations can fail, so these checks are not part
//! of normal use. They back each tree's `validate` method, which the test
//! suite and the `xtask stress` runner call after mutations.
//!
//! Nodes are reported by their in-order position (0 = smallest key), which
//! is stable across clones and independent of arena layout.
//!
//! # Examples
//!
//! ```
//! use ordered_trees::{RedBlackTree, InvariantViolation};
//!
//! let tree: RedBlackTree<i32, ()> = (0..100).map(|key| (key, ())).collect();
//! assert_eq!(tree.validate(), Ok(()));
//!
//! let error = InvariantViolation::RedRedViolation { position: 3 };
//! assert_eq!(error.to_string(), "red node at in-order position 3 has a red child");
//! ```

use std::cmp::Ordering;

use thiserror::Error;

use super::TraversalOrder;
use super::arena::{Arena, NodeId};
use super::bst;
use super::red_black_tree::Color;
use crate::comparer::Comparer;

// =============================================================================
// InvariantViolation
// =============================================================================

/// A broken structural invariant, found by `validate`.
///
/// Seeing one of these means a bug in this crate or a comparer that is not a
/// total order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A key does not compare greater than its in-order predecessor.
    #[error("key at in-order position {position} is not greater than its predecessor")]
    OrderViolated {
        /// In-order position of the offending key.
        position: usize,
    },

    /// A child's parent link does not point back at its parent.
    #[error("child of the node at in-order position {position} does not link back to it")]
    ParentMismatch {
        /// In-order position of the parent.
        position: usize,
    },

    /// The root has a parent link.
    #[error("root node has a parent link")]
    RootHasParent,

    /// The number of reachable nodes differs from the stored length.
    #[error("{reachable} nodes are reachable from the root but {stored} are stored")]
    LengthMismatch {
        /// Number of nodes the tree holds.
        stored: usize,
        /// Number of nodes reachable from the root.
        reachable: usize,
    },

    /// A stored AVL balance factor disagrees with the subtree heights.
    #[error(
        "balance factor at in-order position {position} is {stored} but subtree heights give {computed}"
    )]
    BalanceFactorMismatch {
        /// In-order position of the node.
        position: usize,
        /// Balance factor stored in the node.
        stored: i8,
        /// `height(left) - height(right)` computed from scratch.
        computed: i64,
    },

    /// An AVL node's subtrees differ in height by more than one.
    #[error("node at in-order position {position} has balance factor {factor}")]
    Unbalanced {
        /// In-order position of the node.
        position: usize,
        /// `height(left) - height(right)`.
        factor: i64,
    },

    /// The red-black root is red.
    #[error("root node is red")]
    RedRoot,

    /// The red-black sentinel leaf is not black.
    #[error("sentinel leaf is not black")]
    SentinelNotBlack,

    /// A red node has a red child.
    #[error("red node at in-order position {position} has a red child")]
    RedRedViolation {
        /// In-order position of the red parent.
        position: usize,
    },

    /// Two paths below a node pass through different numbers of black nodes.
    #[error(
        "black height differs below in-order position {position}: left {left}, right {right}"
    )]
    BlackHeightMismatch {
        /// In-order position of the node.
        position: usize,
        /// Black height through the left child.
        left: usize,
        /// Black height through the right child.
        right: usize,
    },
}

// =============================================================================
// Checks
// =============================================================================

/// In-order position of every node, indexed by [`NodeId::index`].
fn positions<K, V, M: Copy + Default>(arena: &Arena<K, V, M>, root: NodeId) -> Vec<usize> {
    let mut positions = vec![0; arena.len()];
    for (position, node) in bst::collect(arena, root, TraversalOrder::InOrder)
        .into_iter()
        .enumerate()
    {
        positions[node.index()] = position;
    }
    positions
}

/// Parent consistency and reachability.
pub(crate) fn check_links<K, V, M: Copy + Default>(
    arena: &Arena<K, V, M>,
    root: NodeId,
) -> Result<(), InvariantViolation> {
    if !root.is_nil() && !arena.parent(root).is_nil() {
        return Err(InvariantViolation::RootHasParent);
    }

    let reachable = bst::collect(arena, root, TraversalOrder::InOrder);
    if reachable.len() != arena.len() {
        return Err(InvariantViolation::LengthMismatch {
            stored: arena.len(),
            reachable: reachable.len(),
        });
    }

    for (position, &node) in reachable.iter().enumerate() {
        for child in [arena.left(node), arena.right(node)] {
            if !child.is_nil() && arena.parent(child) != node {
                return Err(InvariantViolation::ParentMismatch { position });
            }
        }
    }
    Ok(())
}

/// Strictly ascending keys in order.
pub(crate) fn check_order<K, V, M, C>(
    arena: &Arena<K, V, M>,
    root: NodeId,
    comparer: &C,
) -> Result<(), InvariantViolation>
where
    M: Copy + Default,
    C: Comparer<K>,
{
    let in_order = bst::collect(arena, root, TraversalOrder::InOrder);
    for (position, pair) in in_order.windows(2).enumerate() {
        if comparer.compare(arena.key(pair[0]), arena.key(pair[1])) != Ordering::Less {
            return Err(InvariantViolation::OrderViolated {
                position: position + 1,
            });
        }
    }
    Ok(())
}

/// Stored balance factors match recomputed heights and stay within ±1.
pub(crate) fn check_avl_balance<K, V>(
    arena: &Arena<K, V, i8>,
    root: NodeId,
) -> Result<(), InvariantViolation> {
    let heights = bst::subtree_heights(arena, root);
    let positions = positions(arena, root);

    for node in bst::collect(arena, root, TraversalOrder::PostOrder) {
        let left = bst::height_of(&heights, arena.left(node));
        let right = bst::height_of(&heights, arena.right(node));
        let computed = signed(left) - signed(right);
        let stored = arena.meta(node);
        let position = positions[node.index()];

        if i64::from(stored) != computed {
            return Err(InvariantViolation::BalanceFactorMismatch {
                position,
                stored,
                computed,
            });
        }
        if computed.abs() > 1 {
            return Err(InvariantViolation::Unbalanced {
                position,
                factor: computed,
            });
        }
    }
    Ok(())
}

/// Black root, black sentinel, no red-red edge, uniform black height.
pub(crate) fn check_red_black<K, V>(
    arena: &Arena<K, V, Color>,
    root: NodeId,
) -> Result<(), InvariantViolation> {
    if arena.meta(NodeId::NIL) != Color::Black {
        return Err(InvariantViolation::SentinelNotBlack);
    }
    if arena.meta(root) == Color::Red {
        return Err(InvariantViolation::RedRoot);
    }

    let positions = positions(arena, root);
    // Black nodes strictly below each node, down to (excluding) the sentinel.
    let mut black_heights = vec![0; arena.len()];
    let black_height_through = |heights: &[usize], child: NodeId| -> usize {
        if child.is_nil() {
            0
        } else {
            heights[child.index()] + usize::from(arena.meta(child) == Color::Black)
        }
    };

    for node in bst::collect(arena, root, TraversalOrder::PostOrder) {
        let position = positions[node.index()];
        let (left, right) = (arena.left(node), arena.right(node));

        if arena.meta(node) == Color::Red
            && (arena.meta(left) == Color::Red || arena.meta(right) == Color::Red)
        {
            return Err(InvariantViolation::RedRedViolation { position });
        }

        let left_height = black_height_through(&black_heights, left);
        let right_height = black_height_through(&black_heights, right);
        if left_height != right_height {
            return Err(InvariantViolation::BlackHeightMismatch {
                position,
                left: left_height,
                right: right_height,
            });
        }
        black_heights[node.index()] = left_height;
    }
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
const fn signed(height: usize) -> i64 {
    height as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::NaturalOrder;
    use crate::tree::arena::Side;
    use rstest::rstest;

    /// `2` with children `1` and `3`, all metadata defaulted.
    fn triangle<M: Copy + Default>() -> (Arena<i32, (), M>, NodeId) {
        let mut arena = Arena::new();
        let mut root = NodeId::NIL;
        bst::attach(&mut arena, &mut root, NodeId::NIL, Side::Left, 2, (), M::default());
        let top = root;
        bst::attach(&mut arena, &mut root, top, Side::Left, 1, (), M::default());
        bst::attach(&mut arena, &mut root, top, Side::Right, 3, (), M::default());
        (arena, root)
    }

    #[rstest]
    fn test_valid_triangle_passes_every_check() {
        let (arena, root) = triangle::<()>();
        assert_eq!(check_links(&arena, root), Ok(()));
        assert_eq!(check_order(&arena, root, &NaturalOrder), Ok(()));

        let (arena, root) = triangle::<i8>();
        assert_eq!(check_avl_balance(&arena, root), Ok(()));

        let (arena, root) = triangle::<Color>();
        assert_eq!(check_red_black(&arena, root), Ok(()));
    }

    #[rstest]
    fn test_order_violation_is_reported() {
        let (arena, root) = triangle::<()>();
        let reversed = |left: &i32, right: &i32| right.cmp(left);
        assert_eq!(
            check_order(&arena, root, &reversed),
            Err(InvariantViolation::OrderViolated { position: 1 })
        );
    }

    #[rstest]
    fn test_broken_parent_link_is_reported() {
        let (mut arena, root) = triangle::<()>();
        let left = arena.left(root);
        arena.set_parent(left, arena.right(root));
        assert_eq!(
            check_links(&arena, root),
            Err(InvariantViolation::ParentMismatch { position: 1 })
        );
    }

    #[rstest]
    fn test_unreachable_node_is_reported() {
        let (mut arena, root) = triangle::<()>();
        arena.set_right(root, NodeId::NIL);
        assert_eq!(
            check_links(&arena, root),
            Err(InvariantViolation::LengthMismatch {
                stored: 3,
                reachable: 2,
            })
        );
    }

    #[rstest]
    fn test_stale_balance_factor_is_reported() {
        let (mut arena, root) = triangle::<i8>();
        arena.set_meta(root, 1);
        assert_eq!(
            check_avl_balance(&arena, root),
            Err(InvariantViolation::BalanceFactorMismatch {
                position: 1,
                stored: 1,
                computed: 0,
            })
        );
    }

    #[rstest]
    fn test_chain_is_unbalanced() {
        let mut arena: Arena<i32, (), i8> = Arena::new();
        let mut root = NodeId::NIL;
        let top = bst::attach(&mut arena, &mut root, NodeId::NIL, Side::Left, 1, (), -2);
        let middle = bst::attach(&mut arena, &mut root, top, Side::Right, 2, (), -1);
        bst::attach(&mut arena, &mut root, middle, Side::Right, 3, (), 0);
        assert_eq!(
            check_avl_balance(&arena, root),
            Err(InvariantViolation::Unbalanced {
                position: 0,
                factor: -2,
            })
        );
    }

    #[rstest]
    fn test_red_red_edge_is_reported() {
        let (mut arena, root) = triangle::<Color>();
        let left = arena.left(root);
        arena.set_meta(left, Color::Red);
        let mut scratch = root;
        bst::attach(&mut arena, &mut scratch, left, Side::Left, 0, (), Color::Red);
        assert_eq!(
            check_red_black(&arena, root),
            Err(InvariantViolation::RedRedViolation { position: 1 })
        );
    }

    #[rstest]
    fn test_black_height_mismatch_is_reported() {
        let (mut arena, root) = triangle::<Color>();
        let left = arena.left(root);
        let mut scratch = root;
        bst::attach(&mut arena, &mut scratch, left, Side::Left, 0, (), Color::Black);
        assert_eq!(
            check_red_black(&arena, root),
            Err(InvariantViolation::BlackHeightMismatch {
                position: 1,
                left: 1,
                right: 0,
            })
        );
    }

    #[rstest]
    fn test_red_root_is_reported() {
        let (mut arena, root) = triangle::<Color>();
        arena.set_meta(root, Color::Red);
        assert_eq!(
            check_red_black(&arena, root),
            Err(InvariantViolation::RedRoot)
        );
    }
}
