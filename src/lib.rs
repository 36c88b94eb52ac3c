//! # ordered-trees
//!
//! Ordered maps backed by binary search trees.
//!
//! ## Overview
//!
//! Every map in this crate associates unique keys with values and keeps its
//! entries sorted under a [`Comparer`]. Three variants share one node arena
//! and one set of structural primitives:
//!
//! - [`BinarySearchTree`]: unbalanced; shape depends on insertion order
//! - [`AvlTree`]: height-balanced, `|height(left) - height(right)| <= 1`
//! - [`RedBlackTree`]: color-balanced with a shared black sentinel leaf
//!
//! All three expose the same surface through [`SearchTree`], so code can be
//! written once against the trait and run on any variant.
//!
//! ## Feature Flags
//!
//! - `tracing` (default): emit `trace`/`debug` events for rotations, fixup
//!   cases and structural splices through the `tracing` crate
//!
//! ## Example
//!
//! ```rust
//! use ordered_trees::prelude::*;
//!
//! let mut tree = AvlTree::new();
//! tree.insert(2, "two").insert(1, "one").insert(3, "three");
//!
//! assert_eq!(tree.get(&1), Some(&"one"));
//! assert_eq!(tree.to_string(), "one | two | three");
//! assert!(tree.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: tree internals are `pub(crate)` inside private modules
#![allow(clippy::redundant_pub_crate)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use ordered_trees::prelude::*;
/// ```
pub mod prelude {
    pub use crate::comparer::*;
    pub use crate::tree::*;
}

mod log;

pub mod comparer;
pub mod tree;

pub use comparer::{Comparer, NaturalOrder, Reversed};
pub use tree::{
    AvlTree, BinarySearchTree, Color, InvariantViolation, RedBlackTree, SearchTree,
    TraversalOrder,
};
