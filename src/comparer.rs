//! Total orders over keys.
//!
//! A [`Comparer`] decides where a key lives in a tree. Trees never use the
//! native ordering operators directly; every comparison goes through the
//! comparer they were built with.
//!
//! - [`NaturalOrder`]: the key type's own [`Ord`] implementation
//! - [`Reversed`]: inverts any other comparer
//! - closures of type `Fn(&K, &K) -> Ordering` are comparers too
//!
//! # Contract
//!
//! A comparer must be a total order: antisymmetric, transitive and
//! consistent between calls. Nothing checks this. A comparer that breaks the
//! contract leaves the tree in an unspecified (but memory-safe) shape.
//!
//! # Examples
//!
//! ```rust
//! use ordered_trees::{AvlTree, Reversed, NaturalOrder};
//!
//! let mut descending = AvlTree::with_comparer(Reversed(NaturalOrder));
//! descending.insert(1, 'a').insert(3, 'c').insert(2, 'b');
//!
//! let keys: Vec<&i32> = descending.keys().collect();
//! assert_eq!(keys, vec![&3, &2, &1]);
//! ```

use std::cmp::Ordering;

/// A total order over keys of type `K`.
pub trait Comparer<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &K, right: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparer<K> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

/// Inverts the wrapped comparer.
///
/// # Examples
///
/// ```rust
/// use ordered_trees::{Comparer, NaturalOrder, Reversed};
/// use std::cmp::Ordering;
///
/// assert_eq!(Reversed(NaturalOrder).compare(&1, &2), Ordering::Greater);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparer<K>> Comparer<K> for Reversed<C> {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self.0.compare(right, left)
    }
}

impl<K: ?Sized, F> Comparer<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self(left, right)
    }
}
