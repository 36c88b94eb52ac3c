//! The state every tree variant carries: arena, root and comparer.
//!
//! Read-only operations (lookup, extrema, traversal, height) are identical
//! across variants and live here. Mutation is left to the variants, which
//! combine the [`bst`](super::bst) primitives with their own fixup.

use super::TraversalOrder;
use super::arena::{Arena, NodeId};
use super::bst::{self, Placement};
use super::invariant::{self, InvariantViolation};
use super::iter::{Iter, Traverse};
use crate::comparer::Comparer;

#[derive(Clone, Debug)]
pub(crate) struct RawTree<K, V, M, C> {
    pub(crate) arena: Arena<K, V, M>,
    pub(crate) root: NodeId,
    pub(crate) comparer: C,
}

impl<K, V, M: Copy + Default, C> RawTree<K, V, M, C> {
    pub(crate) fn new(comparer: C) -> Self {
        Self {
            arena: Arena::new(),
            root: NodeId::NIL,
            comparer,
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.root = NodeId::NIL;
    }

    pub(crate) fn min_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(bst::minimum(&self.arena, self.root))
    }

    pub(crate) fn max_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(bst::maximum(&self.arena, self.root))
    }

    pub(crate) fn root_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(self.root)
    }

    pub(crate) fn height(&self) -> usize {
        bst::height(&self.arena, self.root)
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.entries_in(TraversalOrder::InOrder))
    }

    pub(crate) fn traverse(&self, order: TraversalOrder) -> Traverse<'_, K, V> {
        Traverse::new(self.entries_in(order))
    }

    fn entries_in(&self, order: TraversalOrder) -> Vec<(&K, &V)> {
        let arena = &self.arena;
        bst::collect(arena, self.root, order)
            .into_iter()
            .map(move |node| arena.entry(node))
            .collect()
    }

    #[inline]
    fn entry_at(&self, node: NodeId) -> Option<(&K, &V)> {
        (!node.is_nil()).then(|| self.arena.entry(node))
    }
}

impl<K, V, M: Copy + Default, C: Comparer<K>> RawTree<K, V, M, C> {
    #[inline]
    pub(crate) fn find(&self, key: &K) -> NodeId {
        bst::search(&self.arena, self.root, &self.comparer, key)
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let node = self.find(key);
        (!node.is_nil()).then(|| self.arena.value(node))
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.find(key);
        if node.is_nil() {
            None
        } else {
            Some(self.arena.value_mut(node))
        }
    }

    /// Stores `key` as a new leaf carrying `meta`, or replaces the value of
    /// an existing equal key in place.
    ///
    /// Returns the new leaf; `None` means only a value was replaced and no
    /// structure changed.
    pub(crate) fn insert_leaf(&mut self, key: K, value: V, meta: M) -> Option<NodeId> {
        match bst::locate(&self.arena, self.root, &self.comparer, &key) {
            Placement::Occupied(node) => {
                self.arena.replace_value(node, value);
                None
            }
            Placement::Vacant { parent, side } => Some(bst::attach(
                &mut self.arena,
                &mut self.root,
                parent,
                side,
                key,
                value,
                meta,
            )),
        }
    }

    /// Checks links, ordering and length; variant checks come on top.
    pub(crate) fn validate_structure(&self) -> Result<(), InvariantViolation> {
        invariant::check_links(&self.arena, self.root)?;
        invariant::check_order(&self.arena, self.root, &self.comparer)
    }
}
