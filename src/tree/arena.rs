//! Index-based node storage shared by every tree variant.
//!
//! Nodes live in one dense `Vec`; links between them are [`NodeId`]s. A tree
//! owns its arena exclusively, and `parent` links are plain indices, so there
//! are no reference cycles and cloning the arena deep-copies the whole graph.
//!
//! [`NodeId::NIL`] marks an absent child or parent. It also names the
//! arena's sentinel: a [`Links`] record that is never stored in the node
//! vector but can be read and written like any other node's links. The
//! red-black tree relies on this (its fixup reads the sentinel's color and
//! parent); the other variants simply never look at it.

use std::fmt;

// =============================================================================
// NodeId
// =============================================================================

/// Position of a node inside an [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    /// The absent node / sentinel identity.
    pub(crate) const NIL: Self = Self(usize::MAX);

    #[inline]
    pub(crate) const fn is_nil(self) -> bool {
        self.0 == usize::MAX
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(formatter, "NIL")
        } else {
            write!(formatter, "#{}", self.0)
        }
    }
}

// =============================================================================
// Side
// =============================================================================

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// =============================================================================
// Links and Node
// =============================================================================

/// Structural links plus per-variant balance metadata.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Links<M> {
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) meta: M,
}

impl<M> Links<M> {
    const fn detached(parent: NodeId, meta: M) -> Self {
        Self {
            parent,
            left: NodeId::NIL,
            right: NodeId::NIL,
            meta,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V, M> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) links: Links<M>,
}

// =============================================================================
// Arena
// =============================================================================

#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V, M> {
    nodes: Vec<Node<K, V, M>>,
    sentinel: Links<M>,
}

impl<K, V, M: Copy + Default> Arena<K, V, M> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            sentinel: Links::detached(NodeId::NIL, M::default()),
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.sentinel = Links::detached(NodeId::NIL, M::default());
    }

    /// Stores a new childless node under `parent` and returns its id.
    ///
    /// The caller is responsible for pointing `parent`'s child slot at it.
    pub(crate) fn allocate(&mut self, key: K, value: V, parent: NodeId, meta: M) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key,
            value,
            links: Links::detached(parent, meta),
        });
        id
    }

    /// Removes a node that is no longer linked into the tree.
    ///
    /// The last node in the vector is moved into the freed slot; its parent,
    /// its children, the sentinel and `root` are repointed to the new id.
    pub(crate) fn release(&mut self, id: NodeId, root: &mut NodeId) -> (K, V) {
        let last = NodeId(self.nodes.len() - 1);
        let node = self.nodes.swap_remove(id.0);

        if last != id {
            let moved = self.nodes[id.0].links;
            if *root == last {
                *root = id;
            }
            if !moved.parent.is_nil() {
                if self.left(moved.parent) == last {
                    self.set_left(moved.parent, id);
                } else if self.right(moved.parent) == last {
                    self.set_right(moved.parent, id);
                }
            }
            if !moved.left.is_nil() {
                self.set_parent(moved.left, id);
            }
            if !moved.right.is_nil() {
                self.set_parent(moved.right, id);
            }
            if self.sentinel.parent == last {
                self.sentinel.parent = id;
            }
        }

        (node.key, node.value)
    }

    // -------------------------------------------------------------------------
    // Payload access
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> &K {
        &self.nodes[id.0].key
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &V {
        &self.nodes[id.0].value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.nodes[id.0].value
    }

    #[inline]
    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = &self.nodes[id.0];
        (&node.key, &node.value)
    }

    /// Replaces the value stored at `id`, returning the old one.
    pub(crate) fn replace_value(&mut self, id: NodeId, value: V) -> V {
        std::mem::replace(&mut self.nodes[id.0].value, value)
    }

    // -------------------------------------------------------------------------
    // Link access
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn links(&self, id: NodeId) -> &Links<M> {
        if id.is_nil() {
            &self.sentinel
        } else {
            &self.nodes[id.0].links
        }
    }

    #[inline]
    fn links_mut(&mut self, id: NodeId) -> &mut Links<M> {
        if id.is_nil() {
            &mut self.sentinel
        } else {
            &mut self.nodes[id.0].links
        }
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.links(id).parent
    }

    #[inline]
    pub(crate) fn left(&self, id: NodeId) -> NodeId {
        self.links(id).left
    }

    #[inline]
    pub(crate) fn right(&self, id: NodeId) -> NodeId {
        self.links(id).right
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> NodeId {
        match side {
            Side::Left => self.left(id),
            Side::Right => self.right(id),
        }
    }

    #[inline]
    pub(crate) fn meta(&self, id: NodeId) -> M {
        self.links(id).meta
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.links_mut(id).parent = parent;
    }

    #[inline]
    pub(crate) fn set_left(&mut self, id: NodeId, left: NodeId) {
        self.links_mut(id).left = left;
    }

    #[inline]
    pub(crate) fn set_right(&mut self, id: NodeId, right: NodeId) {
        self.links_mut(id).right = right;
    }

    #[inline]
    pub(crate) fn set_child(&mut self, id: NodeId, side: Side, child: NodeId) {
        match side {
            Side::Left => self.set_left(id, child),
            Side::Right => self.set_right(id, child),
        }
    }

    #[inline]
    pub(crate) fn set_meta(&mut self, id: NodeId, meta: M) {
        self.links_mut(id).meta = meta;
    }

    /// Which child slot of its parent `id` occupies.
    ///
    /// Only meaningful for a node that has a parent; for the sentinel the
    /// answer depends on which of the parent's slots is empty.
    #[inline]
    pub(crate) fn side_of(&self, id: NodeId) -> Side {
        if self.left(self.parent(id)) == id {
            Side::Left
        } else {
            Side::Right
        }
    }
}
