//! Skip list nodes and the handles that address them.

use crate::arena::HEAD;

/// A handle to a node stored in a [`SkipList`](crate::SkipList).
///
/// Handles stay valid until their node is removed. A removed node's slot may be
/// reused, but the generation changes, so an old handle never resolves to the
/// new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    /// The sentinel that sits before the first node and after the last one, at every level.
    pub const SENTINEL: NodeId = NodeId {
        index: HEAD,
        generation: 0,
    };

    /// `true` if this handle names the sentinel rather than a data node.
    #[inline]
    pub fn is_sentinel(self) -> bool {
        self.index == HEAD
    }
}

/// Forward links of one node.
///
/// `next` is the base level, which every node is on. `next_jump[l]` is the
/// express link at level `l`. It is only meaningful for `l < height`; the
/// rest point at the sentinel.
#[derive(Debug, Clone)]
pub(crate) struct Links<const LEVELS: usize> {
    pub(crate) next: NodeId,
    pub(crate) next_jump: [NodeId; LEVELS],
    pub(crate) height: usize,
}

impl<const LEVELS: usize> Links<LEVELS> {
    fn detached() -> Self {
        Links {
            next: NodeId::SENTINEL,
            next_jump: [NodeId::SENTINEL; LEVELS],
            height: 0,
        }
    }

    /// The sentinel's links: an empty circle at every level.
    pub(crate) fn sentinel() -> Self {
        Links {
            next: NodeId::SENTINEL,
            next_jump: [NodeId::SENTINEL; LEVELS],
            height: LEVELS,
        }
    }

    fn reset(&mut self) {
        self.next_jump = [NodeId::SENTINEL; LEVELS];
        self.height = 0;
    }
}

/// One key/value pair plus its tower of forward links.
#[derive(Debug, Clone)]
pub struct Node<K, V, const LEVELS: usize> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) links: Links<LEVELS>,
}

impl<K, V, const LEVELS: usize> Node<K, V, LEVELS> {
    pub fn new(key: K, value: V) -> Self {
        let mut node = Node {
            key,
            value,
            links: Links::detached(),
        };
        node.reset();
        node
    }

    /// Creates a node with a default value.
    pub fn with_key(key: K) -> Self
    where
        V: Default,
    {
        Self::new(key, V::default())
    }

    /// Points every express link at the sentinel and drops the node back to
    /// the base level only.
    pub fn reset(&mut self) {
        self.links.reset();
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Number of express levels this node is linked into.
    #[inline]
    pub fn height(&self) -> usize {
        self.links.height
    }

    /// Highest express level this node occupies, `None` if it lives on the base level only.
    #[inline]
    pub fn level_highest(&self) -> Option<usize> {
        self.links.height.checked_sub(1)
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: Default, V: Default, const LEVELS: usize> Default for Node<K, V, LEVELS> {
    fn default() -> Self {
        Self::new(K::default(), V::default())
    }
}
