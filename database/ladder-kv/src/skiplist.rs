//! Skip list with duplicate keys and a circular sentinel.
//!
//! ```text
//! level 1:  S ─────────────► 3 ─────────────────────► S
//! level 0:  S ─────► 2 ────► 3 ────────► 5 ─────────► S
//! base:     S ─► 1 ─► 2 ─► 3 ─► 3 ─► 4 ─► 5 ─► 5 ─► 7 ─► S
//! ```
//!
//! Every node sits on the base level. Express levels hold a random subset of
//! the nodes, in base order. The sentinel `S` starts and ends every chain, so
//! an empty list is the sentinel linked to itself at every level.
//!
//! Searches start at the sentinel's top level. At each level they move right
//! while the next key satisfies the bound, then drop a level, and they finish
//! with a scan along the base level.

use tracing::{debug, trace};

use crate::arena::Nodes;
use crate::error::SkipListError;
use crate::level::{GeometricLevels, LevelGenerator};
use crate::node::{Node, NodeId};
use crate::options::{Options, DEFAULT_LEVELS};

/// An ordered multimap with `LEVELS` express levels above the base level.
///
/// Equal keys are kept in insertion order. Nodes are addressed by [`NodeId`]
/// handles. [`find_last_less_than`](Self::find_last_less_than) may hand back
/// the sentinel, which [`NodeId::is_sentinel`] tells apart from data nodes.
#[derive(Debug)]
pub struct SkipList<K, V, G = GeometricLevels, const LEVELS: usize = { DEFAULT_LEVELS }> {
    nodes: Nodes<K, V, LEVELS>,
    levels: G,
}

/// Where a node is linked from, gathered before anything is unlinked.
struct Splice<const LEVELS: usize> {
    express: [Option<NodeId>; LEVELS],
    base: NodeId,
}

impl<K: Ord, V, const LEVELS: usize> SkipList<K, V, GeometricLevels, LEVELS> {
    /// Creates an empty list whose towers grow with probability `probability`, seeded from the OS.
    pub fn new(probability: f64) -> Self {
        Self::with_generator(GeometricLevels::from_entropy(probability))
    }

    /// Like [`new`](Self::new), but tower heights repeat from run to run.
    pub fn with_seed(probability: f64, seed: u64) -> Self {
        Self::with_generator(GeometricLevels::seeded(probability, seed))
    }

    pub fn with_options(options: Options) -> Self {
        let levels = match options.seed {
            Some(seed) => GeometricLevels::seeded(options.probability, seed),
            None => GeometricLevels::from_entropy(options.probability),
        };
        Self::with_capacity_and_generator(options.capacity, levels)
    }
}

impl<K: Ord, V, G: LevelGenerator, const LEVELS: usize> SkipList<K, V, G, LEVELS> {
    pub fn with_generator(levels: G) -> Self {
        Self::with_capacity_and_generator(0, levels)
    }

    pub fn with_capacity_and_generator(capacity: usize, levels: G) -> Self {
        debug!(levels = LEVELS, capacity, "created skip list");
        SkipList {
            nodes: Nodes::with_capacity(capacity),
            levels,
        }
    }

    /// Inserts `key` after every node already holding an equal key.
    ///
    /// Always succeeds. The returned handle stays valid until the node is removed.
    pub fn insert(&mut self, key: K, value: V) -> NodeId {
        let mut preds = [NodeId::SENTINEL; LEVELS];
        let mut cursor = NodeId::SENTINEL;
        for level in (0..LEVELS).rev() {
            cursor = self.jump_while(cursor, level, |k| *k <= key);
            preds[level] = cursor;
        }
        cursor = self.step_while(cursor, |k| *k <= key);

        let id = self.nodes.alloc(Node::new(key, value));
        let after = self.nodes[cursor].next;
        self.nodes[id].next = after;
        self.nodes[cursor].next = id;

        let height = self.levels.height(LEVELS).min(LEVELS);
        for (level, &pred) in preds.iter().enumerate().take(height) {
            let after = self.nodes[pred].next_jump[level];
            self.nodes[id].next_jump[level] = after;
            self.nodes[pred].next_jump[level] = id;
        }
        self.nodes[id].height = height;

        trace!(height, len = self.nodes.len(), "inserted node");
        id
    }
}

impl<K: Ord, V, G, const LEVELS: usize> SkipList<K, V, G, LEVELS> {
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The handle that marks "before the first node" and "after the last node".
    #[inline]
    pub fn sentinel(&self) -> NodeId {
        NodeId::SENTINEL
    }

    /// The first node in key order, `None` if the list is empty.
    pub fn first(&self) -> Option<NodeId> {
        let first = self.nodes.head().next;
        (!first.is_sentinel()).then_some(first)
    }

    /// Base-level successor of `id`, which is the sentinel after the last node.
    ///
    /// Returns `None` if `id` is stale.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.contains(id).then(|| self.nodes[id].next)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<K, V, LEVELS>> {
        self.nodes.get(id)
    }

    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.nodes.key(id)
    }

    pub fn value(&self, id: NodeId) -> Option<&V> {
        self.nodes.get(id).map(Node::value)
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.nodes.get_mut(id).map(|node| &mut node.value)
    }

    /// Express levels `id` is linked into. The sentinel is in all `LEVELS` of them.
    pub fn height(&self, id: NodeId) -> Option<usize> {
        self.nodes.contains(id).then(|| self.nodes[id].height)
    }

    /// Value of the first node holding `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_first(key).and_then(|id| self.value(id))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find_first(key)?;
        self.value_mut(id)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_first(key).is_some()
    }

    /// The first node in base order whose key equals `key`.
    ///
    /// Among duplicates this is always the earliest inserted one, whichever
    /// express levels the duplicates happen to occupy.
    pub fn find_first(&self, key: &K) -> Option<NodeId> {
        let next = self.nodes[self.descend_less(key)].next;
        match self.nodes.key(next) {
            Some(k) if k == key => Some(next),
            _ => None,
        }
    }

    /// The last node whose key is strictly less than `key`.
    ///
    /// Returns the sentinel when no such node exists, including on an empty list.
    pub fn find_last_less_than(&self, key: &K) -> NodeId {
        self.descend_less(key)
    }

    /// Removes the node that follows `before` on the base level.
    ///
    /// `before` may be the sentinel, which removes the first node. Fails with
    /// [`SkipListError::InvalidArgument`] if `before` is stale or is the last
    /// node. Fails with [`SkipListError::NotFound`] if the successor cannot be
    /// reached by a search for its key. No links are changed when it fails.
    pub fn remove_next(&mut self, before: NodeId) -> Result<(K, V), SkipListError> {
        if !self.nodes.contains(before) {
            debug!(?before, "rejected remove of stale predecessor");
            return Err(SkipListError::InvalidArgument(
                "predecessor is not a live node",
            ));
        }
        let target = self.nodes[before].next;
        if target.is_sentinel() {
            return Err(SkipListError::InvalidArgument("can't remove the sentinel"));
        }

        let splice = self.locate(target)?;
        self.unlink(target, &splice)
    }

    /// Removes the first node holding `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let before = self.descend_less(key);
        let next = self.nodes[before].next;
        if self.nodes.key(next) != Some(key) {
            return None;
        }
        self.remove_next(before).ok().map(|(_, value)| value)
    }

    /// Removes the node behind `id`, wherever it sits among equal keys.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(K, V), SkipListError> {
        let key = self
            .nodes
            .key(id)
            .ok_or(SkipListError::InvalidArgument("node is not a live data node"))?;
        let mut before = self.descend_less(key);
        loop {
            let next = self.nodes[before].next;
            if next == id {
                break;
            }
            match self.nodes.key(next) {
                Some(k) if k == key => before = next,
                _ => return Err(SkipListError::NotFound),
            }
        }
        self.remove_next(before)
    }

    /// Drops every node. Outstanding handles go stale.
    pub fn clear(&mut self) {
        debug!(len = self.nodes.len(), "clearing skip list");
        self.nodes.clear();
    }

    pub(crate) fn nodes(&self) -> &Nodes<K, V, LEVELS> {
        &self.nodes
    }

    /// Last node at or after `cursor` on `level` reachable while `advance` holds.
    #[inline]
    fn jump_while(
        &self,
        mut cursor: NodeId,
        level: usize,
        advance: impl Fn(&K) -> bool,
    ) -> NodeId {
        loop {
            let next = self.nodes[cursor].next_jump[level];
            match self.nodes.key(next) {
                Some(k) if advance(k) => cursor = next,
                _ => return cursor,
            }
        }
    }

    #[inline]
    fn step_while(&self, mut cursor: NodeId, advance: impl Fn(&K) -> bool) -> NodeId {
        loop {
            let next = self.nodes[cursor].next;
            match self.nodes.key(next) {
                Some(k) if advance(k) => cursor = next,
                _ => return cursor,
            }
        }
    }

    fn descend_less(&self, key: &K) -> NodeId {
        let mut cursor = NodeId::SENTINEL;
        for level in (0..LEVELS).rev() {
            cursor = self.jump_while(cursor, level, |k| k < key);
        }
        self.step_while(cursor, |k| k < key)
    }

    /// Finds every link that points at `target`, without touching any of them.
    fn locate(&self, target: NodeId) -> Result<Splice<LEVELS>, SkipListError> {
        let key = self.nodes.key(target).ok_or(SkipListError::NotFound)?;
        let mut express = [None; LEVELS];

        let mut cursor = NodeId::SENTINEL;
        for level in (0..LEVELS).rev() {
            cursor = self.jump_while(cursor, level, |k| k < key);
            // Equal keys may sit ahead of the target on this level.
            let mut probe = cursor;
            loop {
                let next = self.nodes[probe].next_jump[level];
                if next == target {
                    express[level] = Some(probe);
                    break;
                }
                match self.nodes.key(next) {
                    Some(k) if k == key => probe = next,
                    _ => break,
                }
            }
        }

        let mut base = self.step_while(cursor, |k| k < key);
        loop {
            let next = self.nodes[base].next;
            if next == target {
                break;
            }
            match self.nodes.key(next) {
                Some(k) if k == key => base = next,
                _ => return Err(SkipListError::NotFound),
            }
        }

        let height = self.nodes[target].height;
        if express[..height].iter().any(Option::is_none) {
            return Err(SkipListError::NotFound);
        }
        Ok(Splice { express, base })
    }

    fn unlink(
        &mut self,
        target: NodeId,
        splice: &Splice<LEVELS>,
    ) -> Result<(K, V), SkipListError> {
        for (level, pred) in splice.express.iter().enumerate() {
            if let Some(pred) = *pred {
                let after = self.nodes[target].next_jump[level];
                self.nodes[pred].next_jump[level] = after;
            }
        }
        let after = self.nodes[target].next;
        self.nodes[splice.base].next = after;

        let node = self.nodes.release(target).ok_or(SkipListError::NotFound)?;
        trace!(height = node.height(), len = self.nodes.len(), "removed node");
        Ok(node.into_entry())
    }
}
