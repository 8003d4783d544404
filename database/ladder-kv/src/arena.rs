// Copyright 2024 Cloudflare, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Slot storage for skip list nodes.
//!
//! The sentinel lives outside the slot vector at [`HEAD`]; data nodes start at
//! [`OFFSET`]. Freed slots are recycled through a free list, and every reuse
//! bumps the slot's generation so outstanding [`NodeId`]s go stale instead of
//! aliasing the new node.

use crate::node::{Links, Node, NodeId};

pub(crate) const HEAD: usize = 0;
const OFFSET: usize = 1;

#[derive(Debug)]
struct Slot<K, V, const LEVELS: usize> {
    generation: u32,
    node: Option<Node<K, V, LEVELS>>,
}

#[derive(Debug)]
pub(crate) struct Nodes<K, V, const LEVELS: usize> {
    head: Links<LEVELS>,
    slots: Vec<Slot<K, V, LEVELS>>,
    free: Vec<usize>,
}

impl<K, V, const LEVELS: usize> Nodes<K, V, LEVELS> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Nodes {
            head: Links::sentinel(),
            slots: Vec::with_capacity(capacity),
            free: vec![],
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<K, V, LEVELS>) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index - OFFSET];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: self.slots.len() - 1 + OFFSET,
                generation: 0,
            }
        }
    }

    /// Takes the node out of its slot. The caller must already have unlinked it.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<Node<K, V, LEVELS>> {
        let slot = self.slot_mut(id)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots ever handed out, live or free.
    pub(crate) fn capacity_used(&self) -> usize {
        self.slots.len()
    }

    /// `true` for the sentinel and for any live data node.
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id == NodeId::SENTINEL || self.get(id).is_some()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V, LEVELS>> {
        if id.is_sentinel() {
            return None;
        }
        let slot = self.slots.get(id.index - OFFSET)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V, LEVELS>> {
        self.slot_mut(id)?.node.as_mut()
    }

    /// Key of a data node. The sentinel has none, which is what ends every scan.
    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> Option<&K> {
        self.get(id).map(|node| &node.key)
    }

    pub(crate) fn head(&self) -> &Links<LEVELS> {
        &self.head
    }

    /// Drops every node but keeps the slots, so generations keep counting and
    /// handles from before the clear stay stale.
    pub(crate) fn clear(&mut self) {
        self.head = Links::sentinel();
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index + OFFSET);
        }
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot<K, V, LEVELS>> {
        if id.is_sentinel() {
            return None;
        }
        let slot = self.slots.get_mut(id.index - OFFSET)?;
        if slot.generation != id.generation {
            return None;
        }
        Some(slot)
    }
}

impl<K, V, const LEVELS: usize> std::ops::Index<NodeId> for Nodes<K, V, LEVELS> {
    type Output = Links<LEVELS>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match id.index {
            HEAD => &self.head,
            _ => match self.get(id) {
                Some(node) => &node.links,
                None => panic!("stale node id {:?}", id),
            },
        }
    }
}

impl<K, V, const LEVELS: usize> std::ops::IndexMut<NodeId> for Nodes<K, V, LEVELS> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match id.index {
            HEAD => &mut self.head,
            _ => match self.get_mut(id) {
                Some(node) => &mut node.links,
                None => panic!("stale node id {:?}", id),
            },
        }
    }
}
