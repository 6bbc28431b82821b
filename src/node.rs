//! Heap nodes and the arena that owns them
//!
//! A [`Node`] pairs a 64-bit sort key with a caller-defined payload. Nodes are
//! owned by a [`NodeArena`], a generational slot map, and are named by
//! [`NodeKey`] handles. Heaps store handles only, so the caller can read a
//! node's current key or payload through the arena whether or not the node is
//! sitting in a heap.
//!
//! # Handles
//!
//! `NodeKey` is `Copy` and carries a generation. Once a node is removed from
//! its arena, every copy of its handle goes stale: lookups return `None`, and
//! a later node reusing the same slot gets a different key.
//!
//! # Example
//!
//! ```rust
//! use rust_keyed_heap::{NodeArena, PriorityHeap};
//!
//! let mut arena = NodeArena::new();
//! let mut heap = PriorityHeap::new();
//!
//! let job = arena.insert("compact logs");
//! heap.add(&mut arena, job, 30).unwrap();
//!
//! assert_eq!(arena.value(job), Some(30));
//! assert_eq!(arena.payload(job), Some(&"compact logs"));
//! ```

use std::fmt;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle naming a node in a [`NodeArena`]
    pub struct NodeKey;
}

/// A sort key plus caller payload.
///
/// The key is written only by [`PriorityHeap::add`](crate::heap::PriorityHeap::add);
/// callers read it through [`Node::value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<T> {
    value: i64,
    payload: T,
}

impl<T> Node<T> {
    fn new(payload: T) -> Self {
        Self { value: 0, payload }
    }

    /// The key this node was last added to a heap with (0 if never added).
    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[inline]
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Owner of every node a heap may refer to.
///
/// One arena can back several heaps. Keeping a node in at most one heap at a
/// time is up to the caller.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Creates a node holding `payload` with key 0 and returns its handle.
    pub fn insert(&mut self, payload: T) -> NodeKey {
        self.nodes.insert(Node::new(payload))
    }

    /// Removes a node and returns its payload.
    ///
    /// A heap still holding `key` keeps the stale handle until it is popped
    /// or cleared; the arena will not resolve it again.
    pub fn remove(&mut self, key: NodeKey) -> Option<T> {
        self.nodes.remove(key).map(Node::into_payload)
    }

    #[inline]
    pub fn get(&self, key: NodeKey) -> Option<&Node<T>> {
        self.nodes.get(key)
    }

    #[inline]
    pub fn payload(&self, key: NodeKey) -> Option<&T> {
        self.nodes.get(key).map(Node::payload)
    }

    #[inline]
    pub fn payload_mut(&mut self, key: NodeKey) -> Option<&mut T> {
        self.nodes.get_mut(key).map(Node::payload_mut)
    }

    #[inline]
    pub fn value(&self, key: NodeKey) -> Option<i64> {
        self.nodes.get(key).map(Node::value)
    }

    #[inline]
    pub fn contains_key(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Writes the node's key. Returns false if `key` is stale.
    pub(crate) fn set_value(&mut self, key: NodeKey, value: i64) -> bool {
        match self.nodes.get_mut(key) {
            Some(node) => {
                node.value = value;
                true
            }
            None => false,
        }
    }
}
