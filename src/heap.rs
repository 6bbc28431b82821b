//! Binary heap over 64-bit keys
//!
//! [`PriorityHeap`] is a complete binary tree stored in a flat, zero-indexed
//! `Vec`. The children of slot `i` live at `2i + 1` and `2i + 2`. The root is
//! always the smallest key (min heap) or the largest key (max heap).
//!
//! The heap stores [`NodeKey`] handles into a caller-owned [`NodeArena`],
//! together with a copy of the key each node was added with. Sifting never
//! touches the arena; only [`PriorityHeap::add`] (which writes the node's key)
//! and [`PriorityHeap::contains`] (which may compare payloads) need it.
//!
//! # Caller responsibilities
//!
//! A node must not be added to a heap it is already in, or to two heaps at
//! once. This is not checked: doing it duplicates the handle and the heap
//! will hand it out twice. The heap stays memory-safe, but its ordering
//! guarantees no longer describe what the caller meant.
//!
//! # Time Complexity
//!
//! | Operation  | Complexity         |
//! |------------|--------------------|
//! | `add`      | O(log n) amortized |
//! | `pop`      | O(log n)           |
//! | `peek`     | O(1)               |
//! | `contains` | O(n)               |
//! | `clear`    | O(n)               |
//!
//! # Example
//!
//! ```rust
//! use rust_keyed_heap::{HeapOrder, NodeArena, PriorityHeap};
//!
//! let mut arena = NodeArena::new();
//! let mut heap = PriorityHeap::with_capacity(4, HeapOrder::Min);
//!
//! for (name, at) in [("c", 30), ("a", 10), ("b", 20)] {
//!     let node = arena.insert(name);
//!     heap.add(&mut arena, node, at).unwrap();
//! }
//!
//! assert_eq!(heap.to_string(), "[10, 30, 20]");
//!
//! let first = heap.pop().unwrap();
//! assert_eq!(arena.payload(first), Some(&"a"));
//! assert_eq!(heap.peek_value(), Some(20));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::config::{HeapConfig, HeapOrder, DEFAULT_INITIAL_CAPACITY};
use crate::error::{HeapError, Result};
use crate::node::{NodeArena, NodeKey};

/// One occupied position in the backing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    value: i64,
    key: NodeKey,
}

/// An array-backed binary heap of node handles ordered by `i64` keys.
///
/// `T` is the payload type of the [`NodeArena`] the handles point into.
///
/// Equality, hashing and `Display` all look at the keys in slot order, so two
/// heaps holding the same keys in different layouts are *not* equal.
pub struct PriorityHeap<T> {
    slots: Vec<Slot>,
    order: HeapOrder,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PriorityHeap<T> {
    /// Creates a min heap with room for 16 nodes.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY, HeapOrder::Min)
    }

    /// Creates a heap with room for `initial_capacity` nodes (at least 1).
    pub fn with_capacity(initial_capacity: usize, order: HeapOrder) -> Self {
        if initial_capacity == 0 {
            debug!("initial heap capacity 0 clamped to 1");
        }
        Self {
            slots: Vec::with_capacity(initial_capacity.max(1)),
            order,
            _marker: PhantomData,
        }
    }

    pub fn from_config(config: &HeapConfig) -> Self {
        Self::with_capacity(config.initial_capacity, config.order)
    }

    #[inline]
    pub fn order(&self) -> HeapOrder {
        self.order
    }

    #[inline]
    pub fn is_max_heap(&self) -> bool {
        self.order == HeapOrder::Max
    }

    /// Number of nodes currently in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if the heap has one or more nodes.
    #[inline]
    pub fn not_empty(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Number of slots allocated. Grows by doubling, never shrinks.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Sets the node's key to `value` and adds it to the heap.
    ///
    /// Returns `node` back for chaining.
    ///
    /// The node must not already be in this heap or any other heap; see the
    /// module docs.
    ///
    /// # Errors
    /// Returns `HeapError::InvalidArgument` if `node` is not live in `arena`.
    pub fn add(
        &mut self,
        arena: &mut NodeArena<T>,
        node: NodeKey,
        value: i64,
    ) -> Result<NodeKey> {
        if !arena.set_value(node, value) {
            return Err(HeapError::InvalidArgument("node is not live in the arena"));
        }

        let len = self.slots.len();
        if len == self.slots.capacity() {
            self.slots.reserve_exact(len);
            trace!(from = len, to = self.slots.capacity(), "grew heap storage");
        }

        self.slots.push(Slot { value, key: node });
        self.sift_up(len);
        Ok(node)
    }

    /// Returns the root: the node with the lowest key, or the highest key in
    /// a max heap.
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if there are no nodes.
    pub fn peek(&self) -> Result<NodeKey> {
        self.peek_or_none().ok_or(HeapError::EmptyHeap)
    }

    /// Returns the root, or `None` if the heap is empty.
    #[inline]
    pub fn peek_or_none(&self) -> Option<NodeKey> {
        self.slots.first().map(|slot| slot.key)
    }

    /// Returns the key of the root, or `None` if the heap is empty.
    #[inline]
    pub fn peek_value(&self) -> Option<i64> {
        self.slots.first().map(|slot| slot.value)
    }

    /// Removes the root and returns it.
    ///
    /// The node itself stays in its arena with its key unchanged.
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if there are no nodes.
    pub fn pop(&mut self) -> Result<NodeKey> {
        let last = self.slots.pop().ok_or(HeapError::EmptyHeap)?;
        if self.slots.is_empty() {
            return Ok(last.key);
        }

        let root = std::mem::replace(&mut self.slots[0], last);
        self.sift_down(0);
        Ok(root.key)
    }

    /// Pops the root if its key has reached `deadline`.
    ///
    /// In a min heap the root is due when `value <= deadline`; in a max heap
    /// when `value >= deadline`. Returns `None` and leaves the heap alone if
    /// it is empty or the root is not due yet. Useful for draining a timer
    /// queue up to the current clock:
    ///
    /// ```rust
    /// use rust_keyed_heap::{NodeArena, PriorityHeap};
    ///
    /// let mut arena = NodeArena::new();
    /// let mut timers = PriorityHeap::new();
    /// for at in [5, 15, 10] {
    ///     let node = arena.insert(at);
    ///     timers.add(&mut arena, node, at).unwrap();
    /// }
    ///
    /// let mut fired = Vec::new();
    /// while let Some(node) = timers.pop_if_due(12) {
    ///     fired.push(arena.value(node).unwrap());
    /// }
    /// assert_eq!(fired, vec![5, 10]);
    /// assert_eq!(timers.len(), 1);
    /// ```
    pub fn pop_if_due(&mut self, deadline: i64) -> Option<NodeKey> {
        let value = self.peek_value()?;
        if !self.order.is_due(value, deadline) {
            return None;
        }
        self.pop().ok()
    }

    /// Returns true if the heap contains `node`.
    ///
    /// With `identity` set, handles are compared. Otherwise payloads are
    /// compared with `PartialEq`, so a distinct node with an equal payload
    /// also matches. Only live slots are scanned.
    ///
    /// # Errors
    /// Returns `HeapError::InvalidArgument` if `node` is not live in `arena`.
    pub fn contains(
        &self,
        arena: &NodeArena<T>,
        node: NodeKey,
        identity: bool,
    ) -> Result<bool>
    where
        T: PartialEq,
    {
        let needle = arena
            .get(node)
            .ok_or(HeapError::InvalidArgument("node cannot be absent"))?;

        if identity {
            return Ok(self.slots.iter().any(|slot| slot.key == node));
        }

        Ok(self
            .slots
            .iter()
            .filter_map(|slot| arena.get(slot.key))
            .any(|other| other.payload() == needle.payload()))
    }

    /// Removes every node from the heap. Capacity is kept.
    pub fn clear(&mut self) {
        if !self.slots.is_empty() {
            debug!(len = self.slots.len(), "clearing heap");
        }
        self.slots.clear();
    }

    /// Handles in slot order, root first.
    pub fn iter(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.slots.iter().map(|slot| slot.key)
    }

    /// Keys in slot order, root first.
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.slots.iter().map(|slot| slot.value)
    }

    /// Move the entry at `index` toward the root until its parent is no worse.
    fn sift_up(&mut self, mut index: usize) {
        let slot = self.slots[index];
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.order.outranks(slot.value, self.slots[parent].value) {
                break;
            }
            self.slots[index] = self.slots[parent];
            index = parent;
        }
        self.slots[index] = slot;
    }

    /// Move the entry at `index` away from the root until no child beats it.
    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        let slot = self.slots[index];
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;

            // A missing right child never wins.
            let child = if right < len
                && !self
                    .order
                    .prefers_left(self.slots[left].value, self.slots[right].value)
            {
                right
            } else {
                left
            };

            if !self.order.outranks(self.slots[child].value, slot.value) {
                break;
            }
            self.slots[index] = self.slots[child];
            index = child;
        }
        self.slots[index] = slot;
    }
}

impl<T> Default for PriorityHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PriorityHeap<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            order: self.order,
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for PriorityHeap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slots.len() == other.slots.len() && self.values().eq(other.values())
    }
}

impl<T> Eq for PriorityHeap<T> {}

impl<T> Hash for PriorityHeap<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.slots.len());
        for value in self.values() {
            value.hash(state);
        }
    }
}

impl<T> fmt::Display for PriorityHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

impl<T> fmt::Debug for PriorityHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityHeap")
            .field("order", &self.order)
            .field("values", &self.values().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap_of(order: HeapOrder, values: &[i64]) -> (NodeArena<i64>, PriorityHeap<i64>) {
        let mut arena = NodeArena::new();
        let mut heap = PriorityHeap::with_capacity(DEFAULT_INITIAL_CAPACITY, order);
        for &value in values {
            let node = arena.insert(value);
            heap.add(&mut arena, node, value).unwrap();
        }
        (arena, heap)
    }

    fn drain(heap: &mut PriorityHeap<i64>) -> Vec<i64> {
        let mut out = Vec::new();
        while let Some(value) = heap.peek_value() {
            heap.pop().unwrap();
            out.push(value);
        }
        out
    }

    fn assert_heap_property(heap: &PriorityHeap<i64>) {
        let values: Vec<i64> = heap.values().collect();
        for i in 1..values.len() {
            let parent = (i - 1) / 2;
            assert!(
                !heap.order().outranks(values[i], values[parent]),
                "slot {i} ({}) beats its parent ({})",
                values[i],
                values[parent]
            );
        }
    }

    #[test]
    fn test_basic_operations() {
        let (_arena, mut heap) = heap_of(HeapOrder::Min, &[5, 1, 8, 3, 1]);

        assert!(heap.not_empty());
        assert_eq!(heap.len(), 5);
        assert_heap_property(&heap);
        assert_eq!(drain(&mut heap), vec![1, 1, 3, 5, 8]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_max_heap() {
        let (_arena, mut heap) = heap_of(HeapOrder::Max, &[5, 1, 8, 3, 1]);

        assert!(heap.is_max_heap());
        assert_heap_property(&heap);
        assert_eq!(drain(&mut heap), vec![8, 5, 3, 1, 1]);
    }

    #[test]
    fn test_sift_up_layout() {
        let (_arena, heap) = heap_of(HeapOrder::Min, &[30, 10, 20]);
        assert_eq!(heap.to_string(), "[10, 30, 20]");

        let (_arena, heap) = heap_of(HeapOrder::Max, &[10, 30, 20]);
        assert_eq!(heap.to_string(), "[30, 10, 20]");
    }

    #[test]
    fn test_equal_keys_do_not_sift() {
        let mut arena = NodeArena::new();
        let mut heap = PriorityHeap::with_capacity(4, HeapOrder::Max);
        let first = arena.insert(1);
        let second = arena.insert(2);
        heap.add(&mut arena, first, 7).unwrap();
        heap.add(&mut arena, second, 7).unwrap();

        // The earlier node keeps the root
        assert_eq!(heap.peek(), Ok(first));
    }

    #[test]
    fn test_equal_children_tie_break() {
        let mut arena = NodeArena::new();
        let mut heap = PriorityHeap::with_capacity(4, HeapOrder::Min);
        let nodes: Vec<NodeKey> = [0, 2, 2, 5]
            .into_iter()
            .map(|value| {
                let node = arena.insert(value);
                heap.add(&mut arena, node, value).unwrap();
                node
            })
            .collect();
        assert_eq!(heap.to_string(), "[0, 2, 2, 5]");

        // Min heap: the right one of two equal children is promoted
        heap.pop().unwrap();
        assert_eq!(heap.to_string(), "[2, 2, 5]");
        assert_eq!(heap.peek(), Ok(nodes[2]));

        let mut heap = PriorityHeap::with_capacity(4, HeapOrder::Max);
        let nodes: Vec<NodeKey> = [9, 3, 3, 1]
            .into_iter()
            .map(|value| {
                let node = arena.insert(value);
                heap.add(&mut arena, node, value).unwrap();
                node
            })
            .collect();

        // Max heap: the left one wins
        heap.pop().unwrap();
        assert_eq!(heap.to_string(), "[3, 1, 3]");
        assert_eq!(heap.peek(), Ok(nodes[1]));
    }

    #[test]
    fn test_peek_then_pop_same_node() {
        let (_arena, mut heap) = heap_of(HeapOrder::Min, &[4, 2, 6]);

        let peeked = heap.peek().unwrap();
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.pop(), Ok(peeked));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_empty_heap_errors() {
        let mut heap: PriorityHeap<()> = PriorityHeap::new();

        assert_eq!(heap.peek(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.pop(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.peek_or_none(), None);
        assert_eq!(heap.pop_if_due(i64::MAX), None);
        assert!(heap.is_empty());
        assert!(!heap.not_empty());
    }

    #[test]
    fn test_capacity_clamped_and_doubled() {
        let mut arena = NodeArena::new();
        let mut heap = PriorityHeap::with_capacity(0, HeapOrder::Min);
        assert!(heap.capacity() >= 1);

        let mut last_capacity = heap.capacity();
        for value in (0..40).rev() {
            let node = arena.insert(value);
            heap.add(&mut arena, node, value).unwrap();
            assert!(heap.capacity() >= last_capacity);
            last_capacity = heap.capacity();
        }
        assert!(heap.capacity() >= 40);

        heap.clear();
        assert_eq!(heap.capacity(), last_capacity);
    }

    #[test]
    fn test_add_updates_node_value() {
        let mut arena = NodeArena::new();
        let mut heap = PriorityHeap::new();
        let node = arena.insert("x");

        assert_eq!(heap.add(&mut arena, node, 99), Ok(node));
        assert_eq!(arena.value(node), Some(99));

        heap.pop().unwrap();
        // Popping keeps the node and its key
        assert_eq!(arena.value(node), Some(99));
        assert_eq!(arena.payload(node), Some(&"x"));
    }

    #[test]
    fn test_add_stale_node() {
        let mut arena = NodeArena::new();
        let mut heap = PriorityHeap::new();
        let node = arena.insert(1u8);
        arena.remove(node);

        assert!(matches!(
            heap.add(&mut arena, node, 1),
            Err(HeapError::InvalidArgument(_))
        ));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_pop_if_due_max_heap() {
        let (_arena, mut heap) = heap_of(HeapOrder::Max, &[1, 9, 5]);

        assert_eq!(heap.pop_if_due(10), None);
        assert!(heap.pop_if_due(9).is_some());
        assert!(heap.pop_if_due(5).is_some());
        assert_eq!(heap.pop_if_due(5), None);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_display_and_debug() {
        let heap: PriorityHeap<()> = PriorityHeap::new();
        assert_eq!(heap.to_string(), "[]");

        let (_arena, heap) = heap_of(HeapOrder::Min, &[2, 1]);
        assert_eq!(heap.to_string(), "[1, 2]");
        assert_eq!(
            format!("{heap:?}"),
            "PriorityHeap { order: Min, values: [1, 2] }"
        );
    }

    #[test]
    fn test_extreme_keys() {
        let (_arena, mut heap) = heap_of(HeapOrder::Min, &[0, i64::MAX, i64::MIN, -1]);
        assert_eq!(drain(&mut heap), vec![i64::MIN, -1, 0, i64::MAX]);

        let (_arena, mut heap) = heap_of(HeapOrder::Max, &[0, i64::MIN, i64::MAX, i64::MIN]);
        assert_eq!(drain(&mut heap), vec![i64::MAX, 0, i64::MIN, i64::MIN]);
    }
}
