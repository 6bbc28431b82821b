//! Heap construction parameters
//!
//! A [`PriorityHeap`](crate::heap::PriorityHeap) is configured once, at
//! construction, with an initial capacity hint and an ordering mode. Neither
//! can change afterwards.
//!
//! # Example
//!
//! ```rust
//! use rust_keyed_heap::{HeapConfig, HeapOrder, PriorityHeap};
//!
//! let config = HeapConfig::max_heap().with_initial_capacity(64);
//! let heap: PriorityHeap<&str> = PriorityHeap::from_config(&config);
//! assert_eq!(heap.order(), HeapOrder::Max);
//! assert!(heap.capacity() >= 64);
//! ```

/// Capacity used by [`HeapConfig::default`] and `PriorityHeap::new`.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Which end of the key range sits at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeapOrder {
    /// Smallest key first
    #[default]
    Min,
    /// Largest key first
    Max,
}

impl HeapOrder {
    /// Returns true if `a` is strictly better than `b`, i.e. `a` belongs
    /// closer to the root.
    ///
    /// Equal keys never outrank each other, in either order, so sifting stops
    /// at the first equal key in max heaps too.
    #[inline]
    pub fn outranks(self, a: i64, b: i64) -> bool {
        match self {
            HeapOrder::Min => a < b,
            HeapOrder::Max => a > b,
        }
    }

    /// Returns true if sift-down should follow the left child of two
    /// siblings. Ties go right in a min heap and left in a max heap.
    #[inline]
    pub fn prefers_left(self, left: i64, right: i64) -> bool {
        match self {
            HeapOrder::Min => left < right,
            HeapOrder::Max => left >= right,
        }
    }

    /// Returns true if a root with key `value` is due at `deadline`, i.e. it
    /// is not strictly worse than the deadline.
    #[inline]
    pub fn is_due(self, value: i64, deadline: i64) -> bool {
        !self.outranks(deadline, value)
    }
}

/// Construction parameters for a heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapConfig {
    /// Number of slots allocated up front. Values below 1 are clamped to 1.
    pub initial_capacity: usize,
    /// Ordering mode, fixed for the lifetime of the heap.
    pub order: HeapOrder,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            order: HeapOrder::Min,
        }
    }
}

impl HeapConfig {
    /// Default capacity, smallest key first.
    pub fn min_heap() -> Self {
        Self::default()
    }

    /// Default capacity, largest key first.
    pub fn max_heap() -> Self {
        Self::default().with_order(HeapOrder::Max)
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_order(mut self, order: HeapOrder) -> Self {
        self.order = order;
        self
    }
}
