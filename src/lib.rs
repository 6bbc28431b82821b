//! Keyed Binary Heap for Rust
//!
//! This crate provides an array-backed binary heap over `i64` sort keys whose
//! entries are caller-defined nodes. Each node pairs a key with an arbitrary
//! payload and lives in a [`NodeArena`]; the heap orders lightweight
//! [`NodeKey`] handles to those nodes.
//!
//! # Features
//!
//! - **Min or max ordering**, fixed at construction ([`HeapOrder`])
//! - **O(log n) add and pop**, O(1) peek
//! - **Amortized growth**: capacity doubles when full and never shrinks
//! - **Handle semantics**: the caller keeps handles to the nodes it added and
//!   can read their key and payload at any time through the arena
//! - **Deadline draining** with [`PriorityHeap::pop_if_due`], for timer queues
//! - **Positional equality**: two heaps are equal when their keys match slot
//!   by slot, not merely as a multiset
//!
//! # Example
//!
//! ```rust
//! use rust_keyed_heap::{HeapError, NodeArena, PriorityHeap};
//!
//! let mut arena = NodeArena::new();
//! let mut heap = PriorityHeap::new();
//!
//! let wake = arena.insert("wake up");
//! let eat = arena.insert("eat");
//! heap.add(&mut arena, eat, 20).unwrap();
//! heap.add(&mut arena, wake, 5).unwrap();
//!
//! assert_eq!(heap.peek(), Ok(wake));
//! assert_eq!(heap.pop(), Ok(wake));
//! assert_eq!(heap.pop(), Ok(eat));
//! assert_eq!(heap.pop(), Err(HeapError::EmptyHeap));
//! ```

pub mod config;
pub mod error;
pub mod heap;
pub mod node;

pub use config::{HeapConfig, HeapOrder};
pub use error::HeapError;
pub use heap::PriorityHeap;
pub use node::{Node, NodeArena, NodeKey};
