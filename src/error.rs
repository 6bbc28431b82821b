//! Error type for heap operations

use thiserror::Error;

/// Error type for heap operations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `peek` or `pop` was called on a heap with no live entries
    #[error("the heap is empty")]
    EmptyHeap,
    /// A handle was passed that does not name a live node in the arena
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HeapError>;
