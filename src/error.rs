use thiserror::Error;

/// Failures reported by [`Heap`](crate::Heap) operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `peek_top` or `remove_top` was called on a heap with no elements
    #[error("the heap is empty")]
    Empty,
}

/// Result type for fallible heap operations
pub type Result<T> = std::result::Result<T, HeapError>;
