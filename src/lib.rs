#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod error;
mod heap;
pub mod order;
mod tracker;

pub use error::{HeapError, Result};
pub use heap::Heap;
pub use tracker::{MedianTracker, Midpoint};
