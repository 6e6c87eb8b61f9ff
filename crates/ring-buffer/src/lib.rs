//! Fixed-Capacity Ring Buffer
//!
//! Provides a bounded FIFO history buffer for per-frame signal smoothing.
//! Pushing past capacity evicts the oldest entry.

mod buffer;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};

use thiserror::Error;

/// Ring buffer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingBufferError {
    #[error("Ring buffer capacity must be at least 1")]
    ZeroCapacity,
}
