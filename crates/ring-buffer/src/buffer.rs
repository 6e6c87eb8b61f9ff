//! Ring Buffer Implementation

use crate::RingBufferError;

/// Default buffer capacity (5 frames, the smoothing window at ~15-30 fps)
pub const DEFAULT_CAPACITY: usize = 5;

/// Bounded FIFO buffer holding the most recent `capacity` values
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Storage, grows up to `capacity` and never reallocates after that
    storage: Vec<T>,
    /// Capacity of the buffer
    capacity: usize,
    /// Index of the oldest entry once the buffer is full
    head: usize,
    /// Total values pushed (for statistics)
    total_written: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity.
    ///
    /// A capacity of 0 is clamped to 1; use [`RingBuffer::try_new`] to reject it instead.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            total_written: 0,
        }
    }

    /// Create a new ring buffer, failing on zero capacity
    pub fn try_new(capacity: usize) -> Result<Self, RingBufferError> {
        if capacity == 0 {
            return Err(RingBufferError::ZeroCapacity);
        }
        Ok(Self::new(capacity))
    }

    /// Create a buffer with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a value, returning the evicted oldest value if the buffer was full
    pub fn push(&mut self, value: T) -> Option<T> {
        self.total_written += 1;

        if self.storage.len() < self.capacity {
            self.storage.push(value);
            return None;
        }

        let evicted = std::mem::replace(&mut self.storage[self.head], value);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// Number of values currently held
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.storage[self.head..]
            .iter()
            .chain(self.storage[..self.head].iter())
    }

    /// Most recently pushed value
    pub fn last(&self) -> Option<&T> {
        let len = self.storage.len();
        if len == 0 {
            return None;
        }
        self.storage.get((self.head + len - 1) % len)
    }

    /// Get total values pushed since creation
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = 0;
    }
}

impl RingBuffer<f64> {
    /// Arithmetic mean of the current contents, 0.0 when empty
    pub fn mean(&self) -> f64 {
        if self.storage.is_empty() {
            return 0.0;
        }
        self.iter().sum::<f64>() / self.storage.len() as f64
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
