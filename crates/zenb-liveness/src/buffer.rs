//! Fixed-capacity FIFO of pulse samples.

use ndarray::Array1;
use std::collections::VecDeque;

/// Ring buffer of derived pulse scalars.
///
/// Length never exceeds capacity; pushing into a full buffer evicts the oldest
/// sample. Analysis only runs on a full buffer.
#[derive(Debug, Clone)]
pub struct SignalBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SignalBuffer {
    /// # Arguments
    /// * `capacity` - samples per analysis window (e.g. 150 = 5 s @ 30 fps), at least 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning the evicted one when the buffer was full.
    pub fn push(&mut self, value: f32) -> Option<f32> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Fill level in [0, 1]
    pub fn fill_ratio(&self) -> f32 {
        self.samples.len() as f32 / self.capacity as f32
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &f32> + '_ {
        self.samples.iter()
    }

    /// Copy of the contents, oldest first.
    pub fn to_array(&self) -> Array1<f32> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
