//! In-memory multi-level FIFO queue keyed by integer priority.

use std::collections::{BTreeMap, VecDeque};

/// Queue priority. Lower values are more urgent; `0` is the most urgent
/// priority by convention of callers, the queue itself does not enforce it.
pub type Priority = i32;

/// Priority queue made of one FIFO bucket per distinct priority.
///
/// The number of distinct priorities in use is small and bounded by the
/// callers' constants, so the bucket map stays tiny no matter how many items
/// are queued. Items with equal priority come out in insertion order.
#[derive(Debug)]
pub struct PriorityQueue<T> {
    buckets: BTreeMap<Priority, VecDeque<T>>,
    /// Lowest priority with a non-empty bucket.
    lowest: Option<Priority>,
    size: usize,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            lowest: None,
            size: 0,
        }
    }

    /// Append `item` to the bucket for `priority`, creating the bucket if needed.
    pub fn push(&mut self, priority: Priority, item: T) {
        self.buckets.entry(priority).or_default().push_back(item);
        self.size += 1;

        if self.lowest.is_none_or(|lowest| priority < lowest) {
            self.lowest = Some(priority);
        }
    }

    /// Remove and return the oldest item of the most urgent bucket.
    pub fn pop(&mut self) -> Option<T> {
        let priority = self.lowest?;
        let bucket = self.buckets.get_mut(&priority)?;
        let item = bucket.pop_front()?;
        self.size -= 1;

        if bucket.is_empty() {
            self.buckets.remove(&priority);
            self.lowest = self.buckets.keys().next().copied();
        }

        Some(item)
    }

    /// Return the item `pop` would return, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.lowest
            .and_then(|priority| self.buckets.get(&priority))
            .and_then(VecDeque::front)
    }

    /// Priority of the item `pop` would return.
    #[must_use]
    pub const fn peek_priority(&self) -> Option<Priority> {
        self.lowest
    }

    /// Drop every queued item.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.lowest = None;
        self.size = 0;
    }

    /// Number of queued items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Whether no items are queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}
