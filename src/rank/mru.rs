//! Bounded set of the most valuable commands.
//!
//! Entries live in a binary max-heap ordered by priority score. When the set
//! is full, the entry with the lowest score is evicted to make room, which
//! keeps the working set limited to the commands worth suggesting first.

use serde::Serialize;

use super::priority_score;

/// Maximum number of commands tracked by default.
pub const MRU_CAPACITY: usize = 100;

/// A tracked command with its usage counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub command: String,
    pub frequency: u32,
    pub last_used: i64,
}

impl RankedEntry {
    pub fn new(command: impl Into<String>, frequency: u32, last_used: i64) -> Self {
        Self {
            command: command.into(),
            frequency,
            last_used,
        }
    }

    /// Priority of this entry relative to the clock reading `now`.
    pub fn score(&self, now: i64) -> i64 {
        priority_score(self.frequency, self.last_used, now)
    }
}

/// Fixed-capacity max-heap of [`RankedEntry`] values, unique by command.
#[derive(Clone, Debug)]
pub struct BoundedRankedSet {
    entries: Vec<RankedEntry>,
    capacity: usize,
    now: i64,
}

impl Default for BoundedRankedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundedRankedSet {
    pub fn new() -> Self {
        Self::with_capacity_at(MRU_CAPACITY, super::now())
    }

    /// Create a set holding at most `capacity` entries, scored against `now`.
    pub fn with_capacity_at(capacity: usize, now: i64) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            now,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The clock reading all scores are computed against.
    pub fn now(&self) -> i64 {
        self.now
    }

    /// Insert a command or overwrite the counters of an existing one.
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn insert_or_touch(
        &mut self,
        command: &str,
        frequency: u32,
        last_used: i64,
    ) -> Option<RankedEntry> {
        if command.is_empty() || self.capacity == 0 {
            return None;
        }

        if let Some(index) = self.position(command) {
            let entry = &mut self.entries[index];
            entry.frequency = frequency;
            entry.last_used = last_used;
            self.resift(index);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_min()
        } else {
            None
        };

        self.entries.push(RankedEntry::new(command, frequency, last_used));
        self.sift_up(self.entries.len() - 1);
        evicted
    }

    /// Record one more use of `command` at the current time.
    pub fn touch_by_usage(&mut self, command: &str) -> Option<RankedEntry> {
        match self.position(command) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.frequency = entry.frequency.saturating_add(1);
                entry.last_used = self.now;
                self.resift(index);
                None
            }
            None => self.insert_or_touch(command, 1, self.now),
        }
    }

    /// Highest priority entry.
    pub fn peek(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    /// Remove and return the highest priority entry.
    pub fn extract_max(&mut self) -> Option<RankedEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let max = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(max)
    }

    pub fn contains(&self, command: &str) -> bool {
        self.position(command).is_some()
    }

    /// Entries in heap order.
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    fn position(&self, command: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.command == command)
    }

    fn score(&self, index: usize) -> i64 {
        self.entries[index].score(self.now)
    }

    /// Drop the lowest scoring entry. A linear scan is fine at this size.
    fn evict_min(&mut self) -> Option<RankedEntry> {
        let min_index = (1..self.entries.len()).fold(0, |min, i| {
            if self.score(i) < self.score(min) { i } else { min }
        });
        if min_index >= self.entries.len() {
            return None;
        }

        let removed = self.entries.swap_remove(min_index);
        if min_index < self.entries.len() {
            self.resift(min_index);
        }
        tracing::debug!(command = %removed.command, "Evicted ranked entry");
        Some(removed)
    }

    fn resift(&mut self, index: usize) {
        let index = self.sift_up(index);
        self.sift_down(index);
    }

    /// Move the entry at `index` towards the root; returns its final slot.
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.score(index) <= self.score(parent) {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut largest = index;

            if left < len && self.score(left) > self.score(largest) {
                largest = left;
            }
            if right < len && self.score(right) > self.score(largest) {
                largest = right;
            }
            if largest == index {
                break;
            }
            self.entries.swap(index, largest);
            index = largest;
        }
    }
}
