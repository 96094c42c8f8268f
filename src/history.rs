//! Rolling history window used by the chart.

use crate::status::StatusSnapshot;

/// Default number of points kept for charting.
pub const MAX_POINTS: usize = 50;

/// One chart sample derived from a successful poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub step: u64,
    pub total_queue: u64,
    pub cumulative_reward: f64,
}

/// Bounded FIFO of [`HistoryPoint`]s. Oldest points are evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    data: Vec<HistoryPoint>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(MAX_POINTS)
    }

    /// Append the point derived from `snapshot` and return it.
    ///
    /// `step` continues from the last retained point, so it keeps counting
    /// after eviction starts.
    pub fn push_snapshot(&mut self, snapshot: &StatusSnapshot) -> HistoryPoint {
        let step = self.data.last().map_or(0, |p| p.step + 1);
        let point = HistoryPoint {
            step,
            total_queue: snapshot.total_queue,
            cumulative_reward: snapshot.cumulative_reward,
        };
        self.data.push(point);
        if self.data.len() > self.capacity {
            let excess = self.data.len() - self.capacity;
            self.data.drain(..excess);
        }
        point
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn last(&self) -> Option<HistoryPoint> {
        self.data.last().copied()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
