//! Dashboard state and the poll reducer.
//!
//! All transitions are pure: old state + poll result -> new state. Front ends
//! only own the timer and the request, then hand the raw result to
//! [`DashboardState::apply_poll`].

use crate::error::PollError;
use crate::history::{History, HistoryPoint};
use crate::status::StatusSnapshot;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub snapshot: StatusSnapshot,
    pub history: History,
    pub successful_polls: u64,
    pub failed_polls: u64,
    /// Last failure text, for diagnostics only.
    pub last_error: Option<String>,
}

/// What a single poll did to the state.
#[derive(Debug)]
pub enum PollOutcome {
    Updated {
        point: HistoryPoint,
        /// `total_queue - sum(lanes)` when the backend disagrees with itself.
        lane_sum_mismatch: Option<i128>,
    },
    /// Snapshot and history untouched; caller logs the error.
    Failed(PollError),
    /// Teardown raced the request. Nothing changed, nothing to log.
    Cancelled,
}

impl PollOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, PollOutcome::Updated { .. })
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_points: usize) -> Self {
        Self {
            history: History::new(max_points),
            ..Self::default()
        }
    }

    /// Success path: replace the snapshot and append its history point.
    pub fn apply_snapshot(mut self, snapshot: StatusSnapshot) -> (Self, HistoryPoint) {
        let point = self.history.push_snapshot(&snapshot);
        self.snapshot = snapshot;
        self.successful_polls += 1;
        (self, point)
    }

    /// Reduce one poll: `Ok(body)` is the raw response text.
    pub fn apply_poll(self, result: Result<String, PollError>) -> (Self, PollOutcome) {
        let parsed =
            result.and_then(|body| StatusSnapshot::from_json(&body).map_err(PollError::from));
        match parsed {
            Ok(snapshot) => {
                let lane_sum_mismatch = snapshot.lane_sum_mismatch();
                let (next, point) = self.apply_snapshot(snapshot);
                (
                    next,
                    PollOutcome::Updated {
                        point,
                        lane_sum_mismatch,
                    },
                )
            }
            Err(PollError::Cancelled) => (self, PollOutcome::Cancelled),
            Err(err) => (self.record_failure(&err), PollOutcome::Failed(err)),
        }
    }

    /// In-place wrapper around [`Self::apply_poll`] for signal/lock holders.
    pub fn reduce(&mut self, result: Result<String, PollError>) -> PollOutcome {
        let (next, outcome) = std::mem::take(self).apply_poll(result);
        *self = next;
        outcome
    }

    fn record_failure(mut self, err: &PollError) -> Self {
        self.failed_polls += 1;
        self.last_error = Some(err.to_string());
        self
    }
}
