//! Pure rendering model. Both front ends draw exactly these strings.

use crate::dashboard::DashboardState;
use crate::float_fmt::fmt_f64_fixed;
use crate::status::{Phase, StatusSnapshot};

/// Two signal markers; at most one is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseIndicator {
    pub eb_active: bool,
    pub sb_active: bool,
}

impl PhaseIndicator {
    pub fn for_phase(phase: Phase) -> Self {
        Self {
            eb_active: phase == Phase::EastBound,
            sb_active: phase == Phase::SouthBound,
        }
    }

    /// CSS class list for the east/west-bound light.
    pub fn eb_class(self) -> &'static str {
        if self.eb_active {
            "light eb green"
        } else {
            "light eb"
        }
    }

    /// CSS class list for the south/north-bound light.
    pub fn sb_class(self) -> &'static str {
        if self.sb_active {
            "light sb green"
        } else {
            "light sb"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub phase: PhaseIndicator,
    pub phase_text: String,
    pub total_queue_text: String,
    pub reward_text: String,
    pub eb_lanes_text: String,
    pub sb_lanes_text: String,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        Self::from_snapshot(&state.snapshot)
    }

    pub fn from_snapshot(s: &StatusSnapshot) -> Self {
        Self {
            phase: PhaseIndicator::for_phase(s.current_phase),
            phase_text: s.current_phase.index().to_string(),
            total_queue_text: s.total_queue.to_string(),
            reward_text: fmt_f64_fixed(s.cumulative_reward, 2),
            eb_lanes_text: lanes_text("EB", &s.q_eb),
            sb_lanes_text: lanes_text("SB", &s.q_sb),
        }
    }

    /// Stats block as `label: value` rows.
    pub fn stats_rows(&self) -> [(&'static str, &str); 3] {
        [
            ("Current Phase", self.phase_text.as_str()),
            ("Total Queue", self.total_queue_text.as_str()),
            ("Cumulative Reward", self.reward_text.as_str()),
        ]
    }
}

/// `"EB: 1, 2, 3"`.
pub fn lanes_text(label: &str, lanes: &[u32]) -> String {
    let joined = lanes
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{label}: {joined}")
}
