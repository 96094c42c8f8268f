//! `/status` wire model and boundary validation.

use serde::{Deserialize, Serialize};

use crate::error::StatusError;

/// Active signal direction reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Phase 0: east/west-bound green.
    #[default]
    EastBound,
    /// Phase 1: south/north-bound green.
    SouthBound,
    /// Any other program phase index (e.g. amber). Shown, never highlighted.
    Other(u32),
}

impl Phase {
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => Phase::EastBound,
            1 => Phase::SouthBound,
            n => Phase::Other(n),
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Phase::EastBound => 0,
            Phase::SouthBound => 1,
            Phase::Other(n) => n,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::EastBound => "EB green",
            Phase::SouthBound => "SB green",
            Phase::Other(_) => "other",
        }
    }
}

/// Latest simulation state. Replaced wholesale on every successful poll.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub q_eb: Vec<u32>,
    pub q_sb: Vec<u32>,
    pub current_phase: Phase,
    pub total_queue: u64,
    pub cumulative_reward: f64,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            q_eb: vec![0, 0, 0],
            q_sb: vec![0, 0, 0],
            current_phase: Phase::EastBound,
            total_queue: 0,
            cumulative_reward: 0.0,
        }
    }
}

/// Exact JSON shape served by the backend.
#[derive(Debug, Serialize, Deserialize)]
struct WireStatus {
    #[serde(rename = "q_EB")]
    q_eb: Vec<u32>,
    #[serde(rename = "q_SB")]
    q_sb: Vec<u32>,
    current_phase: i64,
    total_queue: u64,
    cumulative_reward: f64,
}

impl StatusSnapshot {
    /// Parse and validate a `/status` response body.
    pub fn from_json(body: &str) -> Result<Self, StatusError> {
        let wire: WireStatus = serde_json::from_str(body)?;
        Self::try_from_wire(wire)
    }

    fn try_from_wire(wire: WireStatus) -> Result<Self, StatusError> {
        if !wire.cumulative_reward.is_finite() {
            return Err(StatusError::Invalid(
                "cumulative_reward is not a finite number".to_string(),
            ));
        }
        let phase = u32::try_from(wire.current_phase).map_err(|_| {
            StatusError::Invalid(format!(
                "current_phase out of range: {}",
                wire.current_phase
            ))
        })?;

        Ok(Self {
            q_eb: wire.q_eb,
            q_sb: wire.q_sb,
            current_phase: Phase::from_index(phase),
            total_queue: wire.total_queue,
            cumulative_reward: wire.cumulative_reward,
        })
    }

    /// Serialize back into the backend's JSON shape.
    pub fn to_json(&self) -> String {
        let wire = WireStatus {
            q_eb: self.q_eb.clone(),
            q_sb: self.q_sb.clone(),
            current_phase: i64::from(self.current_phase.index()),
            total_queue: self.total_queue,
            cumulative_reward: self.cumulative_reward,
        };
        // Only plain numbers and vectors; serialization cannot fail.
        serde_json::to_string(&wire).unwrap_or_default()
    }

    pub fn lane_sum(&self) -> u64 {
        self.q_eb
            .iter()
            .chain(self.q_sb.iter())
            .map(|&q| u64::from(q))
            .sum()
    }

    /// `total_queue - lane_sum`, when the backend's total disagrees with its lanes.
    pub fn lane_sum_mismatch(&self) -> Option<i128> {
        let diff = i128::from(self.total_queue) - i128::from(self.lane_sum());
        (diff != 0).then_some(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"q_EB":[1,2,3],"q_SB":[0,0,1],"current_phase":1,"total_queue":7,"cumulative_reward":3.456}"#;

    #[test]
    fn parses_backend_payload() {
        let s = StatusSnapshot::from_json(SAMPLE).unwrap();
        assert_eq!(s.q_eb, vec![1, 2, 3]);
        assert_eq!(s.q_sb, vec![0, 0, 1]);
        assert_eq!(s.current_phase, Phase::SouthBound);
        assert_eq!(s.total_queue, 7);
        assert!((s.cumulative_reward - 3.456).abs() < 1e-12);
        assert_eq!(s.lane_sum_mismatch(), None);
    }

    #[test]
    fn integer_reward_is_accepted() {
        let body = r#"{"q_EB":[],"q_SB":[],"current_phase":0,"total_queue":0,"cumulative_reward":-12}"#;
        let s = StatusSnapshot::from_json(body).unwrap();
        assert_eq!(s.cumulative_reward, -12.0);
        assert!(s.q_eb.is_empty());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = r#"{"q_EB":[1],"q_SB":[1],"current_phase":0,"total_queue":2,"cumulative_reward":0.5,"step":99}"#;
        assert!(StatusSnapshot::from_json(body).is_ok());
    }

    #[test]
    fn rejects_missing_field() {
        let body = r#"{"q_EB":[1],"q_SB":[1],"current_phase":0,"cumulative_reward":0.5}"#;
        assert!(matches!(
            StatusSnapshot::from_json(body),
            Err(StatusError::Parse(_))
        ));
    }

    #[test]
    fn rejects_non_json_and_bad_types() {
        assert!(matches!(
            StatusSnapshot::from_json("<html>502</html>"),
            Err(StatusError::Parse(_))
        ));
        let negative_lane = r#"{"q_EB":[-1],"q_SB":[1],"current_phase":0,"total_queue":0,"cumulative_reward":0.5}"#;
        assert!(StatusSnapshot::from_json(negative_lane).is_err());
        let string_total = r#"{"q_EB":[1],"q_SB":[1],"current_phase":0,"total_queue":"2","cumulative_reward":0.5}"#;
        assert!(StatusSnapshot::from_json(string_total).is_err());
    }

    #[test]
    fn rejects_negative_phase() {
        let body = r#"{"q_EB":[1],"q_SB":[1],"current_phase":-1,"total_queue":2,"cumulative_reward":0.5}"#;
        assert!(matches!(
            StatusSnapshot::from_json(body),
            Err(StatusError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_phase_is_preserved() {
        let body = r#"{"q_EB":[1],"q_SB":[1],"current_phase":3,"total_queue":2,"cumulative_reward":0.5}"#;
        let s = StatusSnapshot::from_json(body).unwrap();
        assert_eq!(s.current_phase, Phase::Other(3));
        assert_eq!(s.current_phase.index(), 3);
    }

    #[test]
    fn reports_lane_sum_mismatch() {
        let body = r#"{"q_EB":[1,2],"q_SB":[3],"current_phase":0,"total_queue":4,"cumulative_reward":0.0}"#;
        let s = StatusSnapshot::from_json(body).unwrap();
        assert_eq!(s.lane_sum(), 6);
        assert_eq!(s.lane_sum_mismatch(), Some(-2));
    }

    #[test]
    fn json_shape_matches_backend() {
        let s = StatusSnapshot::from_json(SAMPLE).unwrap();
        let v: serde_json::Value = serde_json::from_str(&s.to_json()).unwrap();
        assert_eq!(v["q_EB"], serde_json::json!([1, 2, 3]));
        assert_eq!(v["current_phase"], serde_json::json!(1));
    }
}
