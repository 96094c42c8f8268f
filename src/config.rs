//! Dashboard configuration.
//!
//! The defaults are the fixed endpoint and cadence the backend is built for.
//! Native front ends may override them through the environment:
//! - `TRAFFICDASH_STATUS_URL`: full URL of the status endpoint
//! - `TRAFFICDASH_POLL_MS`: poll interval in milliseconds (100..=60000)

use std::time::Duration;

use crate::history::MAX_POINTS;

pub const DEFAULT_STATUS_URL: &str = "http://127.0.0.1:8000/status";
pub const DEFAULT_POLL_MS: u64 = 1000;

pub const ENV_STATUS_URL: &str = "TRAFFICDASH_STATUS_URL";
pub const ENV_POLL_MS: &str = "TRAFFICDASH_POLL_MS";

const MIN_POLL_MS: u64 = 100;
const MAX_POLL_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub status_url: String,
    pub poll_interval: Duration,
    pub max_points: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            status_url: DEFAULT_STATUS_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            max_points: MAX_POINTS,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden from the process environment.
    ///
    /// Returns the config plus human-readable warnings for ignored values.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let mut warnings = Vec::new();

        if let Some(v) = lookup(ENV_STATUS_URL) {
            let v = v.trim();
            if v.starts_with("http://") || v.starts_with("https://") {
                cfg.status_url = v.to_string();
            } else {
                warnings.push(format!("Ignoring {ENV_STATUS_URL}={v:?}: not an http(s) URL"));
            }
        }

        if let Some(v) = lookup(ENV_POLL_MS) {
            match v.trim().parse::<u64>() {
                Ok(ms) => {
                    let clamped = ms.clamp(MIN_POLL_MS, MAX_POLL_MS);
                    if clamped != ms {
                        warnings.push(format!(
                            "{ENV_POLL_MS}={ms} out of range; using {clamped} ms"
                        ));
                    }
                    cfg.poll_interval = Duration::from_millis(clamped);
                }
                Err(_) => warnings.push(format!("Unknown {ENV_POLL_MS} value: {v}")),
            }
        }

        (cfg, warnings)
    }
}
