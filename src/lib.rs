//! trafficdash: live dashboard core for a traffic-signal RL simulation.
//!
//! The simulation exposes its latest state over `GET /status`. This crate owns
//! everything between the response body and the pixels:
//!
//! - [`status`]: wire model + boundary validation
//! - [`history`]: the rolling chart window
//! - [`dashboard`]: state and the poll reducer
//! - [`view`] / [`chart`]: pure rendering models
//!
//! Front ends (browser and terminal) live under `crates/` and only drive the
//! timer, the HTTP request and the actual drawing.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod float_fmt;
pub mod history;
pub mod status;
pub mod view;

pub use config::DashboardConfig;
pub use dashboard::{DashboardState, PollOutcome};
pub use error::{PollError, StatusError};
pub use history::{History, HistoryPoint, MAX_POINTS};
pub use status::{Phase, StatusSnapshot};
pub use view::DashboardView;
