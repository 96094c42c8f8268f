//! Plain-text frame for the terminal.

use trafficdash::chart::ChartModel;
use trafficdash::{DashboardState, DashboardView};

const TITLE: &str = "🚦 Smart Traffic Dashboard";

fn light(label: &str, active: bool) -> String {
    format!("[{label} {}]", if active { '●' } else { '○' })
}

pub fn render_frame(state: &DashboardState) -> String {
    let view = DashboardView::from_state(state);
    let chart = ChartModel::from_points(state.history.points());

    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&format!(
        "  {} {}   {}\n",
        light("EB", view.phase.eb_active),
        light("SB", view.phase.sb_active),
        state.snapshot.current_phase.label(),
    ));

    let stats = view
        .stats_rows()
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&format!("  {stats}\n"));
    out.push_str(&format!("  {}\n", view.eb_lanes_text));
    out.push_str(&format!("  {}\n", view.sb_lanes_text));

    match chart.step_span() {
        Some((first, last)) => {
            let rewards = chart.reward_tick_labels(1);
            let (lo, hi) = match rewards.as_slice() {
                [lo, hi] => (lo.1.as_str(), hi.1.as_str()),
                _ => ("", ""),
            };
            out.push_str(&format!(
                "  queue {}  steps {first}..{last}  reward {lo}..{hi}\n",
                chart.queue_sparkline()
            ));
        }
        None => out.push_str("  (waiting for data)\n"),
    }
    out
}
