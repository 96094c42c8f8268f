use leptos::prelude::*;
use send_wrapper::SendWrapper;
use trafficdash::chart::ChartModel;
use trafficdash::config::DEFAULT_STATUS_URL;
use trafficdash::{DashboardConfig, DashboardState, DashboardView, PollOutcome};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod charts;
mod fetch;

use charts::draw_history_chart;
use fetch::fetch_status;

pub fn start() {
    mount_to_body(|| view! { <Dashboard /> });
}

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn console_warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

#[component]
fn Dashboard() -> impl IntoView {
    let config = DashboardConfig::default();
    let (state, set_state) = signal(DashboardState::with_capacity(config.max_points));
    let view_model = Memo::new(move |_| state.with(DashboardView::from_state));

    let (interval_id, set_interval_id) = signal::<Option<i32>>(None);
    // One controller per pending request, keyed by tick.
    // AbortController is !Send; wasm runs on one thread.
    let pending = StoredValue::new(Vec::<(u64, SendWrapper<web_sys::AbortController>)>::new());
    let next_tick = StoredValue::new(0u64);

    let poll = move || {
        // Every tick fetches, even while earlier requests are pending.
        let controller = match web_sys::AbortController::new() {
            Ok(c) => c,
            Err(_) => {
                console_error("AbortController unavailable");
                return;
            }
        };
        let signal = controller.signal();
        let tick = next_tick.get_value();
        next_tick.set_value(tick.wrapping_add(1));
        pending.update_value(|p| p.push((tick, SendWrapper::new(controller))));

        spawn_local(async move {
            let result = fetch_status(DEFAULT_STATUS_URL, &signal).await;

            // Disposed after unmount: drop the late response.
            if pending
                .try_update_value(|p| p.retain(|(id, _)| *id != tick))
                .is_none()
            {
                return;
            }

            match set_state.try_update(|s| s.reduce(result)) {
                Some(PollOutcome::Failed(err)) => console_error(&err.to_string()),
                Some(PollOutcome::Updated {
                    lane_sum_mismatch: Some(diff),
                    ..
                }) => console_warn(&format!(
                    "total_queue disagrees with lane queues by {diff}"
                )),
                _ => {}
            }
        });
    };

    match web_sys::window() {
        Some(window) => {
            let cb = Closure::wrap(Box::new(poll) as Box<dyn FnMut()>);
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                config.poll_interval.as_millis() as i32,
            ) {
                Ok(id) => {
                    cb.forget();
                    set_interval_id.set(Some(id));
                }
                Err(_) => console_error("failed to start poll interval"),
            }
        }
        None => console_error("no window"),
    }

    on_cleanup(move || {
        if let Some(id) = interval_id.get_untracked() {
            if let Some(w) = web_sys::window() {
                w.clear_interval_with_handle(id);
            }
        }
        pending.with_value(|p| {
            for (_, c) in p {
                c.abort();
            }
        });
    });

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    Effect::new(move |_| {
        let chart = state.with(|s| ChartModel::from_points(s.history.points()));
        if let Some(canvas) = canvas_ref.get() {
            if let Err(e) = draw_history_chart(&canvas, &chart) {
                console_error(&format!("chart: {e}"));
            }
        }
    });

    view! {
        <div style="padding: 20px;">
            <h2>"🚦 Smart Traffic Dashboard"</h2>

            <div class="phase-indicator">
                <span class=move || view_model.get().phase.eb_class()></span>
                <span class=move || view_model.get().phase.sb_class()></span>
            </div>

            <div class="stats">
                <p>"Current Phase: " {move || view_model.get().phase_text}</p>
                <p>"Total Queue: " {move || view_model.get().total_queue_text}</p>
                <p>"Cumulative Reward: " {move || view_model.get().reward_text}</p>
            </div>

            <div class="lanes">
                <p>{move || view_model.get().eb_lanes_text}</p>
                <p>{move || view_model.get().sb_lanes_text}</p>
            </div>

            <canvas node_ref=canvas_ref width="720" height="300"></canvas>
        </div>
    }
}
