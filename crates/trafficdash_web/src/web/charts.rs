//! Canvas rendering of the combined queue/reward chart.

use trafficdash::chart::ChartModel;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BG_COLOR: &str = "#ffffff";
const GRID_COLOR: &str = "rgba(0, 0, 0, 0.08)";
const AXIS_TEXT: &str = "rgba(60, 60, 60, 0.9)";
const QUEUE_COLOR: &str = "#8884d8";
const REWARD_COLOR: &str = "#82ca9d";

const PAD_LEFT: f64 = 44.0;
const PAD_RIGHT: f64 = 56.0;
const PAD_TOP: f64 = 24.0;
const PAD_BOTTOM: f64 = 28.0;
const TICKS: usize = 4;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "get_context failed")?
        .ok_or("no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "cast failed".to_string())
}

/// Bars for `total_queue` (left axis), a line for `cumulative_reward`
/// (right axis), shared x-axis on `step`.
pub fn draw_history_chart(canvas: &HtmlCanvasElement, chart: &ChartModel) -> Result<(), String> {
    let ctx = context_2d(canvas)?;

    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    let plot_w = (w - PAD_LEFT - PAD_RIGHT).max(1.0);
    let plot_h = (h - PAD_TOP - PAD_BOTTOM).max(1.0);
    let to_x = |x: f64| PAD_LEFT + x * plot_w;
    let to_y = |y: f64| PAD_TOP + (1.0 - y) * plot_h;

    ctx.set_fill_style_str(BG_COLOR);
    ctx.fill_rect(0.0, 0.0, w, h);

    // Grid
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_line_width(1.0);
    for i in 0..=TICKS {
        let y = to_y(i as f64 / TICKS as f64);
        ctx.begin_path();
        ctx.move_to(PAD_LEFT, y);
        ctx.line_to(PAD_LEFT + plot_w, y);
        ctx.stroke();
    }

    ctx.set_font("11px system-ui, sans-serif");
    if chart.is_empty() {
        ctx.set_fill_style_str(AXIS_TEXT);
        ctx.set_text_align("center");
        let _ = ctx.fill_text("Waiting for data", w / 2.0, h / 2.0);
        return Ok(());
    }

    // Axis labels
    ctx.set_fill_style_str(AXIS_TEXT);
    ctx.set_text_align("right");
    for (frac, label) in chart.queue_tick_labels(TICKS) {
        let _ = ctx.fill_text(&label, PAD_LEFT - 6.0, to_y(frac) + 4.0);
    }
    ctx.set_text_align("left");
    for (frac, label) in chart.reward_tick_labels(TICKS) {
        let _ = ctx.fill_text(&label, PAD_LEFT + plot_w + 6.0, to_y(frac) + 4.0);
    }
    if let Some((first, last)) = chart.step_span() {
        let _ = ctx.fill_text(&first.to_string(), PAD_LEFT, h - 8.0);
        ctx.set_text_align("right");
        let _ = ctx.fill_text(&last.to_string(), PAD_LEFT + plot_w, h - 8.0);
    }

    // Queue bars
    ctx.set_fill_style_str(QUEUE_COLOR);
    for bar in &chart.bars {
        let bar_h = bar.height * plot_h;
        ctx.fill_rect(to_x(bar.x), to_y(bar.height), bar.width * plot_w, bar_h);
    }

    // Reward line
    ctx.set_stroke_style_str(REWARD_COLOR);
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, p) in chart.line.iter().enumerate() {
        if i == 0 {
            ctx.move_to(to_x(p.x), to_y(p.y));
        } else {
            ctx.line_to(to_x(p.x), to_y(p.y));
        }
    }
    ctx.stroke();

    // Legend
    ctx.set_text_align("left");
    ctx.set_fill_style_str(QUEUE_COLOR);
    ctx.fill_rect(PAD_LEFT, 8.0, 10.0, 8.0);
    ctx.set_fill_style_str(AXIS_TEXT);
    let _ = ctx.fill_text("Total Queue", PAD_LEFT + 14.0, 16.0);
    ctx.set_fill_style_str(REWARD_COLOR);
    ctx.fill_rect(PAD_LEFT + 100.0, 11.0, 10.0, 3.0);
    ctx.set_fill_style_str(AXIS_TEXT);
    let _ = ctx.fill_text("Cumulative Reward", PAD_LEFT + 114.0, 16.0);

    Ok(())
}
