//! Geometry for the combined queue/reward chart.
//!
//! Everything is computed in a unit plot area (`x` and `y` in `0.0..=1.0`,
//! `y = 0` at the bottom). Renderers only scale to pixels and stroke.
//! Bars use the left axis (`total_queue`), the line uses the right axis
//! (`cumulative_reward`); both share one x slot per history point.

use crate::float_fmt::fmt_f64_fixed;
use crate::history::HistoryPoint;

const BAR_FILL: f64 = 0.7;
const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Position of `v` inside the range, clamped to `0..=1`.
    pub fn normalize(self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((v - self.min) / span).clamp(0.0, 1.0)
    }

    /// `count + 1` evenly spaced `(fraction, value)` ticks from min to max.
    pub fn ticks(self, count: usize) -> Vec<(f64, f64)> {
        let count = count.max(1);
        (0..=count)
            .map(|i| {
                let frac = i as f64 / count as f64;
                (frac, self.min + (self.max - self.min) * frac)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub step: u64,
    /// Left edge.
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub step: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub bars: Vec<Bar>,
    pub line: Vec<LinePoint>,
    pub queue_axis: AxisRange,
    pub reward_axis: AxisRange,
}

impl ChartModel {
    pub fn from_points(points: &[HistoryPoint]) -> Self {
        let queue_max = points.iter().map(|p| p.total_queue).max().unwrap_or(0);
        let queue_axis = AxisRange {
            min: 0.0,
            max: queue_max.max(1) as f64,
        };
        let reward_axis = reward_range(points);

        let n = points.len().max(1) as f64;
        let slot = 1.0 / n;
        let mut bars = Vec::with_capacity(points.len());
        let mut line = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            let left = i as f64 * slot;
            bars.push(Bar {
                step: p.step,
                x: left + slot * (1.0 - BAR_FILL) / 2.0,
                width: slot * BAR_FILL,
                height: queue_axis.normalize(p.total_queue as f64),
            });
            line.push(LinePoint {
                step: p.step,
                x: left + slot / 2.0,
                y: reward_axis.normalize(p.cumulative_reward),
            });
        }

        Self {
            bars,
            line,
            queue_axis,
            reward_axis,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First and last step on the shared x-axis.
    pub fn step_span(&self) -> Option<(u64, u64)> {
        Some((self.bars.first()?.step, self.bars.last()?.step))
    }

    /// Left-axis labels (`total_queue`).
    pub fn queue_tick_labels(&self, count: usize) -> Vec<(f64, String)> {
        self.queue_axis
            .ticks(count)
            .into_iter()
            .map(|(frac, v)| (frac, fmt_f64_fixed(v, 0)))
            .collect()
    }

    /// Right-axis labels (`cumulative_reward`).
    pub fn reward_tick_labels(&self, count: usize) -> Vec<(f64, String)> {
        self.reward_axis
            .ticks(count)
            .into_iter()
            .map(|(frac, v)| (frac, fmt_f64_fixed(v, 2)))
            .collect()
    }

    /// One block character per bar, for text front ends.
    pub fn queue_sparkline(&self) -> String {
        self.bars
            .iter()
            .map(|b| {
                let idx = (b.height * (SPARK.len() - 1) as f64).round() as usize;
                SPARK[idx.min(SPARK.len() - 1)]
            })
            .collect()
    }
}

fn reward_range(points: &[HistoryPoint]) -> AxisRange {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points {
        min = min.min(p.cumulative_reward);
        max = max.max(p.cumulative_reward);
    }
    if !min.is_finite() || !max.is_finite() {
        return AxisRange { min: 0.0, max: 1.0 };
    }
    if max - min < 1e-9 {
        // Flat series: centre it.
        return AxisRange {
            min: min - 1.0,
            max: max + 1.0,
        };
    }
    AxisRange { min, max }
}
