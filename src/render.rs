//! Text rendering of samples and rolling histories.

use crate::metrics::data::Sample;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render percentages as a sparkline on a fixed 0..=100 scale.
pub fn sparkline(values: &[f32]) -> String {
    values
        .iter()
        .map(|value| {
            let clamped = if value.is_finite() {
                value.clamp(0.0, 100.0)
            } else {
                0.0
            };
            let level = (clamped / 100.0 * (BARS.len() - 1) as f32).round() as usize;
            BARS[level.min(BARS.len() - 1)]
        })
        .collect()
}

/// One-line summary of a sample.
pub fn status_line(sample: &Sample) -> String {
    format!(
        "CPU Load: {:.1}% | Memory: {:.1}% | Used: {} MB | Free: {} MB | Total: {} MB",
        sample.cpu_percent,
        sample.ram_percent,
        sample.ram_used_mb,
        sample.ram_free_mb,
        sample.ram_total_mb
    )
}
