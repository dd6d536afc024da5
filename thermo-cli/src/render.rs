//! Text rendering of a mounted widget.
//!
//! The widget itself only mutates its surface; this module reads the
//! surface back and draws a horizontal gauge (the terminal has no rotated
//! meter element) with the tick labels spread along it.

use thermo_core::{MemorySurface, Range, Thermometer};

const BAR_WIDTH: usize = 50;

pub fn draw(widget: &Thermometer<MemorySurface>) -> String {
    let state = widget.state();

    let mut out = String::new();
    out.push_str(&format!(
        "City: {}    Temperature: {}\n",
        state.city, state.temperature
    ));
    if !state.error.is_empty() {
        out.push_str(&format!("! {}\n", state.error));
    }
    out.push('\n');
    out.push_str(&tick_row(widget));
    out.push('\n');
    out.push_str(&bar_row(gauge_value(widget), widget.range()));
    out.push('\n');
    out
}

/// Current gauge value, read back from the surface attribute the widget
/// controller maintains.
fn gauge_value(widget: &Thermometer<MemorySurface>) -> Option<f64> {
    widget
        .surface()
        .attr(&widget.ids().gauge, "value")
        .and_then(|v| v.parse().ok())
}

/// Tick labels left-to-right (the widget stores them descending) spread
/// evenly across the bar.
fn tick_row(widget: &Thermometer<MemorySurface>) -> String {
    let labels: Vec<&str> = widget
        .surface()
        .labels(&widget.ids().labels)
        .iter()
        .rev()
        .map(|(text, _)| text.as_str())
        .collect();

    if labels.len() < 2 {
        return labels.concat();
    }

    let mut row = vec![' '; BAR_WIDTH + 8];
    let gaps = labels.len() - 1;
    for (i, text) in labels.iter().enumerate() {
        let col = 1 + i * (BAR_WIDTH - 1) / gaps;
        for (j, ch) in text.chars().enumerate() {
            if col + j < row.len() {
                row[col + j] = ch;
            }
        }
    }
    row.into_iter().collect::<String>().trim_end().to_string()
}

fn bar_row(value: Option<f64>, range: Range) -> String {
    let filled = value.map_or(0, |v| {
        let clamped = v.clamp(range.min, range.max);
        let fraction = (clamped - range.min) / (range.max - range.min);
        (fraction * BAR_WIDTH as f64).round() as usize
    });

    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '.' });
    }
    bar.push(']');
    bar
}
