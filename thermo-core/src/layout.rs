//! Placement math for the gauge and its tick labels.
//!
//! The gauge element is rendered rotated 90°, so its visual length maps to
//! its `width` property and plain styling cannot center it in its
//! container. These functions take measured geometry by value and return
//! placements; they never touch the surface themselves.

use crate::model::{GeometryFrame, Range, TickLabel, degrees};

/// Sizing and position of the rotated gauge inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugePlacement {
    pub width: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Sizing and position of the column holding the tick labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelColumnPlacement {
    pub width: f64,
    pub margin_top: f64,
}

/// Computes the gauge placement from the container's measured frame.
///
/// The gauge spans 90% of the container height; the bottom and left
/// offsets center it vertically and horizontally. A zero-size container
/// degenerates to zero or negative offsets, which is accepted rather than
/// guarded.
pub fn gauge_placement(frame: &GeometryFrame) -> GaugePlacement {
    let width = 0.9 * frame.container_height;
    GaugePlacement {
        width,
        bottom: (frame.container_height - frame.element_height) / 2.0,
        left: (width - frame.container_width) / -2.0,
    }
}

/// Space between adjacent tick labels so that they spread evenly along
/// the gauge. `font_size` is the labels' font size in the same unit as
/// `gauge_width`.
pub fn label_margin(gauge_width: f64, font_size: f64, range: &Range) -> f64 {
    (gauge_width + font_size / 2.0) / range.intervals() - font_size
}

/// The ordered label sequence, descending from `max` to `min` inclusive,
/// each carrying the computed margin to the next one.
///
/// The loop keeps emitting while `value >= min`, so a step that does not
/// divide `max - min` evenly ends on the first value at or above `min`
/// instead of exactly on it. That mirrors the widget's long-standing
/// behavior and is not corrected here.
pub fn tick_labels(range: &Range, margin: f64) -> Vec<TickLabel> {
    let mut labels = Vec::new();
    let mut value = range.max;
    while value >= range.min {
        labels.push(TickLabel {
            value,
            text: degrees(value),
            margin_after: margin,
        });
        value -= range.step;
    }
    labels
}

/// Placement of the label column, applied only after every label is
/// attached so `labels_height` reflects the final content.
pub fn label_column_placement(
    container_width: f64,
    gauge_height: f64,
    parent_height: f64,
    labels_height: f64,
) -> LabelColumnPlacement {
    LabelColumnPlacement {
        width: (container_width - gauge_height) / 2.0,
        margin_top: (parent_height - labels_height) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_range() -> Range {
        Range::new(40.0, -10.0, 10.0).expect("range must be valid")
    }

    fn demo_frame() -> GeometryFrame {
        GeometryFrame {
            container_width: 200.0,
            container_height: 400.0,
            element_width: 360.0,
            element_height: 40.0,
        }
    }

    #[test]
    fn gauge_spans_ninety_percent_of_container_height() {
        let placement = gauge_placement(&demo_frame());
        assert_eq!(placement.width, 360.0);
        assert_eq!(placement.bottom, 180.0);
        assert_eq!(placement.left, -80.0);
    }

    #[test]
    fn gauge_placement_is_idempotent() {
        let frame = demo_frame();
        assert_eq!(gauge_placement(&frame), gauge_placement(&frame));
    }

    #[test]
    fn zero_size_container_degenerates_without_panicking() {
        let frame = GeometryFrame {
            container_width: 0.0,
            container_height: 0.0,
            element_width: 0.0,
            element_height: 0.0,
        };
        let placement = gauge_placement(&frame);
        assert_eq!(placement.width, 0.0);
        assert_eq!(placement.bottom, 0.0);
        assert_eq!(placement.left, 0.0);
    }

    #[test]
    fn label_margin_matches_derivation() {
        // (360 + 16/2) / 5 - 16 = 57.6
        let margin = label_margin(360.0, 16.0, &demo_range());
        assert!((margin - 57.6).abs() < 1e-9);
    }

    #[test]
    fn demo_range_produces_six_descending_labels() {
        let labels = tick_labels(&demo_range(), 57.6);
        let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["40°", "30°", "20°", "10°", "0°", "-10°"]);
    }

    #[test]
    fn label_count_and_endpoints_for_even_step() {
        let range = Range::new(100.0, 0.0, 25.0).expect("range must be valid");
        let labels = tick_labels(&range, 10.0);
        assert_eq!(labels.len(), (range.intervals() as usize) + 1);
        assert_eq!(labels.first().map(|l| l.value), Some(100.0));
        assert_eq!(labels.last().map(|l| l.value), Some(0.0));
        assert!(labels.windows(2).all(|w| w[0].value > w[1].value));
    }

    #[test]
    fn every_adjacent_pair_shares_the_same_margin() {
        let margin = label_margin(250.0, 14.0, &demo_range());
        let labels = tick_labels(&demo_range(), margin);
        assert!(labels.iter().all(|l| l.margin_after == margin));
    }

    #[test]
    fn uneven_step_stops_at_last_value_at_or_above_min() {
        // 40, 25, 10, -5 stay >= -10; the next one (-20) does not
        let range = Range::new(40.0, -10.0, 15.0).expect("range must be valid");
        let labels = tick_labels(&range, 0.0);
        let values: Vec<f64> = labels.iter().map(|l| l.value).collect();
        assert_eq!(values, [40.0, 25.0, 10.0, -5.0]);
    }

    #[test]
    fn label_column_centers_against_its_parent() {
        let placement = label_column_placement(200.0, 40.0, 400.0, 300.0);
        assert_eq!(placement.width, 80.0);
        assert_eq!(placement.margin_top, 50.0);
    }
}
