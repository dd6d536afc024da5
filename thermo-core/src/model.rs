use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Numeric range of the gauge. `step` is the spacing between tick labels
/// and should be a divisor of `max - min`; that is not enforced (see
/// [`crate::layout::tick_labels`] for what happens when it is not).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub max: f64,
    pub min: f64,
    pub step: f64,
}

impl Range {
    pub fn new(max: f64, min: f64, step: f64) -> Result<Self, WidgetError> {
        if max <= min || step <= 0.0 {
            return Err(WidgetError::InvalidRange { max, min, step });
        }
        Ok(Self { max, min, step })
    }

    /// Number of inter-label intervals, `(max - min) / step`.
    pub fn intervals(&self) -> f64 {
        (self.max - self.min) / self.step
    }
}

/// One tick label alongside the gauge, plus the margin separating it from
/// the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub value: f64,
    pub text: String,
    pub margin_after: f64,
}

/// Geometry read from the rendering surface at computation time. The
/// surface is the source of truth, so frames are measured on demand and
/// never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryFrame {
    pub container_width: f64,
    pub container_height: f64,
    pub element_width: f64,
    pub element_height: f64,
}

/// What the user asked for: a free-text place name, or device coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Name(String),
    Coordinates { latitude: f64, longitude: f64 },
}

/// Outcome of a forward geocode lookup. Created per request and discarded
/// after the weather fetch; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    /// Opaque place identifier used to scope the weather query.
    pub woeid: String,
    pub name: String,
    /// How many places the service matched. The resolver always carries
    /// the first match; the controller decides whether to warn.
    pub match_count: u32,
}

impl ResolvedPlace {
    pub fn is_ambiguous(&self) -> bool {
        self.match_count > 1
    }
}

/// A single current-temperature observation.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReading {
    pub fn new(temperature_c: f64) -> Self {
        Self {
            temperature_c,
            fetched_at: Utc::now(),
        }
    }
}

/// The three user-visible text slots of the widget. Owned exclusively by
/// the widget controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub city: String,
    pub temperature: String,
    pub error: String,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            city: "-".to_string(),
            temperature: "-".to_string(),
            error: String::new(),
        }
    }
}

/// Formats a gauge value the way the labels and the temperature slot show
/// it: integral values without a fractional part, plus the degree sign.
pub fn degrees(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}°", value as i64)
    } else {
        format!("{value}°")
    }
}
