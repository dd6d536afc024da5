//! Core library for the environmental thermometer widget.
//!
//! This crate defines:
//! - Placement math for the rotated gauge and its tick labels
//! - An abstraction over the rendering surface the widget draws on
//! - Geocoding and weather providers behind async traits
//! - The widget controller tying submission, display state, and errors
//!   together, with a token guard against stale responses
//!
//! It is used by `thermo-cli`, but can also back other hosts — anything
//! that can measure, position, and mutate named elements.

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod provider;
pub mod surface;
pub mod widget;

pub use config::{Config, RangeConfig, Unit};
pub use error::WidgetError;
pub use layout::{GaugePlacement, LabelColumnPlacement};
pub use model::{
    DisplayState, GeometryFrame, LocationQuery, Range, ResolvedPlace, TickLabel, WeatherReading,
};
pub use provider::{PlaceResolver, ReverseGeocoder, WeatherSource};
pub use surface::{MemorySurface, Size, Surface};
pub use widget::{ElementIds, SubmissionToken, Thermometer};
