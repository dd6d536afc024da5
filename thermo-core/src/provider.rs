use crate::{
    Config,
    error::WidgetError,
    model::{ResolvedPlace, WeatherReading},
    provider::{forecast::YqlWeather, places::YqlPlaces, reverse::NominatimReverse},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod forecast;
pub mod places;
pub mod reverse;

/// Turns a free-text place name into an opaque place identifier.
///
/// Zero matches is the error case; an ambiguous lookup is NOT — the
/// resolver carries the first match plus the match count, and the widget
/// controller decides how loudly to warn.
#[async_trait]
pub trait PlaceResolver: Send + Sync + Debug {
    async fn resolve(&self, location: &str) -> Result<ResolvedPlace, WidgetError>;
}

/// Turns an opaque place identifier into a current-temperature reading.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, woeid: &str) -> Result<WeatherReading, WidgetError>;
}

/// Turns device coordinates into a human-readable place name, for the
/// geolocation variant of the widget.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String, WidgetError>;
}

/// Construct the place resolver the config points at.
pub fn resolver_from_config(config: &Config) -> Result<Box<dyn PlaceResolver>, WidgetError> {
    Ok(Box::new(YqlPlaces::new(config.yql_url.clone())?))
}

/// Construct the weather source the config points at, honoring the unit
/// preference.
pub fn source_from_config(config: &Config) -> Result<Box<dyn WeatherSource>, WidgetError> {
    Ok(Box::new(YqlWeather::new(
        config.yql_url.clone(),
        config.forecast_feed_url.clone(),
        config.unit,
    )?))
}

/// Construct the reverse geocoder the config points at.
pub fn reverse_from_config(config: &Config) -> Result<Box<dyn ReverseGeocoder>, WidgetError> {
    Ok(Box::new(NominatimReverse::new(
        config.reverse_geocode_url.clone(),
    )?))
}

/// Shortens a service response body for error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
