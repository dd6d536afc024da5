//! Reverse geocoding for the device-location variant: coordinates in, a
//! human-readable place name out. Uses Nominatim (OpenStreetMap), which
//! needs no API key.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{error::WidgetError, provider::ReverseGeocoder};
use async_trait::async_trait;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "thermo-widget/0.1.0";

#[derive(Debug, Clone)]
pub struct NominatimReverse {
    base_url: String,
    http: Client,
}

impl NominatimReverse {
    pub fn new(base_url: String) -> Result<Self, WidgetError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { base_url, http })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimReverse {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String, WidgetError> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("zoom", "10"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("reverse geocode request failed: {e}");
                WidgetError::LocationUnavailable
            })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "reverse geocode returned error status");
            return Err(WidgetError::LocationUnavailable);
        }

        let body: NominatimResponse = response.json().await.map_err(|e| {
            tracing::debug!("reverse geocode parse error: {e}");
            WidgetError::LocationUnavailable
        })?;

        let name = body
            .address
            .and_then(NominatimAddress::into_place_name)
            .ok_or(WidgetError::LocationUnavailable)?;

        tracing::info!(latitude, longitude, %name, "reverse geocoded");
        Ok(name)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    /// Prefer city > town > village > municipality > county > state for
    /// the primary name, suffixing state or country when it adds
    /// disambiguation.
    fn into_place_name(self) -> Option<String> {
        let state = self.state.clone();
        let country = self.country.clone();

        let place = self
            .city
            .or(self.town)
            .or(self.village)
            .or(self.municipality)
            .or(self.county)
            .or(self.state)
            .or(self.country)?;

        let suffix = state
            .filter(|s| !s.is_empty() && *s != place)
            .or_else(|| country.filter(|c| !c.is_empty() && *c != place));

        Some(match suffix {
            Some(s) => format!("{place}, {s}"),
            None => place,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_address() -> NominatimAddress {
        NominatimAddress {
            city: None,
            town: None,
            village: None,
            municipality: None,
            county: None,
            state: None,
            country: None,
        }
    }

    #[test]
    fn city_and_state_combine() {
        let mut addr = empty_address();
        addr.city = Some("Naples".into());
        addr.state = Some("Campania".into());
        addr.country = Some("Italy".into());
        assert_eq!(addr.into_place_name().as_deref(), Some("Naples, Campania"));
    }

    #[test]
    fn town_is_used_when_no_city() {
        let mut addr = empty_address();
        addr.town = Some("Frattamaggiore".into());
        assert_eq!(addr.into_place_name().as_deref(), Some("Frattamaggiore"));
    }

    #[test]
    fn state_equal_to_place_is_not_repeated() {
        let mut addr = empty_address();
        addr.city = Some("Berlin".into());
        addr.state = Some("Berlin".into());
        addr.country = Some("Germany".into());
        assert_eq!(addr.into_place_name().as_deref(), Some("Berlin, Germany"));
    }

    #[test]
    fn fully_empty_address_yields_none() {
        assert!(empty_address().into_place_name().is_none());
    }
}
