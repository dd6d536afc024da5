use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::WidgetError,
    model::ResolvedPlace,
    provider::{PlaceResolver, truncate_body},
};
use async_trait::async_trait;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Forward geocoder over the YQL places table. One lookup per submission,
/// no caching.
#[derive(Debug, Clone)]
pub struct YqlPlaces {
    yql_url: String,
    http: Client,
}

impl YqlPlaces {
    pub fn new(yql_url: String) -> Result<Self, WidgetError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { yql_url, http })
    }

    async fn lookup(&self, location: &str) -> Result<PlacesEnvelope, WidgetError> {
        let escaped = location.replace('"', "\\\"");
        let query = format!("select * from geo.places where text = \"{escaped}\"");

        let res = self
            .http
            .get(&self.yql_url)
            .query(&[("format", "json"), ("q", query.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "geocode request failed");
            return Err(WidgetError::Malformed(format!(
                "geocode request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WidgetError::Malformed(format!("undecodable geocode payload: {e}"))
        })
    }
}

#[async_trait]
impl PlaceResolver for YqlPlaces {
    async fn resolve(&self, location: &str) -> Result<ResolvedPlace, WidgetError> {
        let envelope = self.lookup(location).await?;
        let count = envelope.query.count;

        if count == 0 {
            tracing::debug!(location, "geocode matched no place");
            return Err(WidgetError::NoMatch);
        }

        let first = envelope
            .query
            .results
            .and_then(|r| r.place.into_first())
            .ok_or_else(|| {
                WidgetError::Malformed("geocode reported matches but sent no place".to_string())
            })?;

        tracing::debug!(location, woeid = %first.woeid, count, "geocode resolved");
        Ok(ResolvedPlace {
            woeid: first.woeid,
            name: first.name.unwrap_or_else(|| location.to_string()),
            match_count: count,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PlacesEnvelope {
    query: PlacesQuery,
}

#[derive(Debug, Deserialize)]
struct PlacesQuery {
    #[serde(default)]
    count: u32,
    results: Option<PlacesResults>,
}

#[derive(Debug, Deserialize)]
struct PlacesResults {
    place: OneOrMany,
}

/// A single match arrives as a bare object, several as an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(PlaceRecord),
    Many(Vec<PlaceRecord>),
}

impl OneOrMany {
    fn into_first(self) -> Option<PlaceRecord> {
        match self {
            OneOrMany::One(record) => Some(record),
            OneOrMany::Many(records) => records.into_iter().next(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaceRecord {
    woeid: String,
    name: Option<String>,
}
