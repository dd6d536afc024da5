use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::{
    config::Unit,
    error::WidgetError,
    model::WeatherReading,
    provider::{WeatherSource, truncate_body},
};
use async_trait::async_trait;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Current-weather source over the YQL rss table wrapping the forecast
/// feed. The WOEID scopes the feed; the unit preference rides along as a
/// feed parameter.
#[derive(Debug, Clone)]
pub struct YqlWeather {
    yql_url: String,
    feed_url: String,
    unit: Unit,
    http: Client,
}

impl YqlWeather {
    pub fn new(yql_url: String, feed_url: String, unit: Unit) -> Result<Self, WidgetError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            yql_url,
            feed_url,
            unit,
            http,
        })
    }

    async fn fetch(&self, woeid: &str) -> Result<FeedEnvelope, WidgetError> {
        let feed = format!("{}?u={}&w={}", self.feed_url, self.unit.code(), woeid);
        let query = format!("select * from rss where url = \"{feed}\"");

        let res = self
            .http
            .get(&self.yql_url)
            .query(&[("format", "json"), ("q", query.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "weather request failed");
            return Err(WidgetError::Malformed(format!(
                "weather request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WidgetError::Malformed(format!("undecodable weather payload: {e}"))
        })
    }
}

#[async_trait]
impl WeatherSource for YqlWeather {
    async fn current(&self, woeid: &str) -> Result<WeatherReading, WidgetError> {
        let envelope = self.fetch(woeid).await?;

        let item = envelope
            .query
            .results
            .map(|r| r.item)
            .ok_or_else(|| {
                WidgetError::Malformed("weather response carried no feed item".to_string())
            })?;

        // A feed item without a condition block is the service's way of
        // saying the WOEID led nowhere; its title is the only detail.
        let Some(condition) = item.condition else {
            return Err(WidgetError::MissingCondition(item.title.unwrap_or_default()));
        };

        tracing::debug!(woeid, temperature = condition.temp, "weather fetched");
        Ok(WeatherReading::new(condition.temp))
    }
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    query: FeedQuery,
}

#[derive(Debug, Deserialize)]
struct FeedQuery {
    results: Option<FeedResults>,
}

#[derive(Debug, Deserialize)]
struct FeedResults {
    item: FeedItem,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    title: Option<String>,
    condition: Option<FeedCondition>,
}

#[derive(Debug, Deserialize)]
struct FeedCondition {
    #[serde(deserialize_with = "lenient_f64")]
    temp: f64,
}

/// The feed serializes temperatures as strings ("21"); accept numbers too.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
