//! HTTP client for the USGS GeoJSON feeds.

use super::model::{Feature, RawFeatureCollection};
use super::{FeedRequest, DEFAULT_FEED_URL};
use crate::error::{Result, SeismoError};
use std::time::Duration;

/// Anything that can produce a feed snapshot for a request.
pub trait FeedSource: Send + Sync {
    /// Retrieve and decode one snapshot.
    fn fetch(&self, request: &FeedRequest) -> Result<Vec<Feature>>;
}

/// Decode a GeoJSON FeatureCollection body into features, keeping feed order.
pub fn parse_feed(body: &str) -> Result<Vec<Feature>> {
    let collection: RawFeatureCollection = serde_json::from_str(body)?;
    Ok(collection
        .features
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| Feature::from_raw(raw, idx))
        .collect())
}

/// Blocking client for the public feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a client against the default USGS host.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_FEED_URL, timeout)
    }

    /// Create a client against a custom host (mirrors, tests).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("seismoscope/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Host the client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl FeedSource for FeedClient {
    fn fetch(&self, request: &FeedRequest) -> Result<Vec<Feature>> {
        let url = request.url(&self.base_url);
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeismoError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let features = parse_feed(&body)?;
        tracing::info!("Fetched {} features from {}", features.len(), url);
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_feed_keeps_order() {
        let body = r#"{
            "type": "FeatureCollection",
            "metadata": { "count": 2 },
            "features": [
                { "id": "b", "properties": { "mag": 1.0 }, "geometry": { "coordinates": [1, 2, 3] } },
                { "id": "a", "properties": { "mag": 2.0 }, "geometry": { "coordinates": [4, 5, 6] } }
            ]
        }"#;

        let features = parse_feed(body).unwrap();
        let ids: Vec<_> = features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn parse_feed_rejects_malformed_bodies() {
        assert!(matches!(parse_feed("<html>"), Err(SeismoError::Parse(_))));
        assert!(matches!(
            parse_feed(r#"{ "features": 3 }"#),
            Err(SeismoError::Parse(_))
        ));
    }

    #[test]
    fn empty_collection_is_not_an_error() {
        assert!(parse_feed(r#"{ "type": "FeatureCollection", "features": [] }"#)
            .unwrap()
            .is_empty());
        assert!(parse_feed("{}").unwrap().is_empty());
    }
}
