use super::models::RawEvent;
use crate::error::{config_error, Error, PortalResult};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Query parameter carrying the cache-busting timestamp
pub const CACHE_BUSTER_PARAM: &str = "_";

/// Source of raw weekly events
#[async_trait]
pub trait EventFeed: Send + Sync {
    /// Fetch the current list of raw events
    async fn fetch_events(&self) -> PortalResult<Vec<RawEvent>>;
}

/// Feed backed by the spreadsheet's JSON endpoint
#[derive(Debug, Clone)]
pub struct HttpEventFeed {
    client: Client,
    feed_url: Url,
}

impl HttpEventFeed {
    pub fn new(feed_url: &str, timeout: Duration) -> PortalResult<Self> {
        let feed_url = Url::parse(feed_url)
            .map_err(|e| config_error(&format!("Failed to parse feed URL: {}", e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, feed_url })
    }

    /// Feed URL with a fresh cache-busting parameter appended
    pub fn request_url(&self) -> Url {
        let mut url = self.feed_url.clone();
        url.query_pairs_mut().append_pair(
            CACHE_BUSTER_PARAM,
            &Utc::now().timestamp_millis().to_string(),
        );
        url
    }
}

#[async_trait]
impl EventFeed for HttpEventFeed {
    #[instrument(skip(self), fields(feed = %self.feed_url))]
    async fn fetch_events(&self) -> PortalResult<Vec<RawEvent>> {
        let response = self
            .client
            .get(self.request_url())
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read feed body: {}", e)))?;
        let payload: Value = serde_json::from_str(&body)?;

        let events = extract_events(&payload);
        debug!("Feed returned {} events", events.len());

        Ok(events)
    }
}

/// Pull the `eventos` array out of a feed payload.
///
/// A missing or non-array field is an empty feed. Entries that are not
/// objects cannot be placed on the week and are skipped.
pub fn extract_events(payload: &Value) -> Vec<RawEvent> {
    let Some(items) = payload.get("eventos").and_then(|e| e.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<RawEvent>(item.clone()) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!("Skipping unreadable feed entry: {}", e);
                None
            }
        })
        .collect()
}
