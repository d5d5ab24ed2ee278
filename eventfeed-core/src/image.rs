//! Representative image lookup.
//!
//! Lookups are fail-soft: whatever goes wrong, the caller gets `None` and the
//! conversion carries on without a picture.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::UnsplashConfig;
use crate::error::{EventfeedError, EventfeedResult};
use crate::tagger::TagSet;

/// Something that can find a picture for a short text query.
#[allow(async_fn_in_trait)]
pub trait ImageSearch {
    /// Return at most one image URL. Never fails; failures are logged and
    /// reported as `None`.
    async fn find_image(&self, query: &str) -> Option<String>;
}

impl<T: ImageSearch> ImageSearch for &T {
    async fn find_image(&self, query: &str) -> Option<String> {
        (**self).find_image(query).await
    }
}

/// Build the search query for an event: first tag (if any) followed by the summary.
pub fn image_query(tags: &TagSet, summary: &str) -> String {
    match tags.first() {
        Some(tag) => format!("{} {}", tag, summary).trim().to_string(),
        None => summary.trim().to_string(),
    }
}

/// Image lookup that never returns anything (no access key, or `--no-images`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageSearch for NoImages {
    async fn find_image(&self, _query: &str) -> Option<String> {
        None
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Unsplash photo search client.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    client: reqwest::Client,
    api_url: String,
    access_key: String,
    query_suffix: String,
}

impl UnsplashClient {
    pub fn new(access_key: &str, config: &UnsplashConfig) -> EventfeedResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| EventfeedError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(UnsplashClient {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            query_suffix: config.query_suffix.trim().to_string(),
        })
    }

    /// Run one landscape photo search and return the first result's regular-size URL.
    pub async fn search(&self, query: &str) -> EventfeedResult<Option<String>> {
        let full_query = if self.query_suffix.is_empty() {
            query.to_string()
        } else {
            format!("{} {}", query, self.query_suffix)
        };
        debug!(query = %full_query, "Searching Unsplash");

        let response = self
            .client
            .get(format!("{}/search/photos", self.api_url))
            .query(&[
                ("query", full_query.as_str()),
                ("per_page", "1"),
                ("client_id", self.access_key.as_str()),
                ("orientation", "landscape"),
            ])
            .send()
            .await
            .map_err(|e| EventfeedError::ImageLookup(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EventfeedError::ImageLookup(format!(
                "Unsplash returned {status}: {body}"
            )));
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| EventfeedError::ImageLookup(format!("Invalid response: {e}")))?;

        Ok(data.results.into_iter().next().map(|photo| photo.urls.regular))
    }
}

impl ImageSearch for UnsplashClient {
    async fn find_image(&self, query: &str) -> Option<String> {
        match self.search(query).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                debug!(query, "No image found");
                None
            }
            Err(e) => {
                warn!("Error fetching image for query '{}': {}", query, e);
                None
            }
        }
    }
}
