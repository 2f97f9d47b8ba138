//! OMDb search client.
//!
//! One request per search: `GET {base_url}?s=<query>&apikey=<key>`.
//! OMDb reports most failures in-band (`"Response": "False"`), so the
//! HTTP status alone does not decide success.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::provider::{MovieSearch, SearchError};
use super::types::{Movie, SearchResponse};
use crate::core::config::DEFAULT_OMDB_BASE_URL;

pub struct OmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OmdbClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.to_string());
        if api_key.is_empty() {
            warn!("OMDb API key is empty; searches will be rejected by the service");
        }
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Maps a decoded OMDb payload onto the search outcome.
///
/// A "Movie not found!" answer is an empty result set, not a failure.
/// A body with neither `Response` nor `Search` is not an OMDb answer.
fn interpret(status: u16, body: SearchResponse) -> Result<Vec<Movie>, SearchError> {
    if !body.is_recognized() {
        return Err(SearchError::Parse(
            "body has neither a Response nor a Search field".to_string(),
        ));
    }
    if body.is_success() {
        return Ok(body.search.unwrap_or_default());
    }
    if body.is_not_found() {
        return Ok(Vec::new());
    }
    Err(SearchError::Api {
        status,
        message: body
            .error
            .unwrap_or_else(|| "unknown error".to_string()),
    })
}

#[async_trait]
impl MovieSearch for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, SearchError> {
        info!("OMDb search request: s={:?}", query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("s", query), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    SearchError::Config(e.to_string())
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        debug!("OMDb response status: {}", status);

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("OMDb API error: {} - {}", status, err_body);
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        let body: SearchResponse =
            serde_json::from_str(&text).map_err(|e| SearchError::Parse(e.to_string()))?;

        let movies = interpret(status.as_u16(), body)?;
        info!("OMDb search {:?} returned {} movies", query, movies.len());
        Ok(movies)
    }
}
