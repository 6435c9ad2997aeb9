//! Poe GraphQL API client
//!
//! Every request is a POST of a persisted query (`queryName` + `hash`) to
//! the single `gql_POST` endpoint, authenticated with the `p-b` / `p-lat`
//! cookie pair.

pub mod types;
#[cfg(test)]
mod tests;

pub use types::{BotDetails, BotDetailsResponse, ExploreBotsResponse};

use crate::config::{ApiConfig, Cookies};
use crate::error::{CrawlerError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

pub const BOT_LIST_QUERY: &str = "ExploreBotsListPaginationQuery";
pub const BOT_DETAILS_QUERY: &str = "MessagePointsOverviewModalQuery";

/// Source of raw catalog and detail payloads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotSource: Send + Sync {
    /// Raw `ExploreBotsListPaginationQuery` response
    async fn fetch_bot_list(&self) -> Result<Value>;

    /// Raw `MessagePointsOverviewModalQuery` response for one bot
    async fn fetch_bot_details(&self, bot_id: i64) -> Result<Value>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GqlRequest<'a> {
    query_name: &'a str,
    variables: Value,
    extensions: GqlExtensions<'a>,
}

#[derive(Debug, Serialize)]
struct GqlExtensions<'a> {
    hash: &'a str,
}

/// HTTP client for the Poe API
pub struct PoeClient {
    http: Client,
    config: ApiConfig,
}

impl PoeClient {
    pub fn new(config: ApiConfig, cookies: &Cookies) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("poegraphql", HeaderValue::from_static("1"));
        let cookie = HeaderValue::from_str(&cookies.header_value())
            .map_err(|e| CrawlerError::Config(format!("invalid cookie value: {}", e)))?;
        headers.insert(COOKIE, cookie);

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    /// Post a persisted query, retrying network and status failures with a
    /// fixed delay. The last error is returned once attempts run out.
    pub async fn post_query(&self, query_name: &str, variables: Value, hash: &str) -> Result<Value> {
        let request = GqlRequest {
            query_name,
            variables,
            extensions: GqlExtensions { hash },
        };
        let attempts = self.config.max_retries.max(1);
        let delay = Duration::from_secs(self.config.retry_delay_secs);

        let mut attempt = 1;
        loop {
            match self.try_post(&request).await {
                Ok(body) => {
                    debug!("{} succeeded on attempt {}", query_name, attempt);
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!("Attempt {}/{} of {} failed: {}", attempt, attempts, query_name, e);
                    info!("Retrying in {} second(s)...", delay.as_secs());
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("{} failed after {} attempt(s): {}", query_name, attempt, e);
                    return Err(e);
                }
            }
        }
    }

    async fn try_post(&self, request: &GqlRequest<'_>) -> Result<Value> {
        let response = self.http.post(&self.config.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlerError::Http {
                status: status.as_u16(),
                url: self.config.url.clone(),
            });
        }

        let body: Value = response.json().await?;
        // GraphQL reports failures in-band; without data there is nothing to use
        if body.get("data").map_or(true, Value::is_null) {
            if let Some(errors) = body.get("errors") {
                return Err(CrawlerError::Api(errors.to_string()));
            }
        }
        Ok(body)
    }
}

#[async_trait]
impl BotSource for PoeClient {
    async fn fetch_bot_list(&self) -> Result<Value> {
        info!("Fetching official bot list...");
        let variables = json!({
            "categoryName": "defaultCategory",
            "count": self.config.list_page_size,
            "cursor": null,
        });
        let body = self
            .post_query(BOT_LIST_QUERY, variables, &self.config.list_query_hash)
            .await?;
        info!("Successfully fetched official bot list");
        Ok(body)
    }

    async fn fetch_bot_details(&self, bot_id: i64) -> Result<Value> {
        debug!("Fetching details for bot ID: {}", bot_id);
        self.post_query(
            BOT_DETAILS_QUERY,
            json!({ "botId": bot_id }),
            &self.config.details_query_hash,
        )
        .await
    }
}
