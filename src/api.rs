//! NewsAPI HTTP access.
//!
//! The module uses a trait-based design so the panel can be driven by a
//! fake source in tests:
//! - [`ArticleFetcher`]: Core trait defining one fetch of one endpoint
//! - [`HttpFetcher`]: `reqwest` implementation that performs a single GET
//!
//! There is no retry or backoff; a failed request fails the fetch.

use crate::endpoint::redact_key;
use crate::models::{Article, NewsApiResponse};
use crate::utils::truncate_for_log;
use reqwest::StatusCode;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Trait for fetching one page of articles from an endpoint URL.
pub trait ArticleFetcher {
    /// Fetch and decode the articles at `endpoint`.
    ///
    /// A response without an `articles` array yields an empty list.
    async fn fetch(&self, endpoint: &str) -> Result<Vec<Article>, Box<dyn Error>>;
}

/// Fetches articles over HTTP with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }
}

impl ArticleFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(endpoint = %redact_key(endpoint)))]
    async fn fetch(&self, endpoint: &str) -> Result<Vec<Article>, Box<dyn Error>> {
        let t0 = Instant::now();
        let resp = self.client.get(endpoint).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            let message = http_error_message(status, &body);
            warn!(
                %status,
                elapsed_ms = dt.as_millis(),
                body_preview = %truncate_for_log(&body, 300),
                "NewsAPI request failed"
            );
            return Err(message.into());
        }

        let articles = match parse_response(&body) {
            Ok(articles) => articles,
            Err(e) => {
                warn!(
                    %status,
                    elapsed_ms = dt.as_millis(),
                    body_preview = %truncate_for_log(&body, 300),
                    error = %e,
                    "NewsAPI response could not be decoded"
                );
                return Err(e);
            }
        };

        info!(
            %status,
            count = articles.len(),
            elapsed_ms = dt.as_millis(),
            "Fetched articles"
        );
        Ok(articles)
    }
}

/// Describe a non-2xx response, keeping the NewsAPI error text when the body has one.
pub fn http_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<NewsApiResponse>(body).map(NewsApiResponse::into_articles) {
        Ok(Err(api_error)) => format!("NewsAPI returned HTTP {}: {}", status, api_error),
        _ => format!("NewsAPI returned HTTP {}", status),
    }
}

/// Decode a NewsAPI body, turning `status: "error"` envelopes into errors.
pub fn parse_response(body: &str) -> Result<Vec<Article>, Box<dyn Error>> {
    let resp: NewsApiResponse = serde_json::from_str(body)?;
    debug!(status = ?resp.status, total_results = ?resp.total_results, "Decoded NewsAPI response");
    Ok(resp.into_articles()?)
}
