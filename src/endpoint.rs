//! NewsAPI endpoint construction.
//!
//! Two endpoints are used:
//!
//! | Inputs | Endpoint | Page size |
//! |--------|----------|-----------|
//! | no topic, no locales | `/v2/top-headlines` (US, English) | 20 |
//! | topic and/or locales | `/v2/everything`, last 14 days, by popularity | 100 |
//!
//! The search keyword expression is `"topic" AND (L1 OR L2 ...)`, or
//! whichever half is present.

use crate::config::NewsApiConfig;
use chrono::{Duration, Local, NaiveDate};
use tracing::debug;
use url::Url;

pub const HEADLINES_PAGE_SIZE: u32 = 20;
pub const SEARCH_PAGE_SIZE: u32 = 100;
pub const LOOKBACK_DAYS: i64 = 14;
const LANGUAGE: &str = "en";
const COUNTRY: &str = "us";
const API_KEY_PARAM: &str = "apiKey";

/// Builds request URLs for a fixed API configuration.
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    config: NewsApiConfig,
}

impl EndpointBuilder {
    pub fn new(config: NewsApiConfig) -> Self {
        Self { config }
    }

    /// Build the endpoint for `topic` and `locales`, dated from today.
    pub fn build(&self, topic: Option<&str>, locales: &[String]) -> String {
        self.build_for_date(topic, locales, Local::now().date_naive())
    }

    /// Build the endpoint with the lookback window counted back from `today`.
    pub fn build_for_date(&self, topic: Option<&str>, locales: &[String], today: NaiveDate) -> String {
        let endpoint = match keyword_expression(topic, locales) {
            Some(keywords) => self.everything(&keywords, today),
            None => self.top_headlines(),
        };
        debug!(endpoint = %redact_key(&endpoint), "Built NewsAPI endpoint");
        endpoint
    }

    fn top_headlines(&self) -> String {
        format!(
            "{}/v2/top-headlines?pageSize={}&language={}&country={}&apiKey={}",
            self.config.base_url,
            HEADLINES_PAGE_SIZE,
            LANGUAGE,
            COUNTRY,
            urlencoding::encode(&self.config.api_key),
        )
    }

    fn everything(&self, keywords: &str, today: NaiveDate) -> String {
        let from = today - Duration::days(LOOKBACK_DAYS);
        format!(
            "{}/v2/everything?q={}&from={}&sortBy=popularity&apiKey={}&pageSize={}&language={}",
            self.config.base_url,
            urlencoding::encode(keywords),
            from.format("%Y-%m-%d"),
            urlencoding::encode(&self.config.api_key),
            SEARCH_PAGE_SIZE,
            LANGUAGE,
        )
    }
}

/// The search expression for `topic` and `locales`, or `None` when both are empty.
pub fn keyword_expression(topic: Option<&str>, locales: &[String]) -> Option<String> {
    let topic = topic.filter(|t| !t.is_empty());
    let group = (!locales.is_empty()).then(|| format!("({})", locales.join(" OR ")));

    match (topic, group) {
        (Some(t), Some(g)) => Some(format!("\"{}\" AND {}", t, g)),
        (Some(t), None) => Some(format!("\"{}\"", t)),
        (None, Some(g)) => Some(g),
        (None, None) => None,
    }
}

/// Replace the `apiKey` query value so endpoints can be logged.
///
/// Anything that does not parse as a URL or carries no key comes back unchanged.
pub fn redact_key(endpoint: &str) -> String {
    let Ok(mut url) = Url::parse(endpoint) else {
        return endpoint.to_string();
    };
    if !url.query_pairs().any(|(k, _)| k == API_KEY_PARAM) {
        return endpoint.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}
