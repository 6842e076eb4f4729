//! Data models for NewsAPI responses and their classified representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: A raw article as returned by NewsAPI
//! - [`NewsApiResponse`]: The envelope around a page of articles
//! - [`ClassifiedArticle`]: An article paired with the locale it was tagged with
//! - [`LocaleWeights`]: Per-locale article counts for one fetch
//! - [`PanelState`]: The lifecycle of the panel's current result set
//!
//! Wire types use camelCase field names to match the NewsAPI JSON schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

/// The publisher block attached to each NewsAPI article.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ArticleSource {
    /// NewsAPI source identifier, absent for many smaller outlets.
    pub id: Option<String>,
    /// Display name of the outlet.
    pub name: Option<String>,
}

/// A single article as returned by NewsAPI.
///
/// Every field is optional on the wire. Unknown fields are ignored so that
/// additions to the API do not break decoding.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// The outlet that published the article.
    pub source: Option<ArticleSource>,
    /// The byline.
    pub author: Option<String>,
    /// The headline.
    pub title: Option<String>,
    /// A short description or lede.
    pub description: Option<String>,
    /// Link to the full article.
    pub url: Option<String>,
    /// Link to the lead image.
    pub url_to_image: Option<String>,
    /// RFC 3339 publication timestamp.
    pub published_at: Option<String>,
    /// Truncated body text, usually ending in a `[+N chars]` marker.
    pub content: Option<String>,
}

impl Article {
    /// Text shown under the headline: `content` if non-empty, else `description`.
    pub fn display_text(&self) -> Option<&str> {
        match self.content.as_deref() {
            Some(c) if !c.is_empty() => Some(c),
            _ => self.description.as_deref(),
        }
    }
}

/// Response envelope for both `/v2/everything` and `/v2/top-headlines`.
///
/// Successful responses carry `status: "ok"` and `articles`. Failures carry
/// `status: "error"` plus a `code` and `message`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: Option<String>,
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Article>,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl NewsApiResponse {
    /// Turn an error envelope into a [`NewsApiError`], or hand back the articles.
    pub fn into_articles(self) -> Result<Vec<Article>, NewsApiError> {
        if self.status.as_deref() == Some("error") {
            return Err(NewsApiError {
                code: self.code.unwrap_or_else(|| "unknown".to_string()),
                message: self.message.unwrap_or_default(),
            });
        }
        Ok(self.articles)
    }
}

/// An error reported by NewsAPI in the response body.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsApiError {
    pub code: String,
    pub message: String,
}

impl fmt::Display for NewsApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NewsAPI error {}: {}", self.code, self.message)
    }
}

impl Error for NewsApiError {}

/// An article together with the locale keyword it was tagged with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedArticle {
    #[serde(flatten)]
    pub article: Article,
    /// First locale (in caller order) found in the title or content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl ClassifiedArticle {
    /// The locale tag, treating an empty string the same as no tag.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref().filter(|l| !l.is_empty())
    }
}

/// Number of classified articles per locale within one fetch.
///
/// Locales with no matching article never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocaleWeights(BTreeMap<String, usize>);

impl LocaleWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the tally for `locale`.
    pub fn record(&mut self, locale: &str) {
        *self.0.entry(locale.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, locale: &str) -> usize {
        self.0.get(locale).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Lifecycle of the panel's result set.
///
/// The state is only ever replaced wholesale; it is never merged with a
/// previous result set.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    /// A request for the current inputs is in flight.
    Loading,
    /// The latest request completed and its articles were classified.
    Loaded { articles: Vec<ClassifiedArticle> },
    /// The latest request failed.
    Failed { message: String },
}

impl PanelState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }

    /// Classified articles of a loaded state; empty otherwise.
    pub fn articles(&self) -> &[ClassifiedArticle] {
        match self {
            PanelState::Loaded { articles } => articles,
            _ => &[],
        }
    }
}
