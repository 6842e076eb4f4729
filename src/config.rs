//! Runtime configuration for the panel.
//!
//! Settings come from two places, merged with the command line taking
//! precedence:
//! - [`Cli`] flags and their environment fallbacks
//! - An optional YAML [`PanelConfig`] file passed with `--config`
//!
//! The merged result is split into the API connection settings
//! ([`NewsApiConfig`]) and the panel inputs ([`PanelInputs`]).

use crate::cli::Cli;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{debug, info, instrument};
use url::Url;

/// Base URL used when neither the CLI nor the config file names one.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Connection settings for NewsAPI.
///
/// The API key is carried explicitly rather than read from the process
/// environment when a request is built.
#[derive(Clone, PartialEq)]
pub struct NewsApiConfig {
    pub api_key: String,
    /// Scheme and host without a trailing slash, e.g. `https://newsapi.org`.
    pub base_url: String,
}

impl NewsApiConfig {
    /// Validate `base_url` and normalize away any trailing slash.
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, Box<dyn Error>> {
        let parsed = Url::parse(base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("unsupported base URL scheme: {}", parsed.scheme()).into());
        }
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Optional YAML config file.
///
/// ```yaml
/// api_key: "..."
/// base_url: "https://newsapi.org"
/// locales: ["Paris", "Berlin"]
/// topic: "election"
/// selected_locale: "Paris"
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PanelConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub locales: Vec<String>,
    pub topic: Option<String>,
    pub selected_locale: Option<String>,
}

impl PanelConfig {
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config: PanelConfig = serde_yaml::from_str(&raw)?;
        info!(locales = config.locales.len(), "Loaded panel config");
        Ok(config)
    }
}

/// The inputs the parent hands to the panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelInputs {
    /// Ordered locale keywords; order decides which locale wins a tie.
    pub locales: Vec<String>,
    /// Optional search topic; empty is treated as absent.
    pub topic: Option<String>,
    /// Locale whose articles are highlighted in the view.
    pub selected_locale: Option<String>,
}

impl PanelInputs {
    pub fn new(locales: Vec<String>, topic: Option<String>, selected_locale: Option<String>) -> Self {
        Self {
            locales: normalize_locales(locales),
            topic: topic.filter(|t| !t.is_empty()),
            selected_locale: selected_locale.filter(|s| !s.is_empty()),
        }
    }
}

/// Drop empty locale names and duplicates, keeping first-seen order.
///
/// An empty name would match every article as a substring, so it is never
/// passed on to classification.
pub fn normalize_locales<I>(locales: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    locales
        .into_iter()
        .filter(|l| !l.is_empty())
        .unique()
        .collect()
}

/// Split a comma separated list such as `"Paris, Berlin"` into locale names.
pub fn parse_locale_list(raw: &str) -> Vec<String> {
    normalize_locales(raw.split(',').map(|l| l.trim().to_string()))
}

/// Merge CLI flags over the optional config file.
#[instrument(level = "info", skip_all)]
pub fn resolve(cli: &Cli) -> Result<(NewsApiConfig, PanelInputs), Box<dyn Error>> {
    let file = match cli.config.as_deref() {
        Some(path) => PanelConfig::load(path)?,
        None => PanelConfig::default(),
    };

    let api_key = cli
        .api_key
        .clone()
        .or(file.api_key)
        .filter(|k| !k.is_empty())
        .ok_or("no NewsAPI key: pass --api-key, set NEWS_API_KEY, or add api_key to the config file")?;
    let base_url = cli
        .base_url
        .clone()
        .or(file.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let api = NewsApiConfig::new(api_key, &base_url)?;

    let locales = if cli.locale.is_empty() {
        file.locales
    } else {
        cli.locale.clone()
    };
    let inputs = PanelInputs::new(
        locales,
        cli.topic.clone().or(file.topic),
        cli.selected.clone().or(file.selected_locale),
    );

    debug!(?api, ?inputs, "Resolved configuration");
    Ok((api, inputs))
}
