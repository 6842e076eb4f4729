//! JSON snapshots of completed fetches.
//!
//! Each snapshot records the inputs, the reported locale weights, and the
//! classified articles of one fetch.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── latest.json
//! └── 2026-10-18/
//!     ├── 09-15-02.json
//!     └── 09-21-40.json
//! ```

use crate::config::PanelInputs;
use crate::models::{ClassifiedArticle, LocaleWeights};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
pub struct PanelSnapshot<'a> {
    pub fetched_at: String,
    pub topic: Option<&'a str>,
    pub locales: &'a [String],
    pub weights: &'a LocaleWeights,
    pub articles: &'a [ClassifiedArticle],
}

impl<'a> PanelSnapshot<'a> {
    pub fn new(
        fetched_at: DateTime<Local>,
        inputs: &'a PanelInputs,
        weights: &'a LocaleWeights,
        articles: &'a [ClassifiedArticle],
    ) -> Self {
        Self {
            fetched_at: fetched_at.to_rfc3339(),
            topic: inputs.topic.as_deref(),
            locales: &inputs.locales,
            weights,
            articles,
        }
    }
}

/// Write `snapshot` to a dated file and to `latest.json`.
///
/// # Returns
///
/// The path of the dated file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    snapshot: &PanelSnapshot<'_>,
    json_output_dir: &str,
    now: DateTime<Local>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let dated_dir = PathBuf::from(json_output_dir).join(now.format("%Y-%m-%d").to_string());
    if let Err(e) = fs::create_dir_all(&dated_dir).await {
        error!(dir = %dated_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let dated_path = dated_dir.join(format!("{}.json", now.format("%H-%M-%S")));
    fs::write(&dated_path, &json).await?;
    fs::write(PathBuf::from(json_output_dir).join("latest.json"), &json).await?;
    info!(path = %dated_path.display(), "Wrote JSON snapshot");

    Ok(dated_path)
}
