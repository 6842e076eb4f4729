//! Command-line interface definitions for Locale News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The API key and base URL can also be provided via environment variables.

use clap::Parser;

/// Command-line arguments for the Locale News application.
///
/// # Examples
///
/// ```sh
/// # Top headlines, no locale filtering
/// NEWS_API_KEY=... locale_news
///
/// # Search a topic near two places, highlighting one of them
/// locale_news -t election -l Paris -l Berlin -s Paris
///
/// # Keep the panel open and change inputs from stdin
/// locale_news -l Paris -i
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// NewsAPI base URL
    #[arg(long, env = "NEWS_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Locale keyword to search for and tag articles with (repeatable, order matters)
    #[arg(short, long)]
    pub locale: Vec<String>,

    /// Search topic
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Locale whose articles are highlighted
    #[arg(short, long)]
    pub selected: Option<String>,

    /// Optional path to a YAML panel config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for JSON snapshots of each completed fetch
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Write the rendered Markdown to this file instead of stdout
    #[arg(short, long)]
    pub markdown_output: Option<String>,

    /// Read panel commands from stdin after the first fetch
    #[arg(short, long)]
    pub interactive: bool,
}
