//! # Locale News
//!
//! A news panel for the terminal. It fetches articles from
//! [NewsAPI](https://newsapi.org), tags each article with the first locale
//! keyword found in its title or content, reports how many articles landed
//! on each locale, and renders the tagged articles as Markdown.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... locale_news -t election -l Paris -l Berlin -s Paris
//! ```
//!
//! ## Architecture
//!
//! 1. **Endpoint**: Build a headlines or search URL from the topic and locales
//! 2. **Fetching**: One GET per input change, no retries
//! 3. **Classification**: First-match locale tagging, then per-locale weights
//! 4. **Output**: Markdown view on stdout (or a file) and optional JSON snapshots
//!
//! In interactive mode (`-i`) the panel keeps running and reads commands
//! from stdin. Input changes can overlap in-flight requests; only the
//! latest request is allowed to update the panel.

use chrono::Local;
use clap::Parser;
use futures::stream::{FuturesUnordered, StreamExt};
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod classify;
mod cli;
mod commands;
mod config;
mod endpoint;
mod models;
mod outputs;
mod panel;
mod utils;

use api::{ArticleFetcher, HttpFetcher};
use cli::Cli;
use commands::{apply_command, parse_command, CommandOutcome, HELP};
use endpoint::EndpointBuilder;
use models::{Article, LocaleWeights, PanelState};
use outputs::json::{write_snapshot, PanelSnapshot};
use outputs::markdown;
use panel::{ArticlePanel, Completion, FetchTicket};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("locale_news starting up");

    let args = Cli::parse();
    let (api_config, inputs) = config::resolve(&args)?;
    debug!(?inputs, interactive = args.interactive, "Parsed CLI arguments");

    if let Some(dir) = args.json_output_dir.as_deref() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let fetcher = HttpFetcher::new()?;

    // The weight callback is the panel's only outbound side effect.
    let latest_weights: Rc<RefCell<Option<LocaleWeights>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&latest_weights);
    let on_weights = Box::new(move |weights: &LocaleWeights| {
        for (locale, count) in weights.iter() {
            info!(%locale, count, "Locale weight");
        }
        *sink.borrow_mut() = Some(weights.clone());
    });

    let mut panel = ArticlePanel::new(EndpointBuilder::new(api_config), inputs, on_weights);

    if args.interactive {
        run_interactive(&mut panel, &fetcher, &args, &latest_weights).await?;
    } else {
        panel.refresh(&fetcher).await;
        record_fetch(&panel, &args, &latest_weights).await?;
        if let PanelState::Failed { message } = panel.state() {
            return Err(message.clone().into());
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn run_ticket<F: ArticleFetcher>(
    fetcher: &F,
    ticket: FetchTicket,
) -> (u64, Result<Vec<Article>, Box<dyn Error>>) {
    let result = fetcher.fetch(&ticket.endpoint).await;
    (ticket.generation, result)
}

/// Read commands from stdin while requests run in the background.
#[instrument(level = "info", skip_all)]
async fn run_interactive(
    panel: &mut ArticlePanel,
    fetcher: &HttpFetcher,
    args: &Cli,
    latest_weights: &Rc<RefCell<Option<LocaleWeights>>>,
) -> Result<(), Box<dyn Error>> {
    let mut in_flight = FuturesUnordered::new();
    in_flight.push(run_ticket(fetcher, panel.begin_fetch()));
    eprintln!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let cmd = match parse_command(&line) {
                    Ok(Some(cmd)) => cmd,
                    Ok(None) => continue,
                    Err(msg) => {
                        eprintln!("{}", msg);
                        continue;
                    }
                };
                debug!(?cmd, "Received command");
                let ticket = match apply_command(panel, cmd) {
                    CommandOutcome::Fetch(ticket) => Some(ticket),
                    CommandOutcome::Render => {
                        render_view(panel, args).await?;
                        None
                    }
                    CommandOutcome::Help => {
                        eprintln!("{}", HELP);
                        None
                    }
                    CommandOutcome::Nothing => None,
                    CommandOutcome::Quit => break,
                };
                if let Some(ticket) = ticket {
                    info!(generation = ticket.generation, in_flight = in_flight.len() + 1, "Inputs changed; fetching");
                    in_flight.push(run_ticket(fetcher, ticket));
                }
            }
            Some((generation, result)) = in_flight.next(), if !in_flight.is_empty() => {
                if panel.complete(generation, result) == Completion::Applied {
                    record_fetch(panel, args, latest_weights).await?;
                }
            }
        }
    }

    // Let the newest request land before exiting.
    while let Some((generation, result)) = in_flight.next().await {
        if panel.complete(generation, result) == Completion::Applied {
            record_fetch(panel, args, latest_weights).await?;
        }
    }
    Ok(())
}

/// Render the panel to the Markdown file or stdout.
async fn render_view(panel: &ArticlePanel, args: &Cli) -> Result<(), Box<dyn Error>> {
    let md = markdown::render_panel(panel.inputs(), panel.state());
    match args.markdown_output.as_deref() {
        Some(path) => {
            tokio::fs::write(path, &md).await?;
            info!(%path, "Wrote panel Markdown");
        }
        None => println!("{}", md),
    }
    Ok(())
}

/// Render the panel after a completed fetch and snapshot a loaded state.
async fn record_fetch(
    panel: &ArticlePanel,
    args: &Cli,
    latest_weights: &Rc<RefCell<Option<LocaleWeights>>>,
) -> Result<(), Box<dyn Error>> {
    render_view(panel, args).await?;

    let (Some(dir), PanelState::Loaded { articles }) = (args.json_output_dir.as_deref(), panel.state())
    else {
        return Ok(());
    };
    let Some(weights) = latest_weights.borrow().clone() else {
        warn!("Loaded state without reported weights; skipping snapshot");
        return Ok(());
    };
    let now = Local::now();
    let snapshot = PanelSnapshot::new(now, panel.inputs(), &weights, articles);
    if let Err(e) = write_snapshot(&snapshot, dir, now).await {
        error!(error = %e, "Failed to write JSON snapshot");
    }
    Ok(())
}
