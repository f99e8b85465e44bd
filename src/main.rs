//! # Storylines Scout
//!
//! A news collection pipeline that scrapes articles from Quebec and Canadian
//! news sources, deduplicates and chunks them, and optionally scores the
//! collection for documentary potential through the Claude API.
//!
//! ## Features
//!
//! - Scrapes ~16 selector-configured sites (CBC sections, La Presse,
//!   Montreal Gazette, The Guardian Environment, community papers) plus 10
//!   Radio-Canada section pages with a retrying fetcher
//! - Deduplicates articles by URL within each site and across the whole run
//! - Writes full, summary, chunked JSON artifacts and a combined text report
//! - Optionally submits the collection for editorial analysis and emails the
//!   result
//!
//! ## Usage
//!
//! ```sh
//! storylines_scout -o ./scraped_data --analyze --email
//! ```
//!
//! ## Architecture
//!
//! A strictly sequential pipeline:
//! 1. **Crawl**: Discover and fetch articles site by site, with politeness
//!    delays between requests
//! 2. **Persist**: Write timestamped JSON and text artifacts
//! 3. **Analyze**: Send the compacted collection to the generation API
//! 4. **Notify**: Email the analysis to the configured recipient

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod chunker;
mod cli;
mod crawl;
mod email;
mod models;
mod outputs;
mod scrapers;
mod sites;
mod utils;

use api::{analyze_articles, AnalysisConfig};
use chunker::chunk_articles;
use cli::Cli;
use crawl::crawl_sites;
use email::EmailConfig;
use outputs::{json, report};
use sites::merged_sites;
use utils::{ensure_writable_dir, run_timestamp};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("storylines_scout starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.output_dir, args.exclude_rc, ?args.max_sites, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Crawl ----
    let sites = merged_sites(!args.exclude_rc);
    let delays = args.delays();
    info!(
        sites = sites.len(),
        radio_canada = sites.iter().filter(|s| s.is_radio_canada()).count(),
        "Starting crawl"
    );

    let articles = crawl_sites(&sites, &delays, args.max_sites).await;
    info!(count = articles.len(), "Total unique articles collected");

    // ---- Persist ----
    let timestamp = run_timestamp();

    if articles.is_empty() {
        warn!("No articles were scraped");
        if let Err(e) = json::write_empty_note(&args.output_dir, &timestamp).await {
            error!(error = %e, "Failed to write empty-run note");
        }
    } else {
        if let Err(e) = json::write_full(&articles, &args.output_dir, &timestamp).await {
            error!(error = %e, "Failed to write full JSON");
        }
        if let Err(e) = json::write_summary(&articles, &args.output_dir, &timestamp).await {
            error!(error = %e, "Failed to write summary JSON");
        }

        let chunks = chunk_articles(&articles, args.max_chunk_bytes);
        info!(chunks = chunks.len(), "Split collection into chunks");
        if let Err(e) = json::write_chunks(&chunks, &args.output_dir, &timestamp).await {
            error!(error = %e, "Failed to write chunk files");
        }
    }

    if let Err(e) = report::write_report(&articles, &args.output_dir, &timestamp).await {
        error!(error = %e, "Failed to write combined report");
    }

    // ---- Analyze ----
    let mut analysis_text: Option<String> = None;
    if args.analyze && !articles.is_empty() {
        match args.claude_api_key.as_deref() {
            Some(api_key) => {
                let config = AnalysisConfig::new(api_key.to_string(), args.model.clone());
                match analyze_articles(&config, &articles).await {
                    Ok(text) => {
                        let analysis_dir = format!("{}/analysis", args.output_dir);
                        if let Err(e) = tokio::fs::create_dir_all(&analysis_dir).await {
                            error!(error = %e, "Failed to create analysis dir");
                        }
                        let path = format!("{analysis_dir}/claude_analysis_{timestamp}.txt");
                        if let Err(e) = tokio::fs::write(&path, &text).await {
                            error!(%path, error = %e, "Failed to write analysis");
                        } else {
                            info!(%path, "Wrote analysis");
                        }
                        analysis_text = Some(text);
                    }
                    Err(e) => error!(error = %e, "Analysis failed; scrape artifacts are unaffected"),
                }
            }
            None => warn!("--analyze given but no Claude API key configured; skipping analysis"),
        }
    }

    // ---- Notify ----
    if args.email {
        match (&analysis_text, EmailConfig::from_env()) {
            (Some(text), Some(config)) => {
                if let Err(e) = email::send_analysis(&config, text) {
                    error!(error = %e, "Failed to send analysis email");
                }
            }
            (None, _) => warn!("--email given but no analysis was produced; skipping email"),
            (_, None) => warn!("--email given but SMTP settings are incomplete; skipping email"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = articles.len(),
        "Execution complete"
    );

    Ok(())
}
