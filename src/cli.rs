//! Command-line interface definitions.
//!
//! All options have defaults so a bare invocation performs a full crawl;
//! API and email settings can come from environment variables.

use crate::chunker::MAX_CHUNK_SIZE_BYTES;
use crate::crawl::Delays;
use clap::Parser;

/// Command-line arguments for the scout.
///
/// # Examples
///
/// ```sh
/// # Full crawl into ./scraped_data
/// storylines_scout
///
/// # Skip Radio-Canada, stop after 3 productive sites, no politeness delays
/// storylines_scout --exclude-rc --max-sites 3 --no-delays
///
/// # Crawl, analyze, and email the analysis
/// storylines_scout --analyze --email
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for scraped artifacts
    #[arg(short, long, default_value = "scraped_data")]
    pub output_dir: String,

    /// Exclude the Radio-Canada sources from the crawl
    #[arg(long)]
    pub exclude_rc: bool,

    /// Stop once this many sites have yielded articles
    #[arg(long)]
    pub max_sites: Option<usize>,

    /// Byte ceiling for each chunk file
    #[arg(long, default_value_t = MAX_CHUNK_SIZE_BYTES)]
    pub max_chunk_bytes: usize,

    /// Disable all politeness delays (dry runs and testing only)
    #[arg(long)]
    pub no_delays: bool,

    /// Lower bound of the inter-article delay, in seconds
    #[arg(long, default_value_t = 1.0)]
    pub article_delay_min: f64,

    /// Upper bound of the inter-article delay, in seconds
    #[arg(long, default_value_t = 3.0)]
    pub article_delay_max: f64,

    /// Lower bound of the inter-site delay, in seconds
    #[arg(long, default_value_t = 5.0)]
    pub site_delay_min: f64,

    /// Upper bound of the inter-site delay, in seconds
    #[arg(long, default_value_t = 10.0)]
    pub site_delay_max: f64,

    /// Send the scraped collection to Claude for documentary scoring
    #[arg(long)]
    pub analyze: bool,

    /// Claude API key (required with --analyze)
    #[arg(long, env = "CLAUDE_API_KEY")]
    pub claude_api_key: Option<String>,

    /// Model used for analysis
    #[arg(long, default_value = "claude-3-5-sonnet-20241022")]
    pub model: String,

    /// Email the analysis result (SMTP settings come from the environment)
    #[arg(long)]
    pub email: bool,
}

impl Cli {
    /// Politeness delay bounds derived from the flags.
    pub fn delays(&self) -> Delays {
        if self.no_delays {
            Delays::none()
        } else {
            Delays {
                article_secs: (self.article_delay_min, self.article_delay_max),
                site_secs: (self.site_delay_min, self.site_delay_max),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["storylines_scout"]);
        assert_eq!(cli.output_dir, "scraped_data");
        assert!(!cli.exclude_rc);
        assert_eq!(cli.max_sites, None);
        assert_eq!(cli.max_chunk_bytes, MAX_CHUNK_SIZE_BYTES);
        assert!(!cli.analyze);
        assert!(!cli.email);
    }

    #[test]
    fn test_cli_crawl_flags() {
        let cli = Cli::parse_from([
            "storylines_scout",
            "--exclude-rc",
            "--max-sites",
            "3",
            "-o",
            "/tmp/out",
        ]);
        assert!(cli.exclude_rc);
        assert_eq!(cli.max_sites, Some(3));
        assert_eq!(cli.output_dir, "/tmp/out");
    }

    #[test]
    fn test_cli_delays() {
        let cli = Cli::parse_from(["storylines_scout", "--article-delay-min", "0.5"]);
        let delays = cli.delays();
        assert_eq!(delays.article_secs, (0.5, 3.0));
        assert_eq!(delays.site_secs, (5.0, 10.0));

        let quiet = Cli::parse_from(["storylines_scout", "--no-delays"]);
        assert_eq!(quiet.delays().article_secs, (0.0, 0.0));
    }
}
