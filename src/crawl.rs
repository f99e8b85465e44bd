//! Crawl orchestration across all configured sites.
//!
//! The orchestrator walks the site registry in order, scrapes each site,
//! deduplicates its articles against a seen-URL set accumulated across the
//! whole run (first occurrence wins), and pauses between sites. All mutable
//! crawl state lives in the [`crawl_sites`] call frame, so repeated runs in
//! one process are independent.
//!
//! A site that fails completely contributes zero articles and the crawl
//! moves on; the worst case of a fully failed crawl is an empty collection,
//! which every downstream stage accepts.

use crate::models::Article;
use crate::scrapers;
use crate::sites::{SiteConfig, SiteRules};
use rand::{rng, Rng};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Politeness delay bounds, in seconds.
///
/// These are deliberate blocking pauses of the (sequential) pipeline, not
/// asynchronous yields: nothing else runs while the crawl waits. If crawling
/// ever becomes concurrent across sites, these must become per-worker.
#[derive(Debug, Clone)]
pub struct Delays {
    /// Uniform range slept between article fetches within one site.
    pub article_secs: (f64, f64),
    /// Uniform range slept between sites.
    pub site_secs: (f64, f64),
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            article_secs: (1.0, 3.0),
            site_secs: (5.0, 10.0),
        }
    }
}

impl Delays {
    /// Zeroed delays, for tests and dry runs.
    pub fn none() -> Self {
        Self {
            article_secs: (0.0, 0.0),
            site_secs: (0.0, 0.0),
        }
    }

    /// Sleep a random duration from the inter-article range.
    pub async fn article_pause(&self) {
        pause(self.article_secs).await;
    }

    /// Sleep a random duration from the inter-site range.
    pub async fn site_pause(&self) {
        pause(self.site_secs).await;
    }
}

async fn pause(range: (f64, f64)) {
    let (lo, hi) = range;
    if hi <= 0.0 {
        return;
    }
    let secs = if lo < hi { rng().random_range(lo..hi) } else { lo };
    debug!(secs, "Politeness pause");
    sleep(Duration::from_secs_f64(secs)).await;
}

/// Scrape every site in order and return the globally deduplicated
/// collection.
///
/// `max_sites` caps the number of sites that *yield articles*: once that
/// many sites have contributed, remaining sites are skipped. Output order is
/// site-iteration order, then within-site discovery order.
#[instrument(level = "info", skip_all, fields(sites = sites.len()))]
pub async fn crawl_sites(
    sites: &[SiteConfig],
    delays: &Delays,
    max_sites: Option<usize>,
) -> Vec<Article> {
    let mut all_articles = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut successful_sites = 0usize;

    for site in sites {
        if let Some(cap) = max_sites {
            if successful_sites >= cap {
                info!(cap, "Reached site cap; stopping crawl");
                break;
            }
        }

        info!(site = site.name, "Scraping site");
        let site_articles = match &site.rules {
            SiteRules::Selectors(rules) => {
                scrapers::generic::scrape_site(site, rules, delays).await
            }
            SiteRules::RadioCanada => scrapers::radio_canada::scrape_site(site, delays).await,
        };

        let unique = dedup_against(site_articles, &mut seen_urls);
        info!(
            site = site.name,
            count = unique.len(),
            "Scraped unique articles from site"
        );
        if !unique.is_empty() {
            successful_sites += 1;
        }
        all_articles.extend(unique);

        // Politeness pause before hitting the next origin.
        delays.site_pause().await;
    }

    info!(
        total = all_articles.len(),
        successful_sites, "Crawl complete"
    );
    all_articles
}

/// Keep only articles whose URL has not been seen earlier in the run,
/// recording the survivors' URLs in `seen_urls`.
pub fn dedup_against(articles: Vec<Article>, seen_urls: &mut HashSet<String>) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|article| seen_urls.insert(article.url.clone()))
        .collect()
}
