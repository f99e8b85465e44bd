//! Radio-Canada scraping variant.
//!
//! Radio-Canada section pages have no stable per-site markup, so instead of
//! registry selectors this variant tries ordered lists of generic content and
//! title patterns and uses the first that yields anything. Its fetches also
//! go through the retrying fetcher ([`fetch_with_retry`]) because the site's
//! edge occasionally drops requests.
//!
//! Only URLs under `/nouvelle/` or `/info/` are treated as articles; video
//! and audio pages are filtered out at discovery time. Retention is stricter
//! than for the selector sites: body text must exceed 100 characters.

use crate::crawl::Delays;
use crate::models::{Article, ArticleLink};
use crate::scrapers::fetch::fetch_with_retry;
use crate::scrapers::generic::keep_article;
use crate::sites::SiteConfig;
use crate::utils::{clean_text, resolve_url, scrape_timestamp};
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Minimum body length (bytes, exclusive) for a Radio-Canada article.
pub const MIN_CONTENT_LEN: usize = 100;

/// Listing-page patterns that may wrap or be an article link.
const ARTICLE_ELEMENTS: &str =
    r#"article, .card, a[href*="/nouvelle/"], a[href*="/info/"], div.teaser, div.media"#;

/// Links inside a wrapper that point at article pages.
const ARTICLE_ANCHORS: &str = r#"a[href*="/nouvelle/"], a[href*="/info/"]"#;

/// Headline candidates on listing teasers.
const TEASER_TITLES: &str = "h1, h2, h3, .title, .headline";

/// Headline candidates on article pages.
const PAGE_TITLES: &str = "h1, .article-title, .title";

/// Content patterns tried in order on article pages; first hit wins.
const CONTENT_SELECTORS: &[&str] = &[
    "article p",
    ".article-body-container p",
    ".article-body p",
    ".editorial-content p",
    "main p",
    ".content p",
];

/// Broad containers scanned for paragraphs when every specific pattern missed.
const FALLBACK_CONTAINERS: &str = "article, .article, main, .article-content, .content";

/// Find article links on a Radio-Canada section page.
///
/// URLs are made absolute, filtered to news paths, and deduplicated within
/// the call. Teasers without a recoverable headline get a placeholder title
/// naming the section, which the article-page extraction usually overrides.
pub fn find_article_links(document: &Html, base_url: &str, section_url: &str) -> Vec<ArticleLink> {
    let element_selector = Selector::parse(ARTICLE_ELEMENTS).unwrap();
    let anchor_selector = Selector::parse(ARTICLE_ANCHORS).unwrap();
    let title_selector = Selector::parse(TEASER_TITLES).unwrap();

    let mut links = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for element in document.select(&element_selector) {
        let anchor = if element.value().name() == "a" {
            Some(element)
        } else {
            element.select(&anchor_selector).next()
        };
        let Some(href) = anchor.and_then(|a| a.value().attr("href")) else {
            continue;
        };
        let Some(full_url) = resolve_url(href, base_url) else {
            continue;
        };
        if !full_url.contains("/nouvelle/") && !full_url.contains("/info/") {
            continue;
        }
        if !seen_urls.insert(full_url.clone()) {
            continue;
        }

        let mut title = element
            .select(&title_selector)
            .next()
            .map(|t| clean_text(&t.text().collect::<Vec<_>>().join(" ")))
            .unwrap_or_default();
        if title.is_empty() {
            if let Some(a) = anchor {
                title = clean_text(&a.text().collect::<Vec<_>>().join(" "));
            }
        }
        if title.is_empty() {
            if let Some(attr) = element.value().attr("title") {
                title = clean_text(attr);
            }
        }
        if title.is_empty() {
            title = format!("Article from {section_url}");
        }

        debug!(%full_url, %title, "Found article link");
        links.push(ArticleLink {
            url: full_url,
            title,
        });
    }

    links
}

/// Extract title and body text from a parsed Radio-Canada article page.
///
/// Walks [`CONTENT_SELECTORS`] in order and takes the first pattern with any
/// non-empty paragraphs; if all miss, scans every paragraph under the
/// broadest matching container. The title comes from [`PAGE_TITLES`].
pub fn extract_article(document: &Html) -> (Option<String>, String) {
    let title_selector = Selector::parse(PAGE_TITLES).unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|t| clean_text(&t.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty());

    for raw in CONTENT_SELECTORS {
        let selector = Selector::parse(raw).unwrap();
        let paragraphs: Vec<String> = document
            .select(&selector)
            .map(|p| clean_text(&p.text().collect::<Vec<_>>().join(" ")))
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return (title, paragraphs.join("\n\n"));
        }
    }

    let container_selector = Selector::parse(FALLBACK_CONTAINERS).unwrap();
    let paragraph_selector = Selector::parse("p").unwrap();
    if let Some(container) = document.select(&container_selector).next() {
        let paragraphs: Vec<String> = container
            .select(&paragraph_selector)
            .map(|p| clean_text(&p.text().collect::<Vec<_>>().join(" ")))
            .filter(|text| !text.is_empty())
            .collect();
        return (title, paragraphs.join("\n\n"));
    }

    (title, String::new())
}

/// Fetch an article page with retry and extract title and body.
///
/// Returns `None` when the page stayed unavailable after all retry attempts;
/// the caller treats that as a skip.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn fetch_article(url: &str) -> Option<(Option<String>, String)> {
    let html = fetch_with_retry(url).await?;
    let document = Html::parse_document(&html);
    Some(extract_article(&document))
}

/// Scrape one Radio-Canada section.
///
/// A listing failure (after retries) yields an empty list. Per article:
/// retried fetch, fallback extraction, preliminary-title fallback, the
/// 100-character retention rule, and a randomized politeness delay.
#[instrument(level = "info", skip_all, fields(site = site.name))]
pub async fn scrape_site(site: &SiteConfig, delays: &Delays) -> Vec<Article> {
    let Some(listing) = fetch_with_retry(site.url).await else {
        warn!("Failed to fetch section page; site contributes nothing");
        return Vec::new();
    };

    let mut links = {
        let document = Html::parse_document(&listing);
        find_article_links(&document, site.base_url, site.url)
    };
    info!(count = links.len(), "Discovered article links");
    links.truncate(site.max_articles);

    let mut articles = Vec::new();
    for (i, link) in links.iter().enumerate() {
        debug!(index = i + 1, total = links.len(), url = %link.url, "Processing article");

        let Some((page_title, content)) = fetch_article(&link.url).await else {
            warn!(url = %link.url, "Article unavailable after retries; skipping");
            delays.article_pause().await;
            continue;
        };

        let title = page_title.unwrap_or_else(|| link.title.clone());
        if keep_article(&title, &content, MIN_CONTENT_LEN) {
            debug!(url = %link.url, %title, "Added article");
            articles.push(Article {
                source: site.name.to_string(),
                title,
                url: link.url.clone(),
                content,
                date_scraped: scrape_timestamp(),
            });
        } else {
            debug!(url = %link.url, "Missing title or substantial content; skipping");
        }

        delays.article_pause().await;
    }

    info!(count = articles.len(), "Site scrape complete");
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://ici.radio-canada.ca";

    #[test]
    fn test_find_links_filters_non_news_urls() {
        let html = Html::parse_document(
            r#"<article><a href="/nouvelle/12345/inondations">Inondations</a></article>
               <article><a href="/videos/98765/clip">Clip</a></article>"#,
        );
        let links = find_article_links(&html, BASE, "https://ici.radio-canada.ca/info");
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].url,
            "https://ici.radio-canada.ca/nouvelle/12345/inondations"
        );
    }

    #[test]
    fn test_find_links_dedupes_direct_and_wrapped() {
        // The bare anchor matches the element selector and so does its
        // wrapping card; the URL must come out once.
        let html = Html::parse_document(
            r#"<div class="card">
                 <h3 class="headline">Une nouvelle</h3>
                 <a href="/nouvelle/1/une-nouvelle">lire</a>
               </div>"#,
        );
        let links = find_article_links(&html, BASE, "https://ici.radio-canada.ca/info");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Une nouvelle");
    }

    #[test]
    fn test_find_links_placeholder_title() {
        let html = Html::parse_document(r#"<a href="/info/2/sans-titre"> </a>"#);
        let links = find_article_links(&html, BASE, "https://ici.radio-canada.ca/info");
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].title,
            "Article from https://ici.radio-canada.ca/info"
        );
    }

    #[test]
    fn test_extract_article_first_selector_wins() {
        let html = Html::parse_document(
            r#"<h1>Le titre</h1>
               <article><p>Premier paragraphe.</p><p>Deuxième.</p></article>
               <main><p>Should not be used</p></main>"#,
        );
        let (title, content) = extract_article(&html);
        assert_eq!(title.as_deref(), Some("Le titre"));
        assert_eq!(content, "Premier paragraphe.\n\nDeuxième.");
    }

    #[test]
    fn test_extract_article_fallback_container_scan() {
        // No pattern from the ordered list matches paragraphs directly, the
        // paragraphs hide inside a div under .article-content.
        let html = Html::parse_document(
            r#"<div class="article-content"><div><p>Caché ici.</p></div></div>"#,
        );
        let (title, content) = extract_article(&html);
        assert_eq!(title, None);
        assert_eq!(content, "Caché ici.");
    }

    #[test]
    fn test_extract_article_nothing_found() {
        let html = Html::parse_document(r#"<div class="unrelated">rien</div>"#);
        let (title, content) = extract_article(&html);
        assert_eq!(title, None);
        assert_eq!(content, "");
    }
}
