//! Selector-driven scraping for configured news sites.
//!
//! Every site in the registry that carries [`SelectorRules`] goes through the
//! same three steps:
//!
//! 1. [`find_article_links`]: walk the listing page's article-container
//!    elements and collect deduplicated absolute URLs with preliminary titles
//! 2. [`extract_content`]: locate the article's content container, strip
//!    excluded sub-elements, and join the surviving normalized paragraphs
//! 3. [`scrape_site`]: drive both over a whole site with per-article failure
//!    isolation and politeness delays
//!
//! Discovery and extraction are pure functions over a parsed document, so
//! they are tested against synthetic HTML fixtures without any network.

use crate::crawl::Delays;
use crate::models::{Article, ArticleLink};
use crate::scrapers::fetch::{fetch_html, PAGE_TIMEOUT, TITLE_TIMEOUT};
use crate::sites::{SelectorRules, SiteConfig};
use crate::utils::{clean_text, resolve_url, scrape_timestamp};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Normalized text content of an element and its descendants.
fn element_text(element: ElementRef) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// The element's own `href` if it is a link, otherwise the `href` of its
/// first descendant link.
fn element_href<'a>(element: ElementRef<'a>, link_selector: &Selector) -> Option<&'a str> {
    if element.value().name() == "a" {
        if let Some(href) = element.value().attr("href") {
            return Some(href);
        }
    }
    element
        .select(link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
}

/// Find candidate article links on a listing page.
///
/// Returns at most `max_articles` links with URLs unique within this call,
/// in document order. Elements without a usable link, or whose URL cannot be
/// resolved against `base_url`, are skipped without aborting the page.
pub fn find_article_links(
    document: &Html,
    rules: &SelectorRules,
    base_url: &str,
    max_articles: usize,
) -> Vec<ArticleLink> {
    let Ok(article_selector) = Selector::parse(rules.article_selector) else {
        warn!(selector = rules.article_selector, "Invalid article selector");
        return Vec::new();
    };
    let title_selector = Selector::parse(rules.title_selector).ok();
    let link_selector = Selector::parse("a[href]").unwrap();

    let mut links = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for element in document.select(&article_selector) {
        let Some(href) = element_href(element, &link_selector) else {
            continue;
        };
        let Some(full_url) = resolve_url(href, base_url) else {
            debug!(href, "Could not resolve link; skipping");
            continue;
        };
        if !seen_urls.insert(full_url.clone()) {
            continue;
        }

        let title = title_selector
            .as_ref()
            .and_then(|sel| element.select(sel).next())
            .map(element_text)
            .unwrap_or_default();

        links.push(ArticleLink {
            url: full_url,
            title,
        });
        if links.len() >= max_articles {
            break;
        }
    }

    links
}

/// Extract article body text from a parsed page.
///
/// Returns `None` when the content container is absent. Otherwise strips
/// every element matching an exclusion selector (captions, share widgets,
/// ads must not contaminate the body), normalizes each content item, drops
/// empty ones, and joins the survivors with a blank line. The result may be
/// an empty string when the container holds no usable paragraphs.
pub fn extract_content(document: &Html, rules: &SelectorRules) -> Option<String> {
    let container_selector = Selector::parse(rules.content_container).ok()?;
    let content_selector = Selector::parse(rules.content_selector).ok()?;
    let container = document.select(&container_selector).next()?;

    let mut excluded_ids = HashSet::new();
    for raw in rules.exclude_selectors {
        if let Ok(selector) = Selector::parse(raw) {
            excluded_ids.extend(container.select(&selector).map(|e| e.id()));
        }
    }

    let paragraphs: Vec<String> = container
        .select(&content_selector)
        .filter(|item| {
            !excluded_ids.contains(&item.id())
                && !item.ancestors().any(|a| excluded_ids.contains(&a.id()))
        })
        .map(|item| {
            // Collect text nodes directly: an excluded element nested inside
            // a kept item must contribute nothing.
            let mut raw = String::new();
            for node in item.descendants() {
                if node.ancestors().any(|a| excluded_ids.contains(&a.id())) {
                    continue;
                }
                if let Some(text) = node.value().as_text() {
                    raw.push_str(text);
                    raw.push(' ');
                }
            }
            clean_text(&raw)
        })
        .filter(|text| !text.is_empty())
        .collect();

    Some(paragraphs.join("\n\n"))
}

/// Fetch an article page and extract its body text.
///
/// `Err` means the fetch itself failed (transport error or non-2xx);
/// `Ok(None)` means the page loaded but had no content container;
/// `Ok(Some(text))` is extracted body text, possibly empty.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn fetch_article_content(
    url: &str,
    rules: &SelectorRules,
) -> Result<Option<String>, reqwest::Error> {
    let html = fetch_html(url, PAGE_TIMEOUT).await?;
    let document = Html::parse_document(&html);
    Ok(extract_content(&document, rules))
}

/// Refetch an article page to recover a title the listing page didn't offer.
///
/// Tries the site's title selector broadened with common headline fallbacks.
/// Any failure yields `None`.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn recover_title(url: &str, rules: &SelectorRules) -> Option<String> {
    let html = fetch_html(url, TITLE_TIMEOUT).await.ok()?;
    let document = Html::parse_document(&html);
    let broadened = format!("{}, h1.title, h1", rules.title_selector);
    let selector = Selector::parse(&broadened).ok()?;
    document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|title| !title.is_empty())
}

/// Retention rule: an article is kept only with a title and content longer
/// than `min_content_len` bytes (0 for selector sites, 100 for Radio-Canada).
pub fn keep_article(title: &str, content: &str, min_content_len: usize) -> bool {
    !title.is_empty() && content.len() > min_content_len
}

/// Scrape one selector-configured site.
///
/// A listing-page failure returns an empty list; per-article failures are
/// logged and skipped. A randomized delay runs after each article to spare
/// the origin server.
#[instrument(level = "info", skip_all, fields(site = site.name))]
pub async fn scrape_site(site: &SiteConfig, rules: &SelectorRules, delays: &Delays) -> Vec<Article> {
    let listing = match fetch_html(site.url, PAGE_TIMEOUT).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Failed to fetch listing page; site contributes nothing");
            return Vec::new();
        }
    };

    let links = {
        let document = Html::parse_document(&listing);
        find_article_links(&document, rules, site.base_url, site.max_articles)
    };
    info!(count = links.len(), "Discovered article links");

    let mut articles = Vec::new();
    for (i, link) in links.iter().enumerate() {
        debug!(index = i + 1, total = links.len(), url = %link.url, "Processing article");

        let content = match fetch_article_content(&link.url, rules).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!(url = %link.url, "No content container found");
                String::new()
            }
            Err(e) => {
                warn!(url = %link.url, error = %e, "Article fetch failed");
                String::new()
            }
        };

        let mut title = link.title.clone();
        if title.is_empty() {
            if let Some(recovered) = recover_title(&link.url, rules).await {
                title = recovered;
            }
        }

        if keep_article(&title, &content, 0) {
            articles.push(Article {
                source: site.name.to_string(),
                title,
                url: link.url.clone(),
                content,
                date_scraped: scrape_timestamp(),
            });
        } else {
            debug!(url = %link.url, "Dropping article without title or content");
        }

        delays.article_pause().await;
    }

    info!(count = articles.len(), "Site scrape complete");
    articles
}
