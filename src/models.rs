//! Data models for scraped news articles.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`ArticleLink`]: A candidate article discovered on a listing page
//! - [`Article`]: A fully scraped article, the durable unit of the run
//! - [`CompactArticle`]: A size-capped projection sent to the analysis API
//!
//! Articles are process-local: each run starts from an empty collection and
//! the only cross-run identity is the article URL and the timestamped output
//! filename.

use serde::{Deserialize, Serialize};

/// Maximum number of articles forwarded to the analysis API in one call.
pub const ANALYSIS_MAX_ARTICLES: usize = 250;

/// Maximum content length (in characters) per article sent for analysis.
pub const ANALYSIS_MAX_CONTENT_CHARS: usize = 1200;

/// A candidate article found on a listing page.
///
/// Produced by link discovery and consumed immediately by the content
/// extractor; never persisted. The `title` is whatever the listing page
/// offered and may be empty, in which case the site scraper attempts to
/// recover a title from the article page itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    /// Absolute URL of the article page.
    pub url: String,
    /// Preliminary title from the listing page (possibly empty).
    pub title: String,
}

/// A scraped news article.
///
/// An `Article` is only retained when both `title` and `content` are
/// non-empty (Radio-Canada sources additionally require more than 100
/// characters of content). The URL is the natural key: uniqueness is enforced
/// first within a site's own link list, then globally across all sites in a
/// run, with the earlier occurrence winning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Human-readable source name, e.g. "CBC News Canada".
    pub source: String,
    /// The article headline.
    pub title: String,
    /// Canonical absolute URL; the dedup key.
    pub url: String,
    /// Extracted body text, paragraphs joined with blank lines.
    pub content: String,
    /// Local timestamp of the scrape, `YYYY-MM-DD HH:MM:SS`.
    pub date_scraped: String,
}

impl Article {
    /// Serialized size of this article in bytes, as it will appear inside a
    /// chunk file. Used by the chunker to enforce the byte ceiling.
    pub fn json_size(&self) -> usize {
        serde_json::to_string(self).map(|s| s.len()).unwrap_or(0)
    }
}

/// A size-capped projection of an [`Article`] for the analysis API payload.
///
/// The generation service has a hard input limit, so content is truncated to
/// [`ANALYSIS_MAX_CONTENT_CHARS`] with a trailing ellipsis and only the
/// fields useful for editorial scoring are kept.
#[derive(Debug, Clone, Serialize)]
pub struct CompactArticle {
    pub source: String,
    pub title: String,
    pub url: String,
    pub content: String,
}

impl CompactArticle {
    /// Build a compact projection of `article`, truncating content on a
    /// character boundary.
    pub fn from_article(article: &Article) -> Self {
        let content = if article.content.chars().count() > ANALYSIS_MAX_CONTENT_CHARS {
            let truncated: String = article
                .content
                .chars()
                .take(ANALYSIS_MAX_CONTENT_CHARS)
                .collect();
            format!("{truncated}…")
        } else {
            article.content.clone()
        };

        Self {
            source: article.source.clone(),
            title: article.title.clone(),
            url: article.url.clone(),
            content,
        }
    }
}

/// Compact at most [`ANALYSIS_MAX_ARTICLES`] articles for the analysis call.
pub fn compact_for_analysis(articles: &[Article]) -> Vec<CompactArticle> {
    articles
        .iter()
        .take(ANALYSIS_MAX_ARTICLES)
        .map(CompactArticle::from_article)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_with_content(content: &str) -> Article {
        Article {
            source: "CBC News Canada".to_string(),
            title: "Test Article".to_string(),
            url: "https://www.cbc.ca/news/test".to_string(),
            content: content.to_string(),
            date_scraped: "2025-05-06 14:30:00".to_string(),
        }
    }

    #[test]
    fn test_article_serialization_round_trip() {
        let article = article_with_content("Body text");
        let json = serde_json::to_string(&article).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back.url, article.url);
        assert_eq!(back.content, "Body text");
    }

    #[test]
    fn test_json_size_matches_serialized_length() {
        let article = article_with_content("Body text");
        let json = serde_json::to_string(&article).unwrap();
        assert_eq!(article.json_size(), json.len());
    }

    #[test]
    fn test_compact_article_short_content_unchanged() {
        let article = article_with_content("short body");
        let compact = CompactArticle::from_article(&article);
        assert_eq!(compact.content, "short body");
        assert_eq!(compact.url, article.url);
    }

    #[test]
    fn test_compact_article_truncates_long_content() {
        let long = "x".repeat(ANALYSIS_MAX_CONTENT_CHARS + 500);
        let compact = CompactArticle::from_article(&article_with_content(&long));
        assert_eq!(
            compact.content.chars().count(),
            ANALYSIS_MAX_CONTENT_CHARS + 1
        );
        assert!(compact.content.ends_with('…'));
    }

    #[test]
    fn test_compact_for_analysis_caps_article_count() {
        let articles: Vec<Article> = (0..ANALYSIS_MAX_ARTICLES + 20)
            .map(|i| {
                let mut a = article_with_content("body");
                a.url = format!("https://example.com/{i}");
                a
            })
            .collect();
        let compacted = compact_for_analysis(&articles);
        assert_eq!(compacted.len(), ANALYSIS_MAX_ARTICLES);
        assert_eq!(compacted[0].url, "https://example.com/0");
    }
}
