//! Combined plain-text report of a run's articles.
//!
//! The report is the human-readable companion to the JSON artifacts: a
//! header with the article count, then one block per article with source,
//! title, URL, scrape time, and full content, separated by rules. Articles
//! are sorted by (source, title) for a consistent reading order.

use crate::models::Article;
use std::error::Error;
use std::fmt::Write as _;
use tokio::fs;
use tracing::{info, instrument};

/// Render the combined report for `articles`.
///
/// An empty collection renders a short note instead of an empty table, so a
/// fully failed crawl is still visible in the output tree.
pub fn render_report(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles found to combine.\n".to_string();
    }

    let mut sorted: Vec<&Article> = articles.iter().collect();
    sorted.sort_by(|a, b| (&a.source, &a.title).cmp(&(&b.source, &b.title)));

    let mut out = String::new();
    writeln!(out, "Combined articles: {}", sorted.len()).unwrap();
    writeln!(out, "\n{}\n", "=".repeat(80)).unwrap();

    for (i, article) in sorted.iter().enumerate() {
        writeln!(out, "Article {}", i + 1).unwrap();
        writeln!(out, "Source: {}", article.source).unwrap();
        writeln!(out, "Title: {}", article.title).unwrap();
        writeln!(out, "URL: {}", article.url).unwrap();
        writeln!(out, "Date Scraped: {}", article.date_scraped).unwrap();
        writeln!(out, "Content:").unwrap();
        writeln!(out, "{}", article.content.trim()).unwrap();
        writeln!(out, "\n{}\n", "-".repeat(80)).unwrap();
    }

    out
}

/// Write the combined report next to the JSON artifacts.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn write_report(
    articles: &[Article],
    output_dir: &str,
    timestamp: &str,
) -> Result<String, Box<dyn Error>> {
    let path = format!("{output_dir}/combined_news_{timestamp}.txt");
    fs::write(&path, render_report(articles)).await?;
    info!(%path, "Wrote combined report");
    Ok(path)
}
