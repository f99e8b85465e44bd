//! JSON artifact writers: full collection, summary, and chunk files.

use crate::models::Article;
use crate::utils::truncate_chars;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Characters of content kept per article in the summary artifact.
const SUMMARY_CONTENT_CHARS: usize = 200;

/// Write the full article collection as a pretty-printed JSON array.
///
/// Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn write_full(
    articles: &[Article],
    output_dir: &str,
    timestamp: &str,
) -> Result<String, Box<dyn Error>> {
    let path = format!("{output_dir}/news_articles_{timestamp}.json");
    let json = serde_json::to_string_pretty(articles)?;
    fs::write(&path, json).await?;
    info!(%path, "Wrote full article JSON");
    Ok(path)
}

/// Build the summary projection: same records with content truncated to
/// [`SUMMARY_CONTENT_CHARS`] characters plus `"..."` when cut.
pub fn summarize(articles: &[Article]) -> Vec<Article> {
    articles
        .iter()
        .map(|article| {
            let mut summary = article.clone();
            summary.content = truncate_chars(&summary.content, SUMMARY_CONTENT_CHARS);
            summary
        })
        .collect()
}

/// Write the size-truncated summary JSON array.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn write_summary(
    articles: &[Article],
    output_dir: &str,
    timestamp: &str,
) -> Result<String, Box<dyn Error>> {
    let path = format!("{output_dir}/news_articles_summary_{timestamp}.json");
    let json = serde_json::to_string_pretty(&summarize(articles))?;
    fs::write(&path, json).await?;
    info!(%path, "Wrote summary JSON");
    Ok(path)
}

/// Write each chunk to its own JSON file under `{output_dir}/chunks/`.
///
/// Filenames embed the run timestamp and a 1-based `chunk_{i}_of_{n}` index.
#[instrument(level = "info", skip_all, fields(chunks = chunks.len()))]
pub async fn write_chunks(
    chunks: &[Vec<Article>],
    output_dir: &str,
    timestamp: &str,
) -> Result<Vec<String>, Box<dyn Error>> {
    let chunk_dir = format!("{output_dir}/chunks");
    fs::create_dir_all(&chunk_dir).await?;

    let total = chunks.len();
    let mut paths = Vec::with_capacity(total);
    for (i, chunk) in chunks.iter().enumerate() {
        let path = chunk_filename(&chunk_dir, timestamp, i + 1, total);
        let json = serde_json::to_string_pretty(chunk)?;
        let bytes = json.len();
        fs::write(&path, json).await?;
        info!(
            chunk = i + 1,
            total,
            articles = chunk.len(),
            kb = bytes / 1024,
            %path,
            "Wrote chunk"
        );
        paths.push(path);
    }
    Ok(paths)
}

/// Path of chunk `index` (1-based) out of `total`.
pub fn chunk_filename(chunk_dir: &str, timestamp: &str, index: usize, total: usize) -> String {
    format!("{chunk_dir}/news_articles_{timestamp}_chunk_{index}_of_{total}.json")
}

/// Record that a run produced no articles at all.
#[instrument(level = "info", skip_all)]
pub async fn write_empty_note(output_dir: &str, timestamp: &str) -> Result<String, Box<dyn Error>> {
    let path = format!("{output_dir}/news_articles_{timestamp}.txt");
    fs::write(&path, "No articles were scraped.\n").await?;
    info!(%path, "Wrote empty-run note");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str, content: &str) -> Article {
        Article {
            source: "CBC News Canada".to_string(),
            title: "Title".to_string(),
            url: url.to_string(),
            content: content.to_string(),
            date_scraped: "2025-05-06 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_summarize_truncates_long_content() {
        let long = "a".repeat(500);
        let summaries = summarize(&[article("https://e.com/1", &long)]);
        assert_eq!(summaries[0].content.len(), 203);
        assert!(summaries[0].content.ends_with("..."));
        // Other fields survive untouched.
        assert_eq!(summaries[0].url, "https://e.com/1");
    }

    #[test]
    fn test_summarize_keeps_short_content() {
        let summaries = summarize(&[article("https://e.com/1", "short")]);
        assert_eq!(summaries[0].content, "short");
    }

    #[test]
    fn test_chunk_filename_pattern() {
        assert_eq!(
            chunk_filename("out/chunks", "20250506_143000", 2, 3),
            "out/chunks/news_articles_20250506_143000_chunk_2_of_3.json"
        );
    }

    #[tokio::test]
    async fn test_write_artifacts_round_trip() {
        let dir = std::env::temp_dir().join("storylines_scout_json_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let dir_str = dir.to_str().unwrap();

        let articles = vec![article("https://e.com/1", "body"), article("https://e.com/2", "body")];
        let full_path = write_full(&articles, dir_str, "20250506_143000").await.unwrap();
        let loaded: Vec<Article> =
            serde_json::from_str(&std::fs::read_to_string(&full_path).unwrap()).unwrap();
        assert_eq!(loaded.len(), 2);

        let chunk_paths = write_chunks(
            &[articles.clone()],
            dir_str,
            "20250506_143000",
        )
        .await
        .unwrap();
        assert_eq!(chunk_paths.len(), 1);
        assert!(chunk_paths[0].ends_with("_chunk_1_of_1.json"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
