//! Size-bounded chunking of the article collection.
//!
//! Downstream consumers (the analysis API, manual uploads) have input-size
//! limits, so the aggregated collection is split into chunks whose summed
//! per-article JSON size stays under a byte ceiling. Packing is greedy and
//! sequential: first-fit in input order, never reordered for tighter packing.

use crate::models::Article;

/// Default chunk ceiling in bytes (roughly 70% of the consumer's window).
pub const MAX_CHUNK_SIZE_BYTES: usize = 90_000;

/// Split `articles` into ordered chunks of at most `max_size_bytes` each.
///
/// An article is appended to the current chunk unless the chunk is non-empty
/// and appending would exceed the ceiling, in which case a new chunk starts
/// with it. A single article larger than the ceiling still becomes its own
/// oversized chunk rather than being split or dropped. Concatenating the
/// chunks reproduces the input exactly; zero articles yield zero chunks.
pub fn chunk_articles(articles: &[Article], max_size_bytes: usize) -> Vec<Vec<Article>> {
    let mut chunks: Vec<Vec<Article>> = Vec::new();
    let mut current_chunk: Vec<Article> = Vec::new();
    let mut current_size = 0usize;

    for article in articles {
        let article_size = article.json_size();

        if current_size + article_size > max_size_bytes && !current_chunk.is_empty() {
            chunks.push(std::mem::take(&mut current_chunk));
            current_size = 0;
        }

        current_chunk.push(article.clone());
        current_size += article_size;
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an article whose serialized JSON is exactly `target` bytes.
    fn article_of_size(i: usize, target: usize) -> Article {
        let mut article = Article {
            source: "Source".to_string(),
            title: format!("Article {i}"),
            url: format!("https://example.com/{i}"),
            content: String::new(),
            date_scraped: "2025-05-06 10:00:00".to_string(),
        };
        let overhead = article.json_size();
        assert!(target > overhead, "target too small for envelope");
        article.content = "a".repeat(target - overhead);
        assert_eq!(article.json_size(), target);
        article
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_articles(&[], MAX_CHUNK_SIZE_BYTES).is_empty());
    }

    #[test]
    fn test_five_30k_articles_split_three_two() {
        let articles: Vec<Article> = (0..5).map(|i| article_of_size(i, 30_000)).collect();
        let chunks = chunk_articles(&articles, 90_000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 3);
        assert_eq!(chunks[1].len(), 2);
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let articles: Vec<Article> = (0..7).map(|i| article_of_size(i, 20_000)).collect();
        let chunks = chunk_articles(&articles, 50_000);
        let flattened: Vec<String> = chunks
            .iter()
            .flatten()
            .map(|a| a.url.clone())
            .collect();
        let original: Vec<String> = articles.iter().map(|a| a.url.clone()).collect();
        assert_eq!(flattened, original);
    }

    #[test]
    fn test_chunks_respect_ceiling() {
        let articles: Vec<Article> = (0..10).map(|i| article_of_size(i, 9_000)).collect();
        for chunk in chunk_articles(&articles, 25_000) {
            let size: usize = chunk.iter().map(|a| a.json_size()).sum();
            assert!(size <= 25_000);
        }
    }

    #[test]
    fn test_oversized_article_gets_own_chunk() {
        let articles = vec![
            article_of_size(0, 1_000),
            article_of_size(1, 10_000), // exceeds ceiling on its own
            article_of_size(2, 1_000),
        ];
        let chunks = chunk_articles(&articles, 5_000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].len(), 1);
        assert_eq!(chunks[1][0].url, "https://example.com/1");
    }

    #[test]
    fn test_single_article_single_chunk() {
        let articles = vec![article_of_size(0, 500)];
        let chunks = chunk_articles(&articles, MAX_CHUNK_SIZE_BYTES);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 1);
    }
}
