//! Persistence of scrape artifacts.
//!
//! Each run writes its artifacts under one output directory, with the run
//! timestamp embedded in every filename so re-runs never clobber earlier
//! output:
//!
//! ```text
//! scraped_data/
//! ├── news_articles_20250506_143000.json          # full collection
//! ├── news_articles_summary_20250506_143000.json  # content truncated to 200 chars
//! ├── combined_news_20250506_143000.txt           # plain-text report
//! └── chunks/
//!     ├── news_articles_20250506_143000_chunk_1_of_2.json
//!     └── news_articles_20250506_143000_chunk_2_of_2.json
//! ```
//!
//! An empty run still writes a note file so the absence of articles is
//! visible in the output tree.

pub mod json;
pub mod report;
