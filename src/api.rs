//! Analysis API interaction with exponential backoff retry logic.
//!
//! The scraped collection is forwarded to an Anthropic-style messages API
//! that scores stories for documentary potential. The module is built around
//! a small trait seam:
//!
//! - [`AnalysisBackend`]: async "payload in, free text out" contract
//! - [`ClaudeClient`]: reqwest implementation against the messages endpoint
//! - [`RetryBackoff`]: decorator adding exponential backoff with jitter to
//!   any backend
//!
//! # Retry Strategy
//!
//! Up to 5 attempts, delays doubling from 1 second and capped at 30, with
//! 0–250 ms of random jitter. Analysis failure never touches the already
//! persisted scrape artifacts; the caller just logs it.

use crate::models::{compact_for_analysis, Article};
use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str =
    "You are a literary and journalism expert at CBC Radio. Be concise and decisive.";

/// Settings for the analysis call.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Messages endpoint; overridable for testing against a local server.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl AnalysisConfig {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key,
            model,
            max_tokens: 3000,
            temperature: 0.2,
        }
    }
}

/// Async contract for a text-analysis backend.
pub trait AnalysisBackend {
    /// Send a prompt payload and return the backend's free-text analysis.
    async fn analyze(&self, payload: &str) -> Result<String, Box<dyn Error>>;
}

/// Decorator adding exponential-backoff retry to any [`AnalysisBackend`].
pub struct RetryBackoff<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryBackoff<T>
where
    T: AnalysisBackend,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryBackoff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryBackoff")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AnalysisBackend for RetryBackoff<T>
where
    T: AnalysisBackend,
{
    #[instrument(level = "info", skip_all)]
    async fn analyze(&self, payload: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.analyze(payload).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                            error = %e,
                            "analyze() exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "analyze() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text of every text block in the response.
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

/// reqwest client for the messages API.
#[derive(Debug)]
pub struct ClaudeClient<'a> {
    pub config: &'a AnalysisConfig,
    pub http: reqwest::Client,
}

impl<'a> AnalysisBackend for ClaudeClient<'a> {
    #[instrument(level = "info", skip_all)]
    async fn analyze(&self, payload: &str) -> Result<String, Box<dyn Error>> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: SYSTEM_PROMPT,
            messages: vec![UserMessage {
                role: "user",
                content: payload,
            }],
        };

        let t0 = Instant::now();
        let response = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<MessagesResponse>()
            .await?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Analysis API call succeeded"
        );

        Ok(response.into_text())
    }
}

/// Editorial prompt for documentary-candidate scoring.
pub fn build_prompt(dataset_date: &str) -> String {
    format!(
        "Evaluate the following scraped news items for documentary potential in the style of \
         CBC Radio's Storylines. For each promising story, provide: 1) title, 2) why it works \
         as narrative audio (characters, arc, stakes, tension), 3) broader significance, \
         4) initial reporting plan (sources to call), and 5) confidence 1-5. \
         Then give a 10-item ranked shortlist. If an item is weak, say why briefly.\n\
         Dataset date: {dataset_date}.\n\
         JSON array below:"
    )
}

/// Assemble the full payload: prompt followed by the compacted JSON array.
///
/// Compaction caps the payload at 250 articles with 1200 characters of
/// content each to respect the service's input-size limit.
pub fn build_payload(articles: &[Article], dataset_date: &str) -> Result<String, Box<dyn Error>> {
    let compacted = compact_for_analysis(articles);
    let json = serde_json::to_string(&compacted)?;
    Ok(format!("{}\n\n{}", build_prompt(dataset_date), json))
}

/// Send the article collection for analysis, with backoff retry.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn analyze_articles(
    config: &AnalysisConfig,
    articles: &[Article],
) -> Result<String, Box<dyn Error>> {
    let dataset_date = chrono::Local::now().date_naive().to_string();
    let payload = build_payload(articles, &dataset_date)?;

    let client = ClaudeClient {
        config,
        http: reqwest::Client::new(),
    };
    let api = RetryBackoff::new(client, 5, Duration::from_secs(1));
    api.analyze(&payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ANALYSIS_MAX_CONTENT_CHARS;

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
    fn test_build_prompt_embeds_date() {
        let prompt = build_prompt("2025-05-06");
        assert!(prompt.contains("Dataset date: 2025-05-06."));
        assert!(prompt.contains("Storylines"));
    }

    #[test]
    fn test_build_payload_truncates_content() {
        let long = "y".repeat(ANALYSIS_MAX_CONTENT_CHARS * 2);
        let payload = build_payload(&[article("https://e.com/1", &long)], "2025-05-06").unwrap();
        // The full body must not survive compaction.
        assert!(!payload.contains(&long));
        assert!(payload.contains("https://e.com/1"));
        assert!(payload.ends_with(']'));
    }

    #[test]
    fn test_messages_request_shape() {
        let config = AnalysisConfig::new("key".to_string(), "claude-3-5-sonnet-20241022".to_string());
        let request = MessagesRequest {
            model: &config.model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system: SYSTEM_PROMPT,
            messages: vec![UserMessage {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 3000);
    }

    #[test]
    fn test_messages_response_text_extraction() {
        let raw = r#"{"content":[{"type":"text","text":"Part one. "},{"type":"text","text":"Part two."}]}"#;
        let response: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_text(), "Part one. Part two.");
    }

    #[test]
    fn test_messages_response_ignores_non_text_blocks() {
        let raw = r#"{"content":[{"type":"tool_use","id":"x"},{"type":"text","text":"Only this."}]}"#;
        let response: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_text(), "Only this.");
    }
}
