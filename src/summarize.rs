//! # Summarization Module
//!
//! ## Purpose
//! Condenses handler output before it is returned to the caller. A remote
//! summarization service is consulted first when configured; failures degrade
//! silently to a leading-sentences fallback.

use crate::config::SummarizeConfig;
use crate::errors::{NavigatorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A remote summarization capability
#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// HTTP-backed summarization provider
pub struct RemoteSummarizer {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

impl RemoteSummarizer {
    pub fn new(endpoint: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| NavigatorError::Network {
                details: e.to_string(),
            })?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SummarizationProvider for RemoteSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SummarizeRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NavigatorError::Network {
                details: format!("summarization service returned HTTP {}", response.status()),
            });
        }

        let body: SummarizeResponse = response.json().await?;
        Ok(body.summary)
    }
}

/// Two-tier summarization strategy: optional primary provider, then the
/// leading-sentences fallback.
pub struct Summarizer {
    primary: Option<Box<dyn SummarizationProvider>>,
    fallback_sentences: usize,
}

impl Summarizer {
    pub fn from_config(config: &SummarizeConfig) -> Result<Self> {
        let primary = match &config.endpoint {
            Some(endpoint) => Some(Box::new(RemoteSummarizer::new(
                endpoint.clone(),
                config.timeout_seconds,
            )?) as Box<dyn SummarizationProvider>),
            None => None,
        };
        Ok(Self {
            primary,
            fallback_sentences: config.fallback_sentences,
        })
    }

    pub fn fallback_only(fallback_sentences: usize) -> Self {
        Self {
            primary: None,
            fallback_sentences,
        }
    }

    /// Summarize text, never failing: provider errors degrade to the fallback
    pub async fn summarize(&self, text: &str) -> String {
        if let Some(primary) = &self.primary {
            match primary.summarize(text).await {
                Ok(summary) => return summary.trim().to_string(),
                Err(e) => {
                    debug!("Summarization provider unavailable, using fallback: {}", e);
                }
            }
        }

        leading_sentences(text, self.fallback_sentences)
            .trim()
            .to_string()
    }
}

/// Keep the first `count` sentences. A sentence ends at `.`, `!` or `?`
/// followed by a space; the remainder is joined by single spaces.
pub fn leading_sentences(text: &str, count: usize) -> String {
    split_sentences(text)
        .into_iter()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev_terminal = false;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch == ' ' && prev_terminal {
            sentences.push(&text[start..i]);
            // Swallow the whole run of spaces
            let mut next_start = i + 1;
            while let Some((j, ' ')) = chars.peek().copied() {
                chars.next();
                next_start = j + 1;
            }
            start = next_start;
            prev_terminal = false;
        } else {
            prev_terminal = matches!(ch, '.' | '!' | '?');
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_two_sentences() {
        let text = "First sentence. Second sentence! Third sentence?";
        assert_eq!(
            leading_sentences(text, 2),
            "First sentence. Second sentence!"
        );
    }

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(leading_sentences("Only one sentence.", 2), "Only one sentence.");
        assert_eq!(leading_sentences("No terminal punctuation", 2), "No terminal punctuation");
        assert_eq!(leading_sentences("", 2), "");
    }

    #[test]
    fn test_abbreviation_spaces_split_like_the_source() {
        // Splitting is purely punctuation-then-space, so "v. Smith" splits too
        assert_eq!(leading_sentences("Uber v. Smith was decided. More text.", 1), "Uber v.");
    }

    #[test]
    fn test_multiple_spaces_are_swallowed() {
        let text = "One.  Two.   Three.";
        assert_eq!(leading_sentences(text, 2), "One. Two.");
    }

    #[tokio::test]
    async fn test_summarizer_fallback() {
        let summarizer = Summarizer::fallback_only(2);
        let out = summarizer
            .summarize("Alpha ruling. Beta holding. Gamma dictum.")
            .await;
        assert_eq!(out, "Alpha ruling. Beta holding.");
    }
}
