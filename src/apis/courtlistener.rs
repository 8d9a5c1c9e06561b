//! # CourtListener API Adapter
//!
//! ## Purpose
//! Queries the CourtListener opinions API for case law matching a search term,
//! with optional statute, party, and topic-keyword filters.
//!
//! ## Input/Output Specification
//! - **Input**: Search term and optional filters; an API token is required
//! - **Output**: [`ApiOutcome`] rendering the top opinion, or a descriptive
//!   miss/failure string; a missing token short-circuits without any HTTP call
//! - **Retry**: Bounded retry on timeout (fixed attempts, fixed backoff)

use super::ApiOutcome;
use crate::config::CourtListenerConfig;
use crate::errors::{NavigatorError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Length of the opinion snippet included in rendered results
const SNIPPET_CHARS: usize = 300;

/// CourtListener API client
pub struct CourtListenerClient {
    client: Client,
    api_url: String,
    api_token: Option<String>,
    page_size: u32,
    retry_attempts: u32,
    retry_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct OpinionsResponse {
    #[serde(default)]
    results: Vec<Opinion>,
}

#[derive(Debug, Deserialize)]
struct Opinion {
    #[serde(rename = "caseName")]
    case_name_camel: Option<String>,
    case_name: Option<String>,
    cite: Option<String>,
    #[serde(default)]
    citations: Vec<OpinionCitation>,
    plain_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpinionCitation {
    cite: Option<String>,
}

impl CourtListenerClient {
    pub fn new(config: &CourtListenerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("policy-navigator/0.1")
            .build()
            .map_err(|e| NavigatorError::Network {
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            page_size: config.page_size,
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
        })
    }

    /// Search opinions; the topic keyword replaces the search term when present
    pub async fn search(
        &self,
        term: &str,
        statute: Option<&str>,
        party: Option<&str>,
        keyword: Option<&str>,
    ) -> ApiOutcome {
        let Some(token) = &self.api_token else {
            return ApiOutcome::Failed(
                "CourtListener API token is missing. Please register for a token at \
                 https://www.courtlistener.com/help/api/ and set it as the \
                 COURTLISTENER_API_TOKEN environment variable."
                    .to_string(),
            );
        };

        let url = format!("{}/opinions/", self.api_url);

        let mut params: Vec<(String, String)> = vec![
            ("search".to_string(), keyword.unwrap_or(term).to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(statute) = statute {
            params.push(("statutes".to_string(), statute.to_string()));
        }
        if let Some(party) = party {
            params.push(("party".to_string(), party.to_string()));
        }

        debug!("Querying CourtListener: term={:?}", term);

        for attempt in 1..=self.retry_attempts {
            let result = self
                .client
                .get(&url)
                .query(&params)
                .header("Authorization", format!("Token {}", token))
                .send()
                .await;

            match result {
                Ok(response) => return self.render_response(response).await,
                Err(e) if e.is_timeout() && attempt < self.retry_attempts => {
                    warn!(
                        "CourtListener request timed out (attempt {}/{}), retrying",
                        attempt, self.retry_attempts
                    );
                    sleep(self.retry_delay).await;
                }
                Err(e) if e.is_timeout() => {
                    return ApiOutcome::Failed(
                        "CourtListener: Error fetching data: Request timed out after multiple \
                         attempts. Please try again later."
                            .to_string(),
                    );
                }
                Err(e) => {
                    return ApiOutcome::Failed(format!(
                        "CourtListener: Error fetching data: {}",
                        e
                    ));
                }
            }
        }

        // Loop always returns; attempts is at least 1
        ApiOutcome::Failed("CourtListener: Error fetching data: no attempts made".to_string())
    }

    async fn render_response(&self, response: reqwest::Response) -> ApiOutcome {
        if !response.status().is_success() {
            return ApiOutcome::Failed(format!(
                "CourtListener: API error (status {}).",
                response.status().as_u16()
            ));
        }

        let body: OpinionsResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                return ApiOutcome::Failed(format!("CourtListener: Error fetching data: {}", e))
            }
        };

        let Some(opinion) = body.results.into_iter().next() else {
            return ApiOutcome::Miss("No relevant court opinions found.".to_string());
        };

        let case_name = opinion
            .case_name_camel
            .or(opinion.case_name)
            .unwrap_or_else(|| "Unknown Case".to_string());

        let cite = opinion
            .cite
            .or_else(|| opinion.citations.into_iter().find_map(|c| c.cite))
            .unwrap_or_else(|| "No citation".to_string());

        let snippet = match opinion.plain_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                let flattened = text.replace('\n', " ");
                let mut snippet: String = flattened.chars().take(SNIPPET_CHARS).collect();
                snippet.push_str("...");
                snippet
            }
            _ => "[No summary available]".to_string(),
        };

        ApiOutcome::Hit(format!("{} ({}): {}", case_name, cite, snippet))
    }
}
