//! # Federal Register API Adapter
//!
//! ## Purpose
//! Queries the Federal Register documents API for regulatory documents
//! matching a search term, with optional publication-date, agency, and
//! document-type conditions.
//!
//! ## Input/Output Specification
//! - **Input**: Search term, optional date range, agency, and document type
//! - **Output**: [`ApiOutcome`] rendering the newest matching document, or a
//!   descriptive miss/failure string
//! - **Timeout**: Fixed request timeout, surfaced immediately as a failure

use super::ApiOutcome;
use crate::classify::DateRange;
use crate::config::FederalRegisterConfig;
use crate::errors::{NavigatorError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Words that mark a document title as relevant even when it shares no word
/// with the query
const TITLE_RELEVANCE_MARKERS: &[&str] = &["executive order", "regulation", "notice"];

/// Federal Register API client
pub struct FederalRegisterClient {
    client: Client,
    api_url: String,
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    results: Vec<RegisterDocument>,
}

#[derive(Debug, Deserialize)]
struct RegisterDocument {
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    publication_date: Option<String>,
}

impl FederalRegisterClient {
    pub fn new(config: &FederalRegisterConfig) -> Result<Self> {
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
            per_page: config.per_page,
        })
    }

    /// Search for the newest document matching the term and conditions
    pub async fn search(
        &self,
        term: &str,
        date_range: Option<&DateRange>,
        agency: Option<&str>,
        doc_type: Option<&str>,
    ) -> ApiOutcome {
        let url = format!("{}/documents.json", self.api_url);

        let mut params: Vec<(String, String)> = vec![
            ("per_page".to_string(), self.per_page.to_string()),
            ("order".to_string(), "newest".to_string()),
            ("conditions[term]".to_string(), term.to_string()),
        ];
        if let Some(range) = date_range {
            params.push((
                "conditions[publication_date][gte]".to_string(),
                range.from.format("%Y-%m-%d").to_string(),
            ));
            params.push((
                "conditions[publication_date][lte]".to_string(),
                range.to.format("%Y-%m-%d").to_string(),
            ));
        }
        if let Some(agency) = agency {
            params.push((
                "conditions[agency_names][]".to_string(),
                agency.to_string(),
            ));
        }
        if let Some(doc_type) = doc_type {
            params.push(("conditions[type][]".to_string(), doc_type.to_string()));
        }

        debug!("Querying Federal Register: term={:?}", term);

        let response = match self.client.get(&url).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                return ApiOutcome::Failed(format!("Federal Register: Error fetching data: {}", e))
            }
        };

        if !response.status().is_success() {
            return ApiOutcome::Failed(format!(
                "Federal Register: API error (status {}).",
                response.status().as_u16()
            ));
        }

        let body: DocumentsResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                return ApiOutcome::Failed(format!("Federal Register: Error fetching data: {}", e))
            }
        };

        let Some(document) = body.results.into_iter().next() else {
            return ApiOutcome::Miss("No relevant federal register documents found.".to_string());
        };

        let title = document.title.unwrap_or_default();
        if !title_is_relevant(&title, term) {
            return ApiOutcome::Miss("No relevant federal register documents found.".to_string());
        }

        let summary = document
            .abstract_text
            .unwrap_or_else(|| "No summary available.".to_string());
        let publication_date = document
            .publication_date
            .unwrap_or_else(|| "?".to_string());

        ApiOutcome::Hit(format!(
            "{} (Published: {}): {}",
            title, publication_date, summary
        ))
    }
}

/// The newest document can be off-topic; require its title to share a word
/// with the query or carry a regulatory marker.
fn title_is_relevant(title: &str, term: &str) -> bool {
    let title_lower = title.to_lowercase();
    TITLE_RELEVANCE_MARKERS
        .iter()
        .any(|marker| title_lower.contains(marker))
        || term
            .to_lowercase()
            .split_whitespace()
            .any(|word| title_lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_relevance() {
        assert!(title_is_relevant(
            "Executive Order 14999 on Transit",
            "unrelated terms"
        ));
        assert!(title_is_relevant(
            "Air Quality Standards",
            "air quality updates"
        ));
        assert!(!title_is_relevant("Fishery Allocations", "highway safety"));
    }
}
