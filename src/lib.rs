//! # Policy Navigator
//!
//! ## Overview
//! This library routes natural-language queries about government regulations
//! and case law to keyword-matched handlers: a Federal Register API adapter,
//! a CourtListener case-law adapter, a section store loaded from a static
//! dataset, and an in-memory vector index for retrieval-augmented lookup.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `classify`: Keyword and pattern based query intent classification
//! - `route`: Intent dispatch, summarization funnel, notification side effects
//! - `sections`: Static section dataset with staged keyword search
//! - `vector`: In-memory vector similarity index
//! - `embedding`: Two-tier embedding strategy with character-code fallback
//! - `summarize`: Two-tier summarization with leading-sentence fallback
//! - `apis`: Federal Register and CourtListener adapters
//! - `ingest`: Uploaded document extraction, chunking, and indexing
//! - `notify`: Best-effort Slack notification sink
//! - `api`: REST API endpoints
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Free-text queries, document uploads (path or URL)
//! - **Output**: Rendered text responses tagged with a response kind
//! - **Behavior**: Single logical thread per request, no persistence
//!
//! ## Usage
//! ```rust,no_run
//! use policy_navigator::{Config, QueryRouter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let router = QueryRouter::from_config(&config).await?;
//!     let response = router.handle("What is in Section 2101?").await;
//!     println!("{}", response.text);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod apis;
pub mod classify;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod ingest;
pub mod notify;
pub mod route;
pub mod sections;
pub mod summarize;
pub mod vector;

// Re-exports for convenience
pub use config::Config;
pub use errors::{NavigatorError, Result};
pub use route::{QueryRouter, ResponseKind, RoutedResponse};

use crate::ingest::DocumentIngestor;
use std::sync::Arc;

/// Application state shared across components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub router: Arc<QueryRouter>,
    pub ingestor: Arc<DocumentIngestor>,
}

impl AppState {
    /// Build the full application state from configuration
    pub async fn from_config(config: Config) -> Result<Self> {
        let router = Arc::new(QueryRouter::from_config(&config).await?);
        let ingestor = Arc::new(router.ingestor(&config.ingest));

        Ok(Self {
            config: Arc::new(config),
            router,
            ingestor,
        })
    }
}
