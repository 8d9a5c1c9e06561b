//! # Query Routing Module
//!
//! ## Purpose
//! Dispatches classified queries to the Federal Register adapter, the
//! case-law adapter, the section store, or the vector index, funnelling every
//! result through summarization and the best-effort notification sink.
//!
//! ## Input/Output Specification
//! - **Input**: Raw query text
//! - **Output**: [`RoutedResponse`] carrying rendered text plus a kind tag
//! - **Error policy**: No error escapes; internal failures render as
//!   `[Error] <message>` and still reach the notification sink
//!
//! ## Dispatch Order
//! 1. `upload:`/`uploaded:` prefix: uploaded-document retrieval
//! 2. Regulatory intent: Federal Register adapter
//! 3. Case-law intent: CourtListener adapter
//! 4. Section-store staged search
//! 5. Vector-index nearest neighbor over the loaded corpus
//! 6. Conversational fallback based on query shape

use crate::apis::courtlistener::CourtListenerClient;
use crate::apis::federal_register::FederalRegisterClient;
use crate::apis::ApiOutcome;
use crate::classify::{Classifier, QueryIntent};
use crate::config::Config;
use crate::embedding::Embedder;
use crate::errors::Result;
use crate::ingest::DocumentIngestor;
use crate::notify::SlackNotifier;
use crate::sections::SectionStore;
use crate::summarize::Summarizer;
use crate::vector::VectorIndex;
use std::sync::Arc;
use tracing::{debug, info};

/// Classification of a routed response for callers that need more than text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// A handler produced a relevant answer
    Answer,
    /// A handler ran but found nothing relevant
    NoMatch,
    /// The conversational fallback produced the text
    Fallback,
    /// An upstream or internal failure was rendered into the text
    Error,
}

/// Result of dispatching one query
#[derive(Debug, Clone)]
pub struct RoutedResponse {
    pub text: String,
    pub kind: ResponseKind,
}

impl RoutedResponse {
    fn new(text: impl Into<String>, kind: ResponseKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Routes queries to handlers. All collaborators are injected; the router owns
/// no process-global state.
pub struct QueryRouter {
    classifier: Classifier,
    sections: SectionStore,
    corpus: VectorIndex,
    uploads: Arc<VectorIndex>,
    embedder: Arc<Embedder>,
    summarizer: Summarizer,
    federal_register: FederalRegisterClient,
    courtlistener: CourtListenerClient,
    notifier: Option<SlackNotifier>,
    upload_top_k: usize,
}

impl QueryRouter {
    /// Build the router from configuration: load the section dataset, build
    /// the corpus index from it, and wire the adapters.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let sections = SectionStore::from_json_file(&config.dataset.commercial_code_path)?;
        let embedder = Arc::new(Embedder::from_config(&config.embedding)?);

        let corpus = VectorIndex::new();
        for record in sections.records() {
            let document = format!(
                "Section {}: {}\n{}",
                record.section, record.title, record.text
            );
            let embedding = embedder.embed(&document).await;
            corpus.add_document(document, embedding);
        }
        info!("Indexed {} section documents", corpus.len());

        Ok(Self {
            classifier: Classifier::new(),
            sections,
            corpus,
            uploads: Arc::new(VectorIndex::new()),
            embedder,
            summarizer: Summarizer::from_config(&config.summarize)?,
            federal_register: FederalRegisterClient::new(&config.federal_register)?,
            courtlistener: CourtListenerClient::new(&config.courtlistener)?,
            notifier: SlackNotifier::from_config(&config.slack),
            upload_top_k: config.ingest.query_top_k,
        })
    }

    /// Build the router from already-constructed collaborators
    #[allow(clippy::too_many_arguments)]
    pub fn with_components(
        sections: SectionStore,
        corpus: VectorIndex,
        uploads: Arc<VectorIndex>,
        embedder: Arc<Embedder>,
        summarizer: Summarizer,
        federal_register: FederalRegisterClient,
        courtlistener: CourtListenerClient,
        notifier: Option<SlackNotifier>,
        upload_top_k: usize,
    ) -> Self {
        Self {
            classifier: Classifier::new(),
            sections,
            corpus,
            uploads,
            embedder,
            summarizer,
            federal_register,
            courtlistener,
            notifier,
            upload_top_k,
        }
    }

    /// The uploaded-document index shared with a [`DocumentIngestor`]
    pub fn uploads(&self) -> Arc<VectorIndex> {
        self.uploads.clone()
    }

    /// Build an ingestor feeding this router's upload index
    pub fn ingestor(&self, config: &crate::config::IngestConfig) -> DocumentIngestor {
        DocumentIngestor::new(self.embedder.clone(), self.uploads.clone(), config)
    }

    /// Number of section documents in the corpus index
    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    /// Number of section records loaded
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Handle one query end to end. Never fails: internal errors render as
    /// `[Error] <message>`. The notification sink fires on every path.
    pub async fn handle(&self, query: &str) -> RoutedResponse {
        let response = match self.dispatch(query).await {
            Ok(response) => response,
            Err(e) => RoutedResponse::new(format!("[Error] {}", e), ResponseKind::Error),
        };

        self.notify(query, &response.text).await;
        response
    }

    async fn dispatch(&self, query: &str) -> Result<RoutedResponse> {
        if let Some(stripped) = strip_upload_prefix(query) {
            return Ok(self.handle_upload_query(stripped).await);
        }

        let intent = self.classifier.classify(query);
        debug!("Classified query: {:?}", intent);

        match intent {
            QueryIntent::Regulatory {
                term,
                date_range,
                agency,
                doc_type,
            } => {
                let outcome = self
                    .federal_register
                    .search(
                        &term,
                        date_range.as_ref(),
                        agency.as_deref(),
                        doc_type.as_deref(),
                    )
                    .await;
                Ok(self.render_outcome(outcome).await)
            }
            QueryIntent::CaseLaw {
                term,
                statute,
                party,
                keyword,
            } => {
                let outcome = self
                    .courtlistener
                    .search(
                        &term,
                        statute.as_deref(),
                        party.as_deref(),
                        keyword.as_deref(),
                    )
                    .await;
                Ok(self.render_outcome(outcome).await)
            }
            QueryIntent::Lookup { term } => Ok(self.handle_lookup(&term).await),
        }
    }

    /// Summarize adapter hits; misses and failures pass through verbatim
    async fn render_outcome(&self, outcome: ApiOutcome) -> RoutedResponse {
        match outcome {
            ApiOutcome::Hit(text) => {
                let summary = self.summarizer.summarize(&text).await;
                RoutedResponse::new(summary, ResponseKind::Answer)
            }
            ApiOutcome::Miss(text) => RoutedResponse::new(text, ResponseKind::NoMatch),
            ApiOutcome::Failed(text) => RoutedResponse::new(text, ResponseKind::Error),
        }
    }

    /// Section store first, then the corpus vector index, then the
    /// conversational fallback
    async fn handle_lookup(&self, query: &str) -> RoutedResponse {
        if let Some(record) = self.sections.search(query) {
            let summary = self.summarizer.summarize(&record.text).await;
            return RoutedResponse::new(summary, ResponseKind::Answer);
        }

        let embedding = self.embedder.embed(query).await;
        if let Some(nearest) = self.corpus.query(&embedding, 1).next() {
            let summary = self.summarizer.summarize(&nearest.text).await;
            return RoutedResponse::new(summary, ResponseKind::Answer);
        }

        RoutedResponse::new(conversational_fallback(query), ResponseKind::Fallback)
    }

    /// Retrieve from the uploaded-document index
    async fn handle_upload_query(&self, query: &str) -> RoutedResponse {
        let embedding = self.embedder.embed(query).await;
        let retrieved: Vec<_> = self.uploads.query(&embedding, self.upload_top_k).collect();

        if retrieved.is_empty() {
            return RoutedResponse::new(
                "No relevant information found in uploaded documents.",
                ResponseKind::NoMatch,
            );
        }

        let mut answers = Vec::with_capacity(retrieved.len());
        for chunk in retrieved {
            answers.push(self.summarizer.summarize(&chunk.text).await);
        }
        RoutedResponse::new(answers.join("\n\n"), ResponseKind::Answer)
    }

    async fn notify(&self, query: &str, response: &str) {
        if let Some(notifier) = &self.notifier {
            notifier
                .post(&format!("Query: {}\nResponse: {}", query, response))
                .await;
        }
    }
}

/// Strip an `upload:`/`uploaded:` routing prefix, if present
fn strip_upload_prefix(query: &str) -> Option<&str> {
    let lowered = query.to_lowercase();
    for prefix in ["uploaded:", "upload:"] {
        if lowered.starts_with(prefix) {
            return Some(query[prefix.len()..].trim());
        }
    }
    None
}

/// Canned conversational response shaped by query length and punctuation
fn conversational_fallback(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.split_whitespace().count() <= 3 {
        format!(
            "Could you please provide more details about '{}'? I'm here to help!",
            trimmed
        )
    } else if trimmed.contains('?') {
        format!(
            "That's a great question! I couldn't find a direct answer, but let's explore it \
             together: '{}'",
            trimmed
        )
    } else {
        format!(
            "I couldn't find relevant information for: '{}'. Could you clarify or ask in a \
             different way?",
            trimmed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversational_fallback_shapes() {
        let short = conversational_fallback("tax rules");
        assert!(short.contains("more details"));

        let question = conversational_fallback("what does any of this mean for me?");
        assert!(question.contains("explore it together"));

        let statement = conversational_fallback("tell me something about nothing at all");
        assert!(statement.contains("couldn't find relevant information"));
    }

    #[test]
    fn test_upload_prefix_stripping() {
        assert_eq!(strip_upload_prefix("upload: my query"), Some("my query"));
        assert_eq!(strip_upload_prefix("Uploaded: my query"), Some("my query"));
        assert_eq!(strip_upload_prefix("regular query"), None);
    }
}
