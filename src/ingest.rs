//! # Document Ingestion Module
//!
//! ## Purpose
//! Accepts a file path or URL, extracts plain text, chunks it by paragraph,
//! and feeds each chunk through the embedding function into the uploaded
//! document index, tagged with the source document name and chunk index.
//!
//! ## Input/Output Specification
//! - **Input**: File path (PDF/TXT supported; DOCX stubbed) or URL (stubbed)
//! - **Output**: Status message with document name and chunk count
//! - **Chunking**: Double-newline paragraphs; fixed character windows when
//!   fewer than 2 paragraphs are found
//!
//! Extraction failures are raised as typed errors and rendered one level up;
//! the index is never touched on failure.

use crate::config::IngestConfig;
use crate::embedding::Embedder;
use crate::errors::{NavigatorError, Result};
use crate::vector::VectorIndex;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Ingests uploaded documents into a shared vector index
pub struct DocumentIngestor {
    embedder: Arc<Embedder>,
    index: Arc<VectorIndex>,
    window_chars: usize,
}

impl DocumentIngestor {
    pub fn new(embedder: Arc<Embedder>, index: Arc<VectorIndex>, config: &IngestConfig) -> Self {
        Self {
            embedder,
            index,
            window_chars: config.chunk_window_chars,
        }
    }

    /// Extract, chunk, embed, and index a document. Returns a status message.
    pub async fn ingest(&self, path_or_url: &str) -> Result<String> {
        let (text, doc_name) = if is_url(path_or_url) {
            (extract_from_url(path_or_url), path_or_url.to_string())
        } else {
            let path = Path::new(path_or_url);
            if !path.exists() {
                return Err(NavigatorError::FileNotFound {
                    path: path_or_url.to_string(),
                });
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path_or_url.to_string());
            (extract_from_file(path)?, name)
        };

        let chunks = chunk_text(&text, self.window_chars);
        for (i, chunk) in chunks.iter().enumerate() {
            let tagged = format!("[{} - chunk {}]:\n{}", doc_name, i + 1, chunk);
            let embedding = self.embedder.embed(&tagged).await;
            self.index.add_document(tagged, embedding);
        }

        info!("Ingested document {} ({} chunks)", doc_name, chunks.len());
        Ok(format!(
            "Successfully ingested and indexed document: {} (chunks: {})",
            doc_name,
            chunks.len()
        ))
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Dispatch extraction on file extension
fn extract_from_file(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    match extension.as_str() {
        ".pdf" => extract_pdf(path),
        ".txt" => extract_txt(path),
        ".docx" => Ok(extract_docx(path)),
        _ => Err(NavigatorError::UnsupportedFileType { extension }),
    }
}

fn extract_pdf(path: &Path) -> Result<String> {
    let text = pdf_extract::extract_text(path).map_err(|e| NavigatorError::ExtractionFailed {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Err(NavigatorError::EmptyDocument {
            path: path.display().to_string(),
        });
    }
    Ok(text)
}

fn extract_txt(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

// TODO: extract DOCX bodies via a zip + XML pass
fn extract_docx(_path: &Path) -> String {
    "[DOCX extraction not implemented]".to_string()
}

// TODO: fetch and strip HTML for URL uploads
fn extract_from_url(_url: &str) -> String {
    "[URL extraction not implemented]".to_string()
}

/// Split text into double-newline paragraphs; fall back to fixed character
/// windows when fewer than 2 paragraphs are found
pub fn chunk_text(text: &str, window_chars: usize) -> Vec<String> {
    let paragraphs: Vec<String> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if paragraphs.len() > 1 {
        return paragraphs;
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(window_chars)
        .map(|window| window.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ingestor_with_index() -> (DocumentIngestor, Arc<VectorIndex>) {
        let index = Arc::new(VectorIndex::new());
        let ingestor = DocumentIngestor::new(
            Arc::new(Embedder::fallback_only()),
            index.clone(),
            &IngestConfig {
                chunk_window_chars: 500,
                query_top_k: 2,
            },
        );
        (ingestor, index)
    }

    #[test]
    fn test_two_paragraphs_make_two_chunks() {
        let text = "Short first paragraph.\n\nA considerably longer second paragraph \
                    that would not fit the same fixed window as the first one.";
        let chunks = chunk_text(text, 500);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "Short first paragraph.");
    }

    #[test]
    fn test_single_paragraph_falls_back_to_windows() {
        let text = "x".repeat(1200);
        let chunks = chunk_text(&text, 500);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 500);
        assert_eq!(chunks[2].len(), 200);
    }

    #[test]
    fn test_windows_respect_char_boundaries() {
        let text = "é".repeat(750);
        let chunks = chunk_text(&text, 500);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 500);
    }

    #[tokio::test]
    async fn test_unsupported_extension_leaves_index_untouched() {
        let (ingestor, index) = ingestor_with_index();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.xyz");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"payload")
            .unwrap();

        let err = ingestor
            .ingest(path.to_str().unwrap())
            .await
            .expect_err("unsupported extension must fail");
        assert!(err.to_string().contains("Unsupported file type"));
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let (ingestor, index) = ingestor_with_index();
        let err = ingestor
            .ingest("/nonexistent/report.txt")
            .await
            .expect_err("missing file must fail");
        assert!(err.to_string().contains("File not found"));
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_txt_ingestion_tags_chunks_with_source() {
        let (ingestor, index) = ingestor_with_index();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ruling.txt");
        std::fs::write(&path, "First paragraph.\n\nSecond paragraph.").unwrap();

        let message = ingestor.ingest(path.to_str().unwrap()).await.unwrap();
        assert!(message.contains("ruling.txt"));
        assert!(message.contains("chunks: 2"));
        assert_eq!(index.len(), 2);

        let results: Vec<_> = index.query(&[1.0; 4], 2).collect();
        assert!(results[0].text.starts_with("[ruling.txt - chunk "));
    }
}
