//! Text extraction from stored documents
//!
//! PDF pages go through lopdf, DOCX bodies through the zipped
//! `word/document.xml`, plain text and markdown are read as UTF-8.

mod docx;
mod pdf;

use crate::errors::{AnalysisError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use thesisai_common::db::models::DocumentFormat;
use thesisai_common::BlobStore;
use tracing::{debug, instrument};

/// Produces plain text for a stored document
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &str, format: DocumentFormat) -> Result<String>;
}

/// Extract text from raw bytes of a declared format
pub fn extract_bytes(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Pdf => pdf::extract_text(bytes),
        DocumentFormat::Docx => docx::extract_text(bytes),
        DocumentFormat::Txt | DocumentFormat::Md => plain_text(bytes),
    }
}

/// Parse a stored or declared format name
pub fn parse_format(format: &str) -> Result<DocumentFormat> {
    format
        .parse()
        .map_err(|_| AnalysisError::UnsupportedFormat(format.to_string()))
}

/// Whitespace-separated token count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn plain_text(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AnalysisError::CorruptFile(format!("text is not valid UTF-8: {}", e)))?;

    Ok(text.trim_start_matches('\u{FEFF}').to_string())
}

/// Extractor reading document bytes from a blob store
pub struct BlobTextExtractor {
    blobs: Arc<dyn BlobStore>,
}

impl BlobTextExtractor {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }
}

#[async_trait]
impl TextExtractor for BlobTextExtractor {
    #[instrument(skip(self, format), fields(format = format.as_str()))]
    async fn extract(&self, path: &str, format: DocumentFormat) -> Result<String> {
        let bytes = self.blobs.read(path).await?;
        let size = bytes.len();

        let text = tokio::task::spawn_blocking(move || extract_bytes(&bytes, format))
            .await
            .map_err(|e| AnalysisError::CorruptFile(format!("extraction task failed: {}", e)))??;

        debug!(size, chars = text.len(), "Text extracted");
        Ok(text)
    }
}
