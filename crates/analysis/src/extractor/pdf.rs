//! PDF text extraction using lopdf

use crate::errors::{AnalysisError, Result};
use tracing::{debug, warn};

/// Extract the text of every page, pages separated by blank lines
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| AnalysisError::CorruptFile(format!("failed to load PDF: {}", e)))?;

    let pages = doc.get_pages();
    debug!(page_count = pages.len(), "Extracting text from PDF");

    let mut extracted = Vec::with_capacity(pages.len());
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                let cleaned = clean_text(&page_text);
                if !cleaned.is_empty() {
                    extracted.push(cleaned);
                }
            }
            Err(e) => {
                warn!(page = page_num, error = %e, "Failed to extract text from page, skipping");
            }
        }
    }

    if extracted.is_empty() {
        return Err(AnalysisError::CorruptFile(
            "no text content extracted from PDF".to_string(),
        ));
    }

    Ok(extracted.join("\n\n"))
}

/// Collapse whitespace and normalize typographic artifacts
fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{FEFF}', "")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
}
