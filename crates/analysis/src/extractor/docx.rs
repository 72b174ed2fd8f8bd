//! DOCX text extraction from the zipped `word/document.xml`

use crate::errors::{AnalysisError, Result};
use regex_lite::Regex;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const BODY_PART: &str = "word/document.xml";

/// Text runs, paragraph ends, tabs and breaks, in document order
const RUN_PATTERN: &str = r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|</w:p>|<w:tab/>|<w:br/>";

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AnalysisError::CorruptFile(format!("failed to open DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(BODY_PART)
        .map_err(|e| AnalysisError::CorruptFile(format!("missing {}: {}", BODY_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| AnalysisError::CorruptFile(format!("unreadable {}: {}", BODY_PART, e)))?;

    text_from_xml(&xml)
}

fn text_from_xml(xml: &str) -> Result<String> {
    let runs = Regex::new(RUN_PATTERN)
        .map_err(|e| AnalysisError::CorruptFile(format!("invalid run pattern: {}", e)))?;

    let mut text = String::new();
    for caps in runs.captures_iter(xml) {
        match caps.get(1) {
            Some(run) => text.push_str(&unescape(run.as_str())),
            None => match &caps[0] {
                "<w:tab/>" => text.push('\t'),
                _ => text.push('\n'),
            },
        }
    }

    Ok(text.trim().to_string())
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
