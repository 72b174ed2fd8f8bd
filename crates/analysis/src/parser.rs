//! Structured evaluation parsing
//!
//! Accepts the model's raw output, optionally wrapped in a ```json fence,
//! and validates it into an [`AnalysisResult`]. Any deviation from the
//! requested shape is a [`AnalysisError::MalformedResponse`].

use crate::errors::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use thesisai_common::db::models::{FeedbackType, Scores, Severity};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Difficulty of a viva question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One feedback item, in the order the model listed it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub section: String,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    pub severity: Severity,
    pub title: Option<String>,
    pub content: String,
    pub page_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VivaQuestion {
    pub question: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub preparation: String,
}

/// Validated evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub scores: Scores,
    pub feedback: Vec<FeedbackItem>,
    pub viva_questions: Vec<VivaQuestion>,
    pub summary: String,
}

// Wire shapes

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    scores: Scores,
    feedback: Option<Vec<RawFeedback>>,
    viva_questions: Option<Vec<RawVivaQuestion>>,
    summary: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeedback {
    section: String,
    #[serde(rename = "type")]
    feedback_type: FeedbackType,
    severity: Severity,
    title: Option<String>,
    content: Option<String>,
    page_reference: Option<TextOrNumber>,
}

#[derive(Deserialize)]
struct RawVivaQuestion {
    question: String,
    category: Option<String>,
    difficulty: Difficulty,
    preparation: Option<String>,
}

/// Page references arrive both as "p. 12" and as 12
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Locate the JSON payload inside the raw model output
pub fn extract_json(raw: &str) -> &str {
    match raw.find(JSON_FENCE) {
        Some(start) => {
            let rest = &raw[start + JSON_FENCE.len()..];
            match rest.rfind(FENCE) {
                Some(end) => rest[..end].trim(),
                None => rest.trim(),
            }
        }
        None => raw,
    }
}

pub fn parse(raw: &str) -> Result<AnalysisResult> {
    let payload = extract_json(raw);

    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| AnalysisError::MalformedResponse(format!("response is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(AnalysisError::MalformedResponse(
            "response is not a JSON object".to_string(),
        ));
    }

    let raw: RawResponse = serde_json::from_value(value)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    for (name, score) in raw.scores.entries() {
        if !(0.0..=100.0).contains(&score) {
            return Err(AnalysisError::MalformedResponse(format!(
                "score {} out of range: {}",
                name, score
            )));
        }
    }

    let feedback = raw
        .feedback
        .unwrap_or_default()
        .into_iter()
        .map(|item| FeedbackItem {
            section: item.section,
            feedback_type: item.feedback_type,
            severity: item.severity,
            title: item.title,
            content: item.content.unwrap_or_default(),
            page_reference: item.page_reference.map(String::from),
        })
        .collect();

    let viva_questions = raw
        .viva_questions
        .unwrap_or_default()
        .into_iter()
        .map(|q| VivaQuestion {
            question: q.question,
            category: q.category.unwrap_or_default(),
            difficulty: q.difficulty,
            preparation: q.preparation.unwrap_or_default(),
        })
        .collect();

    Ok(AnalysisResult {
        scores: raw.scores,
        feedback,
        viva_questions,
        summary: raw.summary.unwrap_or_default(),
    })
}
