//! ThesisAI analysis pipeline
//!
//! Takes an uploaded document from stored bytes to a scored, itemized
//! evaluation:
//! - Text extraction (PDF, DOCX, plain text, markdown)
//! - Prompt construction with a fixed rubric
//! - Model calls over HTTP with timeout and rate limiting
//! - Response parsing and validation
//! - The orchestrator persisting every status transition

pub mod ai;
pub mod documents;
pub mod errors;
pub mod extractor;
pub mod lock;
pub mod orchestrator;
pub mod parser;
pub mod prompt;

pub use ai::{create_ai_client, AiClient, AiCompletion, AnthropicClient, MockAiClient};
pub use documents::{DocumentService, NewUpload};
pub use errors::{AnalysisError, Result};
pub use extractor::{BlobTextExtractor, TextExtractor};
pub use orchestrator::{AnalysisAccepted, AnalysisOrchestrator};
pub use parser::AnalysisResult;
pub use prompt::PromptBuilder;
