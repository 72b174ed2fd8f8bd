//! Evaluation prompt rendering
//!
//! The JSON shape requested here is the contract read back by
//! [`crate::parser`]; both sides change together.

use text_splitter::{ChunkConfig, TextSplitter};
use thesisai_common::db::models::DocumentType;

const RUBRIC: &str = r#"Assess the document on five independent dimensions, each scored from 0 to 100.

1. STRUCTURE
   - Organisation of chapters and sections
   - Logical progression from problem to conclusion
   - Links and transitions between sections

2. ARGUMENTATION
   - Clarity of the research question or thesis statement
   - Quality of evidence offered for each claim
   - Soundness of reasoning and depth of critical engagement

3. METHODOLOGY
   - Fit between research design and research question
   - Rigour and justification of the chosen methods
   - Honest treatment of limitations

4. WRITING QUALITY
   - Academic register and precision of language
   - Grammar, mechanics and readability
   - Consistency of citation practice

5. EXAMINABILITY
   - Readiness for formal examination
   - Likelihood of a successful defence
   - Originality of the contribution to the field

Also give an overall score from 0 to 100."#;

const RESPONSE_FORMAT: &str = r#"Reply with a single JSON object and nothing else, using exactly this shape:
{
  "scores": {
    "structure": <number 0-100>,
    "argumentation": <number 0-100>,
    "methodology": <number 0-100>,
    "writingQuality": <number 0-100>,
    "examinability": <number 0-100>,
    "overall": <number 0-100>
  },
  "feedback": [
    {
      "section": "<section of the document>",
      "type": "STRENGTH|WEAKNESS|SUGGESTION|QUESTION",
      "severity": "LOW|MEDIUM|HIGH|CRITICAL",
      "title": "<short title>",
      "content": "<detailed feedback>",
      "pageReference": "<page or section reference>"
    }
  ],
  "vivaQuestions": [
    {
      "question": "<question an examiner might ask>",
      "category": "<topic of the question>",
      "difficulty": "EASY|MEDIUM|HARD",
      "preparation": "<how the candidate should prepare>"
    }
  ],
  "summary": "<overall assessment>"
}"#;

/// Renders the evaluation prompt for one document
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_document_chars: usize,
}

impl PromptBuilder {
    /// `max_document_chars` of 0 sends the whole text
    pub fn new(max_document_chars: usize) -> Self {
        Self { max_document_chars }
    }

    pub fn build(&self, document_text: &str, document_type: DocumentType) -> String {
        let body = self.fit(document_text);

        format!(
            "You are an experienced thesis examiner. Evaluate the following {label} \
             ({kind}) as you would before a viva.\n\n\
             {RUBRIC}\n\n\
             {RESPONSE_FORMAT}\n\n\
             Document:\n{body}\n",
            label = document_type.label(),
            kind = document_type.as_str(),
        )
    }

    /// Cut overlong text at the last semantic boundary that fits, then note the cut
    fn fit(&self, text: &str) -> String {
        if self.max_document_chars == 0 || text.chars().count() <= self.max_document_chars {
            return text.to_string();
        }

        let splitter = TextSplitter::new(ChunkConfig::new(self.max_document_chars));
        let head = splitter.chunks(text).next().unwrap_or_default();

        tracing::debug!(
            original_chars = text.chars().count(),
            kept_chars = head.chars().count(),
            "Document text truncated for prompt"
        );

        format!(
            "{}\n\n[Document truncated: only the first {} characters are included.]",
            head, self.max_document_chars
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(150_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_inputs_identical_prompts() {
        let builder = PromptBuilder::default();
        let a = builder.build("Chapter one.", DocumentType::Thesis);
        let b = builder.build("Chapter one.", DocumentType::Thesis);
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_names_wire_keys() {
        let prompt = PromptBuilder::default().build("Body", DocumentType::Proposal);
        for key in [
            "\"scores\"",
            "\"structure\"",
            "\"argumentation\"",
            "\"methodology\"",
            "\"writingQuality\"",
            "\"examinability\"",
            "\"overall\"",
            "\"feedback\"",
            "\"pageReference\"",
            "\"vivaQuestions\"",
            "\"summary\"",
            "STRENGTH|WEAKNESS|SUGGESTION|QUESTION",
            "LOW|MEDIUM|HIGH|CRITICAL",
            "EASY|MEDIUM|HARD",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("research proposal"));
        assert!(prompt.ends_with("Document:\nBody\n"));
    }

    #[test]
    fn test_long_text_truncated_on_boundary() {
        let text = "First paragraph sentence.\n\nSecond paragraph that is much longer than the limit allows.";
        let builder = PromptBuilder::new(30);
        let prompt = builder.build(text, DocumentType::Chapter);

        assert!(prompt.contains("First paragraph sentence."));
        assert!(!prompt.contains("Second paragraph"));
        assert!(prompt.contains("[Document truncated: only the first 30 characters are included.]"));
        assert_eq!(prompt, builder.build(text, DocumentType::Chapter));
    }

    #[test]
    fn test_zero_limit_keeps_everything() {
        let text = "word ".repeat(1_000);
        let prompt = PromptBuilder::new(0).build(&text, DocumentType::Other);
        assert!(prompt.contains(&text));
        assert!(!prompt.contains("Document truncated"));
    }
}
