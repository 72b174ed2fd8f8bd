//! Analysis orchestrator
//!
//! Drives one document through extraction, prompting, the model call and
//! parsing, persisting each status transition as it happens:
//!
//! ```text
//! PENDING -> IN_PROGRESS -> COMPLETED
//!                        \-> FAILED
//! ```
//!
//! Pipeline failures end on the analysis record and never reach the caller
//! of [`AnalysisOrchestrator::request_analysis`].

use crate::ai::{AiClient, AiCompletion};
use crate::errors::{AnalysisError, Result};
use crate::extractor::{parse_format, TextExtractor};
use crate::lock::DocumentLocks;
use crate::parser::{self, AnalysisResult};
use crate::prompt::PromptBuilder;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thesisai_common::db::models::{
    Analysis, AnalysisStatus, Document, DocumentStatus, FeedbackReport,
};
use thesisai_common::{metrics, RecordStore, ANALYSIS_KIND};
use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Acknowledgement returned once a run has been scheduled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisAccepted {
    pub analysis_id: Uuid,
    pub document_id: Uuid,
    pub status: AnalysisStatus,
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    store: Arc<dyn RecordStore>,
    extractor: Arc<dyn TextExtractor>,
    ai: Arc<dyn AiClient>,
    prompts: PromptBuilder,
    locks: DocumentLocks,
    ai_permits: Arc<Semaphore>,
}

impl AnalysisOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        extractor: Arc<dyn TextExtractor>,
        ai: Arc<dyn AiClient>,
        prompts: PromptBuilder,
        max_concurrent_calls: usize,
    ) -> Self {
        Self {
            store,
            extractor,
            ai,
            prompts,
            locks: DocumentLocks::new(),
            ai_permits: Arc::new(Semaphore::new(max_concurrent_calls.max(1))),
        }
    }

    /// Schedule a new analysis run for a document.
    ///
    /// Fails synchronously when the document is unknown or already being
    /// analyzed; everything after the PENDING record is created happens in a
    /// spawned task.
    #[instrument(skip(self))]
    pub async fn request_analysis(&self, document_id: Uuid) -> Result<AnalysisAccepted> {
        let document = self
            .store
            .find_document(document_id)
            .await?
            .ok_or(AnalysisError::DocumentNotFound(document_id))?;

        let guard = self
            .locks
            .try_acquire(document_id)
            .ok_or(AnalysisError::AnalysisInProgress(document_id))?;

        let analysis = self
            .store
            .insert_analysis(Analysis::pending(document_id, ANALYSIS_KIND))
            .await?;

        metrics::record_analysis_requested(ANALYSIS_KIND);
        info!(analysis_id = %analysis.id, "Analysis requested");

        let accepted = AnalysisAccepted {
            analysis_id: analysis.id,
            document_id,
            status: analysis.analysis_status(),
        };

        let orchestrator = self.clone();
        tokio::spawn(async move {
            let _guard = guard;
            orchestrator.execute(analysis, document).await;
        });

        Ok(accepted)
    }

    /// Run the pipeline for an already persisted PENDING analysis and return
    /// its terminal record. Failures are recorded, not returned.
    #[instrument(skip_all, fields(analysis_id = %analysis.id, document_id = %document.id))]
    pub async fn execute(&self, analysis: Analysis, document: Document) -> Analysis {
        let started = Instant::now();

        match self.run(analysis.clone(), &document).await {
            Ok(completed) => {
                metrics::record_analysis_outcome(ANALYSIS_KIND, started.elapsed().as_secs_f64(), None);
                info!(
                    overall = completed.overall_score,
                    processing_time = completed.processing_time,
                    "Analysis completed"
                );
                completed
            }
            Err(e) => {
                metrics::record_analysis_outcome(ANALYSIS_KIND, started.elapsed().as_secs_f64(), Some(e.kind()));
                error!(error = %e, kind = e.kind(), "Analysis failed");
                self.fail(analysis, &document, &e).await
            }
        }
    }

    async fn run(&self, analysis: Analysis, document: &Document) -> Result<Analysis> {
        let analysis = self
            .store
            .update_analysis(Analysis {
                status: AnalysisStatus::InProgress.into(),
                ..analysis
            })
            .await?;
        self.store
            .update_document(document.with_status(DocumentStatus::Analyzing))
            .await?;

        let format = parse_format(&document.format)?;
        let text = self.extractor.extract(&document.file_path, format).await?;
        let prompt = self.prompts.build(&text, document.category());

        let (completion, elapsed) = self.call_model(&prompt).await?;
        let result = parser::parse(&completion.text)?;

        let completed = self
            .store
            .update_analysis(completed_record(analysis, &result, &completion, elapsed))
            .await?;

        let now = chrono::Utc::now();
        let items = result
            .feedback
            .into_iter()
            .enumerate()
            .map(|(index, item)| FeedbackReport {
                id: Uuid::new_v4(),
                analysis_id: completed.id,
                section: item.section,
                feedback_type: item.feedback_type.as_str().to_string(),
                title: item.title,
                content: item.content,
                severity: item.severity.as_str().to_string(),
                page_reference: item.page_reference,
                order_index: index as i32,
                created_at: now.into(),
            })
            .collect();
        self.store.insert_feedback(items).await?;

        self.store
            .update_document(document.with_status(DocumentStatus::Completed))
            .await?;

        Ok(completed)
    }

    /// One model call under the shared concurrency limit and request budget,
    /// timed from the moment both allow it
    async fn call_model(&self, prompt: &str) -> Result<(AiCompletion, Duration)> {
        let _permit = self
            .ai_permits
            .acquire()
            .await
            .map_err(|_| AnalysisError::Configuration("model call permits closed".to_string()))?;
        self.ai.ready().await;

        let started = Instant::now();
        let outcome = self.ai.call(prompt).await;
        let elapsed = started.elapsed();

        metrics::record_ai_call(
            elapsed.as_secs_f64(),
            self.ai.model_name(),
            outcome.as_ref().ok().and_then(AiCompletion::total_tokens),
            outcome.is_ok(),
        );

        Ok((outcome?, elapsed))
    }

    async fn fail(&self, analysis: Analysis, document: &Document, err: &AnalysisError) -> Analysis {
        let mut failed = Analysis {
            status: AnalysisStatus::Failed.into(),
            error_message: Some(err.to_string()),
            completed_at: Some(chrono::Utc::now().into()),
            ..analysis
        };
        failed.set_scores(None);

        if let Err(e) = self.store.delete_feedback(failed.id).await {
            warn!(error = %e, "Failed to remove feedback of failed analysis");
        }

        let failed = match self.store.update_analysis(failed.clone()).await {
            Ok(saved) => saved,
            Err(e) => {
                error!(error = %e, "Failed to persist FAILED analysis");
                failed
            }
        };

        if let Err(e) = self
            .store
            .update_document(document.with_status(DocumentStatus::Failed))
            .await
        {
            error!(error = %e, "Failed to mark document FAILED");
        }

        failed
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn get_analysis(&self, analysis_id: Uuid) -> Result<Analysis> {
        self.store
            .find_analysis(analysis_id)
            .await?
            .ok_or(AnalysisError::AnalysisNotFound(analysis_id))
    }

    /// Feedback items of an analysis in the order the model returned them
    pub async fn get_feedback(&self, analysis_id: Uuid) -> Result<Vec<FeedbackReport>> {
        self.get_analysis(analysis_id).await?;
        Ok(self.store.list_feedback(analysis_id).await?)
    }

    pub async fn latest_analysis(&self, document_id: Uuid) -> Result<Option<Analysis>> {
        self.ensure_document(document_id).await?;
        Ok(self.store.latest_analysis(document_id).await?)
    }

    /// Analysis history of a document, oldest first
    pub async fn list_analyses(&self, document_id: Uuid) -> Result<Vec<Analysis>> {
        self.ensure_document(document_id).await?;
        Ok(self.store.list_analyses_by_document(document_id).await?)
    }

    /// Per-document locks shared with services that must not overlap a run
    pub fn locks(&self) -> DocumentLocks {
        self.locks.clone()
    }

    /// Whether a run currently holds the document
    pub fn is_running(&self, document_id: Uuid) -> bool {
        self.locks.is_held(document_id)
    }

    /// Runs not yet in a terminal state
    pub fn active_runs(&self) -> usize {
        self.locks.held_count()
    }

    async fn ensure_document(&self, document_id: Uuid) -> Result<()> {
        match self.store.find_document(document_id).await? {
            Some(_) => Ok(()),
            None => Err(AnalysisError::DocumentNotFound(document_id)),
        }
    }
}

fn completed_record(
    analysis: Analysis,
    result: &AnalysisResult,
    completion: &AiCompletion,
    elapsed: Duration,
) -> Analysis {
    let mut completed = Analysis {
        status: AnalysisStatus::Completed.into(),
        processing_time: Some(i32::try_from(elapsed.as_secs()).unwrap_or(i32::MAX)),
        tokens_used: completion
            .total_tokens()
            .map(|t| i32::try_from(t).unwrap_or(i32::MAX)),
        error_message: None,
        completed_at: Some(chrono::Utc::now().into()),
        ..analysis
    };
    completed.set_scores(Some(result.scores));
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::DocumentService;
    use crate::extractor::BlobTextExtractor;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use thesisai_common::db::models::{DocumentType, FeedbackType, Scores};
    use thesisai_common::{AppError, BlobStore, MemoryBlobStore, MemoryStore};
    use tokio::sync::Notify;

    const SPEC_RESPONSE: &str = r#"```json
{"scores": {"structure": 80, "argumentation": 75, "methodology": 70,
            "writingQuality": 85, "examinability": 78, "overall": 78},
 "feedback": [{"section": "Intro", "type": "WEAKNESS", "severity": "MEDIUM", "content": "Aim unclear."},
              {"section": "Methods", "type": "STRENGTH", "severity": "LOW", "content": "Well designed."}],
 "summary": "Promising."}
```"#;

    enum Reply {
        Text(&'static str),
        Timeout,
    }

    struct ScriptedAi {
        reply: Reply,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
        readies: AtomicUsize,
    }

    impl ScriptedAi {
        fn new(reply: Reply) -> Self {
            Self { reply, gate: None, calls: AtomicUsize::new(0), readies: AtomicUsize::new(0) }
        }

        fn gated(reply: Reply, gate: Arc<Notify>) -> Self {
            Self { reply, gate: Some(gate), calls: AtomicUsize::new(0), readies: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl AiClient for ScriptedAi {
        async fn ready(&self) {
            self.readies.fetch_add(1, Ordering::SeqCst);
        }

        async fn call(&self, _prompt: &str) -> Result<AiCompletion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.reply {
                Reply::Text(text) => Ok(AiCompletion {
                    text: text.to_string(),
                    input_tokens: Some(1200),
                    output_tokens: Some(300),
                }),
                Reply::Timeout => Err(AnalysisError::Timeout { timeout_secs: 120 }),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        blobs: Arc<MemoryBlobStore>,
        orchestrator: AnalysisOrchestrator,
        documents: DocumentService,
    }

    fn fixture_with_store(
        store: Arc<dyn RecordStore>,
        memory: Arc<MemoryStore>,
        ai: Arc<dyn AiClient>,
        max_concurrent_calls: usize,
    ) -> Fixture {
        let blobs = Arc::new(MemoryBlobStore::new());
        let extractor = Arc::new(BlobTextExtractor::new(blobs.clone()));
        let orchestrator = AnalysisOrchestrator::new(
            store.clone(),
            extractor,
            ai,
            PromptBuilder::default(),
            max_concurrent_calls,
        );
        let documents = DocumentService::new(store, blobs.clone(), orchestrator.locks());
        Fixture { store: memory, blobs, orchestrator, documents }
    }

    fn fixture_with_limit(ai: Arc<dyn AiClient>, max_concurrent_calls: usize) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        fixture_with_store(store.clone(), store, ai, max_concurrent_calls)
    }

    fn fixture(ai: Arc<dyn AiClient>) -> Fixture {
        fixture_with_limit(ai, 2)
    }

    async fn wait_for_calls(ai: &ScriptedAi, expected: usize) {
        for _ in 0..500 {
            if ai.calls.load(Ordering::SeqCst) >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} model calls", expected);
    }

    async fn seed_document(fx: &Fixture, bytes: &[u8], format: &str) -> Document {
        let path = fx.blobs.store(bytes, format).await.unwrap();
        let now = chrono::Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Proposal".to_string(),
            file_name: format!("proposal.{}", format.to_lowercase()),
            file_path: path,
            format: format.to_string(),
            file_size: bytes.len() as i64,
            word_count: 3,
            document_type: DocumentType::Proposal.as_str().to_string(),
            status: DocumentStatus::Uploaded.into(),
            version: 1,
            parent_document_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        };
        fx.store.insert_document(document).await.unwrap()
    }

    /// Wait until the run for `document_id` has released its lock
    async fn settle(fx: &Fixture, document_id: Uuid, analysis_id: Uuid) -> Analysis {
        for _ in 0..500 {
            if !fx.orchestrator.is_running(document_id) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!fx.orchestrator.is_running(document_id), "run did not finish");
        fx.orchestrator.get_analysis(analysis_id).await.unwrap()
    }

    async fn document_status(fx: &Fixture, id: Uuid) -> DocumentStatus {
        fx.store.find_document(id).await.unwrap().unwrap().document_status()
    }

    #[tokio::test]
    async fn test_successful_run() {
        let ai = Arc::new(ScriptedAi::new(Reply::Text(SPEC_RESPONSE)));
        let fx = fixture(ai.clone());
        let doc = seed_document(&fx, b"A short proposal", "TXT").await;

        let accepted = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        assert_eq!(accepted.status, AnalysisStatus::Pending);
        assert_eq!(accepted.document_id, doc.id);

        let analysis = settle(&fx, doc.id, accepted.analysis_id).await;
        assert_eq!(analysis.analysis_status(), AnalysisStatus::Completed);
        assert_eq!(analysis.analysis_type, "COMPREHENSIVE");
        assert_eq!(
            analysis.scores(),
            Some(Scores {
                structure: 80.0,
                argumentation: 75.0,
                methodology: 70.0,
                writing_quality: 85.0,
                examinability: 78.0,
                overall: 78.0,
            })
        );
        assert_eq!(analysis.tokens_used, Some(1500));
        assert_eq!(analysis.processing_time, Some(0));
        assert!(analysis.completed_at.is_some());
        assert!(analysis.error_message.is_none());

        let feedback = fx.orchestrator.get_feedback(analysis.id).await.unwrap();
        assert_eq!(feedback.len(), 2);
        assert_eq!((feedback[0].section.as_str(), feedback[0].order_index), ("Intro", 0));
        assert_eq!(feedback[0].feedback_type, FeedbackType::Weakness.as_str());
        assert_eq!((feedback[1].section.as_str(), feedback[1].order_index), ("Methods", 1));

        assert_eq!(document_status(&fx, doc.id).await, DocumentStatus::Completed);
        assert_eq!(ai.readies.load(Ordering::SeqCst), 1);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_isolated_to_analysis() {
        let fx = fixture(Arc::new(ScriptedAi::new(Reply::Timeout)));
        let doc = seed_document(&fx, b"A short proposal", "TXT").await;

        let accepted = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        let analysis = settle(&fx, doc.id, accepted.analysis_id).await;

        assert_eq!(analysis.analysis_status(), AnalysisStatus::Failed);
        assert!(analysis.error_message.as_deref().is_some_and(|m| m.contains("timed out")));
        assert!(analysis.scores().is_none());
        assert!(analysis.completed_at.is_some());
        assert!(fx.orchestrator.get_feedback(analysis.id).await.unwrap().is_empty());
        assert_eq!(document_status(&fx, doc.id).await, DocumentStatus::Failed);
    }

    #[tokio::test]
    async fn test_malformed_response_fails_run() {
        let fx = fixture(Arc::new(ScriptedAi::new(Reply::Text("I'd rather not."))));
        let doc = seed_document(&fx, b"text", "MD").await;

        let accepted = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        let analysis = settle(&fx, doc.id, accepted.analysis_id).await;

        assert_eq!(analysis.analysis_status(), AnalysisStatus::Failed);
        assert!(analysis.error_message.unwrap().starts_with("Malformed AI response"));
    }

    #[tokio::test]
    async fn test_extraction_failure_skips_model_call() {
        let ai = Arc::new(ScriptedAi::new(Reply::Text(SPEC_RESPONSE)));
        let fx = fixture(ai.clone());
        let doc = seed_document(&fx, b"not really a pdf", "PDF").await;

        let accepted = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        let analysis = settle(&fx, doc.id, accepted.analysis_id).await;

        assert_eq!(analysis.analysis_status(), AnalysisStatus::Failed);
        assert!(analysis.error_message.unwrap().starts_with("Corrupt file"));
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ai.readies.load(Ordering::SeqCst), 0);
        assert_eq!(document_status(&fx, doc.id).await, DocumentStatus::Failed);
    }

    #[tokio::test]
    async fn test_unknown_document() {
        let fx = fixture(Arc::new(crate::ai::MockAiClient));
        let missing = Uuid::new_v4();
        assert!(matches!(
            fx.orchestrator.request_analysis(missing).await,
            Err(AnalysisError::DocumentNotFound(id)) if id == missing
        ));
        assert!(matches!(
            fx.orchestrator.latest_analysis(missing).await,
            Err(AnalysisError::DocumentNotFound(_))
        ));
        assert!(matches!(
            fx.orchestrator.get_analysis(missing).await,
            Err(AnalysisError::AnalysisNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_second_request_rejected_while_running() {
        let gate = Arc::new(Notify::new());
        let fx = fixture(Arc::new(ScriptedAi::gated(Reply::Text(SPEC_RESPONSE), gate.clone())));
        let doc = seed_document(&fx, b"A short proposal", "TXT").await;

        let first = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        assert!(matches!(
            fx.orchestrator.request_analysis(doc.id).await,
            Err(AnalysisError::AnalysisInProgress(id)) if id == doc.id
        ));

        gate.notify_one();
        let done = settle(&fx, doc.id, first.analysis_id).await;
        assert_eq!(done.analysis_status(), AnalysisStatus::Completed);

        gate.notify_one();
        let second = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        settle(&fx, doc.id, second.analysis_id).await;

        let history = fx.orchestrator.list_analyses(doc.id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_rejected_while_running() {
        let gate = Arc::new(Notify::new());
        let fx = fixture(Arc::new(ScriptedAi::gated(Reply::Text(SPEC_RESPONSE), gate.clone())));
        let doc = seed_document(&fx, b"A short proposal", "TXT").await;

        let accepted = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        assert!(matches!(
            fx.documents.delete(doc.id, doc.owner_id).await,
            Err(AnalysisError::AnalysisInProgress(id)) if id == doc.id
        ));
        assert!(fx.store.find_document(doc.id).await.unwrap().is_some());

        gate.notify_one();
        let analysis = settle(&fx, doc.id, accepted.analysis_id).await;
        assert_eq!(analysis.analysis_status(), AnalysisStatus::Completed);

        fx.documents.delete(doc.id, doc.owner_id).await.unwrap();
        assert!(fx.store.find_analysis(accepted.analysis_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_model_calls_bounded_by_permits() {
        let gate = Arc::new(Notify::new());
        let ai = Arc::new(ScriptedAi::gated(Reply::Text(SPEC_RESPONSE), gate.clone()));
        let fx = fixture_with_limit(ai.clone(), 1);
        let first = seed_document(&fx, b"First proposal", "TXT").await;
        let second = seed_document(&fx, b"Second proposal", "TXT").await;

        let a = fx.orchestrator.request_analysis(first.id).await.unwrap();
        let b = fx.orchestrator.request_analysis(second.id).await.unwrap();

        wait_for_calls(&ai, 1).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.orchestrator.active_runs(), 2);

        gate.notify_one();
        wait_for_calls(&ai, 2).await;
        gate.notify_one();

        let done_a = settle(&fx, first.id, a.analysis_id).await;
        let done_b = settle(&fx, second.id, b.analysis_id).await;
        assert_eq!(done_a.analysis_status(), AnalysisStatus::Completed);
        assert_eq!(done_b.analysis_status(), AnalysisStatus::Completed);
        assert_eq!(fx.orchestrator.active_runs(), 0);
    }

    #[tokio::test]
    async fn test_sequential_runs_keep_history() {
        let fx = fixture(Arc::new(ScriptedAi::new(Reply::Text(SPEC_RESPONSE))));
        let doc = seed_document(&fx, b"A short proposal", "TXT").await;

        let first = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        settle(&fx, doc.id, first.analysis_id).await;
        let second = fx.orchestrator.request_analysis(doc.id).await.unwrap();
        settle(&fx, doc.id, second.analysis_id).await;

        let history = fx.orchestrator.list_analyses(doc.id).await.unwrap();
        assert_eq!(
            history.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![first.analysis_id, second.analysis_id]
        );

        let latest = fx.orchestrator.latest_analysis(doc.id).await.unwrap().unwrap();
        assert_eq!(latest.id, second.analysis_id);
    }

    #[tokio::test]
    async fn test_feedback_write_failure_leaves_no_scores() {
        let memory = Arc::new(MemoryStore::new());
        let store = Arc::new(RejectFeedback(memory.clone()));
        let fx = fixture_with_store(store, memory, Arc::new(ScriptedAi::new(Reply::Text(SPEC_RESPONSE))), 2);
        let doc = seed_document(&fx, b"A short proposal", "TXT").await;

        let pending = fx
            .store
            .insert_analysis(Analysis::pending(doc.id, ANALYSIS_KIND))
            .await
            .unwrap();
        let analysis = fx.orchestrator.execute(pending, doc.clone()).await;

        assert_eq!(analysis.analysis_status(), AnalysisStatus::Failed);
        let stored = fx.store.find_analysis(analysis.id).await.unwrap().unwrap();
        assert!(stored.scores().is_none());
        assert!(stored.overall_score.is_none());
        assert!(stored.error_message.is_some());
        assert_eq!(document_status(&fx, doc.id).await, DocumentStatus::Failed);
    }

    /// Memory store whose feedback writes always fail
    struct RejectFeedback(Arc<MemoryStore>);

    #[async_trait]
    impl RecordStore for RejectFeedback {
        async fn insert_document(&self, d: Document) -> thesisai_common::Result<Document> {
            self.0.insert_document(d).await
        }
        async fn find_document(&self, id: Uuid) -> thesisai_common::Result<Option<Document>> {
            self.0.find_document(id).await
        }
        async fn list_documents_by_owner(&self, owner: Uuid) -> thesisai_common::Result<Vec<Document>> {
            self.0.list_documents_by_owner(owner).await
        }
        async fn update_document(&self, d: Document) -> thesisai_common::Result<Document> {
            self.0.update_document(d).await
        }
        async fn delete_document(&self, id: Uuid) -> thesisai_common::Result<bool> {
            self.0.delete_document(id).await
        }
        async fn insert_analysis(&self, a: Analysis) -> thesisai_common::Result<Analysis> {
            self.0.insert_analysis(a).await
        }
        async fn update_analysis(&self, a: Analysis) -> thesisai_common::Result<Analysis> {
            self.0.update_analysis(a).await
        }
        async fn find_analysis(&self, id: Uuid) -> thesisai_common::Result<Option<Analysis>> {
            self.0.find_analysis(id).await
        }
        async fn list_analyses_by_document(&self, id: Uuid) -> thesisai_common::Result<Vec<Analysis>> {
            self.0.list_analyses_by_document(id).await
        }
        async fn latest_analysis(&self, id: Uuid) -> thesisai_common::Result<Option<Analysis>> {
            self.0.latest_analysis(id).await
        }
        async fn insert_feedback(&self, _items: Vec<FeedbackReport>) -> thesisai_common::Result<Vec<FeedbackReport>> {
            Err(AppError::Internal { message: "disk full".to_string() })
        }
        async fn list_feedback(&self, id: Uuid) -> thesisai_common::Result<Vec<FeedbackReport>> {
            self.0.list_feedback(id).await
        }
        async fn delete_feedback(&self, id: Uuid) -> thesisai_common::Result<u64> {
            self.0.delete_feedback(id).await
        }
        async fn ping(&self) -> thesisai_common::Result<()> {
            Ok(())
        }
    }
}
