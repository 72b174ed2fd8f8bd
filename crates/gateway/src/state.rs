//! Shared handler state

use std::sync::Arc;
use thesisai_analysis::{
    AiClient, AnalysisOrchestrator, BlobTextExtractor, DocumentService, PromptBuilder,
};
use thesisai_common::{AppConfig, BlobStore, RecordStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecordStore>,
    pub documents: DocumentService,
    pub analyses: AnalysisOrchestrator,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        ai: Arc<dyn AiClient>,
    ) -> Self {
        let extractor = Arc::new(BlobTextExtractor::new(blobs.clone()));
        let analyses = AnalysisOrchestrator::new(
            store.clone(),
            extractor,
            ai,
            PromptBuilder::new(config.analysis.max_document_chars),
            config.ai.max_concurrent_calls,
        );

        Self {
            documents: DocumentService::new(store.clone(), blobs, analyses.locks()),
            analyses,
            store,
            config,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use thesisai_analysis::MockAiClient;
    use thesisai_common::{MemoryBlobStore, MemoryStore};

    let mut config = AppConfig::default();
    config.database.url = thesisai_common::config::MEMORY_DATABASE_URL.to_string();
    config.ai.provider = "mock".to_string();

    AppState::new(
        Arc::new(config),
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryBlobStore::new()),
        Arc::new(MockAiClient),
    )
}
