//! In-process record store
//!
//! Selected with the `memory://` database URL. Records are lost on restart.

use crate::db::models::{Analysis, Document, FeedbackReport};
use crate::db::RecordStore;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    documents: HashMap<Uuid, Document>,
    /// Insertion order is kept so equal timestamps resolve to the later insert
    analyses: Vec<Analysis>,
    feedback: Vec<FeedbackReport>,
}

/// Record store kept in memory behind a single lock
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_document(&self, document: Document) -> Result<Document> {
        let mut tables = self.tables.write().await;
        if tables.documents.contains_key(&document.id) {
            return Err(AppError::Conflict {
                message: format!("document {} already exists", document.id),
            });
        }
        tables.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn find_document(&self, id: Uuid) -> Result<Option<Document>> {
        Ok(self.tables.read().await.documents.get(&id).cloned())
    }

    async fn list_documents_by_owner(&self, owner_id: Uuid) -> Result<Vec<Document>> {
        let tables = self.tables.read().await;
        let mut documents: Vec<Document> = tables
            .documents
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn update_document(&self, document: Document) -> Result<Document> {
        let mut tables = self.tables.write().await;
        match tables.documents.get_mut(&document.id) {
            Some(slot) => {
                *slot = document.clone();
                Ok(document)
            }
            None => Err(AppError::DocumentNotFound { id: document.id.to_string() }),
        }
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.documents.remove(&id).is_none() {
            return Ok(false);
        }

        let removed: Vec<Uuid> = tables
            .analyses
            .iter()
            .filter(|a| a.document_id == id)
            .map(|a| a.id)
            .collect();
        tables.analyses.retain(|a| a.document_id != id);
        tables.feedback.retain(|f| !removed.contains(&f.analysis_id));

        Ok(true)
    }

    async fn insert_analysis(&self, analysis: Analysis) -> Result<Analysis> {
        let mut tables = self.tables.write().await;
        if !tables.documents.contains_key(&analysis.document_id) {
            return Err(AppError::DocumentNotFound { id: analysis.document_id.to_string() });
        }
        tables.analyses.push(analysis.clone());
        Ok(analysis)
    }

    async fn update_analysis(&self, analysis: Analysis) -> Result<Analysis> {
        let mut tables = self.tables.write().await;
        match tables.analyses.iter_mut().find(|a| a.id == analysis.id) {
            Some(slot) => {
                *slot = analysis.clone();
                Ok(analysis)
            }
            None => Err(AppError::AnalysisNotFound { id: analysis.id.to_string() }),
        }
    }

    async fn find_analysis(&self, id: Uuid) -> Result<Option<Analysis>> {
        let tables = self.tables.read().await;
        Ok(tables.analyses.iter().find(|a| a.id == id).cloned())
    }

    async fn list_analyses_by_document(&self, document_id: Uuid) -> Result<Vec<Analysis>> {
        let tables = self.tables.read().await;
        let mut analyses: Vec<Analysis> = tables
            .analyses
            .iter()
            .filter(|a| a.document_id == document_id)
            .cloned()
            .collect();
        analyses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(analyses)
    }

    async fn latest_analysis(&self, document_id: Uuid) -> Result<Option<Analysis>> {
        let tables = self.tables.read().await;
        // max_by keeps the last of equal elements
        Ok(tables
            .analyses
            .iter()
            .filter(|a| a.document_id == document_id)
            .max_by(|a, b| a.created_at.cmp(&b.created_at))
            .cloned())
    }

    async fn insert_feedback(&self, items: Vec<FeedbackReport>) -> Result<Vec<FeedbackReport>> {
        let mut tables = self.tables.write().await;
        for item in &items {
            if !tables.analyses.iter().any(|a| a.id == item.analysis_id) {
                return Err(AppError::AnalysisNotFound { id: item.analysis_id.to_string() });
            }
        }
        tables.feedback.extend(items.iter().cloned());
        Ok(items)
    }

    async fn list_feedback(&self, analysis_id: Uuid) -> Result<Vec<FeedbackReport>> {
        let tables = self.tables.read().await;
        let mut items: Vec<FeedbackReport> = tables
            .feedback
            .iter()
            .filter(|f| f.analysis_id == analysis_id)
            .cloned()
            .collect();
        items.sort_by_key(|f| f.order_index);
        Ok(items)
    }

    async fn delete_feedback(&self, analysis_id: Uuid) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.feedback.len();
        tables.feedback.retain(|f| f.analysis_id != analysis_id);
        Ok((before - tables.feedback.len()) as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
