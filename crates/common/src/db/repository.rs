//! SeaORM-backed record store
//!
//! Every operation commits on its own connection round-trip;
//! cascading deletes are handled by the schema.

use crate::db::models::*;
use crate::db::{DbPool, RecordStore};
use crate::errors::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.connection()
    }
}

fn document_active(document: Document) -> DocumentActiveModel {
    DocumentActiveModel {
        id: Set(document.id),
        owner_id: Set(document.owner_id),
        title: Set(document.title),
        file_name: Set(document.file_name),
        file_path: Set(document.file_path),
        format: Set(document.format),
        file_size: Set(document.file_size),
        word_count: Set(document.word_count),
        document_type: Set(document.document_type),
        status: Set(document.status),
        version: Set(document.version),
        parent_document_id: Set(document.parent_document_id),
        created_at: Set(document.created_at),
        updated_at: Set(document.updated_at),
    }
}

fn analysis_active(analysis: Analysis) -> AnalysisActiveModel {
    AnalysisActiveModel {
        id: Set(analysis.id),
        document_id: Set(analysis.document_id),
        analysis_type: Set(analysis.analysis_type),
        status: Set(analysis.status),
        structure_score: Set(analysis.structure_score),
        argumentation_score: Set(analysis.argumentation_score),
        methodology_score: Set(analysis.methodology_score),
        writing_quality_score: Set(analysis.writing_quality_score),
        examinability_score: Set(analysis.examinability_score),
        overall_score: Set(analysis.overall_score),
        processing_time: Set(analysis.processing_time),
        tokens_used: Set(analysis.tokens_used),
        error_message: Set(analysis.error_message),
        created_at: Set(analysis.created_at),
        completed_at: Set(analysis.completed_at),
    }
}

fn feedback_active(item: FeedbackReport) -> FeedbackReportActiveModel {
    FeedbackReportActiveModel {
        id: Set(item.id),
        analysis_id: Set(item.analysis_id),
        section: Set(item.section),
        feedback_type: Set(item.feedback_type),
        title: Set(item.title),
        content: Set(item.content),
        severity: Set(item.severity),
        page_reference: Set(item.page_reference),
        order_index: Set(item.order_index),
        created_at: Set(item.created_at),
    }
}

#[async_trait]
impl RecordStore for Repository {
    // ========================================================================
    // Document Operations
    // ========================================================================

    async fn insert_document(&self, document: Document) -> Result<Document> {
        document_active(document)
            .insert(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn find_document(&self, id: Uuid) -> Result<Option<Document>> {
        DocumentEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn list_documents_by_owner(&self, owner_id: Uuid) -> Result<Vec<Document>> {
        DocumentEntity::find()
            .filter(DocumentColumn::OwnerId.eq(owner_id))
            .order_by_desc(DocumentColumn::CreatedAt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn update_document(&self, document: Document) -> Result<Document> {
        document_active(document)
            .update(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool> {
        let result = DocumentEntity::delete_by_id(id)
            .exec(self.conn())
            .await?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Analysis Operations
    // ========================================================================

    async fn insert_analysis(&self, analysis: Analysis) -> Result<Analysis> {
        analysis_active(analysis)
            .insert(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn update_analysis(&self, analysis: Analysis) -> Result<Analysis> {
        analysis_active(analysis)
            .update(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn find_analysis(&self, id: Uuid) -> Result<Option<Analysis>> {
        AnalysisEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn list_analyses_by_document(&self, document_id: Uuid) -> Result<Vec<Analysis>> {
        AnalysisEntity::find()
            .filter(AnalysisColumn::DocumentId.eq(document_id))
            .order_by_asc(AnalysisColumn::CreatedAt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn latest_analysis(&self, document_id: Uuid) -> Result<Option<Analysis>> {
        AnalysisEntity::find()
            .filter(AnalysisColumn::DocumentId.eq(document_id))
            .order_by_desc(AnalysisColumn::CreatedAt)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Feedback Operations
    // ========================================================================

    async fn insert_feedback(&self, items: Vec<FeedbackReport>) -> Result<Vec<FeedbackReport>> {
        if items.is_empty() {
            return Ok(items);
        }

        FeedbackReportEntity::insert_many(items.iter().cloned().map(feedback_active))
            .exec(self.conn())
            .await?;

        Ok(items)
    }

    async fn list_feedback(&self, analysis_id: Uuid) -> Result<Vec<FeedbackReport>> {
        FeedbackReportEntity::find()
            .filter(FeedbackReportColumn::AnalysisId.eq(analysis_id))
            .order_by_asc(FeedbackReportColumn::OrderIndex)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn delete_feedback(&self, analysis_id: Uuid) -> Result<u64> {
        let result = FeedbackReportEntity::delete_many()
            .filter(FeedbackReportColumn::AnalysisId.eq(analysis_id))
            .exec(self.conn())
            .await?;

        Ok(result.rows_affected)
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }
}
