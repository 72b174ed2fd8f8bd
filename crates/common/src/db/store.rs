//! Persistence contract shared by the pipeline and the HTTP layer

use crate::db::models::{Analysis, Document, FeedbackReport};
use crate::errors::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Keyed record store for documents, analyses and feedback items.
///
/// Every write commits on its own; callers sequence them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // Documents

    async fn insert_document(&self, document: Document) -> Result<Document>;

    async fn find_document(&self, id: Uuid) -> Result<Option<Document>>;

    /// Documents of one owner, newest first
    async fn list_documents_by_owner(&self, owner_id: Uuid) -> Result<Vec<Document>>;

    async fn update_document(&self, document: Document) -> Result<Document>;

    /// Delete a document together with its analyses and their feedback
    async fn delete_document(&self, id: Uuid) -> Result<bool>;

    // Analyses

    async fn insert_analysis(&self, analysis: Analysis) -> Result<Analysis>;

    async fn update_analysis(&self, analysis: Analysis) -> Result<Analysis>;

    async fn find_analysis(&self, id: Uuid) -> Result<Option<Analysis>>;

    /// Analyses of one document, oldest first
    async fn list_analyses_by_document(&self, document_id: Uuid) -> Result<Vec<Analysis>>;

    /// Most recently created analysis of a document
    async fn latest_analysis(&self, document_id: Uuid) -> Result<Option<Analysis>>;

    // Feedback

    async fn insert_feedback(&self, items: Vec<FeedbackReport>) -> Result<Vec<FeedbackReport>>;

    /// Feedback of one analysis in ascending order index
    async fn list_feedback(&self, analysis_id: Uuid) -> Result<Vec<FeedbackReport>>;

    /// Remove every feedback item of an analysis, returning how many went
    async fn delete_feedback(&self, analysis_id: Uuid) -> Result<u64>;

    // Health

    async fn ping(&self) -> Result<()>;
}
