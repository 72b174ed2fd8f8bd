//! Document upload, revision, listing and deletion

use crate::errors::{AnalysisError, Result};
use crate::extractor::{extract_bytes, word_count};
use crate::lock::DocumentLocks;
use std::sync::Arc;
use thesisai_common::db::models::{Document, DocumentFormat, DocumentStatus, DocumentType};
use thesisai_common::{metrics, BlobStore, RecordStore};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// An uploaded file plus its optional metadata
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub owner_id: Uuid,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub document_type: Option<DocumentType>,
    pub parent_document_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    locks: DocumentLocks,
}

impl DocumentService {
    /// `locks` must be the set the analysis orchestrator holds during runs
    pub fn new(store: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>, locks: DocumentLocks) -> Self {
        Self { store, blobs, locks }
    }

    /// Validate, extract and store an upload, creating the document record.
    ///
    /// Files whose text cannot be extracted are rejected before anything is
    /// written, so a stored document can always be analyzed.
    #[instrument(skip(self, upload), fields(owner_id = %upload.owner_id, file_name = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload(&self, upload: NewUpload) -> Result<Document> {
        if upload.bytes.is_empty() {
            return Err(AnalysisError::Validation("uploaded file is empty".to_string()));
        }

        let format = DocumentFormat::from_file_name(&upload.file_name)
            .ok_or_else(|| AnalysisError::UnsupportedFormat(upload.file_name.clone()))?;

        let version = match upload.parent_document_id {
            Some(parent_id) => self.owned(parent_id, upload.owner_id).await?.version + 1,
            None => 1,
        };

        let NewUpload { owner_id, file_name, bytes, title, document_type, parent_document_id } = upload;

        let (bytes, words) = tokio::task::spawn_blocking(move || {
            let words = extract_bytes(&bytes, format).map(|text| word_count(&text));
            (bytes, words)
        })
        .await
        .map_err(|e| AnalysisError::CorruptFile(format!("extraction task failed: {}", e)))?;
        let words = words?;

        let path = self.blobs.store(&bytes, format.extension()).await?;

        let now = chrono::Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            owner_id,
            title: title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| file_name.clone()),
            file_name,
            file_path: path.clone(),
            format: format.as_str().to_string(),
            file_size: bytes.len() as i64,
            word_count: i32::try_from(words).unwrap_or(i32::MAX),
            document_type: document_type.unwrap_or_default().as_str().to_string(),
            status: DocumentStatus::Uploaded.into(),
            version,
            parent_document_id,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let document = match self.store.insert_document(document).await {
            Ok(document) => document,
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&path).await {
                    warn!(error = %cleanup, path = %path, "Failed to remove blob of rejected upload");
                }
                return Err(e.into());
            }
        };

        metrics::record_upload(format.as_str(), words);
        info!(document_id = %document.id, version, words, "Document uploaded");

        Ok(document)
    }

    /// Fetch a document the caller owns
    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<Document> {
        self.owned(id, owner_id).await
    }

    /// The owner's documents, newest first
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Document>> {
        Ok(self.store.list_documents_by_owner(owner_id).await?)
    }

    /// Remove the stored file and the record with its analyses and feedback.
    ///
    /// Rejected while an analysis of the document is running; the document
    /// stays held until the delete finishes so no run can start meanwhile.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<()> {
        let document = self.owned(id, owner_id).await?;
        let _guard = self
            .locks
            .try_acquire(id)
            .ok_or(AnalysisError::AnalysisInProgress(id))?;

        match self.blobs.delete(&document.file_path).await {
            Ok(true) => {}
            Ok(false) => warn!(path = %document.file_path, "Stored file already missing"),
            Err(e) => warn!(error = %e, path = %document.file_path, "Failed to delete stored file"),
        }

        if !self.store.delete_document(id).await? {
            return Err(AnalysisError::DocumentNotFound(id));
        }

        metrics::record_delete();
        info!("Document deleted");
        Ok(())
    }

    async fn owned(&self, id: Uuid, owner_id: Uuid) -> Result<Document> {
        let document = self
            .store
            .find_document(id)
            .await?
            .ok_or(AnalysisError::DocumentNotFound(id))?;

        if document.owner_id != owner_id {
            return Err(AnalysisError::OwnerMismatch);
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thesisai_common::{MemoryBlobStore, MemoryStore};
    use tokio_test::{assert_err, assert_ok};

    struct Fixture {
        service: DocumentService,
        store: Arc<MemoryStore>,
        blobs: Arc<MemoryBlobStore>,
        locks: DocumentLocks,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let locks = DocumentLocks::new();
        Fixture {
            service: DocumentService::new(store.clone(), blobs.clone(), locks.clone()),
            store,
            blobs,
            locks,
        }
    }

    fn upload(owner_id: Uuid, file_name: &str, bytes: &[u8]) -> NewUpload {
        NewUpload {
            owner_id,
            file_name: file_name.to_string(),
            bytes: bytes.to_vec(),
            title: None,
            document_type: None,
            parent_document_id: None,
        }
    }

    #[tokio::test]
    async fn test_upload_defaults() {
        let fx = fixture();
        let owner = Uuid::new_v4();

        let doc = fx
            .service
            .upload(upload(owner, "Proposal.TXT", b"Three short words"))
            .await
            .unwrap();

        assert_eq!(doc.title, "Proposal.TXT");
        assert_eq!(doc.format, "TXT");
        assert_eq!(doc.word_count, 3);
        assert_eq!(doc.file_size, 17);
        assert_eq!(doc.version, 1);
        assert_eq!(doc.category(), DocumentType::Proposal);
        assert_eq!(doc.document_status(), DocumentStatus::Uploaded);
        assert!(doc.file_path.ends_with(".txt"));
        assert_eq!(fx.blobs.read(&doc.file_path).await.unwrap(), b"Three short words");
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let fx = fixture();
        let owner = Uuid::new_v4();

        let empty = fx.service.upload(upload(owner, "a.pdf", b"")).await;
        assert!(matches!(empty, Err(AnalysisError::Validation(_))));

        let pptx = fx.service.upload(upload(owner, "slides.pptx", b"data")).await;
        assert!(matches!(pptx, Err(AnalysisError::UnsupportedFormat(_))));

        let corrupt = fx.service.upload(upload(owner, "broken.pdf", b"%PDF-garbage")).await;
        assert!(matches!(corrupt, Err(AnalysisError::CorruptFile(_))));

        assert!(fx.service.list(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revision_increments_version() {
        let fx = fixture();
        let owner = Uuid::new_v4();

        let first = fx.service.upload(upload(owner, "draft.md", b"# Draft")).await.unwrap();
        let mut revision = upload(owner, "draft.md", b"# Draft two");
        revision.parent_document_id = Some(first.id);
        revision.title = Some("  Second draft ".to_string());
        revision.document_type = Some(DocumentType::Thesis);

        let second = fx.service.upload(revision).await.unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(second.parent_document_id, Some(first.id));
        assert_eq!(second.title, "Second draft");
        assert_eq!(second.category(), DocumentType::Thesis);

        let listed = fx.service.list(owner).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_revision_requires_owned_parent() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let parent = fx.service.upload(upload(owner, "a.txt", b"text")).await.unwrap();

        let mut foreign = upload(Uuid::new_v4(), "b.txt", b"text");
        foreign.parent_document_id = Some(parent.id);
        assert!(matches!(fx.service.upload(foreign).await, Err(AnalysisError::OwnerMismatch)));

        let mut orphan = upload(owner, "c.txt", b"text");
        orphan.parent_document_id = Some(Uuid::new_v4());
        assert!(matches!(fx.service.upload(orphan).await, Err(AnalysisError::DocumentNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_checks_owner() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let doc = fx.service.upload(upload(owner, "a.txt", b"text")).await.unwrap();

        assert_ok!(fx.service.get(doc.id, owner).await);
        assert!(matches!(
            fx.service.get(doc.id, Uuid::new_v4()).await,
            Err(AnalysisError::OwnerMismatch)
        ));
        assert!(matches!(
            fx.service.get(Uuid::new_v4(), owner).await,
            Err(AnalysisError::DocumentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_record() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let doc = fx.service.upload(upload(owner, "a.txt", b"text")).await.unwrap();

        assert_err!(fx.service.delete(doc.id, Uuid::new_v4()).await);
        assert_ok!(fx.service.delete(doc.id, owner).await);

        assert!(fx.store.find_document(doc.id).await.unwrap().is_none());
        assert!(fx.blobs.read(&doc.file_path).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_waits_for_running_analysis() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let doc = fx.service.upload(upload(owner, "a.txt", b"text")).await.unwrap();

        let run = fx.locks.try_acquire(doc.id).unwrap();
        assert!(matches!(
            fx.service.delete(doc.id, owner).await,
            Err(AnalysisError::AnalysisInProgress(id)) if id == doc.id
        ));
        assert!(fx.store.find_document(doc.id).await.unwrap().is_some());
        assert_ok!(fx.blobs.read(&doc.file_path).await);

        drop(run);
        assert_ok!(fx.service.delete(doc.id, owner).await);
        assert!(!fx.locks.is_held(doc.id));
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_blob() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let doc = fx.service.upload(upload(owner, "a.txt", b"text")).await.unwrap();

        assert!(fx.blobs.delete(&doc.file_path).await.unwrap());
        assert_ok!(fx.service.delete(doc.id, owner).await);
        assert!(fx.store.find_document(doc.id).await.unwrap().is_none());
    }
}
