//! Document upload and management handlers

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{extractors::Owner, state::AppState};
use thesisai_analysis::NewUpload;
use thesisai_common::{
    db::models::{Document, DocumentType},
    errors::{AppError, Result},
};

/// Document as returned to clients
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub title: String,
    pub file_name: String,
    pub format: String,
    pub file_size: i64,
    pub word_count: i32,
    pub document_type: String,
    pub status: String,
    pub version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_document_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            file_name: doc.file_name,
            format: doc.format,
            file_size: doc.file_size,
            word_count: doc.word_count,
            document_type: doc.document_type,
            status: doc.status,
            version: doc.version,
            parent_document_id: doc.parent_document_id,
            created_at: doc.created_at.to_rfc3339(),
            updated_at: doc.updated_at.to_rfc3339(),
        }
    }
}

/// Text fields of the upload form
#[derive(Debug, Default, Validate)]
struct UploadForm {
    #[validate(length(min = 1, max = 500))]
    title: Option<String>,
    document_type: Option<DocumentType>,
    parent_document_id: Option<Uuid>,
}

/// Accept a multipart upload with a `file` part and optional
/// `title`, `type` and `parent_document_id` parts
#[tracing::instrument(skip(state, multipart), fields(owner_id = %owner.0))]
pub async fn upload_document(
    State(state): State<AppState>,
    owner: Owner,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>)> {
    let limit = state.config.server.max_upload_bytes;
    let mut form = UploadForm::default();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, limit))? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation {
                        message: "file part has no file name".to_string(),
                        field: Some("file".to_string()),
                    })?;
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                if bytes.len() > limit {
                    return Err(AppError::PayloadTooLarge { size: bytes.len(), limit });
                }
                file = Some((file_name, bytes.to_vec()));
            }
            "title" => {
                let text = field.text().await.map_err(|e| multipart_error(e, limit))?;
                form.title = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            "type" => {
                let text = field.text().await.map_err(|e| multipart_error(e, limit))?;
                let parsed = text.trim().parse::<DocumentType>().map_err(|e| AppError::Validation {
                    message: e.to_string(),
                    field: Some("type".to_string()),
                })?;
                form.document_type = Some(parsed);
            }
            "parent_document_id" => {
                let text = field.text().await.map_err(|e| multipart_error(e, limit))?;
                let parsed = Uuid::parse_str(text.trim()).map_err(|_| AppError::Validation {
                    message: format!("invalid document id: {}", text.trim()),
                    field: Some("parent_document_id".to_string()),
                })?;
                form.parent_document_id = Some(parsed);
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    form.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let (file_name, bytes) = file.ok_or_else(|| AppError::MissingField {
        field: "file".to_string(),
    })?;

    let document = state
        .documents
        .upload(NewUpload {
            owner_id: owner.0,
            file_name,
            bytes,
            title: form.title,
            document_type: form.document_type,
            parent_document_id: form.parent_document_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(document.into())))
}

/// List the caller's documents, newest first
pub async fn list_documents(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<Vec<DocumentResponse>>> {
    let documents = state.documents.list(owner.0).await?;
    Ok(Json(documents.into_iter().map(Into::into).collect()))
}

pub async fn get_document(
    State(state): State<AppState>,
    owner: Owner,
    Path(document_id): Path<Uuid>,
) -> Result<Json<DocumentResponse>> {
    let document = state.documents.get(document_id, owner.0).await?;
    Ok(Json(document.into()))
}

/// Delete a document with its stored file, analyses and feedback
pub async fn delete_document(
    State(state): State<AppState>,
    owner: Owner,
    Path(document_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.documents.delete(document_id, owner.0).await?;

    tracing::info!(document_id = %document_id, owner_id = %owner.0, "Document deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { size: limit + 1, limit }
    } else {
        AppError::Validation {
            message: format!("invalid multipart body: {}", e.body_text()),
            field: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{body_of, get, multipart, send, TestApp};
    use axum::http::{Method, StatusCode};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_upload_get_list_delete() {
        let app = TestApp::new();
        let owner = Uuid::new_v4();

        let (status, doc) = send(
            &app,
            multipart(owner, "proposal.txt", b"A short thesis proposal", &[("type", "thesis")]),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(doc["title"], "proposal.txt");
        assert_eq!(doc["format"], "TXT");
        assert_eq!(doc["word_count"], 4);
        assert_eq!(doc["document_type"], "THESIS");
        assert_eq!(doc["status"], "UPLOADED");
        assert_eq!(doc["version"], 1);

        let id = doc["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, get(owner, &format!("/v1/documents/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], id.as_str());

        let (status, listed) = send(&app, get(owner, "/v1/documents")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let request = axum::http::Request::builder()
            .method(Method::DELETE)
            .uri(format!("/v1/documents/{}", id))
            .header("x-owner-id", owner.to_string())
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.call(request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let (status, body) = send(&app, get(owner, &format!("/v1/documents/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "DOCUMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_conflicts_with_running_analysis() {
        let app = TestApp::new();
        let owner = Uuid::new_v4();

        let (_, doc) = send(&app, multipart(owner, "a.txt", b"some text", &[])).await;
        let id: Uuid = doc["id"].as_str().unwrap().parse().unwrap();
        let run = app.state.analyses.locks().try_acquire(id).unwrap();

        let delete = || {
            axum::http::Request::builder()
                .method(Method::DELETE)
                .uri(format!("/v1/documents/{}", id))
                .header("x-owner-id", owner.to_string())
                .body(axum::body::Body::empty())
                .unwrap()
        };

        let (status, body) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "ANALYSIS_IN_PROGRESS");

        drop(run);
        let response = app.call(delete()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_owner_header_required_and_enforced() {
        let app = TestApp::new();
        let owner = Uuid::new_v4();

        let request = axum::http::Request::builder()
            .uri("/v1/documents")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.call(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let (_, doc) = send(&app, multipart(owner, "a.md", b"# Heading", &[])).await;
        let uri = format!("/v1/documents/{}", doc["id"].as_str().unwrap());

        let (status, _) = send(&app, get(Uuid::new_v4(), &uri)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let app = TestApp::new();
        let owner = Uuid::new_v4();

        let (status, body) = send(&app, multipart(owner, "slides.pptx", b"data", &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");

        let (status, _) = send(&app, multipart(owner, "empty.txt", b"", &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, multipart(owner, "bad.pdf", b"not a pdf", &[])).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, multipart(owner, "a.txt", b"text", &[("type", "POEM")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_revision_upload() {
        let app = TestApp::new();
        let owner = Uuid::new_v4();

        let (_, first) = send(&app, multipart(owner, "draft.txt", b"first draft", &[])).await;
        let parent = first["id"].as_str().unwrap().to_string();

        let (status, second) = send(
            &app,
            multipart(
                owner,
                "draft.txt",
                b"second draft",
                &[("parent_document_id", parent.as_str()), ("title", "Draft 2")],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["version"], 2);
        assert_eq!(second["parent_document_id"], parent.as_str());
        assert_eq!(second["title"], "Draft 2");

        let response = app.call(get(owner, "/v1/documents")).await;
        let listed = body_of(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }
}
