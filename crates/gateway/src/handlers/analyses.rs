//! Analysis request and result handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{extractors::Owner, state::AppState};
use thesisai_common::{
    db::models::{Analysis, AnalysisStatus, FeedbackReport, Scores},
    errors::{AppError, Result},
};

/// Response after scheduling an analysis
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub document_id: Uuid,
    pub status: AnalysisStatus,
    pub poll_url: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub analysis_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<Analysis> for AnalysisResponse {
    fn from(analysis: Analysis) -> Self {
        Self {
            scores: analysis.scores(),
            id: analysis.id,
            document_id: analysis.document_id,
            analysis_type: analysis.analysis_type,
            status: analysis.status,
            processing_time: analysis.processing_time,
            tokens_used: analysis.tokens_used,
            error_message: analysis.error_message,
            created_at: analysis.created_at.to_rfc3339(),
            completed_at: analysis.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub section: String,
    #[serde(rename = "type")]
    pub feedback_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_reference: Option<String>,
    pub order_index: i32,
}

impl From<FeedbackReport> for FeedbackResponse {
    fn from(item: FeedbackReport) -> Self {
        Self {
            id: item.id,
            section: item.section,
            feedback_type: item.feedback_type,
            title: item.title,
            content: item.content,
            severity: item.severity,
            page_reference: item.page_reference,
            order_index: item.order_index,
        }
    }
}

/// Schedule an analysis run; the result is polled from `poll_url`
#[tracing::instrument(skip(state), fields(owner_id = %owner.0))]
pub async fn analyze_document(
    State(state): State<AppState>,
    owner: Owner,
    Path(document_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AnalyzeResponse>)> {
    state.documents.get(document_id, owner.0).await?;
    let accepted = state.analyses.request_analysis(document_id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AnalyzeResponse {
            analysis_id: accepted.analysis_id,
            document_id: accepted.document_id,
            status: accepted.status,
            poll_url: format!("/v1/analyses/{}", accepted.analysis_id),
        }),
    ))
}

/// Analysis history of a document, oldest first
pub async fn list_analyses(
    State(state): State<AppState>,
    owner: Owner,
    Path(document_id): Path<Uuid>,
) -> Result<Json<Vec<AnalysisResponse>>> {
    state.documents.get(document_id, owner.0).await?;
    let analyses = state.analyses.list_analyses(document_id).await?;
    Ok(Json(analyses.into_iter().map(Into::into).collect()))
}

pub async fn latest_analysis(
    State(state): State<AppState>,
    owner: Owner,
    Path(document_id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>> {
    state.documents.get(document_id, owner.0).await?;
    let analysis = state
        .analyses
        .latest_analysis(document_id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "analysis".to_string(),
            id: format!("latest for document {}", document_id),
        })?;
    Ok(Json(analysis.into()))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    owner: Owner,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>> {
    let analysis = owned_analysis(&state, owner, analysis_id).await?;
    Ok(Json(analysis.into()))
}

/// Feedback items of an analysis in model order
pub async fn get_feedback(
    State(state): State<AppState>,
    owner: Owner,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<Vec<FeedbackResponse>>> {
    owned_analysis(&state, owner, analysis_id).await?;
    let feedback = state.analyses.get_feedback(analysis_id).await?;
    Ok(Json(feedback.into_iter().map(Into::into).collect()))
}

async fn owned_analysis(state: &AppState, owner: Owner, analysis_id: Uuid) -> Result<Analysis> {
    let analysis = state.analyses.get_analysis(analysis_id).await?;
    state.documents.get(analysis.document_id, owner.0).await?;
    Ok(analysis)
}
