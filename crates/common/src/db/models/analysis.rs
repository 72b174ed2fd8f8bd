//! Analysis entity: one evaluation run over one document

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Analysis run status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl From<String> for AnalysisStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "IN_PROGRESS" => AnalysisStatus::InProgress,
            "COMPLETED" => AnalysisStatus::Completed,
            "FAILED" => AnalysisStatus::Failed,
            _ => AnalysisStatus::Pending,
        }
    }
}

impl From<AnalysisStatus> for String {
    fn from(status: AnalysisStatus) -> Self {
        match status {
            AnalysisStatus::Pending => "PENDING".to_string(),
            AnalysisStatus::InProgress => "IN_PROGRESS".to_string(),
            AnalysisStatus::Completed => "COMPLETED".to_string(),
            AnalysisStatus::Failed => "FAILED".to_string(),
        }
    }
}

/// The five dimension scores plus the overall score, each in [0, 100]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub structure: f64,
    pub argumentation: f64,
    pub methodology: f64,
    pub writing_quality: f64,
    pub examinability: f64,
    pub overall: f64,
}

impl Scores {
    /// Field names paired with values, in rubric order
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("structure", self.structure),
            ("argumentation", self.argumentation),
            ("methodology", self.methodology),
            ("writingQuality", self.writing_quality),
            ("examinability", self.examinability),
            ("overall", self.overall),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "analyses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub document_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub analysis_type: String,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    #[sea_orm(column_type = "Double", nullable)]
    pub structure_score: Option<f64>,

    #[sea_orm(column_type = "Double", nullable)]
    pub argumentation_score: Option<f64>,

    #[sea_orm(column_type = "Double", nullable)]
    pub methodology_score: Option<f64>,

    #[sea_orm(column_type = "Double", nullable)]
    pub writing_quality_score: Option<f64>,

    #[sea_orm(column_type = "Double", nullable)]
    pub examinability_score: Option<f64>,

    #[sea_orm(column_type = "Double", nullable)]
    pub overall_score: Option<f64>,

    /// Seconds spent in the model call
    pub processing_time: Option<i32>,

    pub tokens_used: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub completed_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// New PENDING record for a document
    pub fn pending(document_id: Uuid, analysis_type: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            analysis_type: analysis_type.to_string(),
            status: AnalysisStatus::Pending.into(),
            structure_score: None,
            argumentation_score: None,
            methodology_score: None,
            writing_quality_score: None,
            examinability_score: None,
            overall_score: None,
            processing_time: None,
            tokens_used: None,
            error_message: None,
            created_at: chrono::Utc::now().into(),
            completed_at: None,
        }
    }

    /// Get the run status as an enum
    pub fn analysis_status(&self) -> AnalysisStatus {
        AnalysisStatus::from(self.status.clone())
    }

    /// All six scores, or None until every one is present
    pub fn scores(&self) -> Option<Scores> {
        Some(Scores {
            structure: self.structure_score?,
            argumentation: self.argumentation_score?,
            methodology: self.methodology_score?,
            writing_quality: self.writing_quality_score?,
            examinability: self.examinability_score?,
            overall: self.overall_score?,
        })
    }

    pub fn set_scores(&mut self, scores: Option<Scores>) {
        self.structure_score = scores.map(|s| s.structure);
        self.argumentation_score = scores.map(|s| s.argumentation);
        self.methodology_score = scores.map(|s| s.methodology);
        self.writing_quality_score = scores.map(|s| s.writing_quality);
        self.examinability_score = scores.map(|s| s.examinability);
        self.overall_score = scores.map(|s| s.overall);
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id",
        on_delete = "Cascade"
    )]
    Document,

    #[sea_orm(has_many = "super::feedback_report::Entity", on_delete = "Cascade")]
    FeedbackReports,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl Related<super::feedback_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedbackReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
