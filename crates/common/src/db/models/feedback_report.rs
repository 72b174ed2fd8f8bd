//! Feedback item entity attached to an analysis

use super::UnknownVariant;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of feedback item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackType {
    Strength,
    Weakness,
    Suggestion,
    Question,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Strength => "STRENGTH",
            FeedbackType::Weakness => "WEAKNESS",
            FeedbackType::Suggestion => "SUGGESTION",
            FeedbackType::Question => "QUESTION",
        }
    }
}

impl FromStr for FeedbackType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STRENGTH" => Ok(FeedbackType::Strength),
            "WEAKNESS" => Ok(FeedbackType::Weakness),
            "SUGGESTION" => Ok(FeedbackType::Suggestion),
            "QUESTION" => Ok(FeedbackType::Question),
            _ => Err(UnknownVariant { kind: "feedback type", value: s.to_string() }),
        }
    }
}

/// Severity of a feedback item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl FromStr for Severity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(UnknownVariant { kind: "severity", value: s.to_string() }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub analysis_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub section: String,

    #[sea_orm(column_type = "Text")]
    pub feedback_type: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub title: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    #[sea_orm(column_type = "Text")]
    pub severity: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub page_reference: Option<String>,

    /// Zero-based position in the model's response
    pub order_index: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::analysis::Entity",
        from = "Column::AnalysisId",
        to = "super::analysis::Column::Id",
        on_delete = "Cascade"
    )]
    Analysis,
}

impl Related<super::analysis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analysis.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
