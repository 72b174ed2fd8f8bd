//! SeaORM entity models
//!
//! Database entities for ThesisAI

mod document;
mod analysis;
mod feedback_report;

pub use document::{
    Entity as DocumentEntity,
    Model as Document,
    ActiveModel as DocumentActiveModel,
    Column as DocumentColumn,
    DocumentFormat,
    DocumentStatus,
    DocumentType,
};

pub use analysis::{
    Entity as AnalysisEntity,
    Model as Analysis,
    ActiveModel as AnalysisActiveModel,
    Column as AnalysisColumn,
    AnalysisStatus,
    Scores,
};

pub use feedback_report::{
    Entity as FeedbackReportEntity,
    Model as FeedbackReport,
    ActiveModel as FeedbackReportActiveModel,
    Column as FeedbackReportColumn,
    FeedbackType,
    Severity,
};

/// Error returned when a stored or submitted enumeration value is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
