//! Document entity

use super::UnknownVariant;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Declared file format of an uploaded document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Md,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Txt => "TXT",
            DocumentFormat::Md => "MD",
        }
    }

    /// Lowercase file extension used for stored blobs
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
            DocumentFormat::Md => "md",
        }
    }

    /// Derive the format from a file name's extension, ignoring case
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        ext.parse().ok()
    }
}

impl FromStr for DocumentFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PDF" => Ok(DocumentFormat::Pdf),
            "DOCX" => Ok(DocumentFormat::Docx),
            "TXT" => Ok(DocumentFormat::Txt),
            "MD" => Ok(DocumentFormat::Md),
            _ => Err(UnknownVariant { kind: "format", value: s.to_string() }),
        }
    }
}

/// Document category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    #[default]
    Proposal,
    Thesis,
    Chapter,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Proposal => "PROPOSAL",
            DocumentType::Thesis => "THESIS",
            DocumentType::Chapter => "CHAPTER",
            DocumentType::Other => "OTHER",
        }
    }

    /// Human-readable label used when describing the document to the model
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Proposal => "research proposal",
            DocumentType::Thesis => "thesis",
            DocumentType::Chapter => "thesis chapter",
            DocumentType::Other => "academic document",
        }
    }
}

impl FromStr for DocumentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PROPOSAL" => Ok(DocumentType::Proposal),
            "THESIS" => Ok(DocumentType::Thesis),
            "CHAPTER" => Ok(DocumentType::Chapter),
            "OTHER" => Ok(DocumentType::Other),
            _ => Err(UnknownVariant { kind: "document type", value: s.to_string() }),
        }
    }
}

/// Document lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Uploaded,
    Analyzing,
    Completed,
    Failed,
}

impl From<String> for DocumentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ANALYZING" => DocumentStatus::Analyzing,
            "COMPLETED" => DocumentStatus::Completed,
            "FAILED" => DocumentStatus::Failed,
            _ => DocumentStatus::Uploaded,
        }
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Uploaded => "UPLOADED".to_string(),
            DocumentStatus::Analyzing => "ANALYZING".to_string(),
            DocumentStatus::Completed => "COMPLETED".to_string(),
            DocumentStatus::Failed => "FAILED".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub owner_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    /// Name the file was uploaded under
    #[sea_orm(column_type = "Text")]
    pub file_name: String,

    /// Blob store path of the stored bytes
    #[sea_orm(column_type = "Text")]
    pub file_path: String,

    #[sea_orm(column_type = "Text")]
    pub format: String,

    pub file_size: i64,

    pub word_count: i32,

    #[sea_orm(column_type = "Text")]
    pub document_type: String,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    pub version: i32,

    pub parent_document_id: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the lifecycle status as an enum
    pub fn document_status(&self) -> DocumentStatus {
        DocumentStatus::from(self.status.clone())
    }

    /// Parse the stored category, falling back to OTHER for legacy values
    pub fn category(&self) -> DocumentType {
        self.document_type.parse().unwrap_or(DocumentType::Other)
    }

    /// Copy of this record with a new status and refreshed update timestamp
    pub fn with_status(&self, status: DocumentStatus) -> Self {
        Self {
            status: status.into(),
            updated_at: chrono::Utc::now().into(),
            ..self.clone()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::analysis::Entity", on_delete = "Cascade")]
    Analyses,
}

impl Related<super::analysis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analyses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
