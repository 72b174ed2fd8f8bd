//! ThesisAI Common Library
//!
//! Shared code for the ThesisAI services including:
//! - Database models and the record store abstraction
//! - Blob storage for uploaded files
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod storage;

// Re-export commonly used types
pub use errors::{AppError, Result};
pub use config::AppConfig;
pub use db::{MemoryStore, RecordStore, Repository};
pub use storage::{BlobStore, LocalBlobStore, MemoryBlobStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analysis kind recorded on every analysis run
pub const ANALYSIS_KIND: &str = "COMPREHENSIVE";
