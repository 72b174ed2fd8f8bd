use axum::{extract::FromRequestParts, http::request::Parts};
use thesisai_common::errors::{AppError, Result};
use uuid::Uuid;

use crate::state::AppState;

/// Caller identity taken from the configured owner header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Uuid);

impl FromRequestParts<AppState> for Owner {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header = state.config.server.owner_header.as_str();

        parts
            .headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(Owner)
            .ok_or_else(|| AppError::Unauthorized {
                message: format!("Missing or invalid {} header", header),
            })
    }
}
