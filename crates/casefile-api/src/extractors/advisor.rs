//! Caller identity from the `X-Advisor-Id` header.
//!
//! Identity is verified upstream; the header only names who acted.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use casefile_core::error::AppError;
use casefile_service::RequestContext;

use crate::error::ApiError;

/// Header naming the acting advisor.
pub const ADVISOR_HEADER: &str = "x-advisor-id";

/// Longest accepted advisor id.
const MAX_ADVISOR_LEN: usize = 128;

fn advisor_id(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(value) = parts.headers.get(ADVISOR_HEADER) else {
        return Ok(None);
    };
    let id = value
        .to_str()
        .map_err(|_| AppError::validation("X-Advisor-Id must be visible ASCII"))?
        .trim();
    if id.is_empty() {
        return Ok(None);
    }
    if id.len() > MAX_ADVISOR_LEN {
        return Err(AppError::validation(format!(
            "X-Advisor-Id exceeds {MAX_ADVISOR_LEN} characters"
        )));
    }
    Ok(Some(id.to_string()))
}

/// Request context for the calling advisor, `anonymous` when the header is absent.
#[derive(Debug, Clone)]
pub struct Advisor(pub RequestContext);

impl std::ops::Deref for Advisor {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Advisor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = advisor_id(parts)?.unwrap_or_else(|| "anonymous".to_string());
        Ok(Self(RequestContext::new(id)))
    }
}

/// Request context for a caller that must identify itself.
#[derive(Debug, Clone)]
pub struct RequiredAdvisor(pub RequestContext);

impl std::ops::Deref for RequiredAdvisor {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequiredAdvisor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = advisor_id(parts)?
            .ok_or_else(|| AppError::validation("X-Advisor-Id header is required"))?;
        Ok(Self(RequestContext::new(id)))
    }
}
