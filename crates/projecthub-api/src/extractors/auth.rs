//! `AuthUser` extractor: resolves the caller from the trusted identity
//! header or a bearer token and injects a `RequestContext`.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use projecthub_core::error::AppError;
use projecthub_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let trusted = parts
            .headers
            .get(state.config.auth.trusted_identity_header.as_str())
            .and_then(|v| v.to_str().ok());

        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let resolved = state
            .identity_resolver
            .resolve(trusted, authorization)
            .ok_or_else(|| AppError::unauthenticated("Not authenticated"))?;

        Ok(AuthUser(RequestContext::from(resolved)))
    }
}
