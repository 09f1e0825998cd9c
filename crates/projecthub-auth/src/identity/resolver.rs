//! Derives the acting identity from request headers.

use std::sync::Arc;

use super::Identity;
use crate::jwt::TokenVerifier;

/// A resolved caller plus the bearer credential to forward downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Who is calling.
    pub identity: Identity,
    /// The raw bearer token, when the request carried one.
    pub credential: Option<String>,
}

/// Resolves the caller from a trusted forwarded identity or a bearer token.
///
/// A non-blank trusted value wins unconditionally and is used verbatim;
/// the front door has already verified it. Otherwise the bearer token must verify. This never
/// fails loudly: callers that need a caller treat `None` as unauthenticated.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    verifier: Arc<TokenVerifier>,
}

impl IdentityResolver {
    /// Create a resolver around a shared verifier.
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Resolve from the trusted header value and the `Authorization` value.
    pub fn resolve(
        &self,
        trusted: Option<&str>,
        authorization: Option<&str>,
    ) -> Option<ResolvedIdentity> {
        let credential = authorization.and_then(bearer_token).map(str::to_string);

        if let Some(trusted) = trusted.filter(|v| !v.trim().is_empty()) {
            return Some(ResolvedIdentity {
                identity: Identity::new(trusted),
                credential,
            });
        }

        let token = credential?;
        let identity = self.verifier.verify(&token)?;
        Some(ResolvedIdentity {
            identity,
            credential: Some(token),
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
