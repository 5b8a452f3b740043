//! Bearer authentication
//!
//! Handlers that take an [`Authenticated`] argument only run for a request
//! carrying a valid `Authorization: Bearer <token>` header.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::sync::Arc;

use crate::domain::Actor;
use crate::error::CoreError;
use crate::AppState;

/// The validated caller of a request
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub actor: Actor,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = CoreError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(CoreError::Unauthenticated)?;
        let actor = state.sessions.validate(token).await?;

        Ok(Self {
            actor,
            token: token.to_string(),
        })
    }
}

/// Token from an `Authorization: Bearer` header, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer  xyz ")), Some("xyz"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
